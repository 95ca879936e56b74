use crate::{
    error::RosterResult,
    maud_conveniences::title,
    state::{RosterSession, RosterState},
};
use axum::extract::State;
use maud::{Markup, html};

/// The whole page. Loading it is what fetches the roster, so a reload always shows fresh data.
pub async fn get_index_route(
    State(state): State<RosterState>,
    session: RosterSession,
) -> RosterResult<Markup> {
    let mut view = session.load().await?;
    state.refresh_roster(&mut view).await;
    session.save(&view).await?;

    let roster = state.render_roster(&view);

    Ok(RosterState::render(&html! {
        aside class="hidden md:flex md:w-1/4 flex-col items-center justify-center bg-gradient-to-b from-blue-700 to-violet-700 p-8" {
            div class="text-center" {
                h3 class="text-2xl font-semibold" {"Yellow Owl"}
                p {"Admin"}
            }
        }
        main class="flex-1 flex flex-col p-8 space-y-4" {
            nav class="bg-gradient-to-r from-green-600 to-sky-500 rounded p-4 text-center" {
                (title("Student"))
            }
            div class="flex flex-row justify-end items-center space-x-4" {
                input type="search" name="search" placeholder="Search" value=(view.search) hx-get="/internal/students" hx-trigger="input" hx-target="#roster" class="shadow appearance-none border rounded py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
                button class="bg-green-600 hover:bg-green-800 font-bold py-3 px-6 rounded" hx-get="/internal/student_form" hx-target="#roster" {
                    "Add Student"
                }
            }
            div id="roster" {
                (roster)
            }
        }
    }))
}
