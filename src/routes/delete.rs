use crate::{
    data::IdForm,
    error::{MissingStudentSnafu, RosterResult},
    maud_conveniences::{id_vals, modal, subtitle},
    state::{RosterSession, RosterState},
    view::{DeleteResolution, RosterAction},
};
use axum::extract::{Query, State};
use maud::{Markup, html};
use snafu::OptionExt;

pub fn render_delete_confirmation(id: &str, name: &str) -> Markup {
    modal(
        "z-40",
        "/internal/delete/dismiss",
        html! {
            div role="alertdialog" class="text-center" hx-post="/internal/delete/dismiss" hx-trigger="keyup[key=='Escape'] from:body" hx-target="#roster" {
                div class="text-yellow-400" {(subtitle("Are you sure?"))}
                p class="mb-2" {"You will not be able to recover this student!"}
                p class="mb-4 italic text-gray-400" {(name)}
                div class="flex flex-row justify-center space-x-4" {
                    button class="bg-gray-600 hover:bg-gray-700 font-bold py-2 px-4 rounded" hx-post="/internal/delete/cancel" hx-target="#roster" {
                        "No, cancel!"
                    }
                    button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" hx-delete="/internal/students" hx-vals=(id_vals(id)) hx-target="#roster" {
                        "Yes, delete it!"
                    }
                }
            }
        },
    )
}

/// Only asks; nothing is sent to the student service until the dialog is confirmed.
pub async fn internal_get_delete_confirmation(
    State(state): State<RosterState>,
    session: RosterSession,
    Query(IdForm { id }): Query<IdForm>,
) -> RosterResult<Markup> {
    let mut view = session.load().await?;
    let name = view
        .find_student(&id)
        .map(|student| student.name.clone())
        .context(MissingStudentSnafu { id: id.clone() })?;

    view.apply(RosterAction::RequestDelete { id, name });
    session.save(&view).await?;
    Ok(state.render_roster(&view))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    session: RosterSession,
    Query(IdForm { id }): Query<IdForm>,
) -> RosterResult<Markup> {
    let mut view = session.load().await?;

    if view.pending_delete() != Some(id.as_str()) {
        warn!(?id, "Delete requested without a matching confirmation, ignoring");
        return Ok(state.render_roster(&view));
    }
    view.apply(RosterAction::ResolveDelete(DeleteResolution::Confirmed));

    match state.client().delete_student(&id).await {
        Ok(()) => {
            info!(?id, "Deleted student");
            view.apply(RosterAction::DeleteSucceeded(id));
        }
        Err(e) => {
            error!(?e, ?id, "Error deleting student");
            view.apply(RosterAction::DeleteFailed);
        }
    }

    session.save(&view).await?;
    Ok(state.render_roster(&view))
}

pub async fn internal_post_cancel_delete(
    State(state): State<RosterState>,
    session: RosterSession,
) -> RosterResult<Markup> {
    let view = session
        .dispatch(RosterAction::ResolveDelete(DeleteResolution::Cancelled))
        .await?;
    Ok(state.render_roster(&view))
}

pub async fn internal_post_dismiss_delete(
    State(state): State<RosterState>,
    session: RosterSession,
) -> RosterResult<Markup> {
    let view = session
        .dispatch(RosterAction::ResolveDelete(DeleteResolution::Dismissed))
        .await?;
    Ok(state.render_roster(&view))
}
