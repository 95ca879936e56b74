use crate::{
    config::ApiConfig,
    data::student::NameWithAvatar,
    maud_conveniences::{id_vals, modal, subtitle},
    routes::{delete::render_delete_confirmation, student_form::render_student_form},
    error::RosterResult,
    state::{RosterSession, RosterState},
    view::{
        Acknowledgment, AcknowledgmentKind, Overlay, RosterAction, RosterView,
        table::{SortColumn, TablePage},
    },
};
use axum::extract::{Query, State};
use maud::{Markup, html};
use serde::Deserialize;

/// Everything inside `#roster`: the table, whichever modal is open, and the acknowledgment on top.
pub fn render_roster_region(view: &RosterView, api: &ApiConfig, page_size: usize) -> Markup {
    let page = view.visible_rows(page_size);

    html! {
        (render_table(view, api, &page))

        @match &view.overlay {
            Overlay::Closed => {},
            Overlay::Form { mode, draft } => {
                (render_student_form(mode, draft))
            },
            Overlay::ConfirmDelete { id, name } => {
                (render_delete_confirmation(id, name))
            },
        }

        @if let Some(acknowledgment) = &view.acknowledgment {
            (render_acknowledgment(acknowledgment))
        }
    }
}

fn render_table(view: &RosterView, api: &ApiConfig, page: &TablePage) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700 sticky top-0" {
                    tr {
                        @for column in SortColumn::ALL {
                            th class="py-2 px-4 text-left font-semibold text-gray-300 cursor-pointer select-none" hx-get={"/internal/students/sort?column=" (column.query_value())} hx-target="#roster" {
                                (column.title())
                                @if view.sort.column == column {
                                    " " (view.sort.direction.arrow())
                                }
                            }
                        }
                        th class="py-2 px-4 text-center font-semibold text-gray-300" {"Actions"}
                    }
                }
                tbody {
                    @if page.rows.is_empty() {
                        tr {
                            td colspan="6" class="py-4 px-4 text-center italic text-gray-400" {"There are no records to display"}
                        }
                    }
                    @for student in page.rows.iter().copied() {
                        tr class="odd:bg-gray-800 even:bg-gray-700/50 hover:bg-gray-700" {
                            td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(NameWithAvatar { student, api })}
                            td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(student.email)}
                            td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(student.phone)}
                            td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(student.enroll_number)}
                            td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(student.admission_date_display())}
                            td class="py-2 px-4 border-b border-gray-600" {
                                div class="flex flex-row justify-center space-x-3" {
                                    button class="text-blue-400 hover:text-blue-200" title="Edit" hx-get="/internal/student_form" hx-vals=(id_vals(&student.id)) hx-target="#roster" {"✎"}
                                    button class="text-red-400 hover:text-red-200" title="Delete" hx-get="/internal/delete" hx-vals=(id_vals(&student.id)) hx-target="#roster" {"🗑"}
                                }
                            }
                        }
                    }
                }
            }
        }

        div class="flex flex-row items-center justify-end space-x-4 py-2 text-sm text-gray-300" {
            span {"Page " (page.page) " of " (page.page_count) " (" (page.total) " students)"}
            @if page.has_previous() {
                button class="bg-slate-600 hover:bg-slate-800 py-1 px-3 rounded" hx-get={"/internal/students/page?page=" (page.page - 1)} hx-target="#roster" {"Previous"}
            }
            @if page.has_next() {
                button class="bg-slate-600 hover:bg-slate-800 py-1 px-3 rounded" hx-get={"/internal/students/page?page=" (page.page + 1)} hx-target="#roster" {"Next"}
            }
        }
    }
}

fn render_acknowledgment(acknowledgment: &Acknowledgment) -> Markup {
    let colour = match acknowledgment.kind {
        AcknowledgmentKind::Success => "text-green-400",
        AcknowledgmentKind::Error => "text-red-400",
        AcknowledgmentKind::Neutral => "text-gray-300",
    };

    modal(
        "z-50",
        "/internal/acknowledge",
        html! {
            div role="alertdialog" class="text-center" {
                div class=(colour) {(subtitle(&acknowledgment.title))}
                p class="mb-4" {(acknowledgment.text)}
                button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-post="/internal/acknowledge" hx-target="#roster" {"OK"}
            }
        },
    )
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    search: String,
}

pub async fn internal_get_students(
    State(state): State<RosterState>,
    session: RosterSession,
    Query(SearchQuery { search }): Query<SearchQuery>,
) -> RosterResult<Markup> {
    let view = session.dispatch(RosterAction::SetSearch(search)).await?;
    Ok(state.render_roster(&view))
}

#[derive(Deserialize)]
pub struct SortQuery {
    column: SortColumn,
}

pub async fn internal_get_sorted_students(
    State(state): State<RosterState>,
    session: RosterSession,
    Query(SortQuery { column }): Query<SortQuery>,
) -> RosterResult<Markup> {
    let view = session.dispatch(RosterAction::SortBy(column)).await?;
    Ok(state.render_roster(&view))
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: usize,
}

pub async fn internal_get_students_page(
    State(state): State<RosterState>,
    session: RosterSession,
    Query(PageQuery { page }): Query<PageQuery>,
) -> RosterResult<Markup> {
    let view = session.dispatch(RosterAction::GoToPage(page)).await?;
    Ok(state.render_roster(&view))
}

pub async fn internal_post_acknowledge(
    State(state): State<RosterState>,
    session: RosterSession,
) -> RosterResult<Markup> {
    let view = session.dispatch(RosterAction::Acknowledge).await?;
    Ok(state.render_roster(&view))
}
