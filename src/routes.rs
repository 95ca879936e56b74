use crate::{
    routes::{
        delete::{
            delete_student, internal_get_delete_confirmation, internal_post_cancel_delete,
            internal_post_dismiss_delete,
        },
        index::get_index_route,
        roster::{
            internal_get_sorted_students, internal_get_students, internal_get_students_page,
            internal_post_acknowledge,
        },
        student_form::{
            internal_get_student_form, internal_post_close_student_form, internal_post_student_form,
        },
    },
    state::RosterState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tower_sessions::{Expiry, SessionManagerLayer, cookie::time::Duration};

pub mod delete;
pub mod index;
pub mod roster;
pub mod student_form;

//room for the text fields and multipart framing on top of the avatar itself
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: RosterState) -> Router {
    let body_limit = state.config().table_config().max_avatar_bytes + FORM_OVERHEAD_BYTES;
    //the page is served over plain http unless something in front of it terminates tls
    let session_layer = SessionManagerLayer::new(state.session_store())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(12)));

    Router::new()
        .route("/", get(get_index_route))
        .route(
            "/internal/students",
            get(internal_get_students).delete(delete_student),
        )
        .route("/internal/students/sort", get(internal_get_sorted_students))
        .route("/internal/students/page", get(internal_get_students_page))
        .route(
            "/internal/student_form",
            get(internal_get_student_form).post(internal_post_student_form),
        )
        .route(
            "/internal/student_form/close",
            post(internal_post_close_student_form),
        )
        .route("/internal/delete", get(internal_get_delete_confirmation))
        .route("/internal/delete/cancel", post(internal_post_cancel_delete))
        .route("/internal/delete/dismiss", post(internal_post_dismiss_delete))
        .route("/internal/acknowledge", post(internal_post_acknowledge))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(session_layer)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
