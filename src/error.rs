use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error sending request to {}", action))]
    SendRequest {
        source: reqwest::Error,
        action: RemoteAction,
    },
    #[snafu(display("Student service responded to {} with {}", action, status))]
    RemoteStatus {
        status: reqwest::StatusCode,
        action: RemoteAction,
    },
    #[snafu(display("Error decoding student list"))]
    DecodeStudents { source: reqwest::Error },
    #[snafu(display("Error building avatar upload part"))]
    BuildAvatarPart { source: reqwest::Error },
    #[snafu(display("Error with multipart form input"))]
    Multipart {
        source: axum::extract::multipart::MultipartError,
    },
    #[snafu(display("Avatar {:?} is not an image", file_name))]
    NotAnImage { file_name: String },
    #[snafu(display("Avatar {:?} is larger than the {} byte limit", file_name, limit))]
    AvatarTooLarge { file_name: String, limit: usize },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unable to parse `{}` as a URL", url))]
    InvalidUrl {
        source: url::ParseError,
        url: String,
    },
    #[snafu(display("Unable to add path segments to `{}`", url))]
    UnusableBaseUrl { url: String },
    #[snafu(display("Student ID {:?} cannot be used as a path segment", id))]
    UnaddressableId { id: String },
    #[snafu(display("Error reading or writing the browser session"))]
    Session {
        source: tower_sessions::session::Error,
    },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: String },
    #[snafu(display("Tried to submit a student form, but no form was open"))]
    NoFormOpen,
    #[snafu(display("Unable to listen on {}", address))]
    BindListener {
        source: std::io::Error,
        address: String,
    },
    #[snafu(display("Error serving app"))]
    Serve { source: std::io::Error },
}

/// Which call against the student service failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    ListStudents,
    CreateStudent,
    UpdateStudent,
    DeleteStudent,
}

impl std::fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ListStudents => "list students",
            Self::CreateStudent => "create student",
            Self::UpdateStudent => "update student",
            Self::DeleteStudent => "delete student",
        })
    }
}

impl IntoResponse for RosterError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //remote broke
        const TL: StatusCode = StatusCode::PAYLOAD_TOO_LARGE; //too large

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Roster Error "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::SendRequest { .. } | Self::RemoteStatus { .. } => BG,
            Self::DecodeStudents { .. } => BG,
            Self::BuildAvatarPart { .. } => BI,
            Self::Multipart { source } => source.status(),
            Self::NotAnImage { .. } => BI,
            Self::AvatarTooLarge { .. } => TL,
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } => ISE,
            Self::InvalidUrl { .. } | Self::UnusableBaseUrl { .. } => ISE,
            Self::UnaddressableId { .. } => BI,
            Self::Session { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::NoFormOpen => BI,
            Self::BindListener { .. } | Self::Serve { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()).into_string())).into_response()
    }
}
