use crate::{
    config::RuntimeConfiguration,
    error::{RosterResult, SessionSnafu},
    remote::StudentsClient,
    routes::roster::render_roster_region,
    view::{RosterAction, RosterView},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use maud::{DOCTYPE, Markup, html};
use snafu::ResultExt;
use tower_sessions::{MemoryStore, Session};

const VIEW_KEY: &str = "roster_view";

#[derive(Clone, Debug)]
pub struct RosterState {
    config: RuntimeConfiguration,
    client: StudentsClient,
    sessions: MemoryStore,
}

impl RosterState {
    pub fn new(config: RuntimeConfiguration) -> Self {
        let client = StudentsClient::new(config.api_config());

        Self {
            config,
            client,
            sessions: MemoryStore::default(),
        }
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    pub const fn client(&self) -> &StudentsClient {
        &self.client
    }

    pub fn session_store(&self) -> MemoryStore {
        self.sessions.clone()
    }

    /// Replaces the roster with whatever the student service has now.
    pub async fn refresh_roster(&self, view: &mut RosterView) {
        match self.client.list_students().await {
            Ok(students) => {
                debug!(count = students.len(), "Fetched students");
                view.apply(RosterAction::RosterLoaded(students));
            }
            Err(e) => {
                error!(?e, "Error fetching students");
                view.apply(RosterAction::RosterLoadFailed);
            }
        }
    }

    pub fn render_roster(&self, view: &RosterView) -> Markup {
        render_roster_region(
            view,
            &self.config.api_config(),
            self.config.table_config().page_size,
        )
    }

    pub fn render(markup: &Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Students" }
                }
                body class="bg-gray-900 min-h-screen flex flex-row text-white" {
                    (markup)
                }
            }
        }
    }
}

/// The roster page as one browser sees it. Every browser session gets its own view, so
/// search, sorting and open dialogs never leak between admins.
#[derive(Clone, Debug)]
pub struct RosterSession(Session);

impl<S> FromRequestParts<S> for RosterSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self)
    }
}

impl RosterSession {
    pub async fn load(&self) -> RosterResult<RosterView> {
        Ok(self
            .0
            .get(VIEW_KEY)
            .await
            .context(SessionSnafu)?
            .unwrap_or_default())
    }

    pub async fn save(&self, view: &RosterView) -> RosterResult<()> {
        self.0.insert(VIEW_KEY, view).await.context(SessionSnafu)
    }

    /// Loads the view, applies one action and saves it again.
    pub async fn dispatch(&self, action: RosterAction) -> RosterResult<RosterView> {
        let mut view = self.load().await?;
        view.apply(action);
        self.save(&view).await?;
        Ok(view)
    }
}
