//! Everything the roster page shows, as one serializable value.
//!
//! [`RosterView::reduce`] is the only way the state changes. Handlers do the remote
//! calls themselves and feed the outcome back in as an action, so every transition
//! can be tested without a network.

use crate::data::student::{AvatarUpload, DraftFields, Student, StudentDraft};
use serde::{Deserialize, Serialize};
use table::{SortColumn, SortState, TablePage, filter_by_name, paginate, sort_rows};

pub mod table;

/// Which request a form submission turns into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormMode {
    Create,
    Edit(String),
}

/// At most one modal is ever open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    #[default]
    Closed,
    Form {
        mode: FormMode,
        draft: StudentDraft,
    },
    ConfirmDelete {
        id: String,
        name: String,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcknowledgmentKind {
    Success,
    Error,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub kind: AcknowledgmentKind,
    pub title: String,
    pub text: String,
}

impl Acknowledgment {
    fn new(kind: AcknowledgmentKind, title: &str, text: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    fn saved(mode: &FormMode) -> Self {
        match mode {
            FormMode::Create => Self::new(
                AcknowledgmentKind::Success,
                "Saved successfully",
                "The student has been successfully added!",
            ),
            FormMode::Edit(_) => Self::new(
                AcknowledgmentKind::Success,
                "Updated successfully",
                "The student information has been successfully updated!",
            ),
        }
    }

    fn failed(failure: FailureKind) -> Self {
        match failure {
            FailureKind::Fetch => Self::new(
                AcknowledgmentKind::Error,
                "Oops...",
                "Something went wrong while loading the students!",
            ),
            FailureKind::Save => Self::new(
                AcknowledgmentKind::Error,
                "Oops...",
                "Something went wrong while saving the student!",
            ),
            FailureKind::Update => Self::new(
                AcknowledgmentKind::Error,
                "Oops...",
                "Something went wrong while updating the student information!",
            ),
            FailureKind::Delete => Self::new(
                AcknowledgmentKind::Error,
                "Error!",
                "Something went wrong while deleting the student.",
            ),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Fetch,
    Save,
    Update,
    Delete,
}

impl From<&FormMode> for FailureKind {
    fn from(mode: &FormMode) -> Self {
        match mode {
            FormMode::Create => Self::Save,
            FormMode::Edit(_) => Self::Update,
        }
    }
}

/// How the delete confirmation was closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteResolution {
    Confirmed,
    Cancelled,
    /// Backdrop click or escape: neither button was pressed.
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterAction {
    RosterLoaded(Vec<Student>),
    RosterLoadFailed,
    SetSearch(String),
    SortBy(SortColumn),
    GoToPage(usize),
    OpenCreateForm,
    OpenEditForm(Student),
    CloseForm,
    DraftSubmitted {
        fields: DraftFields,
        avatar_upload: Option<AvatarUpload>,
    },
    SubmitSucceeded(FormMode),
    SubmitFailed(FormMode),
    RequestDelete {
        id: String,
        name: String,
    },
    ResolveDelete(DeleteResolution),
    DeleteSucceeded(String),
    DeleteFailed,
    Acknowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterView {
    pub students: Vec<Student>,
    pub search: String,
    pub sort: SortState,
    /// 1-based; clamped when rendered.
    pub page: usize,
    pub overlay: Overlay,
    pub acknowledgment: Option<Acknowledgment>,
}

impl Default for RosterView {
    fn default() -> Self {
        Self {
            students: vec![],
            search: String::new(),
            sort: SortState::default(),
            page: 1,
            overlay: Overlay::Closed,
            acknowledgment: None,
        }
    }
}

impl RosterView {
    #[must_use]
    pub fn reduce(mut self, action: RosterAction) -> Self {
        match action {
            RosterAction::RosterLoaded(students) => {
                self.students = students;
            }
            RosterAction::RosterLoadFailed => {
                //a refresh after a successful save must not hide the "saved" dialog
                self.acknowledgment
                    .get_or_insert_with(|| Acknowledgment::failed(FailureKind::Fetch));
            }
            RosterAction::SetSearch(search) => {
                self.search = search;
                self.page = 1;
            }
            RosterAction::SortBy(column) => {
                self.sort = self.sort.clicked(column);
            }
            RosterAction::GoToPage(page) => {
                self.page = page.max(1);
            }
            RosterAction::OpenCreateForm => {
                self.overlay = Overlay::Form {
                    mode: FormMode::Create,
                    draft: StudentDraft::default(),
                };
            }
            RosterAction::OpenEditForm(student) => {
                self.overlay = Overlay::Form {
                    draft: StudentDraft::from(&student),
                    mode: FormMode::Edit(student.id),
                };
            }
            RosterAction::CloseForm => {
                if matches!(self.overlay, Overlay::Form { .. }) {
                    self.overlay = Overlay::Closed;
                }
            }
            RosterAction::DraftSubmitted {
                fields,
                avatar_upload,
            } => {
                if let Overlay::Form { draft, .. } = &mut self.overlay {
                    draft.merge_submission(fields, avatar_upload);
                }
            }
            RosterAction::SubmitSucceeded(mode) => {
                if matches!(&self.overlay, Overlay::Form { mode: open, .. } if *open == mode) {
                    self.overlay = Overlay::Closed;
                }
                self.acknowledgment = Some(Acknowledgment::saved(&mode));
            }
            RosterAction::SubmitFailed(mode) => {
                self.acknowledgment = Some(Acknowledgment::failed(FailureKind::from(&mode)));
            }
            RosterAction::RequestDelete { id, name } => {
                self.overlay = Overlay::ConfirmDelete { id, name };
            }
            RosterAction::ResolveDelete(resolution) => {
                if matches!(self.overlay, Overlay::ConfirmDelete { .. }) {
                    self.overlay = Overlay::Closed;
                    if resolution == DeleteResolution::Cancelled {
                        self.acknowledgment = Some(Acknowledgment::new(
                            AcknowledgmentKind::Neutral,
                            "Cancelled",
                            "Your student is safe :)",
                        ));
                    }
                }
            }
            RosterAction::DeleteSucceeded(id) => {
                self.students.retain(|student| student.id != id);
                self.acknowledgment = Some(Acknowledgment::new(
                    AcknowledgmentKind::Success,
                    "Deleted!",
                    "The student has been deleted.",
                ));
            }
            RosterAction::DeleteFailed => {
                self.acknowledgment = Some(Acknowledgment::failed(FailureKind::Delete));
            }
            RosterAction::Acknowledge => {
                self.acknowledgment = None;
            }
        }

        self
    }

    pub fn apply(&mut self, action: RosterAction) {
        *self = std::mem::take(self).reduce(action);
    }

    pub fn find_student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    /// The open form's mode and draft, if a form is open.
    pub fn open_form(&self) -> Option<(&FormMode, &StudentDraft)> {
        match &self.overlay {
            Overlay::Form { mode, draft } => Some((mode, draft)),
            _ => None,
        }
    }

    pub fn pending_delete(&self) -> Option<&str> {
        match &self.overlay {
            Overlay::ConfirmDelete { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Search, then sort, then cut out the current page.
    pub fn visible_rows(&self, page_size: usize) -> TablePage<'_> {
        let mut rows = filter_by_name(&self.students, &self.search);
        sort_rows(&mut rows, self.sort);
        paginate(rows, self.page, page_size)
    }
}
