use crate::{
    config::ApiConfig,
    data::admission_date,
    error::{NotAnImageSnafu, RosterResult},
};
use maud::{Markup, Render, html};
use serde::{Deserialize, Serialize};

/// One student as the student service knows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub enroll_number: String,
    pub date_of_admission: String,
    pub avatar: Option<String>,
}

impl Student {
    pub fn admission_date_display(&self) -> String {
        admission_date::display(&self.date_of_admission)
    }
}

/// The name cell: avatar thumbnail (or a placeholder) next to the name.
pub struct NameWithAvatar<'a> {
    pub student: &'a Student,
    pub api: &'a ApiConfig,
}

impl Render for NameWithAvatar<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="flex flex-row items-center space-x-2" {
                @if let Some(avatar) = self.student.avatar.as_deref().filter(|a| !a.is_empty()) {
                    img src=(self.api.avatar_url(avatar)) alt="avatar" class="w-20 h-20 rounded object-cover";
                } @else {
                    div class="mr-2 text-sm italic text-gray-400" {"No Avatar"}
                }
                span {(self.student.name)}
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Checks the bytes actually look like an image before anything is sent on.
    pub fn new(file_name: String, declared_content_type: Option<String>, bytes: Vec<u8>) -> RosterResult<Self> {
        snafu::ensure!(infer::is_image(&bytes), NotAnImageSnafu { file_name });

        let content_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .or(declared_content_type)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

/// The text fields of the create/edit form, as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub enroll_number: String,
    pub date_of_admission: String,
}

/// Form data bound to the create/edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub fields: DraftFields,
    /// Reference to the avatar the record already has, if any.
    pub existing_avatar: Option<String>,
    /// A newly chosen file, which replaces `existing_avatar` on submit.
    pub avatar_upload: Option<AvatarUpload>,
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            fields: DraftFields {
                name: student.name.clone(),
                email: student.email.clone(),
                phone: student.phone.clone(),
                enroll_number: student.enroll_number.clone(),
                date_of_admission: student.date_of_admission.clone(),
            },
            existing_avatar: student.avatar.clone(),
            avatar_upload: None,
        }
    }
}

impl StudentDraft {
    /// Takes in a fresh submission. A submission without a file keeps whichever file was already chosen.
    pub fn merge_submission(&mut self, fields: DraftFields, avatar_upload: Option<AvatarUpload>) {
        self.fields = fields;
        if avatar_upload.is_some() {
            self.avatar_upload = avatar_upload;
        }
    }
}
