use crate::{
    data::{
        admission_date,
        student::{AvatarUpload, DraftFields, StudentDraft},
    },
    error::{
        AvatarTooLargeSnafu, MissingStudentSnafu, MultipartSnafu, NoFormOpenSnafu, RosterResult,
    },
    maud_conveniences::{form_element, modal, simple_form_element, title},
    state::{RosterSession, RosterState},
    view::{FormMode, RosterAction},
};
use axum::extract::{Multipart, Query, State};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt, ensure};

pub fn render_student_form(mode: &FormMode, draft: &StudentDraft) -> Markup {
    let fields = &draft.fields;

    modal(
        "z-40",
        "/internal/student_form/close",
        html! {
            div hx-post="/internal/student_form/close" hx-trigger="keyup[key=='Escape'] from:body" hx-target="#roster" {
                @match mode {
                    FormMode::Create => { (title("Add Student")) },
                    FormMode::Edit(_) => { (title("Edit Student")) },
                }

                form id="student_form" hx-post="/internal/student_form" hx-trigger="submit" hx-target="#roster" hx-encoding="multipart/form-data" {
                    //first, so it survives a body that gets cut off later on
                    @if let FormMode::Edit(id) = mode {
                        input type="hidden" name="id" value=(id);
                    }
                    (simple_form_element("name", "Name", None, "Enter name", &fields.name))
                    (simple_form_element("email", "Email", Some("email"), "Enter email", &fields.email))
                    (simple_form_element("phone", "Phone", Some("tel"), "Enter phone", &fields.phone))
                    (simple_form_element("enrollNumber", "Enroll Number", None, "Enter enroll number", &fields.enroll_number))
                    (simple_form_element("dateOfAdmission", "Date of Admission", Some("date"), "Enter date of admission", &admission_date::input_value(&fields.date_of_admission)))

                    (form_element("avatar", "Avatar", html! {
                        @if let Some(upload) = &draft.avatar_upload {
                            p class="text-sm italic text-gray-400 mb-2" {"Chosen: " (upload.file_name)}
                        } @else if let Some(existing) = &draft.existing_avatar {
                            p class="text-sm italic text-gray-400 mb-2" {"Current: " (existing)}
                        }
                        input type="file" id="avatar" name="avatar" accept="image/*" class="block w-full text-sm text-gray-300 file:mr-4 file:py-2 file:px-4 file:rounded file:border-0 file:text-sm file:font-semibold file:bg-violet-50 file:text-violet-700 hover:file:bg-violet-100";
                    }))

                    div class="flex items-center justify-end space-x-2" {
                        button type="button" class="bg-gray-600 hover:bg-gray-700 font-bold py-2 px-4 rounded" hx-post="/internal/student_form/close" hx-target="#roster" {
                            "Close"
                        }
                        button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                            @match mode {
                                FormMode::Create => { "Save" },
                                FormMode::Edit(_) => { "Update" },
                            }
                        }
                    }
                }
            }
        },
    )
}

#[derive(Deserialize)]
pub struct OptionalIdQuery {
    id: Option<String>,
}

/// No id opens an empty create form, an id opens the edit form for that student.
pub async fn internal_get_student_form(
    State(state): State<RosterState>,
    session: RosterSession,
    Query(OptionalIdQuery { id }): Query<OptionalIdQuery>,
) -> RosterResult<Markup> {
    let mut view = session.load().await?;
    let action = match id {
        None => RosterAction::OpenCreateForm,
        Some(id) => {
            let student = view
                .find_student(&id)
                .cloned()
                .context(MissingStudentSnafu { id })?;
            RosterAction::OpenEditForm(student)
        }
    };

    view.apply(action);
    session.save(&view).await?;
    Ok(state.render_roster(&view))
}

pub async fn internal_post_close_student_form(
    State(state): State<RosterState>,
    session: RosterSession,
) -> RosterResult<Markup> {
    let view = session.dispatch(RosterAction::CloseForm).await?;
    Ok(state.render_roster(&view))
}

struct RawAvatar {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// What one press of Save/Update sent, as far as it could be read.
#[derive(Default)]
struct Submission {
    id: Option<String>,
    fields: DraftFields,
    avatar: Option<RawAvatar>,
}

impl Submission {
    fn mode(&self) -> FormMode {
        self.id.clone().map_or(FormMode::Create, FormMode::Edit)
    }
}

/// Fills `submission` field by field, so whatever arrived before an error is kept.
async fn read_submission(
    multipart: &mut Multipart,
    submission: &mut Submission,
    max_avatar_bytes: usize,
) -> RosterResult<()> {
    while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == "avatar" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field.bytes().await.context(MultipartSnafu)?;

            //browsers send an empty part when no file was picked
            if !bytes.is_empty() {
                ensure!(
                    bytes.len() <= max_avatar_bytes,
                    AvatarTooLargeSnafu {
                        file_name,
                        limit: max_avatar_bytes
                    }
                );
                submission.avatar = Some(RawAvatar {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.context(MultipartSnafu)?;
        let fields = &mut submission.fields;
        match name.as_str() {
            "id" => submission.id = Some(value),
            "name" => fields.name = value,
            "email" => fields.email = value,
            "phone" => fields.phone = value,
            "enrollNumber" => fields.enroll_number = value,
            "dateOfAdmission" => fields.date_of_admission = value,
            other => warn!(?other, "Ignoring unknown student form field"),
        }
    }

    Ok(())
}

/// The submission says which form it came from, and is only sent on if that form is still the
/// open one. Otherwise another tab has replaced it and the submission is refused.
pub async fn internal_post_student_form(
    State(state): State<RosterState>,
    session: RosterSession,
    mut multipart: Multipart,
) -> RosterResult<Markup> {
    let mut submission = Submission::default();
    let read = read_submission(
        &mut multipart,
        &mut submission,
        state.config().table_config().max_avatar_bytes,
    )
    .await;
    let mode = submission.mode();

    let mut view = session.load().await?;
    let open_mode = view
        .open_form()
        .map(|(mode, _)| mode.clone())
        .context(NoFormOpenSnafu)?;

    if open_mode != mode {
        warn!(?mode, ?open_mode, "Submission is for a form that is no longer open");
        view.apply(RosterAction::SubmitFailed(mode));
        session.save(&view).await?;
        return Ok(state.render_roster(&view));
    }

    let Submission { fields, avatar, .. } = submission;
    let avatar_upload = read.and_then(|()| {
        avatar
            .map(|raw| AvatarUpload::new(raw.file_name, raw.content_type, raw.bytes))
            .transpose()
    });
    let avatar_upload = match avatar_upload {
        Ok(upload) => upload,
        Err(e) => {
            error!(?e, ?mode, "Unable to accept student form");
            if fields != DraftFields::default() {
                view.apply(RosterAction::DraftSubmitted {
                    fields,
                    avatar_upload: None,
                });
            }
            view.apply(RosterAction::SubmitFailed(mode));
            session.save(&view).await?;
            return Ok(state.render_roster(&view));
        }
    };

    view.apply(RosterAction::DraftSubmitted {
        fields,
        avatar_upload,
    });
    let draft = view
        .open_form()
        .map(|(_, draft)| draft.clone())
        .context(NoFormOpenSnafu)?;

    let result = match &mode {
        FormMode::Create => state.client().create_student(&draft).await,
        FormMode::Edit(id) => state.client().update_student(id, &draft).await,
    };

    match result {
        Ok(()) => {
            info!(?mode, name = ?draft.fields.name, "Saved student");
            view.apply(RosterAction::SubmitSucceeded(mode));
            state.refresh_roster(&mut view).await;
        }
        Err(e) => {
            error!(?e, ?mode, "Error saving student");
            view.apply(RosterAction::SubmitFailed(mode));
        }
    }

    session.save(&view).await?;
    Ok(state.render_roster(&view))
}
