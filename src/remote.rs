use crate::{
    config::ApiConfig,
    data::student::{Student, StudentDraft},
    error::{
        BuildAvatarPartSnafu, DecodeStudentsSnafu, RemoteAction, RemoteStatusSnafu, RosterResult,
        SendRequestSnafu, UnaddressableIdSnafu, UnusableBaseUrlSnafu,
    },
};
use reqwest::{
    Client, RequestBuilder, Response,
    multipart::{Form, Part},
};
use snafu::{OptionExt, ResultExt, ensure};
use std::sync::Arc;
use url::Url;

/// Thin client over the remote student service.
#[derive(Clone, Debug)]
pub struct StudentsClient {
    client: Client,
    api: Arc<ApiConfig>,
}

impl StudentsClient {
    pub fn new(api: Arc<ApiConfig>) -> Self {
        //no timeout: the page waits on the network stack like a browser would
        Self {
            client: Client::new(),
            api,
        }
    }

    /// Appends `segments` to the service URL, percent-encoding each one so that `/`, `?` or `#`
    /// inside a segment stay part of it.
    fn endpoint(&self, segments: &[&str]) -> RosterResult<Url> {
        let mut url = self.api.base_url().clone();
        url.path_segments_mut()
            .ok()
            .context(UnusableBaseUrlSnafu {
                url: self.api.base_url().as_str(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn collection_url(&self) -> RosterResult<Url> {
        self.endpoint(&["api", "students"])
    }

    fn resource_url(&self, id: Option<&str>) -> RosterResult<Url> {
        match id {
            Some(id) => {
                //dot segments are dropped when appended, which would retarget the request
                ensure!(
                    !matches!(id, "" | "." | ".."),
                    UnaddressableIdSnafu { id }
                );
                self.endpoint(&["api", "student", id])
            }
            None => self.endpoint(&["api", "student"]),
        }
    }

    async fn send(request: RequestBuilder, action: RemoteAction) -> RosterResult<Response> {
        debug!(%action, "Calling student service");
        let response = request.send().await.context(SendRequestSnafu { action })?;

        let status = response.status();
        snafu::ensure!(status.is_success(), RemoteStatusSnafu { status, action });
        Ok(response)
    }

    pub async fn list_students(&self) -> RosterResult<Vec<Student>> {
        Self::send(self.client.get(self.collection_url()?), RemoteAction::ListStudents)
            .await?
            .json()
            .await
            .context(DecodeStudentsSnafu)
    }

    pub async fn create_student(&self, draft: &StudentDraft) -> RosterResult<()> {
        let form = draft_to_multipart(draft)?;
        Self::send(
            self.client.post(self.resource_url(None)?).multipart(form),
            RemoteAction::CreateStudent,
        )
        .await?;
        Ok(())
    }

    pub async fn update_student(&self, id: &str, draft: &StudentDraft) -> RosterResult<()> {
        let form = draft_to_multipart(draft)?;
        Self::send(
            self.client.patch(self.resource_url(Some(id))?).multipart(form),
            RemoteAction::UpdateStudent,
        )
        .await?;
        Ok(())
    }

    pub async fn delete_student(&self, id: &str) -> RosterResult<()> {
        Self::send(
            self.client.delete(self.resource_url(Some(id))?),
            RemoteAction::DeleteStudent,
        )
        .await?;
        Ok(())
    }
}

/// Every form field goes into the body; the identifier only ever travels in the path.
pub fn draft_to_multipart(draft: &StudentDraft) -> RosterResult<Form> {
    let fields = &draft.fields;
    let form = Form::new()
        .text("name", fields.name.clone())
        .text("email", fields.email.clone())
        .text("phone", fields.phone.clone())
        .text("enrollNumber", fields.enroll_number.clone())
        .text("dateOfAdmission", fields.date_of_admission.clone());

    Ok(match (&draft.avatar_upload, &draft.existing_avatar) {
        (Some(upload), _) => {
            let part = Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone())
                .mime_str(&upload.content_type)
                .context(BuildAvatarPartSnafu)?;
            form.part("avatar", part)
        }
        (None, Some(existing)) => form.text("avatar", existing.clone()),
        (None, None) => form,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::{AvatarUpload, DraftFields};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, method, path},
    };

    const PNG_HEADER: [u8; 16] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    //the avatar bytes make the body invalid UTF-8, so match on raw bytes
    fn body_contains_bytes(needle: &'static [u8]) -> impl Fn(&wiremock::Request) -> bool {
        move |request| request.body.windows(needle.len()).any(|w| w == needle)
    }

    fn client_for(server: &MockServer) -> StudentsClient {
        StudentsClient::new(Arc::new(
            ApiConfig::with_base_url(server.uri(), None).unwrap(),
        ))
    }

    fn bob_draft() -> StudentDraft {
        StudentDraft {
            fields: DraftFields {
                name: "Bob".into(),
                email: "bob@example.org".into(),
                phone: "555".into(),
                enroll_number: "E-2".into(),
                date_of_admission: "2024-01-15".into(),
            },
            ..StudentDraft::default()
        }
    }

    #[tokio::test]
    async fn lists_students() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"_id": "1", "name": "Alice", "email": "a@example.org", "phone": "1",
                 "enrollNumber": "E-1", "dateOfAdmission": "2024-09-01", "avatar": null}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let students = client_for(&server).list_students().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "1");
        assert_eq!(students[0].name, "Alice");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/students"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).list_students().await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::RosterError::RemoteStatus {
                action: RemoteAction::ListStudents,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_posts_multipart_without_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/student"))
            .and(body_string_contains("name=\"enrollNumber\""))
            .and(body_string_contains("Bob"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).create_student(&bob_draft()).await.unwrap();
    }

    #[tokio::test]
    async fn update_patches_the_targeted_student() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/student/42"))
            .and(body_string_contains("name=\"avatar\""))
            .and(body_string_contains("bob.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut draft = bob_draft();
        draft.existing_avatar = Some("bob.png".into());
        client_for(&server).update_student("42", &draft).await.unwrap();
    }

    #[tokio::test]
    async fn new_avatar_is_sent_as_a_file_part() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/student"))
            .and(body_contains_bytes(b"filename=\"face.png\""))
            .and(body_contains_bytes(b"image/png"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let mut draft = bob_draft();
        draft.existing_avatar = Some("old.png".into());
        draft.avatar_upload =
            Some(AvatarUpload::new("face.png".into(), None, PNG_HEADER.to_vec()).unwrap());
        client_for(&server).create_student(&draft).await.unwrap();
    }

    #[tokio::test]
    async fn delete_targets_the_identifier() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/student/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_student("7").await.unwrap();
    }

    #[tokio::test]
    async fn identifiers_are_escaped_into_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/student/a%2Fb%3Fc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/student/..%2Fstudents"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete_student("a/b?c").await.unwrap();
        client
            .update_student("../students", &bob_draft())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dot_segment_identifiers_are_refused() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for id in ["", ".", ".."] {
            let err = client.delete_student(id).await.unwrap_err();
            assert!(matches!(
                err,
                crate::error::RosterError::UnaddressableId { .. }
            ));
        }
    }

    #[tokio::test]
    async fn service_under_a_sub_path_keeps_its_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/api/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiConfig::with_base_url(format!("{}/v1/", server.uri()), None).unwrap();
        let students = StudentsClient::new(Arc::new(api))
            .list_students()
            .await
            .unwrap();
        assert!(students.is_empty());
    }

    #[tokio::test]
    async fn unreachable_service_is_a_send_error() {
        let client = StudentsClient::new(Arc::new(
            ApiConfig::with_base_url("http://127.0.0.1:1", None).unwrap(),
        ));
        let err = client.delete_student("7").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::RosterError::SendRequest {
                action: RemoteAction::DeleteStudent,
                ..
            }
        ));
    }
}
