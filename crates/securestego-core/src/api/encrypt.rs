use std::fmt::{self, Debug, Formatter};

use log::info;

use super::{drive, FailureMessages, Password, PreparedRequest, ProgressObserver};
use crate::ingestion::{FileIngestion, FileSlot};
use crate::media::{ImageRef, SelectedFile};
use crate::progress::{Checkpoint, ProgressPlan};
use crate::status::{Banner, WorkflowEvent, WorkflowStatus};
use crate::transport::contract::EmbedResponse;
use crate::transport::{Endpoint, MultipartForm, Transport};
use crate::{Result, WorkflowError};

/// Name the stego image is saved under
pub const STEGO_DOWNLOAD_NAME: &str = "stego-image.png";

pub const ENCRYPTION_COMPLETE: &str = "Encryption complete!";
pub const EMAIL_SENT: &str = "Encryption complete! Email sent successfully.";

const MESSAGES: FailureMessages = FailureMessages {
    rejected: "Encryption failed",
    unreachable: "An error occurred during encryption",
};

pub fn prepare() -> EncryptWorkflow {
    EncryptWorkflow::default()
}

/// The file inputs of the encrypt form.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EncryptInput {
    Cover,
    Secret,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EncryptResult {
    pub stego_image: ImageRef,
    /// Base64 session key wrapped for the recipient's public key
    pub wrapped_key: Option<String>,
    pub email_delivery_error: Option<String>,
    pub email_requested: bool,
}

impl EncryptResult {
    /// Embedding worked but the email could not be delivered.
    pub fn is_partial(&self) -> bool {
        self.email_requested && self.email_delivery_error.is_some()
    }

    pub fn banner(&self) -> Banner {
        match (&self.email_delivery_error, self.email_requested) {
            (Some(e), true) => Banner::Partial(format!(
                "Embedding succeeded, but email delivery failed: {e}"
            )),
            (None, true) => Banner::Success(EMAIL_SENT.to_string()),
            _ => Banner::Success(ENCRYPTION_COMPLETE.to_string()),
        }
    }
}

/// Saving the stego image on the client, no request involved.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Download {
    pub file_name: &'static str,
    pub image: ImageRef,
}

/// Hides a secret image in a cover image through the embed service.
pub struct EncryptWorkflow {
    cover_input: FileIngestion,
    secret_input: FileIngestion,
    cover: FileSlot,
    secret: FileSlot,
    password: Password,
    email: String,
    receiver_public_key: String,
    plan: ProgressPlan,
    observer: Option<ProgressObserver>,
    status: WorkflowStatus<EncryptResult>,
}

impl Default for EncryptWorkflow {
    fn default() -> Self {
        Self {
            cover_input: FileIngestion::new(),
            secret_input: FileIngestion::new(),
            cover: FileSlot::default(),
            secret: FileSlot::default(),
            password: Password::default(),
            email: String::new(),
            receiver_public_key: String::new(),
            plan: ProgressPlan::encrypt(),
            observer: None,
            status: WorkflowStatus::Idle,
        }
    }
}

impl Debug for EncryptWorkflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptWorkflow")
            .field("cover", &self.cover.file())
            .field("secret", &self.secret.file())
            .field("password", &self.password)
            .field("email", &self.email)
            .field("status", &self.status.name())
            .finish()
    }
}

impl EncryptWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress_plan(mut self, plan: ProgressPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn on_progress(&mut self, observer: impl FnMut(&Checkpoint) + Send + 'static) -> &mut Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn ingestion_mut(&mut self, input: EncryptInput) -> &mut FileIngestion {
        match input {
            EncryptInput::Cover => &mut self.cover_input,
            EncryptInput::Secret => &mut self.secret_input,
        }
    }

    pub fn slot(&self, input: EncryptInput) -> &FileSlot {
        match input {
            EncryptInput::Cover => &self.cover,
            EncryptInput::Secret => &self.secret,
        }
    }

    fn slot_mut(&mut self, input: EncryptInput) -> &mut FileSlot {
        match input {
            EncryptInput::Cover => &mut self.cover,
            EncryptInput::Secret => &mut self.secret,
        }
    }

    /// Stores `file` in the slot, a new selection discards any previous result.
    pub fn select(&mut self, input: EncryptInput, file: SelectedFile) -> &mut Self {
        self.slot_mut(input).select(file);
        self.status.advance(WorkflowEvent::Reset);
        self
    }

    pub fn clear(&mut self, input: EncryptInput) -> &mut Self {
        self.slot_mut(input).clear();
        self.status.advance(WorkflowEvent::Reset);
        self
    }

    /// Files dropped onto an input, returns whether one was accepted.
    pub fn drop_files(&mut self, input: EncryptInput, files: Vec<SelectedFile>) -> bool {
        match self.ingestion_mut(input).drop_files(files) {
            Some(file) => {
                self.select(input, file);
                true
            }
            None => false,
        }
    }

    /// Files picked in the file dialog of an input, returns whether one was accepted.
    pub fn pick_files(&mut self, input: EncryptInput, files: Vec<SelectedFile>) -> bool {
        match self.ingestion_mut(input).pick_files(files) {
            Some(file) => {
                self.select(input, file);
                true
            }
            None => false,
        }
    }

    pub fn set_password<P: Into<Password>>(&mut self, password: P) -> &mut Self {
        self.password = password.into();
        self
    }

    pub fn set_email<S: Into<String>>(&mut self, email: S) -> &mut Self {
        self.email = email.into();
        self
    }

    /// PEM encoded public key of the recipient
    pub fn set_receiver_public_key<S: Into<String>>(&mut self, pem: S) -> &mut Self {
        self.receiver_public_key = pem.into();
        self
    }

    pub fn status(&self) -> &WorkflowStatus<EncryptResult> {
        &self.status
    }

    pub fn result(&self) -> Option<&EncryptResult> {
        self.status.result()
    }

    /// Mirrors the enabled state of the submit action.
    pub fn can_submit(&self) -> bool {
        self.cover.is_set() && self.secret.is_set() && !self.status.is_submitting()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.email.trim().is_empty() {
            "Encrypt & Embed"
        } else {
            "Encrypt & Send via Email"
        }
    }

    pub fn banner(&self) -> Option<Banner> {
        match &self.status {
            WorkflowStatus::Success(result) => Some(result.banner()),
            WorkflowStatus::Failure(e) => Some(Banner::Error(e.to_string())),
            _ => None,
        }
    }

    /// The wrapped key panel, only present when the service returned one.
    pub fn wrapped_key(&self) -> Option<&str> {
        self.result().and_then(|r| r.wrapped_key.as_deref())
    }

    pub fn download(&self) -> Option<Download> {
        self.result().map(|r| Download {
            file_name: STEGO_DOWNLOAD_NAME,
            image: r.stego_image.clone(),
        })
    }

    /// Builds the embed request from the current form state.
    pub fn build_request(&self) -> Result<PreparedRequest> {
        let (Some(cover), Some(secret)) = (self.cover.file(), self.secret.file()) else {
            return Err(WorkflowError::MissingInput);
        };

        let mut form = MultipartForm::new()
            .file("coverImage", cover.clone())
            .file("secretImage", secret.clone());
        if let Some(password) = self.password.get() {
            form = form.text("password", password);
        }
        if !self.email.trim().is_empty() {
            form = form.text("email", self.email.trim());
        }
        if !self.receiver_public_key.trim().is_empty() {
            form = form.text("receiverPubKey", self.receiver_public_key.trim());
        }

        Ok(PreparedRequest {
            endpoint: Endpoint::Embed,
            form,
        })
    }

    /// Submits the form once, the outcome is also kept in [`Self::status`].
    pub async fn submit<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<&EncryptResult> {
        if self.status.is_submitting() {
            return Err(WorkflowError::SubmissionInFlight);
        }

        self.status.advance(WorkflowEvent::Submit);
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.status.advance(WorkflowEvent::Rejected(e.clone()));
                return Err(e);
            }
        };

        let email_requested = request.form.contains("email");
        drive(
            &mut self.status,
            &self.plan,
            &mut self.observer,
            transport,
            request,
            MESSAGES,
            |body: EmbedResponse| {
                let stego_image = body
                    .image()
                    .ok_or_else(|| WorkflowError::RequestFailed(MESSAGES.rejected.to_string()))?;
                Ok(EncryptResult {
                    stego_image,
                    wrapped_key: body.wrapped_key(),
                    email_delivery_error: body.delivery_error(),
                    email_requested,
                })
            },
        )
        .await?;

        let result = self
            .status
            .result()
            .ok_or_else(|| WorkflowError::RequestFailed(MESSAGES.rejected.to_string()))?;
        info!("stego image ready: {}", summarize(&result.stego_image));
        Ok(result)
    }
}

fn summarize(image: &ImageRef) -> String {
    if image.is_data_uri() {
        format!("inline, {} chars", image.as_str().len())
    } else {
        image.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{image, RecordingTransport};
    use crate::transport::{FormValue, ServiceResponse};
    use std::sync::{Arc, Mutex};

    fn ready() -> EncryptWorkflow {
        let mut workflow = prepare();
        workflow
            .select(EncryptInput::Cover, image("catA.png"))
            .select(EncryptInput::Secret, image("dog.png"));
        workflow
    }

    #[tokio::test]
    async fn should_fail_locally_without_both_images() {
        let transport = RecordingTransport::new();

        for missing in [EncryptInput::Cover, EncryptInput::Secret] {
            let mut workflow = ready();
            workflow.clear(missing);
            assert!(!workflow.can_submit());

            let result = workflow.submit(&transport).await;
            assert!(matches!(result, Err(WorkflowError::MissingInput)));
            assert!(matches!(
                workflow.status().error(),
                Some(WorkflowError::MissingInput)
            ));
        }

        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn should_only_send_filled_optional_fields() {
        let mut workflow = ready();
        workflow.set_password("").set_email("   ");
        let request = workflow.build_request().unwrap();
        assert_eq!(request.endpoint, Endpoint::Embed);
        assert_eq!(request.form.field_names(), vec!["coverImage", "secretImage"]);

        workflow
            .set_password("hunter2")
            .set_email("bob@example.com ")
            .set_receiver_public_key("-----BEGIN PUBLIC KEY-----\n");
        let form = workflow.build_request().unwrap().form;
        assert_eq!(
            form.field_names(),
            vec![
                "coverImage",
                "secretImage",
                "password",
                "email",
                "receiverPubKey"
            ]
        );
        assert_eq!(
            form.get("email").and_then(FormValue::as_text),
            Some("bob@example.com")
        );
    }

    #[test]
    fn should_label_the_submit_action_by_delivery() {
        let mut workflow = ready();
        assert_eq!(workflow.submit_label(), "Encrypt & Embed");
        workflow.set_email("bob@example.com");
        assert_eq!(workflow.submit_label(), "Encrypt & Send via Email");
    }

    #[tokio::test]
    async fn should_report_progress_checkpoints_in_order() {
        let transport = RecordingTransport::new()
            .respond_with(ServiceResponse::new(200, r#"{"stegoImage": "data:,x"}"#));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut workflow = ready();
        workflow.on_progress(move |c| sink.lock().unwrap().push(c.percent));
        workflow.submit(&transport).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0, 30, 70, 100]);
    }

    #[tokio::test]
    async fn should_surface_the_backend_error_verbatim() {
        let transport = RecordingTransport::new().respond_with(ServiceResponse::new(
            500,
            r#"{"error": "Embedding failed: cannot identify image file"}"#,
        ));
        let mut workflow = ready();

        let err = workflow.submit(&transport).await.unwrap_err();
        assert_eq!(err.to_string(), "Embedding failed: cannot identify image file");
        assert_eq!(
            workflow.banner(),
            Some(Banner::Error(
                "Embedding failed: cannot identify image file".into()
            ))
        );
        assert!(workflow.can_submit(), "a failure must leave the form submittable");
    }

    #[tokio::test]
    async fn should_use_the_generic_message_without_a_body() {
        let transport = RecordingTransport::new().respond_with(ServiceResponse::new(502, ""));
        let mut workflow = ready();

        let err = workflow.submit(&transport).await.unwrap_err();
        assert_eq!(err.to_string(), "Encryption failed");
    }

    #[tokio::test]
    async fn should_report_an_unreachable_service() {
        let transport = RecordingTransport::new().fail_with("connection refused");
        let mut workflow = ready();

        let err = workflow.submit(&transport).await.unwrap_err();
        assert_eq!(err.to_string(), "An error occurred during encryption");
        assert_eq!(transport.request_count(), 1, "no retry");
    }

    #[tokio::test]
    async fn should_stop_progress_at_sent_when_the_exchange_fails() {
        let transport = RecordingTransport::new().fail_with("connection refused");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut workflow = ready();
        workflow.on_progress(move |c| sink.lock().unwrap().push(c.percent));
        assert!(workflow.submit(&transport).await.is_err());

        assert_eq!(*seen.lock().unwrap(), vec![0, 30]);
    }

    #[tokio::test]
    async fn should_report_a_received_failure_response() {
        let transport = RecordingTransport::new().respond_with(ServiceResponse::new(500, ""));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut workflow = ready();
        workflow.on_progress(move |c| sink.lock().unwrap().push(c.percent));
        assert!(workflow.submit(&transport).await.is_err());

        assert_eq!(*seen.lock().unwrap(), vec![0, 30, 70]);
    }

    #[tokio::test]
    async fn should_distinguish_partial_success() {
        let transport = RecordingTransport::new().respond_with(ServiceResponse::new(
            200,
            r#"{"stegoImageUrl": "/api/stego/stego_catA.jpg", "emailError": "SMTP credentials are not set"}"#,
        ));
        let mut workflow = ready();
        workflow.set_email("bob@example.com");

        let result = workflow.submit(&transport).await.unwrap();
        assert!(result.is_partial());
        assert!(matches!(workflow.banner(), Some(Banner::Partial(t)) if t.contains("SMTP")));
    }

    #[tokio::test]
    async fn should_confirm_email_delivery() {
        let transport = RecordingTransport::new()
            .respond_with(ServiceResponse::new(200, r#"{"stegoImage": "data:,x"}"#));
        let mut workflow = ready();
        workflow.set_email("bob@example.com");

        workflow.submit(&transport).await.unwrap();
        assert_eq!(workflow.banner(), Some(Banner::Success(EMAIL_SENT.into())));
    }

    #[tokio::test]
    async fn should_fail_when_no_image_comes_back() {
        let transport = RecordingTransport::new()
            .respond_with(ServiceResponse::new(200, r#"{"message": "Embedding successful"}"#));
        let mut workflow = ready();

        assert!(workflow.submit(&transport).await.is_err());
        assert!(workflow.download().is_none());
    }

    #[tokio::test]
    async fn should_offer_the_download_under_a_fixed_name() {
        let transport = RecordingTransport::new().respond_with(ServiceResponse::new(
            200,
            r#"{"stegoImageUrl": "/api/stego/stego_catA.jpg"}"#,
        ));
        let mut workflow = ready();
        workflow.submit(&transport).await.unwrap();

        let download = workflow.download().unwrap();
        assert_eq!(download.file_name, "stego-image.png");
        assert_eq!(download.image.as_str(), "/api/stego/stego_catA.jpg");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn should_discard_the_result_when_inputs_change() {
        let transport = RecordingTransport::new()
            .respond_with(ServiceResponse::new(200, r#"{"stegoImage": "data:,x"}"#));
        let mut workflow = ready();
        workflow.submit(&transport).await.unwrap();
        assert!(workflow.result().is_some());

        workflow.clear(EncryptInput::Secret);
        assert!(workflow.result().is_none());
        assert!(matches!(workflow.status(), WorkflowStatus::Idle));
    }

    #[test]
    fn should_ignore_non_images_offered_to_an_input() {
        let mut workflow = prepare();
        let pdf = SelectedFile::new("notes.pdf", "application/pdf", vec![1]);

        workflow.ingestion_mut(EncryptInput::Cover).drag_enter(1);
        assert!(!workflow.drop_files(EncryptInput::Cover, vec![pdf.clone()]));
        assert!(!workflow.ingestion_mut(EncryptInput::Cover).is_dragging());
        assert!(!workflow.pick_files(EncryptInput::Secret, vec![pdf]));
        assert!(!workflow.slot(EncryptInput::Cover).is_set());

        assert!(workflow.pick_files(EncryptInput::Secret, vec![image("dog.png")]));
        assert!(workflow.slot(EncryptInput::Secret).preview().is_some());
    }
}
