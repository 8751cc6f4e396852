use std::fmt::{self, Debug, Formatter};

use log::info;

use super::{drive, FailureMessages, Password, PreparedRequest, ProgressObserver};
use crate::ingestion::{FileIngestion, FileSlot};
use crate::media::{ImageRef, MimeFilter, Preview, SelectedFile};
use crate::progress::{Checkpoint, ProgressPlan};
use crate::status::{Banner, WorkflowEvent, WorkflowStatus};
use crate::transport::contract::RecoverResponse;
use crate::transport::{Endpoint, MultipartForm, Transport};
use crate::{Result, WorkflowError};

pub const RECOVERY_COMPLETE: &str = "Recovery complete!";
pub const AI_ENHANCEMENT_NOTE: &str = "AI enhancement applied successfully";

const PASSWORD_MESSAGES: FailureMessages = FailureMessages {
    rejected: "Decryption failed. Please check your password.",
    unreachable: "An error occurred during decryption",
};

const RSA_MESSAGES: FailureMessages = FailureMessages {
    rejected: "Decryption failed. Please check your private key and encrypted key.",
    unreachable: "An error occurred during decryption",
};

pub fn prepare() -> DecryptWorkflow {
    DecryptWorkflow::default()
}

/// How the secret was protected when it was embedded.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum DecryptMode {
    #[default]
    Password,
    /// Session key wrapped with the recipient's RSA public key
    RsaHybrid,
}

impl DecryptMode {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            DecryptMode::Password => Endpoint::Recover,
            DecryptMode::RsaHybrid => Endpoint::RecoverRsa,
        }
    }

    fn messages(&self) -> FailureMessages {
        match self {
            DecryptMode::Password => PASSWORD_MESSAGES,
            DecryptMode::RsaHybrid => RSA_MESSAGES,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DecryptInput {
    Stego,
    PrivateKey,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DecryptResult {
    pub recovered_image: ImageRef,
}

impl DecryptResult {
    /// Status line with the enhancement note below it.
    pub fn banner(&self) -> Banner {
        Banner::Success(format!("{RECOVERY_COMPLETE}\n{AI_ENHANCEMENT_NOTE}"))
    }
}

/// The stego image next to what was recovered from it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Comparison<'a> {
    pub before: &'a Preview,
    pub after: &'a ImageRef,
}

/// Recovers a hidden image through one of the two recovery services.
pub struct DecryptWorkflow {
    stego_input: FileIngestion,
    key_input: FileIngestion,
    stego: FileSlot,
    private_key: FileSlot,
    mode: DecryptMode,
    password: Password,
    wrapped_key: String,
    plan: ProgressPlan,
    observer: Option<ProgressObserver>,
    status: WorkflowStatus<DecryptResult>,
}

impl Default for DecryptWorkflow {
    fn default() -> Self {
        Self {
            stego_input: FileIngestion::new(),
            // key files carry no reliable MIME type
            key_input: FileIngestion::with_accept(MimeFilter::Any),
            stego: FileSlot::default(),
            private_key: FileSlot::default(),
            mode: DecryptMode::default(),
            password: Password::default(),
            wrapped_key: String::new(),
            plan: ProgressPlan::decrypt(),
            observer: None,
            status: WorkflowStatus::Idle,
        }
    }
}

impl Debug for DecryptWorkflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptWorkflow")
            .field("stego", &self.stego.file())
            .field("mode", &self.mode)
            .field("password", &self.password)
            .field("private_key", &self.private_key.is_set())
            .field("status", &self.status.name())
            .finish()
    }
}

impl DecryptWorkflow {
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

    pub fn ingestion_mut(&mut self, input: DecryptInput) -> &mut FileIngestion {
        match input {
            DecryptInput::Stego => &mut self.stego_input,
            DecryptInput::PrivateKey => &mut self.key_input,
        }
    }

    pub fn slot(&self, input: DecryptInput) -> &FileSlot {
        match input {
            DecryptInput::Stego => &self.stego,
            DecryptInput::PrivateKey => &self.private_key,
        }
    }

    fn slot_mut(&mut self, input: DecryptInput) -> &mut FileSlot {
        match input {
            DecryptInput::Stego => &mut self.stego,
            DecryptInput::PrivateKey => &mut self.private_key,
        }
    }

    pub fn select(&mut self, input: DecryptInput, file: SelectedFile) -> &mut Self {
        self.slot_mut(input).select(file);
        self.status.advance(WorkflowEvent::Reset);
        self
    }

    pub fn clear(&mut self, input: DecryptInput) -> &mut Self {
        self.slot_mut(input).clear();
        self.status.advance(WorkflowEvent::Reset);
        self
    }

    pub fn drop_files(&mut self, input: DecryptInput, files: Vec<SelectedFile>) -> bool {
        match self.ingestion_mut(input).drop_files(files) {
            Some(file) => {
                self.select(input, file);
                true
            }
            None => false,
        }
    }

    pub fn pick_files(&mut self, input: DecryptInput, files: Vec<SelectedFile>) -> bool {
        match self.ingestion_mut(input).pick_files(files) {
            Some(file) => {
                self.select(input, file);
                true
            }
            None => false,
        }
    }

    /// Switching modes keeps the other mode's inputs, they are just not sent.
    pub fn set_mode(&mut self, mode: DecryptMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> DecryptMode {
        self.mode
    }

    pub fn set_password<P: Into<Password>>(&mut self, password: P) -> &mut Self {
        self.password = password.into();
        self
    }

    /// Base64 session key as received from the sender
    pub fn set_wrapped_key<S: Into<String>>(&mut self, key: S) -> &mut Self {
        self.wrapped_key = key.into();
        self
    }

    pub fn status(&self) -> &WorkflowStatus<DecryptResult> {
        &self.status
    }

    pub fn result(&self) -> Option<&DecryptResult> {
        self.status.result()
    }

    pub fn can_submit(&self) -> bool {
        self.stego.is_set() && !self.status.is_submitting()
    }

    pub fn banner(&self) -> Option<Banner> {
        match &self.status {
            WorkflowStatus::Success(result) => Some(result.banner()),
            WorkflowStatus::Failure(e) => Some(Banner::Error(e.to_string())),
            _ => None,
        }
    }

    /// Only available after a successful recovery with a non empty image.
    pub fn comparison(&self) -> Option<Comparison<'_>> {
        let result = self.result()?;
        if result.recovered_image.is_empty() {
            return None;
        }

        Some(Comparison {
            before: self.stego.preview()?,
            after: &result.recovered_image,
        })
    }

    /// Builds the recovery request for the current mode.
    pub fn build_request(&self) -> Result<PreparedRequest> {
        let stego = self.stego.file().ok_or(WorkflowError::MissingStego)?;
        let form = MultipartForm::new().file("stegoImage", stego.clone());

        let form = match self.mode {
            DecryptMode::Password => {
                let password = self.password.get().ok_or(WorkflowError::MissingPassword)?;
                form.text("password", password)
            }
            DecryptMode::RsaHybrid => {
                let key = self
                    .private_key
                    .file()
                    .ok_or(WorkflowError::MissingPrivateKey)?;
                let wrapped_key = self.wrapped_key.trim();
                if wrapped_key.is_empty() {
                    return Err(WorkflowError::MissingWrappedKey);
                }
                form.file("privateKeyFile", key.clone())
                    .text("encryptedKey", wrapped_key)
            }
        };

        Ok(PreparedRequest {
            endpoint: self.mode.endpoint(),
            form,
        })
    }

    pub async fn submit<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<&DecryptResult> {
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

        let messages = self.mode.messages();
        drive(
            &mut self.status,
            &self.plan,
            &mut self.observer,
            transport,
            request,
            messages,
            |body: RecoverResponse| {
                let recovered_image = body
                    .image()
                    .ok_or_else(|| WorkflowError::RequestFailed(messages.rejected.to_string()))?;
                Ok(DecryptResult { recovered_image })
            },
        )
        .await?;

        let result = self
            .status
            .result()
            .ok_or_else(|| WorkflowError::RequestFailed(messages.rejected.to_string()))?;
        info!("recovered image ready ({:?} mode)", self.mode);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{image, private_key, RecordingTransport};
    use crate::transport::{FormValue, ServiceResponse};

    fn with_stego() -> DecryptWorkflow {
        let mut workflow = prepare();
        workflow.select(DecryptInput::Stego, image("stego.png"));
        workflow
    }

    fn rsa_ready() -> DecryptWorkflow {
        let mut workflow = with_stego();
        workflow
            .set_mode(DecryptMode::RsaHybrid)
            .select(DecryptInput::PrivateKey, private_key())
            .set_wrapped_key("  QmFzZTY0\n");
        workflow
    }

    #[tokio::test]
    async fn should_require_a_stego_image_first() {
        let transport = RecordingTransport::new();
        let mut workflow = prepare();
        workflow.set_password("secret");

        let err = workflow.submit(&transport).await.unwrap_err();
        assert!(matches!(err, WorkflowError::MissingStego));
        assert!(!workflow.can_submit());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn should_require_a_password_in_password_mode() {
        let transport = RecordingTransport::new();
        let mut workflow = with_stego();
        workflow.set_password("");

        let err = workflow.submit(&transport).await.unwrap_err();
        assert!(matches!(err, WorkflowError::MissingPassword));
        assert!(matches!(
            workflow.status().error(),
            Some(WorkflowError::MissingPassword)
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn should_require_both_rsa_inputs() {
        let transport = RecordingTransport::new();

        let mut workflow = rsa_ready();
        workflow.clear(DecryptInput::PrivateKey);
        let err = workflow.submit(&transport).await.unwrap_err();
        assert!(matches!(err, WorkflowError::MissingPrivateKey));

        let mut workflow = rsa_ready();
        workflow.set_wrapped_key(" \t\n");
        let err = workflow.submit(&transport).await.unwrap_err();
        assert!(matches!(err, WorkflowError::MissingWrappedKey));

        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn should_keep_the_modes_exclusive() {
        let mut workflow = rsa_ready();
        workflow.set_password("secret");

        let request = workflow.build_request().unwrap();
        assert_eq!(request.endpoint, Endpoint::RecoverRsa);
        assert_eq!(
            request.form.field_names(),
            vec!["stegoImage", "privateKeyFile", "encryptedKey"]
        );
        assert_eq!(
            request.form.get("encryptedKey").and_then(FormValue::as_text),
            Some("QmFzZTY0")
        );

        workflow.set_mode(DecryptMode::Password);
        let request = workflow.build_request().unwrap();
        assert_eq!(request.endpoint, Endpoint::Recover);
        assert_eq!(request.form.field_names(), vec!["stegoImage", "password"]);
    }

    #[test]
    fn should_accept_key_files_of_any_type() {
        let mut workflow = with_stego();
        let key = SelectedFile::new("private.pem", "", b"-----BEGIN".to_vec());
        assert!(workflow.pick_files(DecryptInput::PrivateKey, vec![key]));
        assert!(!workflow.pick_files(DecryptInput::Stego, vec![private_key()]));
    }

    #[tokio::test]
    async fn should_show_the_comparison_after_success() {
        let transport = RecordingTransport::new().respond_with(ServiceResponse::new(
            200,
            r#"{"recoveredImageUrl": "/api/recovered/recovered_stego.png", "message": "ok"}"#,
        ));
        let mut workflow = with_stego();
        workflow.set_password("secret");

        workflow.submit(&transport).await.unwrap();
        let comparison = workflow.comparison().unwrap();
        assert_eq!(comparison.after.as_str(), "/api/recovered/recovered_stego.png");
        assert_eq!(
            Some(comparison.before),
            workflow.slot(DecryptInput::Stego).preview()
        );
        assert_eq!(
            workflow.banner(),
            Some(Banner::Success(
                "Recovery complete!\nAI enhancement applied successfully".into()
            ))
        );

        workflow.clear(DecryptInput::Stego);
        assert!(workflow.comparison().is_none());
    }

    #[tokio::test]
    async fn should_use_the_mode_specific_fallback() {
        let transport = RecordingTransport::new()
            .respond_with(ServiceResponse::new(400, "{}"))
            .respond_with(ServiceResponse::new(400, "{}"));

        let mut workflow = with_stego();
        workflow.set_password("secret");
        let err = workflow.submit(&transport).await.unwrap_err();
        assert_eq!(err.to_string(), PASSWORD_MESSAGES.rejected);

        let mut workflow = rsa_ready();
        let err = workflow.submit(&transport).await.unwrap_err();
        assert_eq!(err.to_string(), RSA_MESSAGES.rejected);
        assert!(workflow.comparison().is_none());
    }

    #[tokio::test]
    async fn should_walk_the_recovery_checkpoints() {
        let transport = RecordingTransport::new()
            .respond_with(ServiceResponse::new(200, r#"{"recoveredImage": "data:,x"}"#));
        let labels = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = labels.clone();

        let mut workflow = with_stego();
        workflow
            .set_password("secret")
            .on_progress(move |c| sink.lock().unwrap().push(c.label.clone()));
        workflow.submit(&transport).await.unwrap();

        assert_eq!(
            *labels.lock().unwrap(),
            vec![
                "Analyzing stego image...",
                "Extracting hidden image...",
                "Applying AI enhancement...",
                "Recovery complete!"
            ]
        );
    }

    #[tokio::test]
    async fn should_not_announce_enhancement_without_a_response() {
        let transport = RecordingTransport::new().fail_with("connection refused");
        let labels = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = labels.clone();

        let mut workflow = with_stego();
        workflow
            .set_password("secret")
            .on_progress(move |c| sink.lock().unwrap().push(c.label.clone()));
        let err = workflow.submit(&transport).await.unwrap_err();

        assert_eq!(err.to_string(), "An error occurred during decryption");
        assert_eq!(
            *labels.lock().unwrap(),
            vec!["Analyzing stego image...", "Extracting hidden image..."]
        );
    }

    #[test]
    fn should_not_leak_secrets_in_debug() {
        let mut workflow = rsa_ready();
        workflow.set_password("hunter2");
        let printed = format!("{workflow:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("QmFzZTY0"));
    }
}
