//! The encrypt and decrypt workflows.
//!
//! Both share the same submission mechanics: validate, build a fresh request
//! from the current form state, send it once and settle the status.

pub mod decrypt;
pub mod encrypt;
pub mod shared;

pub use shared::Password;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::progress::{Checkpoint, Lifecycle, ProgressPlan};
use crate::status::{InFlight, WorkflowEvent, WorkflowStatus};
use crate::transport::{contract, Endpoint, MultipartForm, ServiceResponse, Transport};
use crate::{Result, WorkflowError};

/// Called with every checkpoint a running submission reaches.
pub type ProgressObserver = Box<dyn FnMut(&Checkpoint) + Send>;

/// A request ready to be sent, built from the form state at submit time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PreparedRequest {
    pub endpoint: Endpoint,
    pub form: MultipartForm,
}

/// The messages a workflow shows when the service does not say more.
#[derive(Debug, Clone, Copy)]
pub struct FailureMessages {
    /// The service answered with a failure status but no usable message
    pub rejected: &'static str,
    /// The exchange itself failed
    pub unreachable: &'static str,
}

struct Submission<'a, R> {
    in_flight: InFlight<'a, R>,
    plan: &'a ProgressPlan,
    observer: &'a mut Option<ProgressObserver>,
}

impl<R> Submission<'_, R> {
    fn enter(&mut self, checkpoint: Checkpoint) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&checkpoint);
        }
        self.in_flight.advance(WorkflowEvent::Progress(checkpoint));
    }

    fn reach(&mut self, event: Lifecycle) {
        if let Some(checkpoint) = self.plan.checkpoint(event) {
            debug!("{:?}: {}", event, checkpoint);
            self.enter(checkpoint.clone());
        }
    }
}

/// Runs one submission and leaves `status` in `Success` or `Failure`.
///
/// `status` must already be `Validating`, `parse` turns the response body of
/// a 2xx answer into the workflow result.
pub(crate) async fn drive<R, B, T, F>(
    status: &mut WorkflowStatus<R>,
    plan: &ProgressPlan,
    observer: &mut Option<ProgressObserver>,
    transport: &T,
    request: PreparedRequest,
    messages: FailureMessages,
    parse: F,
) -> Result<()>
where
    B: DeserializeOwned,
    T: Transport + ?Sized,
    F: FnOnce(B) -> Result<R>,
{
    let mut run = Submission {
        in_flight: InFlight::new(status),
        plan,
        observer,
    };

    // leaving Validating does not depend on the plan
    let started = plan
        .checkpoint(Lifecycle::Started)
        .cloned()
        .unwrap_or_else(|| Checkpoint {
            label: "Submitting...".to_string(),
            percent: 0,
        });
    run.enter(started);

    let endpoint = request.endpoint;
    run.reach(Lifecycle::Sent);
    let response = transport.post_multipart(endpoint, request.form).await;
    // a failed exchange never received anything
    if response.is_ok() {
        run.reach(Lifecycle::ResponseReceived);
    }

    let outcome = response
        .map_err(|e| {
            warn!("request to {} failed: {e}", endpoint.path());
            WorkflowError::RequestFailed(messages.unreachable.to_string())
        })
        .and_then(|response| read_success(response, &messages))
        .and_then(parse);

    match outcome {
        Ok(result) => {
            run.reach(Lifecycle::BodyParsed);
            run.in_flight.advance(WorkflowEvent::Completed(result));
            Ok(())
        }
        Err(e) => {
            run.in_flight.advance(WorkflowEvent::Failed(e.clone()));
            Err(e)
        }
    }
}

/// Turns a service response into its success body or the failure message to show.
pub(crate) fn read_success<B: DeserializeOwned>(
    response: ServiceResponse,
    messages: &FailureMessages,
) -> Result<B> {
    if !response.is_success() {
        let message = contract::error_message(&response.body)
            .unwrap_or_else(|| messages.rejected.to_string());
        warn!("service answered {}: {}", response.status, message);
        return Err(WorkflowError::RequestFailed(message));
    }

    response.json().map_err(|e| {
        warn!("unexpected response body: {e}");
        WorkflowError::RequestFailed(messages.rejected.to_string())
    })
}
