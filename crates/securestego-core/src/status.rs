//! The state machine shared by both workflows.
//!
//! Transitions are a pure function of `(status, event)`, the workflows only
//! decide which event to feed.

use log::{debug, warn};

use crate::progress::Checkpoint;
use crate::WorkflowError;

#[derive(Debug)]
pub enum WorkflowStatus<R> {
    Idle,
    Validating,
    Submitting(Checkpoint),
    Success(R),
    Failure(WorkflowError),
}

impl<R> Default for WorkflowStatus<R> {
    fn default() -> Self {
        WorkflowStatus::Idle
    }
}

#[derive(Debug)]
pub enum WorkflowEvent<R> {
    /// The user asked to submit.
    Submit,
    /// A precondition failed, no request was sent.
    Rejected(WorkflowError),
    /// The request reached the next checkpoint.
    Progress(Checkpoint),
    Completed(R),
    Failed(WorkflowError),
    /// Inputs were cleared or replaced.
    Reset,
}

impl<R> WorkflowEvent<R> {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::Submit => "Submit",
            WorkflowEvent::Rejected(_) => "Rejected",
            WorkflowEvent::Progress(_) => "Progress",
            WorkflowEvent::Completed(_) => "Completed",
            WorkflowEvent::Failed(_) => "Failed",
            WorkflowEvent::Reset => "Reset",
        }
    }
}

impl<R> WorkflowStatus<R> {
    pub fn apply(self, event: WorkflowEvent<R>) -> Self {
        use WorkflowEvent as E;
        use WorkflowStatus as S;

        match (self, event) {
            (S::Submitting(c), E::Submit) => S::Submitting(c),
            (_, E::Submit) => S::Validating,
            (S::Validating, E::Rejected(e)) => S::Failure(e),
            (S::Validating | S::Submitting(_), E::Progress(c)) => S::Submitting(c),
            (S::Submitting(_), E::Completed(r)) => S::Success(r),
            (S::Submitting(_), E::Failed(e)) => S::Failure(e),
            (S::Submitting(c), E::Reset) => S::Submitting(c),
            (_, E::Reset) => S::Idle,
            (status, event) => {
                debug!("ignoring {} in state {}", event.name(), status.name());
                status
            }
        }
    }

    /// In place variant of [`Self::apply`].
    pub fn advance(&mut self, event: WorkflowEvent<R>) {
        let current = std::mem::take(self);
        *self = current.apply(event);
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkflowStatus::Idle => "Idle",
            WorkflowStatus::Validating => "Validating",
            WorkflowStatus::Submitting(_) => "Submitting",
            WorkflowStatus::Success(_) => "Success",
            WorkflowStatus::Failure(_) => "Failure",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, WorkflowStatus::Submitting(_))
    }

    pub fn progress(&self) -> Option<&Checkpoint> {
        match self {
            WorkflowStatus::Submitting(c) => Some(c),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&R> {
        match self {
            WorkflowStatus::Success(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        match self {
            WorkflowStatus::Failure(e) => Some(e),
            _ => None,
        }
    }
}

/// Holds the status for the duration of one submission.
///
/// If the submitting future is dropped before it settles, the status is moved
/// to `Failure` so the form does not stay locked.
pub(crate) struct InFlight<'a, R> {
    status: &'a mut WorkflowStatus<R>,
}

impl<'a, R> InFlight<'a, R> {
    pub(crate) fn new(status: &'a mut WorkflowStatus<R>) -> Self {
        Self { status }
    }

    pub(crate) fn advance(&mut self, event: WorkflowEvent<R>) {
        self.status.advance(event);
    }
}

impl<R> Drop for InFlight<'_, R> {
    fn drop(&mut self) {
        if self.status.is_submitting() {
            warn!("submission dropped before it completed");
            self.status.advance(WorkflowEvent::Failed(WorkflowError::RequestFailed(
                INTERRUPTED.to_string(),
            )));
        }
    }
}

pub const INTERRUPTED: &str = "The request was interrupted before it completed";

/// Inline notice rendered above the submit action.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Banner {
    Success(String),
    /// The main operation succeeded but an ancillary step did not.
    Partial(String),
    Error(String),
}

impl Banner {
    pub fn text(&self) -> &str {
        match self {
            Banner::Success(t) | Banner::Partial(t) | Banner::Error(t) => t,
        }
    }
}
