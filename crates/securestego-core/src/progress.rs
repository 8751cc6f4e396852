//! Progress checkpoints shown while a request is in flight.
//!
//! The service offers no progress channel, so the indicator is an
//! approximation: each request lifecycle event maps to a fixed label and
//! percentage.

use std::fmt::{self, Display, Formatter};

/// The lifecycle events of a single request.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Lifecycle {
    Started,
    Sent,
    ResponseReceived,
    BodyParsed,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Checkpoint {
    pub label: String,
    /// 0..=100
    pub percent: u8,
}

impl Display for Checkpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}%", self.label, self.percent)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressPlan {
    steps: Vec<(Lifecycle, Checkpoint)>,
}

impl ProgressPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the checkpoint for `event`, percentages above 100 are capped.
    pub fn with_step(mut self, event: Lifecycle, label: impl Into<String>, percent: u8) -> Self {
        let checkpoint = Checkpoint {
            label: label.into(),
            percent: percent.min(100),
        };
        match self.steps.iter_mut().find(|(e, _)| *e == event) {
            Some((_, existing)) => *existing = checkpoint,
            None => self.steps.push((event, checkpoint)),
        }
        self
    }

    pub fn checkpoint(&self, event: Lifecycle) -> Option<&Checkpoint> {
        self.steps
            .iter()
            .find_map(|(e, checkpoint)| (*e == event).then_some(checkpoint))
    }

    pub fn encrypt() -> Self {
        Self::new()
            .with_step(Lifecycle::Started, "Preparing images...", 0)
            .with_step(Lifecycle::Sent, "Embedding secret image...", 30)
            .with_step(Lifecycle::ResponseReceived, "Embedding secret image...", 70)
            .with_step(Lifecycle::BodyParsed, "Encryption complete!", 100)
    }

    pub fn decrypt() -> Self {
        Self::new()
            .with_step(Lifecycle::Started, "Analyzing stego image...", 10)
            .with_step(Lifecycle::Sent, "Extracting hidden image...", 40)
            .with_step(Lifecycle::ResponseReceived, "Applying AI enhancement...", 70)
            .with_step(Lifecycle::BodyParsed, "Recovery complete!", 100)
    }
}
