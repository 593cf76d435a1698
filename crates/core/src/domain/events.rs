use super::job::{JobKey, TaskSnapshot};

/// A decoded, validated progress report for one task of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub key: JobKey,
    pub snapshot: TaskSnapshot,
}

/// Terminal signal for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub key: JobKey,
    /// `None` on success, the backend's message otherwise
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Domain events delivered on the backend's progress channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A task of some job made progress
    Progress(ProgressEvent),

    /// A job finished, successfully or not
    Finished(JobOutcome),
}

impl Event {
    pub fn key(&self) -> &JobKey {
        match self {
            Event::Progress(progress) => &progress.key,
            Event::Finished(outcome) => &outcome.key,
        }
    }
}
