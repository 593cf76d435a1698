//! State of one "Add Repository" screen instance.
//!
//! This is the synchronous half of the submission coordinator: it owns the
//! progress store, the per-job phases and the notification queue, and it
//! applies decoded events. Anything that waits on the backend lives in the
//! app crate and calls into this type between await points, so no mutation
//! ever spans a suspension.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::app::autofill::parse_repo_url;
use crate::app::store::JobProgressStore;
use crate::app::toasts::{ToastKind, ToastQueue};
use crate::app::validation::{AddRepoForm, FieldError};
use crate::app::view::{self, ProgressViewModel};
use crate::domain::{AddRepoRequest, Event, JobHandle, JobKey, JobOutcome, JobProgress};

/// Overall mode of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenMode {
    /// Collecting input
    #[default]
    Form,
    /// A create request is in flight
    Submitting,
    /// At least one accepted job is streaming progress
    InProgress,
    /// Every job finished successfully
    Done,
    /// No job is running and at least one failed
    Failed,
}

/// Lifecycle of a single job as seen by the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPhase {
    Submitting,
    InProgress,
    Done,
    Failed(String),
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Done | JobPhase::Failed(_))
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("an import for {key} is already running")]
    AlreadyRunning { key: JobKey },

    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

/// What happened to an event handed to [`AddRepoScreen::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Finished,
    /// The job had already reached Done or Failed
    Ignored,
}

#[derive(Debug)]
pub struct AddRepoScreen {
    mode: ScreenMode,
    store: JobProgressStore,
    phases: HashMap<JobKey, JobPhase>,
    /// Finished runs set aside while the same key is resubmitted
    replaced: HashMap<JobKey, (JobPhase, Option<JobProgress>)>,
    toasts: ToastQueue,
    field_errors: Vec<FieldError>,
    last_activity: Option<i64>,
    stale_after_millis: i64,
    degraded: bool,
}

impl AddRepoScreen {
    pub fn new(stale_after_secs: u64, toast_secs: u64) -> Self {
        Self {
            mode: ScreenMode::Form,
            store: JobProgressStore::new(),
            phases: HashMap::new(),
            replaced: HashMap::new(),
            toasts: ToastQueue::new(toast_secs),
            field_errors: Vec::new(),
            last_activity: None,
            stale_after_millis: i64::try_from(stale_after_secs.saturating_mul(1000))
                .unwrap_or(i64::MAX),
            degraded: false,
        }
    }

    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    pub fn store(&self) -> &JobProgressStore {
        &self.store
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn phase(&self, key: &JobKey) -> Option<&JobPhase> {
        self.phases.get(key)
    }

    pub fn view(&self, key: &JobKey) -> ProgressViewModel {
        view::render(&self.store, key)
    }

    /// True while any accepted or pending job has not reached a terminal phase
    pub fn has_running_jobs(&self) -> bool {
        self.phases.values().any(|phase| !phase.is_terminal())
    }

    /// Fill platform, user and repo from a pasted URL.
    /// Failures become an error toast and leave the form untouched.
    pub fn fill_from_url(&mut self, form: &mut AddRepoForm, url: &str, now_millis: i64) -> bool {
        match parse_repo_url(url) {
            Ok(location) => {
                form.platform = Some(location.platform);
                form.user = location.user;
                form.repo = location.repo;
                true
            }
            Err(err) => {
                self.toasts.push(
                    "Failed to Fill Form from URL",
                    err.to_string(),
                    ToastKind::Error,
                    now_millis,
                );
                false
            }
        }
    }

    /// Validate the form and move to Submitting
    pub fn begin_submit(&mut self, form: &AddRepoForm) -> Result<AddRepoRequest, SubmitError> {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.field_errors.clear();

        let key = request.job_key();
        if self.phases.get(&key).is_some_and(|phase| !phase.is_terminal()) {
            return Err(SubmitError::AlreadyRunning { key });
        }

        // A finished run of the same repository starts over with no tasks
        if let Some(previous) = self.phases.insert(key.clone(), JobPhase::Submitting) {
            let progress = self.store.reset(&key);
            self.replaced.insert(key, (previous, progress));
        }
        self.recompute_mode();
        Ok(request)
    }

    /// The backend acknowledged the request; the job is now streaming
    pub fn submission_accepted(
        &mut self,
        request: &AddRepoRequest,
        record_id: i64,
        now_millis: i64,
    ) -> JobHandle {
        let key = request.job_key();
        self.replaced.remove(&key);
        self.store.ensure_job(key.clone());

        // A terminal signal may already have raced ahead of the ack
        let phase = self.phases.entry(key.clone()).or_insert(JobPhase::InProgress);
        if *phase == JobPhase::Submitting {
            *phase = JobPhase::InProgress;
        }

        self.toasts.push(
            "Repository submitted.",
            format!("User: {}\nRepository: {}", request.user, request.repo),
            ToastKind::Info,
            now_millis,
        );
        self.last_activity = Some(now_millis);
        self.recompute_mode();

        JobHandle { record_id, key }
    }

    /// The backend refused the request. A finished run it would have
    /// replaced comes back; otherwise the screen returns to the form.
    pub fn submission_rejected(
        &mut self,
        request: &AddRepoRequest,
        message: &str,
        now_millis: i64,
    ) {
        let key = request.job_key();
        match self.replaced.remove(&key) {
            Some((phase, progress)) => {
                self.phases.insert(key.clone(), phase);
                match progress {
                    Some(job) => self.store.restore(job),
                    None => self.store.remove(&key),
                }
            }
            None => {
                self.phases.remove(&key);
                self.store.remove(&key);
            }
        }

        self.toasts.push("Failed to add repo", message, ToastKind::Error, now_millis);
        self.recompute_mode();
    }

    /// Fold one decoded channel event into the screen
    pub fn apply(&mut self, event: Event, now_millis: i64) -> Applied {
        if self.phases.get(event.key()).is_some_and(JobPhase::is_terminal) {
            debug!("Dropping event for finished job {}", event.key());
            return Applied::Ignored;
        }
        self.last_activity = Some(now_millis);

        match event {
            Event::Progress(progress) => {
                self.store.upsert(progress.key, progress.snapshot);
                Applied::Updated
            }
            Event::Finished(outcome) => {
                self.finish(outcome, now_millis);
                Applied::Finished
            }
        }
    }

    fn finish(&mut self, outcome: JobOutcome, now_millis: i64) {
        let JobOutcome { key, error } = outcome;
        match error {
            None => {
                self.toasts.push(
                    "Successfully added repository.",
                    format!("User: {}\nRepository: {}", key.user, key.repo),
                    ToastKind::Success,
                    now_millis,
                );
                self.phases.insert(key, JobPhase::Done);
            }
            Some(message) => {
                self.toasts.push(
                    "Failed to add repo",
                    format!("{}/{}: {}", key.user, key.repo, message),
                    ToastKind::Error,
                    now_millis,
                );
                self.phases.insert(key, JobPhase::Failed(message));
            }
        }
        self.recompute_mode();
    }

    /// Drop a finished job from view
    pub fn acknowledge(&mut self, key: &JobKey) {
        if self.phases.get(key).is_some_and(JobPhase::is_terminal) {
            self.phases.remove(key);
            self.store.remove(key);
            self.recompute_mode();
        }
    }

    /// Live progress cannot be trusted, e.g. the subscription failed
    pub fn mark_degraded(&mut self) {
        self.degraded = true;
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Jobs are running but nothing arrived within the configured window
    pub fn is_stalled(&self, now_millis: i64) -> bool {
        if !self.has_running_jobs() {
            return false;
        }
        match self.last_activity {
            Some(last) => now_millis.saturating_sub(last) >= self.stale_after_millis,
            None => false,
        }
    }

    /// Release every job; called when the screen goes away
    pub fn teardown(&mut self) {
        self.store.clear();
        self.phases.clear();
        self.replaced.clear();
        self.field_errors.clear();
        self.toasts.clear();
        self.last_activity = None;
        self.mode = ScreenMode::Form;
    }

    fn recompute_mode(&mut self) {
        let phases = || self.phases.values();
        let mode = if phases().any(|p| *p == JobPhase::Submitting) {
            ScreenMode::Submitting
        } else if phases().any(|p| *p == JobPhase::InProgress) {
            ScreenMode::InProgress
        } else if phases().any(|p| matches!(p, JobPhase::Failed(_))) {
            ScreenMode::Failed
        } else if phases().any(|p| *p == JobPhase::Done) {
            ScreenMode::Done
        } else {
            ScreenMode::Form
        };
        self.mode = mode;
    }
}
