use gitchest_core::app::{
    decode_message, AddRepoForm, AddRepoScreen, Applied, DecodeError, ScreenMode, SubmitError,
    ToastKind,
};
use gitchest_core::domain::JobHandle;
use gitchest_core::ports::{AppConfig, ChannelMessage, Clock, RepoBackend, SubscriptionId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Drives one "Add Repository" screen against the backend
///
/// Owns the only subscription to the progress channel. The subscription
/// callback does nothing but forward raw messages into an unbounded
/// channel; decoding and every store mutation happen here, on the
/// coordinator's task, one message at a time.
pub struct SubmissionCoordinator {
    // Ports (dependency injection)
    backend: Arc<dyn RepoBackend>,
    clock: Arc<dyn Clock>,

    channel: String,
    screen: AddRepoScreen,

    subscription: Option<SubscriptionId>,
    event_rx: Option<mpsc::UnboundedReceiver<ChannelMessage>>,

    stall_reported: bool,
}

impl SubmissionCoordinator {
    pub fn new(backend: Arc<dyn RepoBackend>, clock: Arc<dyn Clock>, config: &AppConfig) -> Self {
        Self {
            backend,
            clock,
            channel: config.progress_channel.clone(),
            screen: AddRepoScreen::new(config.stale_after_secs, config.toast_secs),
            subscription: None,
            event_rx: None,
            stall_reported: false,
        }
    }

    pub fn screen(&self) -> &AddRepoScreen {
        &self.screen
    }

    pub fn mode(&self) -> ScreenMode {
        self.screen.mode()
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe to the progress channel. Safe to call repeatedly.
    ///
    /// A failed subscription leaves the screen usable in degraded mode:
    /// submissions still work but live progress will not update.
    pub fn attach(&mut self) -> bool {
        if self.subscription.is_some() {
            return true;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Box::new(move |message: ChannelMessage| {
            // Receiver gone means the screen was torn down; drop silently
            let _ = tx.send(message);
        });

        match self.backend.subscribe(&self.channel, sink) {
            Ok(id) => {
                info!("Listening for progress on channel {}", self.channel);
                self.subscription = Some(id);
                self.event_rx = Some(rx);
                true
            }
            Err(e) => {
                error!("Could not set up progress listener: {}", e);
                self.screen.mark_degraded();
                false
            }
        }
    }

    /// Fill the form from a pasted URL, reporting failures as a toast
    pub fn fill_from_url(&mut self, form: &mut AddRepoForm, url: &str) -> bool {
        let now = self.clock.now_millis();
        self.screen.fill_from_url(form, url, now)
    }

    /// Submit the form and wait for the backend to accept or reject it
    pub async fn submit(&mut self, form: &AddRepoForm) -> Result<JobHandle, SubmitError> {
        let request = self.screen.begin_submit(form)?;
        if self.subscription.is_none() {
            warn!("Submitting {} without a progress subscription", request.job_key());
        }

        let backend = self.backend.clone();
        let to_send = request.clone();
        let result = tokio::task::spawn_blocking(move || backend.add_repo(&to_send)).await;

        let now = self.clock.now_millis();
        match result {
            Ok(Ok(record_id)) => {
                info!("Backend accepted {} as record {}", request.job_key(), record_id);
                self.stall_reported = false;
                Ok(self.screen.submission_accepted(&request, record_id, now))
            }
            Ok(Err(e)) => {
                error!("Failed to add {}: {}", request.job_key(), e);
                let message = e.to_string();
                self.screen.submission_rejected(&request, &message, now);
                Err(SubmitError::Rejected(message))
            }
            Err(e) => {
                error!("Submission task panicked for {}: {}", request.job_key(), e);
                let message = format!("Submission task failed: {}", e);
                self.screen.submission_rejected(&request, &message, now);
                Err(SubmitError::Rejected(message))
            }
        }
    }

    /// Apply every message that is already buffered. Returns how many
    /// messages changed the screen.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(message) = self.try_recv() {
            if matches!(self.handle_message(message), Ok(Applied::Updated | Applied::Finished)) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next message and apply it.
    /// `None` once detached or when the backend dropped the channel.
    pub async fn next_event(&mut self) -> Option<Result<Applied, DecodeError>> {
        let rx = self.event_rx.as_mut()?;
        let message = rx.recv().await?;
        Some(self.handle_message(message))
    }

    /// Process events until no job is running, checking for stalls every
    /// `tick`. `on_update` sees the screen after each applied message.
    pub async fn run_until_settled<F>(&mut self, tick: Duration, mut on_update: F) -> ScreenMode
    where
        F: FnMut(&AddRepoScreen),
    {
        loop {
            if !self.screen.has_running_jobs() {
                break;
            }
            let Some(rx) = self.event_rx.as_mut() else {
                warn!("No progress subscription, cannot follow running jobs");
                break;
            };

            tokio::select! {
                message = rx.recv() => {
                    match message {
                        Some(message) => {
                            let applied = self.handle_message(message);
                            if let Ok(Applied::Updated | Applied::Finished) = applied {
                                on_update(&self.screen);
                            }
                        }
                        None => {
                            info!("Progress channel closed");
                            break;
                        }
                    }
                }
                _ = tokio::time::sleep(tick) => {
                    self.check_health();
                }
            }
        }

        self.screen.mode()
    }

    /// Expire old notifications and report a stalled import once
    pub fn check_health(&mut self) {
        let now = self.clock.now_millis();
        self.screen.toasts_mut().expire(now);

        if self.screen.is_stalled(now) && !self.stall_reported {
            warn!("No progress received within the expected window");
            self.screen.toasts_mut().push(
                "No progress received",
                "The import may still be running, but live progress is not updating.",
                ToastKind::Warning,
                now,
            );
            self.stall_reported = true;
        }
    }

    /// Detach from the channel and release all jobs.
    /// Idempotent; messages published afterwards are dropped.
    pub fn teardown(&mut self) {
        if let Some(id) = self.subscription.take() {
            info!("Detaching from progress channel {}", self.channel);
            self.backend.unsubscribe(id);
        }
        self.event_rx = None;
        self.screen.teardown();
    }

    fn try_recv(&mut self) -> Option<ChannelMessage> {
        self.event_rx.as_mut()?.try_recv().ok()
    }

    fn handle_message(&mut self, message: ChannelMessage) -> Result<Applied, DecodeError> {
        let event = match decode_message(&message) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping malformed progress event: {} ({:?})", e, message);
                return Err(e);
            }
        };

        debug!("Progress event for {}", event.key());
        self.stall_reported = false;
        let now = self.clock.now_millis();
        Ok(self.screen.apply(event, now))
    }
}

impl Drop for SubmissionCoordinator {
    fn drop(&mut self) {
        // Never leave a dangling subscription behind
        self.teardown();
    }
}
