use anyhow::{bail, Result};
use gitchest_core::domain::{AddRepoRequest, JobKey, TaskCatalog, TaskId};
use gitchest_core::ports::{ChannelMessage, EventSink, RepoBackend, SubscriptionId};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

type SharedSink = Arc<dyn Fn(ChannelMessage) + Send + Sync>;

/// In-process stand-in for the native import backend
///
/// Accepts add requests, hands out record ids and plays the canonical
/// pipeline for each job on a worker thread, publishing progress and a
/// final finished message on the configured channel.
#[derive(Clone)]
pub struct LocalBackend {
    inner: Arc<Inner>,
}

struct Inner {
    channel: String,
    step_delay: Duration,
    /// Steps reported while inserting the tree
    tree_steps: u32,
    /// Fail jobs when this task is reached
    fail_at: Option<TaskId>,
    subscribers: Mutex<HashMap<u64, (String, SharedSink)>>,
    repositories: Mutex<HashSet<JobKey>>,
    next_record_id: AtomicI64,
    next_subscription: AtomicU64,
}

impl LocalBackend {
    pub fn new(channel: impl Into<String>, step_delay: Duration) -> Self {
        Self::build(channel.into(), step_delay, None)
    }

    /// A backend whose jobs error out once `task` is reached
    pub fn failing_at(channel: impl Into<String>, step_delay: Duration, task: TaskId) -> Self {
        Self::build(channel.into(), step_delay, Some(task))
    }

    fn build(channel: String, step_delay: Duration, fail_at: Option<TaskId>) -> Self {
        Self {
            inner: Arc::new(Inner {
                channel,
                step_delay,
                tree_steps: 4,
                fail_at,
                subscribers: Mutex::new(HashMap::new()),
                repositories: Mutex::new(HashSet::new()),
                next_record_id: AtomicI64::new(1),
                next_subscription: AtomicU64::new(1),
            }),
        }
    }

    /// Publish a message on a channel as the backend would
    pub fn publish(&self, channel: &str, message: ChannelMessage) {
        self.inner.publish(channel, message);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

impl Inner {
    fn publish(&self, channel: &str, message: ChannelMessage) {
        // Call sinks without holding the lock so they may unsubscribe
        let sinks: Vec<SharedSink> = match self.subscribers.lock() {
            Ok(subs) => subs
                .values()
                .filter(|(name, _)| name == channel)
                .map(|(_, sink)| sink.clone())
                .collect(),
            Err(_) => return,
        };

        for sink in sinks {
            sink(message.clone());
        }
    }

    fn run_pipeline(&self, key: &JobKey) {
        let identity = json!({
            "platform": key.platform.as_str(),
            "user": key.user,
            "repo": key.repo,
        });
        let progress = |task: &TaskId, percentage: u8, step: u32, total: u32| {
            let mut payload = identity.clone();
            payload["task_id"] = json!(task.as_str());
            payload["percentage"] = json!(percentage);
            payload["step"] = json!(step);
            payload["total_steps"] = json!(total);
            self.publish(&self.channel, ChannelMessage::Progress(payload));
            thread::sleep(self.step_delay);
        };

        for task in TaskCatalog::pipeline() {
            if self.fail_at.as_ref() == Some(task) {
                let mut payload = identity.clone();
                payload["error"] = json!(format!("Failed at task {}", task));
                self.publish(&self.channel, ChannelMessage::Finished(payload));
                return;
            }

            let total = if *task == TaskId::InsertTree {
                self.tree_steps
            } else {
                1
            };
            progress(task, 0, 0, total);
            for step in 1..=total {
                let percentage = (step * 100 / total) as u8;
                progress(task, percentage, step, total);
            }
        }

        info!("Local backend finished importing {}", key);
        self.publish(&self.channel, ChannelMessage::Finished(identity));
    }
}

impl RepoBackend for LocalBackend {
    fn add_repo(&self, request: &AddRepoRequest) -> Result<i64> {
        let key = request.job_key();
        {
            let mut repositories = match self.inner.repositories.lock() {
                Ok(repositories) => repositories,
                Err(_) => bail!("Repository registry is unavailable."),
            };
            if !repositories.insert(key.clone()) {
                bail!("Repository already exists.");
            }
        }

        let record_id = self.inner.next_record_id.fetch_add(1, Ordering::SeqCst);
        debug!("Local backend accepted {} as record {}", key, record_id);

        let inner = self.inner.clone();
        thread::spawn(move || inner.run_pipeline(&key));

        Ok(record_id)
    }

    fn subscribe(&self, channel: &str, sink: EventSink) -> Result<SubscriptionId> {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::SeqCst);
        let mut subscribers = match self.inner.subscribers.lock() {
            Ok(subscribers) => subscribers,
            Err(_) => bail!("Subscriber registry is unavailable."),
        };
        subscribers.insert(id, (channel.to_string(), Arc::from(sink)));
        Ok(SubscriptionId(id))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut subscribers) = self.inner.subscribers.lock() {
            subscribers.remove(&id.0);
        }
    }
}
