use crate::domain::AddRepoRequest;
use anyhow::Result;

/// Identifies one subscription on the backend's event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Raw messages published on the progress channel
///
/// Payloads are left undecoded; validating them is the decoder's job.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelMessage {
    /// `{platform, user, repo, task_id, percentage, step?, total_steps?}`
    Progress(serde_json::Value),

    /// `{platform, user, repo, error?}`
    Finished(serde_json::Value),
}

/// Callback invoked by the backend for every message on a channel
pub type EventSink = Box<dyn Fn(ChannelMessage) + Send + Sync>;

/// Port for the native backend that performs the actual import
pub trait RepoBackend: Send + Sync {
    /// Ask the backend to start importing a repository.
    /// Returns the record id the backend assigned.
    /// This is blocking - caller should run in spawn_blocking
    fn add_repo(&self, request: &AddRepoRequest) -> Result<i64>;

    /// Start delivering every message published on `channel` to `sink`
    fn subscribe(&self, channel: &str, sink: EventSink) -> Result<SubscriptionId>;

    /// Stop delivering messages for a subscription.
    /// Unknown or already removed ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
