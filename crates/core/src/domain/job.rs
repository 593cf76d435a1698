use serde::{Deserialize, Serialize};

use super::{platform::Platform, task::TaskId};

/// Identity of one in-flight import job
///
/// Two keys are the same job only when platform, user and repo all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobKey {
    pub platform: Platform,
    pub user: String,
    pub repo: String,
}

impl JobKey {
    pub fn new(platform: Platform, user: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            platform,
            user: user.into(),
            repo: repo.into(),
        }
    }
}

impl std::fmt::Display for JobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.platform, self.user, self.repo)
    }
}

/// Latest observed state of one task within one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task_id: TaskId,
    /// Always within 0..=100
    pub percentage: u8,
    pub step: Option<u32>,
    pub total_steps: Option<u32>,
}

impl TaskSnapshot {
    pub fn new(task_id: TaskId, percentage: u8) -> Self {
        Self {
            task_id,
            percentage: percentage.min(100),
            step: None,
            total_steps: None,
        }
    }

    pub fn with_steps(mut self, step: u32, total_steps: u32) -> Self {
        self.step = Some(step);
        self.total_steps = Some(total_steps);
        self
    }

    /// `step/total` once the backend has reported both
    pub fn step_label(&self) -> Option<String> {
        match (self.step, self.total_steps) {
            (Some(step), Some(total)) => Some(format!("{}/{}", step, total)),
            _ => None,
        }
    }
}

/// All task snapshots received for one job, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobProgress {
    pub key: JobKey,
    pub tasks: Vec<TaskSnapshot>,
}

impl JobProgress {
    pub fn new(key: JobKey) -> Self {
        Self {
            key,
            tasks: Vec::new(),
        }
    }
}

/// Returned to the caller once the backend has accepted a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub record_id: i64,
    pub key: JobKey,
}
