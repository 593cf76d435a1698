use crate::domain::{JobKey, JobProgress, TaskCatalog, TaskId, TaskSnapshot, TaskStatus};

/// Aggregates progress snapshots per job
///
/// Jobs are kept in the order their key was first seen and are never
/// reordered by later events. Within a job, snapshots are kept in arrival
/// order with at most one snapshot per task id: an upsert removes the old
/// snapshot and appends the new one, so the last snapshot is always the
/// most recently touched task.
///
/// Arrival order decides which task is current. Pipeline order then
/// classifies every other task relative to it. A backend that re-emits an
/// event for an earlier task therefore moves "current" back to that task;
/// this is a known limitation of the last-arrival rule.
#[derive(Debug, Default, Clone)]
pub struct JobProgressStore {
    jobs: Vec<JobProgress>,
}

impl JobProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest snapshot for a task, creating the job if needed
    pub fn upsert(&mut self, key: JobKey, snapshot: TaskSnapshot) {
        let job = self.entry(key);
        job.tasks.retain(|task| task.task_id != snapshot.task_id);
        job.tasks.push(snapshot);
    }

    /// Create an empty job so it can be rendered before any event arrives
    pub fn ensure_job(&mut self, key: JobKey) {
        self.entry(key);
    }

    pub fn job(&self, key: &JobKey) -> Option<&JobProgress> {
        self.jobs.iter().find(|job| &job.key == key)
    }

    pub fn contains(&self, key: &JobKey) -> bool {
        self.job(key).is_some()
    }

    /// Task id of the most recently upserted snapshot
    pub fn current_task_id(&self, key: &JobKey) -> Option<&TaskId> {
        self.job(key)
            .and_then(|job| job.tasks.last())
            .map(|task| &task.task_id)
    }

    pub fn snapshot_for(&self, key: &JobKey, task_id: &TaskId) -> Option<&TaskSnapshot> {
        self.job(key)
            .and_then(|job| job.tasks.iter().find(|task| &task.task_id == task_id))
    }

    pub fn status_of(&self, key: &JobKey, task_id: &TaskId) -> TaskStatus {
        let current = self
            .current_task_id(key)
            .and_then(TaskCatalog::pipeline_index_of);
        let target = TaskCatalog::pipeline_index_of(task_id);

        match (target, current) {
            (Some(target), Some(current)) if target < current => TaskStatus::Completed,
            (Some(target), Some(current)) if target == current => TaskStatus::Active,
            _ => TaskStatus::Pending,
        }
    }

    pub fn display_percentage(&self, key: &JobKey, task_id: &TaskId) -> u8 {
        match self.status_of(key, task_id) {
            TaskStatus::Completed => 100,
            TaskStatus::Active => self
                .snapshot_for(key, task_id)
                .map(|task| task.percentage)
                .unwrap_or(0),
            TaskStatus::Pending => 0,
        }
    }

    /// Copy of every job, in first-seen order
    pub fn all_jobs(&self) -> Vec<JobProgress> {
        self.jobs.clone()
    }

    pub fn keys(&self) -> impl Iterator<Item = &JobKey> {
        self.jobs.iter().map(|job| &job.key)
    }

    pub fn remove(&mut self, key: &JobKey) {
        self.jobs.retain(|job| &job.key != key);
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Empty a job's task list in place, returning the previous contents
    pub fn reset(&mut self, key: &JobKey) -> Option<JobProgress> {
        let job = self.jobs.iter_mut().find(|job| &job.key == key)?;
        let tasks = std::mem::take(&mut job.tasks);
        Some(JobProgress { key: key.clone(), tasks })
    }

    /// Put back a job taken with [`reset`](Self::reset), keeping its position
    pub fn restore(&mut self, job: JobProgress) {
        self.entry(job.key).tasks = job.tasks;
    }

    fn entry(&mut self, key: JobKey) -> &mut JobProgress {
        let index = match self.jobs.iter().position(|job| job.key == key) {
            Some(index) => index,
            None => {
                self.jobs.push(JobProgress::new(key));
                self.jobs.len() - 1
            }
        };
        &mut self.jobs[index]
    }
}
