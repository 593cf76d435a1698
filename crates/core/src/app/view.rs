use crate::app::store::JobProgressStore;
use crate::domain::{JobKey, TaskCatalog, TaskId, TaskStatus};

/// One row of the progress screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    pub task_id: TaskId,
    pub description: String,
    pub status: TaskStatus,
    pub percentage: u8,
    pub step_label: Option<String>,
}

/// Everything the progress screen needs to draw one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressViewModel {
    pub key: JobKey,
    pub rows: Vec<TaskRowView>,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub overall_percentage: u8,
}

/// Derive display data for one job. Reads the store, never writes it.
pub fn render(store: &JobProgressStore, key: &JobKey) -> ProgressViewModel {
    let platform_name = key.platform.display_name();

    let rows: Vec<TaskRowView> = TaskCatalog::pipeline()
        .map(|task_id| {
            let status = store.status_of(key, task_id);
            let step_label = match status {
                TaskStatus::Pending => None,
                _ => store
                    .snapshot_for(key, task_id)
                    .and_then(|snapshot| snapshot.step_label()),
            };

            TaskRowView {
                task_id: task_id.clone(),
                description: TaskCatalog::describe(task_id, platform_name).unwrap_or_default(),
                status,
                percentage: store.display_percentage(key, task_id),
                step_label,
            }
        })
        .collect();

    let total_tasks = rows.len();
    let completed_tasks = rows
        .iter()
        .filter(|row| row.status == TaskStatus::Completed)
        .count();
    let active_fraction: u32 = rows
        .iter()
        .find(|row| row.status == TaskStatus::Active)
        .map(|row| u32::from(row.percentage))
        .unwrap_or(0);

    let overall_percentage = if total_tasks == 0 {
        0
    } else {
        let scaled = (completed_tasks as u32 * 100 + active_fraction) / total_tasks as u32;
        scaled.min(100) as u8
    };

    ProgressViewModel {
        key: key.clone(),
        rows,
        completed_tasks,
        total_tasks,
        overall_percentage,
    }
}

/// Render every job the store knows about, in store order
pub fn render_all(store: &JobProgressStore) -> Vec<ProgressViewModel> {
    store.keys().map(|key| render(store, key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Platform, TaskSnapshot};

    #[test]
    fn test_render_empty_job_is_all_pending() {
        let mut store = JobProgressStore::new();
        let key = JobKey::new(Platform::GitHub, "octocat", "Hello-World");
        store.ensure_job(key.clone());

        let view = render(&store, &key);
        assert_eq!(view.rows.len(), 5);
        assert!(view.rows.iter().all(|row| row.status == TaskStatus::Pending));
        assert_eq!(view.overall_percentage, 0);
        assert_eq!(view.rows[0].description, "Fetch metadata from GitHub");
    }

    #[test]
    fn test_render_mid_pipeline() {
        let mut store = JobProgressStore::new();
        let key = JobKey::new(Platform::GitLab, "gitlab-org", "gitlab");
        store.upsert(key.clone(), TaskSnapshot::new(TaskId::Metadata, 100));
        store.upsert(key.clone(), TaskSnapshot::new(TaskId::FetchTree, 100));
        store.upsert(
            key.clone(),
            TaskSnapshot::new(TaskId::InsertTree, 50).with_steps(6, 12),
        );

        let view = render(&store, &key);
        assert_eq!(view.completed_tasks, 2);
        assert_eq!(view.rows[2].status, TaskStatus::Active);
        assert_eq!(view.rows[2].step_label.as_deref(), Some("6/12"));
        assert_eq!(view.rows[1].description, "Fetch tree from GitLab");
        // (2 * 100 + 50) / 5
        assert_eq!(view.overall_percentage, 50);
    }

    #[test]
    fn test_pending_rows_hide_stale_step_labels() {
        let mut store = JobProgressStore::new();
        let key = JobKey::new(Platform::GitHub, "u", "r");
        store.upsert(key.clone(), TaskSnapshot::new(TaskId::Readme, 30).with_steps(1, 2));
        store.upsert(key.clone(), TaskSnapshot::new(TaskId::Metadata, 10));

        let view = render(&store, &key);
        let readme = view.rows.iter().find(|row| row.task_id == TaskId::Readme).unwrap();
        assert_eq!(readme.status, TaskStatus::Pending);
        assert_eq!(readme.step_label, None);
        assert_eq!(readme.percentage, 0);
    }
}
