use gitchest_core::app::{ProgressViewModel, Toast, ToastKind};
use gitchest_core::domain::TaskStatus;

/// Plain-text lines for one job's progress view
pub fn progress_lines(view: &ProgressViewModel) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.rows.len() + 1);
    lines.push(format!(
        "{} [{}/{} tasks, {}%]",
        view.key, view.completed_tasks, view.total_tasks, view.overall_percentage
    ));

    for row in &view.rows {
        let marker = match row.status {
            TaskStatus::Completed => "[x]",
            TaskStatus::Active => "[>]",
            TaskStatus::Pending => "[ ]",
        };
        let detail = match (row.status, &row.step_label) {
            (TaskStatus::Completed, _) => "completed".to_string(),
            (TaskStatus::Active, Some(steps)) => format!("{} {}%", steps, row.percentage),
            (TaskStatus::Active, None) => format!("{}%", row.percentage),
            (TaskStatus::Pending, _) => "pending".to_string(),
        };
        lines.push(format!("  {} {} - {}", marker, row.description, detail));
    }

    lines
}

pub fn toast_line(toast: &Toast) -> String {
    let label = match toast.kind {
        ToastKind::Info => "info",
        ToastKind::Success => "success",
        ToastKind::Warning => "warning",
        ToastKind::Error => "error",
    };
    format!("{}: {} - {}", label, toast.title, toast.description.replace('\n', ", "))
}
