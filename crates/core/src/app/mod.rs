pub mod autofill;
pub mod decoder;
pub mod screen;
pub mod store;
pub mod toasts;
pub mod validation;
pub mod view;

pub use autofill::{parse_repo_url, AutofillError, RepoLocation};
pub use decoder::{decode_message, decode_outcome, decode_progress, DecodeError};
pub use screen::{AddRepoScreen, Applied, JobPhase, ScreenMode, SubmitError};
pub use store::JobProgressStore;
pub use toasts::{Toast, ToastId, ToastKind, ToastQueue};
pub use validation::{AddRepoForm, FieldError};
pub use view::{render, render_all, ProgressViewModel, TaskRowView};
