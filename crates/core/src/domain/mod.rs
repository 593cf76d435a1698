pub mod platform;
pub mod task;
pub mod job;
pub mod request;
pub mod events;

// Re-exports for convenience
pub use platform::*;
pub use task::*;
pub use job::*;
pub use request::*;
pub use events::*;
