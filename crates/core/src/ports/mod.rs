pub mod backend;
pub mod persistence;
pub mod time;

// Re-exports
pub use backend::*;
pub use persistence::*;
pub use time::*;
