//! Git Chest Core - Pure domain logic for the add-repository flow
//!
//! This crate contains the domain types, the progress store and view
//! derivation, and the ports (interfaces) the application layer wires up.
//! It performs no I/O - the backend bridge, configuration files and the
//! async runtime are handled by adapters in the app crate.

pub mod domain;
pub mod ports;
pub mod app;
pub mod error;

// Re-exports for ergonomics
pub use domain::*;
pub use error::*;
