//! Git Chest application library
//!
//! Wires the pure core to a backend and a config file, and exposes the
//! pieces the binary uses so they can be tested directly.

pub mod adapters;
pub mod cli;
pub mod report;
pub mod services;
