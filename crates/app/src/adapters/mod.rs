pub mod backend;
pub mod persistence;
