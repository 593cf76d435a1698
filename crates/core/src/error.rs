use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown platform: {value}")]
    UnknownPlatform { value: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
