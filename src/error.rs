//! Error types for the yearplan binary

use thiserror::Error;

/// Errors from command line parsing
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("{flag} requires a value")]
    MissingValue { flag: String },

    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
