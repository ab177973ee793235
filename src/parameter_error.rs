//! Error handling for chain configuration and preset files

use std::io;

use thiserror::Error;

use crate::kinematics_error::ConfigurationError;

/// Unified error to report failures while reading or writing configuration and preset files.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),

    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Invalid Length: expected {expected}, found {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Kinematics Configuration Error: {0}")]
    KinematicsConfigurationError(#[from] ConfigurationError),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}
