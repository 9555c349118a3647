use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling the flight-control graph.
///
/// Everything here surfaces from `load()`; a running tick never produces one.
#[derive(Error, Debug)]
pub enum FcsError {
    #[error("Structural config error: {0}")]
    StructuralConfig(String),

    #[error("Unknown component kind: {0}")]
    UnknownComponentKind(String),

    #[error("Could not find system file '{name}' in {searched:?}")]
    FileNotFound { name: String, searched: Vec<PathBuf> },

    #[error("The enable property '{property}' for channel '{channel}' is undefined")]
    UndefinedEnableProperty { channel: String, property: String },

    #[error("Element <{parent}> is missing required <{child}>")]
    MissingElement { parent: String, child: String },

    #[error("Invalid number '{value}' in <{element}>")]
    InvalidNumber { element: String, value: String },

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FcsError {
    /// True for errors that abort the whole document rather than one component.
    pub fn is_structural(&self) -> bool {
        !matches!(self, FcsError::UnknownComponentKind(_))
    }

    pub(crate) fn missing(parent: &str, child: &str) -> Self {
        FcsError::MissingElement {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    pub(crate) fn invalid_number(element: &str, value: &str) -> Self {
        FcsError::InvalidNumber {
            element: element.to_string(),
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FcsError>;
