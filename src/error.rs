// src/error.rs

//! Error types for dendrite-sim.

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::Shape2D;

#[derive(Debug, Error)]
pub enum PhaseFieldError {
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape2D, got: Shape2D },

    #[error("parameter '{0}' not set")]
    UnsetParameter(&'static str),

    #[error("derived parameters are stale: inputs changed since setup")]
    StaleParameters,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("file '{}': {reason}", path.display())]
    File { path: PathBuf, reason: String },

    #[error("parse error at line {line}, column {column}: cannot read '{token}' as a number")]
    Parse {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("ragged snapshot: line {line} has {got} values, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("snapshot contains no data")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plot error: {0}")]
    Plot(String),
}

impl PhaseFieldError {
    pub fn file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::File {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PhaseFieldError>;
