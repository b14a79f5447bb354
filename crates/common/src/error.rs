//! Error types shared across DocWarp crates.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level error type for DocWarp operations.
#[derive(Debug, thiserror::Error)]
pub enum DocwarpError {
    #[error("Unknown effect: {effect_id:?}")]
    UnknownEffect { effect_id: String },

    #[error("Failed to load image {path}: {message}")]
    ImageLoad { path: PathBuf, message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Failed to create dataset directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DocwarpError.
pub type DocwarpResult<T> = Result<T, DocwarpError>;

/// Coarse classification of a [`DocwarpError`], recorded in batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownEffect,
    ImageLoadFailure,
    RenderFailure,
    DirectoryCreateFailure,
    CopyFailure,
    Config,
    Io,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownEffect => "unknown_effect",
            Self::ImageLoadFailure => "image_load_failure",
            Self::RenderFailure => "render_failure",
            Self::DirectoryCreateFailure => "directory_create_failure",
            Self::CopyFailure => "copy_failure",
            Self::Config => "config",
            Self::Io => "io",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DocwarpError {
    pub fn unknown_effect(effect_id: impl Into<String>) -> Self {
        Self::UnknownEffect {
            effect_id: effect_id.into(),
        }
    }

    pub fn image_load(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ImageLoad {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownEffect { .. } => ErrorKind::UnknownEffect,
            Self::ImageLoad { .. } => ErrorKind::ImageLoadFailure,
            Self::Render { .. } => ErrorKind::RenderFailure,
            Self::DirectoryCreate { .. } => ErrorKind::DirectoryCreateFailure,
            Self::Copy { .. } => ErrorKind::CopyFailure,
            Self::Config { .. } | Self::Json(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}
