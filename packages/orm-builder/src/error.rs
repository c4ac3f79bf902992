use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Both '{option}' option and '{alias}' alias can NOT be set.")]
    Conflict {
        option: &'static str,
        alias: &'static str,
    },
    #[error("Options error: {message}")]
    Options { message: String },
    #[error("Client construction failed: {message}")]
    ClientConstruction { message: String },
    #[error("Plugin error: {message}")]
    Plugin { message: String },
    #[error("Integrity check - unsupported dialect: {dialect}")]
    UnsupportedDialect { dialect: String },
    #[error("Requires {} version >= {required} (server reports {current})", .dialect.to_uppercase())]
    VersionTooLow {
        dialect: String,
        required: String,
        current: String,
    },
    #[error("Server version error: {message}")]
    ServerVersion { message: String },
    #[error("Failed to load model from '{}': {message}", .path.display())]
    ModelLoad { path: PathBuf, message: String },
    #[error("Model '{name}' is already defined in the registry")]
    DuplicateModel { name: String },
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl BuilderError {
    pub fn options(message: impl Into<String>) -> Self {
        Self::Options {
            message: message.into(),
        }
    }

    pub fn client_construction(message: impl Into<String>) -> Self {
        Self::ClientConstruction {
            message: message.into(),
        }
    }

    pub fn model_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach a model file path to an arbitrary failure, keeping existing
    /// `ModelLoad` errors as they are.
    pub(crate) fn into_model_load(self, path: &std::path::Path) -> Self {
        match self {
            e @ Self::ModelLoad { .. } => e,
            other => Self::model_load(path, other.to_string()),
        }
    }
}
