use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading quest content.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid objective type '{kind}' at index {index} in quest '{quest}'")]
    InvalidObjectiveKind {
        quest: String,
        index: usize,
        kind: String,
    },

    #[error("objective '{objective}' in quest '{quest}' requires a count of at least 1")]
    ZeroCount { quest: String, objective: String },

    #[error("quest '{0}' has no objectives")]
    NoObjectives(String),
}

/// Why a quest could not be started. Starting never panics; callers that
/// only care about success can test `is_ok()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("unknown quest '{0}'")]
    UnknownQuest(String),

    #[error("quest '{0}' is already active")]
    AlreadyActive(String),

    #[error("quest '{0}' was already completed and cannot be repeated")]
    AlreadyCompletedNonRepeatable(String),

    #[error("quest '{quest}' is missing prerequisites: {missing:?}")]
    PrerequisitesUnmet { quest: String, missing: Vec<String> },
}

/// Why a branching choice was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("quest '{0}' is not active")]
    NotActive(String),

    #[error("quest '{quest}' has no choice '{choice}'")]
    UnknownChoice { quest: String, choice: String },
}
