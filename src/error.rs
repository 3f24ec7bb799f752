use std::io;

use thiserror::Error;

/// Failures of the rule base itself. Any of these aborts the whole batch.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("failed to read rule base '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("rule base '{path}' is malformed: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialise rule base: {0}")]
    Serialise(#[from] toml::ser::Error),
    #[error("failed to edit rule base document: {0}")]
    Edit(#[from] toml_edit::TomlError),
    #[error("invalid rule base: {0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failures reading an order file. Individual bad rows are never errors.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("failed to read order '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("order '{path}' is not a row table or a list of order lines: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
