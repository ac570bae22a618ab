//! Crate-level error type

use crate::config::ConfigError;
use crate::corpus::CorpusError;
use crate::groups::GroupError;
use crate::render::RenderError;
use thiserror::Error;

/// Errors that can end a topicgraph run
#[derive(Debug, Error)]
pub enum TopicGraphError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for topicgraph operations
pub type TopicGraphResult<T> = Result<T, TopicGraphError>;
