//! Cross-link rendering of the topic graph
//!
//! One markdown document is produced per main topic and per attached topic.
//! Documents are handed to a [`DocumentSink`]; what happens when the sink
//! refuses a write is decided by the [`FailurePolicy`].

mod markdown;
mod sink;

pub use markdown::TopicRenderer;
pub use sink::{Collection, DocumentSink, FsSink, MemorySink, RenderError};

use serde::{Deserialize, Serialize};

/// What to do when a document cannot be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failed write
    #[default]
    Abort,
    /// Record the failure and keep rendering
    Continue,
}

/// A document that could not be written under [`FailurePolicy::Continue`]
#[derive(Debug)]
pub struct RenderFailure {
    pub collection: Collection,
    pub name: String,
    pub error: RenderError,
}

/// Outcome of rendering a whole graph
#[derive(Debug, Default)]
pub struct RenderReport {
    pub main_topics_written: usize,
    pub attached_topics_written: usize,
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    /// True if every document was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
