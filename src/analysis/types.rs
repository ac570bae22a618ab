//! Core types for stock document analysis

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A raw document discovered in the stock corpus
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path relative to the corpus root
    pub relative_path: PathBuf,
    /// File stem, used as the identifier when the document has no title
    pub stem: String,
    /// The decoded document text
    pub content: String,
}

impl SourceDocument {
    /// Create a document from its corpus-relative path and text
    pub fn new(relative_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let stem = Self::stem_of(&relative_path);
        Self {
            relative_path,
            stem,
            content: content.into(),
        }
    }

    fn stem_of(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Commentary and attached topics recorded under one main topic of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMention {
    /// Free text written under the topic heading, trimmed
    pub comment: String,
    /// Attached topic names in encounter order; duplicates are kept
    pub attached: Vec<String>,
}

impl TopicMention {
    pub fn new(comment: impl Into<String>, attached: Vec<String>) -> Self {
        Self {
            comment: comment.into(),
            attached,
        }
    }
}

/// One parsed stock document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDocument {
    /// Stock identifier taken from the title heading or the file stem
    pub identifier: String,
    /// Main topic name -> mention
    pub topics: BTreeMap<String, TopicMention>,
}

impl StockDocument {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            topics: BTreeMap::new(),
        }
    }

    /// Add a mention, replacing any earlier mention of the same topic
    pub fn with_topic(mut self, name: impl Into<String>, mention: TopicMention) -> Self {
        self.topics.insert(name.into(), mention);
        self
    }

    pub fn topic(&self, name: &str) -> Option<&TopicMention> {
        self.topics.get(name)
    }

    /// True if the document carries no topic mentions
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_document_stem_drops_directories_and_extension() {
        let doc = SourceDocument::new("bank/招商银行.md", "# 招商银行");
        assert_eq!(doc.stem, "招商银行");
        assert_eq!(doc.relative_path, PathBuf::from("bank/招商银行.md"));
    }

    #[test]
    fn with_topic_replaces_existing_mention() {
        let doc = StockDocument::new("StockA")
            .with_topic("Theme1", TopicMention::new("first", vec![]))
            .with_topic("Theme1", TopicMention::new("second", vec!["SubA".into()]));

        assert_eq!(doc.topics.len(), 1);
        let mention = doc.topic("Theme1").unwrap();
        assert_eq!(mention.comment, "second");
        assert_eq!(mention.attached, vec!["SubA".to_string()]);
    }
}
