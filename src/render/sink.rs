//! DocumentSink trait and its implementations
//!
//! The sink is where rendered topic documents go. `FsSink` writes
//! `<output>/<collection dir>/<name>.md`; `MemorySink` keeps documents in
//! memory for inspection.

use crate::config::Labels;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which output collection a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    MainTopics,
    AttachedTopics,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainTopics => write!(f, "main topics"),
            Self::AttachedTopics => write!(f, "attached topics"),
        }
    }
}

/// Errors from writing rendered documents
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sink rejected {collection} document '{name}': {reason}")]
    Rejected {
        collection: Collection,
        name: String,
        reason: String,
    },
}

/// Destination for rendered documents
pub trait DocumentSink {
    /// Store `content` as the document `name` of `collection`
    fn write(&mut self, collection: Collection, name: &str, content: &str)
        -> Result<(), RenderError>;
}

/// Writes documents as markdown files under an output root
#[derive(Debug, Clone)]
pub struct FsSink {
    main_dir: PathBuf,
    attached_dir: PathBuf,
}

impl FsSink {
    /// Create both collection directories under `root`
    pub fn create(root: &Path, labels: &Labels) -> Result<Self, RenderError> {
        let sink = Self {
            main_dir: root.join(&labels.main_dir),
            attached_dir: root.join(&labels.attached_dir),
        };
        for dir in [&sink.main_dir, &sink.attached_dir] {
            fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(sink)
    }

    /// File a document of `collection` named `name` is written to
    pub fn path_for(&self, collection: Collection, name: &str) -> PathBuf {
        let dir = match collection {
            Collection::MainTopics => &self.main_dir,
            Collection::AttachedTopics => &self.attached_dir,
        };
        dir.join(format!("{}.md", name))
    }
}

impl DocumentSink for FsSink {
    fn write(
        &mut self,
        collection: Collection,
        name: &str,
        content: &str,
    ) -> Result<(), RenderError> {
        let path = self.path_for(collection, name);
        fs::write(&path, content).map_err(|source| RenderError::Io { path, source })
    }
}

/// Keeps rendered documents in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    documents: BTreeMap<(Collection, String), String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: Collection, name: &str) -> Option<&str> {
        self.documents
            .get(&(collection, name.to_string()))
            .map(String::as_str)
    }

    /// Names of the documents stored in `collection`, sorted
    pub fn names(&self, collection: Collection) -> Vec<&str> {
        self.documents
            .keys()
            .filter(|(c, _)| *c == collection)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSink for MemorySink {
    fn write(
        &mut self,
        collection: Collection,
        name: &str,
        content: &str,
    ) -> Result<(), RenderError> {
        self.documents
            .insert((collection, name.to_string()), content.to_string());
        Ok(())
    }
}
