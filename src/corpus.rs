//! Stock corpus discovery
//!
//! Recursively collects `*.md` documents under a root directory. Documents
//! that cannot be read or decoded are logged and skipped; the rest of the
//! corpus is still returned.

use crate::analysis::SourceDocument;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors raised while discovering or reading corpus documents
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", .0.display())]
    Undecodable(PathBuf),
}

/// A document left out of the corpus and why
#[derive(Debug)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub error: CorpusError,
}

/// All readable documents under a root directory
#[derive(Debug)]
pub struct Corpus {
    /// Root the relative paths are taken against
    pub root: PathBuf,
    /// Documents in path order
    pub documents: Vec<SourceDocument>,
    /// Documents that could not be read
    pub skipped: Vec<SkippedDocument>,
}

impl Corpus {
    /// Build a corpus from already-loaded documents
    pub fn from_documents(root: impl Into<PathBuf>, documents: Vec<SourceDocument>) -> Self {
        Self {
            root: root.into(),
            documents,
            skipped: Vec::new(),
        }
    }

    /// Walk `root` and load every markdown document beneath it
    ///
    /// Returns `CorpusError::NotFound` if `root` does not exist. Per-document
    /// failures are collected in `skipped`.
    pub fn scan(root: &Path) -> Result<Self, CorpusError> {
        if !root.is_dir() {
            return Err(CorpusError::NotFound(root.to_path_buf()));
        }

        let mut corpus = Self::from_documents(root, Vec::new());

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown(path) {
                continue;
            }

            match Self::read_document(root, path) {
                Ok(document) => corpus.documents.push(document),
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "skipping document");
                    corpus.skipped.push(SkippedDocument {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }

        debug!(
            root = %root.display(),
            documents = corpus.documents.len(),
            skipped = corpus.skipped.len(),
            "scanned corpus"
        );
        Ok(corpus)
    }

    /// Read one document, recording its path relative to `root`
    pub fn read_document(root: &Path, path: &Path) -> Result<SourceDocument, CorpusError> {
        let bytes = fs::read(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content =
            String::from_utf8(bytes).map_err(|_| CorpusError::Undecodable(path.to_path_buf()))?;
        let relative = path.strip_prefix(root).unwrap_or(path);
        Ok(SourceDocument::new(relative, content))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map(|ext| ext == "md").unwrap_or(false)
}
