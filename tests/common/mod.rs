//! Common test utilities: temporary stock corpora on disk

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A stock corpus and output directory living in a temporary workspace
pub struct TestWorkspace {
    dir: TempDir,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn stocks_dir(&self) -> PathBuf {
        self.root().join("stocks")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("topics")
    }

    /// Write a file at `relative` under the stocks directory
    pub fn add_stock(&self, relative: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.stocks_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create stock dir");
        }
        fs::write(path, content).expect("failed to write stock");
        self
    }

    /// Read a generated file relative to the output directory
    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.output_dir().join(relative))
            .unwrap_or_else(|e| panic!("missing output {}: {}", relative, e))
    }

    /// Every generated file as (relative path, content), in path order
    pub fn outputs(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let root = self.output_dir();
        WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let bytes = fs::read(e.path()).expect("failed to read output");
                (e.path().strip_prefix(&root).unwrap().to_path_buf(), bytes)
            })
            .collect()
    }
}

/// Build a stock document with a title, an unrelated section and a topics section
#[allow(dead_code)]
pub fn stock_doc(title: &str, topics_body: &str) -> String {
    format!(
        "# {}\n\n## 概况\n\nSome overview.\n\n## 题材\n\n{}",
        title, topics_body
    )
}
