//! Stock info extraction
//!
//! Stock documents may carry a fenced block of basic facts:
//!
//! ````text
//! ```yaml
//! code: 600593
//! tags:
//!   - 海洋公园
//!   - 文旅
//! ```
//! ````
//!
//! The block is read loosely: the first word after `code:` is the stock code,
//! and every line starting with `-` is a tag.

use crate::corpus::CorpusError;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Facts extracted from one stock document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockInfo {
    /// File stem of the document
    pub name: String,
    /// Path the document was read from
    pub file: PathBuf,
    /// Stock code, if a fenced block declares one
    pub code: Option<String>,
    /// Tags listed in the last fenced block that lists any
    pub tags: Vec<String>,
}

impl fmt::Display for StockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "股票名称: {}", self.name)?;
        if let Some(code) = &self.code {
            writeln!(f, "股票代码: {}", code)?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "标签: {}", self.tags.join(", "))?;
        }
        write!(f, "文件路径: {}", self.file.display())
    }
}

/// Code and tags read from the fenced blocks of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlockInfo {
    pub code: Option<String>,
    pub tags: Vec<String>,
}

/// Collect code and tags from every fenced block in `markdown`
///
/// Later blocks override earlier ones for each field they provide.
pub fn parse_code_blocks(markdown: &str) -> CodeBlockInfo {
    let mut info = CodeBlockInfo::default();
    let mut in_fence = false;
    let mut block = String::new();

    for event in Parser::new_ext(markdown, Options::all()) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                in_fence = true;
                block.clear();
            }
            Event::End(TagEnd::CodeBlock) if in_fence => {
                in_fence = false;
                let content = block.trim();

                if let Some(code) = find_code(content) {
                    info.code = Some(code);
                }

                let tags: Vec<String> = content
                    .lines()
                    .filter_map(|line| line.trim().strip_prefix('-'))
                    .map(|tag| tag.trim().to_string())
                    .collect();
                if !tags.is_empty() {
                    info.tags = tags;
                }
            }
            Event::Text(text) if in_fence => block.push_str(&text),
            _ => {}
        }
    }

    info
}

/// First word following a `code:` marker
fn find_code(block: &str) -> Option<String> {
    block.match_indices("code:").find_map(|(idx, marker)| {
        let word: String = block[idx + marker.len()..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        (!word.is_empty()).then_some(word)
    })
}

/// Read one stock document and extract its info
pub fn extract_stock_info(path: &Path) -> Result<StockInfo, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let CodeBlockInfo { code, tags } = parse_code_blocks(&content);

    Ok(StockInfo {
        name: path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
        file: path.to_path_buf(),
        code,
        tags,
    })
}

/// Extract info from every `*.md` file directly inside `dir`, in name order
///
/// Unreadable files are logged and skipped.
pub fn scan_stocks_dir(dir: &Path) -> Result<Vec<StockInfo>, CorpusError> {
    if !dir.is_dir() {
        return Err(CorpusError::NotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| CorpusError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().map(|ext| ext == "md").unwrap_or(false))
        .collect();
    paths.sort();

    let mut infos = Vec::with_capacity(paths.len());
    for path in paths {
        match extract_stock_info(&path) {
            Ok(info) => infos.push(info),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping stock document"),
        }
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_code_and_tags() {
        let content = "# 大连圣亚\n\n```yaml\ncode: 600593\ntags:\n  - 海洋公园\n  - 文旅\n```\n";
        let info = parse_code_blocks(content);
        assert_eq!(info.code.as_deref(), Some("600593"));
        assert_eq!(info.tags, vec!["海洋公园".to_string(), "文旅".to_string()]);
    }

    #[test]
    fn test_later_blocks_override() {
        let content = "```\ncode: A1\n- first\n```\n\n```\n- second\n```\n\n```\ncode: B2\n```\n";
        let info = parse_code_blocks(content);
        assert_eq!(info.code.as_deref(), Some("B2"));
        assert_eq!(info.tags, vec!["second".to_string()]);
    }

    #[test]
    fn test_list_outside_fence_is_not_a_tag() {
        let content = "# X\n\n- not a tag\n\n    code: 123\n";
        let info = parse_code_blocks(content);
        assert_eq!(info, CodeBlockInfo::default());
    }

    #[test]
    fn test_find_code_skips_markers_without_word() {
        assert_eq!(find_code("code: -\ncode:  SZ_001"), Some("SZ_001".to_string()));
        assert_eq!(find_code("code:"), None);
        assert_eq!(find_code("code:\n  600000"), Some("600000".to_string()));
    }

    #[test]
    fn test_extract_uses_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("大连圣亚.md");
        fs::write(&path, "# 大连圣亚\n```\ncode: 600593\n```\n").unwrap();

        let info = extract_stock_info(&path).unwrap();
        assert_eq!(info.name, "大连圣亚");
        assert_eq!(info.code.as_deref(), Some("600593"));
        assert!(info.tags.is_empty());
        assert_eq!(info.file, path);
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = extract_stock_info(&dir.path().join("missing.md"));
        assert!(matches!(result, Err(CorpusError::NotFound(_))));
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "```\ncode: 2\n```\n").unwrap();
        fs::write(dir.path().join("a.md"), "```\ncode: 1\n```\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "```\ncode: 3\n```\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.md"), "```\ncode: 4\n```\n").unwrap();

        let infos = scan_stocks_dir(dir.path()).unwrap();
        let names: Vec<_> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_display() {
        let info = StockInfo {
            name: "A".into(),
            file: PathBuf::from("stocks/A.md"),
            code: Some("1".into()),
            tags: vec!["x".into(), "y".into()],
        };
        assert_eq!(
            info.to_string(),
            "股票名称: A\n股票代码: 1\n标签: x, y\n文件路径: stocks/A.md"
        );
    }
}
