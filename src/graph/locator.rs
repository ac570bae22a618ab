//! Stock locator: stock identifier -> source document path

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Maps stock identifiers to their source documents, relative to the corpus root
///
/// Paths are stored with `/` separators so they can be dropped into links as-is.
/// When two documents resolve to the same identifier, the later insert wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLocator(BTreeMap<String, String>);

impl StockLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where `identifier` lives, returning the path it replaced
    pub fn insert(&mut self, identifier: impl Into<String>, path: &Path) -> Option<String> {
        self.0.insert(identifier.into(), to_posix(path))
    }

    /// Link path of a stock's source document
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.0.get(identifier).map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.0.contains_key(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Join path components with `/` regardless of platform
pub fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_insert_wins() {
        let mut locator = StockLocator::new();
        assert_eq!(locator.insert("StockA", Path::new("a/StockA.md")), None);
        assert_eq!(
            locator.insert("StockA", Path::new("b/StockA.md")),
            Some("a/StockA.md".to_string())
        );
        assert_eq!(locator.get("StockA"), Some("b/StockA.md"));
        assert_eq!(locator.len(), 1);
    }

    #[test]
    fn test_to_posix() {
        let path: std::path::PathBuf = ["sector", "bank", "招商银行.md"].iter().collect();
        assert_eq!(to_posix(&path), "sector/bank/招商银行.md");
    }
}
