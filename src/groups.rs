//! Stock group merging
//!
//! A topic directory holds one JSON file per stock group. A file is either a
//! bare list of stocks or an object describing the group:
//!
//! ```json
//! {
//!     "name": "数字货币",
//!     "aliases": ["数字人民币", "DCEP"],
//!     "stocks": ["四方精创", "广电运通"]
//! }
//! ```
//!
//! All groups, plus one entry per alias, are merged into a single sorted
//! JSON object keyed by group name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {reason}", .path.display())]
    InvalidShape { path: PathBuf, reason: String },
}

/// The object form of a group file
///
/// Each concept may be spelled several ways; the first truthy field in
/// declaration order wins.
#[derive(Debug, Default, Deserialize)]
struct GroupSpec {
    name: Option<Value>,
    aliases: Option<Value>,
    alias: Option<Value>,
    stocks: Option<Value>,
    #[serde(rename = "股票组")]
    stock_group: Option<Value>,
    list: Option<Value>,
    items: Option<Value>,
    content: Option<Value>,
}

impl GroupSpec {
    fn alias_field(&self) -> Option<&Value> {
        first_truthy([&self.aliases, &self.alias])
    }

    fn stocks_field(&self) -> Option<&Value> {
        first_truthy([
            &self.stocks,
            &self.stock_group,
            &self.list,
            &self.items,
            &self.content,
        ])
    }
}

fn first_truthy<const N: usize>(fields: [&Option<Value>; N]) -> Option<&Value> {
    fields.into_iter().flatten().find(|v| truthy(v))
}

/// JSON truthiness: null, false, 0, "", [] and {} are false
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// A group or alias key, if the value can name one
fn group_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(_) if truthy(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Stock groups keyed by group or alias name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StockGroups(BTreeMap<String, Vec<Value>>);

impl StockGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every `*.json` file under `dir`, in path order
    ///
    /// A missing directory yields no groups. Files that cannot be read,
    /// parsed or understood are logged and skipped.
    pub fn load(dir: &Path) -> Self {
        let mut groups = Self::new();
        if !dir.exists() {
            warn!(dir = %dir.display(), "topic directory does not exist; skipping");
            return groups;
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().map(|ext| ext != "json").unwrap_or(true)
            {
                continue;
            }

            match groups.merge_file(path) {
                Ok(added) => debug!(path = %path.display(), added, "merged group file"),
                Err(e @ GroupError::InvalidShape { .. }) => warn!("{}", e),
                Err(e) => error!("{}", e),
            }
        }

        groups
    }

    /// Merge one group file, returning how many keys it set
    pub fn merge_file(&mut self, path: &Path) -> Result<usize, GroupError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let text = fs::read_to_string(path).map_err(|source| GroupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| GroupError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_value(&stem, value)
            .map_err(|reason| GroupError::InvalidShape {
                path: path.to_path_buf(),
                reason,
            })
    }

    /// Merge one decoded group, named `stem` unless it names itself
    fn merge_value(&mut self, stem: &str, value: Value) -> Result<usize, String> {
        let spec: GroupSpec = match value {
            Value::Array(stocks) => {
                self.0.insert(stem.to_string(), stocks);
                return Ok(1);
            }
            Value::Object(_) => serde_json::from_value(value).map_err(|e| e.to_string())?,
            _ => return Err("group file must be a list or an object".to_string()),
        };

        let name = spec
            .name
            .as_ref()
            .and_then(group_key)
            .unwrap_or_else(|| stem.to_string());

        let stocks = match spec.stocks_field() {
            Some(Value::Array(stocks)) => stocks.clone(),
            _ => return Err("no valid stock list field".to_string()),
        };

        let aliases: Vec<String> = match spec.alias_field() {
            None => Vec::new(),
            Some(Value::String(alias)) => vec![alias.clone()],
            Some(Value::Array(list)) => list.iter().filter_map(group_key).collect(),
            Some(other) => {
                // the group itself is still kept
                warn!(group = %name, aliases = %other, "aliases must be a string or a list; ignoring");
                Vec::new()
            }
        };

        let mut added = 1;
        for alias in aliases.into_iter().filter(|a| *a != name) {
            self.0.insert(alias, stocks.clone());
            added += 1;
        }
        self.0.insert(name, stocks);
        Ok(added)
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize with sorted keys and four-space indentation
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the merged groups to `path`
    pub fn write(&self, path: &Path) -> Result<(), GroupError> {
        let json = self.to_json().map_err(|source| GroupError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| GroupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), groups = self.len(), "wrote stock groups");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merged(stem: &str, value: Value) -> StockGroups {
        let mut groups = StockGroups::new();
        groups.merge_value(stem, value).unwrap();
        groups
    }

    #[test]
    fn test_bare_list_uses_stem() {
        let groups = merged("券商", json!(["中信证券", "华泰证券"]));
        assert_eq!(groups.get("券商").unwrap(), &[json!("中信证券"), json!("华泰证券")]);
    }

    #[test]
    fn test_object_with_name_and_aliases() {
        let groups = merged(
            "file",
            json!({"name": "数字货币", "aliases": ["DCEP", "数字货币", ""], "stocks": ["A"]}),
        );
        let names: Vec<_> = groups.names().collect();
        assert_eq!(names, vec!["DCEP", "数字货币"]);
        assert_eq!(groups.get("DCEP").unwrap(), &[json!("A")]);
    }

    #[test]
    fn test_single_alias_string() {
        let groups = merged("AI", json!({"alias": "人工智能", "list": ["B"]}));
        assert_eq!(groups.get("AI").unwrap(), &[json!("B")]);
        assert_eq!(groups.get("人工智能").unwrap(), &[json!("B")]);
    }

    #[test]
    fn test_field_priority() {
        // empty `aliases` falls through to `alias`; `stocks` beats `items`
        let groups = merged(
            "g",
            json!({"aliases": [], "alias": "x", "items": ["late"], "stocks": ["early"]}),
        );
        assert_eq!(groups.get("g").unwrap(), &[json!("early")]);
        assert_eq!(groups.get("x").unwrap(), &[json!("early")]);

        let groups = merged("g", json!({"股票组": ["cn"], "content": ["other"]}));
        assert_eq!(groups.get("g").unwrap(), &[json!("cn")]);
    }

    #[test]
    fn test_first_truthy_stock_field_must_be_list() {
        let mut groups = StockGroups::new();
        let result = groups.merge_value("g", json!({"stocks": "A", "list": ["B"]}));
        assert!(result.is_err());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_empty_name_falls_back_to_stem() {
        let groups = merged("stem", json!({"name": "", "content": ["C"]}));
        assert_eq!(groups.get("stem").unwrap(), &[json!("C")]);
    }

    #[test]
    fn test_scalar_file_is_rejected() {
        let mut groups = StockGroups::new();
        assert!(groups.merge_value("g", json!("just a string")).is_err());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_invalid_aliases_keep_main_group() {
        let mut groups = StockGroups::new();
        let added = groups
            .merge_value("g", json!({"name": "main", "aliases": 5, "stocks": ["A"]}))
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(groups.names().collect::<Vec<_>>(), vec!["main"]);
        assert_eq!(groups.get("main").unwrap(), &[json!("A")]);
    }

    #[test]
    fn test_to_json_layout() {
        let groups = merged("b", json!(["中信证券"]));
        let mut all = groups.clone();
        all.merge_value("a", json!([])).unwrap();
        assert_eq!(
            all.to_json().unwrap(),
            "{\n    \"a\": [],\n    \"b\": [\n        \"中信证券\"\n    ]\n}"
        );
    }
}
