//! Run configuration
//!
//! Loaded from YAML. Every field is optional; missing fields take the
//! defaults below, which match the conventional repository layout:
//!
//! ```yaml
//! stocks_dir: stocks
//! output_dir: topics
//! topic_dir: topic
//! group_output: stockGroup.json
//! stocks_link_base: ../../stocks
//! failure_policy: abort
//! labels:
//!   topics_section: 题材
//!   main_dir: 主题材
//!   attached_dir: 附带题材
//! ```

use crate::analysis::DEFAULT_TOPICS_SECTION;
use crate::render::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Headings, directory names and anchors used in source and output documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Second-level heading of the topics section in stock documents
    pub topics_section: String,
    /// Stock list heading in main-topic documents
    pub stock_list: String,
    /// Attached topics heading in main-topic documents
    pub attached_topics: String,
    /// Main topics heading in attached-topic documents
    pub related_main_topics: String,
    /// Stocks heading in attached-topic documents
    pub related_stocks: String,
    /// Output directory for main-topic documents
    pub main_dir: String,
    /// Output directory for attached-topic documents
    pub attached_dir: String,
    /// Fragment used when an attached-topic document links to a stock
    pub attached_anchor: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            topics_section: DEFAULT_TOPICS_SECTION.to_string(),
            stock_list: "股票列表".to_string(),
            attached_topics: "附带题材".to_string(),
            related_main_topics: "相关主题材".to_string(),
            related_stocks: "相关股票".to_string(),
            main_dir: "主题材".to_string(),
            attached_dir: "附带题材".to_string(),
            attached_anchor: DEFAULT_TOPICS_SECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicGraphConfig {
    /// Root of the stock document corpus
    pub stocks_dir: PathBuf,
    /// Root the topic document directories are written under
    pub output_dir: PathBuf,
    /// Directory of stock group JSON files
    pub topic_dir: PathBuf,
    /// Merged stock group file
    pub group_output: PathBuf,
    /// Link prefix from a topic document to the stock corpus
    pub stocks_link_base: String,
    pub failure_policy: FailurePolicy,
    pub labels: Labels,
}

impl Default for TopicGraphConfig {
    fn default() -> Self {
        Self {
            stocks_dir: PathBuf::from("stocks"),
            output_dir: PathBuf::from("topics"),
            topic_dir: PathBuf::from("topic"),
            group_output: PathBuf::from("stockGroup.json"),
            stocks_link_base: "../../stocks".to_string(),
            failure_policy: FailurePolicy::default(),
            labels: Labels::default(),
        }
    }
}

impl TopicGraphConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Default config location (`<config dir>/topicgraph/config.yaml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("topicgraph").join("config.yaml"))
    }

    /// Load `explicit` if given, else the default location if it exists, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
