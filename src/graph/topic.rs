//! Aggregated topic entities

use super::locator::StockLocator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A primary theme and every stock tagged with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainTopic {
    pub name: String,
    /// Stock identifiers, sorted
    pub stocks: Vec<String>,
    /// Merged commentary from all mentions
    pub comment: String,
    /// Union of attached topic names across all mentions, sorted
    pub attached: Vec<String>,
}

/// A secondary theme and the main topics and stocks it hangs off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedTopic {
    pub name: String,
    /// Main topics it was listed under, sorted
    pub related_main_topics: Vec<String>,
    /// Stocks that listed it, sorted
    pub related_stocks: Vec<String>,
}

/// The finished aggregation of a stock corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicGraph {
    pub main_topics: BTreeMap<String, MainTopic>,
    pub attached_topics: BTreeMap<String, AttachedTopic>,
    pub locator: StockLocator,
}

impl TopicGraph {
    pub fn main_topic(&self, name: &str) -> Option<&MainTopic> {
        self.main_topics.get(name)
    }

    pub fn attached_topic(&self, name: &str) -> Option<&AttachedTopic> {
        self.attached_topics.get(name)
    }

    pub fn main_topic_count(&self) -> usize {
        self.main_topics.len()
    }

    pub fn attached_topic_count(&self) -> usize {
        self.attached_topics.len()
    }

    /// Pretty-printed JSON dump of the whole graph
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
