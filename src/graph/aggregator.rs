//! Corpus aggregator
//!
//! Folds parsed stock documents into the topic graph:
//!
//! - main topic -> stocks, merged comment, union of attached topics
//! - attached topic -> main topics
//! - attached topic -> stocks
//! - stock -> source document path
//!
//! One aggregator is built per run and consumed by `finish()`.

use super::locator::StockLocator;
use super::topic::{AttachedTopic, MainTopic, TopicGraph};
use crate::analysis::{StockDocument, TopicMention};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Commentary merged from successive mentions of one topic
///
/// The first non-empty comment wins; later comments are appended on new
/// lines unless the merged text already contains them.
#[derive(Debug, Default)]
struct MergedComment {
    parts: Vec<String>,
}

impl MergedComment {
    fn merge(&mut self, comment: &str) {
        if !comment.is_empty() && !self.text().contains(comment) {
            self.parts.push(comment.to_string());
        }
    }

    fn text(&self) -> String {
        self.parts.join("\n")
    }
}

#[derive(Debug, Default)]
struct MainTopicState {
    stocks: BTreeSet<String>,
    comment: MergedComment,
    /// stock -> attached names that stock listed under this topic
    stock_attached: BTreeMap<String, BTreeSet<String>>,
}

impl MainTopicState {
    fn attached_union(&self) -> Vec<String> {
        self.stock_attached
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Accumulates parsed documents into a [`TopicGraph`]
#[derive(Debug, Default)]
pub struct CorpusAggregator {
    main_topics: BTreeMap<String, MainTopicState>,
    attached_to_main: BTreeMap<String, BTreeSet<String>>,
    attached_to_stocks: BTreeMap<String, BTreeSet<String>>,
    locator: StockLocator,
    documents: usize,
}

impl CorpusAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed document, found at `source_path` relative to the corpus root
    pub fn fold(&mut self, document: &StockDocument, source_path: &Path) {
        let stock = document.identifier.as_str();

        if let Some(previous) = self.locator.insert(stock, source_path) {
            debug!(stock, previous = %previous, "stock identifier seen twice; keeping latest path");
        }

        for (topic_name, mention) in &document.topics {
            self.fold_mention(stock, topic_name, mention);
        }

        self.documents += 1;
    }

    fn fold_mention(&mut self, stock: &str, topic_name: &str, mention: &TopicMention) {
        let state = self.main_topics.entry(topic_name.to_string()).or_default();
        state.stocks.insert(stock.to_string());
        state.comment.merge(&mention.comment);

        for attached in mention.attached.iter().filter(|a| !a.is_empty()) {
            state
                .stock_attached
                .entry(stock.to_string())
                .or_default()
                .insert(attached.clone());
            self.attached_to_main
                .entry(attached.clone())
                .or_default()
                .insert(topic_name.to_string());
            self.attached_to_stocks
                .entry(attached.clone())
                .or_default()
                .insert(stock.to_string());
        }
    }

    /// Number of documents folded so far
    pub fn documents_folded(&self) -> usize {
        self.documents
    }

    /// Finalize into a graph with every sequence sorted
    pub fn finish(self) -> TopicGraph {
        let main_topics = self
            .main_topics
            .into_iter()
            .map(|(name, state)| {
                let topic = MainTopic {
                    name: name.clone(),
                    stocks: state.stocks.iter().cloned().collect(),
                    comment: state.comment.text(),
                    attached: state.attached_union(),
                };
                (name, topic)
            })
            .collect();

        let mut attached_to_stocks = self.attached_to_stocks;
        let attached_topics = self
            .attached_to_main
            .into_iter()
            .map(|(name, mains)| {
                let stocks = attached_to_stocks.remove(&name).unwrap_or_default();
                let topic = AttachedTopic {
                    name: name.clone(),
                    related_main_topics: mains.into_iter().collect(),
                    related_stocks: stocks.into_iter().collect(),
                };
                (name, topic)
            })
            .collect();

        TopicGraph {
            main_topics,
            attached_topics,
            locator: self.locator,
        }
    }
}
