//! Markdown rendering of topic documents
//!
//! Main-topic documents link to every tagged stock (anchored at the topic's
//! heading inside the stock document) and to their attached topics.
//! Attached-topic documents link back to their main topics and stocks.

use super::sink::{Collection, DocumentSink, RenderError};
use super::{FailurePolicy, RenderFailure, RenderReport};
use crate::config::{Labels, TopicGraphConfig};
use crate::graph::{AttachedTopic, MainTopic, StockLocator, TopicGraph};
use tracing::{debug, warn};

/// Renders a [`TopicGraph`] into cross-linked markdown documents
#[derive(Debug, Clone)]
pub struct TopicRenderer {
    labels: Labels,
    stocks_link_base: String,
    policy: FailurePolicy,
}

impl Default for TopicRenderer {
    fn default() -> Self {
        Self::from_config(&TopicGraphConfig::default())
    }
}

impl TopicRenderer {
    pub fn from_config(config: &TopicGraphConfig) -> Self {
        Self {
            labels: config.labels.clone(),
            stocks_link_base: config.stocks_link_base.clone(),
            policy: config.failure_policy,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fragment pointing at a topic heading inside a stock document
    pub fn anchor(topic_name: &str) -> String {
        topic_name.replace([' ', '_'], "-")
    }

    /// List line for a stock, linked when its source document is known
    fn stock_line(&self, stock: &str, anchor: &str, locator: &StockLocator) -> String {
        match locator.get(stock) {
            Some(path) => format!(
                "- [{}]({}/{}#{})\n",
                stock, self.stocks_link_base, path, anchor
            ),
            None => format!("- {}\n", stock),
        }
    }

    pub fn render_main_topic(&self, topic: &MainTopic, locator: &StockLocator) -> String {
        let mut content = format!("# {}\n\n", topic.name);

        if !topic.stocks.is_empty() {
            content.push_str(&format!("## {}\n\n", self.labels.stock_list));
            let anchor = Self::anchor(&topic.name);
            for stock in &topic.stocks {
                content.push_str(&self.stock_line(stock, &anchor, locator));
            }
            content.push('\n');
        }

        if !topic.attached.is_empty() {
            content.push_str(&format!("## {}\n\n", self.labels.attached_topics));
            for attached in &topic.attached {
                content.push_str(&format!(
                    "- [{}](../{}/{}.md)\n",
                    attached, self.labels.attached_dir, attached
                ));
            }
            content.push('\n');
        }

        content
    }

    pub fn render_attached_topic(&self, topic: &AttachedTopic, locator: &StockLocator) -> String {
        let mut content = format!("# {}\n\n", topic.name);

        if !topic.related_main_topics.is_empty() {
            content.push_str(&format!("## {}\n\n", self.labels.related_main_topics));
            for main in &topic.related_main_topics {
                content.push_str(&format!(
                    "- [{}](../{}/{}.md)\n",
                    main, self.labels.main_dir, main
                ));
            }
            content.push('\n');
        }

        if !topic.related_stocks.is_empty() {
            content.push_str(&format!("## {}\n\n", self.labels.related_stocks));
            for stock in &topic.related_stocks {
                content.push_str(&self.stock_line(stock, &self.labels.attached_anchor, locator));
            }
        }

        content
    }

    /// Render every main and attached topic into `sink`
    ///
    /// With [`FailurePolicy::Abort`] the first write error is returned; with
    /// [`FailurePolicy::Continue`] failures are collected in the report.
    pub fn render_all(
        &self,
        graph: &TopicGraph,
        sink: &mut dyn DocumentSink,
    ) -> Result<RenderReport, RenderError> {
        let mut report = RenderReport::default();

        for topic in graph.main_topics.values() {
            let content = self.render_main_topic(topic, &graph.locator);
            if self.write(sink, Collection::MainTopics, &topic.name, &content, &mut report)? {
                report.main_topics_written += 1;
                debug!(topic = %topic.name, stocks = topic.stocks.len(), "wrote main topic");
            }
        }

        for topic in graph.attached_topics.values() {
            let content = self.render_attached_topic(topic, &graph.locator);
            if self.write(sink, Collection::AttachedTopics, &topic.name, &content, &mut report)? {
                report.attached_topics_written += 1;
                debug!(
                    topic = %topic.name,
                    main_topics = topic.related_main_topics.len(),
                    stocks = topic.related_stocks.len(),
                    "wrote attached topic"
                );
            }
        }

        Ok(report)
    }

    /// Write one document, applying the failure policy; `Ok(true)` if written
    fn write(
        &self,
        sink: &mut dyn DocumentSink,
        collection: Collection,
        name: &str,
        content: &str,
        report: &mut RenderReport,
    ) -> Result<bool, RenderError> {
        match sink.write(collection, name, content) {
            Ok(()) => Ok(true),
            Err(error) => match self.policy {
                FailurePolicy::Abort => Err(error),
                FailurePolicy::Continue => {
                    warn!(%collection, name, error = %error, "failed to write topic document");
                    report.failures.push(RenderFailure {
                        collection,
                        name: name.to_string(),
                        error,
                    });
                    Ok(false)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySink;
    use std::path::Path;

    fn theme1() -> MainTopic {
        MainTopic {
            name: "Theme1".into(),
            stocks: vec!["StockA".into(), "StockB".into()],
            comment: "some note".into(),
            attached: vec!["SubA".into()],
        }
    }

    fn sub_a() -> AttachedTopic {
        AttachedTopic {
            name: "SubA".into(),
            related_main_topics: vec!["Theme1".into()],
            related_stocks: vec!["StockA".into(), "StockB".into()],
        }
    }

    fn locator() -> StockLocator {
        let mut locator = StockLocator::new();
        locator.insert("StockA", Path::new("StockA.md"));
        locator.insert("StockB", Path::new("bank/StockB.md"));
        locator
    }

    #[test]
    fn test_render_main_topic() {
        let rendered = TopicRenderer::default().render_main_topic(&theme1(), &locator());
        assert_eq!(
            rendered,
            "# Theme1\n\n\
             ## 股票列表\n\n\
             - [StockA](../../stocks/StockA.md#Theme1)\n\
             - [StockB](../../stocks/bank/StockB.md#Theme1)\n\n\
             ## 附带题材\n\n\
             - [SubA](../附带题材/SubA.md)\n\n"
        );
    }

    #[test]
    fn test_render_attached_topic() {
        let rendered = TopicRenderer::default().render_attached_topic(&sub_a(), &locator());
        assert_eq!(
            rendered,
            "# SubA\n\n\
             ## 相关主题材\n\n\
             - [Theme1](../主题材/Theme1.md)\n\n\
             ## 相关股票\n\n\
             - [StockA](../../stocks/StockA.md#题材)\n\
             - [StockB](../../stocks/bank/StockB.md#题材)\n"
        );
    }

    #[test]
    fn test_unlocated_stock_is_plain_text() {
        let topic = MainTopic {
            name: "Theme1".into(),
            stocks: vec!["Ghost".into()],
            comment: String::new(),
            attached: vec![],
        };
        let rendered = TopicRenderer::default().render_main_topic(&topic, &StockLocator::new());
        assert_eq!(rendered, "# Theme1\n\n## 股票列表\n\n- Ghost\n\n");
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let topic = AttachedTopic {
            name: "Lonely".into(),
            related_main_topics: vec![],
            related_stocks: vec![],
        };
        let rendered = TopicRenderer::default().render_attached_topic(&topic, &locator());
        assert_eq!(rendered, "# Lonely\n\n");
    }

    #[test]
    fn test_anchor_normalizes_spaces_and_underscores() {
        assert_eq!(TopicRenderer::anchor("AI chips_2024"), "AI-chips-2024");
        assert_eq!(TopicRenderer::anchor("a  b"), "a--b");
        assert_eq!(TopicRenderer::anchor("金融科技"), "金融科技");
    }

    #[test]
    fn test_custom_labels_and_link_base() {
        let mut config = TopicGraphConfig::default();
        config.stocks_link_base = "../stocks".into();
        config.labels.attached_dir = "attached".into();
        config.labels.stock_list = "Stocks".into();
        config.labels.attached_topics = "Attached".into();

        let rendered = TopicRenderer::from_config(&config).render_main_topic(&theme1(), &locator());
        assert!(rendered.contains("## Stocks\n"));
        assert!(rendered.contains("- [StockA](../stocks/StockA.md#Theme1)\n"));
        assert!(rendered.contains("## Attached\n\n- [SubA](../attached/SubA.md)\n"));
    }

    /// Sink that rejects one named document
    struct RejectingSink {
        inner: MemorySink,
        reject: &'static str,
    }

    impl DocumentSink for RejectingSink {
        fn write(
            &mut self,
            collection: Collection,
            name: &str,
            content: &str,
        ) -> Result<(), RenderError> {
            if name == self.reject {
                return Err(RenderError::Rejected {
                    collection,
                    name: name.to_string(),
                    reason: "read-only".into(),
                });
            }
            self.inner.write(collection, name, content)
        }
    }

    fn graph_with_three_topics() -> TopicGraph {
        let mut graph = TopicGraph {
            locator: locator(),
            ..TopicGraph::default()
        };
        for name in ["A", "B", "C"] {
            let mut topic = theme1();
            topic.name = name.into();
            graph.main_topics.insert(name.into(), topic);
        }
        graph.attached_topics.insert("SubA".into(), sub_a());
        graph
    }

    #[test]
    fn test_abort_policy_stops_at_first_failure() {
        let mut sink = RejectingSink {
            inner: MemorySink::new(),
            reject: "B",
        };
        let result = TopicRenderer::default()
            .with_policy(FailurePolicy::Abort)
            .render_all(&graph_with_three_topics(), &mut sink);

        assert!(matches!(result, Err(RenderError::Rejected { .. })));
        assert_eq!(sink.inner.names(Collection::MainTopics), vec!["A"]);
        assert!(sink.inner.names(Collection::AttachedTopics).is_empty());
    }

    #[test]
    fn test_continue_policy_renders_the_rest() {
        let mut sink = RejectingSink {
            inner: MemorySink::new(),
            reject: "B",
        };
        let report = TopicRenderer::default()
            .with_policy(FailurePolicy::Continue)
            .render_all(&graph_with_three_topics(), &mut sink)
            .unwrap();

        assert_eq!(report.main_topics_written, 2);
        assert_eq!(report.attached_topics_written, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "B");
        assert_eq!(sink.inner.names(Collection::MainTopics), vec!["A", "C"]);
    }
}
