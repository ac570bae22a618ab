//! End-to-end topic generation
//!
//! Pipeline steps:
//! 1. Discover and read every stock document under the corpus root
//! 2. Parse each document into its identifier and topic mentions
//! 3. Fold all documents into a fresh aggregator
//! 4. Render one document per main topic and per attached topic

use crate::analysis::DocumentParser;
use crate::config::TopicGraphConfig;
use crate::corpus::Corpus;
use crate::error::TopicGraphResult;
use crate::graph::{CorpusAggregator, TopicGraph};
use crate::render::{DocumentSink, RenderError, RenderReport, TopicRenderer};
use std::path::Path;
use tracing::info;

/// What a full run produced
#[derive(Debug)]
pub struct RunSummary {
    pub graph: TopicGraph,
    /// Documents parsed and folded
    pub documents: usize,
    /// Documents skipped because they could not be read
    pub skipped: usize,
    pub report: RenderReport,
}

/// Parser, aggregator and renderer wired together
#[derive(Debug, Clone, Default)]
pub struct TopicPipeline {
    parser: DocumentParser,
    renderer: TopicRenderer,
}

impl TopicPipeline {
    pub fn new(parser: DocumentParser, renderer: TopicRenderer) -> Self {
        Self { parser, renderer }
    }

    pub fn from_config(config: &TopicGraphConfig) -> Self {
        Self {
            parser: DocumentParser::new().with_section_label(&config.labels.topics_section),
            renderer: TopicRenderer::from_config(config),
        }
    }

    pub fn parser(&self) -> &DocumentParser {
        &self.parser
    }

    pub fn renderer(&self) -> &TopicRenderer {
        &self.renderer
    }

    /// Parse every document of `corpus` and aggregate the results
    pub fn build_graph(&self, corpus: &Corpus) -> TopicGraph {
        let mut aggregator = CorpusAggregator::new();
        for source in &corpus.documents {
            let document = self.parser.parse_source(source);
            aggregator.fold(&document, &source.relative_path);
        }
        aggregator.finish()
    }

    pub fn render(
        &self,
        graph: &TopicGraph,
        sink: &mut dyn DocumentSink,
    ) -> Result<RenderReport, RenderError> {
        self.renderer.render_all(graph, sink)
    }

    /// Scan `stocks_dir`, aggregate it and render into `sink`
    pub fn run(&self, stocks_dir: &Path, sink: &mut dyn DocumentSink) -> TopicGraphResult<RunSummary> {
        info!(dir = %stocks_dir.display(), "collecting topics");
        let corpus = Corpus::scan(stocks_dir)?;
        let graph = self.build_graph(&corpus);

        info!(
            documents = corpus.len(),
            skipped = corpus.skipped.len(),
            main_topics = graph.main_topic_count(),
            attached_topics = graph.attached_topic_count(),
            "aggregated topic graph"
        );

        let report = self.render(&graph, sink)?;
        info!(
            main_topics = report.main_topics_written,
            attached_topics = report.attached_topics_written,
            failures = report.failures.len(),
            "rendered topic documents"
        );

        Ok(RunSummary {
            graph,
            documents: corpus.len(),
            skipped: corpus.skipped.len(),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SourceDocument;
    use crate::render::{Collection, MemorySink};

    fn corpus() -> Corpus {
        Corpus::from_documents(
            "stocks",
            vec![
                SourceDocument::new(
                    "StockA.md",
                    "# StockA\n\n## 题材\n\n### Theme1\nsome note\n- SubA\n",
                ),
                SourceDocument::new("StockB.md", "# StockB\n\n## 题材\n\n### Theme1\n- SubA\n"),
            ],
        )
    }

    #[test]
    fn test_build_and_render() {
        let pipeline = TopicPipeline::default();
        let graph = pipeline.build_graph(&corpus());

        let theme = graph.main_topic("Theme1").unwrap();
        assert_eq!(theme.stocks, vec!["StockA", "StockB"]);
        assert_eq!(theme.comment, "some note");
        assert_eq!(theme.attached, vec!["SubA"]);

        let mut sink = MemorySink::new();
        let report = pipeline.render(&graph, &mut sink).unwrap();
        assert!(report.is_complete());
        assert_eq!(sink.names(Collection::MainTopics), vec!["Theme1"]);
        assert_eq!(sink.names(Collection::AttachedTopics), vec!["SubA"]);

        let sub = sink.get(Collection::AttachedTopics, "SubA").unwrap();
        assert!(sub.contains("- [Theme1](../主题材/Theme1.md)"));
        assert!(sub.contains("- [StockB](../../stocks/StockB.md#题材)"));
    }

    #[test]
    fn test_section_label_from_config() {
        let mut config = TopicGraphConfig::default();
        config.labels.topics_section = "Topics".into();
        let pipeline = TopicPipeline::from_config(&config);

        let corpus = Corpus::from_documents(
            "stocks",
            vec![SourceDocument::new("X.md", "# X\n## Topics\n### AI\n")],
        );
        let graph = pipeline.build_graph(&corpus);
        assert_eq!(graph.main_topic("AI").unwrap().stocks, vec!["X"]);
    }
}
