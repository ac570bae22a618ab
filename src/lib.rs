//! topicgraph: cross-linked topic pages from a stock knowledge base
//!
//! Each stock document names the investment themes ("topics") the stock
//! belongs to, with commentary and a list of attached secondary themes.
//! This crate folds a corpus of such documents into a topic graph and
//! renders it back out as navigable markdown.
//!
//! # Core Concepts
//!
//! - **Main topics**: themes listed as `###` headings under a stock's topics section
//! - **Attached topics**: `- item` entries listed under a main topic mention
//! - **Locator**: stock identifier -> source document, used for links
//!
//! # Example
//!
//! ```
//! use topicgraph::{Corpus, SourceDocument, TopicPipeline};
//!
//! let corpus = Corpus::from_documents(
//!     "stocks",
//!     vec![SourceDocument::new("StockA.md", "# StockA\n## 题材\n### Theme1\n- SubA\n")],
//! );
//! let graph = TopicPipeline::default().build_graph(&corpus);
//! assert_eq!(graph.main_topic("Theme1").unwrap().stocks, vec!["StockA"]);
//! ```

pub mod analysis;
pub mod config;
pub mod corpus;
mod error;
pub mod graph;
pub mod groups;
pub mod pipeline;
pub mod render;

pub use analysis::{DocumentParser, SourceDocument, StockDocument, StockInfo, TopicMention};
pub use config::{ConfigError, Labels, TopicGraphConfig};
pub use corpus::{Corpus, CorpusError};
pub use error::{TopicGraphError, TopicGraphResult};
pub use graph::{AttachedTopic, CorpusAggregator, MainTopic, StockLocator, TopicGraph};
pub use groups::{GroupError, StockGroups};
pub use pipeline::{RunSummary, TopicPipeline};
pub use render::{
    Collection, DocumentSink, FailurePolicy, FsSink, MemorySink, RenderError, RenderReport,
    TopicRenderer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
