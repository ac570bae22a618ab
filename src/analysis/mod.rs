//! Stock document analysis
//!
//! - **DocumentParser**: extracts the stock identifier and its topic mentions
//!   from the reserved topics section of a document
//! - **info**: reads stock code and tags from fenced blocks
//!
//! # Example
//!
//! ```
//! use topicgraph::analysis::DocumentParser;
//!
//! let doc = DocumentParser::new().parse("# StockA\n## 题材\n### Theme1\n- SubA\n", "fallback");
//! assert_eq!(doc.identifier, "StockA");
//! assert_eq!(doc.topics["Theme1"].attached, vec!["SubA".to_string()]);
//! ```

pub mod info;
mod parser;
mod types;

pub use info::{extract_stock_info, scan_stocks_dir, StockInfo};
pub use parser::{DocumentParser, DEFAULT_TOPICS_SECTION};
pub use types::{SourceDocument, StockDocument, TopicMention};
