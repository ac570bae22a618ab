//! Topic graph: aggregation of parsed stock documents

mod aggregator;
mod locator;
mod topic;


pub use aggregator::CorpusAggregator;
pub use locator::{to_posix, StockLocator};
pub use topic::{AttachedTopic, MainTopic, TopicGraph};
