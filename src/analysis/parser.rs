//! Topic section parser
//!
//! Reads a stock document line by line and extracts its title plus the
//! mentions listed under the reserved topics section:
//!
//! ```text
//! # 招商银行
//!
//! ## 题材
//!
//! ### 金融科技
//! Commentary about the theme.
//! - 数字货币
//! - 跨境支付
//! ```

use super::types::{SourceDocument, StockDocument, TopicMention};
use tracing::debug;

/// Default title of the second-level section holding topic mentions
pub const DEFAULT_TOPICS_SECTION: &str = "题材";

/// Where the parser is relative to the topics section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Not inside a topics section
    OutsideTopicSection,
    /// Inside the topics section, before any mention heading
    SectionPreamble,
    /// Collecting commentary for the open mention
    InMention,
    /// Collecting attached-topic items for the open mention
    InAttachedList,
}

/// Classification of a single body line inside a mention
#[derive(Debug, PartialEq, Eq)]
enum BodyLine<'a> {
    /// `- text` list item; carries the trimmed text
    Item(&'a str),
    Blank,
    Text,
}

/// A mention whose heading has been seen but whose body is still open
#[derive(Debug)]
struct OpenMention<'a> {
    name: String,
    comment: Vec<&'a str>,
    attached: Vec<String>,
}

impl<'a> OpenMention<'a> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            comment: Vec::new(),
            attached: Vec::new(),
        }
    }

    fn close(self) -> (String, TopicMention) {
        let comment = self.comment.join("\n").trim().to_string();
        (self.name, TopicMention::new(comment, self.attached))
    }
}

/// Parser for stock documents
#[derive(Debug, Clone)]
pub struct DocumentParser {
    section_label: String,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser {
    pub fn new() -> Self {
        Self {
            section_label: DEFAULT_TOPICS_SECTION.to_string(),
        }
    }

    /// Use a different topics section title
    pub fn with_section_label(mut self, label: impl Into<String>) -> Self {
        self.section_label = label.into();
        self
    }

    pub fn section_label(&self) -> &str {
        &self.section_label
    }

    /// Parse a discovered document, falling back to its file stem for the identifier
    pub fn parse_source(&self, document: &SourceDocument) -> StockDocument {
        self.parse(&document.content, &document.stem)
    }

    /// Parse raw document text
    ///
    /// `fallback_identifier` is used when the text has no top-level heading.
    pub fn parse(&self, content: &str, fallback_identifier: &str) -> StockDocument {
        let identifier = Self::title(content)
            .unwrap_or(fallback_identifier)
            .to_string();
        let mut document = StockDocument::new(identifier);

        let mut state = ParseState::OutsideTopicSection;
        let mut open: Option<OpenMention<'_>> = None;

        for line in content.lines() {
            if let Some(title) = heading_text(line, 2) {
                Self::flush(&mut open, &mut document);
                state = if title == self.section_label {
                    ParseState::SectionPreamble
                } else {
                    ParseState::OutsideTopicSection
                };
                continue;
            }

            if state == ParseState::OutsideTopicSection {
                continue;
            }

            if let Some(name) = heading_text(line, 3) {
                Self::flush(&mut open, &mut document);
                // An empty heading closes the previous mention without opening a new one
                if name.is_empty() {
                    state = ParseState::SectionPreamble;
                } else {
                    open = Some(OpenMention::new(name));
                    state = ParseState::InMention;
                }
                continue;
            }

            let Some(mention) = open.as_mut() else {
                continue;
            };

            state = match (state, classify_body_line(line)) {
                (_, BodyLine::Item(text)) => {
                    if !text.is_empty() {
                        mention.attached.push(text.to_string());
                    }
                    ParseState::InAttachedList
                }
                (ParseState::InAttachedList, BodyLine::Blank) => ParseState::InMention,
                // Text inside a list is kept as comment and does not end the list
                (current, _) => {
                    mention.comment.push(line);
                    current
                }
            };
        }

        Self::flush(&mut open, &mut document);

        debug!(
            identifier = %document.identifier,
            topics = document.topics.len(),
            "parsed stock document"
        );
        document
    }

    /// Text of the first top-level heading with a non-empty title
    fn title(content: &str) -> Option<&str> {
        content
            .lines()
            .filter_map(|line| heading_text(line, 1))
            .find(|text| !text.is_empty())
    }

    fn flush(open: &mut Option<OpenMention<'_>>, document: &mut StockDocument) {
        if let Some(mention) = open.take() {
            let (name, mention) = mention.close();
            document.topics.insert(name, mention);
        }
    }
}

/// Trimmed text of a heading with exactly `level` markers, or `None` if the line is not one
///
/// The markers must be followed by whitespace, so `###` never reads as a level-2 heading.
fn heading_text(line: &str, level: usize) -> Option<&str> {
    let bytes = line.as_bytes();
    if bytes.len() <= level || !bytes[..level].iter().all(|b| *b == b'#') {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn classify_body_line(line: &str) -> BodyLine<'_> {
    if let Some(rest) = line.strip_prefix('-') {
        // a dash, at least one whitespace character, then at least one more character
        if rest.starts_with(char::is_whitespace) && rest.chars().nth(1).is_some() {
            return BodyLine::Item(rest.trim());
        }
    }
    if line.trim().is_empty() {
        BodyLine::Blank
    } else {
        BodyLine::Text
    }
}
