pub mod json;
pub mod yaml;

pub use json::JsonNode;
pub use yaml::YamlNode;

use thiserror::Error;

use crate::report::Position;

/// A half-open byte range in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Raised when a document cannot be turned into a parse tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(String),
}

/// The original document text, used to resolve byte spans into line/column
/// positions. Nodes keep spans only; the source travels alongside them so a
/// node tree never holds the text it was parsed from.
pub struct Source<'a> {
    text: &'a str,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Resolves a span to a 1-based line/column position. The highlight is
    /// the spanned text when it fits on one line, otherwise the line the span
    /// starts on.
    pub fn locate(&self, span: Span) -> Position {
        let offset = span.start.min(self.text.len());
        let line_start = self.text[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line = self.text[..line_start].matches('\n').count() + 1;
        let column = self.text[line_start..offset].chars().count() + 1;

        let line_end = self.text[line_start..]
            .find('\n')
            .map_or(self.text.len(), |i| line_start + i);
        let end = span.end.min(self.text.len());
        let highlight = if end > offset && end <= line_end {
            &self.text[offset..end]
        } else {
            &self.text[line_start..line_end]
        };

        Position::new(line, column, highlight.trim())
    }
}

/// A scalar literal carried by a leaf node.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// The capability interface the validator consumes. Both parse-tree flavors
/// (JSON and YAML) implement it, abstracting over how each format records
/// spans, keys, and scalar literals.
pub trait SourceNode {
    /// Position of this node's value in the document.
    fn value_position(&self, source: &Source) -> Position;

    /// Position of the key naming this node, for mapping entries. Falls back
    /// to the value position for nodes that were never a mapping value.
    fn key_position(&self, source: &Source) -> Position;

    /// The scalar literal, if this node is a leaf.
    fn literal_value(&self) -> Option<Scalar>;

    /// Child at `index` for sequence nodes.
    fn indexed_child(&self, index: usize) -> Option<&dyn SourceNode>;

    /// Key/child entries in document order for mapping nodes; `None` when
    /// this node is not a mapping.
    fn keyed_children(&self) -> Option<Vec<(&str, &dyn SourceNode)>>;

    /// The document-correlation tag convention of the producing format.
    fn tag(&self) -> &'static str;
}
