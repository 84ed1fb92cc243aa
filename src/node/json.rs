use yaml_spanned::{Spanned, Value, from_str};

use super::{ParseError, Scalar, Source, SourceNode, Span};
use crate::report::Position;

/// Parse tree of a JSON document. JSON is a YAML subset, so spans come from
/// the same span-preserving parser; the document is checked with the strict
/// JSON parser first so YAML-only constructs are rejected up front.
pub struct JsonNode {
    span: Span,
    key_span: Option<Span>,
    content: Content,
}

enum Content {
    Scalar(Scalar),
    Sequence(Vec<JsonNode>),
    Mapping(Vec<(String, JsonNode)>),
}

impl JsonNode {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        serde_json::from_str::<serde_json::Value>(text)?;
        let spanned: Spanned<Value> =
            from_str(text).map_err(|e| ParseError::Yaml(e.to_string()))?;
        Ok(Self::convert(&spanned, None))
    }

    fn convert(spanned: &Spanned<Value>, key_span: Option<Span>) -> Self {
        let span = span_of(spanned);
        let content = match spanned.as_ref() {
            Value::Null => Content::Scalar(Scalar::Null),
            Value::Bool(b) => Content::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Content::Scalar(if let Some(i) = n.as_i64() {
                Scalar::Integer(i)
            } else {
                Scalar::Float(n.as_f64().unwrap_or_default())
            }),
            Value::String(s) => Content::Scalar(Scalar::String(s.clone())),
            Value::Sequence(seq) => {
                Content::Sequence(seq.iter().map(|item| Self::convert(item, None)).collect())
            }
            Value::Mapping(map) => {
                let mut entries = Vec::new();
                for (key, value) in map {
                    if let Value::String(name) = key.as_ref() {
                        entries.push((name.clone(), Self::convert(value, Some(span_of(key)))));
                    }
                }
                Content::Mapping(entries)
            }
            // Unreachable for documents that passed the strict JSON parse.
            Value::Tagged(tagged) => {
                let mut node = Self::convert(&tagged.value, key_span);
                node.span = span;
                return node;
            }
        };
        Self {
            span,
            key_span,
            content,
        }
    }
}

fn span_of(spanned: &Spanned<Value>) -> Span {
    let span = spanned.span();
    Span::new(
        span.start.unwrap_or_default().byte_index,
        span.end.unwrap_or_default().byte_index,
    )
}

impl SourceNode for JsonNode {
    fn value_position(&self, source: &Source) -> Position {
        source.locate(self.span)
    }

    fn key_position(&self, source: &Source) -> Position {
        source.locate(self.key_span.unwrap_or(self.span))
    }

    fn literal_value(&self) -> Option<Scalar> {
        match &self.content {
            Content::Scalar(scalar) => Some(scalar.clone()),
            _ => None,
        }
    }

    fn indexed_child(&self, index: usize) -> Option<&dyn SourceNode> {
        match &self.content {
            Content::Sequence(items) => items.get(index).map(|n| n as &dyn SourceNode),
            _ => None,
        }
    }

    fn keyed_children(&self) -> Option<Vec<(&str, &dyn SourceNode)>> {
        match &self.content {
            Content::Mapping(entries) => Some(
                entries
                    .iter()
                    .map(|(key, node)| (key.as_str(), node as &dyn SourceNode))
                    .collect(),
            ),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_and_positions() {
        let text = "{\n  \"name\": \"web\",\n  \"count\": -1\n}";
        let node = JsonNode::parse(text).unwrap();
        let source = Source::new(text);

        let children = node.keyed_children().unwrap();
        let keys: Vec<_> = children.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, ["name", "count"]);

        let count = children[1].1;
        let value = count.value_position(&source);
        assert_eq!((value.line, value.column), (3, 13));
        assert_eq!(value.highlight, "-1");

        let key = count.key_position(&source);
        assert_eq!(key.line, 3);
        assert!(key.highlight.contains("count"));
    }

    #[test]
    fn test_scalar_literals() {
        let node = JsonNode::parse(r#"{"a": 1, "b": 2.5, "c": true, "d": null}"#).unwrap();
        let children = node.keyed_children().unwrap();
        assert_eq!(children[0].1.literal_value(), Some(Scalar::Integer(1)));
        assert_eq!(children[1].1.literal_value(), Some(Scalar::Float(2.5)));
        assert_eq!(children[2].1.literal_value(), Some(Scalar::Bool(true)));
        assert_eq!(children[3].1.literal_value(), Some(Scalar::Null));
    }

    #[test]
    fn test_sequence_children() {
        let node = JsonNode::parse(r#"{"items": [1, 2]}"#).unwrap();
        let items = node.keyed_children().unwrap()[0].1;
        assert!(items.indexed_child(0).is_some());
        assert!(items.indexed_child(1).is_some());
        assert!(items.indexed_child(2).is_none());
    }

    #[test]
    fn test_rejects_yaml_only_syntax() {
        assert!(JsonNode::parse("name: web\n").is_err());
        assert!(JsonNode::parse("{\"a\": 1,}").is_err());
    }

    #[test]
    fn test_tag_convention() {
        let node = JsonNode::parse("{}").unwrap();
        assert_eq!(node.tag(), "json");
    }
}
