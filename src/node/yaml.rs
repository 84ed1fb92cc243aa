use yaml_spanned::{Spanned, Value, from_str};

use super::{ParseError, Scalar, Source, SourceNode, Span};
use crate::report::Position;

/// Parse tree of a YAML document, carrying the byte spans recorded by the
/// span-preserving parser for every value and mapping key.
pub struct YamlNode {
    span: Span,
    key_span: Option<Span>,
    content: Content,
}

enum Content {
    Scalar(Scalar),
    Sequence(Vec<YamlNode>),
    Mapping(Vec<(String, YamlNode)>),
}

impl YamlNode {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let spanned: Spanned<Value> =
            from_str(text).map_err(|e| ParseError::Yaml(e.to_string()))?;
        Ok(Self::convert(&spanned, None))
    }

    fn convert(spanned: &Spanned<Value>, key_span: Option<Span>) -> Self {
        let span = span_of(spanned);
        let content = match spanned.as_ref() {
            Value::Null => Content::Scalar(Scalar::Null),
            Value::Bool(b) => Content::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Content::Scalar(number_scalar(n.as_i64(), n.as_u64(), n.as_f64())),
            Value::String(s) => Content::Scalar(Scalar::String(s.clone())),
            Value::Sequence(seq) => {
                Content::Sequence(seq.iter().map(|item| Self::convert(item, None)).collect())
            }
            Value::Mapping(map) => {
                // Non-string keys have no field tag to correlate with; skip them.
                let mut entries = Vec::new();
                for (key, value) in map {
                    if let Value::String(name) = key.as_ref() {
                        entries.push((name.clone(), Self::convert(value, Some(span_of(key)))));
                    }
                }
                Content::Mapping(entries)
            }
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

fn number_scalar(i: Option<i64>, u: Option<u64>, f: Option<f64>) -> Scalar {
    if let Some(i) = i {
        Scalar::Integer(i)
    } else if let Some(u) = u {
        Scalar::Float(u as f64)
    } else {
        Scalar::Float(f.unwrap_or_default())
    }
}

impl SourceNode for YamlNode {
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
        "yaml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_children_in_document_order() {
        let node = YamlNode::parse("name: web\nreplicas: 3\n").unwrap();
        let children = node.keyed_children().unwrap();
        let keys: Vec<_> = children.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, ["name", "replicas"]);
    }

    #[test]
    fn test_scalar_literals() {
        let node = YamlNode::parse("name: web\nreplicas: 3\nactive: true\nextra: null\n").unwrap();
        let children = node.keyed_children().unwrap();
        assert_eq!(
            children[0].1.literal_value(),
            Some(Scalar::String("web".to_string()))
        );
        assert_eq!(children[1].1.literal_value(), Some(Scalar::Integer(3)));
        assert_eq!(children[2].1.literal_value(), Some(Scalar::Bool(true)));
        assert_eq!(children[3].1.literal_value(), Some(Scalar::Null));
        assert!(node.literal_value().is_none());
    }

    #[test]
    fn test_value_and_key_positions() {
        let text = "name: web\nreplicas: 3\n";
        let node = YamlNode::parse(text).unwrap();
        let source = Source::new(text);

        let children = node.keyed_children().unwrap();
        let replicas = children[1].1;

        let value = replicas.value_position(&source);
        assert_eq!((value.line, value.column), (2, 11));
        assert_eq!(value.highlight, "3");

        let key = replicas.key_position(&source);
        assert_eq!((key.line, key.column), (2, 1));
        assert_eq!(key.highlight, "replicas");
    }

    #[test]
    fn test_sequence_children() {
        let text = "disks:\n  - /dev/sda\n  - /dev/sdb\n";
        let node = YamlNode::parse(text).unwrap();
        let source = Source::new(text);

        let children = node.keyed_children().unwrap();
        let disks = children[0].1;
        assert!(disks.keyed_children().is_none());

        let first = disks.indexed_child(0).unwrap();
        let position = first.value_position(&source);
        assert_eq!((position.line, position.column), (2, 5));
        assert_eq!(position.highlight, "/dev/sda");

        assert!(disks.indexed_child(2).is_none());
        assert!(node.indexed_child(0).is_none());
    }

    #[test]
    fn test_parse_error() {
        assert!(YamlNode::parse("a: [unclosed").is_err());
    }

    #[test]
    fn test_tag_convention() {
        let node = YamlNode::parse("a: 1\n").unwrap();
        assert_eq!(node.tag(), "yaml");
    }
}
