use super::{EditDistanceMatcher, Validator, validate, validate_without_source};
use crate::node::{JsonNode, Source, YamlNode};
use crate::report::{Entry, Report, Severity};
use crate::schema::{ConfigValue, Field, Shape, Validate};

struct Count(i64);

impl ConfigValue for Count {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Count {
    fn validate(&self) -> Report {
        let mut report = Report::new();
        if self.0 < 0 {
            report.add(Entry::error("count must not be negative"));
        }
        report
    }
}

struct Widget {
    name: String,
    count: Count,
}

impl ConfigValue for Widget {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("name", &self.name),
            Field::new("count", &self.count),
        ])
    }
}

fn widget(name: &str, count: i64) -> Widget {
    Widget {
        name: name.to_string(),
        count: Count(count),
    }
}

fn entries_of(report: &Report) -> Vec<(Severity, &str, usize, usize)> {
    report
        .entries()
        .iter()
        .map(|e| {
            (
                e.severity,
                e.message.as_str(),
                e.position.line,
                e.position.column,
            )
        })
        .collect()
}

#[test]
fn test_end_to_end_with_typo_suggestion() {
    let text = "{\n  \"name\": \"x\",\n  \"count\": -1,\n  \"nme\": \"y\"\n}";
    let node = JsonNode::parse(text).unwrap();
    let source = Source::new(text);
    let config = widget("x", -1);

    let validator = Validator::with_matcher(Box::new(EditDistanceMatcher::default()));
    let report = validator.validate(&config, Some(&node), Some(&source));

    assert!(report.is_fatal());
    assert_eq!(
        entries_of(&report),
        [
            (Severity::Error, "count must not be negative", 3, 13),
            (Severity::Warning, "unrecognized key: nme", 4, 3),
            (Severity::Info, "did you mean name instead of nme", 4, 3),
        ]
    );
}

#[test]
fn test_unknown_key_case_boundary() {
    // Tag lookup is case-sensitive; only the suggestion folds case.
    let text = "a: 1\nB: 2\nc: 3\n";
    let node = YamlNode::parse(text).unwrap();
    let source = Source::new(text);

    struct Pair {
        a: u32,
        b: u32,
    }

    impl ConfigValue for Pair {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::new("a", &self.a), Field::new("b", &self.b)])
        }
    }

    let report = validate(&Pair { a: 1, b: 0 }, Some(&node), Some(&source));

    assert_eq!(
        entries_of(&report),
        [
            (Severity::Warning, "unrecognized key: B", 2, 1),
            (Severity::Info, "did you mean b instead of B", 2, 1),
            (Severity::Warning, "unrecognized key: c", 3, 1),
        ]
    );
}

#[test]
fn test_root_hook_reports_without_position() {
    struct Gate {
        count: Count,
    }

    impl ConfigValue for Gate {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::new("count", &self.count)])
        }

        fn validator(&self) -> Option<&dyn Validate> {
            Some(self)
        }
    }

    impl Validate for Gate {
        fn validate(&self) -> Report {
            let mut report = Report::new();
            report.add(Entry::error("unsupported version"));
            report
        }
    }

    let text = "count: -1\n";
    let node = YamlNode::parse(text).unwrap();
    let source = Source::new(text);

    let report = validate(&Gate { count: Count(-1) }, Some(&node), Some(&source));

    // The fatal root hook keeps its unset position and stops the walk before
    // the count field can report anything.
    assert_eq!(
        entries_of(&report),
        [(Severity::Error, "unsupported version", 0, 0)]
    );
}

#[test]
fn test_fatal_short_circuit_below_root() {
    struct Gate {
        count: Count,
    }

    impl ConfigValue for Gate {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::new("count", &self.count)])
        }

        fn validator(&self) -> Option<&dyn Validate> {
            Some(self)
        }
    }

    impl Validate for Gate {
        fn validate(&self) -> Report {
            let mut report = Report::new();
            report.add(Entry::error("gate is broken"));
            report
        }
    }

    struct Outer {
        gate: Gate,
    }

    impl ConfigValue for Outer {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::new("gate", &self.gate)])
        }
    }

    let outer = Outer {
        gate: Gate { count: Count(-1) },
    };
    let report = validate_without_source(&outer);

    // No diagnostics for the gate's descendants.
    assert_eq!(entries_of(&report), [(Severity::Error, "gate is broken", 0, 0)]);
}

#[test]
fn test_without_source_positions_are_unset() {
    let report = validate_without_source(&widget("x", -1));
    assert_eq!(
        entries_of(&report),
        [(Severity::Error, "count must not be negative", 0, 0)]
    );
    assert!(report.entries()[0].position.highlight.is_empty());
}

#[test]
fn test_validation_is_idempotent() {
    let text = "name: x\ncount: -1\ntypo: 1\n";
    let node = YamlNode::parse(text).unwrap();
    let source = Source::new(text);
    let config = widget("x", -1);

    let first = validate(&config, Some(&node), Some(&source));
    let second = validate(&config, Some(&node), Some(&source));
    assert_eq!(first, second);
}

#[test]
fn test_absent_field_borrows_ancestor_position() {
    let text = "{\"name\": \"x\"}";
    let node = JsonNode::parse(text).unwrap();
    let source = Source::new(text);
    let config = widget("x", -1);

    let report = validate(&config, Some(&node), Some(&source));

    // `count` is not in the document, so its diagnostic lands on the nearest
    // ancestor with a resolvable position: the record itself.
    assert_eq!(
        entries_of(&report),
        [(Severity::Error, "count must not be negative", 1, 1)]
    );
}

#[test]
fn test_optional_field_keeps_own_position() {
    struct Limits {
        ceiling: Option<Count>,
    }

    impl ConfigValue for Limits {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::new("ceiling", &self.ceiling)])
        }
    }

    let text = "ceiling: -3\n";
    let node = YamlNode::parse(text).unwrap();
    let source = Source::new(text);
    let config = Limits {
        ceiling: Some(Count(-3)),
    };

    let report = validate(&config, Some(&node), Some(&source));
    assert_eq!(
        entries_of(&report),
        [(Severity::Error, "count must not be negative", 1, 10)]
    );

    let absent = Limits { ceiling: None };
    assert!(validate(&absent, Some(&node), Some(&source)).is_empty());
}

#[test]
fn test_sequence_elements_keep_own_positions() {
    struct Batch {
        items: Vec<Count>,
    }

    impl ConfigValue for Batch {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::new("items", &self.items)])
        }
    }

    let text = "items:\n  - 1\n  - -5\n";
    let node = YamlNode::parse(text).unwrap();
    let source = Source::new(text);
    let config = Batch {
        items: vec![Count(1), Count(-5)],
    };

    let report = validate(&config, Some(&node), Some(&source));
    assert_eq!(
        entries_of(&report),
        [(Severity::Error, "count must not be negative", 3, 5)]
    );
}

#[test]
fn test_embedded_fields_match_document_keys() {
    struct Meta {
        x: u32,
    }

    impl ConfigValue for Meta {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::new("x", &self.x)])
        }
    }

    struct Outer {
        meta: Meta,
        other: Option<String>,
    }

    impl ConfigValue for Outer {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![
                Field::embedded(&self.meta),
                Field::new("other", &self.other),
            ])
        }
    }

    let text = "{\"x\": 1}";
    let node = JsonNode::parse(text).unwrap();
    let source = Source::new(text);
    let config = Outer {
        meta: Meta { x: 1 },
        other: None,
    };

    let report = validate(&config, Some(&node), Some(&source));
    assert!(report.is_empty(), "unexpected entries: {report}");
}

#[test]
fn test_record_decoded_from_scalar_node() {
    // A record correlated with a scalar node has no key set: fields recurse
    // detached and there is no unused-key analysis.
    let text = "\"just a string\"";
    let node = YamlNode::parse(text).unwrap();
    let source = Source::new(text);
    let config = widget("x", -1);

    let report = validate(&config, Some(&node), Some(&source));
    assert_eq!(
        entries_of(&report),
        [(Severity::Error, "count must not be negative", 1, 1)]
    );
}

#[test]
fn test_hook_fires_once_through_optional_wrapper() {
    let config: Option<Count> = Some(Count(-1));
    let report = validate_without_source(&config);
    assert_eq!(report.len(), 1);
}

#[test]
fn test_every_entry_has_a_severity_and_message() {
    let text = "name: x\ncount: -1\nnme: y\n";
    let node = YamlNode::parse(text).unwrap();
    let source = Source::new(text);

    let report = validate(&widget("x", -1), Some(&node), Some(&source));
    assert!(!report.is_empty());
    for entry in report.entries() {
        assert!(!entry.message.is_empty());
    }
}
