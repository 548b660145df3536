//! YAML document → configuration tree conversion

use grading_schema::{Mapping, Node, Scalar};
use serde_yaml::Value;

/// Parse a YAML document into a [`Node`].
///
/// Anchors, aliases and `<<` merge keys are resolved. An empty document
/// yields an empty mapping.
pub fn parse_document(contents: &str) -> Result<Node, serde_yaml::Error> {
    let mut value: Value = serde_yaml::from_str(contents)?;
    value.apply_merge()?;

    Ok(match value {
        Value::Null => Node::empty_mapping(),
        other => yaml_to_node(other),
    })
}

/// Convert a YAML value to a tree node
fn yaml_to_node(value: Value) -> Node {
    match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Node::Scalar(Scalar::Integer(i)),
            None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        Value::String(s) => Node::Scalar(Scalar::String(s)),
        Value::Sequence(items) => Node::Sequence(items.into_iter().map(yaml_to_node).collect()),
        Value::Mapping(map) => {
            let entries: Mapping = map
                .into_iter()
                .map(|(k, v)| (key_text(k), yaml_to_node(v)))
                .collect();
            Node::Mapping(entries)
        }
        Value::Tagged(tagged) => yaml_to_node(tagged.value),
    }
}

/// Mapping keys are compared as text.
fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => yaml_to_node(other).render(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_empty_mapping() {
        assert_eq!(parse_document("").unwrap(), Node::empty_mapping());
        assert_eq!(parse_document("~\n").unwrap(), Node::empty_mapping());
    }

    #[test]
    fn test_scalars_and_keys() {
        let node = parse_document("grades:\n  exam:\n    type: points\n1: one\ntrue: yes\n").unwrap();
        assert_eq!(
            node.get("grades").and_then(|g| g.get("exam")).and_then(|e| e.get("type")),
            Some(&Node::from("points"))
        );
        assert_eq!(node.get("1"), Some(&Node::from("one")));
        assert!(node.contains_key("true"));
    }

    #[test]
    fn test_null_values_preserved() {
        let node = parse_document("grades:\n  midterm:\n").unwrap();
        assert!(node.get("grades").and_then(|g| g.get("midterm")).unwrap().is_null());
    }

    #[test]
    fn test_aliases_and_merge_keys() {
        let doc = "\
templates:
  base: &base
    type: points
    max: 10
grades:
  exam:
    <<: *base
    max: 20
";
        let node = parse_document(doc).unwrap();
        let exam = node.get("grades").and_then(|g| g.get("exam")).unwrap();
        assert_eq!(exam.get("type"), Some(&Node::from("points")));
        assert_eq!(exam.get("max"), Some(&Node::Scalar(Scalar::Integer(20))));
    }

    #[test]
    fn test_tagged_value_unwrapped() {
        let node = parse_document("name: !custom hw1\n").unwrap();
        assert_eq!(node.get("name"), Some(&Node::from("hw1")));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(parse_document("grades: [unclosed\n").is_err());
    }
}
