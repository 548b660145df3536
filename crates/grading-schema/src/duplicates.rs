//! Grouping of submit descriptors by declared name.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::tree::{Node, Scalar};

/// A submit name declared by more than one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateName {
    pub name: String,
    /// Descriptor locations, in the order they were indexed.
    pub locations: Vec<String>,
}

/// Names compare by rendered text and value type, so `1` and `"1"` differ.
type NameKey = (String, &'static str);

fn name_key(name: &Node) -> NameKey {
    let value_type = match name.as_scalar() {
        Some(Scalar::Null) => "null",
        Some(Scalar::Bool(_)) => "bool",
        Some(Scalar::Integer(_)) => "integer",
        Some(Scalar::Float(_)) => "float",
        Some(Scalar::String(_)) => "string",
        None => "collection",
    };
    (name.render(), value_type)
}

/// Collects submit descriptors by their `name` field.
#[derive(Debug, Default)]
pub struct SubmitNameIndex {
    names: BTreeMap<NameKey, Vec<String>>,
    checked: usize,
}

impl SubmitNameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one descriptor found at `location`.
    ///
    /// Descriptors that are not mappings or lack a `name` key are counted
    /// but not indexed; returns whether the descriptor was indexed.
    pub fn insert(&mut self, location: impl Into<String>, descriptor: &Node) -> bool {
        self.checked += 1;

        let Some(name) = descriptor.get("name") else {
            return false;
        };

        self.names
            .entry(name_key(name))
            .or_default()
            .push(location.into());
        true
    }

    /// Number of descriptors offered to the index.
    pub fn descriptors_checked(&self) -> usize {
        self.checked
    }

    /// All names declared more than once, ordered by name.
    pub fn duplicates(&self) -> Vec<DuplicateName> {
        self.names
            .iter()
            .filter(|(_, locations)| locations.len() > 1)
            .map(|((name, _), locations)| DuplicateName {
                name: name.clone(),
                locations: locations.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_duplicate_group() {
        let mut index = SubmitNameIndex::new();
        index.insert("a/submit.yml", &Node::from(json!({"name": "hw1"})));
        index.insert("b/submit.yml", &Node::from(json!({"name": "hw1"})));
        index.insert("c/submit.yml", &Node::from(json!({"name": "hw2"})));

        assert_eq!(
            index.duplicates(),
            vec![DuplicateName {
                name: "hw1".to_string(),
                locations: vec!["a/submit.yml".to_string(), "b/submit.yml".to_string()],
            }]
        );
        assert_eq!(index.descriptors_checked(), 3);
    }

    #[test]
    fn test_distinct_names() {
        let mut index = SubmitNameIndex::new();
        for (i, name) in ["hw1", "hw2", "hw3"].iter().enumerate() {
            index.insert(format!("{}/submit.yml", i), &Node::from(json!({ "name": name })));
        }
        assert!(index.duplicates().is_empty());
        assert_eq!(index.descriptors_checked(), 3);
    }

    #[test]
    fn test_names_of_different_types_are_distinct() {
        let mut index = SubmitNameIndex::new();
        index.insert("a", &Node::from(json!({"name": 1})));
        index.insert("b", &Node::from(json!({"name": "1"})));
        index.insert("c", &Node::from(json!({"name": true})));
        index.insert("d", &Node::from(json!({"name": "true"})));
        assert!(index.duplicates().is_empty());

        index.insert("e", &Node::from(json!({"name": 1})));
        let duplicates = index.duplicates();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].name, "1");
        assert_eq!(duplicates[0].locations, vec!["a", "e"]);
    }

    #[test]
    fn test_unnamed_descriptors_are_skipped() {
        let mut index = SubmitNameIndex::new();
        assert!(!index.insert("a", &Node::from(json!({"title": "x"}))));
        assert!(!index.insert("b", &Node::from(json!(["hw1"]))));
        assert!(!index.insert("c", &Node::from("hw1")));
        assert!(index.insert("d", &Node::from(json!({"name": "hw1"}))));

        assert!(index.duplicates().is_empty());
        assert_eq!(index.descriptors_checked(), 4);
    }

    #[test]
    fn test_all_duplicates_collected() {
        let mut index = SubmitNameIndex::new();
        for (location, name) in [("1", "b"), ("2", "a"), ("3", "b"), ("4", "a"), ("5", "a")] {
            index.insert(location, &Node::from(json!({ "name": name })));
        }

        let duplicates = index.duplicates();
        assert_eq!(duplicates.len(), 2);
        assert_eq!(duplicates[0].name, "a");
        assert_eq!(duplicates[0].locations, vec!["2", "4", "5"]);
        assert_eq!(duplicates[1].name, "b");
    }
}
