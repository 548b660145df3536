//! Configuration tree.
//!
//! Parsed configuration files are represented as a closed set of node
//! shapes. Lookups on a mapping return `Option<&Node>`; a missing key is
//! reported as [`NodeKind::Absent`] wherever a shape has to be named in an
//! error.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed mapping of child nodes.
pub type Mapping = BTreeMap<String, Node>;

/// A node of a parsed configuration document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

/// Leaf value of a configuration document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Shape tag used when a node does not have the expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
    Absent,
}

impl NodeKind {
    /// Kind of an optional node, `Absent` for `None`.
    pub fn of(node: Option<&Node>) -> Self {
        match node {
            Some(Node::Mapping(_)) => NodeKind::Mapping,
            Some(Node::Sequence(_)) => NodeKind::Sequence,
            Some(Node::Scalar(_)) => NodeKind::Scalar,
            None => NodeKind::Absent,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Scalar => "scalar",
            NodeKind::Absent => "absent",
        };
        f.write_str(name)
    }
}

impl Node {
    pub fn empty_mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::of(Some(self))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Narrow to a mapping, returning the actual kind on mismatch.
    pub fn expect_mapping(&self) -> Result<&Mapping, NodeKind> {
        self.as_mapping().ok_or_else(|| self.kind())
    }

    /// Look up a key. Non-mapping nodes have no keys.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Text used to identify this node in messages and to compare names.
    ///
    /// Scalars render as written; compound nodes render as compact JSON.
    pub fn render(&self) -> String {
        match self {
            Node::Scalar(scalar) => scalar.to_string(),
            other => serde_json::to_string(other).unwrap_or_else(|_| other.kind().to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("~"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Scalar(Scalar::Integer(i)),
                None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}
