//! Structural violation paths.
//!
//! A [`Path`] is the ordered node sequence an engine attaches to every
//! violation. Bean validation produces property nodes (`embedded.checkItem`),
//! parameter validation produces a method node followed by a parameter node.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a path node denotes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Bean,
    Property,
    Method,
    Parameter { index: usize },
    CrossParameter,
    ReturnValue,
}

/// One element of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(flatten)]
    kind: NodeKind,
}

impl Node {
    pub fn bean() -> Self {
        Self {
            name: None,
            kind: NodeKind::Bean,
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: NodeKind::Property,
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: NodeKind::Method,
        }
    }

    pub fn parameter(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: Some(name.into()),
            kind: NodeKind::Parameter { index },
        }
    }

    pub fn cross_parameter() -> Self {
        Self {
            name: Some("<cross-parameter>".to_string()),
            kind: NodeKind::CrossParameter,
        }
    }

    pub fn return_value() -> Self {
        Self {
            name: Some("<return value>".to_string()),
            kind: NodeKind::ReturnValue,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The parameter position, when this is a parameter node.
    pub fn parameter_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Parameter { index } => Some(index),
            _ => None,
        }
    }
}

/// Ordered node sequence locating a violation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    nodes: Vec<Node>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a path of property nodes from a dot-separated string.
    pub fn from_property_path(path: &str) -> Self {
        Self {
            nodes: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(Node::property)
                .collect(),
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<Node> for Path {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// The property-path string: named nodes joined with `.`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in self.nodes.iter().filter_map(Node::name) {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}
