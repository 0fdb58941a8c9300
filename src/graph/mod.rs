#![forbid(unsafe_code)]

//! In-process property graph used by the in-memory tuple source.
//!
//! Nodes and edges keep their insertion order; traversals rely on it for
//! deterministic output.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

/// Built-in demo movie graph.
pub mod demo;

/// CSV import of nodes and edges.
pub mod import;

pub use import::{import_csv, EdgeImportConfig, ImportError, ImportSummary, NodeImportConfig};

/// Index of a node in its graph.
pub type NodeId = usize;
/// Index of an edge in its graph.
pub type EdgeId = usize;

/// Property value stored on nodes and edges.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// List of strings, e.g. the roles of an `ACTED_IN` relation.
    StringList(Vec<String>),
}

impl PropertyValue {
    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::StringList(value)
    }
}

/// Properties keyed by name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A labelled node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Position in the graph.
    pub id: NodeId,
    /// Labels such as `Movie` or `Person`.
    pub labels: Vec<String>,
    /// Node properties.
    pub properties: Properties,
}

impl Node {
    /// Returns `true` when the node carries `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Returns a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A typed, directed relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Position in the graph.
    pub id: EdgeId,
    /// Start node.
    pub source: NodeId,
    /// End node.
    pub target: NodeId,
    /// Relationship type, e.g. `ACTED_IN`.
    pub type_name: String,
    /// Edge properties.
    pub properties: Properties,
}

impl Edge {
    /// Returns the endpoint opposite to `node`.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }
}

/// Errors raised when mutating a [`MemoryGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge referenced a node that does not exist.
    #[error("node {0} not found")]
    UnknownNode(NodeId),
}

/// Insertion-ordered property graph with per-node adjacency.
#[derive(Debug, Default, Clone)]
pub struct MemoryGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    incident: FxHashMap<NodeId, Vec<EdgeId>>,
}

impl MemoryGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add_node<I, S>(&mut self, labels: I, properties: Properties) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            labels: labels.into_iter().map(Into::into).collect(),
            properties,
        });
        id
    }

    /// Adds a relationship from `source` to `target` and returns its id.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        type_name: impl Into<String>,
        properties: Properties,
    ) -> Result<EdgeId, GraphError> {
        for endpoint in [source, target] {
            if endpoint >= self.nodes.len() {
                return Err(GraphError::UnknownNode(endpoint));
            }
        }
        let id = self.edges.len();
        self.edges.push(Edge {
            id,
            source,
            target,
            type_name: type_name.into(),
            properties,
        });
        self.incident.entry(source).or_default().push(id);
        if target != source {
            self.incident.entry(target).or_default().push(id);
        }
        Ok(id)
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Looks up an edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes carrying `label` whose string property `key` equals `value`.
    pub fn find_nodes<'a>(
        &'a self,
        label: &'a str,
        key: &'a str,
        value: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |node| {
            node.has_label(label)
                && node.property(key).and_then(PropertyValue::as_str) == Some(value)
        })
    }

    /// Edges touching `node` in either direction, in insertion order.
    pub fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.incident
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.edges.get(*id))
    }

    /// Edges ending at `node`, in insertion order.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.incident_edges(node).filter(move |edge| edge.target == node)
    }

    /// Edges starting at `node`, in insertion order.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.incident_edges(node).filter(move |edge| edge.source == node)
    }
}

/// Builds a [`Properties`] map from `(name, value)` pairs.
pub fn props<I, K, V>(entries: I) -> Properties
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<PropertyValue>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
