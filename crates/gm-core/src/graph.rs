//! Attributed graph data model.
//!
//! A [`Graph`] owns an ordered sequence of vertices and edges, each with a
//! stable integer index assigned at insertion. Indices are dense and
//! monotonically assigned; removal is not supported, matching the invariant
//! in the data model.
//!
//! ## Quick start
//!
//! ```
//! use gm_core::graph::{AttributeValue, Graph};
//!
//! let mut g = Graph::new(false);
//! let a = g.add_vertex();
//! let b = g.add_vertex();
//! g.set_vertex_attr(a, "label", AttributeValue::Symbol("x".into()));
//! g.set_vertex_attr(b, "label", AttributeValue::Symbol("y".into()));
//! g.add_edge(a, b);
//! assert_eq!(g.vertex_count(), 2);
//! assert_eq!(g.edge_count(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable, dense, monotonically-assigned vertex index.
pub type VertexIndex = usize;
/// Stable, dense, monotonically-assigned edge index.
pub type EdgeIndex = usize;

/// A typed attribute value: numeric or symbolic, per the weights kinds
/// (numeric-difference, symbol-equality) that consume them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Numeric(f64),
    Symbol(String),
}

impl AttributeValue {
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            AttributeValue::Numeric(v) => Some(*v),
            AttributeValue::Symbol(_) => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            AttributeValue::Symbol(s) => Some(s),
            AttributeValue::Numeric(_) => None,
        }
    }
}

/// A vertex's attribute map: attribute name -> typed value.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// A vertex owned by a [`Graph`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub index: VertexIndex,
    pub attributes: AttributeMap,
}

/// An edge owned by a [`Graph`]. `origin`/`target` direction is only
/// meaningful when the owning graph is directed; undirected edges are
/// stored once but traversable from both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub index: EdgeIndex,
    pub origin: VertexIndex,
    pub target: VertexIndex,
    pub attributes: AttributeMap,
}

/// An attributed graph, directed or undirected.
///
/// Invariants: vertex/edge indices are dense and monotonically assigned at
/// insertion; the origin and target of every edge refer to vertices owned
/// by this graph. Removal is not required by the core and is not exposed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    directed: bool,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Undirected adjacency: for each vertex, the edges incident to it
    /// (traversable from both endpoints even though the edge is stored once).
    incidence: Vec<Vec<EdgeIndex>>,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Graph {
            directed,
            vertices: Vec::new(),
            edges: Vec::new(),
            incidence: Vec::new(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn add_vertex(&mut self) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices.push(Vertex {
            index,
            attributes: AttributeMap::new(),
        });
        self.incidence.push(Vec::new());
        index
    }

    pub fn add_edge(&mut self, origin: VertexIndex, target: VertexIndex) -> EdgeIndex {
        assert!(origin < self.vertices.len(), "origin not owned by this graph");
        assert!(target < self.vertices.len(), "target not owned by this graph");
        let index = self.edges.len();
        self.edges.push(Edge {
            index,
            origin,
            target,
            attributes: AttributeMap::new(),
        });
        self.incidence[origin].push(index);
        if origin != target {
            self.incidence[target].push(index);
        }
        index
    }

    pub fn set_vertex_attr(
        &mut self,
        vertex: VertexIndex,
        name: impl Into<String>,
        value: AttributeValue,
    ) {
        self.vertices[vertex].attributes.insert(name.into(), value);
    }

    pub fn set_edge_attr(
        &mut self,
        edge: EdgeIndex,
        name: impl Into<String>,
        value: AttributeValue,
    ) {
        self.edges[edge].attributes.insert(name.into(), value);
    }

    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self.vertices[index]
    }

    pub fn edge(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Edges incident to `vertex`, traversable regardless of direction.
    pub fn incident_edges(&self, vertex: VertexIndex) -> impl Iterator<Item = &Edge> + '_ {
        self.incidence[vertex].iter().map(move |&e| &self.edges[e])
    }

    /// Whether `a -> b` (or `a -- b` if undirected) exists as a stored edge.
    pub fn find_edge(&self, a: VertexIndex, b: VertexIndex) -> Option<&Edge> {
        self.incidence[a].iter().find_map(|&e| {
            let edge = &self.edges[e];
            let matches = if self.directed {
                edge.origin == a && edge.target == b
            } else {
                (edge.origin == a && edge.target == b) || (edge.origin == b && edge.target == a)
            };
            matches.then_some(edge)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_monotonic() {
        let mut g = Graph::new(false);
        let a = g.add_vertex();
        let b = g.add_vertex();
        let c = g.add_vertex();
        assert_eq!((a, b, c), (0, 1, 2));
        let e0 = g.add_edge(a, b);
        let e1 = g.add_edge(b, c);
        assert_eq!((e0, e1), (0, 1));
    }

    #[test]
    fn undirected_edge_traversable_from_both_endpoints() {
        let mut g = Graph::new(false);
        let a = g.add_vertex();
        let b = g.add_vertex();
        g.add_edge(a, b);
        assert_eq!(g.incident_edges(a).count(), 1);
        assert_eq!(g.incident_edges(b).count(), 1);
        assert!(g.find_edge(a, b).is_some());
        assert!(g.find_edge(b, a).is_some());
    }

    #[test]
    fn directed_edge_direction_is_meaningful() {
        let mut g = Graph::new(true);
        let a = g.add_vertex();
        let b = g.add_vertex();
        g.add_edge(a, b);
        assert!(g.find_edge(a, b).is_some());
        assert!(g.find_edge(b, a).is_none());
    }

    #[test]
    fn attributes_round_trip_through_json() {
        let mut g = Graph::new(false);
        let a = g.add_vertex();
        g.set_vertex_attr(a, "label", AttributeValue::Symbol("x".into()));
        let json = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.vertex(a).attributes.get("label").unwrap().as_symbol(),
            Some("x")
        );
    }

    #[test]
    fn graph_round_trips_through_a_json_file_on_disk() {
        use std::io::Write;

        let mut g = Graph::new(true);
        let a = g.add_vertex();
        let b = g.add_vertex();
        g.set_vertex_attr(a, "label", AttributeValue::Symbol("a".into()));
        g.add_edge(a, b);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&g).unwrap()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let back: Graph = serde_json::from_str(&contents).unwrap();
        assert!(back.find_edge(a, b).is_some());
        assert_eq!(back.vertex(a).attributes.get("label").unwrap().as_symbol(), Some("a"));
    }
}
