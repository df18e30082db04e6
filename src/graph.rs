//! Static graph store backing dependency construction.
//!
//! Uses petgraph's directed graph internally. Node ids are dense integers in
//! `[0, N)` and map one-to-one onto petgraph node indices; edge ids are
//! petgraph edge indices in insertion order. The graph is immutable after
//! construction and safely shared by reference across concurrent samplers.
//!
//! # Example
//!
//! ```rust
//! use nodeflow::Graph;
//!
//! let graph = Graph::from_edges(3, &[(0, 2), (1, 2)]).unwrap();
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.in_edges(2).unwrap(), vec![(0, 0), (1, 1)]);
//! ```

use crate::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// Graph-global node identifier, dense in `[0, node_count)`.
pub type NodeId = usize;

/// Edge identifier, dense in `[0, edge_count)` in insertion order.
pub type EdgeId = usize;

/// An immutable directed graph over dense node ids.
///
/// Edges point in the data-flow direction: an edge `(u, v)` means `u`'s
/// representation contributes to `v`'s aggregation. Dependency construction
/// therefore traverses [`Graph::in_edges`].
#[derive(Debug, Clone)]
pub struct Graph {
    graph: DiGraph<(), ()>,
}

impl Graph {
    /// Build a graph with `num_nodes` nodes from an edge list.
    ///
    /// Fails with [`Error::OutOfRange`] if any endpoint is `>= num_nodes`.
    /// Parallel edges are kept as distinct edges with distinct edge ids.
    pub fn from_edges(num_nodes: usize, edges: &[(NodeId, NodeId)]) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(num_nodes, edges.len());
        for _ in 0..num_nodes {
            graph.add_node(());
        }

        for &(src, dst) in edges {
            for node in [src, dst] {
                if node >= num_nodes {
                    return Err(Error::OutOfRange {
                        node,
                        node_count: num_nodes,
                    });
                }
            }
            graph.add_edge(NodeIndex::new(src), NodeIndex::new(dst), ());
        }

        Ok(Self { graph })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn checked(&self, node: NodeId) -> Result<NodeIndex> {
        if node >= self.node_count() {
            return Err(Error::OutOfRange {
                node,
                node_count: self.node_count(),
            });
        }
        Ok(NodeIndex::new(node))
    }

    /// Incoming edges of `node` as `(source_id, edge_id)` pairs, in edge
    /// insertion order. O(in-degree).
    ///
    /// These are the edges whose messages flow into `node`; dependency
    /// construction resolves a frontier by walking them.
    pub fn in_edges(&self, node: NodeId) -> Result<Vec<(NodeId, EdgeId)>> {
        let idx = self.checked(node)?;
        let mut edges: Vec<(NodeId, EdgeId)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.source().index(), e.id().index()))
            .collect();
        // petgraph iterates newest-first; restore insertion order
        edges.reverse();
        Ok(edges)
    }

    /// Outgoing edges of `node` as `(target_id, edge_id)` pairs, in edge
    /// insertion order. O(out-degree).
    pub fn out_edges(&self, node: NodeId) -> Result<Vec<(NodeId, EdgeId)>> {
        let idx = self.checked(node)?;
        let mut edges: Vec<(NodeId, EdgeId)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target().index(), e.id().index()))
            .collect();
        edges.reverse();
        Ok(edges)
    }

    /// In-degree of `node`.
    pub fn in_degree(&self, node: NodeId) -> Result<usize> {
        let idx = self.checked(node)?;
        Ok(self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .count())
    }

    /// Compute summary statistics.
    pub fn stats(&self) -> GraphStats {
        let node_count = self.node_count();
        let edge_count = self.edge_count();

        let avg_in_degree = if node_count > 0 {
            edge_count as f64 / node_count as f64
        } else {
            0.0
        };

        GraphStats {
            node_count,
            edge_count,
            avg_in_degree,
        }
    }
}

/// Statistics about a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Average in-degree (edges per node).
    pub avg_in_degree: f64,
}
