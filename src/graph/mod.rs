pub mod adj_array;
pub mod bitset;
pub mod gnp;

pub type Node = u32;
pub type NumNodes = Node;
pub type NumEdges = u64;

/// Marker for "no vertex" in index-linked structures.
pub const INVALID_NODE: Node = Node::MAX;

/// Hard limit on the number of vertices an instance may have.
pub const MAX_VERTS: usize = 1024;
/// Hard limit on the degree of a single vertex.
pub const MAX_DEGREE: usize = 1024;

use std::ops::Range;

pub use adj_array::*;
pub use bitset::*;
pub use gnp::*;

/// Provides getters pertaining to the size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns a range over V.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns true if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns a slice of neighbors of a given vertex.
    /// ** Panics if v >= n **
    fn neighbors_of(&self, u: Node) -> &[Node];

    /// Returns the number of neighbors of [`u`]
    fn degree_of(&self, u: Node) -> NumNodes {
        self.neighbors_of(u).len() as NumNodes
    }

    /// Returns the largest degree over all vertices
    fn max_degree(&self) -> NumNodes {
        self.vertices().map(|u| self.degree_of(u)).max().unwrap_or(0)
    }

    /// Returns an unset bitset with one bit per vertex
    fn vertex_bitset_unset(&self) -> BitSet {
        BitSet::new(self.number_of_nodes())
    }
}

/// Provides efficient tests whether an edge exists
pub trait AdjacencyTest {
    /// Returns *true* exactly if the graph contains the directed edge (u, v)
    fn has_edge(&self, u: Node, v: Node) -> bool;
}

pub trait GraphNew {
    /// Creates an empty graph with n singleton nodes
    fn new(n: NumNodes) -> Self;
}

/// Provides functions to insert edges
pub trait GraphEdgeEditing: GraphNew {
    /// Adds the undirected edge {u,v} to the graph, skipping duplicates.
    /// Returns *true* exactly if the edge was not present previously.
    /// ** Panics if u, v >= n **
    fn try_add_edge(&mut self, u: Node, v: Node) -> bool;

    /// Adds the undirected edge {u,v}.
    /// ** Panics if the edge is already contained or if u, v >= n **
    fn add_edge(&mut self, u: Node, v: Node) {
        assert!(self.try_add_edge(u, v));
    }

    fn add_edges(&mut self, edges: impl IntoIterator<Item = (Node, Node)>) {
        for (u, v) in edges {
            self.add_edge(u, v);
        }
    }
}
