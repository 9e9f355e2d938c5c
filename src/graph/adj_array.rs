use smallvec::SmallVec;

use super::*;
use std::fmt;

/// Adjacency-array graph. Every vertex additionally carries the index it
/// had in the original input (`real_index`), which is preserved across
/// renumbering so that emitted solutions refer to the input numbering.
#[derive(Clone, Default)]
pub struct AdjArray {
    verts: Vec<Vertex>,
}

#[derive(Default, Clone)]
struct Vertex {
    neighbors: SmallVec<[Node; 8]>,
    real_index: Node,
}

impl GraphNodeOrder for AdjArray {
    fn number_of_nodes(&self) -> NumNodes {
        self.verts.len() as NumNodes
    }
}

impl GraphEdgeOrder for AdjArray {
    fn number_of_edges(&self) -> NumEdges {
        self.verts
            .iter()
            .map(|v| v.neighbors.len() as NumEdges)
            .sum::<NumEdges>()
            / 2
    }
}

impl AdjacencyList for AdjArray {
    fn neighbors_of(&self, u: Node) -> &[Node] {
        &self.verts[u as usize].neighbors
    }
}

impl AdjacencyTest for AdjArray {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.verts[u as usize].neighbors.contains(&v)
    }
}

impl GraphNew for AdjArray {
    fn new(n: NumNodes) -> Self {
        Self {
            verts: (0..n)
                .map(|i| Vertex {
                    neighbors: SmallVec::new(),
                    real_index: i,
                })
                .collect(),
        }
    }
}

impl GraphEdgeEditing for AdjArray {
    fn try_add_edge(&mut self, u: Node, v: Node) -> bool {
        let added = self.try_add_neighbor(u, v);

        if added && u != v {
            let _other = self.try_add_neighbor(v, u);
            debug_assert!(_other);
        }

        added
    }
}

impl AdjArray {
    /// Appends `v` to the adjacency list of `u` without any duplicate
    /// check. Input readers use this to reproduce adjacency lists exactly
    /// as given.
    pub fn push_neighbor(&mut self, u: Node, v: Node) {
        self.verts[u as usize].neighbors.push(v);
    }

    /// Appends `v` to the adjacency list of `u` unless already present.
    /// Returns *true* exactly if the half-edge was inserted.
    pub fn try_add_neighbor(&mut self, u: Node, v: Node) -> bool {
        if self.verts[u as usize].neighbors.contains(&v) {
            return false;
        }
        self.verts[u as usize].neighbors.push(v);
        true
    }

    /// Returns the input-numbering index of `u`.
    pub fn real_index_of(&self, u: Node) -> Node {
        self.verts[u as usize].real_index
    }

    /// Ensures every vertex is its own neighbor, so that a vertex
    /// dominates itself uniformly via neighbor traversal.
    pub fn add_self_loops(&mut self) {
        for u in self.vertices() {
            self.try_add_neighbor(u, u);
        }
    }

    /// Stable-sorts every adjacency list into descending index order.
    pub fn sort_neighbors_descending(&mut self) {
        for v in &mut self.verts {
            v.neighbors.sort_by(|a, b| b.cmp(a));
        }
    }

    /// Builds the graph whose vertex `i` corresponds to `permutation[i]`
    /// of `self`, relinking every adjacency through the inverse
    /// permutation and carrying the `real_index` chain along.
    pub fn renumber(&self, permutation: &[Node]) -> AdjArray {
        let n = self.len();
        debug_assert_eq!(permutation.len(), n);

        let mut inverse_perm = vec![0 as Node; n];
        for (i, &p) in permutation.iter().enumerate() {
            inverse_perm[p as usize] = i as Node;
        }

        let mut result = AdjArray::new(n as NumNodes);
        for i in 0..n {
            let v_in = &self.verts[permutation[i] as usize];
            let v_out = &mut result.verts[i];
            v_out.real_index = v_in.real_index;
            v_out
                .neighbors
                .extend(v_in.neighbors.iter().map(|&u| inverse_perm[u as usize]));
        }
        result
    }

    pub fn unordered_edges(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        self.vertices().flat_map(move |u| {
            self.neighbors_of(u)
                .iter()
                .filter_map(move |&v| (u <= v).then_some((u, v)))
        })
    }

    pub fn test_only_from(edges: impl Clone + IntoIterator<Item = (Node, Node)>) -> Self {
        let n = edges
            .clone()
            .into_iter()
            .map(|(u, v)| u.max(v) + 1)
            .max()
            .unwrap_or(0);
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }
}

impl fmt::Debug for AdjArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AdjArray(n={})", self.number_of_nodes())?;
        for u in self.vertices() {
            writeln!(f, "  {u}: {:?}", self.neighbors_of(u))?;
        }
        Ok(())
    }
}
