use crate::graph::{Node, NumNodes, INVALID_NODE};

const NIL: u32 = u32::MAX;

/// Bucket sort of a pivot's candidate dominators by uncovered degree.
/// Entries are threaded into a degree-sorted doubly-linked chain; a
/// per-degree "last inserted" table makes repeats of a degree O(1), so a
/// full ranking costs O(deg(pivot) + max_degree). The scratch buffers are
/// reused across calls.
pub(crate) struct NeighborRanker {
    entries: Vec<RankEntry>,
    last_with_degree: Vec<u32>,
    order: Vec<Node>,
}

struct RankEntry {
    next: u32,
    prev: u32,
    deg: NumNodes,
    u: Node,
}

impl NeighborRanker {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            last_with_degree: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Sorts `items` of (vertex, uncovered degree) and returns them
    /// ordered by degree, ascending or descending. Entries of degree 0
    /// are not emitted; `max_degree` bounds the degrees that may occur.
    /// The result is only valid until the next call.
    pub fn rank(
        &mut self,
        items: impl IntoIterator<Item = (Node, NumNodes)>,
        max_degree: NumNodes,
        descending: bool,
    ) -> &[Node] {
        self.entries.clear();
        // chain anchor; its degree of 0 also terminates both traversals
        self.entries.push(RankEntry {
            next: 0,
            prev: 0,
            deg: 0,
            u: INVALID_NODE,
        });

        self.last_with_degree.clear();
        self.last_with_degree
            .resize(max_degree as usize + 1, NIL);

        for (u, deg) in items {
            let idx = self.entries.len() as u32;

            let mut prev = self.last_with_degree[deg as usize];
            if prev == NIL {
                prev = self.entries[0].prev;
                while self.entries[prev as usize].deg > deg {
                    prev = self.entries[prev as usize].prev;
                }
            }
            let next = self.entries[prev as usize].next;

            self.entries.push(RankEntry {
                next,
                prev,
                deg,
                u,
            });
            self.entries[prev as usize].next = idx;
            self.entries[next as usize].prev = idx;
            self.last_with_degree[deg as usize] = idx;
        }

        self.order.clear();
        if descending {
            let mut node = self.entries[0].prev;
            while self.entries[node as usize].deg != 0 {
                self.order.push(self.entries[node as usize].u);
                node = self.entries[node as usize].prev;
            }
        } else {
            let mut node = self.entries[0].next;
            while self.entries[node as usize].deg != 0 {
                self.order.push(self.entries[node as usize].u);
                node = self.entries[node as usize].next;
            }
        }

        &self.order
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascending_is_stable_within_equal_degrees() {
        let mut ranker = NeighborRanker::new();
        let order = ranker.rank(
            [(10, 3), (11, 1), (12, 3), (13, 2), (14, 1)],
            5,
            false,
        );
        assert_eq!(order, &[11, 14, 13, 10, 12]);
    }

    #[test]
    fn descending_reverses_the_chain() {
        let mut ranker = NeighborRanker::new();
        let order = ranker.rank(
            [(10, 3), (11, 1), (12, 3), (13, 2), (14, 1)],
            5,
            true,
        );
        assert_eq!(order, &[12, 10, 13, 14, 11]);
    }

    #[test]
    fn reuse_clears_previous_state() {
        let mut ranker = NeighborRanker::new();
        ranker.rank([(1, 2), (2, 4)], 4, false);
        let order = ranker.rank([(5, 1)], 3, false);
        assert_eq!(order, &[5]);
        assert!(ranker.rank(std::iter::empty(), 0, true).is_empty());
    }
}
