use crate::graph::{AdjacencyList, GraphNodeOrder, Node, NumNodes, INVALID_NODE, MAX_VERTS};

/// Priority structure over vertices bucketed by an integer rank. Rank
/// nodes form a doubly-linked list ordered by rank; one node exists per
/// rank value currently in use, indexed by that value, so relocating a
/// vertex to an adjacent rank is O(1). Per rank node we track how many of
/// its vertices are unfixed and how many are undominated.
///
/// The `HEAVY` flavor additionally threads the undominated vertices of
/// each rank into a list, enabling the argmin/argmax undominated queries
/// the candidate-degree pivot rules need. The light flavor skips that
/// bookkeeping.
pub struct DegreePq<const HEAVY: bool> {
    nodes: Vec<RankNode>,
    verts: Vec<PqVertex>,
    n: NumNodes,
}

pub type DegreePqLight = DegreePq<false>;
pub type DegreePqHeavy = DegreePq<true>;

#[derive(Clone, Default)]
struct RankNode {
    next: u32,
    prev: u32,
    count: NumNodes,
    unfixed_count: NumNodes,
    undominated_count: NumNodes,
    und_head: Node,
    und_tail: Node,
}

#[derive(Clone)]
struct PqVertex {
    rank: u32,
    next: Node,
    prev: Node,
    is_fixed: bool,
    is_dominated: bool,
}

impl<const HEAVY: bool> DegreePq<HEAVY> {
    /// Rank node index used as the list anchor; one past the largest
    /// possible rank (`n`, a full vertex with a self-loop).
    #[inline]
    fn sentinel(&self) -> u32 {
        self.n + 1
    }

    /// Builds the queue with every vertex ranked by its degree: vertices
    /// start at rank 0 and are incremented once per incident half-edge.
    pub fn new(graph: &impl AdjacencyList) -> Self {
        let n = graph.number_of_nodes();
        let sentinel = n + 1;

        let mut pq = Self {
            nodes: vec![
                RankNode {
                    next: INVALID_NODE,
                    prev: INVALID_NODE,
                    und_head: INVALID_NODE,
                    und_tail: INVALID_NODE,
                    ..Default::default()
                };
                n as usize + 2
            ],
            verts: vec![
                PqVertex {
                    rank: 0,
                    next: INVALID_NODE,
                    prev: INVALID_NODE,
                    is_fixed: false,
                    is_dominated: false,
                };
                n as usize
            ],
            n,
        };

        pq.nodes[0].next = sentinel;
        pq.nodes[0].prev = sentinel;
        pq.nodes[sentinel as usize].next = 0;
        pq.nodes[sentinel as usize].prev = 0;
        pq.nodes[0].count = n;
        pq.nodes[0].unfixed_count = n;
        pq.nodes[0].undominated_count = n;

        if HEAVY {
            for v in 0..n {
                pq.splice_in(v);
            }
        }

        for v in graph.vertices() {
            for _ in 0..graph.degree_of(v) {
                pq.increment(v);
            }
        }

        pq
    }

    #[inline]
    pub fn ranked_degree(&self, v: Node) -> NumNodes {
        self.verts[v as usize].rank
    }

    #[inline]
    pub fn is_candidate(&self, v: Node) -> bool {
        !self.verts[v as usize].is_fixed
    }

    #[inline]
    pub fn is_dominated(&self, v: Node) -> bool {
        self.verts[v as usize].is_dominated
    }

    /// Unfixes `v`, making it eligible again.
    pub fn add_candidate(&mut self, v: Node) {
        let rank = self.verts[v as usize].rank as usize;
        debug_assert!(self.verts[v as usize].is_fixed);
        self.nodes[rank].unfixed_count += 1;
        self.verts[v as usize].is_fixed = false;
    }

    /// Fixes `v`, removing it from the candidate pool.
    pub fn remove_candidate(&mut self, v: Node) {
        let rank = self.verts[v as usize].rank as usize;
        debug_assert!(self.nodes[rank].unfixed_count > 0 && !self.verts[v as usize].is_fixed);
        self.nodes[rank].unfixed_count -= 1;
        self.verts[v as usize].is_fixed = true;
    }

    pub fn dominate(&mut self, v: Node) {
        debug_assert!(!self.verts[v as usize].is_dominated);
        self.verts[v as usize].is_dominated = true;

        if HEAVY {
            let rank = self.verts[v as usize].rank as usize;
            self.nodes[rank].undominated_count -= 1;
            self.splice_out(v);
        }
    }

    pub fn undominate(&mut self, v: Node) {
        debug_assert!(self.verts[v as usize].is_dominated);
        self.verts[v as usize].is_dominated = false;

        if HEAVY {
            let rank = self.verts[v as usize].rank as usize;
            self.nodes[rank].undominated_count += 1;
            self.splice_in(v);
        }
    }

    /// Moves `v` one rank up, creating the target rank node if absent and
    /// unlinking the old one if it drains. Returns the new rank.
    pub fn increment(&mut self, v: Node) -> NumNodes {
        let old = self.verts[v as usize].rank as usize;
        let new = old + 1;
        debug_assert!(new <= self.n as usize);

        if self.nodes[new].count == 0 {
            let after = self.nodes[old].next;
            self.nodes[new].next = after;
            self.nodes[new].prev = old as u32;
            self.nodes[after as usize].prev = new as u32;
            self.nodes[old].next = new as u32;
        }

        let undominated = HEAVY && !self.verts[v as usize].is_dominated;
        if undominated {
            self.splice_out(v);
            self.nodes[old].undominated_count -= 1;
            self.nodes[new].undominated_count += 1;
        }

        self.verts[v as usize].rank = new as u32;
        self.nodes[new].count += 1;

        if undominated {
            self.splice_in(v);
        }

        let unfixed = !self.verts[v as usize].is_fixed as NumNodes;
        self.nodes[old].unfixed_count -= unfixed;
        self.nodes[new].unfixed_count += unfixed;

        self.nodes[old].count -= 1;
        if self.nodes[old].count == 0 {
            let before = self.nodes[old].prev;
            self.nodes[new].prev = before;
            self.nodes[before as usize].next = new as u32;
            self.nodes[old].next = INVALID_NODE;
            self.nodes[old].prev = INVALID_NODE;
        }

        new as NumNodes
    }

    /// Moves `v` one rank down. Returns the new rank.
    pub fn decrement(&mut self, v: Node) -> NumNodes {
        let old = self.verts[v as usize].rank as usize;
        debug_assert!(old >= 1);
        let new = old - 1;

        if self.nodes[new].count == 0 {
            let before = self.nodes[old].prev;
            self.nodes[new].next = old as u32;
            self.nodes[new].prev = before;
            self.nodes[before as usize].next = new as u32;
            self.nodes[old].prev = new as u32;
        }

        let undominated = HEAVY && !self.verts[v as usize].is_dominated;
        if undominated {
            self.splice_out(v);
            self.nodes[old].undominated_count -= 1;
            self.nodes[new].undominated_count += 1;
        }

        self.verts[v as usize].rank = new as u32;
        self.nodes[new].count += 1;

        if undominated {
            self.splice_in(v);
        }

        let unfixed = !self.verts[v as usize].is_fixed as NumNodes;
        self.nodes[old].unfixed_count -= unfixed;
        self.nodes[new].unfixed_count += unfixed;

        self.nodes[old].count -= 1;
        if self.nodes[old].count == 0 {
            let after = self.nodes[old].next;
            self.nodes[new].next = after;
            self.nodes[after as usize].prev = new as u32;
            self.nodes[old].next = INVALID_NODE;
            self.nodes[old].prev = INVALID_NODE;
        }

        new as NumNodes
    }

    pub fn get_min_degree(&self) -> NumNodes {
        self.nodes[self.sentinel() as usize].next
    }

    pub fn get_max_degree(&self) -> NumNodes {
        self.nodes[self.sentinel() as usize].prev
    }

    /// Sum of the `k` largest ranks among unfixed vertices (fewer if not
    /// that many are left).
    pub fn sum_of_top_k_degrees(&self, mut k: NumNodes) -> NumNodes {
        let sentinel = self.sentinel();
        let mut sum = 0;
        let mut node = self.nodes[sentinel as usize].prev;

        while node != sentinel {
            let deg = node;
            let unfixed = self.nodes[node as usize].unfixed_count;

            if unfixed >= k {
                sum += deg * k;
                break;
            }

            sum += deg * unfixed;
            k -= unfixed;
            node = self.nodes[node as usize].prev;
        }

        sum
    }

    /// Greedy lower bound on the number of vertices needed to dominate
    /// `m` vertices: consume unfixed vertices from the highest rank down,
    /// each covering `rank` vertices. Returns MAX_VERTS+1 when rank 0 is
    /// reached with vertices left over, i.e. domination is impossible.
    pub fn count_minimum_to_dominate(&self, mut m: NumNodes) -> NumNodes {
        debug_assert!(m > 0);
        let sentinel = self.sentinel();
        let mut count = 0;
        let mut node = self.nodes[sentinel as usize].prev;

        loop {
            if node == sentinel || node == 0 {
                return MAX_VERTS as NumNodes + 1;
            }
            let deg = node;
            let unfixed = self.nodes[node as usize].unfixed_count;

            let needed = (m + deg - 1) / deg;
            if needed <= unfixed {
                count += needed;
                break;
            }

            count += unfixed;
            m -= deg * unfixed;
            node = self.nodes[node as usize].prev;
        }

        count
    }

    // Undominated-list splicing (HEAVY only). New vertices append at the
    // tail of their rank's list.
    fn splice_in(&mut self, v: Node) {
        let rank = self.verts[v as usize].rank as usize;
        let tail = self.nodes[rank].und_tail;

        self.verts[v as usize].next = INVALID_NODE;
        self.verts[v as usize].prev = tail;
        if tail == INVALID_NODE {
            self.nodes[rank].und_head = v;
        } else {
            self.verts[tail as usize].next = v;
        }
        self.nodes[rank].und_tail = v;
    }

    fn splice_out(&mut self, v: Node) {
        let rank = self.verts[v as usize].rank as usize;
        let (prev, next) = (self.verts[v as usize].prev, self.verts[v as usize].next);

        if prev == INVALID_NODE {
            self.nodes[rank].und_head = next;
        } else {
            self.verts[prev as usize].next = next;
        }
        if next == INVALID_NODE {
            self.nodes[rank].und_tail = prev;
        } else {
            self.verts[next as usize].prev = prev;
        }
        self.verts[v as usize].next = INVALID_NODE;
        self.verts[v as usize].prev = INVALID_NODE;
    }
}

impl DegreePq<true> {
    /// First undominated vertex of the lowest rank holding one.
    pub fn get_min_undominated_vertex(&self) -> Node {
        let sentinel = self.sentinel();
        let mut node = self.nodes[sentinel as usize].next;
        while node != sentinel {
            if self.nodes[node as usize].undominated_count > 0 {
                let v = self.nodes[node as usize].und_head;
                debug_assert_ne!(v, INVALID_NODE);
                return v;
            }
            node = self.nodes[node as usize].next;
        }
        INVALID_NODE
    }

    /// First undominated vertex of the highest rank holding one.
    pub fn get_max_undominated_vertex(&self) -> Node {
        let sentinel = self.sentinel();
        let mut node = self.nodes[sentinel as usize].prev;
        while node != sentinel {
            if self.nodes[node as usize].undominated_count > 0 {
                let v = self.nodes[node as usize].und_head;
                debug_assert_ne!(v, INVALID_NODE);
                return v;
            }
            node = self.nodes[node as usize].prev;
        }
        INVALID_NODE
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{AdjArray, GraphEdgeEditing, GraphNew};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    /// Straightforward mirror of the queue used as ground truth.
    struct NaiveModel {
        rank: Vec<NumNodes>,
        fixed: Vec<bool>,
        dominated: Vec<bool>,
    }

    impl NaiveModel {
        fn new(graph: &AdjArray) -> Self {
            Self {
                rank: graph.vertices().map(|v| graph.degree_of(v)).collect(),
                fixed: vec![false; graph.len()],
                dominated: vec![false; graph.len()],
            }
        }

        fn min_to_dominate(&self, mut m: i64) -> NumNodes {
            let mut ranks: Vec<_> = (0..self.rank.len())
                .filter(|&v| !self.fixed[v])
                .map(|v| self.rank[v])
                .collect();
            ranks.sort_unstable_by(|a, b| b.cmp(a));

            let mut count = 0;
            for r in ranks {
                if m <= 0 {
                    break;
                }
                if r == 0 {
                    return MAX_VERTS as NumNodes + 1;
                }
                m -= r as i64;
                count += 1;
            }
            if m > 0 {
                return MAX_VERTS as NumNodes + 1;
            }
            count
        }
    }

    fn check_against_model<const HEAVY: bool>(pq: &DegreePq<HEAVY>, model: &NaiveModel) {
        let n = model.rank.len();
        for v in 0..n {
            assert_eq!(pq.ranked_degree(v as Node), model.rank[v], "vertex {v}");
            assert_eq!(pq.is_candidate(v as Node), !model.fixed[v]);
            assert_eq!(pq.is_dominated(v as Node), model.dominated[v]);
        }

        let min = model.rank.iter().min().copied().unwrap();
        let max = model.rank.iter().max().copied().unwrap();
        assert_eq!(pq.get_min_degree(), min);
        assert_eq!(pq.get_max_degree(), max);
    }

    #[test]
    fn initial_ranks_are_degrees() {
        let mut graph = AdjArray::new(6);
        graph.add_edges([(0, 1), (0, 2), (0, 3), (1, 2), (4, 5)]);

        let pq = DegreePqLight::new(&graph);
        for v in graph.vertices() {
            assert_eq!(pq.ranked_degree(v), graph.degree_of(v));
        }
        assert_eq!(pq.get_min_degree(), 1);
        assert_eq!(pq.get_max_degree(), 3);
    }

    fn randomized_ops<const HEAVY: bool>(extra_checks: impl Fn(&DegreePq<HEAVY>, &NaiveModel)) {
        let mut rng = Pcg64Mcg::seed_from_u64(0xdeb);
        for _ in 0..30 {
            let n: Node = rng.gen_range(2..30);
            let mut graph = AdjArray::new(n);
            for u in 0..n {
                for v in (u + 1)..n {
                    if rng.gen_bool(0.3) {
                        graph.add_edge(u, v);
                    }
                }
            }

            let mut pq = DegreePq::<HEAVY>::new(&graph);
            let mut model = NaiveModel::new(&graph);
            check_against_model(&pq, &model);

            for _ in 0..200 {
                let v = rng.gen_range(0..n) as usize;
                match rng.gen_range(0..4) {
                    0 => {
                        if model.rank[v] < n - 1 {
                            assert_eq!(pq.increment(v as Node), model.rank[v] + 1);
                            model.rank[v] += 1;
                        }
                    }
                    1 => {
                        if model.rank[v] > 0 {
                            assert_eq!(pq.decrement(v as Node), model.rank[v] - 1);
                            model.rank[v] -= 1;
                        }
                    }
                    2 => {
                        if model.fixed[v] {
                            pq.add_candidate(v as Node);
                        } else {
                            pq.remove_candidate(v as Node);
                        }
                        model.fixed[v] = !model.fixed[v];
                    }
                    _ => {
                        if model.dominated[v] {
                            pq.undominate(v as Node);
                        } else {
                            pq.dominate(v as Node);
                        }
                        model.dominated[v] = !model.dominated[v];
                    }
                }

                check_against_model(&pq, &model);

                let m = rng.gen_range(1..=n);
                assert_eq!(
                    pq.count_minimum_to_dominate(m),
                    model.min_to_dominate(m as i64),
                    "m = {m}"
                );

                extra_checks(&pq, &model);
            }
        }
    }

    #[test]
    fn randomized_ops_light() {
        randomized_ops::<false>(|_, _| ());
    }

    #[test]
    fn randomized_ops_heavy() {
        randomized_ops::<true>(|pq, model| {
            let undominated: Vec<Node> = (0..model.rank.len() as Node)
                .filter(|&u| !model.dominated[u as usize])
                .collect();

            let min_v = pq.get_min_undominated_vertex();
            let max_v = pq.get_max_undominated_vertex();

            if undominated.is_empty() {
                assert_eq!(min_v, INVALID_NODE);
                assert_eq!(max_v, INVALID_NODE);
            } else {
                let best_min = undominated
                    .iter()
                    .map(|&u| model.rank[u as usize])
                    .min()
                    .unwrap();
                let best_max = undominated
                    .iter()
                    .map(|&u| model.rank[u as usize])
                    .max()
                    .unwrap();
                assert!(!model.dominated[min_v as usize]);
                assert!(!model.dominated[max_v as usize]);
                assert_eq!(model.rank[min_v as usize], best_min);
                assert_eq!(model.rank[max_v as usize], best_max);
            }
        });
    }

    #[test]
    fn top_k_degree_sums() {
        let mut graph = AdjArray::new(4);
        graph.add_edges([(0, 1), (0, 2), (0, 3), (1, 2)]);

        let mut pq = DegreePqLight::new(&graph);
        assert_eq!(pq.sum_of_top_k_degrees(1), 3);
        assert_eq!(pq.sum_of_top_k_degrees(2), 5);
        assert_eq!(pq.sum_of_top_k_degrees(4), 8);
        assert_eq!(pq.sum_of_top_k_degrees(10), 8);

        pq.remove_candidate(0);
        assert_eq!(pq.sum_of_top_k_degrees(2), 4);
    }

    #[test]
    fn impossible_domination_is_flagged() {
        // two isolated vertices, both rank 0
        let graph = AdjArray::new(2);
        let pq = DegreePqLight::new(&graph);
        assert_eq!(
            pq.count_minimum_to_dominate(2),
            MAX_VERTS as NumNodes + 1
        );
    }

    #[test]
    fn fixed_vertices_do_not_contribute_to_the_bound() {
        let mut graph = AdjArray::new(4);
        graph.add_edges([(0, 1), (0, 2), (0, 3)]);

        let mut pq = DegreePqLight::new(&graph);
        assert_eq!(pq.count_minimum_to_dominate(4), 2);

        pq.remove_candidate(0);
        // without the hub only rank-1 leaves remain: three of them cover
        // three vertices, a fourth is unreachable
        assert_eq!(pq.count_minimum_to_dominate(3), 3);
        assert_eq!(
            pq.count_minimum_to_dominate(4),
            MAX_VERTS as NumNodes + 1
        );
    }
}
