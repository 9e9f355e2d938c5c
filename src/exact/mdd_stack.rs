use crate::{
    exact::degree_pq::DegreePqLight,
    graph::{AdjacencyList, AdjArray, Node, NumNodes, INVALID_NODE, MAX_VERTS},
    utils::vertex_set::VertexSet,
};

/// MDD value of covered vertices.
pub const INVALID_MDD: u32 = u32::MAX;

/// Tracks, for every undominated vertex `u`, the largest uncovered degree
/// among the candidates that could dominate `u` (its MDD). A vertex with
/// small MDD is hard to cover: every remaining way of covering it has low
/// impact, so the bound derived from these values is tight.
///
/// Mutations come in stack-paired events (dominator added/removed,
/// candidate excluded/restored). Each event records the values it
/// overwrote in a row, so the inverse event restores them exactly.
pub struct MddStack {
    mdd_values: Vec<u32>,
    /// mdd_counts[d] = number of undominated vertices with mdd == d
    mdd_counts: Vec<NumNodes>,
    /// Largest d with mdd_counts[d] > 0, maintained lazily
    max_mdd: u32,
    /// Live rows, one per event not yet reversed
    rows: Vec<StackRow>,
    /// Recycled rows keeping their entry buffers allocated
    pool: Vec<StackRow>,
}

#[derive(Default)]
struct StackRow {
    cause: Node,
    entries: Vec<(Node, u32)>,
}

impl MddStack {
    pub fn new(
        candidate_neighbors: &[VertexSet],
        undominated: &VertexSet,
        undominated_dpq: &DegreePqLight,
    ) -> Self {
        let n = candidate_neighbors.len();
        let mut stack = Self {
            mdd_values: vec![INVALID_MDD; n],
            mdd_counts: vec![0; n + 2],
            max_mdd: 0,
            rows: Vec::new(),
            pool: Vec::new(),
        };

        for v in undominated.iter() {
            let mdd = recompute_mdd(v, candidate_neighbors, undominated_dpq);
            stack.mdd_values[v as usize] = mdd;
            stack.mdd_counts[mdd as usize] += 1;
            stack.max_mdd = stack.max_mdd.max(mdd);
        }

        stack
    }

    #[inline]
    pub fn get_mdd(&self, v: Node) -> u32 {
        self.mdd_values[v as usize]
    }

    #[inline]
    pub fn get_max_mdd(&self) -> u32 {
        self.max_mdd
    }

    /// First undominated vertex (in set order) attaining the maximum MDD.
    pub fn get_max_mdd_vertex(&self, undominated: &VertexSet) -> Node {
        for v in undominated.iter() {
            if self.get_mdd(v) == self.max_mdd {
                return v;
            }
        }
        debug_assert!(false, "no undominated vertex attains max_mdd");
        INVALID_NODE
    }

    /// Undominated vertex with the smallest MDD (first among equals).
    pub fn get_min_mdd_vertex(&self, undominated: &VertexSet) -> Node {
        let mut result = INVALID_NODE;
        let mut min_mdd = MAX_VERTS as u32;
        for v in undominated.iter() {
            if self.get_mdd(v) < min_mdd {
                min_mdd = self.get_mdd(v);
                result = v;
            }
        }
        debug_assert_ne!(result, INVALID_NODE);
        result
    }

    /// Called as `v` joins the dominating set, after all of v's neighbors
    /// have been marked covered (and left the undominated set).
    pub fn add_dominator(
        &mut self,
        v: Node,
        graph: &AdjArray,
        candidate_neighbors: &[VertexSet],
        undominated: &VertexSet,
        undominated_dpq: &DegreePqLight,
    ) {
        let mut row = self.new_row(v);

        // Clear the MDD of each of v's newly covered neighbors.
        for &u in graph.neighbors_of(v) {
            let old_mdd = self.mdd_values[u as usize];
            if old_mdd == INVALID_MDD {
                continue;
            }

            row.entries.push((u, old_mdd));
            self.mdd_values[u as usize] = INVALID_MDD;
            self.mdd_counts[old_mdd as usize] -= 1;
        }

        // Recompute every remaining undominated vertex from scratch. One
        // addition can shrink candidate neighborhoods up to four hops out,
        // and the undominated set is typically smaller than that ball.
        for u in undominated.iter() {
            let old_mdd = self.mdd_values[u as usize];
            debug_assert_ne!(old_mdd, INVALID_MDD);
            let new_mdd = recompute_mdd(u, candidate_neighbors, undominated_dpq);
            if old_mdd == new_mdd {
                continue;
            }
            debug_assert!(new_mdd < old_mdd);

            row.entries.push((u, old_mdd));
            self.mdd_values[u as usize] = new_mdd;
            self.mdd_counts[old_mdd as usize] -= 1;
            self.mdd_counts[new_mdd as usize] += 1;
        }

        self.push_row(row);

        while self.max_mdd > 0 && self.mdd_counts[self.max_mdd as usize] == 0 {
            self.max_mdd -= 1;
        }
    }

    /// Reverses [`MddStack::add_dominator`]; call as `v` leaves the set,
    /// before any of its neighbors are marked uncovered.
    pub fn remove_dominator(&mut self, v: Node) {
        let mut row = self.pop_row(v);

        let mut highest_new_mdd = 0;
        while let Some((u, old_mdd)) = row.entries.pop() {
            let overwritten = self.mdd_values[u as usize];
            self.mdd_values[u as usize] = old_mdd;
            if overwritten != INVALID_MDD {
                self.mdd_counts[overwritten as usize] -= 1;
            }
            self.mdd_counts[old_mdd as usize] += 1;
            highest_new_mdd = highest_new_mdd.max(old_mdd);
        }
        self.stash_row(row);

        if highest_new_mdd > self.max_mdd {
            self.max_mdd = highest_new_mdd;
        }
    }

    /// Called when candidate `v` (not in the set) becomes permanently
    /// unavailable, just after it has been marked fixed.
    pub fn exclude_dominator(
        &mut self,
        v: Node,
        graph: &AdjArray,
        candidate_neighbors: &[VertexSet],
        undominated: &VertexSet,
        undominated_dpq: &DegreePqLight,
    ) {
        let mut row = self.new_row(v);

        for &u in graph.neighbors_of(v) {
            if !undominated.contains(u) {
                continue;
            }
            let old_mdd = self.mdd_values[u as usize];
            let new_mdd = recompute_mdd(u, candidate_neighbors, undominated_dpq);
            if new_mdd == old_mdd {
                continue;
            }
            debug_assert!(new_mdd < old_mdd);

            row.entries.push((u, old_mdd));
            self.mdd_values[u as usize] = new_mdd;
            self.mdd_counts[old_mdd as usize] -= 1;
            self.mdd_counts[new_mdd as usize] += 1;
        }

        self.push_row(row);

        while self.max_mdd > 0 && self.mdd_counts[self.max_mdd as usize] == 0 {
            self.max_mdd -= 1;
        }
    }

    /// Reverses [`MddStack::exclude_dominator`]; call just before `v` is
    /// unfixed.
    pub fn unexclude_dominator(&mut self, v: Node) {
        let mut row = self.pop_row(v);

        let mut highest_new_mdd = 0;
        while let Some((u, old_mdd)) = row.entries.pop() {
            let overwritten = self.mdd_values[u as usize];
            debug_assert!(old_mdd > overwritten);
            self.mdd_values[u as usize] = old_mdd;
            self.mdd_counts[overwritten as usize] -= 1;
            self.mdd_counts[old_mdd as usize] += 1;
            highest_new_mdd = highest_new_mdd.max(old_mdd);
        }
        self.stash_row(row);

        if highest_new_mdd > self.max_mdd {
            self.max_mdd = highest_new_mdd;
        }
    }

    /// Lower bound on the number of additional dominators required to
    /// cover all remaining undominated vertices. A vertex of MDD 0 cannot
    /// be covered at all; the result is then MAX_VERTS (infinity).
    pub fn min_vertices_needed(&self) -> NumNodes {
        if self.mdd_counts[0] > 0 {
            return MAX_VERTS as NumNodes;
        }

        let mut verts_needed = 0;
        let mut c: i64 = 0;
        for mdd in 0..=self.max_mdd as i64 {
            c += self.mdd_counts[mdd as usize] as i64;
            while c > 0 {
                c -= mdd;
                verts_needed += 1;
            }
        }
        verts_needed
    }

    fn new_row(&mut self, cause: Node) -> StackRow {
        let mut row = self.pool.pop().unwrap_or_default();
        row.cause = cause;
        row.entries.clear();
        row
    }

    fn push_row(&mut self, row: StackRow) {
        self.rows.push(row);
    }

    fn pop_row(&mut self, cause: Node) -> StackRow {
        let row = self.rows.pop().expect("row stack underflow");
        debug_assert_eq!(row.cause, cause);
        row
    }

    fn stash_row(&mut self, row: StackRow) {
        self.pool.push(row);
    }
}

fn recompute_mdd(
    v: Node,
    candidate_neighbors: &[VertexSet],
    undominated_dpq: &DegreePqLight,
) -> u32 {
    candidate_neighbors[v as usize]
        .iter()
        .map(|u| undominated_dpq.ranked_degree(u))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{GnpGenerator, GraphNodeOrder};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    /// Drives the stack exactly the way the search driver does, while an
    /// independent from-scratch recomputation provides the ground truth.
    struct Harness {
        graph: AdjArray,
        covered: Vec<u32>,
        fixed: Vec<bool>,
        undominated: VertexSet,
        candidate_neighbors: Vec<VertexSet>,
        dpq: DegreePqLight,
        stack: MddStack,
    }

    impl Harness {
        fn new(mut graph: AdjArray) -> Self {
            graph.add_self_loops();
            graph.sort_neighbors_descending();
            let n = graph.number_of_nodes();

            let undominated = VertexSet::full(n);
            let candidate_neighbors: Vec<VertexSet> = graph
                .vertices()
                .map(|v| {
                    let mut set = VertexSet::new(n);
                    set.add_all(graph.neighbors_of(v).iter().copied());
                    set
                })
                .collect();
            let dpq = DegreePqLight::new(&graph);
            let stack = MddStack::new(&candidate_neighbors, &undominated, &dpq);

            Self {
                covered: vec![0; n as usize],
                fixed: vec![false; n as usize],
                graph,
                undominated,
                candidate_neighbors,
                dpq,
                stack,
            }
        }

        fn dominate(&mut self, v: Node) {
            self.covered[v as usize] += 1;
            if self.covered[v as usize] > 1 {
                return;
            }
            self.dpq.dominate(v);
            self.undominated.remove(v);
            for i in 0..self.graph.degree_of(v) as usize {
                let u = self.graph.neighbors_of(v)[i];
                self.dpq.decrement(u);
            }
        }

        fn undominate(&mut self, v: Node) {
            self.covered[v as usize] -= 1;
            if self.covered[v as usize] > 0 {
                return;
            }
            self.dpq.undominate(v);
            self.undominated.add(v);
            for i in 0..self.graph.degree_of(v) as usize {
                let u = self.graph.neighbors_of(v)[i];
                self.dpq.increment(u);
            }
        }

        fn remove_candidate(&mut self, v: Node) {
            assert!(!self.fixed[v as usize]);
            self.fixed[v as usize] = true;
            self.dpq.remove_candidate(v);
            for i in 0..self.graph.degree_of(v) as usize {
                let u = self.graph.neighbors_of(v)[i];
                self.candidate_neighbors[u as usize].remove(v);
            }
        }

        fn add_candidate(&mut self, v: Node) {
            assert!(self.fixed[v as usize]);
            self.fixed[v as usize] = false;
            self.dpq.add_candidate(v);
            for i in 0..self.graph.degree_of(v) as usize {
                let u = self.graph.neighbors_of(v)[i];
                self.candidate_neighbors[u as usize].add(v);
            }
        }

        fn true_uncovered_degree(&self, u: Node) -> u32 {
            self.graph
                .neighbors_of(u)
                .iter()
                .filter(|&&w| self.covered[w as usize] == 0)
                .count() as u32
        }

        fn true_mdd(&self, v: Node) -> u32 {
            self.graph
                .neighbors_of(v)
                .iter()
                .filter(|&&u| !self.fixed[u as usize])
                .map(|&u| self.true_uncovered_degree(u))
                .max()
                .unwrap_or(0)
        }

        fn check(&self) {
            let n = self.graph.number_of_nodes();
            let mut true_counts = vec![0 as NumNodes; n as usize + 2];
            let mut true_max = 0;

            for v in self.graph.vertices() {
                if self.covered[v as usize] > 0 {
                    assert_eq!(self.stack.get_mdd(v), INVALID_MDD, "covered vertex {v}");
                } else {
                    let expected = self.true_mdd(v);
                    assert_eq!(self.stack.get_mdd(v), expected, "vertex {v}");
                    true_counts[expected as usize] += 1;
                    true_max = true_max.max(expected);
                }
            }

            for (d, &count) in true_counts.iter().enumerate() {
                assert_eq!(self.stack.mdd_counts[d], count, "mdd count {d}");
            }
            assert_eq!(self.stack.max_mdd, true_max);

            let expected_needed = if true_counts[0] > 0 && self.undominated.len() > 0 {
                MAX_VERTS as NumNodes
            } else {
                let mut needed = 0;
                let mut c: i64 = 0;
                for (d, &count) in true_counts.iter().enumerate().take(true_max as usize + 1) {
                    c += count as i64;
                    while c > 0 {
                        c -= d as i64;
                        needed += 1;
                    }
                }
                needed
            };
            assert_eq!(self.stack.min_vertices_needed(), expected_needed);

            if !self.undominated.is_empty() {
                let min_v = self.stack.get_min_mdd_vertex(&self.undominated);
                let max_v = self.stack.get_max_mdd_vertex(&self.undominated);
                assert_eq!(
                    self.stack.get_mdd(min_v),
                    self.undominated.iter().map(|v| self.true_mdd(v)).min().unwrap()
                );
                assert_eq!(self.stack.get_mdd(max_v), self.stack.get_max_mdd());
            }
        }
    }

    fn random_descent(h: &mut Harness, rng: &mut Pcg64Mcg, depth: usize) {
        let snapshot = (
            h.stack.mdd_values.clone(),
            h.stack.mdd_counts.clone(),
            h.stack.max_mdd,
        );

        let mut banned = Vec::new();
        for _ in 0..rng.gen_range(1..=2) {
            let candidates: Vec<Node> = h
                .graph
                .vertices()
                .filter(|&v| !h.fixed[v as usize])
                .collect();
            if candidates.is_empty() {
                break;
            }
            let j = candidates[rng.gen_range(0..candidates.len())];

            h.remove_candidate(j);
            let neighbors: Vec<Node> = h.graph.neighbors_of(j).to_vec();
            for &k in &neighbors {
                h.dominate(k);
            }
            h.stack.add_dominator(
                j,
                &h.graph,
                &h.candidate_neighbors,
                &h.undominated,
                &h.dpq,
            );
            h.check();

            if depth > 0 && rng.gen_bool(0.7) {
                random_descent(h, rng, depth - 1);
            }

            h.stack.remove_dominator(j);
            for &k in neighbors.iter().rev() {
                h.undominate(k);
            }
            h.stack.exclude_dominator(
                j,
                &h.graph,
                &h.candidate_neighbors,
                &h.undominated,
                &h.dpq,
            );
            h.check();

            banned.push(j);
        }

        for &j in banned.iter().rev() {
            h.stack.unexclude_dominator(j);
            h.add_candidate(j);
        }
        h.check();

        assert_eq!(h.stack.mdd_values, snapshot.0);
        assert_eq!(h.stack.mdd_counts, snapshot.1);
        assert_eq!(h.stack.max_mdd, snapshot.2);
    }

    #[test]
    fn ground_truth_on_random_graphs() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x31dd);
        for _ in 0..25 {
            let n = rng.gen_range(2..16);
            let p = rng.gen_range(0.1..0.6);
            let graph = AdjArray::random_gnp(&mut rng, n, p);

            let mut harness = Harness::new(graph);
            harness.check();
            random_descent(&mut harness, &mut rng, 4);
        }
    }

    #[test]
    fn initial_values_on_a_path() {
        // path 0-1-2 with self-loops: uncovered degrees 2, 3, 2
        let harness = Harness::new(AdjArray::test_only_from([(0, 1), (1, 2)]));
        assert_eq!(harness.stack.get_mdd(0), 3);
        assert_eq!(harness.stack.get_mdd(1), 3);
        assert_eq!(harness.stack.get_mdd(2), 3);
        assert_eq!(harness.stack.get_max_mdd(), 3);
        // one vertex of degree 3 covers all three
        assert_eq!(harness.stack.min_vertices_needed(), 1);
    }

    #[test]
    fn mdd_zero_makes_domination_impossible() {
        let mut harness = Harness::new(AdjArray::test_only_from([(0, 1)]));

        // ban both vertices: nobody can cover anything anymore
        harness.remove_candidate(0);
        harness.stack.exclude_dominator(
            0,
            &harness.graph,
            &harness.candidate_neighbors,
            &harness.undominated,
            &harness.dpq,
        );
        harness.remove_candidate(1);
        harness.stack.exclude_dominator(
            1,
            &harness.graph,
            &harness.candidate_neighbors,
            &harness.undominated,
            &harness.dpq,
        );

        assert_eq!(harness.stack.min_vertices_needed(), MAX_VERTS as NumNodes);
    }
}
