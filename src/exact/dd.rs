use super::{
    degree_pq::{DegreePqHeavy, DegreePqLight},
    rank::NeighborRanker,
    FrameworkCore, ResmodVerdict, PIVOT_MAX_CD, PIVOT_MIN_CD, RANK_ASCENDING, RANK_DESCENDING,
};
use crate::{
    components::{
        ArgStream, Configurable, DominationInstance, OutputProxy, SetAction, Solver,
    },
    errors::Result,
    graph::{AdjacencyList, GraphNodeOrder, Node, NumNodes, INVALID_NODE},
    utils::vertex_set::VertexSet,
};

/// Branch-and-bound solver driven by two degree queues: a light queue of
/// uncovered degrees for the greedy cover bound, and a heavy queue of
/// candidate degrees for pivot selection. Compile-time parameters select
/// the pivot rule, the neighbor ranking direction, whether a trapped
/// vertex aborts the sibling loop, whether bounds are re-evaluated inside
/// the branching loop, and whether all sets in the size window are
/// emitted instead of improving ones only.
pub struct DdSolver<
    const PIVOT: u8,
    const RANK: u8,
    const FORCE_STOP: bool,
    const RECHECK: bool,
    const GENERATE_ALL: bool,
> {
    core: FrameworkCore,
}

pub type DdMinCdAsc = DdSolver<{ PIVOT_MIN_CD }, { RANK_ASCENDING }, false, false, false>;
pub type DdMinCdAscAll = DdSolver<{ PIVOT_MIN_CD }, { RANK_ASCENDING }, false, false, true>;
pub type DdMinCdDesc = DdSolver<{ PIVOT_MIN_CD }, { RANK_DESCENDING }, false, false, false>;
pub type DdMinCdDescAll = DdSolver<{ PIVOT_MIN_CD }, { RANK_DESCENDING }, false, false, true>;

impl<
        const PIVOT: u8,
        const RANK: u8,
        const FORCE_STOP: bool,
        const RECHECK: bool,
        const GENERATE_ALL: bool,
    > Default for DdSolver<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
{
    fn default() -> Self {
        Self {
            core: FrameworkCore::default(),
        }
    }
}

impl<
        const PIVOT: u8,
        const RANK: u8,
        const FORCE_STOP: bool,
        const RECHECK: bool,
        const GENERATE_ALL: bool,
    > Configurable for DdSolver<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
{
    fn accept_argument(&mut self, arg: &str, args: &mut ArgStream) -> Result<bool> {
        self.core.accept_argument(arg, args)
    }
}

impl<
        const PIVOT: u8,
        const RANK: u8,
        const FORCE_STOP: bool,
        const RECHECK: bool,
        const GENERATE_ALL: bool,
    > Solver for DdSolver<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
{
    fn solve(&mut self, inst: &mut DominationInstance, output: &mut dyn OutputProxy) -> Result<()> {
        inst.graph.add_self_loops();
        inst.graph.sort_neighbors_descending();
        let inst: &DominationInstance = inst;

        let n = inst.graph.number_of_nodes();

        let mut b = VertexSet::new(n);
        let sentinel = if !GENERATE_ALL && self.core.upper_bound < n {
            self.core.upper_bound + 1
        } else {
            n
        };
        b.reset_full(sentinel);

        let mut search = DdSearch::<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL> {
            inst,
            core: &mut self.core,
            d: VertexSet::new(n),
            b,
            undominated_dpq: DegreePqLight::new(&inst.graph),
            candidate_dpq: DegreePqHeavy::new(&inst.graph),
            covered: vec![0; n as usize],
            fixed: vec![false; n as usize],
            total_covered: 0,
            total_fixed: 0,
            ranker: NeighborRanker::new(),
            stopped: false,
        };

        for v in inst.force_in.iter() {
            search.remove_candidate(v);
            search.d.add(v);
            for i in 0..inst.graph.degree_of(v) as usize {
                search.dominate(inst.graph.neighbors_of(v)[i]);
            }
        }
        for v in inst.force_out.iter() {
            search.remove_candidate(v);
        }

        search.core.reset_depth_log();

        output.initialize(inst);
        search.find::<true>(output);
        output.finalize(inst);

        search.core.print_depth_log();
        Ok(())
    }
}

struct DdSearch<
    'a,
    const PIVOT: u8,
    const RANK: u8,
    const FORCE_STOP: bool,
    const RECHECK: bool,
    const GENERATE_ALL: bool,
> {
    inst: &'a DominationInstance,
    core: &'a mut FrameworkCore,

    /// Current working set
    d: VertexSet,
    /// Best set found so far
    b: VertexSet,

    /// Uncovered degree of every vertex
    undominated_dpq: DegreePqLight,
    /// Candidate degree of every vertex
    candidate_dpq: DegreePqHeavy,

    covered: Vec<NumNodes>,
    fixed: Vec<bool>,
    total_covered: NumNodes,
    total_fixed: NumNodes,

    ranker: NeighborRanker,
    stopped: bool,
}

impl<
        const PIVOT: u8,
        const RANK: u8,
        const FORCE_STOP: bool,
        const RECHECK: bool,
        const GENERATE_ALL: bool,
    > DdSearch<'_, PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
{
    fn add_candidate(&mut self, v: Node) {
        debug_assert!(self.fixed[v as usize]);
        self.fixed[v as usize] = false;
        self.total_fixed -= 1;
        self.undominated_dpq.add_candidate(v);
        self.candidate_dpq.add_candidate(v);

        let inst = self.inst;
        for &u in inst.graph.neighbors_of(v) {
            self.candidate_dpq.increment(u);
        }
    }

    /// Fixes `v` out of the candidate pool. Returns *true* if doing so
    /// trapped a vertex: an uncovered neighbor whose candidate degree
    /// dropped to 0, so v was the last remaining way to dominate it.
    fn remove_candidate(&mut self, v: Node) -> bool {
        debug_assert!(!self.fixed[v as usize]);
        self.fixed[v as usize] = true;
        self.total_fixed += 1;
        self.undominated_dpq.remove_candidate(v);
        self.candidate_dpq.remove_candidate(v);

        let inst = self.inst;
        let mut forced = false;
        for &u in inst.graph.neighbors_of(v) {
            if self.candidate_dpq.decrement(u) == 0 && self.covered[u as usize] == 0 {
                forced = true;
            }
        }
        forced
    }

    fn dominate(&mut self, v: Node) {
        self.covered[v as usize] += 1;
        if self.covered[v as usize] > 1 {
            return;
        }
        self.total_covered += 1;

        self.undominated_dpq.dominate(v);
        self.candidate_dpq.dominate(v);

        let inst = self.inst;
        for &u in inst.graph.neighbors_of(v) {
            self.undominated_dpq.decrement(u);
        }
    }

    fn undominate(&mut self, v: Node) {
        self.covered[v as usize] -= 1;
        if self.covered[v as usize] > 0 {
            return;
        }
        self.total_covered -= 1;

        self.undominated_dpq.undominate(v);
        self.candidate_dpq.undominate(v);

        let inst = self.inst;
        for &u in inst.graph.neighbors_of(v) {
            self.undominated_dpq.increment(u);
        }
    }

    fn bounds_satisfied(&self) -> bool {
        let n = self.inst.graph.number_of_nodes();

        let min_vertices_needed = self
            .undominated_dpq
            .count_minimum_to_dominate(n - self.total_covered);
        let min_total_size = self.d.len() as NumNodes + min_vertices_needed;

        if GENERATE_ALL {
            min_total_size <= self.core.upper_bound && n - self.total_fixed >= min_vertices_needed
        } else {
            min_total_size < self.b.len() as NumNodes
                && n - self.total_fixed >= min_vertices_needed
        }
    }

    fn record_solution(&mut self, output: &mut dyn OutputProxy) {
        let size = self.d.len() as NumNodes;
        let emit = if GENERATE_ALL {
            size >= self.core.lower_bound && size <= self.core.upper_bound
        } else if size >= self.core.lower_bound && (size as usize) < self.b.len() {
            self.b.clone_from_set(&self.d);
            true
        } else {
            false
        };

        if emit && output.process_set(self.inst, &self.d) == SetAction::Stop {
            self.stopped = true;
        }
    }

    fn rank_neighbors(&mut self, i: Node) -> Vec<Node> {
        let inst = self.inst;
        let fixed = &self.fixed;
        let dpq = &self.undominated_dpq;

        self.ranker
            .rank(
                inst.graph
                    .neighbors_of(i)
                    .iter()
                    .filter(|&&u| !fixed[u as usize])
                    .map(|&u| {
                        let uncovered_deg = dpq.ranked_degree(u);
                        debug_assert!(uncovered_deg > 0);
                        (u, uncovered_deg)
                    }),
                dpq.get_max_degree(),
                RANK == RANK_DESCENDING,
            )
            .to_vec()
    }

    fn add_vertex_to_set<const CHECK: bool>(
        &mut self,
        j: Node,
        output: &mut dyn OutputProxy,
    ) -> bool {
        let forced = self.remove_candidate(j);
        self.d.add(j);

        let inst = self.inst;
        for &k in inst.graph.neighbors_of(j) {
            self.dominate(k);
        }

        self.find::<CHECK>(output);

        for &k in inst.graph.neighbors_of(j).iter().rev() {
            self.undominate(k);
        }
        self.d.remove_pop(j);

        forced
    }

    fn find<const CHECK: bool>(&mut self, output: &mut dyn OutputProxy) {
        if self.stopped {
            return;
        }

        let depth = self.d.len();
        match self.core.report_node::<CHECK>(depth) {
            ResmodVerdict::Skip => return,
            ResmodVerdict::StopChecking if CHECK => {
                self.core.unreport_node(depth);
                return self.find::<false>(output);
            }
            _ => {}
        }

        let n = self.inst.graph.number_of_nodes();
        if self.total_covered == n {
            self.record_solution(output);
            return;
        }

        let i = if PIVOT == PIVOT_MIN_CD {
            self.candidate_dpq.get_min_undominated_vertex()
        } else {
            debug_assert_eq!(PIVOT, PIVOT_MAX_CD);
            self.candidate_dpq.get_max_undominated_vertex()
        };
        if i == INVALID_NODE {
            return;
        }
        debug_assert!(self.covered[i as usize] == 0 && i < n);

        if !RECHECK && !self.bounds_satisfied() {
            return;
        }

        let neighbor_order = self.rank_neighbors(i);

        let mut banned: Vec<Node> = Vec::with_capacity(neighbor_order.len());
        for &j in &neighbor_order {
            if RECHECK && !self.bounds_satisfied() {
                break;
            }
            let force_stop = self.add_vertex_to_set::<CHECK>(j, output);
            banned.push(j);
            if FORCE_STOP && force_stop {
                break;
            }
        }

        // Banned siblings are restored in the order they were banned, not
        // in reverse. The queues tolerate it, and the forward order keeps
        // per-rank candidate lists in a reproducible arrangement.
        for &q in &banned {
            self.add_candidate(q);
        }
    }
}
