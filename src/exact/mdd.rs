use super::{
    degree_pq::DegreePqLight,
    mdd_stack::MddStack,
    rank::NeighborRanker,
    FrameworkCore, ResmodVerdict, PIVOT_MAX_CD, PIVOT_MAX_MDD, PIVOT_MIN_CD, PIVOT_MIN_MDD,
    RANK_ASCENDING, RANK_DESCENDING,
};
use crate::{
    components::{
        ArgStream, Configurable, DominationInstance, OutputProxy, SetAction, Solver,
    },
    errors::Result,
    graph::{AdjacencyList, GraphNodeOrder, Node, NumNodes, INVALID_NODE, MAX_VERTS},
    utils::vertex_set::VertexSet,
};

/// How a bound evaluation turned out. A fatal violation persists for the
/// whole sibling loop of the caller (it does not hinge on the currently
/// excluded candidate), so the caller treats its own branch as trapped.
/// A soft violation may be caused by the current exclusion and only ends
/// the loop it occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundVerdict {
    Fatal,
    Soft,
    Ok,
}

/// Branch-and-bound solver whose lower bound comes from the incremental
/// MDD values instead of raw uncovered degrees. Keeps explicit candidate
/// neighborhood sets per vertex; the light degree queue only tracks
/// uncovered degrees feeding the MDD recomputation.
pub struct MddSolver<
    const PIVOT: u8,
    const RANK: u8,
    const FORCE_STOP: bool,
    const RECHECK: bool,
    const GENERATE_ALL: bool,
> {
    core: FrameworkCore,
}

pub type MddMinCdDesc = MddSolver<{ PIVOT_MIN_CD }, { RANK_DESCENDING }, false, true, false>;
pub type MddMinCdDescAll = MddSolver<{ PIVOT_MIN_CD }, { RANK_DESCENDING }, false, true, true>;
pub type MddMinCdAsc = MddSolver<{ PIVOT_MIN_CD }, { RANK_ASCENDING }, false, true, false>;
pub type MddMinCdAscAll = MddSolver<{ PIVOT_MIN_CD }, { RANK_ASCENDING }, false, true, true>;
pub type MddMinMddDesc = MddSolver<{ PIVOT_MIN_MDD }, { RANK_DESCENDING }, false, true, false>;
pub type MddMinMddDescAll = MddSolver<{ PIVOT_MIN_MDD }, { RANK_DESCENDING }, false, true, true>;
pub type MddMaxMddDesc = MddSolver<{ PIVOT_MAX_MDD }, { RANK_DESCENDING }, false, true, false>;
pub type MddMaxMddDescAll = MddSolver<{ PIVOT_MAX_MDD }, { RANK_DESCENDING }, false, true, true>;

impl<
        const PIVOT: u8,
        const RANK: u8,
        const FORCE_STOP: bool,
        const RECHECK: bool,
        const GENERATE_ALL: bool,
    > Default for MddSolver<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
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
    > Configurable for MddSolver<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
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
    > Solver for MddSolver<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
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

        let candidate_neighbors: Vec<VertexSet> = inst
            .graph
            .vertices()
            .map(|v| {
                let mut set = VertexSet::new(n);
                set.add_all(inst.graph.neighbors_of(v).iter().copied());
                set
            })
            .collect();
        let undominated = VertexSet::full(n);
        let undominated_dpq = DegreePqLight::new(&inst.graph);
        let mdd_stack = MddStack::new(&candidate_neighbors, &undominated, &undominated_dpq);

        let mut search = MddSearch::<PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL> {
            inst,
            core: &mut self.core,
            d: VertexSet::new(n),
            b,
            undominated_dpq,
            candidate_neighbors,
            undominated,
            mdd_stack,
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
            search.mdd_add_dominator(v);
        }
        for v in inst.force_out.iter() {
            search.remove_candidate(v);
            search.mdd_exclude_dominator(v);
        }

        search.core.reset_depth_log();

        output.initialize(inst);
        search.find::<true>(output);
        output.finalize(inst);

        search.core.print_depth_log();
        Ok(())
    }
}

struct MddSearch<
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

    undominated_dpq: DegreePqLight,
    /// Unfixed vertices of each closed neighborhood
    candidate_neighbors: Vec<VertexSet>,
    undominated: VertexSet,
    mdd_stack: MddStack,

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
    > MddSearch<'_, PIVOT, RANK, FORCE_STOP, RECHECK, GENERATE_ALL>
{
    fn mdd_add_dominator(&mut self, v: Node) {
        self.mdd_stack.add_dominator(
            v,
            &self.inst.graph,
            &self.candidate_neighbors,
            &self.undominated,
            &self.undominated_dpq,
        );
    }

    fn mdd_exclude_dominator(&mut self, v: Node) {
        self.mdd_stack.exclude_dominator(
            v,
            &self.inst.graph,
            &self.candidate_neighbors,
            &self.undominated,
            &self.undominated_dpq,
        );
    }

    fn add_candidate(&mut self, v: Node) {
        debug_assert!(self.fixed[v as usize]);
        self.fixed[v as usize] = false;
        self.total_fixed -= 1;
        self.undominated_dpq.add_candidate(v);

        let inst = self.inst;
        for &u in inst.graph.neighbors_of(v) {
            self.candidate_neighbors[u as usize].add(v);
        }
    }

    /// Returns *true* if fixing `v` trapped a vertex (see the DD solver).
    fn remove_candidate(&mut self, v: Node) -> bool {
        debug_assert!(!self.fixed[v as usize]);
        self.fixed[v as usize] = true;
        self.total_fixed += 1;
        self.undominated_dpq.remove_candidate(v);

        let inst = self.inst;
        let mut forced = false;
        for &u in inst.graph.neighbors_of(v) {
            self.candidate_neighbors[u as usize].remove(v);
            if self.candidate_neighbors[u as usize].is_empty() && self.covered[u as usize] == 0 {
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
        self.undominated.remove(v);

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
        self.undominated.add(v);

        let inst = self.inst;
        for &u in inst.graph.neighbors_of(v) {
            self.undominated_dpq.increment(u);
        }
    }

    fn evaluate_bounds(&self) -> BoundVerdict {
        let n = self.inst.graph.number_of_nodes();

        let min_vertices_needed = self.mdd_stack.min_vertices_needed();
        if min_vertices_needed >= MAX_VERTS as NumNodes {
            return BoundVerdict::Fatal;
        }
        let min_total_size = self.d.len() as NumNodes + min_vertices_needed;

        if n - self.total_fixed + 1 < min_vertices_needed {
            return BoundVerdict::Fatal;
        }
        if n - self.total_fixed + 1 == min_vertices_needed {
            return BoundVerdict::Soft;
        }

        let size_cut = if GENERATE_ALL {
            min_total_size > self.core.upper_bound
        } else {
            min_total_size >= self.b.len() as NumNodes
        };
        if size_cut {
            BoundVerdict::Soft
        } else {
            BoundVerdict::Ok
        }
    }

    fn choose_next_vertex(&self) -> Node {
        match PIVOT {
            PIVOT_MIN_MDD => self.mdd_stack.get_min_mdd_vertex(&self.undominated),
            PIVOT_MAX_MDD => self.mdd_stack.get_max_mdd_vertex(&self.undominated),
            PIVOT_MIN_CD => {
                let mut best = INVALID_NODE;
                let mut min_cd = MAX_VERTS;
                for v in self.undominated.iter() {
                    if self.candidate_neighbors[v as usize].len() < min_cd {
                        min_cd = self.candidate_neighbors[v as usize].len();
                        best = v;
                    }
                }
                debug_assert_ne!(best, INVALID_NODE);
                best
            }
            PIVOT_MAX_CD => {
                let mut best = INVALID_NODE;
                let mut max_cd = 0;
                for v in self.undominated.iter() {
                    if self.candidate_neighbors[v as usize].len() > max_cd {
                        max_cd = self.candidate_neighbors[v as usize].len();
                        best = v;
                    }
                }
                debug_assert_ne!(best, INVALID_NODE);
                best
            }
            _ => unreachable!("invalid pivot rule"),
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
        let candidates = &self.candidate_neighbors[i as usize];
        let dpq = &self.undominated_dpq;

        self.ranker
            .rank(
                candidates
                    .iter()
                    .map(|u| (u, dpq.ranked_degree(u))),
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
        let mut forced = self.remove_candidate(j);
        self.d.add(j);

        let inst = self.inst;
        for &k in inst.graph.neighbors_of(j) {
            self.dominate(k);
        }
        self.mdd_add_dominator(j);

        // A fatal bound below us stays violated for the rest of the
        // caller's loop, which is exactly the trapped-vertex situation.
        if self.find::<CHECK>(output) == BoundVerdict::Fatal {
            forced = true;
        }

        self.mdd_stack.remove_dominator(j);
        for &k in inst.graph.neighbors_of(j).iter().rev() {
            self.undominate(k);
        }
        self.d.remove_pop(j);

        // Siblings explored after j must not contain it: shrink the
        // candidate neighborhoods accordingly until the loop unwinds.
        self.mdd_exclude_dominator(j);

        forced
    }

    fn find<const CHECK: bool>(&mut self, output: &mut dyn OutputProxy) -> BoundVerdict {
        if self.stopped {
            return BoundVerdict::Ok;
        }

        let depth = self.d.len();
        match self.core.report_node::<CHECK>(depth) {
            ResmodVerdict::Skip => return BoundVerdict::Ok,
            ResmodVerdict::StopChecking if CHECK => {
                self.core.unreport_node(depth);
                return self.find::<false>(output);
            }
            _ => {}
        }

        let n = self.inst.graph.number_of_nodes();
        if self.total_covered == n {
            self.record_solution(output);
            return BoundVerdict::Ok;
        }

        let bound = self.evaluate_bounds();
        if bound != BoundVerdict::Ok {
            return bound;
        }

        let i = self.choose_next_vertex();
        debug_assert_ne!(i, INVALID_NODE);

        let neighbor_order = self.rank_neighbors(i);

        let mut banned: Vec<Node> = Vec::with_capacity(neighbor_order.len());
        for &j in &neighbor_order {
            let force_stop = self.add_vertex_to_set::<CHECK>(j, output);
            banned.push(j);
            if FORCE_STOP && force_stop {
                break;
            }
            if RECHECK && self.evaluate_bounds() != BoundVerdict::Ok {
                break;
            }
        }

        for &q in banned.iter().rev() {
            self.mdd_stack.unexclude_dominator(q);
            self.add_candidate(q);
        }

        BoundVerdict::Ok
    }
}
