use super::{FrameworkCore, ResmodVerdict};
use crate::{
    components::{
        ArgStream, Configurable, DominationInstance, OutputProxy, SetAction, Solver,
    },
    errors::Result,
    graph::{AdjacencyList, GraphNodeOrder, Node, NumNodes},
    utils::vertex_set::VertexSet,
};

/// Baseline backtracking solver without degree queues: the pivot is always
/// the smallest-index uncovered vertex and the lower bound is the coarse
/// ceil((uncovered)/(max_degree+1)).
pub struct FixedOrderSolver<const GENERATE_ALL: bool> {
    core: FrameworkCore,
}

pub type FixedOrder = FixedOrderSolver<false>;
pub type FixedOrderAll = FixedOrderSolver<true>;

impl<const GENERATE_ALL: bool> Default for FixedOrderSolver<GENERATE_ALL> {
    fn default() -> Self {
        Self {
            core: FrameworkCore::default(),
        }
    }
}

impl<const GENERATE_ALL: bool> Configurable for FixedOrderSolver<GENERATE_ALL> {
    fn accept_argument(&mut self, arg: &str, args: &mut ArgStream) -> Result<bool> {
        self.core.accept_argument(arg, args)
    }
}

impl<const GENERATE_ALL: bool> Solver for FixedOrderSolver<GENERATE_ALL> {
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

        let mut search = FixedOrderSearch::<GENERATE_ALL> {
            inst,
            core: &mut self.core,
            d: VertexSet::new(n),
            b,
            max_deg: inst.graph.max_degree(),
            covered: vec![0; n as usize],
            fixed: vec![false; n as usize],
            total_covered: 0,
            total_fixed: 0,
            stopped: false,
        };

        // Members of the set are always fixed, so force-in vertices are
        // both added and fixed up front.
        for v in inst.force_in.iter() {
            search.fixed[v as usize] = true;
            search.total_fixed += 1;
            search.d.add(v);
            for &u in inst.graph.neighbors_of(v) {
                if search.covered[u as usize] == 0 {
                    search.total_covered += 1;
                }
                search.covered[u as usize] += 1;
            }
        }
        for v in inst.force_out.iter() {
            search.fixed[v as usize] = true;
            search.total_fixed += 1;
        }

        search.core.reset_depth_log();

        output.initialize(inst);
        search.find::<true>(0, output);
        output.finalize(inst);

        search.core.print_depth_log();
        Ok(())
    }
}

struct FixedOrderSearch<'a, const GENERATE_ALL: bool> {
    inst: &'a DominationInstance,
    core: &'a mut FrameworkCore,

    d: VertexSet,
    b: VertexSet,
    max_deg: NumNodes,

    covered: Vec<NumNodes>,
    fixed: Vec<bool>,
    total_covered: NumNodes,
    total_fixed: NumNodes,
    stopped: bool,
}

impl<const GENERATE_ALL: bool> FixedOrderSearch<'_, GENERATE_ALL> {
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

    fn add_vertex_to_set<const CHECK: bool>(
        &mut self,
        i: Node,
        j: Node,
        output: &mut dyn OutputProxy,
    ) {
        self.fixed[j as usize] = true;
        self.total_fixed += 1;
        self.d.add(j);

        let inst = self.inst;
        for &k in inst.graph.neighbors_of(j) {
            if self.covered[k as usize] == 0 {
                self.total_covered += 1;
            }
            self.covered[k as usize] += 1;
        }
        debug_assert!(self.covered[i as usize] > 0);

        self.find::<CHECK>(i + 1, output);

        for &k in inst.graph.neighbors_of(j) {
            self.covered[k as usize] -= 1;
            if self.covered[k as usize] == 0 {
                self.total_covered -= 1;
            }
        }
        self.d.remove_pop(j);
    }

    fn find<const CHECK: bool>(&mut self, mut i: Node, output: &mut dyn OutputProxy) {
        if self.stopped {
            return;
        }

        let depth = self.d.len();
        match self.core.report_node::<CHECK>(depth) {
            ResmodVerdict::Skip => return,
            ResmodVerdict::StopChecking if CHECK => {
                self.core.unreport_node(depth);
                return self.find::<false>(i, output);
            }
            _ => {}
        }

        let n = self.inst.graph.number_of_nodes();
        if self.total_covered == n {
            self.record_solution(output);
            return;
        }

        while (i as usize) < self.covered.len() && self.covered[i as usize] > 0 {
            i += 1;
        }
        assert!(i < n, "uncovered vertex must exist while the cover is incomplete");

        let min_vertices_needed = (n - self.total_covered + self.max_deg) / (self.max_deg + 1);
        let min_total_size = self.d.len() as NumNodes + min_vertices_needed;

        if GENERATE_ALL {
            if min_total_size > self.core.upper_bound || n - self.total_fixed < min_vertices_needed
            {
                return;
            }
        } else if min_total_size >= self.b.len() as NumNodes
            || n - self.total_fixed < min_vertices_needed
        {
            return;
        }

        // Branch candidates: i itself, then i's uncovered neighbors, then
        // its already covered ones.
        let inst = self.inst;
        let mut neighbor_order: Vec<Node> = Vec::with_capacity(inst.graph.degree_of(i) as usize + 1);
        if !self.fixed[i as usize] {
            neighbor_order.push(i);
        }
        for &j in inst.graph.neighbors_of(i) {
            if !self.fixed[j as usize] && self.covered[j as usize] == 0 && j != i {
                neighbor_order.push(j);
            }
        }
        for &j in inst.graph.neighbors_of(i) {
            if !self.fixed[j as usize] && self.covered[j as usize] > 0 {
                neighbor_order.push(j);
            }
        }

        let fixed_list = neighbor_order;
        for &j in &fixed_list {
            self.add_vertex_to_set::<CHECK>(i, j, output);
        }

        for &q in fixed_list.iter().rev() {
            self.fixed[q as usize] = false;
            self.total_fixed -= 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        graph::{AdjArray, GraphNew},
        testing::*,
    };

    #[test]
    fn single_vertex_graph() {
        let graph = AdjArray::new(1);
        let sets = generate::<FixedOrderAll>(&graph, &[], &[], 0, 1);
        assert_eq!(sets, vec![vec![0]]);

        // the optimizer never improves on the full-set sentinel here
        let sizes = optimize::<FixedOrder>(&graph, &[], &[]);
        assert_eq!(best_size(&sizes, &graph), 1);
    }

    #[test]
    fn optimization_scenarios() {
        for (graph, expected) in scenario_graphs() {
            let sizes = optimize::<FixedOrder>(&graph, &[], &[]);
            assert_eq!(best_size(&sizes, &graph), expected, "{graph:?}");
        }
    }

    #[test]
    fn queen_4_has_domination_number_three() {
        let graph = queen_graph(4);
        let sizes = optimize::<FixedOrder>(&graph, &[], &[]);
        assert_eq!(best_size(&sizes, &graph), 3);
    }

    #[test]
    fn generation_matches_brute_force_randomized() {
        generation_matches_brute_force::<FixedOrderAll>(0xf1c5);
    }

    #[test]
    fn optimization_matches_brute_force_randomized() {
        optimization_matches_brute_force::<FixedOrder>(0xf1c6);
    }

    #[test]
    fn bounds_window_restricts_generation() {
        let graph = path_graph(3);
        let sets = generate::<FixedOrderAll>(&graph, &[], &[], 2, 2);
        assert_eq!(sets, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn resmod_partition_covers_the_tree() {
        resmod_partition_is_exact::<FixedOrderAll>();
    }
}
