use itertools::Itertools;

use crate::{
    components::{ArgStream, Configurable, DominationInstance, PreprocessFilter},
    errors::{ConfigError, Result},
    graph::{AdjacencyList, GraphNodeOrder, Node},
    utils::{rng, vertex_set::VertexSet},
};

/// Replaces the instance by its image under `permutation`, where the new
/// vertex `i` corresponds to the old vertex `permutation[i]`. Force sets
/// are carried through the inverse map; `real_index` chains make emitted
/// solutions refer to the input numbering regardless of renumbering.
fn apply_permutation(inst: &mut DominationInstance, permutation: &[Node]) {
    let n = inst.graph.len();
    debug_assert_eq!(permutation.len(), n);

    let mut inverse_perm = vec![0 as Node; n];
    for (i, &p) in permutation.iter().enumerate() {
        inverse_perm[p as usize] = i as Node;
    }

    let graph = inst.graph.renumber(permutation);

    let mut force_in = VertexSet::new(n as Node);
    force_in.add_all(inst.force_in.iter().map(|v| inverse_perm[v as usize]));
    let mut force_out = VertexSet::new(n as Node);
    force_out.add_all(inst.force_out.iter().map(|v| inverse_perm[v as usize]));

    inst.graph = graph;
    inst.force_in = force_in;
    inst.force_out = force_out;
}

/// Renumbers vertices by ascending degree.
#[derive(Default)]
pub struct RenumberMinDeg;

impl Configurable for RenumberMinDeg {}

impl PreprocessFilter for RenumberMinDeg {
    fn process(&mut self, inst: &mut DominationInstance) -> Result<()> {
        let graph = &inst.graph;
        let permutation = graph
            .vertices()
            .sorted_by_key(|&v| graph.degree_of(v))
            .collect_vec();
        apply_permutation(inst, &permutation);
        Ok(())
    }
}

/// Renumbers vertices by descending degree.
#[derive(Default)]
pub struct RenumberMaxDeg;

impl Configurable for RenumberMaxDeg {}

impl PreprocessFilter for RenumberMaxDeg {
    fn process(&mut self, inst: &mut DominationInstance) -> Result<()> {
        let graph = &inst.graph;
        let permutation = graph
            .vertices()
            .sorted_by_key(|&v| std::cmp::Reverse(graph.degree_of(v)))
            .collect_vec();
        apply_permutation(inst, &permutation);
        Ok(())
    }
}

/// Renumbers vertices in BFS order from a root (`-root`, default 0).
#[derive(Default)]
pub struct RenumberBfs {
    root: Node,
}

impl Configurable for RenumberBfs {
    fn accept_argument(&mut self, arg: &str, args: &mut ArgStream) -> Result<bool> {
        if arg == "-root" {
            self.root = args.next_node()?;
            return Ok(true);
        }
        Ok(false)
    }
}

impl PreprocessFilter for RenumberBfs {
    fn process(&mut self, inst: &mut DominationInstance) -> Result<()> {
        let graph = &inst.graph;
        let n = graph.len();
        if self.root as usize >= n {
            return Err(ConfigError::InvalidVertex(self.root));
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        order.push(self.root);
        visited[self.root as usize] = true;

        let mut head = 0;
        while head < order.len() {
            let v = order[head];
            head += 1;
            for &u in graph.neighbors_of(v) {
                if !visited[u as usize] {
                    visited[u as usize] = true;
                    order.push(u);
                }
            }
        }

        if order.len() != n {
            return Err(ConfigError::Other(
                "graph is disconnected; BFS renumbering would drop vertices".into(),
            ));
        }

        apply_permutation(inst, &order);
        Ok(())
    }
}

/// Renumbers vertices by a random permutation from the global PRNG
/// (`-seed` reseeds it).
#[derive(Default)]
pub struct RenumberRandom;

impl Configurable for RenumberRandom {
    fn accept_argument(&mut self, arg: &str, args: &mut ArgStream) -> Result<bool> {
        if arg == "-seed" {
            rng::set_random_seed(args.next_u64()?);
            return Ok(true);
        }
        Ok(false)
    }
}

impl PreprocessFilter for RenumberRandom {
    fn process(&mut self, inst: &mut DominationInstance) -> Result<()> {
        let n = inst.graph.len();
        let mut permutation = (0..n as Node).collect_vec();

        // Knuth shuffle
        for i in 0..n {
            let j = rng::random_in_range(i as u32, n as u32 - 1) as usize;
            permutation.swap(i, j);
        }

        apply_permutation(inst, &permutation);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{AdjArray, AdjacencyTest};

    fn path_instance() -> DominationInstance {
        let mut inst = DominationInstance::new(AdjArray::test_only_from([(0, 1), (1, 2), (2, 3)]));
        inst.force_in.add(0);
        inst.force_out.add(3);
        inst
    }

    fn degrees(inst: &DominationInstance) -> Vec<u32> {
        inst.graph
            .vertices()
            .map(|v| inst.graph.degree_of(v))
            .collect()
    }

    #[test]
    fn min_deg_sorts_degrees() {
        let mut inst = path_instance();
        RenumberMinDeg.process(&mut inst).unwrap();
        assert_eq!(degrees(&inst), vec![1, 1, 2, 2]);

        // force sets follow the permutation: old endpoints have degree 1
        for v in inst.force_in.iter().chain(inst.force_out.iter()) {
            assert_eq!(inst.graph.degree_of(v), 1);
        }
        assert_eq!(inst.force_in.len(), 1);
        assert_eq!(inst.force_out.len(), 1);
    }

    #[test]
    fn max_deg_sorts_degrees() {
        let mut inst = path_instance();
        RenumberMaxDeg.process(&mut inst).unwrap();
        assert_eq!(degrees(&inst), vec![2, 2, 1, 1]);
    }

    #[test]
    fn bfs_orders_by_distance() {
        let mut inst = path_instance();
        let mut filter = RenumberBfs::default();
        let args: Vec<String> = ["-root", "2"].iter().map(|s| s.to_string()).collect();
        filter.configure(&mut ArgStream::new(&args)).unwrap();
        filter.process(&mut inst).unwrap();

        // new vertex 0 is the root, every later vertex neighbors an earlier one
        assert_eq!(inst.graph.real_index_of(0), 2);
        for v in 1..4 {
            assert!((0..v).any(|u| inst.graph.has_edge(u, v)));
        }
    }

    #[test]
    fn bfs_rejects_disconnected() {
        let mut inst = DominationInstance::new(AdjArray::test_only_from([(0, 1), (2, 3)]));
        assert!(RenumberBfs::default().process(&mut inst).is_err());
    }

    #[test]
    fn solving_a_renumbered_instance_yields_the_same_sets() {
        use crate::{
            components::Solver,
            exact::{FixedOrderAll, MddMinCdDescAll},
            output::CollectingOutput,
            testing,
        };

        let graph = testing::cycle_graph(6);
        let baseline = testing::generate::<MddMinCdDescAll>(&graph, &[1], &[], 0, 3);
        assert!(!baseline.is_empty());

        let mut filters: Vec<Box<dyn PreprocessFilter>> = vec![
            Box::new(RenumberMaxDeg),
            Box::new(RenumberBfs::default()),
            Box::new(RenumberRandom),
        ];
        rng::set_random_seed(99);

        for filter in &mut filters {
            let mut inst = testing::instance(&graph, &[1], &[]);
            filter.process(&mut inst).unwrap();

            for (mut solver, name) in [
                (
                    Box::new(MddMinCdDescAll::default()) as Box<dyn Solver>,
                    "mdd",
                ),
                (Box::new(FixedOrderAll::default()), "fixed"),
            ] {
                let args: Vec<String> =
                    ["-l", "0", "-u", "3"].iter().map(|s| s.to_string()).collect();
                solver.configure(&mut ArgStream::new(&args)).unwrap();

                let mut output = CollectingOutput::new();
                let mut inst = inst.clone();
                solver.solve(&mut inst, &mut output).unwrap();

                // reported sets use the original numbering via real_index
                assert_eq!(testing::canonicalize(output.sets), baseline, "{name}");
            }
        }
    }

    #[test]
    fn random_is_a_permutation() {
        let mut inst = path_instance();
        rng::set_random_seed(7);
        RenumberRandom.process(&mut inst).unwrap();

        let mut reals: Vec<Node> = (0..4).map(|v| inst.graph.real_index_of(v)).collect();
        reals.sort_unstable();
        assert_eq!(reals, vec![0, 1, 2, 3]);
        assert_eq!(degrees(&inst).iter().sum::<u32>(), 6);
    }
}
