//! Test support: named graphs, brute-force reference enumeration and the
//! cross-checking drivers shared by the solver test suites.

use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::{
    components::{ArgStream, Configurable, DominationInstance, Solver},
    graph::{AdjArray, AdjacencyList, GnpGenerator, GraphEdgeEditing, GraphNew, GraphNodeOrder, Node},
    output::CollectingOutput,
};

pub use crate::sources::queen::queen_graph;

pub fn path_graph(n: Node) -> AdjArray {
    let mut graph = AdjArray::new(n);
    graph.add_edges((1..n).map(|v| (v - 1, v)));
    graph
}

pub fn cycle_graph(n: Node) -> AdjArray {
    let mut graph = path_graph(n);
    if n > 2 {
        graph.add_edge(n - 1, 0);
    }
    graph
}

pub fn complete_graph(n: Node) -> AdjArray {
    let mut graph = AdjArray::new(n);
    graph.add_edges((0..n).tuple_combinations());
    graph
}

/// Small instances with known domination numbers.
pub fn scenario_graphs() -> Vec<(AdjArray, usize)> {
    vec![
        (AdjArray::new(1), 1),
        (path_graph(3), 1),
        (path_graph(4), 2),
        (complete_graph(4), 1),
        (cycle_graph(5), 2),
        (AdjArray::new(3), 3),
    ]
}

pub fn instance(graph: &AdjArray, force_in: &[Node], force_out: &[Node]) -> DominationInstance {
    let mut inst = DominationInstance::new(graph.clone());
    inst.force_in.add_all(force_in.iter().copied());
    inst.force_out.add_all(force_out.iter().copied());
    inst
}

/// Runs a freshly configured solver and returns the reported sets in
/// emission order (in original vertex numbering).
pub fn run_with_args<S: Solver + Default>(
    graph: &AdjArray,
    force_in: &[Node],
    force_out: &[Node],
    args: &[&str],
) -> Vec<Vec<Node>> {
    let mut solver = S::default();
    let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    solver
        .configure(&mut ArgStream::new(&owned))
        .expect("solver arguments rejected");

    let mut inst = instance(graph, force_in, force_out);
    let mut output = CollectingOutput::new();
    solver.solve(&mut inst, &mut output).expect("solver failed");
    output.sets
}

/// Optimization run: every emitted set improves on the previous one; the
/// last is optimal (when anything was found at all).
pub fn optimize<S: Solver + Default>(
    graph: &AdjArray,
    force_in: &[Node],
    force_out: &[Node],
) -> Vec<Vec<Node>> {
    run_with_args::<S>(graph, force_in, force_out, &[])
}

/// The size the best-set proxy would report: the last improvement, or the
/// full-set sentinel when the search never improved on it.
pub fn best_size(solutions: &[Vec<Node>], graph: &AdjArray) -> usize {
    solutions
        .last()
        .map(|s| s.len())
        .unwrap_or(graph.len())
}

/// Generation run over the window [lower, upper]; sets are canonicalized
/// (each sorted, list sorted) for comparisons.
pub fn generate<S: Solver + Default>(
    graph: &AdjArray,
    force_in: &[Node],
    force_out: &[Node],
    lower: usize,
    upper: usize,
) -> Vec<Vec<Node>> {
    let sets = run_with_args::<S>(
        graph,
        force_in,
        force_out,
        &["-l", &lower.to_string(), "-u", &upper.to_string()],
    );
    canonicalize(sets)
}

pub fn canonicalize(mut sets: Vec<Vec<Node>>) -> Vec<Vec<Node>> {
    for set in &mut sets {
        set.sort_unstable();
    }
    sets.sort();
    sets
}

pub fn is_dominating_set(graph: &AdjArray, set: &[Node]) -> bool {
    let mut covered = graph.vertex_bitset_unset();
    for &v in set {
        covered.set_bit(v);
        covered.set_bits(graph.neighbors_of(v).iter().copied());
    }
    covered.are_all_set()
}

/// All dominating sets with `lower <= |D| <= upper` honoring the force
/// sets, by exhaustive subset enumeration. Only sensible for small n.
pub fn brute_force_sets(
    graph: &AdjArray,
    force_in: &[Node],
    force_out: &[Node],
    lower: usize,
    upper: usize,
) -> Vec<Vec<Node>> {
    let n = graph.len();
    assert!(n <= 20);

    let mut result = Vec::new();
    for mask in 0u32..(1 << n) {
        let set: Vec<Node> = (0..n as Node).filter(|&v| mask & (1 << v) != 0).collect();
        if set.len() < lower || set.len() > upper {
            continue;
        }
        if force_in.iter().any(|&v| mask & (1 << v) == 0) {
            continue;
        }
        if force_out.iter().any(|&v| mask & (1 << v) != 0) {
            continue;
        }
        if is_dominating_set(graph, &set) {
            result.push(set);
        }
    }

    canonicalize(result)
}

/// Minimum size of a feasible dominating set, if any exists.
pub fn brute_force_min(
    graph: &AdjArray,
    force_in: &[Node],
    force_out: &[Node],
) -> Option<usize> {
    brute_force_sets(graph, force_in, force_out, 0, graph.len())
        .iter()
        .map(|s| s.len())
        .min()
}

fn random_test_case(rng: &mut Pcg64Mcg) -> (AdjArray, Vec<Node>, Vec<Node>) {
    let n = rng.gen_range(1..10);
    let p = rng.gen_range(0.15..0.7);
    let graph = AdjArray::random_gnp(rng, n, p);

    let mut force_in = Vec::new();
    let mut force_out = Vec::new();
    if n >= 2 && rng.gen_bool(0.4) {
        force_in.push(rng.gen_range(0..n));
    }
    if n >= 2 && rng.gen_bool(0.4) {
        let v = rng.gen_range(0..n);
        if !force_in.contains(&v) {
            force_out.push(v);
        }
    }

    (graph, force_in, force_out)
}

/// Generation output must equal the brute-force enumeration exactly.
pub fn generation_matches_brute_force<S: Solver + Default>(seed: u64) {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    for _ in 0..40 {
        let (graph, force_in, force_out) = random_test_case(&mut rng);
        let n = graph.len();
        let lower = rng.gen_range(0..=1);
        let upper = rng.gen_range(lower..=n);

        let got = generate::<S>(&graph, &force_in, &force_out, lower, upper);
        let expected = brute_force_sets(&graph, &force_in, &force_out, lower, upper);
        assert_eq!(
            got, expected,
            "graph: {graph:?}, force_in: {force_in:?}, force_out: {force_out:?}, \
             window: [{lower}, {upper}]"
        );
    }
}

/// The last improving solution of an optimization run must attain the
/// brute-force minimum; every emitted set must be feasible and strictly
/// smaller than its predecessor.
pub fn optimization_matches_brute_force<S: Solver + Default>(seed: u64) {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    for _ in 0..40 {
        let (graph, force_in, force_out) = random_test_case(&mut rng);
        let n = graph.len();

        let solutions = optimize::<S>(&graph, &force_in, &force_out);

        for window in solutions.windows(2) {
            assert!(window[1].len() < window[0].len());
        }
        for set in &solutions {
            assert!(is_dominating_set(&graph, set));
            assert!(force_in.iter().all(|v| set.contains(v)));
            assert!(force_out.iter().all(|v| !set.contains(v)));
        }

        match brute_force_min(&graph, &force_in, &force_out) {
            // sets as large as the sentinel are never an improvement
            Some(min) if min < n => {
                assert_eq!(
                    solutions.last().map(|s| s.len()),
                    Some(min),
                    "graph: {graph:?}, force_in: {force_in:?}, force_out: {force_out:?}"
                );
            }
            _ => assert!(solutions.is_empty(), "graph: {graph:?}"),
        }
    }
}

/// Splitting the tree by (res, mod, depth) must partition the generation
/// output: the union over all residues equals the run without splitting.
pub fn resmod_partition_is_exact<S: Solver + Default>() {
    let graph = cycle_graph(6);
    let n = graph.len();
    let full = generate::<S>(&graph, &[], &[], 0, n);

    for modulus in [2usize, 3] {
        for depth in [1usize, 2] {
            let mut union = Vec::new();
            for res in 0..modulus {
                let part = run_with_args::<S>(
                    &graph,
                    &[],
                    &[],
                    &[
                        "-l", "0",
                        "-u", &n.to_string(),
                        "-res", &res.to_string(),
                        "-mod", &modulus.to_string(),
                        "-resmod_depth", &depth.to_string(),
                    ],
                );
                union.extend(part);
            }

            assert_eq!(
                canonicalize(union),
                full,
                "mod = {modulus}, depth = {depth}"
            );
        }
    }
}

/// All registered optimization variants report the same optimum
/// (they may disagree on which minimum set is found).
pub fn variant_agreement_on_random_graphs(seed: u64) {
    use crate::exact::*;

    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    for _ in 0..20 {
        let (graph, force_in, force_out) = random_test_case(&mut rng);

        let reference = best_size(
            &optimize::<FixedOrder>(&graph, &force_in, &force_out),
            &graph,
        );

        macro_rules! check_variant {
            ($solver:ty) => {
                assert_eq!(
                    best_size(
                        &optimize::<$solver>(&graph, &force_in, &force_out),
                        &graph
                    ),
                    reference,
                    concat!(stringify!($solver), " disagrees"),
                );
            };
        }

        check_variant!(DdMinCdAsc);
        check_variant!(DdMinCdDesc);
        check_variant!(MddMinCdAsc);
        check_variant!(MddMinCdDesc);
        check_variant!(MddMinMddDesc);
        check_variant!(MddMaxMddDesc);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn brute_force_knows_the_classics() {
        assert_eq!(brute_force_min(&path_graph(3), &[], &[]), Some(1));
        assert_eq!(brute_force_min(&cycle_graph(5), &[], &[]), Some(2));
        assert_eq!(brute_force_min(&complete_graph(4), &[], &[]), Some(1));
        assert_eq!(brute_force_min(&path_graph(3), &[0], &[]), Some(2));
        assert_eq!(brute_force_min(&path_graph(3), &[], &[1]), Some(2));
    }

    #[test]
    fn infeasible_when_an_isolated_vertex_is_forced_out() {
        let graph = AdjArray::new(2);
        assert_eq!(brute_force_min(&graph, &[], &[0]), None);
    }

    #[test]
    fn dominating_check() {
        let graph = path_graph(4);
        assert!(is_dominating_set(&graph, &[1, 3]));
        assert!(!is_dominating_set(&graph, &[0]));
        assert!(!is_dominating_set(&graph, &[]));
    }
}
