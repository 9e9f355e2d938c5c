use itertools::Itertools;

use crate::{
    components::{ArgStream, Configurable, DominationInstance, OutputProxy, SetAction},
    errors::Result,
    graph::{AdjArray, GraphNodeOrder},
    io::write_graph,
    utils::vertex_set::VertexSet,
};

fn solution_line(inst: &DominationInstance, dominating_set: &VertexSet) -> String {
    std::iter::once(dominating_set.len().to_string())
        .chain(
            dominating_set
                .iter()
                .map(|v| inst.graph.real_index_of(v).to_string()),
        )
        .join(" ")
}

/// Prints every reported set on its own line, followed by a `-1` line.
pub struct OutputAll {
    total_solutions: u64,
    print_stats: bool,
}

impl Default for OutputAll {
    fn default() -> Self {
        Self {
            total_solutions: 0,
            print_stats: true,
        }
    }
}

impl Configurable for OutputAll {
    fn accept_argument(&mut self, arg: &str, _args: &mut ArgStream) -> Result<bool> {
        match arg {
            "-stats" => self.print_stats = true,
            "-nostats" => self.print_stats = false,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl OutputProxy for OutputAll {
    fn initialize(&mut self, _inst: &DominationInstance) {
        self.total_solutions = 0;
    }

    fn process_set(&mut self, inst: &DominationInstance, dominating_set: &VertexSet) -> SetAction {
        self.total_solutions += 1;
        println!("{}", solution_line(inst, dominating_set));
        SetAction::Continue
    }

    fn finalize(&mut self, _inst: &DominationInstance) {
        println!("-1");
        if self.print_stats {
            log::info!("total solutions generated: {}", self.total_solutions);
        }
    }
}

/// Prints only the final (best) set. `-graph` emits the original input
/// graph first, `-size_only` (alias `-gamma`) suppresses the vertex list.
pub struct OutputBest {
    best_set: VertexSet,
    original_graph: AdjArray,
    print_graph: bool,
    size_only: bool,
}

impl Default for OutputBest {
    fn default() -> Self {
        Self {
            best_set: VertexSet::new(0),
            original_graph: AdjArray::default(),
            print_graph: false,
            size_only: false,
        }
    }
}

impl Configurable for OutputBest {
    fn accept_argument(&mut self, arg: &str, _args: &mut ArgStream) -> Result<bool> {
        match arg {
            "-stats" | "-nostats" => {}
            "-gamma" | "-size_only" | "-size-only" => self.size_only = true,
            "-graph" => self.print_graph = true,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl OutputProxy for OutputBest {
    fn observe_input(&mut self, graph: &AdjArray) {
        self.original_graph = graph.clone();
    }

    fn initialize(&mut self, inst: &DominationInstance) {
        // the full vertex set stands in until the first reported solution
        self.best_set = VertexSet::full(inst.graph.number_of_nodes());
    }

    fn process_set(&mut self, _inst: &DominationInstance, dominating_set: &VertexSet) -> SetAction {
        self.best_set.clone_from_set(dominating_set);
        SetAction::Continue
    }

    fn finalize(&mut self, inst: &DominationInstance) {
        if self.print_graph {
            let mut stdout = std::io::stdout().lock();
            if let Err(error) = write_graph(&mut stdout, &self.original_graph) {
                log::error!("cannot write graph: {error}");
            }
        }

        if self.size_only {
            println!("{}", self.best_set.len());
        } else {
            println!("{}", solution_line(inst, &self.best_set));
        }
    }
}

/// Ignores all sets and prints the (possibly filtered and conditioned)
/// graph when solving finishes.
#[derive(Default)]
pub struct GraphOnly;

impl Configurable for GraphOnly {}

impl OutputProxy for GraphOnly {
    fn process_set(&mut self, _inst: &DominationInstance, _set: &VertexSet) -> SetAction {
        SetAction::Continue
    }

    fn finalize(&mut self, inst: &DominationInstance) {
        let mut stdout = std::io::stdout().lock();
        if let Err(error) = write_graph(&mut stdout, &inst.graph) {
            log::error!("cannot write graph: {error}");
        }
    }
}

/// Test-support proxy collecting every reported set, optionally stopping
/// after a fixed number of solutions.
pub struct CollectingOutput {
    pub sets: Vec<Vec<crate::graph::Node>>,
    pub stop_after: Option<usize>,
}

impl CollectingOutput {
    pub fn new() -> Self {
        Self {
            sets: Vec::new(),
            stop_after: None,
        }
    }

    pub fn with_stop_after(limit: usize) -> Self {
        Self {
            sets: Vec::new(),
            stop_after: Some(limit),
        }
    }
}

impl Default for CollectingOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Configurable for CollectingOutput {}

impl OutputProxy for CollectingOutput {
    fn process_set(&mut self, inst: &DominationInstance, dominating_set: &VertexSet) -> SetAction {
        self.sets.push(
            dominating_set
                .iter()
                .map(|v| inst.graph.real_index_of(v))
                .collect(),
        );

        match self.stop_after {
            Some(limit) if self.sets.len() >= limit => SetAction::Stop,
            _ => SetAction::Continue,
        }
    }
}
