use std::sync::OnceLock;

use crate::{
    components::{InputSource, OutputProxy, PreprocessFilter, Solver},
    exact::*,
    filters::*,
    output::*,
    sources::*,
};

/// One registered component: a unique name within its kind, a one-line
/// description, and a factory producing a fresh instance.
pub struct ComponentEntry<T: ?Sized> {
    pub name: &'static str,
    pub description: &'static str,
    factory: fn() -> Box<T>,
}

impl<T: ?Sized> ComponentEntry<T> {
    fn new(name: &'static str, description: &'static str, factory: fn() -> Box<T>) -> Self {
        Self {
            name,
            description,
            factory,
        }
    }

    pub fn spawn(&self) -> Box<T> {
        (self.factory)()
    }
}

/// The process-wide component table. Populated once at startup and
/// immutable afterwards; concurrent reads are safe.
pub struct Registry {
    pub input_sources: Vec<ComponentEntry<dyn InputSource>>,
    pub filters: Vec<ComponentEntry<dyn PreprocessFilter>>,
    pub solvers: Vec<ComponentEntry<dyn Solver>>,
    pub output_proxies: Vec<ComponentEntry<dyn OutputProxy>>,
}

impl Registry {
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::with_builtins)
    }

    pub fn with_builtins() -> Self {
        let input_sources: Vec<ComponentEntry<dyn InputSource>> = vec![
            ComponentEntry::new(
                "basic_input",
                "Read adjacency lists from standard input",
                || Box::new(BasicInput::new()),
            ),
            ComponentEntry::new(
                "queen_graph",
                "Generate queen graphs (use -n, or -start/-end for a range of board sizes)",
                || Box::new(QueenGraphSource::default()),
            ),
        ];

        let filters: Vec<ComponentEntry<dyn PreprocessFilter>> = vec![
            ComponentEntry::new(
                "force_in",
                "Force vertices into the dominating set (vertex indices follow '-F force_in')",
                || Box::new(ForceFilter::force_in()),
            ),
            ComponentEntry::new(
                "force_out",
                "Force vertices out of the dominating set (vertex indices follow '-F force_out')",
                || Box::new(ForceFilter::force_out()),
            ),
            ComponentEntry::new(
                "print_graph_stderr",
                "Print the graph to the log stream",
                || Box::new(PrintGraphFilter),
            ),
            ComponentEntry::new(
                "renumber_mindeg",
                "Renumber vertices with low-degree vertices first",
                || Box::new(RenumberMinDeg),
            ),
            ComponentEntry::new(
                "renumber_maxdeg",
                "Renumber vertices with high-degree vertices first",
                || Box::new(RenumberMaxDeg),
            ),
            ComponentEntry::new(
                "renumber_bfs",
                "Renumber vertices in BFS order (use -root to pick the root)",
                || Box::new(RenumberBfs::default()),
            ),
            ComponentEntry::new(
                "renumber_random",
                "Randomly renumber the graph (use -seed to set the seed)",
                || Box::new(RenumberRandom),
            ),
        ];

        let solvers: Vec<ComponentEntry<dyn Solver>> = vec![
            ComponentEntry::new(
                "fixed_order",
                "Fixed order backtracking solver (optimizing version)",
                || Box::new(FixedOrder::default()),
            ),
            ComponentEntry::new(
                "fixed_order_all",
                "Fixed order backtracking solver (exhaustive generation version)",
                || Box::new(FixedOrderAll::default()),
            ),
            ComponentEntry::new("DD_minCD_asc", "DD_minCD_asc", || {
                Box::new(DdMinCdAsc::default())
            }),
            ComponentEntry::new("DD_minCD_asc_all", "DD_minCD_asc_all", || {
                Box::new(DdMinCdAscAll::default())
            }),
            ComponentEntry::new("DD_minCD_desc", "DD_minCD_desc", || {
                Box::new(DdMinCdDesc::default())
            }),
            ComponentEntry::new("DD_minCD_desc_all", "DD_minCD_desc_all", || {
                Box::new(DdMinCdDescAll::default())
            }),
            ComponentEntry::new("DD", "DD bounding solver (optimization)", || {
                Box::new(DdMinCdAsc::default())
            }),
            ComponentEntry::new("DD_all", "DD bounding solver (generation)", || {
                Box::new(DdMinCdAscAll::default())
            }),
            ComponentEntry::new("MDD_minCD_desc", "MDD_minCD_desc", || {
                Box::new(MddMinCdDesc::default())
            }),
            ComponentEntry::new("MDD_minCD_desc_all", "MDD_minCD_desc_all", || {
                Box::new(MddMinCdDescAll::default())
            }),
            ComponentEntry::new("MDD_minCD_asc", "MDD_minCD_asc", || {
                Box::new(MddMinCdAsc::default())
            }),
            ComponentEntry::new("MDD_minCD_asc_all", "MDD_minCD_asc_all", || {
                Box::new(MddMinCdAscAll::default())
            }),
            ComponentEntry::new("MDD_minMDD_desc", "MDD_minMDD_desc", || {
                Box::new(MddMinMddDesc::default())
            }),
            ComponentEntry::new("MDD_minMDD_desc_all", "MDD_minMDD_desc_all", || {
                Box::new(MddMinMddDescAll::default())
            }),
            ComponentEntry::new("MDD_maxMDD_desc", "MDD_maxMDD_desc", || {
                Box::new(MddMaxMddDesc::default())
            }),
            ComponentEntry::new("MDD_maxMDD_desc_all", "MDD_maxMDD_desc_all", || {
                Box::new(MddMaxMddDescAll::default())
            }),
            ComponentEntry::new("MDD", "MDD bounding solver (optimization)", || {
                Box::new(MddMinCdDesc::default())
            }),
            ComponentEntry::new("MDD_all", "MDD bounding solver (generation)", || {
                Box::new(MddMinCdDescAll::default())
            }),
        ];

        let output_proxies: Vec<ComponentEntry<dyn OutputProxy>> = vec![
            ComponentEntry::new(
                "output_all",
                "Output each certificate on its own line, followed by -1",
                || Box::new(OutputAll::default()),
            ),
            ComponentEntry::new(
                "output_best",
                "Output the last certificate only (-graph prepends the graph, -size_only drops the vertex list)",
                || Box::new(OutputBest::default()),
            ),
            ComponentEntry::new(
                "graph_only",
                "Output the graph only (ignore all dominating sets)",
                || Box::new(GraphOnly),
            ),
        ];

        Self {
            input_sources,
            filters,
            solvers,
            output_proxies,
        }
    }

    pub fn spawn_input_source(&self, name: &str) -> Option<Box<dyn InputSource>> {
        spawn(&self.input_sources, name)
    }

    pub fn spawn_preprocess_filter(&self, name: &str) -> Option<Box<dyn PreprocessFilter>> {
        spawn(&self.filters, name)
    }

    pub fn spawn_solver(&self, name: &str) -> Option<Box<dyn Solver>> {
        spawn(&self.solvers, name)
    }

    pub fn spawn_output_proxy(&self, name: &str) -> Option<Box<dyn OutputProxy>> {
        spawn(&self.output_proxies, name)
    }

    /// Renders the component catalog, the payload of `-h`.
    pub fn describe_components(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let mut section = |title: &str, names: Vec<(&str, &str)>| {
            let _ = writeln!(out, "{title}:");
            for (name, description) in names {
                let _ = writeln!(out, "  {name:<24} {description}");
            }
        };

        section(
            "Input sources (-I)",
            self.input_sources
                .iter()
                .map(|e| (e.name, e.description))
                .collect(),
        );
        section(
            "Preprocess filters (-F)",
            self.filters.iter().map(|e| (e.name, e.description)).collect(),
        );
        section(
            "Solvers (-S)",
            self.solvers.iter().map(|e| (e.name, e.description)).collect(),
        );
        section(
            "Output proxies (-O)",
            self.output_proxies
                .iter()
                .map(|e| (e.name, e.description))
                .collect(),
        );

        out
    }
}

fn spawn<T: ?Sized>(entries: &[ComponentEntry<T>], name: &str) -> Option<Box<T>> {
    entries.iter().find(|e| e.name == name).map(|e| e.spawn())
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn names_are_unique_within_each_kind() {
        let registry = Registry::with_builtins();
        assert!(registry.input_sources.iter().map(|e| e.name).all_unique());
        assert!(registry.filters.iter().map(|e| e.name).all_unique());
        assert!(registry.solvers.iter().map(|e| e.name).all_unique());
        assert!(registry.output_proxies.iter().map(|e| e.name).all_unique());
    }

    #[test]
    fn defaults_are_registered() {
        let registry = Registry::global();
        assert!(registry.spawn_input_source("basic_input").is_some());
        assert!(registry.spawn_solver("fixed_order").is_some());
        assert!(registry.spawn_output_proxy("output_all").is_some());
        assert!(registry.spawn_solver("no_such_solver").is_none());
    }

    #[test]
    fn catalog_mentions_every_solver() {
        let registry = Registry::global();
        let catalog = registry.describe_components();
        for entry in &registry.solvers {
            assert!(catalog.contains(entry.name));
        }
    }
}
