use crate::{
    components::{ArgStream, Configurable, InputSource, OutputProxy, PreprocessFilter, Solver},
    errors::{ConfigError, Result},
    registry::Registry,
    utils::rng,
};

/// Everything a run needs, assembled from the command line.
pub struct SolverContext {
    pub input_source: Box<dyn InputSource>,
    pub preprocess_filters: Vec<Box<dyn PreprocessFilter>>,
    pub solver: Box<dyn Solver>,
    pub output_proxy: Box<dyn OutputProxy>,
    /// Human-readable summary of the selected components, for the log
    pub summary: String,
}

const DEFAULT_INPUT_SOURCE: &str = "basic_input";
const DEFAULT_SOLVER: &str = "fixed_order";
const DEFAULT_OUTPUT_PROXY: &str = "output_all";

/// A token opens a new top-level directive (and thereby ends the
/// sub-argument run of the previous component).
fn is_root_argument(arg: &str) -> bool {
    arg == "-seed"
        || arg == "-h"
        || arg == "-help"
        || ["-I", "-S", "-F", "-O"].iter().any(|p| arg.starts_with(p))
}

/// Parses the directive grammar: `-I/-F/-S/-O <name> <sub-args…>` in any
/// order, plus `-seed <uint>` and `-h`/`-help`. Returns `Ok(None)` when
/// help was requested and no run should happen.
pub fn parse_arguments(args: &[String]) -> Result<Option<SolverContext>> {
    let registry = Registry::global();

    let mut input_source: Option<(String, Box<dyn InputSource>)> = None;
    let mut solver: Option<(String, Box<dyn Solver>)> = None;
    let mut output_proxy: Option<(String, Box<dyn OutputProxy>)> = None;
    let mut filters: Vec<(String, Box<dyn PreprocessFilter>)> = Vec::new();

    fn next_token<'t>(args: &'t [String], cursor: &mut usize) -> Result<&'t str> {
        let token = args
            .get(*cursor)
            .map(|s| s.as_str())
            .ok_or_else(|| ConfigError::MissingParameter("too few arguments".into()))?;
        *cursor += 1;
        Ok(token)
    }

    let mut cursor = 0;
    while cursor < args.len() {
        let arg = next_token(args, &mut cursor)?;

        if arg == "-seed" {
            let token = next_token(args, &mut cursor)?;
            let seed = token.parse().map_err(|_| {
                ConfigError::MissingParameter(format!(
                    "expected a non-negative integer seed, not \"{token}\""
                ))
            })?;
            rng::set_random_seed(seed);
            continue;
        }
        if arg == "-h" || arg == "-help" {
            print!("{}", registry.describe_components());
            return Ok(None);
        }

        let kind = if arg.starts_with("-I") {
            "input source"
        } else if arg.starts_with("-S") {
            "solver"
        } else if arg.starts_with("-F") {
            "preprocess filter"
        } else if arg.starts_with("-O") {
            "output proxy"
        } else {
            return Err(ConfigError::InvalidArgument(arg.to_owned()));
        };

        let name = next_token(args, &mut cursor)?.to_owned();

        // everything up to the next root argument belongs to the component
        let sub_start = cursor;
        while cursor < args.len() && !is_root_argument(&args[cursor]) {
            cursor += 1;
        }
        let sub_args = &args[sub_start..cursor];
        let mut stream = ArgStream::new(sub_args);

        match kind {
            "input source" => {
                if input_source.is_some() {
                    return Err(ConfigError::DuplicateComponent {
                        kind: "input source",
                        name,
                    });
                }
                let mut component = registry.spawn_input_source(&name).ok_or_else(|| {
                    ConfigError::UnknownComponent {
                        kind: "input source",
                        name: name.clone(),
                    }
                })?;
                component.configure(&mut stream)?;
                input_source = Some((name, component));
            }
            "solver" => {
                if solver.is_some() {
                    return Err(ConfigError::DuplicateComponent {
                        kind: "solver",
                        name,
                    });
                }
                let mut component = registry.spawn_solver(&name).ok_or_else(|| {
                    ConfigError::UnknownComponent {
                        kind: "solver",
                        name: name.clone(),
                    }
                })?;
                component.configure(&mut stream)?;
                solver = Some((name, component));
            }
            "preprocess filter" => {
                let mut component = registry.spawn_preprocess_filter(&name).ok_or_else(|| {
                    ConfigError::UnknownComponent {
                        kind: "preprocess filter",
                        name: name.clone(),
                    }
                })?;
                component.configure(&mut stream)?;
                filters.push((name, component));
            }
            _ => {
                if output_proxy.is_some() {
                    return Err(ConfigError::DuplicateComponent {
                        kind: "output proxy",
                        name,
                    });
                }
                let mut component = registry.spawn_output_proxy(&name).ok_or_else(|| {
                    ConfigError::UnknownComponent {
                        kind: "output proxy",
                        name: name.clone(),
                    }
                })?;
                component.configure(&mut stream)?;
                output_proxy = Some((name, component));
            }
        }
    }

    let spawn_default = |kind: &'static str, name: &str| ConfigError::UnknownComponent {
        kind,
        name: name.to_owned(),
    };

    let (input_name, input_source) = match input_source {
        Some(pair) => pair,
        None => (
            DEFAULT_INPUT_SOURCE.to_owned(),
            registry
                .spawn_input_source(DEFAULT_INPUT_SOURCE)
                .ok_or_else(|| spawn_default("input source", DEFAULT_INPUT_SOURCE))?,
        ),
    };
    let (solver_name, solver) = match solver {
        Some(pair) => pair,
        None => (
            DEFAULT_SOLVER.to_owned(),
            registry
                .spawn_solver(DEFAULT_SOLVER)
                .ok_or_else(|| spawn_default("solver", DEFAULT_SOLVER))?,
        ),
    };
    let (output_name, output_proxy) = match output_proxy {
        Some(pair) => pair,
        None => (
            DEFAULT_OUTPUT_PROXY.to_owned(),
            registry
                .spawn_output_proxy(DEFAULT_OUTPUT_PROXY)
                .ok_or_else(|| spawn_default("output proxy", DEFAULT_OUTPUT_PROXY))?,
        ),
    };

    let mut summary = format!("input source: {input_name}");
    if !filters.is_empty() {
        summary.push_str(&format!(
            " | filters: {}",
            filters
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    summary.push_str(&format!(" | solver: {solver_name} | output: {output_name}"));

    Ok(Some(SolverContext {
        input_source,
        preprocess_filters: filters.into_iter().map(|(_, f)| f).collect(),
        solver,
        output_proxy,
        summary,
    }))
}
