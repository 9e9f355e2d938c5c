use crate::{
    errors::{ConfigError, InvariantCheck, Result},
    graph::{AdjArray, GraphNodeOrder, Node},
    utils::vertex_set::VertexSet,
};

/// One problem to solve: a graph plus the vertices that must respectively
/// must not appear in every reported dominating set.
#[derive(Debug, Clone)]
pub struct DominationInstance {
    pub graph: AdjArray,
    pub force_in: VertexSet,
    pub force_out: VertexSet,
}

impl DominationInstance {
    pub fn new(graph: AdjArray) -> Self {
        let n = graph.number_of_nodes();
        Self {
            graph,
            force_in: VertexSet::new(n),
            force_out: VertexSet::new(n),
        }
    }

    /// Checks that both force sets address existing vertices and do not
    /// overlap. Run after preprocessing, before the solver.
    pub fn validate(&self) -> Result<()> {
        let n = self.graph.number_of_nodes();
        for v in self.force_in.iter().chain(self.force_out.iter()) {
            if v >= n {
                return Err(ConfigError::InvalidVertex(v));
            }
        }
        for v in self.force_in.iter() {
            if self.force_out.contains(v) {
                return Err(ConfigError::Other(format!(
                    "vertex {v} is both forced in and forced out"
                )));
            }
        }
        Ok(())
    }
}

impl InvariantCheck<ConfigError> for DominationInstance {
    fn is_correct(&self) -> Result<()> {
        self.validate()
    }
}

/// Cursor over the sub-argument tokens owned by a single component.
pub struct ArgStream<'a> {
    args: &'a [String],
    cursor: usize,
}

impl<'a> ArgStream<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self { args, cursor: 0 }
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.args.len()
    }

    pub fn next_string(&mut self) -> Result<&'a str> {
        let arg = self
            .args
            .get(self.cursor)
            .ok_or_else(|| ConfigError::MissingParameter("expected another argument".into()))?;
        self.cursor += 1;
        Ok(arg)
    }

    pub fn next_u32(&mut self) -> Result<u32> {
        let arg = self.next_string()?;
        arg.parse().map_err(|_| {
            ConfigError::MissingParameter(format!("expected a non-negative integer, not \"{arg}\""))
        })
    }

    pub fn next_u64(&mut self) -> Result<u64> {
        let arg = self.next_string()?;
        arg.parse().map_err(|_| {
            ConfigError::MissingParameter(format!("expected a non-negative integer, not \"{arg}\""))
        })
    }

    pub fn next_node(&mut self) -> Result<Node> {
        self.next_u32()
    }
}

/// Common argument-handling protocol of all components. A component
/// overrides [`Configurable::accept_argument`] and reports whether it
/// recognized the token; unknown tokens abort configuration.
pub trait Configurable {
    fn accept_argument(&mut self, _arg: &str, _args: &mut ArgStream) -> Result<bool> {
        Ok(false)
    }

    fn configure(&mut self, args: &mut ArgStream) -> Result<()> {
        while args.has_next() {
            let arg = args.next_string()?.to_owned();
            if !self.accept_argument(&arg, args)? {
                return Err(ConfigError::InvalidArgument(arg));
            }
        }
        Ok(())
    }
}

/// Produces instances; `Ok(None)` signals the end of the stream.
pub trait InputSource: Configurable {
    fn read_next(&mut self) -> Result<Option<DominationInstance>>;
}

/// Rewrites an instance in place before the solver sees it.
pub trait PreprocessFilter: Configurable {
    fn process(&mut self, inst: &mut DominationInstance) -> Result<()>;
}

/// Return value of [`OutputProxy::process_set`]: whether the solver should
/// keep searching or finalize without emitting further solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetAction {
    Continue,
    Stop,
}

pub trait OutputProxy: Configurable {
    /// Called once per instance with the unfiltered input graph.
    fn observe_input(&mut self, _graph: &AdjArray) {}

    fn initialize(&mut self, _inst: &DominationInstance) {}

    fn process_set(&mut self, inst: &DominationInstance, dominating_set: &VertexSet) -> SetAction;

    fn finalize(&mut self, _inst: &DominationInstance) {}
}

pub trait Solver: Configurable {
    fn solve(&mut self, inst: &mut DominationInstance, output: &mut dyn OutputProxy) -> Result<()>;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::GraphNew;

    #[test]
    fn arg_stream() {
        let args: Vec<String> = ["-n", "12", "x"].iter().map(|s| s.to_string()).collect();
        let mut stream = ArgStream::new(&args);
        assert_eq!(stream.next_string().unwrap(), "-n");
        assert_eq!(stream.next_u32().unwrap(), 12);
        assert!(stream.next_u32().is_err());
    }

    #[test]
    fn instance_validation() {
        let mut inst = DominationInstance::new(AdjArray::new(3));
        inst.force_in.add(1);
        assert!(inst.validate().is_ok());

        inst.force_out.add(1);
        assert!(inst.validate().is_err());
    }
}
