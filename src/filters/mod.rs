pub mod renumber;

use crate::{
    components::{ArgStream, Configurable, DominationInstance, PreprocessFilter},
    errors::{ConfigError, Result},
    graph::{GraphNodeOrder, Node},
    io::write_graph,
};

pub use renumber::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForceTarget {
    In,
    Out,
}

/// Adds user-chosen vertices to the force-in or force-out set of every
/// instance. The vertex indices are the filter's sub-arguments.
pub struct ForceFilter {
    vertices: Vec<Node>,
    target: ForceTarget,
}

impl ForceFilter {
    pub fn force_in() -> Self {
        Self {
            vertices: Vec::new(),
            target: ForceTarget::In,
        }
    }

    pub fn force_out() -> Self {
        Self {
            vertices: Vec::new(),
            target: ForceTarget::Out,
        }
    }
}

impl Configurable for ForceFilter {
    fn accept_argument(&mut self, arg: &str, _args: &mut ArgStream) -> Result<bool> {
        match arg.parse() {
            Ok(v) => {
                self.vertices.push(v);
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

impl PreprocessFilter for ForceFilter {
    fn process(&mut self, inst: &mut DominationInstance) -> Result<()> {
        let n = inst.graph.number_of_nodes();
        let set = match self.target {
            ForceTarget::In => &mut inst.force_in,
            ForceTarget::Out => &mut inst.force_out,
        };

        for &v in &self.vertices {
            if v >= n {
                return Err(ConfigError::InvalidVertex(v));
            }
            if !set.contains(v) {
                set.add(v);
            }
        }
        Ok(())
    }
}

/// Dumps the current graph to the log stream.
#[derive(Default)]
pub struct PrintGraphFilter;

impl Configurable for PrintGraphFilter {}

impl PreprocessFilter for PrintGraphFilter {
    fn process(&mut self, inst: &mut DominationInstance) -> Result<()> {
        let mut buf = Vec::new();
        write_graph(&mut buf, &inst.graph).map_err(|e| ConfigError::Other(e.to_string()))?;
        log::info!("{}", String::from_utf8_lossy(&buf));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{AdjArray, GraphNew};

    fn configured(mut filter: ForceFilter, verts: &[&str]) -> ForceFilter {
        let args: Vec<String> = verts.iter().map(|s| s.to_string()).collect();
        filter.configure(&mut ArgStream::new(&args)).unwrap();
        filter
    }

    #[test]
    fn force_in_deduplicates() {
        let mut filter = configured(ForceFilter::force_in(), &["1", "2", "1"]);
        let mut inst = DominationInstance::new(AdjArray::new(4));
        filter.process(&mut inst).unwrap();

        assert_eq!(inst.force_in.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert!(inst.force_out.is_empty());
    }

    #[test]
    fn out_of_range_vertex() {
        let mut filter = configured(ForceFilter::force_out(), &["7"]);
        let mut inst = DominationInstance::new(AdjArray::new(4));
        assert!(filter.process(&mut inst).is_err());
    }

    #[test]
    fn non_integer_argument_rejected() {
        let mut filter = ForceFilter::force_in();
        let args: Vec<String> = vec!["bogus".into()];
        assert!(filter.configure(&mut ArgStream::new(&args)).is_err());
    }
}
