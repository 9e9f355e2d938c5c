use std::error::Error;

use thiserror::Error;

use crate::graph::Node;

/// Errors raised while assembling a run: bad command lines, unknown
/// components, out-of-range vertices, malformed graph input. They are
/// reported to the log and the process exits without running the solver.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown {kind} \"{name}\"")]
    UnknownComponent { kind: &'static str, name: String },

    #[error("duplicate {kind} \"{name}\"")]
    DuplicateComponent { kind: &'static str, name: String },

    #[error("invalid argument \"{0}\"")]
    InvalidArgument(String),

    #[error("{0}")]
    MissingParameter(String),

    #[error("vertex index {0} is invalid")]
    InvalidVertex(Node),

    #[error("graph with too many vertices ({0})")]
    TooManyVertices(usize),

    #[error("vertex degree {0} out of range")]
    DegreeOutOfRange(usize),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> std::result::Result<(), E>;
}
