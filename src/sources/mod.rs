pub mod queen;

use std::io::{BufReader, Stdin};

use crate::{
    components::{Configurable, DominationInstance, InputSource},
    errors::Result,
    io::{read_graph, TokenReader},
};

pub use queen::QueenGraphSource;

/// Reads adjacency-list graphs from standard input until the stream is
/// exhausted; each graph becomes one instance with empty force sets.
pub struct BasicInput {
    tokens: TokenReader<BufReader<Stdin>>,
}

impl BasicInput {
    pub fn new() -> Self {
        Self {
            tokens: TokenReader::new(BufReader::new(std::io::stdin())),
        }
    }
}

impl Default for BasicInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Configurable for BasicInput {}

impl InputSource for BasicInput {
    fn read_next(&mut self) -> Result<Option<DominationInstance>> {
        Ok(read_graph(&mut self.tokens)?.map(DominationInstance::new))
    }
}
