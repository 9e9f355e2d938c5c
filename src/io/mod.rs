pub mod graph_text;

pub use graph_text::*;
