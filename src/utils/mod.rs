pub mod rng;
pub mod vertex_set;

pub use rng::*;
pub use vertex_set::*;
