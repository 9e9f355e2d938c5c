pub use crate::{components::*, errors::*, graph::*, utils::*};
