pub mod ea_structure;
pub mod stats;

pub use ea_structure::*;
pub use stats::*;
