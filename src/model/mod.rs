pub mod application;
pub mod common;
pub mod ea;
pub mod filter;
pub mod import;
pub mod stats;
pub mod user_context;

pub use application::*;
pub use common::*;
pub use ea::*;
pub use filter::*;
pub use import::*;
pub use stats::*;
pub use user_context::*;
