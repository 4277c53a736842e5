pub mod context;
pub mod rules;
pub mod modules;
pub mod orchestrator;

pub use context::*;
pub use rules::*;
pub use modules::*;
pub use orchestrator::*;
