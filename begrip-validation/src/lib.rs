pub mod rules;
pub mod orchestrator;

pub use rules::*;
pub use orchestrator::*;
