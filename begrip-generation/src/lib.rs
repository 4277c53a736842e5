pub mod cleaning;
pub mod enhancement;
pub mod feedback;
pub mod monitoring;
pub mod orchestrator;

pub use cleaning::*;
pub use enhancement::*;
pub use feedback::*;
pub use monitoring::*;
pub use orchestrator::*;
