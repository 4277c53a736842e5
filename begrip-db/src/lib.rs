pub mod schema;
pub mod repository;
pub mod voorbeelden;

pub use schema::*;
pub use repository::*;
pub use voorbeelden::*;
