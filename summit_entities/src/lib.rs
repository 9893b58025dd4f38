pub mod schema;
pub mod domain;
pub mod error;
pub mod queries;
pub mod prelude;
pub mod mock;

pub use error::EntityError;
