pub mod entities;
pub mod errors;
pub mod store;

pub use entities::*;
pub use errors::*;
pub use store::*;
