pub mod models;
pub mod protocol;
pub mod store;
pub mod registrar;
pub mod errors;

pub use models::*;
pub use protocol::*;
pub use store::*;
pub use registrar::*;
pub use errors::*;
