pub mod link;
pub mod module;
pub mod node;
pub mod oid;
pub mod query;

pub use link::*;
pub use module::*;
pub use node::*;
pub use oid::*;
pub use query::*;
