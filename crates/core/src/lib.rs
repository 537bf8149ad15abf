//! SMIv2 MIB parsing: text in, resolved OID forest and import index out.
//!
//! The two entry points are [`parse_module`] for a single module and
//! [`link`] for a set of parsed modules. [`registry::ModuleRegistry`] keeps a
//! working set of modules and recomputes links whenever it changes.

pub mod error;
pub mod indexing;
pub mod linker;
pub mod logging;
pub mod parser;
pub mod query;
pub mod registry;
pub mod resolver;

pub use error::{MibscopeError, Result};
pub use indexing::parse_module;
pub use linker::link;
pub use query::search;
pub use registry::{LoadOutcome, LoadReport, ModuleRegistry, SourceText};
