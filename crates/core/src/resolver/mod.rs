//! Symbolic OID resolution.

pub mod arcs;
pub mod engine;
pub mod symbols;

pub use arcs::{ArcExpr, ArcToken};
pub use engine::{OidResolver, Resolution, resolve};
pub use symbols::{SymbolTable, WELL_KNOWN_ROOTS};
