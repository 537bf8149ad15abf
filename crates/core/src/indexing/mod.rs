pub mod compiler;
pub mod flat;
pub mod forest;

pub use compiler::{ModuleCompiler, parse_module};
pub use flat::{compare_nodes, sort_nodes};
pub use forest::{build_forest, walk};
