pub mod engine;

pub use engine::{PREVIEW_CHARS, SearchEngine, search};
