//! Text to declarations: normalization, tokenization, scanning and field
//! extraction.

pub mod fields;
pub mod imports;
pub mod lexer;
pub mod normalize;
pub mod scanner;

pub use fields::FieldReader;
pub use normalize::normalize;
pub use scanner::{Declaration, ScanOutput, scan};
