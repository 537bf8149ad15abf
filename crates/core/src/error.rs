use thiserror::Error;

#[derive(Error, Debug)]
pub enum MibscopeError {
    #[error("could not identify a module: no `DEFINITIONS ::= BEGIN` header found")]
    NoModuleHeader,
    #[error("Invalid search pattern: {0}")]
    Pattern(String),
}

pub type Result<T> = std::result::Result<T, MibscopeError>;
