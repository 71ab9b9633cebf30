use thiserror::Error;

use crate::NodeKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] specctra_sexpr::ParseError),

    #[error("expected {expected} root with token \"{}\", got {actual}", .expected.head().unwrap_or_default())]
    RootKindMismatch { expected: NodeKind, actual: String },
}

pub type Result<T> = std::result::Result<T, Error>;
