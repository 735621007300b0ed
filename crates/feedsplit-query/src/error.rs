//! Query parse errors

use thiserror::Error;

use crate::token::Pos;

/// Errors produced while lexing or parsing a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A character that cannot start any token
    #[error("{pos}: illegal character {ch:?}")]
    IllegalChar { ch: char, pos: Pos },

    /// A string literal without its closing quote
    #[error("{pos}: unterminated string")]
    UnterminatedString { pos: Pos },

    /// An escape sequence this lexer does not understand
    #[error("{pos}: invalid escape '\\{ch}'")]
    InvalidEscape { ch: char, pos: Pos },

    /// The parser wanted one thing and found another
    #[error("{pos}: expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        pos: Pos,
    },

    /// Selection sets nested beyond `MAX_DEPTH`
    #[error("{pos}: selections nested more than {} levels deep", crate::parser::MAX_DEPTH)]
    TooDeep { pos: Pos },

    /// The document has no `query` operation
    #[error("document has no query operation")]
    MissingOperation,

    /// The document has more than one operation
    #[error("{pos}: only one query operation is allowed")]
    DuplicateOperation { pos: Pos },

    /// Two fragments share a name
    #[error("{pos}: fragment '{name}' is defined more than once")]
    DuplicateFragment { name: String, pos: Pos },
}
