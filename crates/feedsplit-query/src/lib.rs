//! feedsplit-query: the feed query language
//!
//! A small GraphQL-flavoured front end built on `winnow`: lexer, parser and AST, plus
//! extraction of the `@push(module: ...)` hints a query attaches to its
//! fragment spreads.

pub mod ast;
pub mod error;
pub mod hints;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Document;
pub use error::QueryError;
pub use hints::{ModuleHint, module_hints};
pub use parser::{MAX_DEPTH, parse};
pub use token::{Pos, Token, TokenKind};
