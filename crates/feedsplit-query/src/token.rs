//! Query tokens

use std::fmt;

/// Kinds of token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `@`
    At,
    /// `...`
    Spread,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Colon,
    Comma,
    Ident(String),
    /// String literal with escapes already decoded
    Str(String),
    Query,
    Fragment,
    On,
    Eof,
}

impl TokenKind {
    /// Map an identifier to its keyword token, if it is one
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "query" => Some(TokenKind::Query),
            "fragment" => Some(TokenKind::Fragment),
            "on" => Some(TokenKind::On),
            _ => None,
        }
    }

    /// Identifier text, including keywords used where a name is expected
    pub fn as_name(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            TokenKind::Query => Some("query"),
            TokenKind::Fragment => Some("fragment"),
            TokenKind::On => Some("on"),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::At => f.write_str("'@'"),
            TokenKind::Spread => f.write_str("'...'"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Str(value) => write!(f, "string {:?}", value),
            TokenKind::Query => f.write_str("'query'"),
            TokenKind::Fragment => f.write_str("'fragment'"),
            TokenKind::On => f.write_str("'on'"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// 1-based source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token and where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}
