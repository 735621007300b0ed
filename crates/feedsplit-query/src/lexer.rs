//! Query lexer
//!
//! Whitespace and `#` comments are skipped. Identifiers are
//! `[A-Za-z_][A-Za-z0-9_]*`; `query`, `fragment` and `on` are keywords.
//! The token stream always ends with a single `Eof`.

use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::{Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::LocatingSlice;

use crate::error::QueryError;
use crate::token::{Pos, Token, TokenKind};

type Input<'i> = LocatingSlice<&'i str>;

type LexResult<O> = ModalResult<O, ContextError<LexFault>>;

/// Failures inside a token, with the byte offset they are reported at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexFault {
    UnterminatedString { offset: usize },
    InvalidEscape { ch: char, offset: usize },
}

/// Split `source` into tokens
pub fn tokenize(source: &str) -> Result<Vec<Token>, QueryError> {
    let lines = LineIndex::new(source);
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();

    loop {
        skip_trivia(&mut input);
        let pos = lines.pos(input.current_token_start());
        let Some(next) = input.peek_token() else {
            tokens.push(Token {
                kind: TokenKind::Eof,
                pos,
            });
            return Ok(tokens);
        };

        match token_kind(&mut input) {
            Ok(kind) => tokens.push(Token { kind, pos }),
            Err(ErrMode::Cut(err)) => {
                return Err(match err.context().next() {
                    Some(LexFault::InvalidEscape { ch, offset }) => QueryError::InvalidEscape {
                        ch: *ch,
                        pos: lines.pos(*offset),
                    },
                    Some(LexFault::UnterminatedString { offset }) => {
                        QueryError::UnterminatedString {
                            pos: lines.pos(*offset),
                        }
                    }
                    None => QueryError::IllegalChar { ch: next, pos },
                });
            }
            Err(_) => return Err(QueryError::IllegalChar { ch: next, pos }),
        }
    }
}

fn skip_trivia(input: &mut Input<'_>) {
    while trivia(input).is_ok() {}
}

/// One run of blanks or one `#` comment
fn trivia(input: &mut Input<'_>) -> LexResult<()> {
    alt((
        take_while(1.., is_blank).void(),
        ('#', take_till(0.., '\n')).void(),
    ))
    .parse_next(input)
}

fn token_kind(input: &mut Input<'_>) -> LexResult<TokenKind> {
    alt((
        "...".value(TokenKind::Spread),
        '@'.value(TokenKind::At),
        '{'.value(TokenKind::LBrace),
        '}'.value(TokenKind::RBrace),
        '('.value(TokenKind::LParen),
        ')'.value(TokenKind::RParen),
        ':'.value(TokenKind::Colon),
        ','.value(TokenKind::Comma),
        string_literal.map(TokenKind::Str),
        name.map(|name: &str| {
            TokenKind::keyword(name).unwrap_or_else(|| TokenKind::Ident(name.to_string()))
        }),
    ))
    .parse_next(input)
}

fn name<'i>(input: &mut Input<'i>) -> LexResult<&'i str> {
    (one_of(is_name_start), take_while(0.., is_name_continue))
        .take()
        .parse_next(input)
}

/// A double-quoted string on one line, escapes decoded
fn string_literal(input: &mut Input<'_>) -> LexResult<String> {
    let start = input.current_token_start();
    '"'.parse_next(input)?;

    let mut value = String::new();
    loop {
        let chunk: &str = take_till(0.., ['"', '\\', '\n']).parse_next(input)?;
        value.push_str(chunk);

        let offset = input.current_token_start();
        match opt(any).parse_next(input)? {
            Some('"') => return Ok(value),
            Some('\\') => match opt(any).parse_next(input)? {
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some('/') => value.push('/'),
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some('\n') | None => {
                    return Err(fault(LexFault::UnterminatedString { offset: start }));
                }
                Some(ch) => return Err(fault(LexFault::InvalidEscape { ch, offset })),
            },
            _ => return Err(fault(LexFault::UnterminatedString { offset: start })),
        }
    }
}

fn fault(fault: LexFault) -> ErrMode<ContextError<LexFault>> {
    let mut err = ContextError::new();
    err.push(fault);
    ErrMode::Cut(err)
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{feff}')
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_name_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Byte offset to 1-based line and column (columns count chars)
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    fn pos(&self, offset: usize) -> Pos {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        Pos {
            line,
            column: self.source[line_start..offset].chars().count() + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("@ ... { } ( ) : ,"),
            vec![
                TokenKind::At,
                TokenKind::Spread,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("query fragment on __typename Post_PhotoPost2 onward"),
            vec![
                TokenKind::Query,
                TokenKind::Fragment,
                TokenKind::On,
                TokenKind::Ident("__typename".to_string()),
                TokenKind::Ident("Post_PhotoPost2".to_string()),
                TokenKind::Ident("onward".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_with_escapes() {
        assert_eq!(
            kinds(r#""PhotoPost.js" "a\"b\\c""#),
            vec![
                TokenKind::Str("PhotoPost.js".to_string()),
                TokenKind::Str("a\"b\\c".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spread_without_space() {
        assert_eq!(
            kinds("...Post_TextPost"),
            vec![
                TokenKind::Spread,
                TokenKind::Ident("Post_TextPost".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("# leading\nposts # trailing\n"),
            vec![TokenKind::Ident("posts".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("query {\n  posts\n}").unwrap();
        assert_eq!(tokens[0].pos, Pos { line: 1, column: 1 });
        assert_eq!(tokens[1].pos, Pos { line: 1, column: 7 });
        assert_eq!(tokens[2].pos, Pos { line: 2, column: 3 });
        assert_eq!(tokens[3].pos, Pos { line: 3, column: 1 });
        assert_eq!(tokens[4].kind, TokenKind::Eof);
        assert_eq!(tokens[4].pos, Pos { line: 3, column: 2 });
    }

    #[test]
    fn test_columns_count_chars() {
        let tokens = tokenize("# é\n  \"ü\" x").unwrap();
        assert_eq!(tokens[1].pos, Pos { line: 2, column: 7 });
    }

    #[test]
    fn test_two_dots_is_illegal() {
        let err = tokenize("..x").unwrap_err();
        assert_eq!(
            err,
            QueryError::IllegalChar {
                ch: '.',
                pos: Pos { line: 1, column: 1 }
            }
        );
    }

    #[test]
    fn test_illegal_char_position() {
        let err = tokenize("posts\n  $ more").unwrap_err();
        assert_eq!(
            err,
            QueryError::IllegalChar {
                ch: '$',
                pos: Pos { line: 2, column: 3 }
            }
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("  \"open").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnterminatedString {
                pos: Pos { line: 1, column: 3 }
            }
        );
    }

    #[test]
    fn test_string_stops_at_newline() {
        let err = tokenize("\"a\nb\"").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnterminatedString {
                pos: Pos { line: 1, column: 1 }
            }
        );
    }

    #[test]
    fn test_invalid_escape() {
        let err = tokenize(r#"x "ab\q""#).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidEscape {
                ch: 'q',
                pos: Pos { line: 1, column: 6 }
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  # only a comment"), vec![TokenKind::Eof]);
    }
}
