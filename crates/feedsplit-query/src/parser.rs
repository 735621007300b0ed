//! Query parser
//!
//! Grammar (commas are insignificant separators, as in GraphQL):
//!
//! ```text
//! document      := definition* EOF
//! definition    := operation | fragment
//! operation     := "query" NAME? selection_set | selection_set
//! fragment      := "fragment" NAME "on" NAME directive* selection_set
//! selection_set := "{" selection* "}"
//! selection     := "..." NAME directive* | NAME directive* selection_set?
//! directive     := "@" NAME ( "(" argument* ")" )?
//! argument      := NAME ":" ( STRING | NAME )
//! ```
//!
//! Parsing runs over the token stream from `lexer::tokenize`. Once a
//! construct has been recognized by its first token, any later mismatch is a
//! cut error carrying what was expected; it is reported against the token
//! the parser stopped at.

use winnow::combinator::{cut_err, dispatch, fail, opt, peek, repeat};
use winnow::error::{ContextError, ErrMode, ParseError};
use winnow::prelude::*;
use winnow::token::any;

use crate::ast::{
    Argument, Directive, Document, Field, FragmentDef, FragmentSpread, Operation, Selection,
    SelectionSet, Value,
};
use crate::error::QueryError;
use crate::lexer::tokenize;
use crate::token::{Pos, Token, TokenKind};

/// Deepest allowed nesting of selection sets
pub const MAX_DEPTH: usize = 64;

type Tokens<'t> = &'t [Token];

type Error = ErrMode<ContextError<Failure>>;

type PResult<O> = ModalResult<O, ContextError<Failure>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Expected(&'static str),
    TooDeep,
}

enum Definition {
    Operation(Operation),
    Fragment(FragmentDef),
}

/// Parse a complete query document
pub fn parse(input: &str) -> Result<Document, QueryError> {
    let tokens = tokenize(input)?;
    let definitions = document
        .parse(tokens.as_slice())
        .map_err(|err| syntax_error(&tokens, &err))?;
    assemble(definitions)
}

/// One operation plus uniquely named fragments
fn assemble(definitions: Vec<Definition>) -> Result<Document, QueryError> {
    let mut operation: Option<Operation> = None;
    let mut fragments: Vec<FragmentDef> = Vec::new();

    for definition in definitions {
        match definition {
            Definition::Operation(parsed) => {
                if operation.is_some() {
                    return Err(QueryError::DuplicateOperation { pos: parsed.pos });
                }
                operation = Some(parsed);
            }
            Definition::Fragment(fragment) => {
                if fragments.iter().any(|f| f.name == fragment.name) {
                    return Err(QueryError::DuplicateFragment {
                        name: fragment.name,
                        pos: fragment.pos,
                    });
                }
                fragments.push(fragment);
            }
        }
    }

    let operation = operation.ok_or(QueryError::MissingOperation)?;
    Ok(Document {
        operation,
        fragments,
    })
}

fn syntax_error(
    tokens: &[Token],
    err: &ParseError<Tokens<'_>, ContextError<Failure>>,
) -> QueryError {
    let stopped_at = tokens.get(err.offset()).or(tokens.last());
    let pos = stopped_at.map(|token| token.pos).unwrap_or_default();
    let found = stopped_at.map_or_else(
        || TokenKind::Eof.to_string(),
        |token| token.kind.to_string(),
    );
    match err.inner().context().next() {
        Some(Failure::TooDeep) => QueryError::TooDeep { pos },
        Some(Failure::Expected(expected)) => QueryError::Unexpected {
            expected: expected.to_string(),
            found,
            pos,
        },
        None => QueryError::Unexpected {
            expected: TokenKind::Eof.to_string(),
            found,
            pos,
        },
    }
}

fn document(input: &mut Tokens<'_>) -> PResult<Vec<Definition>> {
    let definitions = repeat(0.., definition).parse_next(input)?;
    commas(input)?;
    expect(TokenKind::Eof, "end of input").parse_next(input)?;
    Ok(definitions)
}

fn definition(input: &mut Tokens<'_>) -> PResult<Definition> {
    commas(input)?;
    dispatch! {peek(any).map(|token: Token| token.kind);
        TokenKind::Query | TokenKind::LBrace => operation.map(Definition::Operation),
        TokenKind::Fragment => fragment.map(Definition::Fragment),
        TokenKind::Eof => fail::<_, Definition, _>,
        _ => cut_err(
            fail::<_, Definition, _>.context(Failure::Expected("'query', 'fragment' or '{'")),
        ),
    }
    .parse_next(input)
}

fn operation(input: &mut Tokens<'_>) -> PResult<Operation> {
    let pos = here(input)?;
    let name = match opt(token(TokenKind::Query)).parse_next(input)? {
        Some(_) => opt(ident).parse_next(input)?,
        None => None,
    };
    let selection_set = selection_set(input, 1)?;
    Ok(Operation {
        name,
        selection_set,
        pos,
    })
}

fn fragment(input: &mut Tokens<'_>) -> PResult<FragmentDef> {
    let pos = expect(TokenKind::Fragment, "'fragment'").parse_next(input)?.pos;
    let name = fragment_name(input)?;
    expect(TokenKind::On, "'on'").parse_next(input)?;
    let (type_condition, _) = required_name(input)?;
    let directives = directives(input)?;
    let selection_set = selection_set(input, 1)?;
    Ok(FragmentDef {
        name,
        type_condition,
        directives,
        selection_set,
        pos,
    })
}

fn selection_set(input: &mut Tokens<'_>, depth: usize) -> PResult<SelectionSet> {
    if depth > MAX_DEPTH {
        return cut_err(fail::<_, SelectionSet, _>.context(Failure::TooDeep)).parse_next(input);
    }
    expect(TokenKind::LBrace, "'{'").parse_next(input)?;

    let mut selections = Vec::new();
    loop {
        commas(input)?;
        if opt(token(TokenKind::RBrace)).parse_next(input)?.is_some() {
            break;
        }
        selections.push(selection(input, depth)?);
    }
    Ok(SelectionSet { selections })
}

fn selection(input: &mut Tokens<'_>, depth: usize) -> PResult<Selection> {
    if at(input, &TokenKind::Spread) {
        return spread.map(Selection::Spread).parse_next(input);
    }
    if input.first().is_some_and(|token| token.kind.as_name().is_some()) {
        return field(input, depth).map(Selection::Field);
    }
    cut_err(fail::<_, Selection, _>.context(Failure::Expected("a field, '...' or '}'")))
        .parse_next(input)
}

fn spread(input: &mut Tokens<'_>) -> PResult<FragmentSpread> {
    let pos = expect(TokenKind::Spread, "'...'").parse_next(input)?.pos;
    let name = fragment_name(input)?;
    let directives = directives(input)?;
    Ok(FragmentSpread {
        name,
        directives,
        pos,
    })
}

fn field(input: &mut Tokens<'_>, depth: usize) -> PResult<Field> {
    let (name, pos) = required_name(input)?;
    let directives = directives(input)?;
    let selection_set = if at(input, &TokenKind::LBrace) {
        Some(selection_set(input, depth + 1)?)
    } else {
        None
    };
    Ok(Field {
        name,
        directives,
        selection_set,
        pos,
    })
}

fn directives(input: &mut Tokens<'_>) -> PResult<Vec<Directive>> {
    repeat(0.., directive).parse_next(input)
}

fn directive(input: &mut Tokens<'_>) -> PResult<Directive> {
    let pos = token(TokenKind::At).parse_next(input)?.pos;
    let (name, _) = required_name(input)?;
    let arguments = if at(input, &TokenKind::LParen) {
        arguments(input)?
    } else {
        Vec::new()
    };
    Ok(Directive {
        name,
        arguments,
        pos,
    })
}

fn arguments(input: &mut Tokens<'_>) -> PResult<Vec<Argument>> {
    expect(TokenKind::LParen, "'('").parse_next(input)?;

    let mut arguments = Vec::new();
    loop {
        commas(input)?;
        if opt(token(TokenKind::RParen)).parse_next(input)?.is_some() {
            break;
        }
        let (name, _) = required_name(input)?;
        expect(TokenKind::Colon, "':'").parse_next(input)?;
        let value = argument_value(input)?;
        arguments.push(Argument { name, value });
    }
    Ok(arguments)
}

fn argument_value(input: &mut Tokens<'_>) -> PResult<Value> {
    cut_err(
        any.verify_map(|token: Token| match token.kind {
            TokenKind::Str(value) => Some(Value::String(value)),
            kind => kind.as_name().map(|name| Value::Name(name.to_string())),
        })
        .context(Failure::Expected("a string or name")),
    )
    .parse_next(input)
}

fn fragment_name(input: &mut Tokens<'_>) -> PResult<String> {
    cut_err(ident.context(Failure::Expected("a fragment name"))).parse_next(input)
}

/// An identifier proper; keywords are not accepted
fn ident(input: &mut Tokens<'_>) -> PResult<String> {
    any.verify_map(|token: Token| match token.kind {
        TokenKind::Ident(name) => Some(name),
        _ => None,
    })
    .parse_next(input)
}

/// Any name, keywords included
fn required_name(input: &mut Tokens<'_>) -> PResult<(String, Pos)> {
    cut_err(
        any.verify_map(|token: Token| {
            let name = token.kind.as_name()?.to_string();
            Some((name, token.pos))
        })
        .context(Failure::Expected("a name")),
    )
    .parse_next(input)
}

fn commas(input: &mut Tokens<'_>) -> PResult<()> {
    repeat(0.., token(TokenKind::Comma).void()).parse_next(input)
}

/// The next token if it is `kind`; backtracks otherwise
fn token<'t>(kind: TokenKind) -> impl Parser<Tokens<'t>, Token, Error> {
    any.verify(move |token: &Token| token.kind == kind)
}

/// The next token, which must be `kind`
fn expect<'t>(kind: TokenKind, expected: &'static str) -> impl Parser<Tokens<'t>, Token, Error> {
    cut_err(token(kind).context(Failure::Expected(expected)))
}

fn at(input: &Tokens<'_>, kind: &TokenKind) -> bool {
    input.first().is_some_and(|token| &token.kind == kind)
}

fn here(input: &mut Tokens<'_>) -> PResult<Pos> {
    peek(any).map(|token: Token| token.pos).parse_next(input)
}
