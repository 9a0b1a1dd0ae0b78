use std::ops::Range;

use chumsky::span::SimpleSpan;
use thiserror::Error;

use crate::lexer::Token;

/// Everything that can go wrong in a [`flatten`](crate::flatten) or
/// [`unflatten`](crate::unflatten) call. Each call reports the first violation it finds and
/// produces no partial output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed JSON input: {0}")]
    MalformedJson(serde_json::Error),

    /// Well-formed JSON nested past `serde_json`'s recursion limit.
    #[error("JSON input nests too deeply: {0}")]
    JsonTooDeep(serde_json::Error),

    #[error("input must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        // `serde_json` does not expose its error codes, only their messages.
        if e.to_string().starts_with("recursion limit exceeded") {
            Error::JsonTooDeep(e)
        } else {
            Error::MalformedJson(e)
        }
    }
}

impl Error {
    /// The byte range of `src` (the text handed to the failing call) that the error points at.
    pub fn source_range(&self, src: &str) -> Range<usize> {
        match self {
            Error::MalformedJson(e) | Error::JsonTooDeep(e) => {
                let offset = line_column_offset(src, e.line(), e.column());
                let width = src[offset..].chars().next().map_or(0, char::len_utf8);
                offset..offset + width
            }
            Error::NotAnArray { .. } => {
                let trimmed = src.trim_start();
                let start = src.len() - trimmed.len();
                start..start + trimmed.trim_end().len()
            }
            Error::Grammar(e) => e.span().into_range(),
            Error::Conflict(e) => e.span.into_range(),
        }
    }
}

/// `serde_json` reports 1-based lines and byte columns; column 0 means the error sits on the
/// line break itself. The result is snapped back onto a char boundary.
fn line_column_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(src.len());
    while !src.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// The notation text does not match the field grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("expected a name, found {found}")]
    ExpectedName {
        found: Found,
        span: SimpleSpan<usize>,
    },

    #[error("unclosed `(`: expected `,` or `)`, found {found}")]
    UnclosedGroup {
        found: Found,
        open: SimpleSpan<usize>,
        span: SimpleSpan<usize>,
    },

    #[error("expected `,` between fields, found {found}")]
    TrailingInput {
        found: Found,
        span: SimpleSpan<usize>,
    },

    #[error("fields nest deeper than {limit} levels")]
    TooDeep {
        limit: usize,
        span: SimpleSpan<usize>,
    },
}

impl GrammarError {
    pub fn span(&self) -> SimpleSpan<usize> {
        match self {
            GrammarError::ExpectedName { span, .. }
            | GrammarError::UnclosedGroup { span, .. }
            | GrammarError::TrailingInput { span, .. }
            | GrammarError::TooDeep { span, .. } => *span,
        }
    }
}

/// What the parser ran into where it wanted something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Token(Token),
    EndOfInput,
}

impl std::fmt::Display for Found {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Found::Token(token) => write!(f, "{token}"),
            Found::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// A field group names one key twice with values the merge policy cannot combine, e.g.
/// `a(b, b.c)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conflicting values for `{name}` in the same group")]
pub struct ConflictError {
    pub name: String,
    pub span: SimpleSpan<usize>,
}
