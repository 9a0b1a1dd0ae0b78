//! Recursive-descent parser for grouped dot notation.
//!
//! ```text
//! FieldList := Field ( ',' Field )*
//! Field     := NAME ( '.' Field | '(' FieldList ')' )?
//! ```
//!
//! The lexer does the character-level work with `chumsky`; the grammar itself is small enough
//! that a hand-rolled parser over the token slice gives us better control over which span each
//! error points at.
//!
//! Every `.` and `(` takes the parser one level deeper. Nesting is capped at [`MAX_DEPTH`] so
//! the recursion here and in the reducer stays bounded, and so that any notation this module
//! accepts rebuilds into JSON that `serde_json` will read back.

use chumsky::span::SimpleSpan;
use tracing::*;

use crate::error::{Found, GrammarError};
use crate::lexer::{tokenize, Token};
use crate::spanned::Spanned;

/// Deepest nesting of `.` and `(` a notation string may use. The rebuilt JSON is at most
/// `MAX_DEPTH + 3` containers deep, inside `serde_json`'s limit of 128.
pub const MAX_DEPTH: usize = 100;

/// One parsed field of the notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `name`
    Leaf { name: Spanned<String> },
    /// `name.child`
    DotField {
        name: Spanned<String>,
        child: Box<Field>,
    },
    /// `name(child, ...)`, never with an empty child list.
    FieldSet {
        name: Spanned<String>,
        children: Vec<Field>,
    },
}

impl Field {
    pub fn name(&self) -> &Spanned<String> {
        match self {
            Field::Leaf { name } | Field::DotField { name, .. } | Field::FieldSet { name, .. } => {
                name
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Field::Leaf { .. })
    }
}

/// Parses a whole notation string into its top-level field list. Input without any tokens
/// (empty, or only spaces) is an empty list.
#[instrument(level = "trace")]
pub fn parse_fields(src: &str) -> Result<Vec<Field>, GrammarError> {
    let tokens = tokenize(src);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut cursor = Cursor {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        eoi: SimpleSpan::from(src.len()..src.len()),
    };
    let fields = cursor.field_list()?;

    if let Some(token) = cursor.peek() {
        return Err(GrammarError::TrailingInput {
            found: Found::Token(token.val.clone()),
            span: token.span,
        });
    }

    debug!(count = fields.len(), "parsed top-level fields");
    Ok(fields)
}

struct Cursor<'t> {
    tokens: &'t [Spanned<Token>],
    pos: usize,
    /// Number of `.` and `(` the current field sits under.
    depth: usize,
    /// Empty span at the end of the input, used when the tokens run out.
    eoi: SimpleSpan<usize>,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'t Spanned<Token>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Consumes the next token if it is `expected`.
    fn eat(&mut self, expected: &Token) -> Option<&'t Spanned<Token>> {
        match self.peek() {
            Some(token) if token.val == *expected => self.bump(),
            _ => None,
        }
    }

    fn found(&self) -> (Found, SimpleSpan<usize>) {
        match self.peek() {
            Some(token) => (Found::Token(token.val.clone()), token.span),
            None => (Found::EndOfInput, self.eoi),
        }
    }

    fn descend(&mut self, at: SimpleSpan<usize>) -> Result<(), GrammarError> {
        if self.depth >= MAX_DEPTH {
            return Err(GrammarError::TooDeep {
                limit: MAX_DEPTH,
                span: at,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn field_list(&mut self) -> Result<Vec<Field>, GrammarError> {
        let mut fields = vec![self.field()?];
        while self.eat(&Token::Comma).is_some() {
            fields.push(self.field()?);
        }
        Ok(fields)
    }

    fn field(&mut self) -> Result<Field, GrammarError> {
        let name = self.name()?;

        if let Some(dot) = self.eat(&Token::Dot) {
            self.descend(dot.span)?;
            let child = self.field()?;
            self.depth -= 1;
            return Ok(Field::DotField {
                name,
                child: Box::new(child),
            });
        }

        if let Some(open) = self.eat(&Token::Open) {
            self.descend(open.span)?;
            let children = self.field_list()?;
            self.depth -= 1;
            if self.eat(&Token::Close).is_none() {
                let (found, span) = self.found();
                return Err(GrammarError::UnclosedGroup {
                    found,
                    open: open.span,
                    span,
                });
            }
            return Ok(Field::FieldSet { name, children });
        }

        Ok(Field::Leaf { name })
    }

    fn name(&mut self) -> Result<Spanned<String>, GrammarError> {
        match self.peek() {
            Some(Spanned {
                val: Token::Name(name),
                span,
            }) => {
                self.pos += 1;
                Ok(Spanned::new(name.clone(), *span))
            }
            _ => {
                let (found, span) = self.found();
                Err(GrammarError::ExpectedName { found, span })
            }
        }
    }
}
