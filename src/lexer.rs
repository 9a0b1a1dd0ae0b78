//! Lexer for grouped dot notation.

use chumsky::prelude::*;

use crate::spanned::Spanned;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A maximal run of characters other than `.`, `,`, `(`, `)` and space.
    Name(String),
    Dot,
    Comma,
    Open,
    Close,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Name(name) => write!(f, "name `{name}`"),
            Token::Dot => f.write_str("`.`"),
            Token::Comma => f.write_str("`,`"),
            Token::Open => f.write_str("`(`"),
            Token::Close => f.write_str("`)`"),
        }
    }
}

pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Spanned<Token>>, extra::Err<Rich<'a, char>>> {
    let punct = choice((
        just('.').to(Token::Dot),
        just(',').to(Token::Comma),
        just('(').to(Token::Open),
        just(')').to(Token::Close),
    ));

    let name = none_of(".,() ")
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::Name(s.to_string()));

    let token = punct
        .or(name)
        .map_with(|val, e| Spanned {
            span: e.span(),
            val,
        })
        .then_ignore(just(' ').repeated());

    just(' ')
        .repeated()
        .ignore_then(token.repeated().collect::<Vec<_>>())
}

/// Splits notation text into spanned tokens. Every character is either a space, punctuation or
/// part of a name, so this never fails; malformed input is left for the parser to reject.
pub fn tokenize(src: &str) -> Vec<Spanned<Token>> {
    let (tokens, errors) = lexer().parse(src).into_output_errors();
    debug_assert!(errors.is_empty(), "lexer rejected input: {errors:?}");
    tokens.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).into_iter().map(|t| t.val).collect()
    }

    fn name(s: &str) -> Token {
        Token::Name(s.to_string())
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_grouped_notation() {
        assert_eq!(
            kinds("a.b(c, d)"),
            vec![
                name("a"),
                Token::Dot,
                name("b"),
                Token::Open,
                name("c"),
                Token::Comma,
                name("d"),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_spaces_split_names() {
        assert_eq!(kinds("  foo bar "), vec![name("foo"), name("bar")]);
    }

    #[test]
    fn test_other_characters_are_absorbed_into_names() {
        assert_eq!(kinds("x-1:y\t"), vec![name("x-1:y\t")]);
        assert_eq!(kinds("ünï.çødé"), vec![name("ünï"), Token::Dot, name("çødé")]);
    }

    #[test]
    fn test_punctuation_only() {
        assert_eq!(
            kinds(",.()"),
            vec![Token::Comma, Token::Dot, Token::Open, Token::Close]
        );
    }

    #[test]
    fn test_spans_are_byte_ranges() {
        let tokens = tokenize("ab . cd");
        let spans: Vec<_> = tokens.iter().map(|t| t.span.into_range()).collect();
        assert_eq!(spans, vec![0..2, 3..4, 5..7]);
    }
}
