//! Pattern lexer splitting step patterns into literals, placeholders and
//! stray braces.

use crate::errors::PatternError;

use super::placeholder::{Placeholder, parse_placeholder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Placeholder(Placeholder),
    OpenBrace(usize),
    CloseBrace(usize),
}

#[derive(Default)]
struct Tokens {
    tokens: Vec<Token>,
    literal: String,
}

impl Tokens {
    fn flush(&mut self) {
        if !self.literal.is_empty() {
            self.tokens
                .push(Token::Literal(std::mem::take(&mut self.literal)));
        }
    }

    fn push(&mut self, token: Token) {
        self.flush();
        self.tokens.push(token);
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush();
        self.tokens
    }
}

fn starts_placeholder(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Tokenise `pattern`.
///
/// A backslash escapes the following character, `{{` and `}}` are literal
/// braces, and `{` followed by a letter or underscore opens a placeholder.
/// Any other brace is reported as a stray token so the compiler can check
/// balancing.
pub(crate) fn lex_pattern(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut out = Tokens::default();
    let mut chars = pattern.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        match ch {
            '\\' => {
                let escaped = chars.next().map_or('\\', |(_, c)| c);
                out.literal.push(escaped);
            }
            '{' | '}' if next == Some(ch) => {
                chars.next();
                out.literal.push(ch);
            }
            '{' if next.is_some_and(starts_placeholder) => {
                let (end, placeholder) = parse_placeholder(pattern, pos)?;
                out.push(Token::Placeholder(placeholder));
                while chars.next_if(|&(index, _)| index < end).is_some() {}
            }
            '{' => out.push(Token::OpenBrace(pos)),
            '}' => out.push(Token::CloseBrace(pos)),
            _ => out.literal.push(ch),
        }
    }

    Ok(out.finish())
}
