//! Whitespace token cursor shared by the model and experiment readers.

use std::str::{FromStr, SplitWhitespace};

use crate::error::{HmmError, Result};

/// Sequential reader over whitespace-separated tokens.
pub(crate) struct TokenCursor<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            inner: input.split_whitespace(),
            position: 0,
        }
    }

    /// Next raw token, or `UnexpectedEof` naming what was wanted.
    pub(crate) fn next_token(&mut self, expected: &'static str) -> Result<&'a str> {
        let token = self
            .inner
            .next()
            .ok_or(HmmError::UnexpectedEof { expected })?;
        self.position += 1;
        Ok(token)
    }

    /// Next token parsed as `T`.
    pub(crate) fn parse_next<T: FromStr>(&mut self, expected: &'static str) -> Result<T> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| HmmError::InvalidToken {
            token: token.to_string(),
            expected,
            position: self.position - 1,
        })
    }
}

/// Number of symbols the text formats can name (`a`..`z`).
pub const MAX_ALPHABET_SIZE: usize = 26;

/// Map a single-letter symbol `a`..`z` to its index `0`..`25`.
pub fn symbol_index(symbol: &str) -> Result<usize> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='z'), None) => Ok(c as usize - 'a' as usize),
        _ => Err(HmmError::InvalidSymbol(symbol.to_string())),
    }
}
