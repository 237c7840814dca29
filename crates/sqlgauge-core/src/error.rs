//! Error types for SQL lexing, parsing, and assessment.
//!
//! # Error Handling Strategy
//!
//! Assessment is all-or-nothing: either the input lexes and parses into a
//! complete statement tree that gets fully scored, or the call fails with a
//! structured error. There is no partial-score mode.
//!
//! - [`LexError`]: the tokenizer hit a character sequence it cannot form a
//!   token from. Always fatal to the current call.
//! - [`ParseError`]: the token stream does not match the supported grammar
//!   subset. Always fatal to the current call.
//! - [`AssessError`]: the public wrapper returned by [`crate::assess`],
//!   holding whichever of the two occurred.
//!
//! Scoring itself is pure arithmetic over a well-formed tree and has no
//! failure modes.

use thiserror::Error;

use crate::token::Token;

/// Source position for an error (1-indexed, like editors report).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Error encountered while tokenizing SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {}, column {}", position.line, position.column)]
    UnexpectedChar {
        ch: char,
        offset: usize,
        position: Position,
    },

    #[error("unterminated string literal starting at line {}, column {}", position.line, position.column)]
    UnterminatedString { offset: usize, position: Position },

    #[error("unterminated quoted identifier starting at line {}, column {}", position.line, position.column)]
    UnterminatedQuotedIdent { offset: usize, position: Position },

    #[error("unterminated block comment starting at line {}, column {}", position.line, position.column)]
    UnterminatedComment { offset: usize, position: Position },
}

impl LexError {
    /// Where in the source the error occurred.
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::UnterminatedString { position, .. }
            | LexError::UnterminatedQuotedIdent { position, .. }
            | LexError::UnterminatedComment { position, .. } => *position,
        }
    }
}

/// Error encountered while parsing a token stream.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at line {}, column {}: {message}", position.line, position.column)]
pub struct ParseError {
    /// Human-readable description, usually "expected X, found Y".
    pub message: String,
    /// Position of the offending token.
    pub position: Position,
    /// Byte offset of the offending token.
    pub offset: usize,
}

impl ParseError {
    /// Builds an "expected X, found Y" error pointing at `found`.
    pub fn expected(what: impl AsRef<str>, found: &Token) -> Self {
        Self {
            message: format!("expected {}, found {}", what.as_ref(), found.kind),
            position: Position::new(found.line, found.col),
            offset: found.offset,
        }
    }

}

/// Error returned by the public assessment entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessError {
    #[error("failed to tokenize SQL: {0}")]
    Lex(#[from] LexError),

    #[error("failed to parse SQL: {0}")]
    Parse(#[from] ParseError),
}

impl AssessError {
    /// Where in the source the underlying error occurred.
    pub fn position(&self) -> Position {
        match self {
            AssessError::Lex(e) => e.position(),
            AssessError::Parse(e) => e.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn token_at(kind: TokenKind, line: usize, col: usize) -> Token {
        Token {
            kind,
            offset: 0,
            line,
            col,
        }
    }

    #[test]
    fn test_lex_error_display() {
        let err = LexError::UnexpectedChar {
            ch: '#',
            offset: 7,
            position: Position::new(1, 8),
        };
        assert_eq!(err.to_string(), "unexpected character '#' at line 1, column 8");
        assert_eq!(err.position(), Position::new(1, 8));
    }

    #[test]
    fn test_parse_error_expected_found() {
        let err = ParseError::expected("FROM", &token_at(TokenKind::Eof, 2, 5));
        assert_eq!(
            err.to_string(),
            "parse error at line 2, column 5: expected FROM, found end of input"
        );
    }

    #[test]
    fn test_assess_error_wraps_both() {
        let lex: AssessError = LexError::UnterminatedString {
            offset: 3,
            position: Position::new(1, 4),
        }
        .into();
        assert!(lex.to_string().starts_with("failed to tokenize SQL:"));
        assert_eq!(lex.position(), Position::new(1, 4));

        let parse: AssessError = ParseError::expected("SELECT", &token_at(TokenKind::Eof, 1, 1)).into();
        assert!(parse.to_string().starts_with("failed to parse SQL:"));
    }

    #[test]
    fn test_error_trait() {
        let err = AssessError::Parse(ParseError {
            message: "boom".into(),
            position: Position::new(1, 1),
            offset: 0,
        });
        let _: &dyn std::error::Error = &err;
    }
}
