//! SQL lexer.
//!
//! Converts SQL text into a flat token vector terminated by a single `Eof`
//! token. Whitespace, `--` line comments, and `/* */` block comments are
//! skipped, never emitted. Keywords match case-insensitively; everything
//! else is preserved as written.

use crate::error::{LexError, Position};
use crate::token::{Keyword, Op, Token, TokenKind};

/// SQL lexer over UTF-8 source bytes.
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;

        let Some(ch) = self.peek() else {
            return Ok(self.token_at(TokenKind::Eof, start, start_line, start_col));
        };

        let kind = match ch {
            b'\'' => self.lex_string()?,
            b'"' => self.lex_quoted_ident()?,
            b'0'..=b'9' => self.lex_number(),
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_word(),

            b'*' => self.single(TokenKind::Star),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b',' => self.single(TokenKind::Comma),
            b'.' => self.single(TokenKind::Dot),
            b';' => self.single(TokenKind::Semicolon),
            b'+' => self.single(TokenKind::Op(Op::Plus)),
            b'-' => self.single(TokenKind::Op(Op::Minus)),
            b'/' => self.single(TokenKind::Op(Op::Slash)),
            b'%' => self.single(TokenKind::Op(Op::Percent)),

            b'=' => {
                self.advance();
                // Accept `==` as a spelling of equality.
                if self.peek() == Some(b'=') {
                    self.advance();
                }
                TokenKind::Op(Op::Eq)
            }
            b'<' => {
                self.advance();
                match self.peek() {
                    Some(b'=') => {
                        self.advance();
                        TokenKind::Op(Op::LtEq)
                    }
                    Some(b'>') => {
                        self.advance();
                        TokenKind::Op(Op::NotEq)
                    }
                    _ => TokenKind::Op(Op::Lt),
                }
            }
            b'>' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Op(Op::GtEq)
                } else {
                    TokenKind::Op(Op::Gt)
                }
            }
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Op(Op::NotEq)
                } else {
                    return Err(LexError::UnexpectedChar {
                        ch: '!',
                        offset: start,
                        position: Position::new(start_line, start_col),
                    });
                }
            }
            b'|' => {
                self.advance();
                if self.peek() == Some(b'|') {
                    self.advance();
                    TokenKind::Op(Op::Concat)
                } else {
                    return Err(LexError::UnexpectedChar {
                        ch: '|',
                        offset: start,
                        position: Position::new(start_line, start_col),
                    });
                }
            }

            other => {
                let ch = self.current_char(other);
                return Err(LexError::UnexpectedChar {
                    ch,
                    offset: start,
                    position: Position::new(start_line, start_col),
                });
            }
        };

        Ok(self.token_at(kind, start, start_line, start_col))
    }

    // ── Scanners ────────────────────────────────────────────────────────

    /// Single-quoted string with `''` as the escape for a literal quote.
    fn lex_string(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        let position = Position::new(self.line, self.col);
        self.advance(); // opening quote

        let mut value = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::UnterminatedString {
                        offset: start,
                        position,
                    })
                }
                Some(b'\'') => {
                    self.advance();
                    if self.peek() == Some(b'\'') {
                        value.push(b'\'');
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(b) => {
                    value.push(b);
                    self.advance();
                }
            }
        }
        Ok(TokenKind::StringLit(
            String::from_utf8_lossy(&value).into_owned(),
        ))
    }

    /// Double-quoted identifier; no escape handling inside.
    fn lex_quoted_ident(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        let position = Position::new(self.line, self.col);
        self.advance(); // opening quote

        let name_start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::UnterminatedQuotedIdent {
                        offset: start,
                        position,
                    })
                }
                Some(b'"') => {
                    let name = self.text(name_start, self.pos);
                    self.advance();
                    return Ok(TokenKind::QuotedIdent(name));
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Integer or decimal literal, with optional exponent (`1e10`, `2.5E-3`).
    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        } else if self.peek() == Some(b'.') && start < self.pos {
            // Trailing dot as in `1.` — consume it as part of the number.
            self.advance();
        }
        if self.peek().is_some_and(|c| c == b'e' || c == b'E') {
            let mut lookahead = 1;
            if self.peek_at(1).is_some_and(|c| c == b'+' || c == b'-') {
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..=lookahead {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        TokenKind::NumberLit(self.text(start, self.pos))
    }

    /// Bare word: keyword or identifier.
    fn lex_word(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }
        let word = self.text(start, self.pos);
        match Keyword::from_ident(&word) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(word),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => self.advance(),
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    while self.peek().is_some_and(|c| c != b'\n') {
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    let position = Position::new(self.line, self.col);
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(LexError::UnterminatedComment {
                                    offset: start,
                                    position,
                                })
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => self.advance(),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    // ── Cursor helpers ──────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.get(self.pos + n).copied()
    }

    fn advance(&mut self) {
        if let Some(&b) = self.src.get(self.pos) {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.src[start..end]).into_owned()
    }

    /// Decodes the full UTF-8 character starting at the cursor so error
    /// messages show the character, not a stray byte.
    fn current_char(&mut self, first: u8) -> char {
        let len = match first {
            0x00..=0x7f => 1,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            _ => 4,
        };
        let end = (self.pos + len).min(self.src.len());
        let ch = String::from_utf8_lossy(&self.src[self.pos..end])
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.advance();
        ch
    }

    fn token_at(&self, kind: TokenKind, offset: usize, line: usize, col: usize) -> Token {
        Token {
            kind,
            offset,
            line,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<TokenKind> {
        Lexer::tokenize(sql)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_borrowed_source() {
        // The source only needs to live for the duration of the call.
        let sql = String::from("SELECT 1");
        let tokens = Lexer::tokenize(&sql).expect("tokenize");
        drop(sql);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_simple_select() {
        let toks = kinds("SELECT id FROM users");
        assert_eq!(
            toks,
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Ident("id".into()),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Ident("users".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(kinds("select"), kinds("SELECT"));
        assert_eq!(kinds("LeFt JoIn"), kinds("LEFT JOIN"));
    }

    #[test]
    fn test_string_literal_with_escape() {
        let toks = kinds("'it''s'");
        assert_eq!(toks[0], TokenKind::StringLit("it's".into()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::tokenize("SELECT 'oops").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
        assert_eq!(err.position(), Position::new(1, 8));
    }

    #[test]
    fn test_quoted_identifier() {
        let toks = kinds("\"Order Details\"");
        assert_eq!(toks[0], TokenKind::QuotedIdent("Order Details".into()));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42")[0], TokenKind::NumberLit("42".into()));
        assert_eq!(kinds("3.14")[0], TokenKind::NumberLit("3.14".into()));
        assert_eq!(kinds(".5")[0], TokenKind::NumberLit(".5".into()));
        assert_eq!(kinds("1e10")[0], TokenKind::NumberLit("1e10".into()));
        assert_eq!(kinds("2.5E-3")[0], TokenKind::NumberLit("2.5E-3".into()));
    }

    #[test]
    fn test_operators() {
        assert_eq!(kinds("<>")[0], TokenKind::Op(Op::NotEq));
        assert_eq!(kinds("!=")[0], TokenKind::Op(Op::NotEq));
        assert_eq!(kinds("<=")[0], TokenKind::Op(Op::LtEq));
        assert_eq!(kinds(">=")[0], TokenKind::Op(Op::GtEq));
        assert_eq!(kinds("||")[0], TokenKind::Op(Op::Concat));
        assert_eq!(kinds("==")[0], TokenKind::Op(Op::Eq));
    }

    #[test]
    fn test_comments_skipped() {
        let toks = kinds("SELECT 1 -- trailing\n/* block\ncomment */ FROM t");
        assert_eq!(
            toks,
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::NumberLit("1".into()),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Ident("t".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = Lexer::tokenize("SELECT 1 /* oops").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::tokenize("SELECT # FROM t").unwrap_err();
        match err {
            LexError::UnexpectedChar { ch, position, .. } => {
                assert_eq!(ch, '#');
                assert_eq!(position, Position::new(1, 8));
            }
            other => panic!("expected UnexpectedChar, got {other:?}"),
        }
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = Lexer::tokenize("SELECT\n  id\nFROM t").expect("tokenize");
        let id = &tokens[1];
        assert_eq!((id.line, id.col), (2, 3));
        let from = &tokens[2];
        assert_eq!((from.line, from.col), (3, 1));
    }

    #[test]
    fn test_qualified_name_tokens() {
        let toks = kinds("u.id");
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident("u".into()),
                TokenKind::Dot,
                TokenKind::Ident("id".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_single_eof_on_empty_input() {
        assert_eq!(kinds("   \n\t"), vec![TokenKind::Eof]);
    }
}
