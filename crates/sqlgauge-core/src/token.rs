//! Token types produced by the lexer.
//!
//! Every token carries its discriminant plus the byte offset and 1-based
//! line/column where it starts, so parse errors can point back into the
//! source text. Keywords get their own variants for O(1) matching in the
//! parser.

use std::fmt;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token discriminant.
    pub kind: TokenKind,
    /// Byte offset of the first character in the original source.
    pub offset: usize,
    /// Line number (1-based) at the start of the token.
    pub line: usize,
    /// Column number (1-based) at the start of the token.
    pub col: usize,
}

/// Token discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Reserved word, matched case-insensitively.
    Keyword(Keyword),
    /// Bare identifier.
    Ident(String),
    /// Double-quoted identifier, quotes stripped.
    QuotedIdent(String),
    /// Single-quoted string literal, quotes stripped and `''` unescaped.
    StringLit(String),
    /// Numeric literal, kept as source text (the scorer never evaluates it).
    NumberLit(String),
    /// Comparison or arithmetic operator.
    Op(Op),
    /// `*`, used both as a wildcard projection and as multiplication.
    Star,
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    /// End of input; exactly one per token stream.
    Eof,
}

/// Operators the grammar subset understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Slash,
    Percent,
    Concat,
}

/// The supported keyword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Where,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    On,
    Group,
    By,
    Having,
    Union,
    Intersect,
    Except,
    With,
    As,
    Case,
    When,
    Then,
    Else,
    End,
    And,
    Or,
    Not,
    In,
    All,
    Distinct,
    Between,
    Is,
    Null,
    True,
    False,
    Order,
    Limit,
    Asc,
    Desc,
}

impl Keyword {
    /// Look up a bare identifier as a keyword, case-insensitively.
    pub fn from_ident(word: &str) -> Option<Keyword> {
        let kw = match word.to_ascii_uppercase().as_str() {
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "WHERE" => Keyword::Where,
            "JOIN" => Keyword::Join,
            "INNER" => Keyword::Inner,
            "LEFT" => Keyword::Left,
            "RIGHT" => Keyword::Right,
            "FULL" => Keyword::Full,
            "OUTER" => Keyword::Outer,
            "CROSS" => Keyword::Cross,
            "ON" => Keyword::On,
            "GROUP" => Keyword::Group,
            "BY" => Keyword::By,
            "HAVING" => Keyword::Having,
            "UNION" => Keyword::Union,
            "INTERSECT" => Keyword::Intersect,
            "EXCEPT" => Keyword::Except,
            "WITH" => Keyword::With,
            "AS" => Keyword::As,
            "CASE" => Keyword::Case,
            "WHEN" => Keyword::When,
            "THEN" => Keyword::Then,
            "ELSE" => Keyword::Else,
            "END" => Keyword::End,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "NOT" => Keyword::Not,
            "IN" => Keyword::In,
            "ALL" => Keyword::All,
            "DISTINCT" => Keyword::Distinct,
            "BETWEEN" => Keyword::Between,
            "IS" => Keyword::Is,
            "NULL" => Keyword::Null,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "ORDER" => Keyword::Order,
            "LIMIT" => Keyword::Limit,
            "ASC" => Keyword::Asc,
            "DESC" => Keyword::Desc,
            _ => return None,
        };
        Some(kw)
    }

    /// Canonical upper-case spelling, used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Join => "JOIN",
            Keyword::Inner => "INNER",
            Keyword::Left => "LEFT",
            Keyword::Right => "RIGHT",
            Keyword::Full => "FULL",
            Keyword::Outer => "OUTER",
            Keyword::Cross => "CROSS",
            Keyword::On => "ON",
            Keyword::Group => "GROUP",
            Keyword::By => "BY",
            Keyword::Having => "HAVING",
            Keyword::Union => "UNION",
            Keyword::Intersect => "INTERSECT",
            Keyword::Except => "EXCEPT",
            Keyword::With => "WITH",
            Keyword::As => "AS",
            Keyword::Case => "CASE",
            Keyword::When => "WHEN",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::End => "END",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::In => "IN",
            Keyword::All => "ALL",
            Keyword::Distinct => "DISTINCT",
            Keyword::Between => "BETWEEN",
            Keyword::Is => "IS",
            Keyword::Null => "NULL",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Order => "ORDER",
            Keyword::Limit => "LIMIT",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
        }
    }
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::NotEq => "<>",
            Op::Lt => "<",
            Op::LtEq => "<=",
            Op::Gt => ">",
            Op::GtEq => ">=",
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Slash => "/",
            Op::Percent => "%",
            Op::Concat => "||",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "{}", kw.as_str()),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::QuotedIdent(name) => write!(f, "identifier \"{name}\""),
            TokenKind::StringLit(_) => write!(f, "string literal"),
            TokenKind::NumberLit(text) => write!(f, "number '{text}'"),
            TokenKind::Op(op) => write!(f, "'{}'", op.as_str()),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_case_insensitive() {
        assert_eq!(Keyword::from_ident("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_ident("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_ident("INTERSECT"), Some(Keyword::Intersect));
        assert_eq!(Keyword::from_ident("users"), None);
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::Keyword(Keyword::From).to_string(), "FROM");
        assert_eq!(TokenKind::Ident("users".into()).to_string(), "identifier 'users'");
        assert_eq!(TokenKind::Op(Op::LtEq).to_string(), "'<='");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
