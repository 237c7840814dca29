pub mod analyzer;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod rules;
pub mod token;
pub mod types;

// Re-export main types and functions
pub use analyzer::{assess, assess_with_rules, count_categories};
pub use error::{AssessError, LexError, ParseError, Position};
pub use lexer::Lexer;
pub use parser::{parse_sql, Parser};
pub use rules::RuleTable;
pub use types::{CategoryCounts, ScoreBreakdown};
