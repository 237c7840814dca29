//! Hand-written recursive descent parser for the supported SELECT grammar.
//!
//! The parser consumes the token vector with a single monotonically
//! advancing cursor and one token of lookahead (two where a `(` must be
//! classified as subquery vs. expression). Expressions use binding-power
//! climbing; statement structure is plain recursive descent. Every recursive
//! call consumes at least one token, so depth is bounded by input length.

use crate::ast::{
    BinaryOp, CaseBranch, CaseExpr, CompareOp, Cte, Expr, FunctionCall, Join, JoinKind, Literal,
    OrderingTerm, Predicate, Projection, Select, SetOp, SetOperator, Statement, TableFactor,
    TableRef, UnaryOp,
};
use crate::error::{AssessError, ParseError};
use crate::lexer::Lexer;
use crate::token::{Keyword, Op, Token, TokenKind};

/// Tokenize and parse a complete statement, requiring the whole input to be
/// consumed (a trailing semicolon is tolerated).
pub fn parse_sql(sql: &str) -> Result<Statement, AssessError> {
    let tokens = Lexer::tokenize(sql)?;
    let stmt = Parser::new(tokens).parse_statement()?;
    Ok(stmt)
}

// Binding powers for scalar operators: higher binds tighter.
// Left BP is checked against min_bp; right BP goes into the recursive call.
mod bp {
    pub const ADD: (u8, u8) = (1, 2);
    pub const MUL: (u8, u8) = (3, 4);
    pub const CONCAT: (u8, u8) = (5, 6);
    pub const UNARY: u8 = 7;
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// The lexer always terminates its output with `Eof`, but `new`
    /// accepts any token vector, so normalize: append an `Eof` at the
    /// last token's position when the terminator is missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let (offset, line, col) = tokens
                .last()
                .map_or((0, 1, 1), |t| (t.offset, t.line, t.col));
            tokens.push(Token {
                kind: TokenKind::Eof,
                offset,
                line,
                col,
            });
        }
        Self { tokens, pos: 0 }
    }

    /// Parse one statement and require EOF afterwards.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let stmt = self.parse_query()?;
        let _ = self.eat(&TokenKind::Semicolon);
        let tail = self.peek();
        if tail.kind != TokenKind::Eof {
            return Err(ParseError::expected("end of input", tail));
        }
        Ok(stmt)
    }

    // ── Statement structure ─────────────────────────────────────────────

    /// `[WITH ctes] select (UNION|INTERSECT|EXCEPT [ALL|DISTINCT] select)*`
    fn parse_query(&mut self) -> Result<Statement, ParseError> {
        let ctes = if self.eat_keyword(Keyword::With) {
            self.parse_cte_list()?
        } else {
            Vec::new()
        };

        let mut stmt = self.parse_query_term()?;

        while let Some(op) = self.peek_set_operator() {
            self.advance();
            let all = self.eat_keyword(Keyword::All);
            if !all {
                let _ = self.eat_keyword(Keyword::Distinct);
            }
            let right = self.parse_query_term()?;
            stmt = Statement::SetOp(Box::new(SetOp {
                op,
                all,
                left: stmt,
                right,
            }));
        }

        if !ctes.is_empty() {
            attach_ctes(&mut stmt, ctes);
        }
        Ok(stmt)
    }

    fn peek_set_operator(&self) -> Option<SetOperator> {
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Union) => Some(SetOperator::Union),
            TokenKind::Keyword(Keyword::Intersect) => Some(SetOperator::Intersect),
            TokenKind::Keyword(Keyword::Except) => Some(SetOperator::Except),
            _ => None,
        }
    }

    /// One branch of a set-operation chain: a SELECT core or a
    /// parenthesized query.
    fn parse_query_term(&mut self) -> Result<Statement, ParseError> {
        if self.check(&TokenKind::LParen) && self.starts_query(1) {
            self.advance();
            let inner = self.parse_query()?;
            self.expect(&TokenKind::RParen)?;
            Ok(inner)
        } else {
            Ok(Statement::Select(Box::new(self.parse_select_core()?)))
        }
    }

    /// True when the token at `offset` ahead begins a query.
    fn starts_query(&self, offset: usize) -> bool {
        matches!(
            self.peek_ahead(offset).map(|t| &t.kind),
            Some(TokenKind::Keyword(Keyword::Select)) | Some(TokenKind::Keyword(Keyword::With))
        )
    }

    fn parse_cte_list(&mut self) -> Result<Vec<Cte>, ParseError> {
        let mut ctes = Vec::new();
        loop {
            let name = self.expect_identifier("CTE name")?;
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LParen)?;
            let body = self.parse_query()?;
            self.expect(&TokenKind::RParen)?;
            ctes.push(Cte { name, body });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(ctes)
    }

    fn parse_select_core(&mut self) -> Result<Select, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        let mut select = Select::empty();

        select.distinct = self.eat_keyword(Keyword::Distinct);
        if !select.distinct {
            let _ = self.eat_keyword(Keyword::All);
        }

        loop {
            select.projections.push(self.parse_projection()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        if self.eat_keyword(Keyword::From) {
            select.from = Some(self.parse_table_factor()?);
            while let Some(kind) = self.parse_join_prefix()? {
                let relation = self.parse_table_factor()?;
                let constraint = if kind == JoinKind::Cross {
                    None
                } else {
                    self.expect_keyword(Keyword::On)?;
                    Some(self.parse_predicate()?)
                };
                select.joins.push(Join {
                    kind,
                    relation,
                    constraint,
                });
            }
        }

        if self.eat_keyword(Keyword::Where) {
            select.selection = Some(self.parse_predicate()?);
        }

        if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            loop {
                select.group_by.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        if self.eat_keyword(Keyword::Having) {
            select.having = Some(self.parse_predicate()?);
        }

        if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            loop {
                let expr = self.parse_expr()?;
                let descending = if self.eat_keyword(Keyword::Desc) {
                    true
                } else {
                    let _ = self.eat_keyword(Keyword::Asc);
                    false
                };
                select.order_by.push(OrderingTerm { expr, descending });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        if self.eat_keyword(Keyword::Limit) {
            select.limit = Some(self.parse_expr()?);
        }

        Ok(select)
    }

    fn parse_projection(&mut self) -> Result<Projection, ParseError> {
        if self.eat(&TokenKind::Star) {
            return Ok(Projection::Wildcard);
        }

        // `alias.*`
        if let TokenKind::Ident(name) = &self.peek().kind {
            if matches!(self.peek_ahead(1).map(|t| &t.kind), Some(TokenKind::Dot))
                && matches!(self.peek_ahead(2).map(|t| &t.kind), Some(TokenKind::Star))
            {
                let qualifier = name.clone();
                self.advance();
                self.advance();
                self.advance();
                return Ok(Projection::QualifiedWildcard(qualifier));
            }
        }

        let expr = self.parse_expr()?;
        let alias = self.parse_alias()?;
        Ok(Projection::Expr { expr, alias })
    }

    /// Consume the keywords introducing a join, returning its kind, or
    /// `None` when no join follows.
    fn parse_join_prefix(&mut self) -> Result<Option<JoinKind>, ParseError> {
        let kind = match self.peek().kind {
            TokenKind::Keyword(Keyword::Join) => {
                self.advance();
                JoinKind::Inner
            }
            TokenKind::Keyword(Keyword::Inner) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Inner
            }
            TokenKind::Keyword(Keyword::Left) => {
                self.advance();
                let _ = self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Left
            }
            TokenKind::Keyword(Keyword::Right) => {
                self.advance();
                let _ = self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Right
            }
            TokenKind::Keyword(Keyword::Full) => {
                self.advance();
                let _ = self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Full
            }
            TokenKind::Keyword(Keyword::Outer) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Outer
            }
            TokenKind::Keyword(Keyword::Cross) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Cross
            }
            _ => return Ok(None),
        };
        Ok(Some(kind))
    }

    fn parse_table_factor(&mut self) -> Result<TableFactor, ParseError> {
        if self.check(&TokenKind::LParen) && self.starts_query(1) {
            self.advance();
            let subquery = self.parse_query()?;
            self.expect(&TokenKind::RParen)?;
            let alias = self.parse_alias()?;
            return Ok(TableFactor::Derived {
                subquery: Box::new(subquery),
                alias,
            });
        }

        let name = self.parse_object_name()?;
        let alias = self.parse_alias()?;
        Ok(TableFactor::Table(TableRef { name, alias }))
    }

    /// Dotted name such as `schema.users`, joined back into one string.
    fn parse_object_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_identifier("table name")?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            let part = self.expect_identifier("name after '.'")?;
            name.push('.');
            name.push_str(&part);
        }
        Ok(name)
    }

    /// `[AS] identifier`, or nothing.
    fn parse_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword(Keyword::As) {
            return Ok(Some(self.expect_identifier("alias after AS")?));
        }
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let alias = name.clone();
                self.advance();
                Ok(Some(alias))
            }
            TokenKind::QuotedIdent(name) => {
                let alias = name.clone();
                self.advance();
                Ok(Some(alias))
            }
            _ => Ok(None),
        }
    }

    // ── Predicates ──────────────────────────────────────────────────────

    /// OR-level entry point; OR binds loosest, then AND, then NOT, then the
    /// comparison forms.
    pub(crate) fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = Predicate::Or {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Predicate, ParseError> {
        let mut left = self.parse_not()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.parse_not()?;
            left = Predicate::And {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Predicate, ParseError> {
        // `NOT IN` / `NOT BETWEEN` belong to the comparison forms, so only
        // treat NOT as a prefix when it does not immediately follow an
        // expression (i.e. here, at the start of a predicate).
        if self.check_keyword(Keyword::Not) {
            self.advance();
            let inner = self.parse_not()?;
            return Ok(Predicate::Not(Box::new(inner)));
        }
        self.parse_predicate_primary()
    }

    fn parse_predicate_primary(&mut self) -> Result<Predicate, ParseError> {
        if self.check(&TokenKind::LParen) && !self.starts_query(1) {
            self.advance();
            let inner = self.parse_predicate()?;
            self.expect(&TokenKind::RParen)?;

            // `(a + b) > c` parses the parenthesized part as a bare
            // expression predicate; if an operator follows, reinterpret it
            // as an expression operand and keep going.
            if let Predicate::Expr(e) = inner {
                if self.continues_expression() {
                    let lhs = self.parse_expr_continued(Expr::Nested(Box::new(e)))?;
                    return self.parse_comparison_suffix(lhs);
                }
                return Ok(Predicate::Nested(Box::new(Predicate::Expr(e))));
            }
            return Ok(Predicate::Nested(Box::new(inner)));
        }

        let expr = self.parse_expr()?;
        self.parse_comparison_suffix(expr)
    }

    /// True when the next token extends a scalar expression or begins a
    /// comparison form.
    fn continues_expression(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Op(_)
                | TokenKind::Star
                | TokenKind::Keyword(Keyword::In)
                | TokenKind::Keyword(Keyword::Between)
                | TokenKind::Keyword(Keyword::Is)
                | TokenKind::Keyword(Keyword::Not)
        )
    }

    fn parse_comparison_suffix(&mut self, expr: Expr) -> Result<Predicate, ParseError> {
        if let TokenKind::Op(op) = self.peek().kind {
            if let Some(op) = compare_op(op) {
                self.advance();
                let right = self.parse_expr()?;
                return Ok(Predicate::Comparison {
                    left: expr,
                    op,
                    right,
                });
            }
        }

        let negated = if self.check_keyword(Keyword::Not) {
            // Only consume NOT when a comparison form follows it.
            match self.peek_ahead(1).map(|t| &t.kind) {
                Some(TokenKind::Keyword(Keyword::In))
                | Some(TokenKind::Keyword(Keyword::Between)) => {
                    self.advance();
                    true
                }
                _ => false,
            }
        } else {
            false
        };

        if self.eat_keyword(Keyword::In) {
            return self.parse_in_suffix(expr, negated);
        }

        if self.eat_keyword(Keyword::Between) {
            let low = self.parse_expr()?;
            self.expect_keyword(Keyword::And)?;
            let high = self.parse_expr()?;
            return Ok(Predicate::Between {
                expr,
                low,
                high,
                negated,
            });
        }

        if negated {
            return Err(ParseError::expected("IN or BETWEEN after NOT", self.peek()));
        }

        if self.eat_keyword(Keyword::Is) {
            let negated = self.eat_keyword(Keyword::Not);
            self.expect_keyword(Keyword::Null)?;
            return Ok(Predicate::IsNull { expr, negated });
        }

        Ok(Predicate::Expr(expr))
    }

    fn parse_in_suffix(&mut self, expr: Expr, negated: bool) -> Result<Predicate, ParseError> {
        self.expect(&TokenKind::LParen)?;

        if self.starts_query(0) {
            let subquery = self.parse_query()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(Predicate::InSubquery {
                expr,
                subquery: Box::new(subquery),
                negated,
            });
        }

        let mut list = Vec::new();
        loop {
            list.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(Predicate::InList {
            expr,
            list,
            negated,
        })
    }

    // ── Scalar expressions ──────────────────────────────────────────────

    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    /// Resume binding-power climbing with an already-parsed left operand.
    fn parse_expr_continued(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        self.parse_expr_rest(lhs, 0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let lhs = self.parse_expr_prefix()?;
        self.parse_expr_rest(lhs, min_bp)
    }

    fn parse_expr_rest(&mut self, mut lhs: Expr, min_bp: u8) -> Result<Expr, ParseError> {
        loop {
            let Some((op, l_bp, r_bp)) = self.peek_binary_op() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn peek_binary_op(&self) -> Option<(BinaryOp, u8, u8)> {
        let (op, (l, r)) = match self.peek().kind {
            TokenKind::Op(Op::Plus) => (BinaryOp::Plus, bp::ADD),
            TokenKind::Op(Op::Minus) => (BinaryOp::Minus, bp::ADD),
            TokenKind::Star => (BinaryOp::Multiply, bp::MUL),
            TokenKind::Op(Op::Slash) => (BinaryOp::Divide, bp::MUL),
            TokenKind::Op(Op::Percent) => (BinaryOp::Modulo, bp::MUL),
            TokenKind::Op(Op::Concat) => (BinaryOp::Concat, bp::CONCAT),
            _ => return None,
        };
        Some((op, l, r))
    }

    fn parse_expr_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Op(Op::Minus) => {
                self.advance();
                let expr = self.parse_expr_bp(bp::UNARY)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Minus,
                    expr: Box::new(expr),
                })
            }
            TokenKind::Op(Op::Plus) => {
                self.advance();
                let expr = self.parse_expr_bp(bp::UNARY)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Plus,
                    expr: Box::new(expr),
                })
            }
            TokenKind::NumberLit(text) => {
                self.advance();
                Ok(Expr::Literal(Literal::Number(text)))
            }
            TokenKind::StringLit(text) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(text)))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::Keyword(Keyword::Case) => {
                self.advance();
                self.parse_case()
            }
            TokenKind::LParen => {
                self.advance();
                if self.starts_query(0) {
                    let query = self.parse_query()?;
                    self.expect(&TokenKind::RParen)?;
                    Ok(Expr::Subquery(Box::new(query)))
                } else {
                    let inner = self.parse_expr()?;
                    self.expect(&TokenKind::RParen)?;
                    Ok(Expr::Nested(Box::new(inner)))
                }
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.parse_name_suffix(name)
            }
            TokenKind::QuotedIdent(name) => {
                self.advance();
                self.parse_name_suffix(name)
            }
            _ => Err(ParseError::expected("expression", &token)),
        }
    }

    /// Continuation after an identifier: function call, qualified column,
    /// or bare column.
    fn parse_name_suffix(&mut self, name: String) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::LParen) {
            self.advance();
            return self.parse_function_call(name);
        }

        if self.check(&TokenKind::Dot) {
            self.advance();
            let column = self.expect_identifier("column name after '.'")?;
            return Ok(Expr::Column {
                qualifier: Some(name),
                name: column,
            });
        }

        Ok(Expr::Column {
            qualifier: None,
            name,
        })
    }

    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        let mut call = FunctionCall {
            name,
            distinct: false,
            args: Vec::new(),
        };

        if self.eat(&TokenKind::RParen) {
            return Ok(Expr::Function(call));
        }

        call.distinct = self.eat_keyword(Keyword::Distinct);

        loop {
            if self.eat(&TokenKind::Star) {
                call.args.push(Expr::Wildcard);
            } else {
                call.args.push(self.parse_expr()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(Expr::Function(call))
    }

    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut branches = Vec::new();
        self.expect_keyword(Keyword::When)?;
        loop {
            let condition = if operand.is_some() {
                // Simple CASE compares the operand against plain values.
                Predicate::Expr(self.parse_expr()?)
            } else {
                self.parse_predicate()?
            };
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr()?;
            branches.push(CaseBranch { condition, result });
            if !self.eat_keyword(Keyword::When) {
                break;
            }
        }

        let else_result = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case(CaseExpr {
            operand,
            branches,
            else_result,
        }))
    }

    // ── Token helpers ───────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        // `new` guarantees a non-empty vector with a trailing Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.peek().kind == TokenKind::Keyword(kw)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(ParseError::expected(format!("{kind}"), self.peek()))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(ParseError::expected(kw.as_str(), self.peek()))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::QuotedIdent(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected(what, self.peek())),
        }
    }
}

fn compare_op(op: Op) -> Option<CompareOp> {
    match op {
        Op::Eq => Some(CompareOp::Eq),
        Op::NotEq => Some(CompareOp::NotEq),
        Op::Lt => Some(CompareOp::Lt),
        Op::LtEq => Some(CompareOp::LtEq),
        Op::Gt => Some(CompareOp::Gt),
        Op::GtEq => Some(CompareOp::GtEq),
        _ => None,
    }
}

/// Attach a WITH clause's CTEs to the leftmost SELECT of a set-op chain.
/// Prepends, so a parenthesized term that carried its own WITH keeps its
/// CTEs after the outer ones.
fn attach_ctes(stmt: &mut Statement, ctes: Vec<Cte>) {
    match stmt {
        Statement::Select(select) => {
            select.ctes.splice(0..0, ctes);
        }
        Statement::SetOp(setop) => attach_ctes(&mut setop.left, ctes),
    }
}
