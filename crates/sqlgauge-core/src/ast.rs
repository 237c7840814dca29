//! The statement tree produced by the parser.
//!
//! A closed set of variants, built bottom-up and uniquely owned by the
//! statement root: no node is shared between parents, the tree is acyclic,
//! and its depth is bounded by the input length. The complexity visitor
//! pattern-matches exhaustively over these types, so adding a variant
//! forces a visitor update at compile time.

/// A complete parsed query: a single SELECT or a set-operation chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Box<Select>),
    SetOp(Box<SetOp>),
}

/// `left UNION/INTERSECT/EXCEPT [ALL|DISTINCT] right`, left-associative.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOp {
    pub op: SetOperator,
    /// True for `ALL`; scoring does not distinguish the modifiers.
    pub all: bool,
    pub left: Statement,
    pub right: Statement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

/// A single SELECT core with its attached clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// CTEs from a leading WITH, in declaration order.
    pub ctes: Vec<Cte>,
    pub distinct: bool,
    pub projections: Vec<Projection>,
    pub from: Option<TableFactor>,
    pub joins: Vec<Join>,
    /// WHERE clause.
    pub selection: Option<Predicate>,
    pub group_by: Vec<Expr>,
    pub having: Option<Predicate>,
    /// Parsed but unscored.
    pub order_by: Vec<OrderingTerm>,
    /// Parsed but unscored.
    pub limit: Option<Expr>,
}

impl Select {
    /// An empty SELECT shell for the parser to fill in.
    pub fn empty() -> Self {
        Self {
            ctes: Vec::new(),
            distinct: false,
            projections: Vec::new(),
            from: None,
            joins: Vec::new(),
            selection: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
        }
    }
}

/// `WITH name AS (body)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: String,
    pub body: Statement,
}

/// One item of the projection list.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`
    Wildcard,
    /// `alias.*`
    QualifiedWildcard(String),
    Expr { expr: Expr, alias: Option<String> },
}

/// What a FROM clause or join names: a table or a derived subquery.
#[derive(Debug, Clone, PartialEq)]
pub enum TableFactor {
    Table(TableRef),
    Derived {
        subquery: Box<Statement>,
        alias: Option<String>,
    },
}

/// A named table (or CTE reference — the parser does not resolve names).
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

/// One JOIN clause attached to a SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub relation: TableFactor,
    /// ON predicate; absent for CROSS joins.
    pub constraint: Option<Predicate>,
}

/// Join flavor. A bare `JOIN` parses as `Inner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    /// Explicit `OUTER JOIN` with no side keyword.
    Outer,
    Cross,
}

impl JoinKind {
    /// LEFT, RIGHT, FULL, and bare OUTER classify as outer joins for
    /// scoring; INNER and CROSS classify as plain joins.
    pub fn is_outer(&self) -> bool {
        matches!(
            self,
            JoinKind::Left | JoinKind::Right | JoinKind::Full | JoinKind::Outer
        )
    }
}

/// Boolean-valued tree used by WHERE, HAVING, ON, and WHEN clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
    Or {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
    Not(Box<Predicate>),
    Comparison {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    InList {
        expr: Expr,
        list: Vec<Expr>,
        negated: bool,
    },
    InSubquery {
        expr: Expr,
        subquery: Box<Statement>,
        negated: bool,
    },
    Between {
        expr: Expr,
        low: Expr,
        high: Expr,
        negated: bool,
    },
    IsNull {
        expr: Expr,
        negated: bool,
    },
    /// Parenthesized sub-predicate. Kept as its own node: the predicate
    /// counting rule treats a parenthesized subtree as a single unit.
    Nested(Box<Predicate>),
    /// A bare expression in boolean position (e.g. a boolean column).
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Column {
        qualifier: Option<String>,
        name: String,
    },
    /// `*` as a function argument, as in `COUNT(*)`.
    Wildcard,
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Function(FunctionCall),
    Case(CaseExpr),
    /// Parenthesized scalar subquery.
    Subquery(Box<Statement>),
    /// Parenthesized expression.
    Nested(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concat,
}

/// `name([DISTINCT] args...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub distinct: bool,
    pub args: Vec<Expr>,
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    /// Operand of a simple CASE; absent for a searched CASE.
    pub operand: Option<Box<Expr>>,
    pub branches: Vec<CaseBranch>,
    pub else_result: Option<Box<Expr>>,
}

/// One `WHEN condition THEN result` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub condition: Predicate,
    pub result: Expr,
}

/// `expr [ASC|DESC]` in an ORDER BY list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingTerm {
    pub expr: Expr,
    pub descending: bool,
}
