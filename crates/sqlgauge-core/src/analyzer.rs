//! Tree walk that tallies scored constructs and applies a rule table.
//!
//! The walk is a pre-order traversal over the whole statement tree:
//! CTE bodies, set-operation branches, derived tables and scalar
//! subqueries are all descended into, so nested queries contribute to
//! the same tallies as the outermost one.
//!
//! Two tallies deserve a note. Membership tests (`IN`) and the WHEN arms
//! of a CASE count toward `functions`: scored corpora were calibrated
//! against engines whose expression taxonomy classifies both as builtin
//! invocations, and preset weights depend on those tallies.

#[cfg(feature = "tracing")]
use tracing::info_span;

use crate::ast::{
    CaseExpr, Expr, Predicate, Select, SetOperator, Statement, TableFactor,
};
use crate::error::AssessError;
use crate::parser::parse_sql;
use crate::rules::RuleTable;
use crate::types::{CategoryCounts, ScoreBreakdown};

/// Assess one SQL statement under the default rule table.
pub fn assess(sql: &str) -> Result<ScoreBreakdown, AssessError> {
    assess_with_rules(sql, &RuleTable::default())
}

/// Assess one SQL statement under `rules`.
pub fn assess_with_rules(sql: &str, rules: &RuleTable) -> Result<ScoreBreakdown, AssessError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("assess", bytes = sql.len()).entered();
    let stmt = match parse_sql(sql) {
        Ok(stmt) => stmt,
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %e, "assessment failed");
            return Err(e);
        }
    };
    let counts = count_categories(&stmt);
    Ok(ScoreBreakdown {
        total: rules.score(&counts),
        counts,
    })
}

/// Walk an already-parsed statement and collect the raw tallies.
pub fn count_categories(stmt: &Statement) -> CategoryCounts {
    let mut counter = Counter::default();
    counter.visit_statement(stmt);
    counter.counts
}

#[derive(Default)]
struct Counter {
    counts: CategoryCounts,
}

impl Counter {
    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Select(select) => self.visit_select(select),
            Statement::SetOp(setop) => {
                match setop.op {
                    SetOperator::Union => self.counts.unions += 1,
                    SetOperator::Intersect => self.counts.intersects += 1,
                    // EXCEPT is parsed but carries no weight of its own.
                    SetOperator::Except => {}
                }
                self.visit_statement(&setop.left);
                self.visit_statement(&setop.right);
            }
        }
    }

    fn visit_select(&mut self, select: &Select) {
        for cte in &select.ctes {
            self.counts.ctes += 1;
            self.visit_statement(&cte.body);
        }

        for projection in &select.projections {
            if let crate::ast::Projection::Expr { expr, .. } = projection {
                self.visit_expr(expr);
            }
        }

        if let Some(from) = &select.from {
            self.visit_table_factor(from);
        }

        for join in &select.joins {
            if join.kind.is_outer() {
                self.counts.outer_joins += 1;
            } else {
                self.counts.joins += 1;
            }
            self.visit_table_factor(&join.relation);
            if let Some(constraint) = &join.constraint {
                self.visit_predicate(constraint);
            }
        }

        if let Some(selection) = &select.selection {
            self.counts.where_predicates += predicate_units(selection);
            self.visit_predicate(selection);
        }

        self.counts.group_by_expressions += select.group_by.len() as u32;
        for expr in &select.group_by {
            self.visit_expr(expr);
        }

        if let Some(having) = &select.having {
            self.counts.having_predicates += predicate_units(having);
            self.visit_predicate(having);
        }

        for term in &select.order_by {
            self.visit_expr(&term.expr);
        }
        if let Some(limit) = &select.limit {
            self.visit_expr(limit);
        }
    }

    fn visit_table_factor(&mut self, factor: &TableFactor) {
        match factor {
            TableFactor::Table(_) => self.counts.tables += 1,
            TableFactor::Derived { subquery, .. } => self.visit_statement(subquery),
        }
    }

    /// Descends into a predicate looking for scored constructs. The
    /// WHERE/HAVING unit counting is separate; see [`predicate_units`].
    fn visit_predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::And { left, right } | Predicate::Or { left, right } => {
                self.visit_predicate(left);
                self.visit_predicate(right);
            }
            Predicate::Not(inner) | Predicate::Nested(inner) => self.visit_predicate(inner),
            Predicate::Comparison { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Predicate::InList { expr, list, .. } => {
                self.counts.functions += 1;
                self.visit_expr(expr);
                for item in list {
                    self.visit_expr(item);
                }
            }
            Predicate::InSubquery { expr, subquery, .. } => {
                self.counts.functions += 1;
                self.visit_expr(expr);
                self.visit_statement(subquery);
            }
            Predicate::Between {
                expr, low, high, ..
            } => {
                self.visit_expr(expr);
                self.visit_expr(low);
                self.visit_expr(high);
            }
            Predicate::IsNull { expr, .. } => self.visit_expr(expr),
            Predicate::Expr(expr) => self.visit_expr(expr),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) | Expr::Column { .. } | Expr::Wildcard => {}
            Expr::Unary { expr, .. } | Expr::Nested(expr) => self.visit_expr(expr),
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Function(call) => {
                self.counts.functions += 1;
                for arg in &call.args {
                    self.visit_expr(arg);
                }
            }
            Expr::Case(case) => self.visit_case(case),
            Expr::Subquery(stmt) => self.visit_statement(stmt),
        }
    }

    fn visit_case(&mut self, case: &CaseExpr) {
        self.counts.cases += 1;
        // Each WHEN arm tallies as one function invocation.
        self.counts.functions += case.branches.len() as u32;
        if let Some(operand) = &case.operand {
            self.visit_expr(operand);
        }
        for branch in &case.branches {
            self.visit_predicate(&branch.condition);
            self.visit_expr(&branch.result);
        }
        if let Some(else_result) = &case.else_result {
            self.visit_expr(else_result);
        }
    }
}

/// Number of predicate units in a WHERE or HAVING tree: AND/OR nodes add
/// one each and recurse, anything else is a single leaf. A parenthesized
/// subtree is one leaf regardless of what it wraps.
fn predicate_units(predicate: &Predicate) -> u32 {
    match predicate {
        Predicate::And { left, right } | Predicate::Or { left, right } => {
            1 + predicate_units(left) + predicate_units(right)
        }
        _ => 1,
    }
}
