//! Weight tables that turn category counts into a score.
//!
//! A [`RuleTable`] assigns one integer weight to each scored category.
//! The built-in presets share the default table and adjust only the
//! weights they care about, so a table loaded from JSON may likewise
//! supply just the fields it wants to override.

use serde::{Deserialize, Serialize};

use crate::types::CategoryCounts;

/// Per-category weights applied by [`RuleTable::score`].
///
/// All fields default to 1 when missing from a deserialized table, which
/// makes partial JSON overrides behave like the presets: unnamed weights
/// keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleTable {
    /// Weight for each table reference.
    pub base_per_table: u32,
    /// Weight for each inner or cross join.
    pub per_join: u32,
    /// Weight for each LEFT, RIGHT, FULL or OUTER join.
    pub per_outer_join: u32,
    /// Weight for each leaf predicate in a WHERE clause.
    pub per_where_predicate: u32,
    /// Weight for each leaf predicate in a HAVING clause.
    pub per_having_predicate: u32,
    /// Weight for each common table expression.
    pub per_cte: u32,
    /// Weight for each GROUP BY expression.
    pub per_group_by_expr: u32,
    /// Weight for each UNION.
    pub per_union: u32,
    /// Weight for each INTERSECT.
    pub per_intersect: u32,
    /// Weight for each function invocation.
    pub per_function: u32,
    /// Weight for each CASE expression.
    pub per_case: u32,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            base_per_table: 1,
            per_join: 1,
            per_outer_join: 1,
            per_where_predicate: 1,
            per_having_predicate: 1,
            per_cte: 1,
            per_group_by_expr: 1,
            per_union: 1,
            per_intersect: 1,
            per_function: 1,
            per_case: 1,
        }
    }
}

impl RuleTable {
    /// Preset that penalizes the constructs most likely to hide cost:
    /// outer joins, function invocations and CASE branching.
    pub fn strict() -> Self {
        Self {
            per_outer_join: 2,
            per_function: 2,
            per_case: 2,
            ..Self::default()
        }
    }

    /// Preset that waives the cheapest constructs: plain joins and
    /// function invocations score nothing.
    pub fn lenient() -> Self {
        Self {
            per_join: 0,
            per_function: 0,
            ..Self::default()
        }
    }

    /// Weighted sum of `counts` under this table.
    ///
    /// Accumulates in `u64` so pathological inputs cannot overflow.
    pub fn score(&self, counts: &CategoryCounts) -> u64 {
        let mut total = 0u64;
        let mut add = |count: u32, weight: u32| {
            total += u64::from(count) * u64::from(weight);
        };
        add(counts.tables, self.base_per_table);
        add(counts.joins, self.per_join);
        add(counts.outer_joins, self.per_outer_join);
        add(counts.where_predicates, self.per_where_predicate);
        add(counts.having_predicates, self.per_having_predicate);
        add(counts.ctes, self.per_cte);
        add(counts.group_by_expressions, self.per_group_by_expr);
        add(counts.unions, self.per_union);
        add(counts.intersects, self.per_intersect);
        add(counts.functions, self.per_function);
        add(counts.cases, self.per_case);
        total
    }
}
