//! Result types produced by an assessment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw per-category tallies collected by walking a statement tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    /// Table references, including references to CTEs by name.
    pub tables: u32,
    /// Inner and cross joins.
    pub joins: u32,
    /// LEFT, RIGHT, FULL and OUTER joins.
    pub outer_joins: u32,
    /// Leaf predicates under WHERE clauses.
    pub where_predicates: u32,
    /// Leaf predicates under HAVING clauses.
    pub having_predicates: u32,
    /// Common table expressions.
    pub ctes: u32,
    /// GROUP BY expressions.
    pub group_by_expressions: u32,
    /// UNION operators.
    pub unions: u32,
    /// INTERSECT operators.
    pub intersects: u32,
    /// Function invocations, including membership tests and CASE arms.
    pub functions: u32,
    /// CASE expressions.
    pub cases: u32,
}

/// A finished assessment: the weighted total plus the counts it was
/// computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Weighted total under the rule table the assessment ran with.
    pub total: u64,
    #[serde(flatten)]
    pub counts: CategoryCounts,
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        write!(
            f,
            "Complexity Score: {}\n\
             \x20 Tables: {}\n\
             \x20 Joins: {}\n\
             \x20 Outer Joins: {}\n\
             \x20 WHERE Predicates: {}\n\
             \x20 HAVING Predicates: {}\n\
             \x20 CTEs: {}\n\
             \x20 GROUP BY Expressions: {}\n\
             \x20 UNIONs: {}\n\
             \x20 INTERSECTs: {}\n\
             \x20 Functions: {}\n\
             \x20 CASE Expressions: {}",
            self.total,
            c.tables,
            c.joins,
            c.outer_joins,
            c.where_predicates,
            c.having_predicates,
            c.ctes,
            c.group_by_expressions,
            c.unions,
            c.intersects,
            c.functions,
            c.cases,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_layout() {
        let breakdown = ScoreBreakdown {
            total: 3,
            counts: CategoryCounts {
                tables: 1,
                where_predicates: 2,
                ..CategoryCounts::default()
            },
        };
        let text = breakdown.to_string();
        assert!(text.starts_with("Complexity Score: 3\n  Tables: 1\n"));
        assert!(text.contains("  WHERE Predicates: 2\n"));
        assert!(text.ends_with("  CASE Expressions: 0"));
    }

    #[test]
    fn test_json_flattens_counts() {
        let breakdown = ScoreBreakdown {
            total: 2,
            counts: CategoryCounts {
                tables: 1,
                joins: 1,
                ..CategoryCounts::default()
            },
        };
        let json = serde_json::to_value(&breakdown).expect("serialize");
        assert_eq!(json["total"], 2);
        assert_eq!(json["tables"], 1);
        assert_eq!(json["outerJoins"], 0);
        assert!(json.get("counts").is_none());
    }
}
