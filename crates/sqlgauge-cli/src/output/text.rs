//! Human-readable text output with optional colors.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqlgauge_core::ScoreBreakdown;
use std::fmt::Write;

/// Format an assessment for the terminal.
///
/// Non-verbose output is the bare total so the command composes in
/// pipelines; verbose output is the full category breakdown.
pub fn format_text(breakdown: &ScoreBreakdown, verbose: bool, use_colors: bool) -> String {
    if !verbose {
        return breakdown.total.to_string();
    }

    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    if colored {
        writeln!(out, "{}", format!("Complexity Score: {}", breakdown.total).bold()).unwrap();
    } else {
        writeln!(out, "Complexity Score: {}", breakdown.total).unwrap();
    }

    let c = &breakdown.counts;
    let rows = [
        ("Tables", c.tables),
        ("Joins", c.joins),
        ("Outer Joins", c.outer_joins),
        ("WHERE Predicates", c.where_predicates),
        ("HAVING Predicates", c.having_predicates),
        ("CTEs", c.ctes),
        ("GROUP BY Expressions", c.group_by_expressions),
        ("UNIONs", c.unions),
        ("INTERSECTs", c.intersects),
        ("Functions", c.functions),
        ("CASE Expressions", c.cases),
    ];
    for (i, (label, count)) in rows.iter().enumerate() {
        let last = i == rows.len() - 1;
        if colored && *count == 0 {
            write!(out, "  {}", format!("{label}: {count}").dimmed()).unwrap();
        } else {
            write!(out, "  {label}: {count}").unwrap();
        }
        if !last {
            writeln!(out).unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgauge_core::CategoryCounts;

    fn sample() -> ScoreBreakdown {
        ScoreBreakdown {
            total: 4,
            counts: CategoryCounts {
                tables: 2,
                joins: 1,
                where_predicates: 1,
                ..CategoryCounts::default()
            },
        }
    }

    #[test]
    fn test_plain_output_is_just_the_total() {
        assert_eq!(format_text(&sample(), false, false), "4");
    }

    #[test]
    fn test_verbose_output_lists_every_category() {
        let text = format_text(&sample(), true, false);
        assert!(text.starts_with("Complexity Score: 4\n"));
        assert!(text.contains("  Tables: 2\n"));
        assert!(text.contains("  Joins: 1\n"));
        assert!(text.ends_with("  CASE Expressions: 0"));
    }
}
