//! JSON output formatting.

use anyhow::{Context, Result};
use sqlgauge_core::ScoreBreakdown;

/// Serialize an assessment to JSON, pretty-printed unless `compact`.
pub fn format_json(breakdown: &ScoreBreakdown, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(breakdown)
    } else {
        serde_json::to_string_pretty(breakdown)
    };
    json.context("Failed to serialize assessment to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgauge_core::CategoryCounts;

    fn sample() -> ScoreBreakdown {
        ScoreBreakdown {
            total: 2,
            counts: CategoryCounts {
                tables: 1,
                where_predicates: 1,
                ..CategoryCounts::default()
            },
        }
    }

    #[test]
    fn test_compact_is_single_line() {
        let json = format_json(&sample(), true).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"total\":2"));
    }

    #[test]
    fn test_pretty_round_trips() {
        let json = format_json(&sample(), false).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["total"], 2);
        assert_eq!(parsed["wherePredicates"], 1);
    }
}
