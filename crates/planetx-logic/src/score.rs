//! Final score calculator.
//!
//! The score sheet is a free-form map of field name to typed-in value. The
//! total is first-theory points, plus each object's correct-theory count
//! times that object's point value, plus the locate-Planet-X points.
//! Unparsable or missing entries count as zero.

use std::collections::BTreeMap;

use crate::mode::{ModeConfig, ObjectType};

pub const FIRST_THEORY_FIELD: &str = "first-theory-points";
pub const LOCATE_FIELD: &str = "locate-planet-x-points";

/// Score-sheet field name for an object's correct-theory count.
pub fn object_field(object: ObjectType) -> String {
    format!("{}-points", object.key())
}

fn parsed(entries: &BTreeMap<String, String>, field: &str) -> i64 {
    entries
        .get(field)
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Total score for the filled-in sheet.
pub fn score_total(mode: &ModeConfig, entries: &BTreeMap<String, String>) -> i64 {
    let mut total = parsed(entries, FIRST_THEORY_FIELD);
    for spec in &mode.objects {
        if let Some(points) = spec.points {
            total += parsed(entries, &object_field(spec.object)) * i64::from(points);
        }
    }
    total + parsed(entries, LOCATE_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_sheet_scores_zero() {
        let mode = ModeConfig::standard();
        assert_eq!(score_total(&mode, &BTreeMap::new()), 0);
    }

    #[test]
    fn weighted_object_counts() {
        let mode = ModeConfig::standard();
        let entries = sheet(&[
            ("first-theory-points", "1"),
            ("asteroid-points", "2"),   // x2 points
            ("comet-points", "1"),      // x3 points
            ("gas-cloud-points", "1"),  // x4 points
            ("locate-planet-x-points", "10"),
        ]);
        assert_eq!(score_total(&mode, &entries), 1 + 4 + 3 + 4 + 10);
    }

    #[test]
    fn unparsable_values_count_zero() {
        let mode = ModeConfig::standard();
        let entries = sheet(&[
            ("asteroid-points", "two"),
            ("locate-planet-x-points", "7"),
        ]);
        assert_eq!(score_total(&mode, &entries), 7);
    }

    #[test]
    fn expert_dwarf_planets_worth_two() {
        let mode = ModeConfig::expert();
        let entries = sheet(&[("dwarf-planet-points", "3")]);
        assert_eq!(score_total(&mode, &entries), 6);
    }
}
