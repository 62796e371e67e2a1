//! Move actions, time costs, and sequencing validation.
//!
//! Each completed move costs time on the wrapped track. Survey cost depends
//! on the surveyed span; the other actions have fixed costs. Sequencing
//! rules (no back-to-back research, at most two targets per player) are
//! advisory: violations produce [`MoveIssue`]s but never block recording.

use serde::{Deserialize, Serialize};

use crate::mode::{ObjectType, PlayerColor};
use crate::sectors::is_prime;

pub const TARGET_COST: u32 = 4;
pub const RESEARCH_COST: u32 = 1;
pub const LOCATE_COST: u32 = 5;

/// The four action types a player can take on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Survey,
    Target,
    Research,
    Locate,
}

/// Per-action parameters, all optional while the row is being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionArgs {
    /// Surveyed object type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectType>,
    /// First sector of a survey range.
    #[serde(default, rename = "startSector", skip_serializing_if = "Option::is_none")]
    pub start_sector: Option<u32>,
    /// Last sector of a survey range.
    #[serde(default, rename = "endSector", skip_serializing_if = "Option::is_none")]
    pub end_sector: Option<u32>,
    /// Targeted sector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<u32>,
    /// Research area letter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl ActionArgs {
    pub fn is_empty(&self) -> bool {
        self.object.is_none()
            && self.start_sector.is_none()
            && self.end_sector.is_none()
            && self.sector.is_none()
            && self.area.is_none()
    }
}

/// Number of sectors a survey from `start` to `end` covers, inclusive,
/// wrapping clockwise.
pub fn survey_span(start: u32, end: u32, num_sectors: u32) -> u32 {
    ((end + num_sectors - start) % num_sectors) + 1
}

/// Time cost of a survey by span: 4 for spans 1-3, then one less per
/// three extra sectors, never below 1.
pub fn survey_cost(span: u32) -> u32 {
    (4u32.saturating_sub((span - 1) / 3)).max(1)
}

/// A survey's end sector can be at most half the board away from its start.
pub fn survey_sector_limit(num_sectors: u32) -> u32 {
    num_sectors / 2
}

/// Time cost of a move, or `None` while required parameters are missing.
pub fn time_cost(kind: ActionKind, args: &ActionArgs, num_sectors: u32) -> Option<u32> {
    match kind {
        ActionKind::Survey => {
            let start = args.start_sector?;
            let end = args.end_sector?;
            Some(survey_cost(survey_span(start, end, num_sectors)))
        }
        ActionKind::Target => Some(TARGET_COST),
        ActionKind::Research => Some(RESEARCH_COST),
        ActionKind::Locate => Some(LOCATE_COST),
    }
}

/// A completed move, as seen by the sequencing validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub move_num: u32,
    pub player: PlayerColor,
    pub action: ActionKind,
}

/// Advisory message about a recorded move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIssue {
    pub move_num: u32,
    pub player: PlayerColor,
    pub message: String,
}

/// Scans each player's moves in order and flags sequencing violations:
/// a research immediately after that player's previous research, and any
/// target beyond the second.
pub fn validate_moves(moves: &[MoveSummary]) -> Vec<MoveIssue> {
    let mut issues = Vec::new();
    for color in PlayerColor::ALL {
        let mut prev_action: Option<ActionKind> = None;
        let mut target_count = 0u32;
        for m in moves.iter().filter(|m| m.player == color) {
            match m.action {
                ActionKind::Research => {
                    if prev_action == Some(ActionKind::Research) {
                        issues.push(MoveIssue {
                            move_num: m.move_num,
                            player: color,
                            message: format!(
                                "Player {}: Cannot research two times in a row",
                                color.label()
                            ),
                        });
                    }
                }
                ActionKind::Target => {
                    target_count += 1;
                    if target_count > 2 {
                        issues.push(MoveIssue {
                            move_num: m.move_num,
                            player: color,
                            message: format!(
                                "Player {}: Cannot target more than two times",
                                color.label()
                            ),
                        });
                    }
                }
                _ => {}
            }
            prev_action = Some(m.action);
        }
    }
    issues.sort_by_key(|issue| issue.move_num);
    issues
}

/// Comet surveys are only legal over prime sectors. Returns a message for
/// each chosen non-prime endpoint.
pub fn comet_survey_issue(args: &ActionArgs) -> Option<String> {
    if args.object != Some(ObjectType::Comet) {
        return None;
    }
    let mut bad = Vec::new();
    if let Some(start) = args.start_sector {
        if !is_prime(start) {
            bad.push(start);
        }
    }
    if let Some(end) = args.end_sector {
        if !is_prime(end) {
            bad.push(end);
        }
    }
    if bad.is_empty() {
        None
    } else {
        let sectors: Vec<String> = bad.iter().map(|s| s.to_string()).collect();
        Some(format!(
            "Comets can only be surveyed in prime sectors (sector {})",
            sectors.join(", sector ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_span_wraps() {
        assert_eq!(survey_span(1, 1, 12), 1);
        assert_eq!(survey_span(1, 6, 12), 6);
        assert_eq!(survey_span(11, 2, 12), 4);
    }

    #[test]
    fn test_survey_cost_steps() {
        assert_eq!(survey_cost(1), 4);
        assert_eq!(survey_cost(3), 4);
        assert_eq!(survey_cost(4), 3);
        assert_eq!(survey_cost(6), 3);
        assert_eq!(survey_cost(7), 2);
        assert_eq!(survey_cost(9), 2);
        assert_eq!(survey_cost(10), 1);
        assert_eq!(survey_cost(18), 1);
    }

    #[test]
    fn test_time_cost_fixed_actions() {
        let args = ActionArgs::default();
        assert_eq!(time_cost(ActionKind::Target, &args, 12), Some(4));
        assert_eq!(time_cost(ActionKind::Research, &args, 12), Some(1));
        assert_eq!(time_cost(ActionKind::Locate, &args, 12), Some(5));
    }

    #[test]
    fn test_time_cost_survey_incomplete() {
        let args = ActionArgs {
            start_sector: Some(2),
            ..Default::default()
        };
        assert_eq!(time_cost(ActionKind::Survey, &args, 12), None);

        let args = ActionArgs {
            start_sector: Some(2),
            end_sector: Some(5),
            ..Default::default()
        };
        assert_eq!(time_cost(ActionKind::Survey, &args, 12), Some(3));
    }

    #[test]
    fn test_back_to_back_research_flagged() {
        let moves = vec![
            summary(1, PlayerColor::Blue, ActionKind::Research),
            summary(2, PlayerColor::Red, ActionKind::Research),
            summary(3, PlayerColor::Blue, ActionKind::Research),
        ];
        let issues = validate_moves(&moves);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].move_num, 3);
        assert_eq!(issues[0].player, PlayerColor::Blue);
        assert!(issues[0].message.contains("research two times in a row"));
    }

    #[test]
    fn test_research_separated_by_other_action_ok() {
        let moves = vec![
            summary(1, PlayerColor::Blue, ActionKind::Research),
            summary(2, PlayerColor::Blue, ActionKind::Target),
            summary(3, PlayerColor::Blue, ActionKind::Research),
        ];
        assert!(validate_moves(&moves).is_empty());
    }

    #[test]
    fn test_third_target_flagged() {
        let moves = vec![
            summary(1, PlayerColor::Yellow, ActionKind::Target),
            summary(2, PlayerColor::Yellow, ActionKind::Survey),
            summary(3, PlayerColor::Yellow, ActionKind::Target),
            summary(4, PlayerColor::Yellow, ActionKind::Target),
        ];
        let issues = validate_moves(&moves);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].move_num, 4);
        assert!(issues[0].message.contains("more than two times"));
    }

    #[test]
    fn test_comet_survey_prime_only() {
        let args = ActionArgs {
            object: Some(ObjectType::Comet),
            start_sector: Some(2),
            end_sector: Some(5),
            ..Default::default()
        };
        assert!(comet_survey_issue(&args).is_none());

        let args = ActionArgs {
            object: Some(ObjectType::Comet),
            start_sector: Some(4),
            end_sector: Some(5),
            ..Default::default()
        };
        let msg = comet_survey_issue(&args).unwrap();
        assert!(msg.contains("sector 4"));

        let args = ActionArgs {
            object: Some(ObjectType::Asteroid),
            start_sector: Some(4),
            end_sector: Some(6),
            ..Default::default()
        };
        assert!(comet_survey_issue(&args).is_none());
    }

    #[test]
    fn test_survey_sector_limit() {
        assert_eq!(survey_sector_limit(12), 6);
        assert_eq!(survey_sector_limit(18), 9);
    }

    fn summary(move_num: u32, player: PlayerColor, action: ActionKind) -> MoveSummary {
        MoveSummary { move_num, player, action }
    }
}
