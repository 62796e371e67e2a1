//! The serializable game session document.
//!
//! [`GameSession`] is the single snapshot of everything a table records:
//! settings, hint cells, move rows, theories, notes, and the score sheet.
//! It is what gets persisted, and what the undo/redo stacks hold. The live
//! components (`HintBoard`, `MoveLedger`, `TheoryTracker`) convert to and
//! from this document; derived state (clock, trigger position) is rebuilt
//! after a restore, never stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use planetx_logic::mode::{Difficulty, PlayerColor};
use planetx_logic::moves::{ActionArgs, ActionKind};
use planetx_logic::theory::{TheoryProgress, TheoryResult};

use crate::hints::HintState;

/// Choices made on the start screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Mode name, resolved against the catalog on load.
    pub mode: String,
    /// Seating order. Ties on the time track break toward the earlier entry.
    #[serde(rename = "playerColors")]
    pub player_colors: Vec<PlayerColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// One row of the move ledger, as persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    #[serde(rename = "moveNum")]
    pub move_num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
    #[serde(
        default,
        rename = "actionArgs",
        skip_serializing_if = "ActionArgs::is_empty"
    )]
    pub action_args: ActionArgs,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// One row of the theory tracker, as persisted.
///
/// `revealed`/`correct` are the pre-progress save format; they are accepted
/// on input and translated, never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TheoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<planetx_logic::mode::ObjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<u32>,
    #[serde(default)]
    pub progress: TheoryProgress,
    #[serde(default)]
    pub result: TheoryResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revealed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

/// Free-text notes for one research area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchNote {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selects: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// The complete session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub settings: GameSettings,
    /// Milliseconds since the epoch at last save.
    pub timestamp: u64,
    /// Hint cells keyed `"<object>-sector<N>"`; unknown cells are omitted.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: BTreeMap<String, HintState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<MoveRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub theories: Vec<TheoryRecord>,
    #[serde(
        default,
        rename = "researchNotes",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub research_notes: BTreeMap<String, ResearchNote>,
    #[serde(
        default,
        rename = "sectorNotes",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub sector_notes: BTreeMap<u32, String>,
    #[serde(
        default,
        rename = "scoreCalc",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub score_calc: BTreeMap<String, String>,
}

impl GameSession {
    /// A fresh session for the given settings, nothing recorded yet.
    pub fn new(settings: GameSettings, timestamp: u64) -> GameSession {
        GameSession {
            settings,
            timestamp,
            hints: BTreeMap::new(),
            moves: Vec::new(),
            theories: Vec::new(),
            research_notes: BTreeMap::new(),
            sector_notes: BTreeMap::new(),
            score_calc: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> GameSettings {
        GameSettings {
            mode: "standard".to_string(),
            player_colors: vec![PlayerColor::Blue, PlayerColor::Red],
            difficulty: Some(Difficulty::Experienced),
        }
    }

    #[test]
    fn round_trips_through_json() {
        let mut session = GameSession::new(settings(), 1_700_000_000_000);
        session
            .hints
            .insert("comet-sector2".to_string(), HintState::Yes);
        session.moves.push(MoveRecord {
            move_num: 1,
            player: Some(PlayerColor::Blue),
            action: Some(ActionKind::Survey),
            action_args: ActionArgs {
                object: Some(planetx_logic::mode::ObjectType::Asteroid),
                start_sector: Some(1),
                end_sector: Some(4),
                ..Default::default()
            },
            notes: "wide sweep".to_string(),
        });
        session.theories.push(TheoryRecord {
            player: Some(PlayerColor::Red),
            object: Some(planetx_logic::mode::ObjectType::Comet),
            sector: Some(2),
            progress: TheoryProgress::Placed,
            ..Default::default()
        });

        let json = serde_json::to_string(&session).unwrap();
        let back: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn document_uses_original_field_names() {
        let session = GameSession::new(settings(), 42);
        let value = serde_json::to_value(&session).unwrap();
        assert!(value["settings"]["playerColors"].is_array());
        assert_eq!(value["settings"]["mode"], "standard");
        assert_eq!(value["settings"]["difficulty"], "experienced");
    }

    #[test]
    fn theory_progress_serializes_as_integer() {
        let record = TheoryRecord {
            progress: TheoryProgress::Approaching,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["progress"], 3);
    }

    #[test]
    fn legacy_theory_fields_accepted() {
        let json = r#"{"player":"blue","object":"comet","sector":2,
                       "progress":1,"revealed":true,"correct":true}"#;
        let record: TheoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.revealed, Some(true));
        assert_eq!(record.correct, Some(true));
        assert_eq!(record.progress, TheoryProgress::Placed);
    }

    #[test]
    fn empty_collections_omitted() {
        let session = GameSession::new(settings(), 42);
        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("hints").is_none());
        assert!(value.get("moves").is_none());
        assert!(value.get("scoreCalc").is_none());
    }
}
