//! Theory submission progress state machine.

use serde::{Deserialize, Serialize};

/// How far a submitted theory has advanced toward peer review.
///
/// Serialized as its integer stage so saved games stay compact and ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TheoryProgress {
    #[default]
    NotSubmitted,
    Placed,
    Advanced,
    Approaching,
    PeerReview,
}

impl TheoryProgress {
    pub fn stage(self) -> u8 {
        self as u8
    }

    /// Next stage, saturating at peer review.
    pub fn advanced(self) -> TheoryProgress {
        match self {
            TheoryProgress::NotSubmitted => TheoryProgress::NotSubmitted,
            TheoryProgress::Placed => TheoryProgress::Advanced,
            TheoryProgress::Advanced => TheoryProgress::Approaching,
            TheoryProgress::Approaching => TheoryProgress::PeerReview,
            TheoryProgress::PeerReview => TheoryProgress::PeerReview,
        }
    }

    /// Placed but not yet at peer review. Only in-flight theories move when
    /// all theories advance together.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            TheoryProgress::Placed | TheoryProgress::Advanced | TheoryProgress::Approaching
        )
    }
}

impl From<TheoryProgress> for u8 {
    fn from(progress: TheoryProgress) -> u8 {
        progress.stage()
    }
}

impl TryFrom<u8> for TheoryProgress {
    type Error = String;

    fn try_from(value: u8) -> Result<TheoryProgress, String> {
        match value {
            0 => Ok(TheoryProgress::NotSubmitted),
            1 => Ok(TheoryProgress::Placed),
            2 => Ok(TheoryProgress::Advanced),
            3 => Ok(TheoryProgress::Approaching),
            // older saves occasionally wrote stages past the end
            _ => Ok(TheoryProgress::PeerReview),
        }
    }
}

/// Outcome once a theory reaches peer review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TheoryResult {
    #[default]
    Pending,
    Correct,
    Incorrect,
}

/// Translates the old two-boolean save format into progress + result.
///
/// Correct theories count regardless of the recorded stage; revealed but
/// incorrect ones are marked as such; anything revealed is forced to peer
/// review.
pub fn from_legacy_flags(
    revealed: bool,
    correct: bool,
    progress: TheoryProgress,
) -> (TheoryProgress, TheoryResult) {
    let result = if correct {
        TheoryResult::Correct
    } else if revealed {
        TheoryResult::Incorrect
    } else {
        TheoryResult::Pending
    };
    let progress = if revealed && progress < TheoryProgress::PeerReview {
        TheoryProgress::PeerReview
    } else {
        progress
    };
    (progress, result)
}
