//! The theory tracker: who claimed what, where, and how far along it is.
//!
//! Rows follow the same trailing-blank convention as the move ledger. A
//! row auto-places itself the moment all three fields are filled in;
//! advancing moves every in-flight theory one stage at once, the way the
//! board does between phases. Results are recorded independently of
//! progress so a table can mark an early reveal.

use thiserror::Error;

use planetx_logic::mode::{ModeConfig, ObjectType, PlayerColor};
use planetx_logic::theory::{self, TheoryProgress, TheoryResult};

use crate::session::TheoryRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TheoryError {
    #[error("no theory row {0}")]
    NoSuchRow(usize),
    #[error("sector {sector} is out of range 1..={num_sectors}")]
    SectorOutOfRange { sector: u32, num_sectors: u32 },
}

/// A single field change to a theory row.
#[derive(Debug, Clone, PartialEq)]
pub enum TheoryEdit {
    Player(Option<PlayerColor>),
    Object(Option<ObjectType>),
    Sector(Option<u32>),
    Progress(TheoryProgress),
    Result(TheoryResult),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TheoryRow {
    pub player: Option<PlayerColor>,
    pub object: Option<ObjectType>,
    pub sector: Option<u32>,
    pub progress: TheoryProgress,
    pub result: TheoryResult,
}

impl TheoryRow {
    pub fn is_blank(&self) -> bool {
        self.player.is_none()
            && self.object.is_none()
            && self.sector.is_none()
            && self.progress == TheoryProgress::NotSubmitted
            && self.result == TheoryResult::Pending
    }

    /// All three identifying fields chosen.
    pub fn is_complete(&self) -> bool {
        self.player.is_some() && self.object.is_some() && self.sector.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TheoryTracker {
    num_sectors: u32,
    rows: Vec<TheoryRow>,
}

impl TheoryTracker {
    pub fn new(mode: &ModeConfig) -> TheoryTracker {
        TheoryTracker {
            num_sectors: mode.num_sectors(),
            rows: vec![TheoryRow::default()],
        }
    }

    pub fn rows(&self) -> &[TheoryRow] {
        &self.rows
    }

    /// Applies one field change; completing a fresh row places it.
    pub fn edit(&mut self, index: usize, edit: TheoryEdit) -> Result<(), TheoryError> {
        if let TheoryEdit::Sector(Some(sector)) = &edit {
            if *sector == 0 || *sector > self.num_sectors {
                return Err(TheoryError::SectorOutOfRange {
                    sector: *sector,
                    num_sectors: self.num_sectors,
                });
            }
        }
        let row = self
            .rows
            .get_mut(index)
            .ok_or(TheoryError::NoSuchRow(index))?;
        match edit {
            TheoryEdit::Player(player) => row.player = player,
            TheoryEdit::Object(object) => row.object = object,
            TheoryEdit::Sector(sector) => row.sector = sector,
            TheoryEdit::Progress(progress) => row.progress = progress,
            TheoryEdit::Result(result) => row.result = result,
        }
        if row.is_complete() && row.progress == TheoryProgress::NotSubmitted {
            row.progress = TheoryProgress::Placed;
        }
        if index == self.rows.len() - 1 && !self.rows[index].is_blank() {
            self.rows.push(TheoryRow::default());
        }
        Ok(())
    }

    /// Moves every placed-and-complete theory one stage forward. Rows with
    /// a progress but missing fields stay put.
    pub fn advance_all(&mut self) {
        for row in &mut self.rows {
            if row.is_complete() && row.progress.is_in_flight() {
                row.progress = row.progress.advanced();
            }
        }
    }

    pub fn to_records(&self) -> Vec<TheoryRecord> {
        self.rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| TheoryRecord {
                player: row.player,
                object: row.object,
                sector: row.sector,
                progress: row.progress,
                result: row.result,
                revealed: None,
                correct: None,
            })
            .collect()
    }

    /// Rebuilds the tracker from saved records, translating the legacy
    /// revealed/correct flags when present.
    pub fn from_records(mode: &ModeConfig, records: &[TheoryRecord]) -> TheoryTracker {
        let mut rows: Vec<TheoryRow> = records
            .iter()
            .map(|record| {
                let (progress, result) = match (record.revealed, record.correct) {
                    (None, None) => (record.progress, record.result),
                    (revealed, correct) => theory::from_legacy_flags(
                        revealed.unwrap_or(false),
                        correct.unwrap_or(false),
                        record.progress,
                    ),
                };
                TheoryRow {
                    player: record.player,
                    object: record.object,
                    sector: record.sector,
                    progress,
                    result,
                }
            })
            .collect();
        if rows.last().map(|row| !row.is_blank()).unwrap_or(true) {
            rows.push(TheoryRow::default());
        }
        TheoryTracker { num_sectors: mode.num_sectors(), rows }
    }
}
