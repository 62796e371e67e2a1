//! The move ledger: ordered rows of recorded moves.
//!
//! The ledger always ends in one blank row waiting for input. Editing any
//! field of that open row appends a fresh blank row behind it, unless the
//! sky-map collaborator holds the input lock, in which case appension is
//! deferred until the lock is released. Costs recompute on every edit;
//! sequencing problems are advisory and reported through [`MoveLedger::issues`].

use thiserror::Error;

use planetx_logic::mode::{ModeConfig, ObjectType, PlayerColor};
use planetx_logic::moves::{
    self, ActionArgs, ActionKind, MoveIssue, MoveSummary,
};

use crate::session::MoveRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no move numbered {0}")]
    NoSuchMove(u32),
    #[error("sector {sector} is out of range 1..={num_sectors}")]
    SectorOutOfRange { sector: u32, num_sectors: u32 },
    #[error("survey from sector {start} cannot extend past {limit} sectors")]
    SurveyTooWide { start: u32, limit: u32 },
}

/// A single field change to a move row.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveEdit {
    Player(Option<PlayerColor>),
    /// Changing the action clears the previous action's parameters.
    Action(Option<ActionKind>),
    SurveyObject(Option<ObjectType>),
    SurveyStart(Option<u32>),
    SurveyEnd(Option<u32>),
    TargetSector(Option<u32>),
    ResearchArea(Option<String>),
    Notes(String),
}

/// One row of the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveRow {
    pub move_num: u32,
    pub player: Option<PlayerColor>,
    pub action: Option<ActionKind>,
    pub args: ActionArgs,
    pub notes: String,
}

impl MoveRow {
    pub fn is_blank(&self) -> bool {
        self.player.is_none()
            && self.action.is_none()
            && self.args.is_empty()
            && self.notes.is_empty()
    }

    /// A row counts toward the clock once player and action are chosen.
    pub fn is_completed(&self) -> bool {
        self.player.is_some() && self.action.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveLedger {
    num_sectors: u32,
    rows: Vec<MoveRow>,
    locked_row: Option<u32>,
}

impl MoveLedger {
    pub fn new(mode: &ModeConfig) -> MoveLedger {
        MoveLedger {
            num_sectors: mode.num_sectors(),
            rows: vec![MoveRow { move_num: 1, ..Default::default() }],
            locked_row: None,
        }
    }

    pub fn rows(&self) -> &[MoveRow] {
        &self.rows
    }

    pub fn row(&self, move_num: u32) -> Option<&MoveRow> {
        self.rows.iter().find(|row| row.move_num == move_num)
    }

    /// Rows with both a player and an action chosen, in order.
    pub fn completed_rows(&self) -> impl Iterator<Item = &MoveRow> {
        self.rows.iter().filter(|row| row.is_completed())
    }

    /// Time cost of a row, or `None` while its parameters are incomplete.
    pub fn time_cost_of(&self, row: &MoveRow) -> Option<u32> {
        moves::time_cost(row.action?, &row.args, self.num_sectors)
    }

    fn check_sector(&self, sector: u32) -> Result<(), LedgerError> {
        if sector == 0 || sector > self.num_sectors {
            return Err(LedgerError::SectorOutOfRange {
                sector,
                num_sectors: self.num_sectors,
            });
        }
        Ok(())
    }

    /// Applies one field change. Rejected edits leave the ledger untouched.
    pub fn edit(&mut self, move_num: u32, edit: MoveEdit) -> Result<(), LedgerError> {
        // validate against current state before mutating anything
        if let MoveEdit::SurveyStart(Some(sector))
        | MoveEdit::SurveyEnd(Some(sector))
        | MoveEdit::TargetSector(Some(sector)) = &edit
        {
            self.check_sector(*sector)?;
        }
        let row = self
            .rows
            .iter()
            .find(|row| row.move_num == move_num)
            .ok_or(LedgerError::NoSuchMove(move_num))?;
        let (start, end) = match &edit {
            MoveEdit::SurveyStart(new_start) => (*new_start, row.args.end_sector),
            MoveEdit::SurveyEnd(new_end) => (row.args.start_sector, *new_end),
            _ => (None, None),
        };
        if let (Some(start), Some(end)) = (start, end) {
            let limit = moves::survey_sector_limit(self.num_sectors);
            if moves::survey_span(start, end, self.num_sectors) > limit {
                return Err(LedgerError::SurveyTooWide { start, limit });
            }
        }

        let row = self
            .rows
            .iter_mut()
            .find(|row| row.move_num == move_num)
            .ok_or(LedgerError::NoSuchMove(move_num))?;
        match edit {
            MoveEdit::Player(player) => row.player = player,
            MoveEdit::Action(action) => {
                row.action = action;
                row.args = ActionArgs::default();
            }
            MoveEdit::SurveyObject(object) => row.args.object = object,
            MoveEdit::SurveyStart(sector) => row.args.start_sector = sector,
            MoveEdit::SurveyEnd(sector) => row.args.end_sector = sector,
            MoveEdit::TargetSector(sector) => row.args.sector = sector,
            MoveEdit::ResearchArea(area) => row.args.area = area,
            MoveEdit::Notes(notes) => row.notes = notes,
        }
        self.row_touched(move_num);
        Ok(())
    }

    /// Keeps the trailing-blank invariant after a row changed.
    fn row_touched(&mut self, move_num: u32) {
        let is_open_row = self.rows.last().is_some_and(|row| row.move_num == move_num);
        if !is_open_row {
            return;
        }
        if self.locked_row == Some(move_num) {
            return;
        }
        if self.rows.last().is_some_and(|row| !row.is_blank()) {
            self.append_blank();
        }
    }

    fn append_blank(&mut self) {
        let next = self.rows.last().map(|row| row.move_num + 1).unwrap_or(1);
        self.rows.push(MoveRow { move_num: next, ..Default::default() });
    }

    /// Holds back the trailing blank row while the sky map streams input
    /// into the open row. Returns the locked row's number.
    pub fn lock_open_row(&mut self) -> Option<u32> {
        let move_num = self.rows.last()?.move_num;
        self.locked_row = Some(move_num);
        Some(move_num)
    }

    /// Releases the input lock; if the held row was filled in meanwhile,
    /// the deferred blank row is appended now.
    pub fn release_lock(&mut self) {
        if let Some(move_num) = self.locked_row.take() {
            let filled = self
                .row(move_num)
                .is_some_and(|row| !row.is_blank());
            let is_last = self.rows.last().is_some_and(|row| row.move_num == move_num);
            if filled && is_last {
                self.append_blank();
            }
        }
    }

    pub fn locked_row(&self) -> Option<u32> {
        self.locked_row
    }

    /// Advisory sequencing and comet-survey problems across all rows.
    pub fn issues(&self) -> Vec<MoveIssue> {
        let summaries: Vec<MoveSummary> = self
            .completed_rows()
            .filter_map(|row| {
                Some(MoveSummary {
                    move_num: row.move_num,
                    player: row.player?,
                    action: row.action?,
                })
            })
            .collect();
        let mut issues = moves::validate_moves(&summaries);
        for row in self.completed_rows() {
            if row.action != Some(ActionKind::Survey) {
                continue;
            }
            if let (Some(player), Some(message)) =
                (row.player, moves::comet_survey_issue(&row.args))
            {
                issues.push(MoveIssue { move_num: row.move_num, player, message });
            }
        }
        issues.sort_by_key(|issue| issue.move_num);
        issues
    }

    pub fn to_records(&self) -> Vec<MoveRecord> {
        self.rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| MoveRecord {
                move_num: row.move_num,
                player: row.player,
                action: row.action,
                action_args: row.args.clone(),
                notes: row.notes.clone(),
            })
            .collect()
    }

    /// Rebuilds the ledger from saved records, re-establishing the
    /// trailing blank row. No validation runs; saves are trusted.
    pub fn from_records(mode: &ModeConfig, records: &[MoveRecord]) -> MoveLedger {
        let mut rows: Vec<MoveRow> = records
            .iter()
            .map(|record| MoveRow {
                move_num: record.move_num,
                player: record.player,
                action: record.action,
                args: record.action_args.clone(),
                notes: record.notes.clone(),
            })
            .collect();
        rows.sort_by_key(|row| row.move_num);
        let mut ledger = MoveLedger {
            num_sectors: mode.num_sectors(),
            rows,
            locked_row: None,
        };
        if ledger.rows.last().map(|row| !row.is_blank()).unwrap_or(true) {
            ledger.append_blank();
        }
        ledger
    }
}
