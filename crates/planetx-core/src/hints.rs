//! The hint board: one cell per (object, sector) pair with auto-inference.
//!
//! Cells exist for every object/sector combination except comets in
//! non-prime sectors, which are structurally impossible and never stored.
//! A cell holds one of four states; changing a cell runs a single round of
//! inference driven by the changed cell only (inferred changes do not
//! cascade further):
//!
//! 1. Confirming an object rules every other object in that sector out.
//! 2. Once an object's confirmed count reaches its limit, its remaining
//!    cells are ruled out.
//! 3. Ruling an object out of a sector that already has exactly one
//!    confirmed object rules out the sector's remaining blank cells
//!    (suspected cells are left alone).
//!
//! Over-limit confirmed counts are allowed and surfaced through
//! [`HintBoard::object_count_flag`], never repaired. The user may be
//! recording a mistake the board has to show them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use planetx_logic::mode::{ModeConfig, ObjectType};
use planetx_logic::sectors::is_prime;

/// State of a single hint cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintState {
    #[default]
    Unknown,
    No,
    Suspect,
    Yes,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HintError {
    #[error("sector {sector} is out of range 1..={num_sectors}")]
    SectorOutOfRange { sector: u32, num_sectors: u32 },
    #[error("no hint cell for {object} in sector {sector}")]
    NoSuchCell { object: ObjectType, sector: u32 },
}

/// Tally of a slice of the board by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub yes: u32,
    pub no: u32,
    pub suspect: u32,
    pub blank: u32,
}

impl StateCounts {
    /// Cells still able to hold the object: not confirmed, not ruled out.
    pub fn possible(&self) -> u32 {
        self.suspect + self.blank
    }
}

/// Standing of an object's confirmed count against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFlag {
    /// Confirmed count equals the limit.
    ExactlyMet,
    /// More confirmed than the mode allows. Surfaced, never auto-fixed.
    OverLimit,
    /// Too few unruled-out cells remain to ever reach the limit.
    Unfillable,
    /// Every remaining possible cell must hold the object.
    AllPossibleNeeded,
    Neutral,
}

/// Display colouring for one cell within its sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFlag {
    Success,
    Danger,
    Info,
    Disabled,
    Plain,
}

/// The full hint grid for one game.
#[derive(Debug, Clone, PartialEq)]
pub struct HintBoard {
    num_sectors: u32,
    limits: BTreeMap<ObjectType, u32>,
    cells: BTreeMap<(ObjectType, u32), HintState>,
}

impl HintBoard {
    /// An all-unknown board shaped by the mode's object table.
    pub fn new(mode: &ModeConfig) -> HintBoard {
        let mut cells = BTreeMap::new();
        let num_sectors = mode.num_sectors();
        for spec in &mode.objects {
            for sector in 1..=num_sectors {
                if spec.object == ObjectType::Comet && !is_prime(sector) {
                    continue;
                }
                cells.insert((spec.object, sector), HintState::Unknown);
            }
        }
        HintBoard {
            num_sectors,
            limits: mode
                .objects
                .iter()
                .map(|spec| (spec.object, spec.count))
                .collect(),
            cells,
        }
    }

    pub fn num_sectors(&self) -> u32 {
        self.num_sectors
    }

    pub fn get(&self, object: ObjectType, sector: u32) -> Option<HintState> {
        self.cells.get(&(object, sector)).copied()
    }

    fn check_cell(&self, object: ObjectType, sector: u32) -> Result<(), HintError> {
        if sector == 0 || sector > self.num_sectors {
            return Err(HintError::SectorOutOfRange {
                sector,
                num_sectors: self.num_sectors,
            });
        }
        if !self.cells.contains_key(&(object, sector)) {
            return Err(HintError::NoSuchCell { object, sector });
        }
        Ok(())
    }

    /// Sets a cell to a state (radio semantics) and runs inference.
    pub fn set(
        &mut self,
        object: ObjectType,
        sector: u32,
        state: HintState,
    ) -> Result<(), HintError> {
        self.check_cell(object, sector)?;
        self.cells.insert((object, sector), state);
        self.infer(object, sector, state);
        Ok(())
    }

    /// Click semantics: pressing the already-active state clears the cell
    /// back to unknown. Returns the state the cell ended up in.
    pub fn toggle(
        &mut self,
        object: ObjectType,
        sector: u32,
        state: HintState,
    ) -> Result<HintState, HintError> {
        self.check_cell(object, sector)?;
        let current = self.cells[&(object, sector)];
        let next = if current == state {
            HintState::Unknown
        } else {
            state
        };
        self.cells.insert((object, sector), next);
        self.infer(object, sector, next);
        Ok(next)
    }

    /// Writes a cell without inference. Restores use this so a loaded
    /// board reproduces its saved state exactly.
    pub fn set_raw(
        &mut self,
        object: ObjectType,
        sector: u32,
        state: HintState,
    ) -> Result<(), HintError> {
        self.check_cell(object, sector)?;
        self.cells.insert((object, sector), state);
        Ok(())
    }

    /// One inference round for the cell that just changed. Inferred "no"
    /// writes are plain writes; they do not trigger further inference.
    fn infer(&mut self, object: ObjectType, sector: u32, new_state: HintState) {
        // 1. confirmation cascade
        if new_state == HintState::Yes {
            let others: Vec<ObjectType> = self
                .cells
                .keys()
                .filter(|(o, s)| *s == sector && *o != object)
                .map(|(o, _)| *o)
                .collect();
            for other in others {
                self.cells.insert((other, sector), HintState::No);
            }
        }

        // 2. count completion for the changed object
        let counts = self.count_for_object(object);
        if let Some(&limit) = self.limits.get(&object) {
            if counts.yes == limit {
                let remaining: Vec<u32> = self
                    .cells
                    .iter()
                    .filter(|((o, _), state)| *o == object && **state != HintState::Yes)
                    .map(|((_, s), _)| *s)
                    .collect();
                for s in remaining {
                    self.cells.insert((object, s), HintState::No);
                }
            }
        }

        // 3. sector exclusivity repair: a fresh "no" in a sector with one
        // confirmed object rules the sector's blanks out too
        if new_state == HintState::No {
            let sector_counts = self.count_for_sector(sector);
            if sector_counts.yes == 1 {
                let blanks: Vec<ObjectType> = self
                    .cells
                    .iter()
                    .filter(|((_, s), state)| *s == sector && **state == HintState::Unknown)
                    .map(|((o, _), _)| *o)
                    .collect();
                for o in blanks {
                    self.cells.insert((o, sector), HintState::No);
                }
            }
        }
    }

    pub fn count_for_object(&self, object: ObjectType) -> StateCounts {
        self.tally(|(o, _)| *o == object)
    }

    pub fn count_for_sector(&self, sector: u32) -> StateCounts {
        self.tally(|(_, s)| *s == sector)
    }

    fn tally(&self, keep: impl Fn(&(ObjectType, u32)) -> bool) -> StateCounts {
        let mut counts = StateCounts::default();
        for (key, state) in &self.cells {
            if !keep(key) {
                continue;
            }
            match state {
                HintState::Yes => counts.yes += 1,
                HintState::No => counts.no += 1,
                HintState::Suspect => counts.suspect += 1,
                HintState::Unknown => counts.blank += 1,
            }
        }
        counts
    }

    /// Standing of an object's confirmed count against its mode limit.
    pub fn object_count_flag(&self, object: ObjectType) -> CountFlag {
        let limit = self.limits.get(&object).copied().unwrap_or(0);
        let counts = self.count_for_object(object);
        if counts.yes == limit {
            CountFlag::ExactlyMet
        } else if counts.yes > limit {
            CountFlag::OverLimit
        } else if counts.yes + counts.possible() == limit {
            CountFlag::AllPossibleNeeded
        } else if counts.yes + counts.possible() < limit {
            CountFlag::Unfillable
        } else {
            CountFlag::Neutral
        }
    }

    /// Display colouring for every cell in a sector. A fully ruled-out
    /// sector shows all danger; otherwise confirmed cells are green when
    /// the sector has exactly one confirmation and red when several.
    pub fn sector_cell_flags(&self, sector: u32) -> Vec<(ObjectType, CellFlag)> {
        let counts = self.count_for_sector(sector);
        let all_ruled_out = counts.yes + counts.possible() == 0;
        let yes_flag = if counts.yes == 1 {
            CellFlag::Success
        } else {
            CellFlag::Danger
        };
        self.cells
            .iter()
            .filter(|((_, s), _)| *s == sector)
            .map(|((o, _), state)| {
                let flag = if all_ruled_out {
                    CellFlag::Danger
                } else {
                    match state {
                        HintState::Yes => yes_flag,
                        HintState::No => CellFlag::Disabled,
                        HintState::Suspect => CellFlag::Info,
                        HintState::Unknown => CellFlag::Plain,
                    }
                };
                (*o, flag)
            })
            .collect()
    }

    /// Non-unknown cells as the persisted `"<object>-sector<N>"` map.
    pub fn to_entries(&self) -> BTreeMap<String, HintState> {
        self.cells
            .iter()
            .filter(|(_, state)| **state != HintState::Unknown)
            .map(|((o, s), state)| (hint_key(*o, *s), *state))
            .collect()
    }

    /// Loads saved entries without inference. Entries naming cells this
    /// board doesn't have are logged and skipped.
    pub fn restore_entries(&mut self, entries: &BTreeMap<String, HintState>) {
        for state in self.cells.values_mut() {
            *state = HintState::Unknown;
        }
        for (key, state) in entries {
            match parse_hint_key(key) {
                Some((object, sector)) if self.cells.contains_key(&(object, sector)) => {
                    self.cells.insert((object, sector), *state);
                }
                _ => tracing::warn!(%key, "skipping hint entry for unknown cell"),
            }
        }
    }
}

/// Persisted key for a cell, e.g. `"comet-sector2"`.
pub fn hint_key(object: ObjectType, sector: u32) -> String {
    format!("{}-sector{}", object.key(), sector)
}

pub fn parse_hint_key(key: &str) -> Option<(ObjectType, u32)> {
    let (object_key, sector) = key.rsplit_once("-sector")?;
    Some((ObjectType::from_key(object_key)?, sector.parse().ok()?))
}
