//! The companion engine: one facade a view layer drives.
//!
//! Every mutation runs the same synchronous pipeline: apply the change,
//! let inference do its work, recompute the clock, evaluate phase
//! triggers, and arm the debounced history/save deadline. The host calls
//! [`CompanionEngine::tick`] with the current time to flush the debounce;
//! nothing here spawns a task or reads a clock of its own.

use std::collections::BTreeMap;

use thiserror::Error;

use planetx_logic::mode::{ModeConfig, ObjectType, PlayerColor};
use planetx_logic::moves::MoveIssue;
use planetx_logic::score;
use planetx_logic::sectors::{self, VisibleSky};

use crate::clock::{NextTurn, TurnClock};
use crate::hints::{HintBoard, HintError, HintState};
use crate::history::History;
use crate::ledger::{LedgerError, MoveEdit, MoveLedger};
use crate::persist::{
    self, KvStore, NotificationSink, NoticeKind, PersistError,
};
use crate::session::{GameSession, GameSettings, ResearchNote};
use crate::theories::{TheoryEdit, TheoryError, TheoryTracker};
use crate::triggers::{PhaseAlert, PhaseTrigger};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a game needs at least one player")]
    NoPlayers,
    #[error("unknown game mode {0:?}")]
    UnknownMode(String),
    #[error(transparent)]
    Hint(#[from] HintError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Theory(#[from] TheoryError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub struct CompanionEngine {
    mode: ModeConfig,
    settings: GameSettings,
    timestamp: u64,
    hints: HintBoard,
    ledger: MoveLedger,
    theories: TheoryTracker,
    trigger: PhaseTrigger,
    history: History,
    research_notes: BTreeMap<String, ResearchNote>,
    sector_notes: BTreeMap<u32, String>,
    score_calc: BTreeMap<String, String>,
    kv: Box<dyn KvStore>,
    sink: Box<dyn NotificationSink>,
}

impl CompanionEngine {
    /// Starts a fresh game and persists its initial state.
    pub fn start(
        settings: GameSettings,
        kv: Box<dyn KvStore>,
        sink: Box<dyn NotificationSink>,
        now_ms: u64,
    ) -> Result<CompanionEngine, EngineError> {
        if settings.player_colors.is_empty() {
            return Err(EngineError::NoPlayers);
        }
        let mode = ModeConfig::by_name(&settings.mode)
            .ok_or_else(|| EngineError::UnknownMode(settings.mode.clone()))?;
        let mut engine = CompanionEngine {
            hints: HintBoard::new(&mode),
            ledger: MoveLedger::new(&mode),
            theories: TheoryTracker::new(&mode),
            trigger: PhaseTrigger::new(),
            history: History::new(),
            research_notes: BTreeMap::new(),
            sector_notes: BTreeMap::new(),
            score_calc: BTreeMap::new(),
            mode,
            settings,
            timestamp: now_ms,
            kv,
            sink,
        };
        engine.trigger.sync_position(engine.clock().earth_sector());
        let snapshot = engine.snapshot();
        engine.history.record(&snapshot);
        persist::save_session(engine.kv.as_mut(), &snapshot)?;
        Ok(engine)
    }

    /// Resumes the saved game, if any. `Ok(None)` means no usable save.
    pub fn resume(
        kv: Box<dyn KvStore>,
        sink: Box<dyn NotificationSink>,
        now_ms: u64,
    ) -> Result<Option<CompanionEngine>, EngineError> {
        let Some(session) = persist::load_session(kv.as_ref()) else {
            return Ok(None);
        };
        let mode = ModeConfig::by_name(&session.settings.mode)
            .ok_or_else(|| EngineError::UnknownMode(session.settings.mode.clone()))?;
        let mut engine = CompanionEngine {
            hints: HintBoard::new(&mode),
            ledger: MoveLedger::new(&mode),
            theories: TheoryTracker::new(&mode),
            trigger: PhaseTrigger::new(),
            history: History::new(),
            research_notes: BTreeMap::new(),
            sector_notes: BTreeMap::new(),
            score_calc: BTreeMap::new(),
            settings: session.settings.clone(),
            timestamp: now_ms,
            mode,
            kv,
            sink,
        };
        engine.restore_components(&session);
        let (conferences, theory_sectors) =
            persist::load_seen_flags(engine.kv.as_ref(), &engine.mode);
        engine.trigger.restore_seen(conferences, theory_sectors);
        engine.trigger.sync_position(engine.clock().earth_sector());
        engine.history.record(&engine.snapshot());
        engine.sink.notify(NoticeKind::Info, "Restored saved game");
        Ok(Some(engine))
    }

    /// Clears storage and starts over with the same settings.
    pub fn reset(&mut self, now_ms: u64) -> Result<(), EngineError> {
        persist::clear_session(self.kv.as_mut(), &self.mode);
        self.hints = HintBoard::new(&self.mode);
        self.ledger = MoveLedger::new(&self.mode);
        self.theories = TheoryTracker::new(&self.mode);
        self.trigger.reset();
        self.history.reset();
        self.research_notes.clear();
        self.sector_notes.clear();
        self.score_calc.clear();
        self.timestamp = now_ms;
        self.trigger.sync_position(self.clock().earth_sector());
        let snapshot = self.snapshot();
        self.history.record(&snapshot);
        persist::save_session(self.kv.as_mut(), &snapshot)?;
        Ok(())
    }

    // --- mutations ---

    pub fn toggle_hint(
        &mut self,
        object: ObjectType,
        sector: u32,
        state: HintState,
        now_ms: u64,
    ) -> Result<HintState, EngineError> {
        let result = self.hints.toggle(object, sector, state)?;
        self.after_mutation(now_ms)?;
        Ok(result)
    }

    pub fn edit_move(
        &mut self,
        move_num: u32,
        edit: MoveEdit,
        now_ms: u64,
    ) -> Result<(), EngineError> {
        self.ledger.edit(move_num, edit)?;
        for issue in self.ledger.issues() {
            if issue.move_num == move_num {
                self.sink.notify(NoticeKind::Warning, &issue.message);
            }
        }
        self.after_mutation(now_ms)
    }

    pub fn edit_theory(
        &mut self,
        index: usize,
        edit: TheoryEdit,
        now_ms: u64,
    ) -> Result<(), EngineError> {
        self.theories.edit(index, edit)?;
        self.after_mutation(now_ms)
    }

    pub fn advance_theories(&mut self, now_ms: u64) -> Result<(), EngineError> {
        self.theories.advance_all();
        self.after_mutation(now_ms)
    }

    pub fn set_research_note(
        &mut self,
        area: &str,
        note: ResearchNote,
        now_ms: u64,
    ) -> Result<(), EngineError> {
        self.research_notes.insert(area.to_string(), note);
        self.after_mutation(now_ms)
    }

    pub fn set_sector_note(
        &mut self,
        sector: u32,
        text: &str,
        now_ms: u64,
    ) -> Result<(), EngineError> {
        if text.is_empty() {
            self.sector_notes.remove(&sector);
        } else {
            self.sector_notes.insert(sector, text.to_string());
        }
        self.after_mutation(now_ms)
    }

    pub fn set_score_field(
        &mut self,
        field: &str,
        value: &str,
        now_ms: u64,
    ) -> Result<(), EngineError> {
        if value.is_empty() {
            self.score_calc.remove(field);
        } else {
            self.score_calc.insert(field.to_string(), value.to_string());
        }
        self.after_mutation(now_ms)
    }

    /// Holds back the ledger's trailing blank row while the sky map
    /// streams input. Pure UI state; not recorded in history.
    pub fn lock_move_row(&mut self) -> Option<u32> {
        self.ledger.lock_open_row()
    }

    pub fn release_move_row(&mut self) {
        self.ledger.release_lock();
    }

    /// Closes the active theory-phase modal; the next queued one, if any,
    /// is presented immediately.
    pub fn dismiss_alert(&mut self) -> Option<PhaseAlert> {
        let next = self.trigger.dismiss_active();
        if let Some(alert) = &next {
            self.sink.present(alert);
        }
        next
    }

    /// Flushes the debounced history entry and save when due.
    pub fn tick(&mut self, now_ms: u64) -> Result<(), EngineError> {
        if !self.history.save_due(now_ms) {
            return Ok(());
        }
        self.timestamp = now_ms;
        let snapshot = self.snapshot();
        self.history.record(&snapshot);
        persist::save_session(self.kv.as_mut(), &snapshot)?;
        self.history.clear_pending();
        Ok(())
    }

    /// Steps back one recorded state. Returns false with nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EngineError> {
        let current = self.snapshot();
        let Some(previous) = self.history.undo(&current) else {
            return Ok(false);
        };
        self.apply_snapshot(&previous)?;
        Ok(true)
    }

    /// Steps forward again after an undo.
    pub fn redo(&mut self) -> Result<bool, EngineError> {
        let current = self.snapshot();
        let Some(next) = self.history.redo(&current) else {
            return Ok(false);
        };
        self.apply_snapshot(&next)?;
        Ok(true)
    }

    fn apply_snapshot(&mut self, snapshot: &GameSession) -> Result<(), EngineError> {
        self.history.begin_restore();
        self.restore_components(snapshot);
        self.history.end_restore();
        // reseat the board without replaying phase alerts
        self.trigger.sync_position(self.clock().earth_sector());
        persist::save_session(self.kv.as_mut(), snapshot)?;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- snapshots ---

    /// The current state as a session document.
    pub fn snapshot(&self) -> GameSession {
        GameSession {
            settings: self.settings.clone(),
            timestamp: self.timestamp,
            hints: self.hints.to_entries(),
            moves: self.ledger.to_records(),
            theories: self.theories.to_records(),
            research_notes: self.research_notes.clone(),
            sector_notes: self.sector_notes.clone(),
            score_calc: self.score_calc.clone(),
        }
    }

    /// Rebuilds every component from a snapshot. Hint inference does not
    /// run; the board comes back exactly as saved.
    fn restore_components(&mut self, session: &GameSession) {
        self.hints = HintBoard::new(&self.mode);
        self.hints.restore_entries(&session.hints);
        self.ledger = MoveLedger::from_records(&self.mode, &session.moves);
        self.theories = TheoryTracker::from_records(&self.mode, &session.theories);
        self.research_notes = session.research_notes.clone();
        self.sector_notes = session.sector_notes.clone();
        self.score_calc = session.score_calc.clone();
        self.timestamp = session.timestamp;
    }

    /// The recompute half of every mutation: clock, triggers, seen-flag
    /// mirror, alert presentation, debounce arming.
    fn after_mutation(&mut self, now_ms: u64) -> Result<(), EngineError> {
        let clock = self.clock();
        let alerts = self
            .trigger
            .evaluate(&self.mode, clock.max_time(), clock.earth_sector());
        persist::store_seen_flags(
            self.kv.as_mut(),
            self.trigger.seen_conferences(),
            self.trigger.seen_theory_sectors(),
        )?;
        for alert in &alerts {
            self.sink.present(alert);
        }
        self.history.note_mutation(now_ms);
        Ok(())
    }

    // --- queries ---

    pub fn mode(&self) -> &ModeConfig {
        &self.mode
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn hints(&self) -> &HintBoard {
        &self.hints
    }

    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    pub fn theories(&self) -> &TheoryTracker {
        &self.theories
    }

    pub fn research_note(&self, area: &str) -> Option<&ResearchNote> {
        self.research_notes.get(area)
    }

    pub fn sector_note(&self, sector: u32) -> Option<&str> {
        self.sector_notes.get(&sector).map(String::as_str)
    }

    fn clock(&self) -> TurnClock {
        TurnClock::from_ledger(&self.mode, &self.settings.player_colors, &self.ledger)
    }

    pub fn cumulative_time(&self, player: PlayerColor) -> Option<u32> {
        self.clock().cumulative_time(player)
    }

    pub fn next_turn(&self) -> Option<NextTurn> {
        self.clock().next_turn()
    }

    pub fn earth_sector(&self) -> Option<u32> {
        self.clock().earth_sector()
    }

    pub fn visible_sky(&self) -> Option<VisibleSky> {
        self.clock()
            .earth_sector()
            .map(|start| sectors::visible_sky_range(start, self.mode.num_sectors()))
    }

    pub fn move_issues(&self) -> Vec<MoveIssue> {
        self.ledger.issues()
    }

    pub fn score_total(&self) -> i64 {
        score::score_total(&self.mode, &self.score_calc)
    }
}
