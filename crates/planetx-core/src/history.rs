//! Undo/redo history and the debounced save deadline.
//!
//! The stacks hold whole session snapshots: undo holds the states reached
//! after each recorded change, redo holds states undone from. Recording is
//! driven through a debounce deadline against a caller-supplied clock, so
//! a burst of edits collapses into one history entry. There are no timers
//! here; the owner calls [`History::tick`] with the current time.

use crate::session::GameSession;

pub const MAX_HISTORY: usize = 100;
pub const SAVE_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<GameSession>,
    redo_stack: Vec<GameSession>,
    restoring: bool,
    save_due_at: Option<u64>,
}

impl History {
    pub fn new() -> History {
        History::default()
    }

    /// Marks a change, (re)arming the debounce window.
    pub fn note_mutation(&mut self, now_ms: u64) {
        if self.restoring {
            return;
        }
        self.save_due_at = Some(now_ms + SAVE_DEBOUNCE_MS);
    }

    /// Whether the debounce window has elapsed.
    pub fn save_due(&self, now_ms: u64) -> bool {
        self.save_due_at.is_some_and(|due| now_ms >= due)
    }

    pub fn clear_pending(&mut self) {
        self.save_due_at = None;
    }

    /// Pushes the state reached after a change. Duplicate consecutive
    /// snapshots are dropped; a real change clears the redo stack.
    pub fn record(&mut self, snapshot: &GameSession) {
        if self.restoring {
            return;
        }
        if let Some(top) = self.undo_stack.last() {
            let same = serde_json::to_string(top).ok() == serde_json::to_string(snapshot).ok();
            if same {
                return;
            }
        }
        self.undo_stack.push(snapshot.clone());
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Steps back one state. The current state moves to the redo stack.
    pub fn undo(&mut self, current: &GameSession) -> Option<GameSession> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Steps forward again after an undo.
    pub fn redo(&mut self, current: &GameSession) -> Option<GameSession> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Guards against the restore itself being recorded as a change.
    pub fn begin_restore(&mut self) {
        self.restoring = true;
    }

    pub fn end_restore(&mut self) {
        self.restoring = false;
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn reset(&mut self) {
        *self = History::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameSettings;
    use planetx_logic::mode::PlayerColor;

    fn session(timestamp: u64) -> GameSession {
        GameSession::new(
            GameSettings {
                mode: "standard".to_string(),
                player_colors: vec![PlayerColor::Blue],
                difficulty: None,
            },
            timestamp,
        )
    }

    #[test]
    fn debounce_window() {
        let mut history = History::new();
        assert!(!history.save_due(0));
        history.note_mutation(1_000);
        assert!(!history.save_due(1_400));
        assert!(history.save_due(1_500));
        // a later mutation re-arms the window
        history.note_mutation(1_450);
        assert!(!history.save_due(1_500));
        assert!(history.save_due(1_950));
        history.clear_pending();
        assert!(!history.save_due(10_000));
    }

    #[test]
    fn duplicate_snapshots_collapse() {
        let mut history = History::new();
        history.record(&session(1));
        history.record(&session(1));
        history.record(&session(2));
        history.undo(&session(2)).unwrap();
        history.undo(&session(1)).unwrap();
        assert!(!history.can_undo());
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut history = History::new();
        let s1 = session(1);
        let s2 = session(2);
        history.record(&s1);
        history.record(&s2);

        let restored = history.undo(&s2).unwrap();
        assert_eq!(restored, s2);
        let restored = history.undo(&restored).unwrap();
        assert_eq!(restored, s1);
        assert!(!history.can_undo());

        let forward = history.redo(&restored).unwrap();
        assert_eq!(forward, s1);
        let forward = history.redo(&forward).unwrap();
        assert_eq!(forward, s2);
        assert!(!history.can_redo());
    }

    #[test]
    fn new_record_clears_redo() {
        let mut history = History::new();
        history.record(&session(1));
        history.record(&session(2));
        history.undo(&session(2)).unwrap();
        assert!(history.can_redo());
        history.record(&session(3));
        assert!(!history.can_redo());
    }

    #[test]
    fn capped_at_max_entries() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY as u64 + 20) {
            history.record(&session(i));
        }
        let mut depth = 0;
        let mut current = session(9_999);
        while let Some(previous) = history.undo(&current) {
            current = previous;
            depth += 1;
        }
        assert_eq!(depth, MAX_HISTORY);
        // the oldest surviving entry is the first one after eviction
        assert_eq!(current.timestamp, 20);
    }

    #[test]
    fn nothing_recorded_while_restoring() {
        let mut history = History::new();
        history.begin_restore();
        history.record(&session(1));
        history.note_mutation(100);
        history.end_restore();
        assert!(!history.can_undo());
        assert!(!history.save_due(10_000));
    }
}
