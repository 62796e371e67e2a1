//! Persistence behind a key-value trait, plus the notification seam.
//!
//! The engine never touches real storage or real dialogs. A host supplies
//! a [`KvStore`] (browser localStorage, a file, an in-memory map) and a
//! [`NotificationSink`] (toasts, modals, a test recorder). The session
//! document is saved as JSON under one fixed key; phase seen-flags live
//! under small per-flag keys so they survive a reload but can be cleared
//! with the session.

use std::collections::BTreeSet;
use std::collections::HashMap;

use thiserror::Error;

use planetx_logic::mode::ModeConfig;

use crate::session::GameSession;
use crate::triggers::PhaseAlert;

pub const STORAGE_KEY: &str = "planetXGameState";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("storage rejected write to {key}")]
    Store { key: String },
}

/// Minimal string key-value storage.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> MemoryKv {
        MemoryKv::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Severity of an advisory notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// Where the engine sends advisory messages and phase alerts. The engine
/// owns ordering and dismissal; the sink only displays.
pub trait NotificationSink {
    fn notify(&mut self, kind: NoticeKind, message: &str);
    fn present(&mut self, alert: &PhaseAlert);
}

/// Sink that swallows everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _kind: NoticeKind, _message: &str) {}
    fn present(&mut self, _alert: &PhaseAlert) {}
}

pub fn save_session(kv: &mut dyn KvStore, session: &GameSession) -> Result<(), PersistError> {
    let json = serde_json::to_string(session).map_err(PersistError::Encode)?;
    kv.set(STORAGE_KEY, &json)
}

/// Loads the saved session, if any. A document that fails to parse is
/// logged and treated as no save; startup never fails on a corrupt save.
pub fn load_session(kv: &dyn KvStore) -> Option<GameSession> {
    let json = kv.get(STORAGE_KEY)?;
    match serde_json::from_str(&json) {
        Ok(session) => Some(session),
        Err(error) => {
            tracing::warn!(%error, "discarding unreadable saved game");
            None
        }
    }
}

pub fn conference_seen_key(name: &str) -> String {
    format!("conference-{name}-shown")
}

pub fn theory_seen_key(sector: u32) -> String {
    format!("theory-sector-{sector}-shown")
}

/// Mirrors the trigger's seen-sets into per-flag keys.
pub fn store_seen_flags(
    kv: &mut dyn KvStore,
    conferences: &BTreeSet<String>,
    theory_sectors: &BTreeSet<u32>,
) -> Result<(), PersistError> {
    for name in conferences {
        kv.set(&conference_seen_key(name), "true")?;
    }
    for sector in theory_sectors {
        kv.set(&theory_seen_key(*sector), "true")?;
    }
    Ok(())
}

/// Reads back whichever seen-flags the mode could have written.
pub fn load_seen_flags(kv: &dyn KvStore, mode: &ModeConfig) -> (BTreeSet<String>, BTreeSet<u32>) {
    let conferences = mode
        .conferences
        .iter()
        .filter(|c| kv.get(&conference_seen_key(&c.name)).is_some())
        .map(|c| c.name.clone())
        .collect();
    let sectors = mode
        .theory_sectors
        .iter()
        .filter(|s| kv.get(&theory_seen_key(**s)).is_some())
        .copied()
        .collect();
    (conferences, sectors)
}

/// Removes the save and every seen-flag the mode could have written.
pub fn clear_session(kv: &mut dyn KvStore, mode: &ModeConfig) {
    kv.remove(STORAGE_KEY);
    for conference in &mode.conferences {
        kv.remove(&conference_seen_key(&conference.name));
    }
    for sector in &mode.theory_sectors {
        kv.remove(&theory_seen_key(*sector));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameSettings;
    use planetx_logic::mode::PlayerColor;

    fn session() -> GameSession {
        GameSession::new(
            GameSettings {
                mode: "standard".to_string(),
                player_colors: vec![PlayerColor::Blue, PlayerColor::Purple],
                difficulty: None,
            },
            7,
        )
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut kv = MemoryKv::new();
        save_session(&mut kv, &session()).unwrap();
        let loaded = load_session(&kv).unwrap();
        assert_eq!(loaded, session());
    }

    #[test]
    fn missing_save_is_none() {
        let kv = MemoryKv::new();
        assert!(load_session(&kv).is_none());
    }

    #[test]
    fn corrupt_save_is_none() {
        let mut kv = MemoryKv::new();
        kv.set(STORAGE_KEY, "{not json").unwrap();
        assert!(load_session(&kv).is_none());
    }

    #[test]
    fn seen_flags_round_trip() {
        let mode = ModeConfig::expert();
        let mut kv = MemoryKv::new();
        let conferences: BTreeSet<String> = ["X1".to_string()].into_iter().collect();
        let sectors: BTreeSet<u32> = [3, 9].into_iter().collect();
        store_seen_flags(&mut kv, &conferences, &sectors).unwrap();
        assert!(kv.get("conference-X1-shown").is_some());
        assert!(kv.get("theory-sector-9-shown").is_some());

        let (loaded_conferences, loaded_sectors) = load_seen_flags(&kv, &mode);
        assert_eq!(loaded_conferences, conferences);
        assert_eq!(loaded_sectors, sectors);
    }

    #[test]
    fn clear_removes_save_and_flags() {
        let mode = ModeConfig::standard();
        let mut kv = MemoryKv::new();
        save_session(&mut kv, &session()).unwrap();
        store_seen_flags(
            &mut kv,
            &["X1".to_string()].into_iter().collect(),
            &[3, 6].into_iter().collect(),
        )
        .unwrap();
        clear_session(&mut kv, &mode);
        assert!(kv.is_empty());
        assert!(load_session(&kv).is_none());
    }
}
