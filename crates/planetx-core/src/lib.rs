//! Session engine for the Planet X companion.
//!
//! Builds on `planetx-logic` to maintain a live game session: the hint
//! board with auto-inference, the move ledger and turn clock, phase
//! triggers, the theory tracker, undo/redo history, and persistence behind
//! a key-value trait. [`engine::CompanionEngine`] is the facade a view
//! layer drives.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | The serializable `GameSession` document |
//! | [`hints`] | Hint board with radio/toggle semantics and auto-inference |
//! | [`ledger`] | Ordered move rows with time costs and input locking |
//! | [`clock`] | Cumulative times, next-turn pick, Earth sector |
//! | [`triggers`] | One-shot conference and theory-phase alerts |
//! | [`theories`] | Theory rows with auto-placement and bulk advancement |
//! | [`history`] | Undo/redo snapshots and the debounced save deadline |
//! | [`persist`] | KV-store and notification traits, save/load/clear |
//! | [`engine`] | The `CompanionEngine` facade |

pub mod clock;
pub mod engine;
pub mod hints;
pub mod history;
pub mod ledger;
pub mod persist;
pub mod session;
pub mod theories;
pub mod triggers;
