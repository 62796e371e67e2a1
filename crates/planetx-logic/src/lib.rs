//! Pure game logic for the Planet X companion.
//!
//! This crate contains all deduction and turn-progression rules that are
//! independent of any storage, UI, or runtime. Functions take plain data
//! and return results, making them unit-testable and portable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`mode`] | Game mode catalog: objects, counts, conferences, theory sectors |
//! | [`sectors`] | Cyclic sector arithmetic, time-track positions, visible sky |
//! | [`moves`] | Move actions, time costs, per-player sequencing validation |
//! | [`theory`] | Theory submission progress state machine |
//! | [`score`] | Final score calculator |

pub mod mode;
pub mod moves;
pub mod score;
pub mod sectors;
pub mod theory;
