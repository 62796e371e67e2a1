//! One-shot phase alerts: conferences and theory phases.
//!
//! Conferences fire when the leading cumulative time reaches their
//! threshold. Theory phases fire when Earth passes one of the mode's
//! theory sectors, including every sector skipped over by a multi-sector
//! jump. Each alert fires at most once per session; the seen-sets are
//! mirrored to the KV store so a reload doesn't replay them.
//!
//! Theory phases go through a single-slot modal queue: while one is being
//! shown, later ones wait in FIFO order and surface on dismissal.
//! Conference alerts are presented immediately and don't queue.

use std::collections::{BTreeSet, VecDeque};

use planetx_logic::mode::ModeConfig;
use planetx_logic::sectors::sectors_passed_clockwise;

/// An alert the view should present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseAlert {
    Conference { name: String, threshold: u32 },
    TheoryPhase { sector: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseTrigger {
    seen_conferences: BTreeSet<String>,
    seen_theory_sectors: BTreeSet<u32>,
    last_earth_sector: Option<u32>,
    pending: VecDeque<u32>,
    modal_active: bool,
}

impl PhaseTrigger {
    pub fn new() -> PhaseTrigger {
        PhaseTrigger::default()
    }

    /// Checks thresholds and board movement, returning alerts to present.
    /// At most one theory-phase alert is included; further passed sectors
    /// wait in the queue. With no Earth sector yet, nothing happens.
    pub fn evaluate(
        &mut self,
        mode: &ModeConfig,
        max_time: Option<u32>,
        earth_sector: Option<u32>,
    ) -> Vec<PhaseAlert> {
        let Some(earth_sector) = earth_sector else {
            return Vec::new();
        };
        let mut alerts = Vec::new();

        if let Some(max_time) = max_time {
            for conference in &mode.conferences {
                if max_time >= conference.threshold
                    && self.seen_conferences.insert(conference.name.clone())
                {
                    alerts.push(PhaseAlert::Conference {
                        name: conference.name.clone(),
                        threshold: conference.threshold,
                    });
                }
            }
        }

        let prev = self.last_earth_sector.unwrap_or(1);
        self.last_earth_sector = Some(earth_sector);
        for sector in sectors_passed_clockwise(prev, earth_sector, mode.num_sectors()) {
            if mode.theory_sectors.contains(&sector)
                && self.seen_theory_sectors.insert(sector)
            {
                self.pending.push_back(sector);
            }
        }

        if !self.modal_active {
            if let Some(sector) = self.pending.pop_front() {
                self.modal_active = true;
                tracing::debug!(sector, "theory phase reached");
                alerts.push(PhaseAlert::TheoryPhase { sector });
            }
        }
        alerts
    }

    /// Closes the active theory modal and surfaces the next queued one.
    pub fn dismiss_active(&mut self) -> Option<PhaseAlert> {
        self.modal_active = false;
        let sector = self.pending.pop_front()?;
        self.modal_active = true;
        Some(PhaseAlert::TheoryPhase { sector })
    }

    pub fn modal_active(&self) -> bool {
        self.modal_active
    }

    /// Reseats the board position after a snapshot restore, without firing
    /// anything for the jump.
    pub fn sync_position(&mut self, earth_sector: Option<u32>) {
        self.last_earth_sector = earth_sector;
    }

    pub fn seen_conferences(&self) -> &BTreeSet<String> {
        &self.seen_conferences
    }

    pub fn seen_theory_sectors(&self) -> &BTreeSet<u32> {
        &self.seen_theory_sectors
    }

    /// Reloads the seen-sets saved by a previous session.
    pub fn restore_seen(
        &mut self,
        conferences: BTreeSet<String>,
        theory_sectors: BTreeSet<u32>,
    ) {
        self.seen_conferences = conferences;
        self.seen_theory_sectors = theory_sectors;
    }

    pub fn reset(&mut self) {
        *self = PhaseTrigger::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode() -> ModeConfig {
        ModeConfig::standard()
    }

    #[test]
    fn conference_fires_once_at_threshold() {
        let mode = mode();
        let mut trigger = PhaseTrigger::new();
        assert!(trigger.evaluate(&mode, Some(11), Some(1)).is_empty());
        let alerts = trigger.evaluate(&mode, Some(12), Some(1));
        assert_eq!(
            alerts,
            vec![PhaseAlert::Conference { name: "X1".to_string(), threshold: 12 }]
        );
        // stays quiet afterwards
        assert!(trigger.evaluate(&mode, Some(20), Some(1)).is_empty());
    }

    #[test]
    fn passing_a_theory_sector_fires() {
        let mode = mode();
        let mut trigger = PhaseTrigger::new();
        trigger.evaluate(&mode, Some(0), Some(1));
        let alerts = trigger.evaluate(&mode, Some(2), Some(3));
        assert_eq!(alerts, vec![PhaseAlert::TheoryPhase { sector: 3 }]);
        assert!(trigger.modal_active());
    }

    #[test]
    fn multi_sector_jump_queues_each_passed_sector() {
        let mode = mode();
        let mut trigger = PhaseTrigger::new();
        trigger.evaluate(&mode, Some(0), Some(1));
        // jump straight past sectors 3 and 6
        let alerts = trigger.evaluate(&mode, Some(6), Some(7));
        assert_eq!(alerts, vec![PhaseAlert::TheoryPhase { sector: 3 }]);
        // 6 waits behind the active modal
        assert!(trigger.evaluate(&mode, Some(6), Some(7)).is_empty());
        assert_eq!(
            trigger.dismiss_active(),
            Some(PhaseAlert::TheoryPhase { sector: 6 })
        );
        assert_eq!(trigger.dismiss_active(), None);
        assert!(!trigger.modal_active());
    }

    #[test]
    fn sectors_fire_at_most_once() {
        let mode = mode();
        let mut trigger = PhaseTrigger::new();
        trigger.evaluate(&mode, Some(2), Some(3));
        trigger.dismiss_active();
        // wrap all the way around past sector 3 again
        trigger.sync_position(Some(2));
        let alerts = trigger.evaluate(&mode, Some(3), Some(4));
        assert!(alerts.is_empty());
    }

    #[test]
    fn no_earth_sector_no_alerts() {
        let mode = mode();
        let mut trigger = PhaseTrigger::new();
        assert!(trigger.evaluate(&mode, Some(30), None).is_empty());
        assert!(trigger.seen_conferences().is_empty());
    }

    #[test]
    fn sync_position_does_not_fire() {
        let mode = mode();
        let mut trigger = PhaseTrigger::new();
        trigger.sync_position(Some(9));
        let alerts = trigger.evaluate(&mode, Some(8), Some(9));
        assert!(alerts.is_empty());
    }

    #[test]
    fn restored_seen_sets_suppress_replay() {
        let mode = mode();
        let mut trigger = PhaseTrigger::new();
        trigger.restore_seen(
            ["X1".to_string()].into_iter().collect(),
            [3].into_iter().collect(),
        );
        trigger.sync_position(Some(1));
        let alerts = trigger.evaluate(&mode, Some(12), Some(4));
        assert!(alerts.is_empty());
    }
}
