//! Derived turn state: cumulative times, next player, Earth's sector.
//!
//! The clock is recomputed from the ledger after every change, never
//! stored. The player furthest behind on the time track moves next; on a
//! tie the earliest player in seating order is the canonical pick, with
//! the full tied set surfaced so a view can say so.

use planetx_logic::mode::{ModeConfig, PlayerColor};
use planetx_logic::sectors;

use crate::ledger::MoveLedger;

/// Who moves next, with any time-track tie made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextTurn {
    pub player: PlayerColor,
    pub time: u32,
    /// Every player at the minimum time, in seating order. Length 1 when
    /// there is no tie.
    pub tied: Vec<PlayerColor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnClock {
    track_size: u32,
    num_sectors: u32,
    /// (player, cumulative time) in seating order.
    times: Vec<(PlayerColor, u32)>,
}

impl TurnClock {
    /// Tallies each seated player's completed moves.
    pub fn from_ledger(
        mode: &ModeConfig,
        seating: &[PlayerColor],
        ledger: &MoveLedger,
    ) -> TurnClock {
        let times = seating
            .iter()
            .map(|&player| {
                let total = ledger
                    .completed_rows()
                    .filter(|row| row.player == Some(player))
                    .filter_map(|row| ledger.time_cost_of(row))
                    .sum();
                (player, total)
            })
            .collect();
        TurnClock {
            track_size: mode.track_size(),
            num_sectors: mode.num_sectors(),
            times,
        }
    }

    pub fn cumulative_times(&self) -> &[(PlayerColor, u32)] {
        &self.times
    }

    pub fn cumulative_time(&self, player: PlayerColor) -> Option<u32> {
        self.times
            .iter()
            .find(|(p, _)| *p == player)
            .map(|(_, t)| *t)
    }

    pub fn min_time(&self) -> Option<u32> {
        self.times.iter().map(|(_, t)| *t).min()
    }

    pub fn max_time(&self) -> Option<u32> {
        self.times.iter().map(|(_, t)| *t).max()
    }

    /// Wrapped track position for one player.
    pub fn track_position_of(&self, player: PlayerColor) -> Option<u32> {
        self.cumulative_time(player)
            .map(|t| sectors::track_position(t, self.track_size))
    }

    /// The sector Earth points at: the trailing player's position,
    /// expressed in sector space. `None` only when nobody is seated.
    pub fn earth_sector(&self) -> Option<u32> {
        self.min_time()
            .map(|t| sectors::earth_sector_from_time(t, self.num_sectors))
    }

    /// The player furthest behind, first in seating order on a tie.
    pub fn next_turn(&self) -> Option<NextTurn> {
        let min = self.min_time()?;
        let tied: Vec<PlayerColor> = self
            .times
            .iter()
            .filter(|(_, t)| *t == min)
            .map(|(p, _)| *p)
            .collect();
        Some(NextTurn { player: tied[0], time: min, tied })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetx_logic::moves::ActionKind;

    use crate::ledger::MoveEdit;

    fn record_move(ledger: &mut MoveLedger, player: PlayerColor, action: ActionKind) {
        let move_num = ledger.rows().last().map(|row| row.move_num).unwrap_or(1);
        ledger.edit(move_num, MoveEdit::Player(Some(player))).unwrap();
        ledger.edit(move_num, MoveEdit::Action(Some(action))).unwrap();
    }

    fn clock(seating: &[PlayerColor], ledger: &MoveLedger) -> TurnClock {
        TurnClock::from_ledger(&ModeConfig::standard(), seating, ledger)
    }

    #[test]
    fn fresh_game_all_zero() {
        let mode = ModeConfig::standard();
        let ledger = MoveLedger::new(&mode);
        let seating = [PlayerColor::Blue, PlayerColor::Red];
        let clock = clock(&seating, &ledger);
        assert_eq!(clock.cumulative_times(), &[(PlayerColor::Blue, 0), (PlayerColor::Red, 0)]);
        assert_eq!(clock.earth_sector(), Some(1));
        let next = clock.next_turn().unwrap();
        assert_eq!(next.player, PlayerColor::Blue);
        assert_eq!(next.tied, vec![PlayerColor::Blue, PlayerColor::Red]);
    }

    #[test]
    fn trailing_player_moves_next() {
        let mode = ModeConfig::standard();
        let mut ledger = MoveLedger::new(&mode);
        record_move(&mut ledger, PlayerColor::Blue, ActionKind::Target); // 4
        record_move(&mut ledger, PlayerColor::Red, ActionKind::Research); // 1
        let clock = clock(&[PlayerColor::Blue, PlayerColor::Red], &ledger);
        assert_eq!(clock.cumulative_time(PlayerColor::Blue), Some(4));
        assert_eq!(clock.cumulative_time(PlayerColor::Red), Some(1));
        let next = clock.next_turn().unwrap();
        assert_eq!(next.player, PlayerColor::Red);
        assert_eq!(next.time, 1);
        assert_eq!(next.tied, vec![PlayerColor::Red]);
    }

    #[test]
    fn tie_breaks_toward_seating_order() {
        let mode = ModeConfig::standard();
        let mut ledger = MoveLedger::new(&mode);
        record_move(&mut ledger, PlayerColor::Yellow, ActionKind::Target);
        record_move(&mut ledger, PlayerColor::Blue, ActionKind::Target);
        let clock = clock(&[PlayerColor::Yellow, PlayerColor::Blue], &ledger);
        let next = clock.next_turn().unwrap();
        assert_eq!(next.player, PlayerColor::Yellow);
        assert_eq!(next.tied, vec![PlayerColor::Yellow, PlayerColor::Blue]);
    }

    #[test]
    fn earth_sector_wraps_with_min_time() {
        let mode = ModeConfig::standard();
        let mut ledger = MoveLedger::new(&mode);
        // three locates: 15 time, position (15 % 12) + 1 = 4
        for _ in 0..3 {
            record_move(&mut ledger, PlayerColor::Blue, ActionKind::Locate);
        }
        let clock = clock(&[PlayerColor::Blue], &ledger);
        assert_eq!(clock.cumulative_time(PlayerColor::Blue), Some(15));
        assert_eq!(clock.earth_sector(), Some(4));
        assert_eq!(clock.track_position_of(PlayerColor::Blue), Some(4));
    }

    #[test]
    fn no_players_no_turn() {
        let mode = ModeConfig::standard();
        let ledger = MoveLedger::new(&mode);
        let clock = clock(&[], &ledger);
        assert_eq!(clock.next_turn(), None);
        assert_eq!(clock.earth_sector(), None);
    }

    #[test]
    fn incomplete_rows_cost_nothing() {
        let mode = ModeConfig::standard();
        let mut ledger = MoveLedger::new(&mode);
        ledger.edit(1, MoveEdit::Player(Some(PlayerColor::Blue))).unwrap();
        ledger.edit(1, MoveEdit::Action(Some(ActionKind::Survey))).unwrap();
        // survey sectors not chosen yet
        let clock = clock(&[PlayerColor::Blue], &ledger);
        assert_eq!(clock.cumulative_time(PlayerColor::Blue), Some(0));
    }
}
