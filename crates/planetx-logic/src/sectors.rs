//! Cyclic sector arithmetic.
//!
//! Sectors are numbered 1..=num_sectors around the board. The time track
//! wraps with the same modulus, so a cumulative time maps straight to a
//! sector position. All helpers here are pure functions over plain numbers.

use serde::{Deserialize, Serialize};

/// Trial-division primality test. Comets may only sit in prime sectors.
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Position on the wrapped time track for a cumulative time.
///
/// Time 0 maps to position 1, time `track_size` wraps back to 1.
pub fn track_position(total_time: u32, track_size: u32) -> u32 {
    (total_time % track_size) + 1
}

/// The sector Earth currently points at, given the trailing player's
/// cumulative time. Same wrapping as [`track_position`].
pub fn earth_sector_from_time(total_time: u32, num_sectors: u32) -> u32 {
    track_position(total_time, num_sectors)
}

/// Sector directly across the board.
pub fn opposite_sector(sector: u32, num_sectors: u32) -> u32 {
    ((sector - 1 + num_sectors / 2) % num_sectors) + 1
}

/// Sectors traversed moving clockwise from `prev` to `next`, exclusive of
/// `prev` and inclusive of `next`. Empty when the position didn't move.
pub fn sectors_passed_clockwise(prev: u32, next: u32, num_sectors: u32) -> Vec<u32> {
    let mut passed = Vec::new();
    if prev == next {
        return passed;
    }
    let mut current = prev;
    loop {
        current = (current % num_sectors) + 1;
        passed.push(current);
        if current == next {
            break;
        }
    }
    passed
}

/// Half the board, starting at Earth's sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleSky {
    pub start: u32,
    pub end: u32,
    pub visible_count: u32,
}

/// The half-board arc visible from `start` (inclusive on both ends).
pub fn visible_sky_range(start: u32, num_sectors: u32) -> VisibleSky {
    let visible_count = num_sectors / 2;
    let end = ((start - 1 + visible_count - 1) % num_sectors) + 1;
    VisibleSky { start, end, visible_count }
}

/// Whether `sector` lies inside the visible arc starting at `start`.
pub fn is_sector_visible(sector: u32, start: u32, num_sectors: u32) -> bool {
    let count = num_sectors / 2;
    let offset = (sector + num_sectors - start) % num_sectors;
    offset < count
}
