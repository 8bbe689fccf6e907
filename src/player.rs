//! Player progression
//!
//! Quest xp feeds a single level track. Level 2 needs 83 xp and level 99,
//! the cap, needs 13,034,440.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::quest::PlayerSink;

pub const LEVEL_CAP: u32 = 99;

/// Cumulative xp thresholds; index `n` holds the xp needed for level `n + 1`
fn level_table() -> &'static [i64] {
    static TABLE: OnceLock<Vec<i64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut thresholds = Vec::with_capacity(LEVEL_CAP as usize);
        let mut points = 0.0_f64;
        thresholds.push(0);
        for level in 1..LEVEL_CAP {
            let l = f64::from(level);
            points += (l + 300.0 * 2.0_f64.powf(l / 7.0)) / 4.0;
            thresholds.push(points.floor() as i64);
        }
        thresholds
    })
}

/// Xp required to reach `level`, clamped to the valid range
pub fn xp_for_level(level: u32) -> i64 {
    let index = level.clamp(1, LEVEL_CAP) as usize - 1;
    level_table()[index]
}

/// Highest level whose threshold `xp` has reached
pub fn level_at(xp: i64) -> u32 {
    // thresholds are ascending, so the count at or below xp is the level
    let reached = level_table().partition_point(|&threshold| threshold <= xp);
    (reached as u32).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub level: u32,
    pub xp: i64,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self { level: 1, xp: 0 }
    }
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the xp crosses into a new level
    pub fn add_xp(&mut self, amount: i64) -> bool {
        if amount <= 0 {
            return false;
        }
        self.xp = self.xp.saturating_add(amount);
        let previous = self.level;
        self.level = level_at(self.xp);
        self.level > previous
    }

    pub fn xp_to_next_level(&self) -> i64 {
        if self.level >= LEVEL_CAP {
            0
        } else {
            xp_for_level(self.level + 1) - self.xp
        }
    }

    /// Fraction of the way from this level to the next
    pub fn level_progress(&self) -> f32 {
        if self.level >= LEVEL_CAP {
            return 1.0;
        }
        let floor = xp_for_level(self.level);
        let span = xp_for_level(self.level + 1) - floor;
        ((self.xp - floor) as f32 / span as f32).clamp(0.0, 1.0)
    }
}

impl PlayerSink for PlayerProgress {
    fn add_xp(&mut self, amount: i64) {
        if PlayerProgress::add_xp(self, amount) {
            info!("Player reached level {}", self.level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_endpoints() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 83);
        assert_eq!(xp_for_level(3), 174);
        assert_eq!(xp_for_level(LEVEL_CAP), 13_034_440);
        assert_eq!(xp_for_level(500), xp_for_level(LEVEL_CAP));
    }

    #[test]
    fn test_level_at_thresholds() {
        assert_eq!(level_at(-5), 1);
        assert_eq!(level_at(82), 1);
        assert_eq!(level_at(83), 2);
        assert_eq!(level_at(i64::MAX), LEVEL_CAP);
        assert_eq!(level_at(xp_for_level(40) - 1), 39);
        assert_eq!(level_at(xp_for_level(40)), 40);
    }

    #[test]
    fn test_quest_xp_levels_up() {
        let mut player = PlayerProgress::new();
        assert!(!player.add_xp(50));
        assert!(player.add_xp(50));
        assert_eq!((player.level, player.xp), (2, 100));
        assert!(!player.add_xp(-10));
        assert_eq!(player.xp, 100);
    }

    #[test]
    fn test_sink_accumulates() {
        let mut player = PlayerProgress::new();
        PlayerSink::add_xp(&mut player, 100);
        PlayerSink::add_xp(&mut player, 50);
        assert_eq!((player.level, player.xp), (2, 150));
        assert_eq!(player.xp_to_next_level(), 24);
        assert!(player.level_progress() > 0.0);
    }
}
