//! Player profile: lifetime stats, achievements, ship unlocks, leaderboard
//!
//! Persisted as one JSON document in the key-value store. Recording a run
//! updates the stats first and then checks every unlock against them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::highscores::HighScores;
use crate::persistence::{KeyValueStore, load_or_default, save_json};
use crate::ships::{ALL_SHIPS, ShipKind, UnlockProgress};
use crate::sim::RunSummary;

/// Lifetime totals across all runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeStats {
    pub total_kills: u64,
    pub bosses_killed: u64,
    pub highest_wave: u32,
    pub total_score: u64,
    pub games_played: u32,
    pub total_play_ticks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Achievement {
    FirstBlood,
    Survivor,
    Veteran,
    BossHunter,
    ScoreMaster,
    Slaughter,
}

pub const ALL_ACHIEVEMENTS: [Achievement; 6] = [
    Achievement::FirstBlood,
    Achievement::Survivor,
    Achievement::Veteran,
    Achievement::BossHunter,
    Achievement::ScoreMaster,
    Achievement::Slaughter,
];

impl Achievement {
    pub fn name(self) -> &'static str {
        match self {
            Achievement::FirstBlood => "First Blood",
            Achievement::Survivor => "Survivor",
            Achievement::Veteran => "Veteran",
            Achievement::BossHunter => "Boss Hunter",
            Achievement::ScoreMaster => "Score Master",
            Achievement::Slaughter => "Slaughter",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Achievement::FirstBlood => "Destroy your first enemy",
            Achievement::Survivor => "Reach wave 5",
            Achievement::Veteran => "Reach wave 10",
            Achievement::BossHunter => "Defeat a boss",
            Achievement::ScoreMaster => "Score 10,000 points in total",
            Achievement::Slaughter => "Destroy 100 enemies in total",
        }
    }

    pub fn is_earned(self, stats: &LifetimeStats) -> bool {
        match self {
            Achievement::FirstBlood => stats.total_kills >= 1,
            Achievement::Survivor => stats.highest_wave >= 5,
            Achievement::Veteran => stats.highest_wave >= 10,
            Achievement::BossHunter => stats.bosses_killed >= 1,
            Achievement::ScoreMaster => stats.total_score >= 10_000,
            Achievement::Slaughter => stats.total_kills >= 100,
        }
    }
}

/// Something newly unlocked by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unlock {
    Achievement(Achievement),
    Ship(ShipKind),
}

impl Unlock {
    pub fn label(&self) -> String {
        match self {
            Unlock::Achievement(a) => format!("Achievement: {}", a.name()),
            Unlock::Ship(kind) => format!("New ship: {}", kind.config().name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub pilot_name: String,
    pub stats: LifetimeStats,
    pub achievements: BTreeSet<Achievement>,
    pub ships: BTreeSet<ShipKind>,
    pub selected_ship: ShipKind,
    pub leaderboard: HighScores,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            pilot_name: "PILOT".to_string(),
            stats: LifetimeStats::default(),
            achievements: BTreeSet::new(),
            ships: BTreeSet::from([ShipKind::Pioneer]),
            selected_ship: ShipKind::Pioneer,
            leaderboard: HighScores::new(),
        }
    }
}

impl Profile {
    pub const STORAGE_KEY: &'static str = "neon_galaxy_profile";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a store; missing or corrupt data yields a fresh profile
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut profile: Profile = load_or_default(store, Self::STORAGE_KEY);
        profile.ships.insert(ShipKind::Pioneer);
        if !profile.ships.contains(&profile.selected_ship) {
            profile.selected_ship = ShipKind::Pioneer;
        }
        log::info!(
            "Profile loaded: {} games, {} achievements",
            profile.stats.games_played,
            profile.achievements.len()
        );
        profile
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_json(store, Self::STORAGE_KEY, self)
    }

    pub fn unlock_progress(&self) -> UnlockProgress {
        UnlockProgress {
            highest_wave: self.stats.highest_wave,
            total_kills: self.stats.total_kills,
            total_score: self.stats.total_score,
        }
    }

    pub fn is_ship_unlocked(&self, kind: ShipKind) -> bool {
        self.ships.contains(&kind)
    }

    /// Select a ship for the next run; locked ships are refused
    pub fn select_ship(&mut self, kind: ShipKind) -> bool {
        if !self.is_ship_unlocked(kind) {
            return false;
        }
        self.selected_ship = kind;
        true
    }

    /// Fold a finished run into the profile and report what it unlocked
    pub fn record_run(&mut self, summary: &RunSummary, timestamp: f64) -> Vec<Unlock> {
        let stats = &mut self.stats;
        stats.total_kills += u64::from(summary.kills);
        stats.bosses_killed += u64::from(summary.boss_kills);
        stats.highest_wave = stats.highest_wave.max(summary.wave);
        stats.total_score += summary.score;
        stats.games_played += 1;
        stats.total_play_ticks += summary.ticks;

        let name = self.pilot_name.clone();
        self.leaderboard
            .add_score(&name, summary.score, summary.wave, timestamp);

        let unlocks = self.check_unlocks();
        for unlock in &unlocks {
            log::info!("Unlocked {}", unlock.label());
        }
        unlocks
    }

    /// Grant everything the current stats have earned
    fn check_unlocks(&mut self) -> Vec<Unlock> {
        let mut unlocks = Vec::new();
        for achievement in ALL_ACHIEVEMENTS {
            if achievement.is_earned(&self.stats) && self.achievements.insert(achievement) {
                unlocks.push(Unlock::Achievement(achievement));
            }
        }
        let progress = self.unlock_progress();
        for kind in ALL_SHIPS {
            if kind.is_earned(&progress) && self.ships.insert(kind) {
                unlocks.push(Unlock::Ship(kind));
            }
        }
        unlocks
    }
}
