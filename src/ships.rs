//! Ship loadouts and their unlock rules

use serde::{Deserialize, Serialize};

use crate::sim::state::palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipKind {
    Pioneer,
    Speedster,
    Fortress,
    Sniper,
    Engineer,
}

pub const ALL_SHIPS: [ShipKind; 5] = [
    ShipKind::Pioneer,
    ShipKind::Speedster,
    ShipKind::Fortress,
    ShipKind::Sniper,
    ShipKind::Engineer,
];

/// Baseline player stats for a ship
#[derive(Debug, Clone, PartialEq)]
pub struct ShipConfig {
    pub kind: ShipKind,
    pub name: &'static str,
    pub description: &'static str,
    pub color: u32,
    pub max_hp: f32,
    pub speed: f32,
    pub damage_mult: f32,
    pub fire_rate: f32,
    pub projectile_size: f32,
    pub projectile_count: u32,
}

/// Lifetime stats an unlock rule can look at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlockProgress {
    pub highest_wave: u32,
    pub total_kills: u64,
    pub total_score: u64,
}

static SHIPS: [ShipConfig; 5] = [
    ShipConfig {
        kind: ShipKind::Pioneer,
        name: "Pioneer",
        description: "Balanced all-rounder",
        color: palette::CYAN,
        max_hp: 100.0,
        speed: 5.0,
        damage_mult: 1.0,
        fire_rate: 15.0,
        projectile_size: 4.0,
        projectile_count: 1,
    },
    ShipConfig {
        kind: ShipKind::Speedster,
        name: "Speedster",
        description: "Fast and fragile, rapid fire",
        color: palette::YELLOW,
        max_hp: 60.0,
        speed: 8.0,
        damage_mult: 0.8,
        fire_rate: 10.0,
        projectile_size: 3.0,
        projectile_count: 1,
    },
    ShipConfig {
        kind: ShipKind::Fortress,
        name: "Fortress",
        description: "Heavy hull, heavy shells",
        color: palette::GREEN,
        max_hp: 200.0,
        speed: 3.0,
        damage_mult: 1.5,
        fire_rate: 25.0,
        projectile_size: 9.0,
        projectile_count: 1,
    },
    ShipConfig {
        kind: ShipKind::Sniper,
        name: "Sniper",
        description: "Slow, devastating shots",
        color: palette::PURPLE,
        max_hp: 80.0,
        speed: 6.0,
        damage_mult: 2.5,
        fire_rate: 40.0,
        projectile_size: 7.0,
        projectile_count: 1,
    },
    ShipConfig {
        kind: ShipKind::Engineer,
        name: "Engineer",
        description: "Twin light cannons",
        color: palette::ORANGE,
        max_hp: 120.0,
        speed: 4.0,
        damage_mult: 0.6,
        fire_rate: 18.0,
        projectile_size: 3.0,
        projectile_count: 2,
    },
];

pub fn ship_config(kind: ShipKind) -> &'static ShipConfig {
    match kind {
        ShipKind::Pioneer => &SHIPS[0],
        ShipKind::Speedster => &SHIPS[1],
        ShipKind::Fortress => &SHIPS[2],
        ShipKind::Sniper => &SHIPS[3],
        ShipKind::Engineer => &SHIPS[4],
    }
}

impl ShipKind {
    pub fn config(self) -> &'static ShipConfig {
        ship_config(self)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_SHIPS
            .into_iter()
            .find(|kind| kind.config().name.eq_ignore_ascii_case(name))
    }

    /// Whether lifetime progress meets this ship's unlock rule
    pub fn is_earned(self, progress: &UnlockProgress) -> bool {
        match self {
            ShipKind::Pioneer => true,
            ShipKind::Speedster => progress.highest_wave >= 8,
            ShipKind::Sniper => progress.highest_wave >= 6,
            ShipKind::Fortress => progress.total_kills >= 500,
            ShipKind::Engineer => progress.total_score >= 50_000,
        }
    }

    pub fn unlock_hint(self) -> &'static str {
        match self {
            ShipKind::Pioneer => "Always available",
            ShipKind::Speedster => "Reach wave 8",
            ShipKind::Sniper => "Reach wave 6",
            ShipKind::Fortress => "Destroy 500 enemies in total",
            ShipKind::Engineer => "Score 50,000 points in total",
        }
    }
}
