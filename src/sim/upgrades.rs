//! Upgrade pool and offers

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::{Drone, Player};
use crate::consts::*;

/// Every upgrade the player can be offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    // Common
    MultiShot,
    QuickReload,
    Firepower,
    Booster,
    HullRepair,
    ShieldExpansion,
    SpreadBarrage,
    ExplosiveRounds,
    EnergyShield,
    AutoCannon,
    ReinforcedHull,
    Overload,
    // Elite
    Wingman,
    BrainJack,
    PlasmaField,
    SmartMissiles,
    NanoMachines,
    ChainReaction,
    TimeShift,
}

/// Regular level-up pool
pub const COMMON_UPGRADES: [Upgrade; 12] = [
    Upgrade::MultiShot,
    Upgrade::QuickReload,
    Upgrade::Firepower,
    Upgrade::Booster,
    Upgrade::HullRepair,
    Upgrade::ShieldExpansion,
    Upgrade::SpreadBarrage,
    Upgrade::ExplosiveRounds,
    Upgrade::EnergyShield,
    Upgrade::AutoCannon,
    Upgrade::ReinforcedHull,
    Upgrade::Overload,
];

/// Pool offered after a boss is cleared
pub const ELITE_UPGRADES: [Upgrade; 7] = [
    Upgrade::Wingman,
    Upgrade::BrainJack,
    Upgrade::PlasmaField,
    Upgrade::SmartMissiles,
    Upgrade::NanoMachines,
    Upgrade::ChainReaction,
    Upgrade::TimeShift,
];

impl Upgrade {
    pub fn name(self) -> &'static str {
        match self {
            Upgrade::MultiShot => "Multi Shot",
            Upgrade::QuickReload => "Quick Reload",
            Upgrade::Firepower => "Firepower",
            Upgrade::Booster => "Booster",
            Upgrade::HullRepair => "Hull Repair",
            Upgrade::ShieldExpansion => "Shield Expansion",
            Upgrade::SpreadBarrage => "Spread Barrage",
            Upgrade::ExplosiveRounds => "Explosive Rounds",
            Upgrade::EnergyShield => "Energy Shield",
            Upgrade::AutoCannon => "Auto Cannon",
            Upgrade::ReinforcedHull => "Reinforced Hull",
            Upgrade::Overload => "Overload",
            Upgrade::Wingman => "Wingman",
            Upgrade::BrainJack => "Brain Jack",
            Upgrade::PlasmaField => "Plasma Field",
            Upgrade::SmartMissiles => "Smart Missiles",
            Upgrade::NanoMachines => "Nano Machines",
            Upgrade::ChainReaction => "Chain Reaction",
            Upgrade::TimeShift => "Time Shift",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Upgrade::MultiShot => "+1 projectile per volley",
            Upgrade::QuickReload => "Fire 15% faster",
            Upgrade::Firepower => "+15% damage",
            Upgrade::Booster => "+15% movement speed",
            Upgrade::HullRepair => "Repair 50 hull",
            Upgrade::ShieldExpansion => "+20% max hull, repair 20",
            Upgrade::SpreadBarrage => "+2 projectiles per volley",
            Upgrade::ExplosiveRounds => "Projectiles 50% larger",
            Upgrade::EnergyShield => "Fully repair hull",
            Upgrade::AutoCannon => "Fire 30% faster",
            Upgrade::ReinforcedHull => "+50 max hull, repair 50",
            Upgrade::Overload => "+50% damage, -20% max hull",
            Upgrade::Wingman => "Gain an orbiting combat drone",
            Upgrade::BrainJack => "Periodically turn an enemy against its allies",
            Upgrade::PlasmaField => "Burn enemies close to your ship",
            Upgrade::SmartMissiles => "Launch homing missiles",
            Upgrade::NanoMachines => "Slowly regenerate hull",
            Upgrade::ChainReaction => "Kills damage nearby enemies",
            Upgrade::TimeShift => "Enemy projectiles move slower",
        }
    }

    pub fn is_elite(self) -> bool {
        ELITE_UPGRADES.contains(&self)
    }

    /// Apply this upgrade to the player
    pub fn apply(self, player: &mut Player) {
        match self {
            Upgrade::MultiShot => player.projectile_count += 1,
            Upgrade::QuickReload => player.fire_rate *= 0.85,
            Upgrade::Firepower => player.damage_mult += 0.15,
            Upgrade::Booster => player.speed *= 1.15,
            Upgrade::HullRepair => player.heal(50.0),
            Upgrade::ShieldExpansion => {
                player.max_hp *= 1.2;
                player.heal(20.0);
            }
            Upgrade::SpreadBarrage => player.projectile_count += 2,
            Upgrade::ExplosiveRounds => player.projectile_size *= 1.5,
            Upgrade::EnergyShield => player.hp = player.max_hp,
            Upgrade::AutoCannon => player.fire_rate *= 0.7,
            Upgrade::ReinforcedHull => {
                player.max_hp += 50.0;
                player.heal(50.0);
            }
            Upgrade::Overload => {
                player.damage_mult *= 1.5;
                player.max_hp *= 0.8;
                player.hp = player.hp.min(player.max_hp);
            }
            Upgrade::Wingman => player.drones.push(Drone::new()),
            Upgrade::BrainJack => player.powers.hacking = Some(0),
            Upgrade::PlasmaField => player.powers.plasma = true,
            Upgrade::SmartMissiles => player.powers.missiles = Some(0),
            Upgrade::NanoMachines => player.powers.regen = Some(0),
            Upgrade::ChainReaction => player.powers.chain = true,
            Upgrade::TimeShift => player.powers.time_shift = true,
        }
    }
}

/// An open upgrade choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOffer {
    pub elite: bool,
    pub choices: Vec<Upgrade>,
}

impl UpgradeOffer {
    /// Draw distinct choices from the matching pool
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, elite: bool) -> Self {
        let mut pool: Vec<Upgrade> = if elite {
            ELITE_UPGRADES.to_vec()
        } else {
            COMMON_UPGRADES.to_vec()
        };
        pool.shuffle(rng);
        pool.truncate(UPGRADE_CHOICES);
        Self {
            elite,
            choices: pool,
        }
    }
}
