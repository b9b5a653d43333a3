//! Game settings and preferences
//!
//! Persisted in the key-value store next to the profile.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence::{KeyValueStore, load_or_default, save_json};
use crate::sim::SimConfig;

pub use crate::sim::LevelingRule;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset '{other}'")),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on explosions/impacts
    pub screen_shake: bool,
    /// Particle effects (explosions, sparks, etc.)
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Gameplay ===
    /// Surplus XP handling on level-up
    pub leveling: LevelingRule,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            particles: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            leveling: LevelingRule::ResetToZero,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub const STORAGE_KEY: &'static str = "neon_galaxy_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Volume actually sent to the audio sink
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Simulation parameters derived from these settings
    pub fn sim_config(&self, seed: u64) -> SimConfig {
        SimConfig {
            seed,
            max_particles: self.max_particles(),
            leveling: self.leveling,
            ..SimConfig::default()
        }
    }

    /// Load settings; missing or corrupt data yields defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_from_str() {
        assert_eq!("HIGH".parse::<QualityPreset>(), Ok(QualityPreset::High));
        assert_eq!("med".parse::<QualityPreset>(), Ok(QualityPreset::Medium));
        assert!("ultra".parse::<QualityPreset>().is_err());
    }

    #[test]
    fn test_effective_values() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.max_particles(), 100);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_sim_config_carries_leveling_rule() {
        let settings = Settings {
            leveling: LevelingRule::CarryRemainder,
            ..Settings::default()
        };
        let config = settings.sim_config(9);
        assert_eq!(config.seed, 9);
        assert_eq!(config.leveling, LevelingRule::CarryRemainder);
        assert_eq!(config.max_particles, 500);
    }

    #[test]
    fn test_round_trip_and_partial_json() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            quality: QualityPreset::High,
            muted: true,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);

        // Older documents missing newer fields still load
        store.set(Settings::STORAGE_KEY, "{\"quality\":\"Low\"}").unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded.quality, QualityPreset::Low);
        assert_eq!(loaded.leveling, LevelingRule::ResetToZero);
    }
}
