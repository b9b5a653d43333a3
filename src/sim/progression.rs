//! Run progression: XP, levels, upgrade offers, waves and boss clears

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, SoundCue};
use super::schedule::{Task, ms_to_ticks};
use super::spawn;
use super::state::{GamePhase, GameState, palette};
use super::upgrades::{Upgrade, UpgradeOffer};
use crate::consts::*;

/// What happens to surplus XP on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelingRule {
    /// XP drops to zero, surplus is lost
    #[default]
    ResetToZero,
    /// Surplus carries into the next level
    CarryRemainder,
}

/// Score and leveling counters of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    pub wave: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_required: u32,
    pub kills: u32,
    pub boss_kills: u32,
    pub boss_killed: bool,
    pub boss_spawned_this_wave: bool,
    /// Regular enemy HP multiplier
    pub difficulty: f32,
    /// An elite offer is queued behind the open one
    pub pending_elite: bool,
    /// Regular offers queued behind the open one
    pub pending_offers: u32,
    /// The open offer interrupted an explicit pause
    pub resume_paused: bool,
    /// A boss died and its clear has not run yet; wave and spawn timers hold
    pub boss_clear_pending: bool,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            score: 0,
            wave: 1,
            xp: 0,
            level: 1,
            xp_required: INITIAL_XP_REQUIRED,
            kills: 0,
            boss_kills: 0,
            boss_killed: false,
            boss_spawned_this_wave: false,
            difficulty: 1.0,
            pending_elite: false,
            pending_offers: 0,
            resume_paused: false,
            boss_clear_pending: false,
        }
    }

    /// Add XP; returns true when it triggered a level-up.
    /// At most one level is gained per call.
    pub fn add_xp(&mut self, amount: u32, rule: LevelingRule) -> bool {
        self.xp = self.xp.saturating_add(amount);
        if self.xp < self.xp_required {
            return false;
        }
        self.xp = match rule {
            LevelingRule::ResetToZero => 0,
            LevelingRule::CarryRemainder => self.xp - self.xp_required,
        };
        self.level += 1;
        let next = (self.xp_required as f32 * XP_SCALING).floor() as u32;
        self.xp_required = next.max(self.xp_required + 1);
        true
    }

    pub fn is_boss_wave(&self) -> bool {
        self.wave % BOSS_WAVE_INTERVAL == 0
    }
}

/// Grant XP and run level-up effects if the threshold was crossed
pub fn gain_xp(state: &mut GameState, amount: u32) {
    let rule = state.config.leveling;
    if state.progress.add_xp(amount, rule) {
        level_up(state);
    }
}

fn level_up(state: &mut GameState) {
    let level = state.progress.level;
    log::info!("Level up: {}", level);
    state.emit(GameEvent::Sound(SoundCue::LevelUp));
    state.emit(GameEvent::LevelUp { level });

    let center = state.player.pos;
    state.explosion_ring(center, palette::CYAN, 30);
    state.shake.trigger(5.0, 200.0);

    // Shockwave: stun nearby enemies, no damage
    let mut stunned = Vec::new();
    for enemy in state.enemies.iter_mut() {
        if enemy.pos.distance(center) < LEVEL_UP_STUN_RADIUS {
            enemy.stun_timer = LEVEL_UP_STUN_TICKS;
            stunned.push(enemy.pos);
        }
    }
    for pos in stunned {
        state.burst(pos, palette::WHITE, 5);
    }

    offer_upgrade(state, false);
}

/// Open an upgrade choice and pause gameplay.
/// An offer arriving while another one is open is queued instead.
pub fn offer_upgrade(state: &mut GameState, elite: bool) {
    if state.is_over() || state.phase == GamePhase::Stopped {
        return;
    }
    if state.offer.is_some() {
        if elite {
            state.progress.pending_elite = true;
        } else {
            state.progress.pending_offers += 1;
        }
        return;
    }
    if state.phase == GamePhase::Paused {
        state.progress.resume_paused = true;
    }
    let offer = UpgradeOffer::draw(&mut state.rng, elite);
    log::debug!("Upgrade offer ({}): {:?}", if elite { "elite" } else { "common" }, offer.choices);
    state.offer = Some(offer);
    state.phase = GamePhase::Upgrading;
    state.emit(GameEvent::UpgradeOffered { elite });
}

/// Resolve the open offer with the choice at `index`.
/// Returns the applied upgrade, or `None` if there was nothing to choose.
pub fn choose_upgrade(state: &mut GameState, index: usize) -> Option<Upgrade> {
    let upgrade = *state.offer.as_ref()?.choices.get(index)?;
    upgrade.apply(&mut state.player);
    state.offer = None;
    log::info!("Upgrade chosen: {}", upgrade.name());
    state.emit(GameEvent::Sound(SoundCue::PowerUp));
    state.emit(GameEvent::UpgradeApplied(upgrade));

    if state.progress.pending_offers > 0 {
        state.progress.pending_offers -= 1;
        offer_upgrade(state, false);
    } else if state.phase == GamePhase::Upgrading {
        state.phase = if std::mem::take(&mut state.progress.resume_paused) {
            GamePhase::Paused
        } else {
            GamePhase::Playing
        };
    }

    if state.progress.pending_elite {
        state.progress.pending_elite = false;
        state
            .schedule
            .after(Task::EliteOffer, ms_to_ticks(ELITE_OFFER_DELAY_MS));
    }
    Some(upgrade)
}

/// Gameplay timers only act during unpaused play, and hold between a boss
/// death and its clear
fn gameplay_running(state: &GameState) -> bool {
    state.is_active() && !state.is_paused() && !state.progress.boss_clear_pending
}

/// Repeating spawn roll
pub fn on_spawn_tick(state: &mut GameState) {
    if !gameplay_running(state) {
        return;
    }
    let wave = state.progress.wave;
    if state.progress.is_boss_wave() {
        if !state.progress.boss_spawned_this_wave && state.enemies.is_empty() {
            state.progress.boss_spawned_this_wave = true;
            spawn::spawn(state, wave, true);
        }
        return;
    }
    let chance = 0.05 * wave as f32 + 0.02;
    if state.rng.random::<f32>() < chance {
        spawn::spawn(state, wave, false);
    }
}

/// Repeating wave advance (suspended while a boss is alive)
pub fn on_wave_tick(state: &mut GameState) {
    if !gameplay_running(state) || state.has_boss() {
        return;
    }
    advance_wave(state);
}

/// Move to the next wave and queue its staggered batch
fn advance_wave(state: &mut GameState) {
    state.progress.wave += 1;
    let wave = state.progress.wave;
    log::info!("Wave {}", wave);
    state.emit(GameEvent::WaveStarted { wave });

    if state.progress.is_boss_wave() {
        return;
    }
    let batch = (5 + wave / 2).min(10) as u64;
    let stagger = ms_to_ticks(BATCH_SPAWN_STAGGER_MS);
    for i in 0..batch {
        state.schedule.after(Task::BatchSpawn, stagger * (i + 1));
    }
}

/// One enemy of a wave batch
pub fn on_batch_spawn(state: &mut GameState) {
    if !gameplay_running(state) || state.progress.is_boss_wave() {
        return;
    }
    let wave = state.progress.wave;
    spawn::spawn(state, wave, false);
}

/// Follow-up to a boss death: victory or the next wave
pub fn on_boss_clear(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    state.progress.boss_clear_pending = false;
    if state.progress.wave >= FINAL_WAVE {
        end_run(state, true);
        return;
    }
    state.progress.wave += 1;
    state.progress.boss_spawned_this_wave = false;
    state.progress.difficulty += DIFFICULTY_STEP;
    state.schedule.restart(Task::WaveTick);
    let wave = state.progress.wave;
    log::info!("Boss cleared, wave {} (difficulty {:.1})", wave, state.progress.difficulty);
    state.emit(GameEvent::WaveStarted { wave });
    offer_upgrade(state, true);
}

/// Deferred elite offer
pub fn on_elite_offer(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    offer_upgrade(state, true);
}

/// Terminal transition: defeat or victory
pub fn end_run(state: &mut GameState, victory: bool) {
    if !state.is_active() {
        return;
    }
    state.phase = if victory {
        GamePhase::Victory
    } else {
        GamePhase::GameOver
    };
    if !victory {
        state.wreckage = Some(state.player.pos);
    }
    state.offer = None;
    state.schedule.clear();
    let summary = state.summary();
    log::info!(
        "Run ended ({}): score {}, wave {}, kills {}",
        if victory { "victory" } else { "destroyed" },
        summary.score,
        summary.wave,
        summary.kills
    );
    state.emit(GameEvent::RunEnded(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::{ShipKind, ship_config};
    use crate::sim::combat;
    use crate::sim::state::{EnemyKind, SimConfig};
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing_state() -> GameState {
        let ship = ship_config(ShipKind::Pioneer);
        let mut state = GameState::new(SimConfig::default(), ship);
        state.start_run(ship);
        state
    }

    #[test]
    fn test_level_up_resets_xp_and_scales_requirement() {
        let mut p = Progression::new();
        assert!(!p.add_xp(90, LevelingRule::ResetToZero));
        assert!(p.add_xp(30, LevelingRule::ResetToZero));
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 0);
        assert_eq!(p.xp_required, 120);
    }

    #[test]
    fn test_carry_remainder_keeps_surplus() {
        let mut p = Progression::new();
        assert!(p.add_xp(130, LevelingRule::CarryRemainder));
        assert_eq!(p.xp, 30);
        assert_eq!(p.xp_required, 120);
    }

    #[test]
    fn test_level_up_stuns_and_opens_offer() {
        let mut state = playing_state();
        let pos = state.player.pos;
        let near = spawn::spawn_enemy(&mut state, EnemyKind::Basic, pos + Vec2::new(100.0, 0.0), 1);
        let far = spawn::spawn_enemy(&mut state, EnemyKind::Basic, pos + Vec2::new(600.0, 0.0), 1);

        gain_xp(&mut state, 100);
        assert_eq!(state.progress.level, 2);
        assert_eq!(state.enemy(near).unwrap().stun_timer, LEVEL_UP_STUN_TICKS);
        assert_eq!(state.enemy(far).unwrap().stun_timer, 0);
        assert_eq!(state.phase, GamePhase::Upgrading);
        assert!(!state.offer.as_ref().unwrap().elite);
        assert!(state.enemy(near).unwrap().hp > 0.0);
    }

    #[test]
    fn test_choose_upgrade_resumes_play() {
        let mut state = playing_state();
        offer_upgrade(&mut state, false);
        let expected = state.offer.as_ref().unwrap().choices[1];
        assert_eq!(choose_upgrade(&mut state, 1), Some(expected));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.offer.is_none());
        assert_eq!(choose_upgrade(&mut state, 0), None);
    }

    #[test]
    fn test_choose_upgrade_out_of_range_keeps_offer() {
        let mut state = playing_state();
        offer_upgrade(&mut state, false);
        assert_eq!(choose_upgrade(&mut state, 7), None);
        assert!(state.offer.is_some());
        assert_eq!(state.phase, GamePhase::Upgrading);
    }

    #[test]
    fn test_elite_offer_queues_behind_open_offer() {
        let mut state = playing_state();
        offer_upgrade(&mut state, false);
        offer_upgrade(&mut state, true);
        assert!(state.progress.pending_elite);
        assert!(!state.offer.as_ref().unwrap().elite);

        choose_upgrade(&mut state, 0);
        assert!(!state.progress.pending_elite);
        assert_eq!(state.schedule.pending(Task::EliteOffer), 1);
        for _ in 0..ms_to_ticks(ELITE_OFFER_DELAY_MS) {
            for task in state.schedule.advance() {
                assert_eq!(task, Task::EliteOffer);
                on_elite_offer(&mut state);
            }
        }
        assert!(state.offer.as_ref().unwrap().elite);
    }

    fn kill_boss(state: &mut GameState, wave: u32) {
        state.progress.wave = wave;
        state.progress.boss_spawned_this_wave = true;
        let id = spawn::spawn(state, wave, true);
        if let Some(boss) = state.enemies.iter_mut().find(|e| e.id == id) {
            boss.hp = 0.0;
        }
        let dead = combat::reap_dead(state);
        combat::handle_deaths(state, dead);
        assert!(!state.has_boss());
        // Resolve the level-up the boss XP paid for
        while state.offer.is_some() {
            choose_upgrade(state, 0);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_wave_timer_holds_until_boss_clear() {
        let mut state = playing_state();
        kill_boss(&mut state, 5);
        state.drain_events();

        on_wave_tick(&mut state);
        on_spawn_tick(&mut state);
        assert_eq!(state.progress.wave, 5);
        assert_eq!(state.schedule.pending(Task::BatchSpawn), 0);

        on_boss_clear(&mut state);
        assert_eq!(state.progress.wave, 6);
        assert!(!state.progress.boss_clear_pending);
        let waves: Vec<u32> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::WaveStarted { wave } => Some(wave),
                _ => None,
            })
            .collect();
        assert_eq!(waves, vec![6]);
    }

    #[test]
    fn test_final_boss_death_never_advances_wave() {
        let mut state = playing_state();
        kill_boss(&mut state, FINAL_WAVE);
        on_wave_tick(&mut state);
        on_boss_clear(&mut state);
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.progress.wave, FINAL_WAVE);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::WaveStarted { .. }))
        );
    }

    #[test]
    fn test_regular_offers_queue_behind_open_offer() {
        let mut state = playing_state();
        offer_upgrade(&mut state, false);
        offer_upgrade(&mut state, false);
        assert_eq!(state.progress.pending_offers, 1);

        choose_upgrade(&mut state, 0);
        assert_eq!(state.phase, GamePhase::Upgrading);
        assert!(state.offer.is_some());
        assert_eq!(state.progress.pending_offers, 0);

        choose_upgrade(&mut state, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.offer.is_none());
    }

    #[test]
    fn test_offer_during_pause_returns_to_pause() {
        let mut state = playing_state();
        state.phase = GamePhase::Paused;
        on_boss_clear(&mut state);
        assert_eq!(state.phase, GamePhase::Upgrading);

        choose_upgrade(&mut state, 0);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.progress.resume_paused);
    }

    #[test]
    fn test_boss_clear_advances_wave() {
        let mut state = playing_state();
        state.progress.wave = 5;
        state.progress.boss_spawned_this_wave = true;
        on_boss_clear(&mut state);
        assert_eq!(state.progress.wave, 6);
        assert!(!state.progress.boss_spawned_this_wave);
        assert!((state.progress.difficulty - 1.2).abs() < 1e-6);
        assert!(state.offer.as_ref().unwrap().elite);
    }

    #[test]
    fn test_final_boss_clear_wins() {
        let mut state = playing_state();
        state.progress.wave = FINAL_WAVE;
        on_boss_clear(&mut state);
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.progress.wave, FINAL_WAVE);
        assert!(state.schedule.is_empty());
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::RunEnded(summary)) if summary.victory
        ));
    }

    #[test]
    fn test_wave_tick_queues_batch() {
        let mut state = playing_state();
        on_wave_tick(&mut state);
        assert_eq!(state.progress.wave, 2);
        assert_eq!(state.schedule.pending(Task::BatchSpawn), 6);
    }

    #[test]
    fn test_wave_tick_waits_for_boss() {
        let mut state = playing_state();
        state.progress.wave = 5;
        spawn::spawn(&mut state, 5, true);
        on_wave_tick(&mut state);
        assert_eq!(state.progress.wave, 5);
    }

    #[test]
    fn test_spawn_tick_on_boss_wave_waits_for_empty_arena() {
        let mut state = playing_state();
        state.progress.wave = 5;
        spawn::spawn_enemy(&mut state, EnemyKind::Basic, Vec2::ZERO, 5);
        on_spawn_tick(&mut state);
        assert!(!state.has_boss());

        state.enemies.clear();
        on_spawn_tick(&mut state);
        assert!(state.has_boss());
        assert!(state.progress.boss_spawned_this_wave);

        state.enemies.clear();
        on_spawn_tick(&mut state);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_timers_do_nothing_while_paused() {
        let mut state = playing_state();
        state.phase = GamePhase::Paused;
        on_wave_tick(&mut state);
        on_batch_spawn(&mut state);
        for _ in 0..100 {
            on_spawn_tick(&mut state);
        }
        assert_eq!(state.progress.wave, 1);
        assert!(state.enemies.is_empty());
    }

    proptest! {
        #[test]
        fn prop_xp_required_strictly_increases(
            gains in proptest::collection::vec(0u32..500, 1..60),
            carry in any::<bool>(),
        ) {
            let rule = if carry { LevelingRule::CarryRemainder } else { LevelingRule::ResetToZero };
            let mut p = Progression::new();
            for gain in gains {
                let before = p.xp_required;
                let leveled = p.add_xp(gain, rule);
                if leveled {
                    prop_assert!(p.xp_required > before);
                } else {
                    prop_assert_eq!(p.xp_required, before);
                }
            }
        }
    }
}
