//! Session: drives the simulation and wires it to its collaborators
//!
//! Per frame: sample input, tick, route sound cues to audio, present a
//! snapshot. Finished runs are folded into the profile and persisted.

use crate::audio::AudioSink;
use crate::input::InputSource;
use crate::persistence::KeyValueStore;
use crate::profile::{Profile, Unlock};
use crate::settings::Settings;
use crate::ships::{ShipKind, ship_config};
use crate::sim::progression::offer_upgrade;
use crate::sim::{
    GameEvent, GameState, PresentationSink, RunSummary, ScreenShake, Upgrade, build_frame,
    choose_upgrade, tick, toggle_pause,
};

pub struct Session {
    settings: Settings,
    state: GameState,
    profile: Profile,
    input: Box<dyn InputSource>,
    audio: Box<dyn AudioSink>,
    presentation: Box<dyn PresentationSink>,
    store: Box<dyn KeyValueStore>,
    /// Resolve every upgrade offer with its first choice
    auto_pick: bool,
    last_summary: Option<RunSummary>,
    last_unlocks: Vec<Unlock>,
}

impl Session {
    pub fn new(
        settings: Settings,
        input: Box<dyn InputSource>,
        mut audio: Box<dyn AudioSink>,
        presentation: Box<dyn PresentationSink>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let profile = Profile::load(store.as_ref());
        let ship = ship_config(profile.selected_ship);
        let state = GameState::new(settings.sim_config(0), ship);
        audio.set_volume(settings.effective_volume());

        Self {
            settings,
            state,
            profile,
            input,
            audio,
            presentation,
            store,
            auto_pick: false,
            last_summary: None,
            last_unlocks: Vec::new(),
        }
    }

    pub fn set_auto_pick(&mut self, enabled: bool) {
        self.auto_pick = enabled;
    }

    /// Begin a new run with the selected ship. A missing seed draws a
    /// random one. Returns the seed actually used.
    pub fn start_run(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(rand::random);
        let ship = ship_config(self.profile.selected_ship);

        self.state = GameState::new(self.settings.sim_config(seed), ship);
        self.input.reset();
        self.last_summary = None;
        self.last_unlocks.clear();
        self.state.start_run(ship);

        // Every run opens with a free pick
        offer_upgrade(&mut self.state, false);
        self.flush_events();
        seed
    }

    /// Advance one frame and return the events it produced
    pub fn frame(&mut self) -> Vec<GameEvent> {
        let input = self.input.sample(&self.state);
        tick(&mut self.state, &input);

        if self.auto_pick && self.state.offer.is_some() {
            choose_upgrade(&mut self.state, 0);
        }
        if !self.settings.effective_screen_shake() {
            self.state.shake = ScreenShake::default();
        }

        let events = self.flush_events();
        self.presentation.present(&build_frame(&self.state));
        events
    }

    /// Route pending events to audio and the profile
    fn flush_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::Sound(cue) => self.audio.play(*cue),
                GameEvent::RunEnded(summary) => self.finish_run(*summary),
                _ => {}
            }
        }
        events
    }

    fn finish_run(&mut self, summary: RunSummary) {
        log::info!(
            "Run ended: score {}, wave {}, level {}{}",
            summary.score,
            summary.wave,
            summary.level,
            if summary.victory { " (victory)" } else { "" }
        );
        self.last_unlocks = self.profile.record_run(&summary, now_ms());
        self.last_summary = Some(summary);
        self.save_profile();
    }

    fn save_profile(&mut self) {
        if let Err(e) = self.profile.save(self.store.as_mut()) {
            log::warn!("Failed to save profile: {}", e);
        }
    }

    pub fn choose_upgrade(&mut self, index: usize) -> Option<Upgrade> {
        let upgrade = choose_upgrade(&mut self.state, index);
        self.flush_events();
        upgrade
    }

    pub fn toggle_pause(&mut self) {
        toggle_pause(&mut self.state);
    }

    /// Abandon the current run without recording it
    pub fn stop(&mut self) {
        self.state.stop();
        self.state.drain_events();
    }

    /// Select the ship for the next run; locked ships are refused
    pub fn select_ship(&mut self, kind: ShipKind) -> bool {
        if !self.profile.select_ship(kind) {
            log::warn!("Ship {} is locked", kind.config().name);
            return false;
        }
        self.save_profile();
        true
    }

    /// Replace the settings, persist them and apply what can change mid-run
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.audio.set_volume(self.settings.effective_volume());
        self.state.config.max_particles = self.settings.max_particles();
        if let Err(e) = self.settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Summary of the most recently finished run
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    /// What the most recently finished run unlocked
    pub fn last_unlocks(&self) -> &[Unlock] {
        &self.last_unlocks
    }
}

/// Wall-clock timestamp for leaderboard entries (ms since the epoch)
#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}
