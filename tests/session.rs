//! End-to-end runs through `Session` with scripted collaborators

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use neon_galaxy::audio::AudioSink;
use neon_galaxy::input::InputSource;
use neon_galaxy::persistence::{KeyValueStore, MemoryStore};
use neon_galaxy::profile::Profile;
use neon_galaxy::sim::{
    FrameView, GameEvent, GamePhase, GameState, PresentationSink, SoundCue, TickInput,
};
use neon_galaxy::{Session, Settings, StorageError};

/// Replays a fixed input, with an optional pause press on one frame
struct Scripted {
    base: TickInput,
    pause_on: Option<u64>,
    frame: u64,
}

impl Scripted {
    fn idle() -> Self {
        Self {
            base: TickInput::default(),
            pause_on: None,
            frame: 0,
        }
    }
}

impl InputSource for Scripted {
    fn sample(&mut self, _state: &GameState) -> TickInput {
        self.frame += 1;
        TickInput {
            pause: self.pause_on == Some(self.frame),
            ..self.base.clone()
        }
    }

    fn reset(&mut self) {
        self.frame = 0;
    }
}

#[derive(Clone, Default)]
struct RecordingAudio(Rc<RefCell<Vec<SoundCue>>>);

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: SoundCue) {
        self.0.borrow_mut().push(cue);
    }
}

#[derive(Clone, Default)]
struct RecordingFrames(Rc<RefCell<Vec<GamePhase>>>);

impl PresentationSink for RecordingFrames {
    fn present(&mut self, frame: &FrameView) {
        self.0.borrow_mut().push(frame.phase);
    }
}

#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().remove(key)
    }
}

struct Harness {
    session: Session,
    audio: RecordingAudio,
    frames: RecordingFrames,
    store: SharedStore,
}

fn harness(input: Scripted) -> Harness {
    let audio = RecordingAudio::default();
    let frames = RecordingFrames::default();
    let store = SharedStore::default();
    let session = Session::new(
        Settings::default(),
        Box::new(input),
        Box::new(audio.clone()),
        Box::new(frames.clone()),
        Box::new(store.clone()),
    );
    Harness {
        session,
        audio,
        frames,
        store,
    }
}

#[test]
fn opening_pick_resumes_play_with_a_powerup_cue() {
    let mut h = harness(Scripted::idle());
    h.session.start_run(Some(11));
    assert_eq!(h.session.state().phase, GamePhase::Upgrading);

    // Frozen while the offer is open
    h.session.frame();
    assert_eq!(h.session.state().time_ticks, 0);

    assert!(h.session.choose_upgrade(0).is_some());
    assert!(h.audio.0.borrow().contains(&SoundCue::PowerUp));

    h.session.frame();
    assert_eq!(h.session.state().time_ticks, 1);
    assert_eq!(
        *h.frames.0.borrow(),
        vec![GamePhase::Upgrading, GamePhase::Playing]
    );
}

#[test]
fn pause_press_freezes_gameplay() {
    let mut h = harness(Scripted {
        pause_on: Some(3),
        ..Scripted::idle()
    });
    h.session.start_run(Some(2));
    h.session.choose_upgrade(0);
    for _ in 0..10 {
        h.session.frame();
    }
    assert_eq!(h.session.state().phase, GamePhase::Paused);
    assert_eq!(h.session.state().time_ticks, 2);

    h.session.toggle_pause();
    h.session.frame();
    assert_eq!(h.session.state().time_ticks, 3);
}

#[test]
fn idle_pilot_is_overrun_and_the_run_is_recorded() {
    let mut h = harness(Scripted {
        base: TickInput {
            movement: Vec2::ZERO,
            aim_angle: 0.0,
            firing: false,
            pause: false,
        },
        ..Scripted::idle()
    });
    h.session.set_auto_pick(true);
    h.session.start_run(Some(7));

    let mut ended = None;
    for _ in 0..60 * 60 * 10 {
        for event in h.session.frame() {
            if let GameEvent::RunEnded(summary) = event {
                ended = Some(summary);
            }
        }
        if h.session.state().is_over() {
            break;
        }
    }

    let summary = ended.expect("run should end");
    assert!(!summary.victory);
    assert_eq!(h.session.state().phase, GamePhase::GameOver);
    assert!(h.session.state().wreckage.is_some());
    assert!(h.audio.0.borrow().contains(&SoundCue::Hit));
    assert_eq!(h.session.last_summary(), Some(&summary));

    let saved = Profile::load(&h.store);
    assert_eq!(saved.stats.games_played, 1);
    assert_eq!(saved.stats.highest_wave, summary.wave);
    assert_eq!(saved.leaderboard.entries.len(), 1);
}

#[test]
fn same_seed_and_input_replay_identically() {
    let run = || {
        let mut h = harness(Scripted {
            base: TickInput {
                movement: Vec2::new(0.3, -0.2),
                aim_angle: 1.0,
                firing: true,
                pause: false,
            },
            ..Scripted::idle()
        });
        h.session.set_auto_pick(true);
        h.session.start_run(Some(99));
        for _ in 0..1500 {
            h.session.frame();
        }
        let state = h.session.state();
        (
            state.summary(),
            state.player.pos,
            state.enemies.len(),
            h.audio.0.borrow().len(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn stop_discards_the_run_without_recording() {
    let mut h = harness(Scripted::idle());
    h.session.start_run(Some(3));
    h.session.choose_upgrade(0);
    h.session.frame();
    h.session.stop();
    assert_eq!(h.session.state().phase, GamePhase::Stopped);
    assert!(h.session.last_summary().is_none());
    assert_eq!(Profile::load(&h.store).stats.games_played, 0);
}
