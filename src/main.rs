//! Neon Galaxy entry point
//!
//! Native: a headless runner that plays a run with the autopilot and records
//! it in a profile directory. Web: sets up logging and a session driven by
//! the keyboard and pointer, publishing each frame for the page to draw.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use neon_galaxy::audio::LogAudio;
    use neon_galaxy::input::Autopilot;
    use neon_galaxy::persistence::FileStore;
    use neon_galaxy::ships::{ALL_SHIPS, ShipKind};
    use neon_galaxy::sim::{GameEvent, NullPresentation};
    use neon_galaxy::{QualityPreset, Session, Settings};

    /// Play a headless Neon Galaxy run with the autopilot
    #[derive(Debug, Parser)]
    #[command(name = "neon-galaxy", version, about)]
    pub struct Args {
        /// RNG seed (random when omitted)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Maximum frames to simulate (60 per second)
        #[arg(long, default_value_t = 36_000)]
        pub frames: u64,

        /// Ship to fly (must be unlocked in the profile)
        #[arg(long)]
        pub ship: Option<String>,

        /// Directory holding the profile and settings
        #[arg(long, default_value = ".neon-galaxy")]
        pub profile_dir: PathBuf,

        /// Quality preset (low, medium, high)
        #[arg(long)]
        pub quality: Option<QualityPreset>,
    }

    pub fn run(args: Args) -> Result<()> {
        let store = FileStore::open(&args.profile_dir).with_context(|| {
            format!("failed to open profile directory {}", args.profile_dir.display())
        })?;

        let mut settings = Settings::load(&store);
        if let Some(quality) = args.quality {
            settings.quality = quality;
        }

        let mut session = Session::new(
            settings,
            Box::new(Autopilot::default()),
            Box::new(LogAudio::new()),
            Box::new(NullPresentation),
            Box::new(store),
        );
        session.set_auto_pick(true);

        if let Some(name) = &args.ship {
            let Some(kind) = ShipKind::from_name(name) else {
                let known: Vec<_> = ALL_SHIPS.iter().map(|k| k.config().name).collect();
                bail!("unknown ship '{}' (expected one of: {})", name, known.join(", "));
            };
            if !session.select_ship(kind) {
                bail!("ship '{}' is locked: {}", name, kind.unlock_hint());
            }
        }

        let seed = session.start_run(args.seed);
        log::info!("Seed {}", seed);

        for _ in 0..args.frames {
            for event in session.frame() {
                match event {
                    GameEvent::WaveStarted { wave } => log::info!("Wave {}", wave),
                    GameEvent::BossSpawned { name, .. } => log::info!("Boss incoming: {}", name),
                    GameEvent::LevelUp { level } => log::debug!("Level {}", level),
                    _ => {}
                }
            }
            if session.state().is_over() {
                break;
            }
        }

        let Some(summary) = session.last_summary().copied() else {
            let state = session.state();
            println!(
                "Frame limit reached: wave {}, level {}, score {}",
                state.progress.wave, state.progress.level, state.progress.score
            );
            return Ok(());
        };

        println!(
            "{} - score {} | wave {} | level {} | kills {} | bosses {} | {:.1}s",
            if summary.victory { "VICTORY" } else { "GAME OVER" },
            summary.score,
            summary.wave,
            summary.level,
            summary.kills,
            summary.boss_kills,
            summary.ticks as f64 / 60.0
        );
        for unlock in session.last_unlocks() {
            println!("  {}", unlock.label());
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use neon_galaxy::audio::WebAudio;
    use neon_galaxy::input::{DigitalInput, InputSource};
    use neon_galaxy::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use neon_galaxy::sim::{FrameView, GameState, PresentationSink, TickInput};
    use neon_galaxy::{Session, Settings};

    /// Keyboard state shared between DOM listeners and the session
    #[derive(Clone, Default)]
    struct SharedInput(Rc<RefCell<DigitalInput>>);

    impl InputSource for SharedInput {
        fn sample(&mut self, state: &GameState) -> TickInput {
            self.0.borrow_mut().sample(state)
        }

        fn reset(&mut self) {
            self.0.borrow_mut().reset();
        }
    }

    /// Publishes each frame as JSON on `window.neonGalaxyFrame`
    struct WindowPresentation;

    impl PresentationSink for WindowPresentation {
        fn present(&mut self, frame: &FrameView) {
            let Some(window) = web_sys::window() else { return };
            match serde_json::to_string(frame) {
                Ok(json) => {
                    let _ = js_sys::Reflect::set(
                        &window,
                        &JsValue::from_str("neonGalaxyFrame"),
                        &JsValue::from_str(&json),
                    );
                }
                Err(e) => log::warn!("Failed to encode frame: {}", e),
            }
        }
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStorage::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), progress will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    fn listen<F>(window: &web_sys::Window, event: &str, handler: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_frame(window: &web_sys::Window, f: &Closure<dyn FnMut()>) {
        let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Neon Galaxy starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };

        let store = open_store();
        let settings = Settings::load(store.as_ref());
        let input = SharedInput::default();

        let session = Rc::new(RefCell::new(Session::new(
            settings,
            Box::new(input.clone()),
            Box::new(WebAudio::new()),
            Box::new(WindowPresentation),
            store,
        )));
        session.borrow_mut().start_run(None);

        {
            let input = input.clone();
            listen(&window, "keydown", move |event| {
                if let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    input.0.borrow_mut().key_down(&key.key());
                }
            });
        }
        {
            let input = input.clone();
            listen(&window, "keyup", move |event| {
                if let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    input.0.borrow_mut().key_up(&key.key());
                }
            });
        }
        {
            let input = input.clone();
            listen(&window, "mousemove", move |event| {
                if let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() {
                    let pos = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                    input.0.borrow_mut().pointer_moved(pos);
                }
            });
        }

        // Fixed 60 Hz loop on animation frames
        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            session.borrow_mut().frame();
            if let (Some(window), Some(cb)) = (web_sys::window(), f.borrow().as_ref()) {
                request_frame(&window, cb);
            }
        }) as Box<dyn FnMut()>));
        if let Some(cb) = g.borrow().as_ref() {
            request_frame(&window, cb);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
