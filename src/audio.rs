//! Audio output
//!
//! The simulation only emits `SoundCue`s. On wasm32 they are synthesized with
//! Web Audio oscillators (no sample files); elsewhere they are logged.

use crate::sim::SoundCue;

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Effective volume in 0.0 - 1.0 (0 mutes)
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that logs cues at trace level (native / headless)
#[derive(Debug, Default)]
pub struct LogAudio {
    volume: f32,
    played: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            played: 0,
        }
    }

    /// Number of cues that were audible
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        if self.volume <= 0.0 {
            return;
        }
        self.played += 1;
        log::trace!("sound: {:?}", cue);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::AudioSink;
    use crate::sim::SoundCue;

    /// Oscillator synth on a Web Audio context
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after a user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Oscillator routed through its own gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single oscillator sweep from `from` to `to` Hz
        fn sweep(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            duration: f64,
            level: f32,
            linear: bool,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            if linear {
                osc.frequency()
                    .linear_ramp_to_value_at_time(to, t + duration)
                    .ok();
            } else {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + duration)
                    .ok();
            }

            osc.start().ok();
            osc.stop_with_when(t + duration).ok();
        }

        /// Level-up - rising major arpeggio
        fn arpeggio(ctx: &AudioContext, level: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 523.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(523.0, t).ok();
            osc.frequency().set_value_at_time(659.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(784.0, t + 0.2).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Shoot => {
                    Self::sweep(ctx, OscillatorType::Square, 440.0, 110.0, 0.1, vol * 0.1, false)
                }
                SoundCue::BossAlert => {
                    Self::sweep(ctx, OscillatorType::Sawtooth, 100.0, 50.0, 0.5, vol * 0.2, true)
                }
                SoundCue::Explosion => {
                    Self::sweep(ctx, OscillatorType::Sawtooth, 200.0, 50.0, 0.3, vol * 0.2, false)
                }
                SoundCue::LevelUp => Self::arpeggio(ctx, vol * 0.2),
                SoundCue::Hit => {
                    Self::sweep(ctx, OscillatorType::Triangle, 150.0, 50.0, 0.15, vol * 0.2, false)
                }
                SoundCue::PowerUp => {
                    Self::sweep(ctx, OscillatorType::Sine, 400.0, 800.0, 0.2, vol * 0.2, true)
                }
            }
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
