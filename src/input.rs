//! Input normalization
//!
//! Every control scheme reduces to a `TickInput`: a movement vector no longer
//! than 1, an aim angle and a firing flag. Adapters:
//! - `DigitalInput`: WASD / arrow keys plus absolute pointer aim
//! - `VirtualJoystick`: twin-stick touch controls with smoothed aim
//! - `Autopilot`: a simple bot for headless runs and demos

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

use glam::Vec2;

use crate::sim::{GameState, TickInput};
use crate::{angle_to, normalize_angle};

/// Joystick travel at which movement reaches full speed (px)
pub const JOYSTICK_TRAVEL: f32 = 50.0;
/// Aim stick motion below this is ignored (px)
pub const AIM_DEAD_ZONE: f32 = 10.0;
/// Fraction of the remaining angle closed per frame while aiming by stick
pub const AIM_SMOOTHING: f32 = 0.25;

/// Anything that can drive the player ship
pub trait InputSource {
    /// Sample the controls for the next frame
    fn sample(&mut self, state: &GameState) -> TickInput;

    /// Drop held keys and touches (e.g. on run start)
    fn reset(&mut self) {}
}

/// Logical controls a physical key can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
}

impl Control {
    /// Map a DOM-style key name
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Control::Up),
            "s" | "arrowdown" => Some(Control::Down),
            "a" | "arrowleft" => Some(Control::Left),
            "d" | "arrowright" => Some(Control::Right),
            " " | "space" => Some(Control::Fire),
            "escape" | "p" => Some(Control::Pause),
            _ => None,
        }
    }
}

/// Direction from four digital keys; diagonals are scaled to unit length
pub fn digital_direction(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let x = right as i32 as f32 - left as i32 as f32;
    let y = down as i32 as f32 - up as i32 as f32;
    if x != 0.0 && y != 0.0 {
        Vec2::new(x * FRAC_1_SQRT_2, y * FRAC_1_SQRT_2)
    } else {
        Vec2::new(x, y)
    }
}

/// Keyboard movement with pointer aiming
#[derive(Debug, Clone)]
pub struct DigitalInput {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire_held: bool,
    pause_requested: bool,
    pointer: Vec2,
    /// Fire continuously without holding the fire key
    pub auto_fire: bool,
}

impl Default for DigitalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalInput {
    pub fn new() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            fire_held: false,
            pause_requested: false,
            pointer: Vec2::ZERO,
            auto_fire: true,
        }
    }

    pub fn set_control(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Up => self.up = pressed,
            Control::Down => self.down = pressed,
            Control::Left => self.left = pressed,
            Control::Right => self.right = pressed,
            Control::Fire => self.fire_held = pressed,
            Control::Pause => {
                if pressed {
                    self.pause_requested = true;
                }
            }
        }
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.set_control(control, true);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.set_control(control, false);
        }
    }

    /// Pointer position in arena coordinates
    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn movement(&self) -> Vec2 {
        digital_direction(self.up, self.down, self.left, self.right)
    }
}

impl InputSource for DigitalInput {
    fn sample(&mut self, state: &GameState) -> TickInput {
        TickInput {
            movement: self.movement(),
            aim_angle: angle_to(state.player.pos, self.pointer),
            firing: self.auto_fire || self.fire_held,
            pause: std::mem::take(&mut self.pause_requested),
        }
    }

    fn reset(&mut self) {
        let auto_fire = self.auto_fire;
        *self = Self::new();
        self.auto_fire = auto_fire;
    }
}

/// One touch stick: where the touch began and where it is now
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stick {
    start: Vec2,
    current: Vec2,
}

impl Stick {
    fn offset(&self) -> Vec2 {
        self.current - self.start
    }
}

/// Twin-stick touch controls: left moves, right aims
#[derive(Debug, Clone)]
pub struct VirtualJoystick {
    move_stick: Option<Stick>,
    aim_stick: Option<Stick>,
    current_angle: f32,
    target_angle: f32,
    /// Aim from the pointer while no aim stick is held
    pointer: Option<Vec2>,
}

impl Default for VirtualJoystick {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualJoystick {
    pub fn new() -> Self {
        Self {
            move_stick: None,
            aim_stick: None,
            current_angle: -FRAC_PI_2,
            target_angle: -FRAC_PI_2,
            pointer: None,
        }
    }

    pub fn move_start(&mut self, pos: Vec2) {
        self.move_stick = Some(Stick {
            start: pos,
            current: pos,
        });
    }

    pub fn move_drag(&mut self, pos: Vec2) {
        if let Some(stick) = self.move_stick.as_mut() {
            stick.current = pos;
        }
    }

    pub fn move_end(&mut self) {
        self.move_stick = None;
    }

    pub fn aim_start(&mut self, pos: Vec2) {
        self.aim_stick = Some(Stick {
            start: pos,
            current: pos,
        });
    }

    pub fn aim_drag(&mut self, pos: Vec2) {
        let Some(stick) = self.aim_stick.as_mut() else {
            return;
        };
        stick.current = pos;
        let offset = stick.offset();
        if offset.length() > AIM_DEAD_ZONE {
            self.target_angle = offset.y.atan2(offset.x);
        }
    }

    pub fn aim_end(&mut self) {
        self.aim_stick = None;
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    /// Movement scaled by stick travel, saturating at `JOYSTICK_TRAVEL`
    pub fn movement(&self) -> Vec2 {
        let Some(stick) = self.move_stick else {
            return Vec2::ZERO;
        };
        let offset = stick.offset();
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return Vec2::ZERO;
        }
        offset / distance * (distance.min(JOYSTICK_TRAVEL) / JOYSTICK_TRAVEL)
    }

    /// Advance the smoothed aim one frame
    fn aim(&mut self, from: Vec2) -> f32 {
        if self.aim_stick.is_some() {
            let diff = normalize_angle(self.target_angle - self.current_angle);
            self.current_angle = normalize_angle(self.current_angle + diff * AIM_SMOOTHING);
        } else if let Some(pointer) = self.pointer {
            self.current_angle = angle_to(from, pointer);
            self.target_angle = self.current_angle;
        }
        self.current_angle
    }
}

impl InputSource for VirtualJoystick {
    fn sample(&mut self, state: &GameState) -> TickInput {
        TickInput {
            movement: self.movement(),
            aim_angle: self.aim(state.player.pos),
            firing: true,
            pause: false,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Headless bot: keeps its distance from the closest enemy and shoots it,
/// and always takes the first upgrade on offer (see `Session`).
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Preferred distance to the closest threat
    pub standoff: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { standoff: 220.0 }
    }
}

impl InputSource for Autopilot {
    fn sample(&mut self, state: &GameState) -> TickInput {
        let player = state.player.pos;
        let nearest = state
            .enemies
            .iter()
            .filter(|e| !e.hacked)
            .min_by(|a, b| a.pos.distance(player).total_cmp(&b.pos.distance(player)));

        let Some(target) = nearest else {
            // Drift back toward the middle
            let center = state.arena() / 2.0;
            let to_center = center - player;
            return TickInput {
                movement: if to_center.length() > 20.0 {
                    to_center.normalize_or_zero()
                } else {
                    Vec2::ZERO
                },
                aim_angle: state.player.angle,
                firing: false,
                pause: false,
            };
        };

        let away = player - target.pos;
        let distance = away.length();
        let mut movement = if distance < self.standoff {
            away.normalize_or_zero()
        } else {
            // Strafe around the threat
            away.perp().normalize_or_zero() * 0.5
        };
        // Avoid hugging the walls
        let center = state.arena() / 2.0;
        let margin = state.arena() * 0.15;
        if (player.x - center.x).abs() > center.x - margin.x
            || (player.y - center.y).abs() > center.y - margin.y
        {
            movement = (movement + (center - player).normalize_or_zero()).normalize_or_zero();
        }

        TickInput {
            movement,
            aim_angle: angle_to(player, target.pos),
            firing: true,
            pause: false,
        }
    }
}
