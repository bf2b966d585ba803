//! Per-tick input snapshot.
//!
//! The embedder (window loop, test harness) publishes one immutable snapshot
//! per tick; Human controllers derive their intent flags from it by polling.
//! No input callbacks reach into simulation state.

use hashbrown::{HashMap, HashSet};

use crate::game::constants::input::JOYSTICK_THRESHOLD;
use crate::input::bindings::{JsControl, JsInput};

/// Stable logical key identifier ("up", "space", "shift_left", ...)
pub type KeyId = String;

/// Joystick device identifier
pub type DeviceId = u32;

/// Immutable input state for one tick
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    held_keys: HashSet<KeyId>,
    pressed_keys: HashSet<KeyId>,
    axes: HashMap<(DeviceId, u8), f32>,
    hats: HashMap<(DeviceId, u8), (i8, i8)>,
    buttons: HashSet<(DeviceId, u8)>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as held; `pressed` additionally flags it as newly pressed
    /// this tick
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        self.held_keys.insert(key.to_string());
        if pressed {
            self.pressed_keys.insert(key.to_string());
        }
    }

    pub fn release_key(&mut self, key: &str) {
        self.held_keys.remove(key);
        self.pressed_keys.remove(key);
    }

    pub fn set_axis(&mut self, device: DeviceId, axis: u8, value: f32) {
        self.axes.insert((device, axis), value.clamp(-1.0, 1.0));
    }

    pub fn set_hat(&mut self, device: DeviceId, hat: u8, x: i8, y: i8) {
        self.hats.insert((device, hat), (x.signum(), y.signum()));
    }

    pub fn set_button(&mut self, device: DeviceId, button: u8, held: bool) {
        if held {
            self.buttons.insert((device, button));
        } else {
            self.buttons.remove(&(device, button));
        }
    }

    /// Clear the newly-pressed set; call after the simulation consumed the
    /// tick
    pub fn end_tick(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn key_held(&self, key: &str) -> bool {
        self.held_keys.contains(key)
    }

    pub fn key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn axis(&self, device: DeviceId, axis: u8) -> f32 {
        self.axes.get(&(device, axis)).copied().unwrap_or(0.0)
    }

    pub fn hat(&self, device: DeviceId, hat: u8) -> (i8, i8) {
        self.hats.get(&(device, hat)).copied().unwrap_or((0, 0))
    }

    pub fn button_held(&self, device: DeviceId, button: u8) -> bool {
        self.buttons.contains(&(device, button))
    }

    /// Whether a joystick binding is currently active
    pub fn js_active(&self, control: &JsControl) -> bool {
        match control.input {
            JsInput::AxisPos(axis) => self.axis(control.device, axis) > JOYSTICK_THRESHOLD,
            JsInput::AxisNeg(axis) => self.axis(control.device, axis) < -JOYSTICK_THRESHOLD,
            JsInput::Button(button) => self.button_held(control.device, button),
            JsInput::HatXPos(hat) => self.hat(control.device, hat).0 == 1,
            JsInput::HatXNeg(hat) => self.hat(control.device, hat).0 == -1,
            JsInput::HatYPos(hat) => self.hat(control.device, hat).1 == 1,
            JsInput::HatYNeg(hat) => self.hat(control.device, hat).1 == -1,
        }
    }
}
