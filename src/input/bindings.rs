//! Persistent control bindings.
//!
//! Each player has a keyboard key plus an optional joystick control per
//! action. Bindings persist as two flat JSON maps (`keys.json` and
//! `joystick.json`) in the config directory; a missing or unreadable file
//! falls back to defaults, while structurally valid JSON with a malformed
//! entry is an error.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::input::snapshot::DeviceId;

#[derive(Debug, Error)]
pub enum BindingsError {
    #[error("bindings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bindings encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("malformed joystick binding for `{control}`")]
    MalformedJsBinding { control: String },
    #[error("unknown joystick input kind `{kind}` for `{control}`")]
    UnknownJsKind { control: String, kind: String },
}

/// One pollable joystick input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsInput {
    AxisPos(u8),
    AxisNeg(u8),
    Button(u8),
    HatXPos(u8),
    HatXNeg(u8),
    HatYPos(u8),
    HatYNeg(u8),
}

impl JsInput {
    fn kind(&self) -> &'static str {
        match self {
            JsInput::AxisPos(_) => "axis+",
            JsInput::AxisNeg(_) => "axis-",
            JsInput::Button(_) => "button",
            JsInput::HatXPos(_) => "hatx+",
            JsInput::HatXNeg(_) => "hatx-",
            JsInput::HatYPos(_) => "haty+",
            JsInput::HatYNeg(_) => "haty-",
        }
    }

    fn index(&self) -> u8 {
        match self {
            JsInput::AxisPos(i)
            | JsInput::AxisNeg(i)
            | JsInput::Button(i)
            | JsInput::HatXPos(i)
            | JsInput::HatXNeg(i)
            | JsInput::HatYPos(i)
            | JsInput::HatYNeg(i) => *i,
        }
    }

    fn from_kind(kind: &str, index: u8) -> Option<Self> {
        match kind {
            "axis+" => Some(JsInput::AxisPos(index)),
            "axis-" => Some(JsInput::AxisNeg(index)),
            "button" => Some(JsInput::Button(index)),
            "hatx+" => Some(JsInput::HatXPos(index)),
            "hatx-" => Some(JsInput::HatXNeg(index)),
            "haty+" => Some(JsInput::HatYPos(index)),
            "haty-" => Some(JsInput::HatYNeg(index)),
            _ => None,
        }
    }
}

/// A joystick input on a specific device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsControl {
    pub device: DeviceId,
    pub input: JsInput,
}

impl JsControl {
    pub fn new(device: DeviceId, input: JsInput) -> Self {
        Self { device, input }
    }

    fn to_json(self) -> Value {
        Value::Array(vec![
            Value::from(self.device),
            Value::from(self.input.kind()),
            Value::from(self.input.index()),
        ])
    }

    fn from_json(control: &str, value: &Value) -> Result<Self, BindingsError> {
        let malformed = || BindingsError::MalformedJsBinding {
            control: control.to_string(),
        };
        let entries = value.as_array().ok_or_else(malformed)?;
        if entries.len() != 3 {
            return Err(malformed());
        }
        let device = entries[0]
            .as_u64()
            .and_then(|d| u32::try_from(d).ok())
            .ok_or_else(malformed)?;
        let kind = entries[1].as_str().ok_or_else(malformed)?;
        let index = entries[2]
            .as_u64()
            .and_then(|i| u8::try_from(i).ok())
            .ok_or_else(malformed)?;
        let input = JsInput::from_kind(kind, index).ok_or_else(|| BindingsError::UnknownJsKind {
            control: control.to_string(),
            kind: kind.to_string(),
        })?;
        Ok(JsControl::new(device, input))
    }
}

/// The four bindable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Thrust,
    Left,
    Right,
    Shoot,
}

impl Action {
    const ALL: [Action; 4] = [Action::Thrust, Action::Left, Action::Right, Action::Shoot];

    fn name(&self) -> &'static str {
        match self {
            Action::Thrust => "thrust",
            Action::Left => "left",
            Action::Right => "right",
            Action::Shoot => "shoot",
        }
    }
}

/// One player's control bindings
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBindings {
    pub thrust_key: String,
    pub left_key: String,
    pub right_key: String,
    pub shoot_key: String,
    pub thrust_js: Option<JsControl>,
    pub left_js: Option<JsControl>,
    pub right_js: Option<JsControl>,
    pub shoot_js: Option<JsControl>,
}

impl PlayerBindings {
    pub fn key(&self, action: Action) -> &str {
        match action {
            Action::Thrust => &self.thrust_key,
            Action::Left => &self.left_key,
            Action::Right => &self.right_key,
            Action::Shoot => &self.shoot_key,
        }
    }

    pub fn js(&self, action: Action) -> Option<&JsControl> {
        match action {
            Action::Thrust => self.thrust_js.as_ref(),
            Action::Left => self.left_js.as_ref(),
            Action::Right => self.right_js.as_ref(),
            Action::Shoot => self.shoot_js.as_ref(),
        }
    }

    fn key_mut(&mut self, action: Action) -> &mut String {
        match action {
            Action::Thrust => &mut self.thrust_key,
            Action::Left => &mut self.left_key,
            Action::Right => &mut self.right_key,
            Action::Shoot => &mut self.shoot_key,
        }
    }

    fn js_mut(&mut self, action: Action) -> &mut Option<JsControl> {
        match action {
            Action::Thrust => &mut self.thrust_js,
            Action::Left => &mut self.left_js,
            Action::Right => &mut self.right_js,
            Action::Shoot => &mut self.shoot_js,
        }
    }
}

/// Bindings for both player slots
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    pub players: [PlayerBindings; 2],
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            players: [
                PlayerBindings {
                    thrust_key: "up".to_string(),
                    left_key: "left".to_string(),
                    right_key: "right".to_string(),
                    shoot_key: "space".to_string(),
                    thrust_js: Some(JsControl::new(0, JsInput::AxisNeg(1))),
                    left_js: Some(JsControl::new(0, JsInput::AxisNeg(0))),
                    right_js: Some(JsControl::new(0, JsInput::AxisPos(0))),
                    shoot_js: Some(JsControl::new(0, JsInput::Button(0))),
                },
                PlayerBindings {
                    thrust_key: "w".to_string(),
                    left_key: "a".to_string(),
                    right_key: "d".to_string(),
                    shoot_key: "shift_left".to_string(),
                    thrust_js: Some(JsControl::new(1, JsInput::AxisNeg(1))),
                    left_js: Some(JsControl::new(1, JsInput::AxisNeg(0))),
                    right_js: Some(JsControl::new(1, JsInput::AxisPos(0))),
                    shoot_js: Some(JsControl::new(1, JsInput::Button(0))),
                },
            ],
        }
    }
}

const KEYS_FILE: &str = "keys.json";
const JOYSTICK_FILE: &str = "joystick.json";

impl Bindings {
    /// Load bindings from `dir`, falling back to defaults for any file that
    /// is missing or not valid JSON
    pub fn load(dir: &Path) -> Result<Self, BindingsError> {
        let mut bindings = Bindings::default();
        if let Some(keys) = read_json_map(&dir.join(KEYS_FILE)) {
            for (player, slot_name) in ["player1", "player2"].iter().enumerate() {
                for action in Action::ALL {
                    let control = format!("{}_{}", slot_name, action.name());
                    if let Some(Value::String(key)) = keys.get(control.as_str()) {
                        *bindings.players[player].key_mut(action) = key.clone();
                    }
                }
            }
        }
        if let Some(joystick) = read_json_map(&dir.join(JOYSTICK_FILE)) {
            for (player, slot_name) in ["player1", "player2"].iter().enumerate() {
                for action in Action::ALL {
                    let control = format!("{}_{}", slot_name, action.name());
                    match joystick.get(control.as_str()) {
                        None | Some(Value::Null) => {
                            *bindings.players[player].js_mut(action) = None;
                        }
                        Some(value) => {
                            let parsed = JsControl::from_json(&control, value)?;
                            *bindings.players[player].js_mut(action) = Some(parsed);
                        }
                    }
                }
            }
        }
        Ok(bindings)
    }

    /// Write both binding files to `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<(), BindingsError> {
        fs::create_dir_all(dir)?;
        let mut keys = serde_json::Map::new();
        let mut joystick = serde_json::Map::new();
        for (player, slot_name) in ["player1", "player2"].iter().enumerate() {
            for action in Action::ALL {
                let control = format!("{}_{}", slot_name, action.name());
                keys.insert(
                    control.clone(),
                    Value::from(self.players[player].key(action)),
                );
                let js = match self.players[player].js(action) {
                    Some(control) => control.to_json(),
                    None => Value::Null,
                };
                joystick.insert(control, js);
            }
        }
        fs::write(
            dir.join(KEYS_FILE),
            serde_json::to_string_pretty(&Value::Object(keys))?,
        )?;
        fs::write(
            dir.join(JOYSTICK_FILE),
            serde_json::to_string_pretty(&Value::Object(joystick))?,
        )?;
        Ok(())
    }
}

fn read_json_map(path: &Path) -> Option<serde_json::Map<String, Value>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!(path = %path.display(), %err, "could not read bindings file, using defaults");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            warn!(path = %path.display(), "bindings file is not a JSON object, using defaults");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "could not parse bindings file, using defaults");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = env::temp_dir().join(format!("pulsefire-bindings-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = temp_dir("missing");
        let bindings = Bindings::load(&dir).unwrap();
        assert_eq!(bindings, Bindings::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = temp_dir("roundtrip");
        let mut bindings = Bindings::default();
        bindings.players[0].shoot_key = "return".to_string();
        bindings.players[1].thrust_js = None;
        bindings.players[0].left_js = Some(JsControl::new(2, JsInput::HatXNeg(0)));
        bindings.save(&dir).unwrap();
        let loaded = Bindings::load(&dir).unwrap();
        assert_eq!(loaded, bindings);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(KEYS_FILE), "{not json").unwrap();
        let bindings = Bindings::load(&dir).unwrap();
        assert_eq!(bindings, Bindings::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_joystick_entry_is_an_error() {
        let dir = temp_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(JOYSTICK_FILE),
            r#"{"player1_shoot": [0, "button"]}"#,
        )
        .unwrap();
        let err = Bindings::load(&dir).unwrap_err();
        assert!(matches!(err, BindingsError::MalformedJsBinding { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let dir = temp_dir("kind");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(JOYSTICK_FILE),
            r#"{"player2_left": [1, "trackball", 0]}"#,
        )
        .unwrap();
        let err = Bindings::load(&dir).unwrap_err();
        assert!(matches!(err, BindingsError::UnknownJsKind { .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
