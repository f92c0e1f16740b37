//! The persisted game record.
//!
//! The engine treats this as an opaque serializable blob apart from
//! `last_updated`, which the manager stamps immediately before each save.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

fn setting_on() -> i32 {
    1
}

/// Complete unit of persisted state. Unknown fields in a save file are
/// ignored on load; fields with a `default` attribute may be absent in
/// older files, while `level` and `exp` are required and fail the load
/// when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub name: String,
    pub level: i32,
    pub exp: i32,
    #[serde(default)]
    pub death_count: i32,
    #[serde(default)]
    pub highscore: i32,
    /// Milliseconds since the Unix epoch, stamped just before each save.
    #[serde(default)]
    pub last_updated: i64,
    /// Per-pickup collected flags keyed by pickup id.
    #[serde(default)]
    pub coins_collected: BTreeMap<String, bool>,
    // Settings: 1 = on/good, 0 = off/fast.
    #[serde(default = "setting_on")]
    pub graphics: i32,
    #[serde(default = "setting_on")]
    pub trail_setting: i32,
    /// 1 = left, 0 = right.
    #[serde(default = "setting_on")]
    pub joystick_pos_setting: i32,
    #[serde(default)]
    pub selected_colour: i32,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: 0,
            exp: 0,
            death_count: 0,
            highscore: 0,
            last_updated: 0,
            coins_collected: BTreeMap::new(),
            graphics: 1,
            trail_setting: 1,
            joystick_pos_setting: 1,
            selected_colour: 0,
        }
    }
}

impl GameData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current wall-clock time as the last-updated moment.
    pub fn stamp_last_updated(&mut self) {
        self.last_updated = Utc::now().timestamp_millis();
    }
}
