//! Drag-and-drop configuration.

use serde::{Deserialize, Serialize};

/// Sensor activation constraints and collision tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    /// Press duration before a mouse/pen press becomes a drag.
    #[serde(default = "default_pointer_delay")]
    pub pointer_delay_ms: u64,
    /// Movement (px) tolerated during the pointer delay before it counts as a click.
    #[serde(default = "default_tolerance")]
    pub pointer_tolerance_px: f64,
    /// Press duration before a touch becomes a drag.
    #[serde(default = "default_touch_delay")]
    pub touch_delay_ms: u64,
    /// Movement (px) tolerated during the touch delay.
    #[serde(default = "default_tolerance")]
    pub touch_tolerance_px: f64,
    /// Padding added around generic droppables for the relaxed hit test.
    #[serde(default = "default_padding")]
    pub collision_padding_px: f64,
    /// Id of the designated root folder; dropping on it moves to the top level.
    #[serde(default = "default_root_folder")]
    pub root_folder_id: String,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            pointer_delay_ms: default_pointer_delay(),
            pointer_tolerance_px: default_tolerance(),
            touch_delay_ms: default_touch_delay(),
            touch_tolerance_px: default_tolerance(),
            collision_padding_px: default_padding(),
            root_folder_id: default_root_folder(),
        }
    }
}

fn default_pointer_delay() -> u64 {
    150
}

fn default_touch_delay() -> u64 {
    250
}

fn default_tolerance() -> f64 {
    5.0
}

fn default_padding() -> f64 {
    8.0
}

fn default_root_folder() -> String {
    "root".to_string()
}
