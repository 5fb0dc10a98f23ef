//! Selection behaviour configuration.

use serde::{Deserialize, Serialize};

/// Click disambiguation and range-selection limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Window in milliseconds in which a second click on the same item opens it.
    #[serde(default = "default_double_click")]
    pub double_click_ms: u64,
    /// Upper bound on the number of items a single range selection may span.
    #[serde(default = "default_max_range")]
    pub max_range_items: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            double_click_ms: default_double_click(),
            max_range_items: default_max_range(),
        }
    }
}

fn default_double_click() -> u64 {
    350
}

fn default_max_range() -> usize {
    1000
}
