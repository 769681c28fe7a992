use serde::{Deserialize, Serialize};

use crate::views::home::APP_TITLE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Native window placement.
pub struct WindowOptions {
    /// Title used before the first navigation commits.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: APP_TITLE.to_owned(),
            width: 1280,
            height: 800,
        }
    }
}
