use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Parameter panel placement.
pub struct PanelOptions {
    /// Panel shown at start-up.
    pub visible: bool,
    /// Panel width in logical pixels.
    pub width: f32,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            visible: true,
            width: 320.0,
        }
    }
}
