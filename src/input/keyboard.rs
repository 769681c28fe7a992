use serde::{Deserialize, Serialize};

/// Gallery actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML files stay readable:
/// ```toml
/// [keybindings.bindings]
/// back = "Backspace"
/// next_category = "BracketRight"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Go back in navigation history.
    Back,
    /// Go forward in navigation history.
    Forward,
    /// Return to the home screen.
    Home,
    /// Open the next category in menu order.
    NextCategory,
    /// Open the previous category in menu order.
    PreviousCategory,
    /// Open the next sample of the current category.
    NextSample,
    /// Open the previous sample of the current category.
    PreviousSample,
    /// Collapse or expand the sidebar.
    ToggleSidebar,
    /// Show or hide the parameter panel.
    TogglePanel,
    /// Return the camera to its configured placement.
    ResetCamera,
}
