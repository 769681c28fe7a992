//! Input handling: platform-agnostic pointer events and bindable key
//! actions.

/// Platform-agnostic pointer events.
pub mod event;
/// Gallery-level actions that can be bound to keys.
pub mod keyboard;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
