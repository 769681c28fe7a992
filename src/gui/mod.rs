//! Native-side GUI layer: wry webview hosting the vista-ui WASM bundle.
//!
//! The webview is created as a child of the winit window and talks to the
//! gallery through a small JSON IPC bridge.

pub(crate) mod panel;
/// Wry webview creation, IPC parsing and view-model push helpers.
pub mod webview;
