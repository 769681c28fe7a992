//! IPC bridge between the wry webview (native) and the Dioxus WASM app.
//!
//! **Inbound** (native → WASM): the native side calls
//! `window.__vista_push_view(json)`, `__vista_push_stats(json)`,
//! `__vista_push_panel(json)` and `__vista_push_source(json)`, which
//! dispatch `CustomEvent`s we listen to here.
//!
//! **Outbound** (WASM → native): `window.ipc.postMessage(json)` carries
//! actions back to the gallery.

use dioxus::signals::{Signal, Writable};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

// ── Inbound listeners ────────────────────────────────────────────────────

/// Call `on_json` with the parsed detail of every `event`.
fn listen(event: &str, mut on_json: impl FnMut(Value) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handler = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(
        move |evt: web_sys::CustomEvent| {
            if let Some(text) = evt.detail().as_string() {
                if let Ok(value) = serde_json::from_str::<Value>(&text) {
                    on_json(value);
                }
            }
        },
    );
    if window
        .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
        .is_ok()
    {
        handler.forget();
    }
}

/// Keep `view_sig` in sync with the shell view model.
pub fn register_view_listener(mut view_sig: Signal<Option<Value>>) {
    listen("vista-view", move |view| view_sig.set(Some(view)));
}

/// Keep `stats_sig` in sync with frame statistics.
pub fn register_stats_listener(mut stats_sig: Signal<Option<Value>>) {
    listen("vista-stats", move |stats| stats_sig.set(Some(stats)));
}

/// Keep `pinned_sig` in sync with the native panel state.
pub fn register_panel_listener(mut pinned_sig: Signal<bool>) {
    listen("vista-panel", move |pinned| {
        pinned_sig.set(pinned.as_bool().unwrap_or(true));
    });
}

/// Keep `source_sig` holding the last source text the native side sent.
pub fn register_source_listener(mut source_sig: Signal<Option<Value>>) {
    listen("vista-source", move |source| source_sig.set(Some(source)));
}

// ── Outbound actions ─────────────────────────────────────────────────────

/// Go to any address.
pub fn send_navigate(path: &str) {
    post(&json!({ "action": "navigate", "path": path }));
}

/// Open a category listing.
pub fn send_open_category(category: &str) {
    post(&json!({ "action": "open_category", "category": category }));
}

/// Open a sample.
pub fn send_open_sample(category: &str, sample: &str) {
    post(&json!({
        "action": "open_sample",
        "category": category,
        "sample": sample,
    }));
}

/// Go to the home screen.
pub fn send_go_home() {
    post(&json!({ "action": "go_home" }));
}

/// History back.
pub fn send_back() {
    post(&json!({ "action": "back" }));
}

/// History forward.
pub fn send_forward() {
    post(&json!({ "action": "forward" }));
}

/// Collapse or expand the sidebar.
pub fn send_toggle_sidebar() {
    post(&json!({ "action": "toggle_sidebar" }));
}

/// Edit one panel control.
pub fn send_set_param(group: &str, field: &str, value: &Value) {
    post(&json!({
        "action": "set_param",
        "group": group,
        "field": field,
        "value": value,
    }));
}

/// Restore every panel control to its default.
pub fn send_reset_params() {
    post(&json!({ "action": "reset_params" }));
}

/// Return the camera to its configured placement.
pub fn send_reset_camera() {
    post(&json!({ "action": "reset_camera" }));
}

/// Pin or unpin the docked panel.
pub fn send_toggle_panel() {
    post(&json!({ "action": "toggle_panel" }));
}

/// Drag-resize of the docked panel.
pub fn send_resize_panel(width: u32) {
    post(&json!({ "action": "resize_panel", "width": width }));
}

/// Ask for the mounted sample's source.
pub fn send_view_source() {
    post(&json!({ "action": "view_source" }));
}

/// Copy `text` to the clipboard.
pub fn copy_to_clipboard(text: &str) {
    let _ = js_sys::eval(&format!(
        "navigator.clipboard && navigator.clipboard.writeText({})",
        Value::from(text)
    ));
}

/// Call `window.ipc.postMessage(json)` on the native wry IPC handler.
fn post(msg: &Value) {
    let js = format!("window.ipc.postMessage({})", Value::from(msg.to_string()));
    let _ = js_sys::eval(&js);
}
