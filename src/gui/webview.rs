//! Wry webview child of the winit window.
//!
//! Creates a [`wry::WebView`] that hosts the vista-ui WASM bundle through a
//! custom `vista://` protocol. The native side pushes the shell view model
//! and frame statistics; the web side answers with JSON actions.

use std::borrow::Cow;
use std::sync::mpsc;

use rust_embed::RustEmbed;
use serde::Serialize;
use serde_json::Value;
use wry::http::{header::CONTENT_TYPE, Response};
use wry::{dpi, Rect, WebView, WebViewBuilder};

use crate::gallery::UiAction;
use crate::shell::ShellView;
use crate::views::SourceView;

/// Embedded vista-ui dist output (built by `trunk build`).
#[derive(RustEmbed)]
#[folder = "crates/vista-ui/dist/"]
struct UiAssets;

/// Messages sent from the webview WASM app to the native side.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// Anything the gallery handles.
    Gallery(UiAction),
    /// Pin or unpin the docked panel.
    TogglePanel,
    /// Drag-resize of the docked panel, in physical pixels.
    ResizePanel {
        /// Requested width.
        width: u32,
    },
    /// The code viewer wants the mounted sample's source.
    ViewSource,
}

/// Where the webview sits inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Covers the whole window; no viewport is visible.
    Full,
    /// Docked along the right edge next to the viewport.
    Docked {
        /// Panel width in physical pixels.
        width: u32,
    },
    /// Docked but floating with a margin on every side.
    Floating {
        /// Panel width in physical pixels.
        width: u32,
        /// Gap to the window edges.
        margin: u32,
    },
    /// Parked off-screen to the right.
    Hidden {
        /// Panel width in physical pixels.
        width: u32,
    },
}

impl Placement {
    /// `(x, y, width, height)` inside a `window_width` x `window_height`
    /// window.
    #[must_use]
    pub fn rect(self, window_width: u32, window_height: u32) -> (i32, i32, u32, u32) {
        match self {
            Self::Full => (0, 0, window_width, window_height),
            Self::Docked { width } => {
                let width = width.min(window_width);
                (
                    window_width.saturating_sub(width) as i32,
                    0,
                    width,
                    window_height,
                )
            }
            Self::Floating { width, margin } => {
                let width = width.min(window_width.saturating_sub(margin * 2));
                (
                    window_width.saturating_sub(width + margin) as i32,
                    margin as i32,
                    width,
                    window_height.saturating_sub(margin * 2),
                )
            }
            Self::Hidden { width } => (window_width as i32, 0, width, window_height),
        }
    }

    /// Physical [`Rect`] for [`WebView::set_bounds`].
    #[must_use]
    pub fn bounds(self, window_width: u32, window_height: u32) -> Rect {
        let (x, y, width, height) = self.rect(window_width, window_height);
        Rect {
            position: dpi::Position::Physical(dpi::PhysicalPosition::new(x, y)),
            size: dpi::Size::Physical(dpi::PhysicalSize::new(width, height)),
        }
    }
}

/// Frame statistics shown under the parameter panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    /// Smoothed frames per second.
    pub fps: f32,
    /// Meshes resident on the GPU for the current mount.
    pub resident_meshes: usize,
    /// Surfaces created since start-up.
    pub surfaces_created: u64,
}

/// Create the wry webview as a child of the given window.
///
/// Returns `(webview, message_rx)`; the receiver yields [`UiMessage`]s
/// from the WASM app.
///
/// # Errors
///
/// Returns the wry error if the platform webview cannot be created.
pub fn create_webview<W: wry::raw_window_handle::HasWindowHandle>(
    window: &W,
    placement: Placement,
    window_width: u32,
    window_height: u32,
) -> Result<(WebView, mpsc::Receiver<UiMessage>), wry::Error> {
    let (tx, rx) = mpsc::channel();

    let webview = WebViewBuilder::new()
        .with_bounds(placement.bounds(window_width, window_height))
        .with_custom_protocol("vista".into(), |_id, request| {
            let path = request.uri().path();
            let path = if path == "/" { "index.html" } else { &path[1..] };
            serve_asset(path)
        })
        .with_url("vista://localhost/")
        .with_initialization_script(BRIDGE_JS)
        .with_ipc_handler(move |req| {
            match serde_json::from_str::<Value>(req.body()) {
                Ok(msg) => match parse_message(&msg) {
                    Some(message) => {
                        let _ = tx.send(message);
                    }
                    None => log::warn!("ignoring unknown ui message: {msg}"),
                },
                Err(e) => log::warn!("malformed ui message: {e}"),
            }
        })
        .build_as_child(window)?;

    Ok((webview, rx))
}

/// Push the shell view model.
pub fn push_view(webview: &WebView, view: &ShellView) {
    push(webview, "__vista_push_view", view);
}

/// Push frame statistics.
pub fn push_stats(webview: &WebView, stats: &FrameStats) {
    push(webview, "__vista_push_stats", stats);
}

/// Push the mounted sample's source for the code viewer.
pub fn push_source(webview: &WebView, source: &SourceView) {
    push(webview, "__vista_push_source", source);
}

/// Tell the UI whether the panel is pinned.
pub fn push_panel_pinned(webview: &WebView, pinned: bool) {
    push(webview, "__vista_push_panel", &pinned);
}

// ── Internals ────────────────────────────────────────────────────────────

fn serve_asset(path: &str) -> Response<Cow<'static, [u8]>> {
    let response = match UiAssets::get(path) {
        Some(asset) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .header(CONTENT_TYPE, mime.as_ref())
                .body(Cow::from(asset.data.into_owned()))
        }
        None => {
            log::debug!("ui asset not found: {path}");
            Response::builder().status(404).body(Cow::from(Vec::new()))
        }
    };
    response.unwrap_or_else(|_| Response::new(Cow::from(Vec::new())))
}

fn push<T: Serialize + ?Sized>(webview: &WebView, function: &str, payload: &T) {
    let json = match serde_json::to_string(payload) {
        Ok(json) => json,
        Err(e) => {
            log::error!("cannot serialize {function} payload: {e}");
            return;
        }
    };
    if let Err(e) = webview.evaluate_script(&script_call(function, &json)) {
        log::debug!("{function} failed: {e}");
    }
}

/// `window.<function>('<json>')` with the JSON escaped for a single-quoted
/// string literal.
fn script_call(function: &str, json: &str) -> String {
    let escaped = json
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029");
    format!("window.{function}('{escaped}')")
}

/// JavaScript injected before page load. Defines the bridge functions the
/// native side calls and re-dispatches them as `CustomEvent`s.
///
/// Pushes that arrive before the WASM app has registered its listeners are
/// buffered and replayed when a listener attaches.
const BRIDGE_JS: &str = r#"
(function() {
    var pending = {
        'vista-view': null, 'vista-stats': null, 'vista-panel': null, 'vista-source': null
    };

    function dispatch(name, json) {
        pending[name] = json;
        window.dispatchEvent(new CustomEvent(name, { detail: json }));
    }

    window.__vista_push_view = function(json) { dispatch('vista-view', json); };
    window.__vista_push_stats = function(json) { dispatch('vista-stats', json); };
    window.__vista_push_panel = function(json) { dispatch('vista-panel', json); };
    window.__vista_push_source = function(json) { dispatch('vista-source', json); };

    var origAdd = EventTarget.prototype.addEventListener;
    EventTarget.prototype.addEventListener = function(type, fn, opts) {
        origAdd.call(this, type, fn, opts);
        if (this === window && pending[type]) {
            window.dispatchEvent(new CustomEvent(type, { detail: pending[type] }));
        }
    };
})();
"#;

/// Parse an IPC message from the WASM side.
fn parse_message(msg: &Value) -> Option<UiMessage> {
    match msg.get("action")?.as_str()? {
        "toggle_panel" => Some(UiMessage::TogglePanel),
        "view_source" => Some(UiMessage::ViewSource),
        "resize_panel" => {
            let width = u32::try_from(msg.get("width")?.as_u64()?).ok()?;
            Some(UiMessage::ResizePanel { width })
        }
        _ => UiAction::parse(msg).map(UiMessage::Gallery),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn panel_messages_are_handled_natively() {
        assert_eq!(
            parse_message(&json!({"action": "toggle_panel"})),
            Some(UiMessage::TogglePanel)
        );
        assert_eq!(
            parse_message(&json!({"action": "resize_panel", "width": 400})),
            Some(UiMessage::ResizePanel { width: 400 })
        );
        assert_eq!(parse_message(&json!({"action": "resize_panel"})), None);
        assert_eq!(
            parse_message(&json!({"action": "view_source"})),
            Some(UiMessage::ViewSource)
        );
    }

    #[test]
    fn gallery_messages_pass_through() {
        assert_eq!(
            parse_message(&json!({"action": "open_category", "category": "basics"})),
            Some(UiMessage::Gallery(UiAction::OpenCategory {
                category: "basics".to_owned()
            }))
        );
        assert_eq!(parse_message(&json!({"action": "launch"})), None);
    }

    #[test]
    fn placements_stay_inside_the_window() {
        assert_eq!(Placement::Full.rect(800, 600), (0, 0, 800, 600));
        assert_eq!(Placement::Docked { width: 300 }.rect(800, 600), (500, 0, 300, 600));
        assert_eq!(Placement::Docked { width: 900 }.rect(800, 600), (0, 0, 800, 600));
        assert_eq!(
            Placement::Floating { width: 300, margin: 10 }.rect(800, 600),
            (490, 10, 300, 580)
        );
        assert_eq!(Placement::Hidden { width: 300 }.rect(800, 600).0, 800);
    }

    #[test]
    fn scripts_escape_quotes_and_newlines() {
        assert_eq!(
            script_call("f", r#"{"a":"it's\n"}"#),
            r#"window.f('{"a":"it\'s\\n"}')"#
        );
    }
}
