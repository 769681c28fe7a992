//! GUI panel controller: owns the wry webview and its layout state.
//!
//! `ViewerApp` holds a single `PanelController` field instead of a handful
//! of `#[cfg(feature = "gui")]` fields.

use std::sync::mpsc;

use winit::window::Window;

use super::webview::{self, FrameStats, Placement, UiMessage};
use crate::gallery::Gallery;
use crate::shell::ShellView;
use crate::surface::SurfaceFactory;

/// Owns the webview and all associated state.
pub(crate) struct PanelController {
    webview: Option<wry::WebView>,
    message_rx: Option<mpsc::Receiver<UiMessage>>,
    /// Whether the panel is pinned open next to the viewport.
    pinned: bool,
    /// Whether the panel is temporarily revealed by a mouse hover.
    peek: bool,
    /// Whether a viewport is visible at all; without one the webview
    /// covers the window.
    viewport: bool,
    /// Current panel width in physical pixels.
    width: u32,
}

// ── Constants ────────────────────────────────────────────────────────────

impl PanelController {
    /// Margin around the panel when floating (not pinned).
    const PANEL_MARGIN: u32 = 10;
    /// Minimum panel width for resize.
    const MIN_PANEL_WIDTH: u32 = 220;
    /// Maximum panel width for resize.
    const MAX_PANEL_WIDTH: u32 = 700;
    /// Width of the hover strip that reveals an unpinned panel.
    const EDGE_ZONE: f32 = 6.0;
}

// ── Construction ─────────────────────────────────────────────────────────

impl PanelController {
    /// Controller with no webview yet. `width` is in logical pixels until
    /// the webview is created on a window.
    pub(crate) fn new(pinned: bool, width: f32) -> Self {
        Self {
            webview: None,
            message_rx: None,
            pinned,
            peek: false,
            viewport: false,
            width: width.max(0.0) as u32,
        }
    }

    /// Create the wry webview and push the initial view to it.
    pub(crate) fn init_webview<F: SurfaceFactory>(
        &mut self,
        window: &Window,
        gallery: &Gallery<F>,
    ) {
        let inner = window.inner_size();
        let physical = f64::from(self.width) * window.scale_factor();
        self.width = (physical as u32).clamp(Self::MIN_PANEL_WIDTH, Self::MAX_PANEL_WIDTH);
        let view = gallery.view();
        self.viewport = view.shows_viewport();
        match webview::create_webview(window, self.placement(), inner.width, inner.height) {
            Ok((wv, rx)) => {
                webview::push_view(&wv, &view);
                webview::push_panel_pinned(&wv, self.pinned);
                self.webview = Some(wv);
                self.message_rx = Some(rx);
            }
            Err(e) => {
                log::error!("Failed to create webview: {e}");
                // Keyboard navigation still works without the UI.
            }
        }
    }
}

// ── Runtime ──────────────────────────────────────────────────────────────

impl PanelController {
    fn placement(&self) -> Placement {
        if !self.viewport {
            Placement::Full
        } else if self.pinned {
            Placement::Docked { width: self.width }
        } else if self.peek {
            Placement::Floating {
                width: self.width,
                margin: Self::PANEL_MARGIN,
            }
        } else {
            Placement::Hidden { width: self.width }
        }
    }

    /// Toggle pinned state and push it to the webview.
    pub(crate) fn toggle(&mut self, window: &Window) {
        self.pinned = !self.pinned;
        self.peek = false;
        if let Some(ref wv) = self.webview {
            webview::push_panel_pinned(wv, self.pinned);
        }
        self.apply_layout(window);
    }

    /// Position the webview according to the current state.
    pub(crate) fn apply_layout(&self, window: &Window) {
        let Some(ref wv) = self.webview else {
            return;
        };
        let inner = window.inner_size();
        if let Err(e) = wv.set_bounds(self.placement().bounds(inner.width, inner.height)) {
            log::debug!("webview bounds: {e}");
        }
    }

    /// Check if the mouse is near the right edge and temporarily reveal the
    /// panel.
    pub(crate) fn update_peek(&mut self, mouse_x: f32, window: &Window) {
        if self.pinned || !self.viewport {
            return;
        }
        let right = window.inner_size().width as f32;
        let near_edge = mouse_x >= right - Self::EDGE_ZONE;
        let in_panel =
            mouse_x >= right - self.width as f32 - Self::PANEL_MARGIN as f32;
        let should_peek = near_edge || (self.peek && in_panel);

        if should_peek != self.peek {
            self.peek = should_peek;
            self.apply_layout(window);
        }
    }

    /// Drain IPC messages: gallery actions are dispatched, panel toggle,
    /// resize and source requests are handled here.
    pub(crate) fn drain_and_apply<F: SurfaceFactory>(
        &mut self,
        gallery: &mut Gallery<F>,
        window: &Window,
    ) {
        let Some(ref rx) = self.message_rx else {
            return;
        };

        let mut toggled = false;
        let mut wants_source = false;
        let mut resize_width: Option<u32> = None;
        while let Ok(message) = rx.try_recv() {
            match message {
                UiMessage::Gallery(action) => gallery.dispatch(action),
                UiMessage::TogglePanel => toggled = !toggled,
                UiMessage::ResizePanel { width } => resize_width = Some(width),
                UiMessage::ViewSource => wants_source = true,
            }
        }

        if wants_source {
            match (&self.webview, gallery.source_view()) {
                (Some(wv), Some(source)) => webview::push_source(wv, &source),
                _ => log::debug!("no source to show"),
            }
        }

        if toggled {
            self.toggle(window);
        }
        if let Some(w) = resize_width {
            let clamped = w.clamp(Self::MIN_PANEL_WIDTH, Self::MAX_PANEL_WIDTH);
            if clamped != self.width {
                self.width = clamped;
                self.apply_layout(window);
            }
        }
    }

    /// Push a changed view model and switch between the full-window and
    /// docked layouts.
    pub(crate) fn sync_view(&mut self, view: &ShellView, window: &Window) {
        let viewport = view.shows_viewport();
        if viewport != self.viewport {
            self.viewport = viewport;
            self.peek = false;
            self.apply_layout(window);
        }
        if let Some(ref wv) = self.webview {
            webview::push_view(wv, view);
        }
    }

    /// Push frame statistics to the webview.
    pub(crate) fn push_stats(&self, stats: &FrameStats) {
        if let Some(ref wv) = self.webview {
            webview::push_stats(wv, stats);
        }
    }
}
