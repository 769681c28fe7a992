//! Dioxus web app for the vista gallery shell.
//!
//! Compiled to WASM and loaded into a wry webview by the native viewer. The
//! native side owns all state and pushes a complete view model; this app
//! only renders it and sends actions back.

mod bridge;
mod sample_panel;
mod shell;

use dioxus::prelude::*;
use serde_json::Value;

fn main() {
    dioxus::launch(app);
}

fn app() -> Element {
    let view: Signal<Option<Value>> = use_signal(|| None);
    let stats: Signal<Option<Value>> = use_signal(|| None);
    let panel_pinned: Signal<bool> = use_signal(|| true);
    let source: Signal<Option<Value>> = use_signal(|| None);

    // Register IPC listeners once on mount.
    use_effect(move || {
        bridge::register_view_listener(view);
        bridge::register_stats_listener(stats);
        bridge::register_panel_listener(panel_pinned);
        bridge::register_source_listener(source);
    });

    let view_val = view.read();
    let Some(current) = view_val.as_ref() else {
        return rsx! {
            div { class: "waiting", "Waiting for the gallery..." }
        };
    };

    match current.get("screen").and_then(Value::as_str) {
        Some("home") => rsx! {
            shell::Home { home: current.get("home").cloned().unwrap_or_default() }
        },
        Some("browsing") => rsx! {
            shell::Browsing {
                view: current.clone(),
                stats_sig: stats,
                panel_pinned: panel_pinned,
                source_sig: source,
            }
        },
        _ => rsx! {
            div { class: "waiting", "Unknown screen" }
        },
    }
}
