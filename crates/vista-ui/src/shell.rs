//! Shell screens: home page, sidebar, header, listings and the not-found
//! placeholder.

use dioxus::prelude::*;
use serde_json::Value;

use crate::bridge;
use crate::sample_panel::SamplePanel;

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn items<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

/// Landing page.
#[component]
pub fn Home(home: Value) -> Element {
    let start = text(&home, "start_address").to_owned();

    rsx! {
        div { class: "home",
            h1 { class: "home-title", {text(&home, "title").to_owned()} }
            p { class: "home-tagline", {text(&home, "tagline").to_owned()} }
            button {
                class: "primary",
                onclick: move |_| bridge::send_navigate(&start),
                "Get started"
            }
            div { class: "highlights",
                for h in items(&home, "highlights") {
                    div { class: "highlight",
                        span { class: "highlight-value", {text(h, "value").to_owned()} }
                        span { class: "highlight-label", {text(h, "label").to_owned()} }
                    }
                }
            }
            div { class: "features",
                for f in items(&home, "features") {
                    div { class: "feature",
                        span { class: "icon", "data-icon": text(f, "icon") }
                        h3 { {text(f, "title").to_owned()} }
                        p { {text(f, "description").to_owned()} }
                    }
                }
            }
            div { class: "tiles",
                for tile in items(&home, "categories") {
                    {category_tile(tile)}
                }
            }
        }
    }
}

fn category_tile(tile: &Value) -> Element {
    let id = text(tile, "id").to_owned();
    rsx! {
        button {
            class: "tile",
            onclick: move |_| bridge::send_open_category(&id),
            span { class: "icon", "data-icon": text(tile, "icon") }
            {text(tile, "title").to_owned()}
        }
    }
}

/// Sidebar, header and content.
#[component]
pub fn Browsing(
    view: Value,
    stats_sig: Signal<Option<Value>>,
    panel_pinned: Signal<bool>,
    source_sig: Signal<Option<Value>>,
) -> Element {
    let sidebar = view.get("sidebar").cloned().unwrap_or_default();
    let header = view.get("header").cloned().unwrap_or_default();
    let content = view.get("content").cloned().unwrap_or_default();
    let mounted = content.get("kind").and_then(Value::as_str) == Some("sample")
        && content.get("state").and_then(Value::as_str) == Some("mounted");

    // With a sample mounted the webview is docked next to the viewport, so
    // the sidebar shrinks to a strip of category buttons.
    rsx! {
        div { class: if mounted { "shell docked" } else { "shell" },
            Sidebar { sidebar: sidebar, compact: mounted }
            div { class: "main",
                Header { header: header }
                {match content.get("kind").and_then(Value::as_str) {
                    Some("listing") => rsx! { Listing { listing: content.clone() } },
                    Some("sample") if mounted => rsx! {
                        SamplePanel {
                            sample: content.clone(),
                            stats_sig: stats_sig,
                            panel_pinned: panel_pinned,
                            source_sig: source_sig,
                        }
                    },
                    Some("sample") => rsx! { NotFound { content: content.clone() } },
                    _ => rsx! {},
                }}
            }
        }
    }
}

/// Collapsible category menu.
#[component]
fn Sidebar(sidebar: Value, compact: bool) -> Element {
    let open = sidebar.get("open").and_then(Value::as_bool).unwrap_or(true) && !compact;

    rsx! {
        nav { class: if open { "sidebar open" } else { "sidebar" },
            div { class: "sidebar-top",
                button {
                    class: "sidebar-title",
                    onclick: move |_| bridge::send_go_home(),
                    {text(&sidebar, "title").to_owned()}
                }
                if !compact {
                    button {
                        class: "icon-button",
                        title: "Toggle sidebar",
                        onclick: move |_| bridge::send_toggle_sidebar(),
                        if open { "‹" } else { "›" }
                    }
                }
            }
            for item in items(&sidebar, "items") {
                {sidebar_item(item, open)}
            }
        }
    }
}

fn sidebar_item(item: &Value, open: bool) -> Element {
    let address = text(item, "address").to_owned();
    let active = item.get("active").and_then(Value::as_bool).unwrap_or(false);

    rsx! {
        button {
            class: if active { "sidebar-item active" } else { "sidebar-item" },
            title: text(item, "title"),
            onclick: move |_| bridge::send_navigate(&address),
            span { class: "icon", "data-icon": text(item, "icon") }
            if open {
                div {
                    span { class: "item-title", {text(item, "title").to_owned()} }
                    span { class: "item-description", {text(item, "description").to_owned()} }
                }
            }
        }
    }
}

/// Title bar with history buttons.
#[component]
fn Header(header: Value) -> Element {
    let can_back = header.get("can_go_back").and_then(Value::as_bool).unwrap_or(false);
    let can_forward = header
        .get("can_go_forward")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let sample = header.get("sample").and_then(Value::as_str).map(str::to_owned);

    rsx! {
        header { class: "header",
            button {
                class: "icon-button",
                disabled: !can_back,
                onclick: move |_| bridge::send_back(),
                "←"
            }
            button {
                class: "icon-button",
                disabled: !can_forward,
                onclick: move |_| bridge::send_forward(),
                "→"
            }
            h2 { {text(&header, "title").to_owned()} }
            if let Some(sample) = sample {
                span { class: "header-sample", "/ {sample}" }
            }
        }
    }
}

/// Cards for one category.
#[component]
fn Listing(listing: Value) -> Element {
    let category = text(&listing, "category_id").to_owned();
    let empty = listing.get("empty_message").and_then(Value::as_str);

    rsx! {
        section { class: "listing",
            h1 { {text(&listing, "heading").to_owned()} }
            if let Some(description) = listing.get("description").and_then(Value::as_str) {
                p { class: "listing-description", "{description}" }
            }
            if let Some(message) = empty {
                div { class: "empty", "{message}" }
            }
            div { class: "cards",
                for card in items(&listing, "cards") {
                    {sample_card(&category, card)}
                }
            }
        }
    }
}

fn sample_card(category: &str, card: &Value) -> Element {
    let category = category.to_owned();
    let sample = text(card, "id").to_owned();

    rsx! {
        button {
            class: "card",
            onclick: move |_| bridge::send_open_sample(&category, &sample),
            h3 { {text(card, "title").to_owned()} }
            p { {text(card, "description").to_owned()} }
            div { class: "tags",
                for tag in items(card, "tags") {
                    span { class: "tag", {tag.as_str().unwrap_or_default().to_owned()} }
                }
            }
        }
    }
}

/// Placeholder for an unregistered (category, sample) pair.
#[component]
fn NotFound(content: Value) -> Element {
    let category = text(&content, "category").to_owned();

    rsx! {
        div { class: "empty",
            h2 { {text(&content, "message").to_owned()} }
            p { {format!("{} / {}", text(&content, "category"), text(&content, "sample"))} }
            button {
                class: "primary",
                onclick: move |_| bridge::send_open_category(&category),
                "Back to the category"
            }
        }
    }
}
