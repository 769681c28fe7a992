//! Docked panel for a mounted sample: parameter controls, code viewer and
//! frame statistics.
//!
//! Controls are rendered from the `groups` the native panel derived from
//! the sample's schema. Every edit sends a `set_param` action; the native
//! side answers with a fresh view model carrying the accepted value.

use dioxus::prelude::*;
use serde_json::Value;

use crate::bridge;

/// Width change per resize click, in pixels.
const WIDTH_STEP: u32 = 40;

/// Leaf component that reads the stats signal. Only this component
/// re-renders when FPS updates, leaving the rest of the panel untouched.
#[component]
fn Stats(stats_sig: Signal<Option<Value>>) -> Element {
    let stats = stats_sig.read();
    let number = |key: &str| stats.as_ref().and_then(|s| s.get(key)).and_then(Value::as_f64);
    let fps = number("fps").map_or_else(|| "--".to_owned(), |f| format!("{f:.0}"));
    let meshes = number("resident_meshes").map_or_else(|| "--".to_owned(), |m| format!("{m}"));

    rsx! {
        div { class: "stats",
            div { class: "field-row",
                label { class: "field-label", "FPS" }
                span { class: "stat-value", {fps} }
            }
            div { class: "field-row",
                label { class: "field-label", "GPU meshes" }
                span { class: "stat-value", {meshes} }
            }
        }
    }
}

/// Panel for the mounted sample.
#[component]
pub fn SamplePanel(
    sample: Value,
    stats_sig: Signal<Option<Value>>,
    panel_pinned: Signal<bool>,
    source_sig: Signal<Option<Value>>,
) -> Element {
    let mut show_code = use_signal(|| false);
    let mut width = use_signal(|| 320_u32);
    let title = sample.get("title").and_then(Value::as_str).unwrap_or("").to_owned();
    let description = sample
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_owned();
    let has_source = sample.get("has_source").and_then(Value::as_bool).unwrap_or(false);
    // Only show source that was sent for this very sample.
    let source = source_sig.read().as_ref().and_then(|s| {
        let same = s.get("category") == sample.get("category")
            && s.get("sample") == sample.get("sample");
        s.get("text").and_then(Value::as_str).filter(|_| same).map(str::to_owned)
    });
    let values = sample.get("values").cloned().unwrap_or_default();
    let groups = sample
        .get("groups")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let pinned = *panel_pinned.read();

    rsx! {
        aside { class: "sample-panel",
            div { class: "panel-header",
                h2 { {title} }
                button {
                    class: "icon-button",
                    title: if pinned { "Unpin panel" } else { "Pin panel" },
                    onclick: move |_| bridge::send_toggle_panel(),
                    if pinned { "⇥" } else { "⇤" }
                }
                button {
                    class: "icon-button",
                    title: "Narrower",
                    onclick: move |_| {
                        let w = width().saturating_sub(WIDTH_STEP);
                        width.set(w);
                        bridge::send_resize_panel(w);
                    },
                    "−"
                }
                button {
                    class: "icon-button",
                    title: "Wider",
                    onclick: move |_| {
                        let w = width() + WIDTH_STEP;
                        width.set(w);
                        bridge::send_resize_panel(w);
                    },
                    "+"
                }
            }
            p { class: "sample-description", {description} }
            div { class: "panel-actions",
                if has_source {
                    button {
                        onclick: move |_| {
                            bridge::send_view_source();
                            show_code.set(true);
                        },
                        "View code"
                    }
                }
                button { onclick: move |_| bridge::send_reset_params(), "Reset parameters" }
                button { onclick: move |_| bridge::send_reset_camera(), "Reset camera" }
            }
            for group in groups.iter() {
                {render_group(group, &values)}
            }
            Stats { stats_sig: stats_sig }
            if let Some(text) = source.filter(|_| show_code()) {
                CodeModal { source: text, on_close: move |()| show_code.set(false) }
            }
        }
    }
}

/// Modal showing the sample's source with a copy button.
#[component]
fn CodeModal(source: String, on_close: EventHandler<()>) -> Element {
    let copy = source.clone();
    rsx! {
        div { class: "modal-backdrop", onclick: move |_| on_close.call(()),
            div {
                class: "modal",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                div { class: "modal-header",
                    button { onclick: move |_| bridge::copy_to_clipboard(&copy), "Copy" }
                    button { onclick: move |_| on_close.call(()), "Close" }
                }
                pre { class: "code", code { {source} } }
            }
        }
    }
}

/// One folder of controls.
fn render_group(group: &Value, values: &Value) -> Element {
    let key = group.get("key").and_then(Value::as_str).unwrap_or("");
    let title = group.get("title").and_then(Value::as_str).unwrap_or("").to_owned();
    // Top-level fields live directly in `values`.
    let current = if key.is_empty() { Some(values) } else { values.get(key) };
    let fields = group
        .get("fields")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);

    rsx! {
        details { open: true,
            summary { class: "section-header", {title} }
            div { class: "section-body",
                for field in fields {
                    {render_field(key, field, current)}
                }
            }
        }
    }
}

/// Single control, picked by the field's `kind`.
fn render_field(group: &str, field: &Value, current: Option<&Value>) -> Element {
    let key = field.get("key").and_then(Value::as_str).unwrap_or("");
    let label = field.get("label").and_then(Value::as_str).unwrap_or(key).to_owned();
    let value = current
        .and_then(|c| c.get(key))
        .or_else(|| field.get("default"))
        .cloned()
        .unwrap_or(Value::Null);
    let group = group.to_owned();
    let key = key.to_owned();

    let control = match field.get("kind").and_then(Value::as_str) {
        Some("slider") => slider(group, key, field, &value),
        Some("toggle") => toggle(group, key, &value),
        Some("choice") => choice(group, key, field, &value),
        Some("color") => color(group, key, &value),
        _ => text_input(group, key, &value),
    };

    rsx! {
        div { class: "field-row",
            label { class: "field-label", {label} }
            {control}
        }
    }
}

fn slider(group: String, key: String, field: &Value, value: &Value) -> Element {
    let number = |k: &str| field.get(k).and_then(Value::as_f64).unwrap_or_default();
    let (min, max, step) = (number("min"), number("max"), number("step"));
    let integer = field.get("integer").and_then(Value::as_bool).unwrap_or(false);
    let current = value.as_f64().unwrap_or(min);
    let shown = if integer {
        format!("{current:.0}")
    } else {
        format!("{current:.2}")
    };

    rsx! {
        input {
            r#type: "range",
            value: "{current}",
            min: "{min}",
            max: "{max}",
            step: "{step}",
            oninput: move |evt: Event<FormData>| {
                if let Ok(v) = evt.value().parse::<f64>() {
                    let val = if integer { Value::from(v.round() as i64) } else { Value::from(v) };
                    bridge::send_set_param(&group, &key, &val);
                }
            },
        }
        span { class: "slider-value", {shown} }
    }
}

fn toggle(group: String, key: String, value: &Value) -> Element {
    let checked = value.as_bool().unwrap_or(false);
    rsx! {
        input {
            r#type: "checkbox",
            checked: checked,
            onchange: move |evt: Event<FormData>| {
                bridge::send_set_param(&group, &key, &Value::Bool(evt.checked()));
            },
        }
    }
}

fn choice(group: String, key: String, field: &Value, value: &Value) -> Element {
    let current = value.as_str().unwrap_or("").to_owned();
    let options: Vec<String> = field
        .get("options")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).map(str::to_owned).collect())
        .unwrap_or_default();

    rsx! {
        select {
            value: "{current}",
            onchange: move |evt: Event<FormData>| {
                bridge::send_set_param(&group, &key, &Value::String(evt.value()));
            },
            for name in options {
                option {
                    selected: name == current,
                    value: "{name}",
                    {name.replace('_', " ")}
                }
            }
        }
    }
}

fn color(group: String, key: String, value: &Value) -> Element {
    let current = value.as_str().unwrap_or("#ffffff").to_owned();
    rsx! {
        input {
            r#type: "color",
            value: "{current}",
            oninput: move |evt: Event<FormData>| {
                bridge::send_set_param(&group, &key, &Value::String(evt.value()));
            },
        }
    }
}

fn text_input(group: String, key: String, value: &Value) -> Element {
    let current = value.as_str().unwrap_or("").to_owned();
    rsx! {
        input {
            r#type: "text",
            class: "text-input",
            value: "{current}",
            onchange: move |evt: Event<FormData>| {
                bridge::send_set_param(&group, &key, &Value::String(evt.value()));
            },
        }
    }
}
