//! Theme switcher button and theme-color hint.

use dioxus::prelude::*;

use crate::app::theme::use_theme;
use crate::theme::ThemePreference;

fn icon(preference: ThemePreference) -> &'static str {
    match preference {
        ThemePreference::Light => "\u{2600}",
        ThemePreference::Dark => "\u{263E}",
        ThemePreference::System => "\u{25D0}",
    }
}

/// Cycles light → dark → system on each click. Renders without a label
/// until the stored preference has been read, so the server markup never
/// guesses.
#[component]
pub fn ThemeSwitcher() -> Element {
    let theme = use_theme();
    let preference = theme.get().preference;
    let data_preference = preference.map(|p| p.as_str()).unwrap_or("");
    let label = preference.map(|p| (icon(p), p.label()));

    rsx! {
        button {
            class: "theme-switch",
            r#type: "button",
            title: "Switch theme",
            aria_label: "Switch theme",
            "data-preference": data_preference,
            onclick: move |_| theme.switch(),
            if let Some((icon, label)) = label {
                span { class: "theme-switch-icon", "{icon}" }
                span { class: "theme-switch-label", "{label}" }
            }
        }
    }
}

/// `<meta name="theme-color">` for the rendered theme, emitted only once
/// the actual theme is known.
#[component]
pub fn ThemeColorMeta() -> Element {
    let theme = use_theme();

    match theme.get().theme_color() {
        Some(color) => rsx! {
            document::Meta { name: "theme-color", content: color }
        },
        None => rsx! {},
    }
}
