//! Pre-paint theme bootstrap.
//!
//! Runs synchronously in the page head, before the client app attaches, so
//! the first paint already carries the right dark/light class.
//!
//! | stored    | OS dark | result                           |
//! |-----------|---------|----------------------------------|
//! | `dark`    | any     | dark                             |
//! | `light`   | any     | light                            |
//! | other     | true    | dark, persist `system`           |
//! | other     | false   | light, persist `system`          |

use super::{
    ActualTheme, ColorSchemeSource, PreferenceStore, ThemeSurface, DARK_CLASS, DARK_SCHEME_QUERY,
    STORAGE_KEY,
};

/// Outcome of the decision table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootstrapPlan {
    pub actual: ActualTheme,
    /// Whether `"system"` must be written back to storage
    pub persist_system: bool,
}

pub fn plan(stored: Option<&str>, os_prefers_dark: bool) -> BootstrapPlan {
    match stored {
        Some("dark") => BootstrapPlan {
            actual: ActualTheme::Dark,
            persist_system: false,
        },
        Some("light") => BootstrapPlan {
            actual: ActualTheme::Light,
            persist_system: false,
        },
        _ => BootstrapPlan {
            actual: ActualTheme::from_dark(os_prefers_dark),
            persist_system: true,
        },
    }
}

/// Execute the table against live collaborators. Mirrors [`script`] for
/// hosts that can run Rust before first paint.
pub fn apply(
    store: &dyn PreferenceStore,
    scheme: &dyn ColorSchemeSource,
    surface: &dyn ThemeSurface,
) -> BootstrapPlan {
    let stored = store.load();
    let plan = plan(stored.as_deref(), scheme.prefers_dark());
    surface.apply(plan.actual);
    if plan.persist_system {
        if let Err(e) = store.store(super::ThemePreference::System.as_str()) {
            tracing::warn!("Bootstrap could not persist theme preference: {}", e);
        }
    }
    plan
}

/// Inline `<script>` body encoding the decision table.
pub fn script() -> String {
    format!(
        r#"(function(){{
    try {{
        var root = document.documentElement;
        var stored = localStorage.getItem('{key}');
        var dark;
        if (stored === 'dark') {{
            dark = true;
        }} else if (stored === 'light') {{
            dark = false;
        }} else {{
            dark = window.matchMedia('{query}').matches;
            localStorage.setItem('{key}', 'system');
        }}
        root.classList.toggle('{class}', dark);
    }} catch (e) {{}}
}})();"#,
        key = STORAGE_KEY,
        query = DARK_SCHEME_QUERY,
        class = DARK_CLASS,
    )
}
