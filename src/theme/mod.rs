//! Theme preference model and controller.
//!
//! The user picks a [`ThemePreference`] (light, dark or follow the OS). The
//! page renders an [`ActualTheme`], which is always derived from the
//! preference and the OS color-scheme signal and never stored.
//!
//! - `bootstrap` - pre-paint decision table and the inline head script
//! - `controller` - [`ThemeController`], the single per-session owner of state
//! - `cues` - switch-on / switch-off audio cues
//! - `memory` - in-process collaborators for server rendering and tests

pub mod bootstrap;
pub mod controller;
pub mod cues;
pub mod memory;

pub use controller::{
    ColorSchemeSource, ObserverId, PreferenceStore, ThemeBackend, ThemeController, ThemeSurface,
    WatchGuard,
};
pub use cues::{AudioClip, AudioCueSet, Cue, CueLoader, CuePlayer};

use thiserror::Error;

/// Durable storage key for the preference.
pub const STORAGE_KEY: &str = "theme";

/// Class toggled on the document root while the dark theme is rendered.
pub const DARK_CLASS: &str = "dark";

/// Media query backing the OS color-scheme signal.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// theme-color hint emitted while the light theme is rendered
pub const LIGHT_THEME_COLOR: &str = "#ffffff";
/// theme-color hint emitted while the dark theme is rendered
pub const DARK_THEME_COLOR: &str = "#0a0a0a";

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme controller is not attached to a live session")]
    Detached,

    #[error("preference storage error: {0}")]
    Storage(String),

    #[error("failed to load {cue} cue: {reason}")]
    CueLoad { cue: Cue, reason: String },

    #[error("browser API unavailable: {0}")]
    Unavailable(&'static str),
}

/// What the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThemePreference {
    Light,
    Dark,
    System,
}

impl ThemePreference {
    /// Fixed switch order.
    pub const CYCLE: [ThemePreference; 3] = [
        ThemePreference::Light,
        ThemePreference::Dark,
        ThemePreference::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// Parse a stored value. Unknown strings yield `None` so callers can
    /// treat them the same as an absent value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            "system" => Some(ThemePreference::System),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemePreference::Light => "Light",
            ThemePreference::Dark => "Dark",
            ThemePreference::System => "System",
        }
    }

    /// Next preference in the switch order.
    pub fn cycle(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
            ThemePreference::System => ThemePreference::Light,
        }
    }

    /// Next preference starting from a possibly unknown one. An unknown
    /// preference has no position in the order, so the switch lands on the
    /// first entry.
    pub fn after(current: Option<Self>) -> Self {
        match current {
            Some(pref) => pref.cycle(),
            None => Self::CYCLE[0],
        }
    }

    /// Resolve to a renderable theme given the live OS signal.
    pub fn resolve(self, os_prefers_dark: bool) -> ActualTheme {
        match self {
            ThemePreference::Light => ActualTheme::Light,
            ThemePreference::Dark => ActualTheme::Dark,
            ThemePreference::System => ActualTheme::from_dark(os_prefers_dark),
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the page renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActualTheme {
    Light,
    Dark,
}

impl ActualTheme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ActualTheme::Dark
        } else {
            ActualTheme::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ActualTheme::Dark)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActualTheme::Light => "light",
            ActualTheme::Dark => "dark",
        }
    }

    pub fn theme_color(&self) -> &'static str {
        match self {
            ActualTheme::Light => LIGHT_THEME_COLOR,
            ActualTheme::Dark => DARK_THEME_COLOR,
        }
    }

    /// Cue played when a manual switch lands on this theme.
    pub fn cue(&self) -> Cue {
        match self {
            ActualTheme::Light => Cue::SwitchOn,
            ActualTheme::Dark => Cue::SwitchOff,
        }
    }
}

/// Per-session theme state. `None` on either side means "not read yet",
/// which is distinct from every real value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub preference: Option<ThemePreference>,
    pub actual: Option<ActualTheme>,
}

impl ThemeState {
    pub fn new(preference: ThemePreference, os_prefers_dark: bool) -> Self {
        Self {
            preference: Some(preference),
            actual: Some(preference.resolve(os_prefers_dark)),
        }
    }

    pub fn is_known(&self) -> bool {
        self.actual.is_some()
    }

    /// theme-color meta value, only once the actual theme is known
    pub fn theme_color(&self) -> Option<&'static str> {
        self.actual.map(|actual| actual.theme_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_ignores_os_for_explicit_preferences() {
        for os_dark in [false, true] {
            assert_eq!(ThemePreference::Light.resolve(os_dark), ActualTheme::Light);
            assert_eq!(ThemePreference::Dark.resolve(os_dark), ActualTheme::Dark);
            assert_eq!(
                ThemePreference::System.resolve(os_dark),
                ActualTheme::from_dark(os_dark)
            );
        }
    }

    #[test]
    fn cycle_is_a_three_cycle() {
        for pref in ThemePreference::CYCLE {
            assert_eq!(pref.cycle().cycle().cycle(), pref);
            assert_ne!(pref.cycle(), pref);
        }
        assert_eq!(ThemePreference::Light.cycle(), ThemePreference::Dark);
        assert_eq!(ThemePreference::Dark.cycle(), ThemePreference::System);
        assert_eq!(ThemePreference::System.cycle(), ThemePreference::Light);
    }

    #[test]
    fn unknown_preference_cycles_to_first_entry() {
        assert_eq!(ThemePreference::after(None), ThemePreference::Light);
        assert_eq!(
            ThemePreference::after(Some(ThemePreference::System)),
            ThemePreference::Light
        );
    }

    #[test]
    fn parse_round_trips_known_values_only() {
        for pref in ThemePreference::CYCLE {
            assert_eq!(ThemePreference::parse(pref.as_str()), Some(pref));
        }
        assert_eq!(ThemePreference::parse("oled"), None);
        assert_eq!(ThemePreference::parse(""), None);
        assert_eq!(ThemePreference::parse("Dark"), None);
    }

    #[test]
    fn theme_color_only_when_known() {
        assert_eq!(ThemeState::default().theme_color(), None);
        let light = ThemeState::new(ThemePreference::System, false);
        assert_eq!(light.theme_color(), Some(LIGHT_THEME_COLOR));
        let dark = ThemeState::new(ThemePreference::System, true);
        assert_eq!(dark.theme_color(), Some(DARK_THEME_COLOR));
    }

    #[test]
    fn cue_is_keyed_on_resulting_theme() {
        assert_eq!(ActualTheme::Light.cue(), Cue::SwitchOn);
        assert_eq!(ActualTheme::Dark.cue(), Cue::SwitchOff);
    }
}
