//! Dioxus fullstack application entry point.
//!
//! The same components render on the server (see `ui`) and run in the
//! browser, where the client replaces the server markup inside [`ROOT_ID`]
//! and the theme controller attaches to real storage, the OS color-scheme
//! query and Web Audio.

use dioxus::prelude::*;

pub mod api;
#[cfg(target_arch = "wasm32")]
mod browser;
pub mod components;
pub mod pages;
pub mod theme;

use pages::{Home, PostPage};
use theme::use_theme_provider;

/// Element the server renders into and the client mounts on.
pub const ROOT_ID: &str = "main";

/// Start the client. Server pages are not hydration-annotated, so the
/// client clears the mount point and renders fresh.
#[cfg(feature = "web")]
pub fn launch() {
    #[cfg(target_arch = "wasm32")]
    browser::clear_root(ROOT_ID);

    dioxus::LaunchBuilder::web()
        .with_cfg(dioxus::web::Config::new().rootname(ROOT_ID).hydrate(false))
        .launch(App);
}

#[cfg(not(feature = "web"))]
pub fn launch() {
    dioxus::launch(App);
}

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Initialize theme context at app root (storage + OS query + DOM class)
    use_theme_provider();

    rsx! {
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/posts/:slug")]
    PostPage { slug: String },
}
