//! Dioxus fullstack page components.
//!
//! Pages fetch from the JSON API and hand the data to the shared views in
//! `components`.

mod home;
mod post;

pub use home::Home;
pub use post::PostPage;

use dioxus::prelude::*;

use crate::app::api::{fetch_json, SiteInfo};

/// Site title from `/api/site`, empty while loading.
pub(crate) fn use_site_title() -> String {
    let site = use_resource(|| async { fetch_json::<SiteInfo>("/api/site").await.ok() });
    let title = site.read().clone().flatten();
    title.map(|s| s.title).unwrap_or_default()
}
