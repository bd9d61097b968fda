//! Folio - personal blog and portfolio site
//!
//! This library provides:
//! - Markdown posts with TOML front matter
//! - Server-rendered listing and detail pages plus a JSON API
//! - A Dioxus client app that hydrates the same components
//! - A light/dark/system theme controller with persisted preference,
//!   OS color-scheme tracking and switch sound cues

pub mod app;
pub mod posts;
pub mod theme;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod ui;
