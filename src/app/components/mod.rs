//! Shared UI components for the Dioxus fullstack web UI.

pub mod layout;
pub mod posts;
pub mod theme;

pub use layout::Layout;
pub use posts::{PostArticle, PostList};
pub use theme::{ThemeColorMeta, ThemeSwitcher};
