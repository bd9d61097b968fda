//! Layout component wrapping all pages.

use dioxus::prelude::*;

use super::theme::{ThemeColorMeta, ThemeSwitcher};

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Site name shown in the header
    pub site_title: String,
    /// Page content
    pub children: Element,
}

/// Main layout component wrapping all pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("FOLIO_VERSION");

    rsx! {
        ThemeColorMeta {}
        header { class: "site-header",
            a { class: "site-title", href: "/", "{props.site_title}" }
            ThemeSwitcher {}
        }
        main { class: "site-main",
            {props.children}
        }
        footer { class: "site-footer",
            small { "{props.site_title} v{version}" }
        }
    }
}
