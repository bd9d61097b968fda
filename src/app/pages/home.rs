//! Post listing page.

use dioxus::prelude::*;

use super::use_site_title;
use crate::app::api::fetch_posts;
use crate::app::components::{Layout, PostList};

#[component]
pub fn Home() -> Element {
    let site_title = use_site_title();
    let posts = use_resource(|| async { fetch_posts().await });

    let content = match &*posts.read() {
        None => rsx! {
            p { aria_busy: "true", "Loading posts..." }
        },
        Some(Ok(posts)) => rsx! {
            PostList { posts: posts.clone() }
        },
        Some(Err(e)) => rsx! {
            p { class: "error", "Could not load posts: {e}" }
        },
    };

    rsx! {
        Layout { site_title,
            document::Title { "Posts" }
            {content}
        }
    }
}
