//! Single post page.

use dioxus::prelude::*;

use super::use_site_title;
use crate::app::api::fetch_post;
use crate::app::components::{Layout, PostArticle};

#[component]
pub fn PostPage(slug: String) -> Element {
    let site_title = use_site_title();
    let requested = slug.clone();
    let post = use_resource(use_reactive!(|(requested,)| async move {
        fetch_post(&requested).await
    }));

    let content = match &*post.read() {
        None => rsx! {
            p { aria_busy: "true", "Loading..." }
        },
        Some(Ok(post)) => rsx! {
            document::Title { "{post.meta.title}" }
            PostArticle { post: post.clone() }
        },
        Some(Err(_)) => rsx! {
            h1 { "Not found" }
            p {
                "No post called \"{slug}\". "
                a { href: "/", "Back to all posts" }
            }
        },
    };

    rsx! {
        Layout { site_title, {content} }
    }
}
