//! Post listing and detail views.

use dioxus::prelude::*;

use crate::posts::{Post, PostSummary};

#[component]
pub fn PostList(posts: Vec<PostSummary>) -> Element {
    if posts.is_empty() {
        return rsx! {
            p { class: "empty", "Nothing published yet." }
        };
    }

    rsx! {
        ul { class: "post-list",
            for post in posts {
                li { key: "{post.slug}",
                    a { href: "/posts/{post.slug}", "{post.title}" }
                    " "
                    time { datetime: "{post.date}", "{post.display_date}" }
                    if let Some(summary) = &post.summary {
                        p { class: "summary", "{summary}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn PostArticle(post: Post) -> Element {
    let meta = &post.meta;

    rsx! {
        article { class: "post",
            header {
                h1 { "{meta.title}" }
                time { datetime: "{meta.date}", "{meta.display_date}" }
                if !meta.tags.is_empty() {
                    ul { class: "tags",
                        for tag in meta.tags.iter() {
                            li { key: "{tag}", "{tag}" }
                        }
                    }
                }
            }
            div { class: "post-body", dangerous_inner_html: "{post.html}" }
        }
    }
}
