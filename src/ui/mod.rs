//! Server-rendered pages.
//!
//! Pages are rendered with Dioxus SSR from the same components the client
//! app uses. The head carries the theme bootstrap script ahead of any
//! stylesheet so the first paint already has the right dark/light class.
//! The body ends with the client bundle, which replaces the server markup
//! inside the mount point with the live app.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use dioxus::prelude::*;

use crate::api::AppState;
use crate::app::components::{Layout, PostArticle, PostList};
use crate::app::theme::use_theme_provider;
use crate::app::ROOT_ID;
use crate::theme::bootstrap;

/// `<title>` rendered through the SSR renderer so its text is escaped the
/// same way as the body.
fn title_tag(title: &str) -> String {
    dioxus::ssr::render_element(rsx! {
        title { "{title}" }
    })
}

/// Module script that loads the client bundle, which then mounts `App`
/// over the server markup. An empty bundle path leaves the page static.
fn client_script(bundle: &str) -> String {
    if bundle.is_empty() {
        return String::new();
    }
    format!(r#"<script type="module">import init from {bundle:?}; init();</script>"#)
}

/// HTML document wrapper
fn html_doc(title: &str, client_bundle: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <script>{bootstrap}</script>
    {title}
    <link rel="stylesheet" href="/style.css">
    <link rel="icon" href="/favicon.ico">
</head>
<body>
<div id="{root}">{body}</div>
{client}
</body>
</html>"#,
        bootstrap = bootstrap::script(),
        title = title_tag(title),
        root = ROOT_ID,
        client = client_script(client_bundle),
    )
}

/// Page root on the server: provides a theme context that is never
/// initialized, so theme-dependent markup stays unset.
#[component]
fn ServerPage(site_title: String, children: Element) -> Element {
    use_theme_provider();

    rsx! {
        Layout { site_title, {children} }
    }
}

/// GET / - Post listing
pub async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let site_title = state.site_title.to_string();
    let posts = state.posts.summaries();

    let body = dioxus::ssr::render_element(rsx! {
        ServerPage { site_title: site_title.clone(),
            PostList { posts }
        }
    });
    Html(html_doc(&site_title, &state.client_bundle, &body))
}

/// GET /posts/{slug} - Single post
pub async fn post_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let site_title = state.site_title.to_string();

    let Some(post) = state.posts.get(&slug).cloned() else {
        let body = dioxus::ssr::render_element(rsx! {
            ServerPage { site_title: site_title.clone(),
                h1 { "Not found" }
                p {
                    "No post called \"{slug}\". "
                    a { href: "/", "Back to all posts" }
                }
            }
        });
        return (
            StatusCode::NOT_FOUND,
            Html(html_doc(
                &format!("Not found - {}", site_title),
                &state.client_bundle,
                &body,
            )),
        );
    };

    let title = format!("{} - {}", post.meta.title, site_title);
    let body = dioxus::ssr::render_element(rsx! {
        ServerPage { site_title: site_title.clone(),
            PostArticle { post }
        }
    });
    (
        StatusCode::OK,
        Html(html_doc(&title, &state.client_bundle, &body)),
    )
}
