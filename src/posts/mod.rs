//! Markdown posts.
//!
//! Each post is a `.md` file whose stem is the slug. The file starts with
//! TOML front matter between `+++` fences:
//!
//! ```text
//! +++
//! title = "Hello"
//! date = "2024-03-01"
//! summary = "Optional one-liner"
//! tags = ["rust"]
//! +++
//! Body in markdown.
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FENCE: &str = "+++";

#[derive(Debug, Error)]
pub enum PostError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front matter in {slug}: {reason}")]
    FrontMatter { slug: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct FrontMatter {
    title: String,
    date: NaiveDate,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    draft: bool,
}

/// Listing entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub display_date: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full post with rendered body.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostSummary,
    pub html: String,
}

/// "March 1, 2024"
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Split `+++` front matter from the body.
fn split_front_matter<'a>(slug: &str, source: &'a str) -> Result<(&'a str, &'a str), PostError> {
    let invalid = |reason: &str| PostError::FrontMatter {
        slug: slug.to_string(),
        reason: reason.to_string(),
    };

    let rest = source
        .trim_start_matches('\u{feff}')
        .strip_prefix(FENCE)
        .ok_or_else(|| invalid("missing opening +++"))?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')).unwrap_or(rest);

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((front, body));
        }
        offset += line.len();
    }
    Err(invalid("missing closing +++"))
}

/// Parse one post from its source text. Returns `None` for drafts.
pub fn parse_post(slug: &str, source: &str) -> Result<Option<Post>, PostError> {
    let (front, body) = split_front_matter(slug, source)?;
    let meta: FrontMatter = toml::from_str(front).map_err(|e| PostError::FrontMatter {
        slug: slug.to_string(),
        reason: e.message().to_string(),
    })?;

    if meta.draft {
        return Ok(None);
    }

    Ok(Some(Post {
        meta: PostSummary {
            slug: slug.to_string(),
            title: meta.title,
            date: meta.date.to_string(),
            display_date: display_date(meta.date),
            summary: meta.summary,
            tags: meta.tags,
        },
        html: render_markdown(body),
    }))
}

/// All published posts, newest first.
#[derive(Clone, Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        // ISO dates sort lexically
        posts.sort_by(|a, b| {
            b.meta
                .date
                .cmp(&a.meta.date)
                .then_with(|| a.meta.slug.cmp(&b.meta.slug))
        });
        Self { posts }
    }

    /// Load every `*.md` under `dir`. Unreadable or invalid files are logged
    /// and skipped; a missing directory yields an empty store.
    pub fn load(dir: &Path) -> Result<Self, PostError> {
        if !dir.exists() {
            tracing::warn!("Posts directory {} does not exist", dir.display());
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(dir).map_err(|source| PostError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut posts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let source = match std::fs::read_to_string(&path) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            match parse_post(slug, &source) {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => tracing::debug!("Skipping draft {}", slug),
                Err(e) => tracing::warn!("Skipping post: {}", e),
            }
        }

        tracing::info!("Loaded {} posts from {}", posts.len(), dir.display());
        Ok(Self::from_posts(posts))
    }

    pub fn summaries(&self) -> Vec<PostSummary> {
        self.posts.iter().map(|p| p.meta.clone()).collect()
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.meta.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
