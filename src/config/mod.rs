//! Configuration management

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_site_title")]
    pub site_title: String,

    /// Directory of markdown posts
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,

    /// Static assets (audio cues, favicon, stylesheet)
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Client entry module under `public_dir`; empty disables the client
    #[serde(default = "default_client_bundle")]
    pub client_bundle: String,
}

fn default_port() -> u16 {
    8080
}

fn default_site_title() -> String {
    "Folio".to_string()
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("content/posts")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_client_bundle() -> String {
    "/wasm/folio.js".to_string()
}

/// Get config directory (FOLIO_CONFIG_DIR or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FOLIO_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/folio");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("folio");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/folio");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("folio");
        }
    }

    PathBuf::from(".")
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        .set_default("port", 8080)?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // Override with environment variables (FOLIO_PORT, FOLIO_POSTS_DIR, etc.)
        .add_source(
            ::config::Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // Explicit precedence: FOLIO_PORT > PORT > config > default
    if let Ok(port) = std::env::var("FOLIO_PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    } else if let Ok(port) = std::env::var("PORT") {
        // PaaS hosts hand the listen port over as PORT
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}
