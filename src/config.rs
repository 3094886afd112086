//! Server configuration.
//!
//! Configuration is read from an optional YAML file (named by the `CONFIG`
//! environment variable) and then overridden by `LISTEN` and `ROOT`.
//! Every section has defaults, so an empty document is a valid config.

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub limits: Limits,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub listen_addr: String,
}

/// Document root layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory served to GET requests
    pub root: PathBuf,
    /// Single sub-directory of `root` where POST, PUT and DELETE are allowed
    pub writable_dir: String,
    /// Document substituted for an empty target or `/`
    pub index: String,
}

/// Caps on how much a single request may make the server buffer.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8081".to_string(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            writable_dir: "uploads".to_string(),
            index: "index.html".to_string(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_bytes: 64 * 1024,
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Loads configuration from `CONFIG` (if set), then applies `LISTEN`
    /// and `ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml(&text)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        if let Ok(root) = std::env::var("ROOT") {
            cfg.files.root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    /// Parses a YAML document. Missing sections and keys take their defaults.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid YAML configuration")
    }
}
