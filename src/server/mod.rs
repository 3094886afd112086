//! Accepting connections.

pub mod listener;

use crate::config::{Config, Limits};
use crate::files::DocumentRoot;

/// Read-only state shared by every connection.
#[derive(Debug, Clone)]
pub struct ServeContext {
    pub root: DocumentRoot,
    pub limits: Limits,
}

impl ServeContext {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            root: DocumentRoot::open(&cfg.files)?,
            limits: cfg.limits,
        })
    }
}
