//! Mapping request targets onto the filesystem.
//!
//! A [`DocumentRoot`] turns a raw, percent-encoded request target into a
//! [`ResolvedPath`] only after proving that the canonical result lies inside
//! the root: `..` segments, encoded traversal (`%2e%2e`), and symlinks
//! pointing elsewhere are all resolved before the comparison, and the
//! comparison is made component by component, so `/srv/www` never admits
//! `/srv/wwwevil`.
//!
//! Write methods get a second, narrower check: their target must lie
//! strictly beneath the writable directory. The access level is carried in
//! the type, so a handler that modifies the filesystem cannot be handed a
//! path that only passed the read check.

use std::marker::PhantomData;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use soft_canonicalize::soft_canonicalize;

use crate::config::FilesConfig;
use crate::error::ServeError;

/// Marker: path may be read.
#[derive(Debug, Clone, Copy)]
pub struct Read;

/// Marker: path lies beneath the writable directory and may be modified.
#[derive(Debug, Clone, Copy)]
pub struct Write;

/// A canonical path proven to be inside the document root.
#[derive(Debug, Clone)]
pub struct ResolvedPath<Access = Read> {
    path: PathBuf,
    request_path: String,
    _access: PhantomData<Access>,
}

impl<Access> ResolvedPath<Access> {
    /// Canonical filesystem path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Decoded request path, always starting with `/` (e.g. `/docs/a b.txt`).
    pub fn request_path(&self) -> &str {
        &self.request_path
    }
}

/// The served directory tree. Immutable once opened.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: PathBuf,
    writable: PathBuf,
    index: String,
}

impl DocumentRoot {
    /// Canonicalizes the configured root and creates the writable
    /// sub-directory if it does not exist yet.
    pub fn open(cfg: &FilesConfig) -> anyhow::Result<Self> {
        let root = std::fs::canonicalize(&cfg.root)
            .with_context(|| format!("document root {} is not accessible", cfg.root.display()))?;
        anyhow::ensure!(root.is_dir(), "document root {} is not a directory", root.display());

        let mut name = Path::new(&cfg.writable_dir).components();
        match (name.next(), name.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => anyhow::bail!(
                "writable directory '{}' must be a single plain path component",
                cfg.writable_dir
            ),
        }

        let writable = root.join(&cfg.writable_dir);
        std::fs::create_dir_all(&writable)
            .with_context(|| format!("creating writable directory {}", writable.display()))?;
        let writable = std::fs::canonicalize(&writable)?;
        anyhow::ensure!(
            writable.starts_with(&root) && writable != root,
            "writable directory {} resolves outside the document root",
            writable.display()
        );

        Ok(Self {
            root,
            writable,
            index: cfg.index.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn writable_path(&self) -> &Path {
        &self.writable
    }

    /// Resolves `raw_target` for reading. The root itself is admitted.
    pub fn resolve(&self, raw_target: &str) -> Result<ResolvedPath<Read>, ServeError> {
        let rejected = || ServeError::PathRejected {
            target: raw_target.to_string(),
        };

        let decoded = String::from_utf8(percent_decode(strip_query(raw_target)))
            .map_err(|_| rejected())?;
        if decoded.contains('\0') {
            return Err(rejected());
        }

        let request_path = if decoded.is_empty() || decoded == "/" {
            format!("/{}", self.index)
        } else if decoded.starts_with('/') {
            decoded
        } else {
            format!("/{}", decoded)
        };

        let relative = request_path.trim_start_matches('/');
        let path = soft_canonicalize(self.root.join(relative)).map_err(|_| rejected())?;

        if !path.starts_with(&self.root) || has_unresolved_link(&path, &self.root) {
            return Err(rejected());
        }

        Ok(ResolvedPath {
            path,
            request_path,
            _access: PhantomData,
        })
    }

    /// Resolves `raw_target` for modification: the result must lie strictly
    /// beneath the writable directory.
    pub fn resolve_writable(&self, raw_target: &str) -> Result<ResolvedPath<Write>, ServeError> {
        let resolved = self.resolve(raw_target)?;

        if !resolved.path.starts_with(&self.writable) || resolved.path == self.writable {
            return Err(ServeError::PathRejected {
                target: raw_target.to_string(),
            });
        }

        Ok(ResolvedPath {
            path: resolved.path,
            request_path: resolved.request_path,
            _access: PhantomData,
        })
    }
}

/// True when a component of `path` below `root` is still a symlink.
///
/// Canonicalization replaces every link it can follow, so one that survives
/// points nowhere yet. Writing through it would create its target, wherever
/// that is.
fn has_unresolved_link(path: &Path, root: &Path) -> bool {
    path.ancestors()
        .take_while(|p| *p != root)
        .any(|p| p.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink()))
}

/// Drops a `?query` or `#fragment` suffix from a request target.
pub fn strip_query(target: &str) -> &str {
    match target.find(['?', '#']) {
        Some(pos) => &target[..pos],
        None => target,
    }
}

/// Decodes `%XY` escapes. Truncated or non-hex escapes are kept literally.
///
/// ```
/// # use bastion::files::resolve::percent_decode;
/// assert_eq!(percent_decode("%2e%2E/a%20b"), b"../a b");
/// assert_eq!(percent_decode("100%"), b"100%");
/// assert_eq!(percent_decode("%zz%4"), b"%zz%4");
/// ```
pub fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    out
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Encodes a path for use in an `href`, leaving `/` and unreserved
/// characters intact.
pub fn percent_encode(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for &b in path.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
