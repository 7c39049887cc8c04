//! Source tree access
//!
//! Every recipe and wildcard pattern is relative to the site's `src/`
//! directory. This module is the only place that turns those relative
//! strings into real paths.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::error::{Result, SsgError};

/// Name of the source directory inside a site root
pub const SOURCE_DIR: &str = "src";

/// Read-only view of a site's `src/` directory
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    /// Wrap an existing source directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source tree of the site rooted at `site_root` (`site_root/src`)
    pub fn for_site(site_root: &Path) -> Self {
        Self::new(site_root.join(SOURCE_DIR))
    }

    /// Absolute (or caller-relative) path of the source directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of `relative` inside the source tree
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Check if `relative` names a regular file in the source tree
    pub fn is_file(&self, relative: &str) -> bool {
        !relative.is_empty() && self.resolve(relative).is_file()
    }

    /// Read a whole file from the source tree
    pub fn read_to_string(&self, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(self.resolve(relative))?)
    }

    /// List entries matching `pattern`, relative to the source tree.
    ///
    /// Paths use `/` separators and come back in the order the glob walk
    /// produces them (sorted per directory).
    pub fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        if Path::new(pattern).is_absolute() {
            return Err(SsgError::InvalidGlob {
                pattern: pattern.to_string(),
                reason: "pattern must be relative to src/".to_string(),
            });
        }

        let base = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{}/{}", base.trim_end_matches('/'), pattern);

        let entries = glob::glob(&full).map_err(|e| SsgError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SsgError::GlobAccess {
                path: e.path().to_path_buf(),
                reason: e.error().to_string(),
            })?;
            if let Some(relative) = self.relative(&path) {
                matches.push(relative);
            }
        }

        trace!(pattern, count = matches.len(), "globbed source tree");
        Ok(matches)
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| match c {
                Component::ParentDir => "..".to_string(),
                other => other.as_os_str().to_string_lossy().into_owned(),
            })
            .collect();
        Some(parts.join("/"))
    }
}
