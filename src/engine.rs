//! Template engines
//!
//! The build only needs "render this template with this context". The
//! Handlebars engine looks templates up in `src/` first, then `templates/`,
//! treats missing variables as errors and does no HTML escaping. Every file
//! under `templates/` is also a partial, named by its relative path without
//! extension, so pages can `{{> header}}` or wrap themselves in
//! `{{#> layout}}...{{/layout}}`.

use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SsgError};
use crate::source::SOURCE_DIR;

/// Name of the extra template directory inside a site root
pub const TEMPLATES_DIR: &str = "templates";

/// Renders a template identifier with a context value
pub trait TemplateEngine {
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// Handlebars renderer over a list of search directories
pub struct HandlebarsEngine {
    registry: Handlebars<'static>,
    search_dirs: Vec<PathBuf>,
}

impl HandlebarsEngine {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self {
            registry,
            search_dirs,
        }
    }

    /// Engine searching `root/src` then `root/templates`, with the files in
    /// `root/templates` registered as partials
    pub fn for_site(root: &Path) -> Result<Self> {
        let templates = root.join(TEMPLATES_DIR);
        let mut engine = Self::new(vec![root.join(SOURCE_DIR), templates.clone()]);
        engine.register_partials(&templates)?;
        Ok(engine)
    }

    /// Register every file under `dir` as a partial. A missing `dir` is empty.
    pub fn register_partials(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }
        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| SsgError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = partial_name(dir, entry.path()) else {
                continue;
            };
            let source = fs::read_to_string(entry.path())?;
            self.registry
                .register_partial(&name, source)
                .map_err(|e| SsgError::Render {
                    template: name.clone(),
                    reason: e.to_string(),
                })?;
            debug!(partial = %name, "registered partial");
        }
        Ok(())
    }

    fn locate(&self, template: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(template))
            .find(|path| path.is_file())
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        let path = self
            .locate(template)
            .ok_or_else(|| SsgError::TemplateNotFound {
                template: template.to_string(),
            })?;
        debug!(template, path = %path.display(), "rendering template");

        let source = fs::read_to_string(&path)?;
        self.registry
            .render_template(&source, context)
            .map_err(|e| SsgError::Render {
                template: template.to_string(),
                reason: e.to_string(),
            })
    }
}

/// `templates/partials/nav.html` -> `partials/nav`
fn partial_name(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?.with_extension("");
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}
