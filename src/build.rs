//! `ssg build`
//!
//! Copies `src/` into `public/`, renders every concrete target on top of
//! it, then prunes the paths listed under `ignore:`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::engine::{HandlebarsEngine, TemplateEngine};
use crate::error::{Result, SsgError};
use crate::recipe::RecipeEvaluator;
use crate::source::SourceTree;
use crate::target::Target;

/// Name of the output directory inside a site root
pub const PUBLIC_DIR: &str = "public";

/// What a build did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildReport {
    /// Files copied from `src/`
    pub copied: usize,
    /// Rendered targets, as paths relative to `public/`
    pub generated: Vec<String>,
    /// Paths removed by `ignore:` rules
    pub pruned: Vec<PathBuf>,
}

/// Build the site rooted at `root` using its site.yaml
pub fn build(root: &Path) -> Result<BuildReport> {
    let config = SiteConfig::load(root)?;
    let engine = HandlebarsEngine::for_site(root)?;
    build_with(root, &config, &engine)
}

/// Build with an explicit config and template engine
#[instrument(skip_all, fields(root = %root.display()))]
pub fn build_with(
    root: &Path,
    config: &SiteConfig,
    engine: &dyn TemplateEngine,
) -> Result<BuildReport> {
    let source = SourceTree::for_site(root);
    let evaluator = RecipeEvaluator::new(source.clone()).with_timeout(config.timeout);
    let public = root.join(PUBLIC_DIR);

    fs::create_dir_all(&public)?;
    clear(&public)?;

    let mut report = BuildReport {
        copied: copy_tree(source.path(), &public)?,
        ..Default::default()
    };

    for declared in &config.targets {
        let concrete = declared
            .expand(&source)
            .map_err(|e| e.in_target(&declared.name))?;
        debug!(target = %declared.name, count = concrete.len(), "expanded target");

        for target in concrete {
            let name = target.output_name();
            let rendered = render(&target, &evaluator, engine)
                .map_err(|e| e.in_target(&label(declared, &name)))?;

            let path = public.join(&name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, rendered)?;
            info!(target = %name, template = %target.template, "generated");
            report.generated.push(name);
        }
    }

    report.pruned = prune(&public, &config.ignore)?;
    Ok(report)
}

fn render(target: &Target, evaluator: &RecipeEvaluator, engine: &dyn TemplateEngine) -> Result<String> {
    let context = target.eval_context(evaluator)?;
    engine.render(&target.template, &context)
}

fn label(declared: &Target, concrete: &str) -> String {
    if declared.name == concrete {
        concrete.to_string()
    } else {
        format!("{} (from '{}')", concrete, declared.name)
    }
}

/// Remove everything inside `dir`, keeping `dir` itself
fn clear(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Copy the contents of `from` into `to`; returns the number of files copied
fn copy_tree(from: &Path, to: &Path) -> io::Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let dest = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Delete paths under `public` matching any of `patterns`
fn prune(public: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&public.to_string_lossy());
    let mut pruned = Vec::new();

    for pattern in patterns {
        let full = format!("{}/{}", base.trim_end_matches('/'), pattern);
        let matches: Vec<PathBuf> = glob::glob(&full)
            .map_err(|e| SsgError::InvalidGlob {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?
            .filter_map(|entry| entry.ok())
            .collect();

        for path in matches {
            // May already be gone with a pruned parent
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else if path.is_file() {
                fs::remove_file(&path)?;
            } else {
                continue;
            }
            debug!(path = %path.display(), pattern = %pattern, "pruned");
            pruned.push(path.strip_prefix(public).unwrap_or(&path).to_path_buf());
        }
    }

    Ok(pruned)
}
