//! Error types with fix suggestions
//!
//! Error code ranges:
//! - SSG-000-009: site.yaml errors
//! - SSG-010-019: wildcard/expansion errors
//! - SSG-020-029: recipe errors
//! - SSG-030-039: render/build errors

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SsgError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
#[derive(Error, Debug)]
pub enum SsgError {
    // ─────────────────────────────────────────────────────────────
    // Config errors (SSG-001 to SSG-003)
    // ─────────────────────────────────────────────────────────────
    #[error("[SSG-001] Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("[SSG-002] Failed to parse site.yaml: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("[SSG-003] Invalid site.yaml: {reason}")]
    InvalidConfig { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Wildcard errors (SSG-010 to SSG-012)
    // ─────────────────────────────────────────────────────────────
    #[error("[SSG-010] '{text}' has more than one '%' placeholder")]
    MultiplePlaceholders { text: String },

    #[error("[SSG-011] Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("[SSG-012] Cannot read {path} while globbing: {reason}")]
    GlobAccess { path: PathBuf, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Recipe errors (SSG-020 to SSG-025)
    // ─────────────────────────────────────────────────────────────
    #[error("[SSG-020] Cannot decode context file '{recipe}': {reason}")]
    ContextDecode { recipe: String, reason: String },

    #[error("[SSG-021] Recipe '{recipe}' exited with {status}: {stderr}")]
    RecipeExecution {
        recipe: String,
        status: String,
        stderr: String,
    },

    #[error("[SSG-022] Recipe '{recipe}' timed out after {timeout:?}")]
    RecipeTimeout { recipe: String, timeout: Duration },

    #[error("[SSG-023] Failed to run recipe '{recipe}': {reason}")]
    RecipeSpawn { recipe: String, reason: String },

    #[error("[SSG-024] Cannot split recipe '{recipe}' into words (unbalanced quotes?)")]
    RecipeTokenize { recipe: String },

    #[error("[SSG-025] Recipe is empty")]
    EmptyRecipe,

    // ─────────────────────────────────────────────────────────────
    // Render/build errors (SSG-030 to SSG-032)
    // ─────────────────────────────────────────────────────────────
    #[error("[SSG-030] Template '{template}' not found in src/ or templates/")]
    TemplateNotFound { template: String },

    #[error("[SSG-031] Failed to render '{template}': {reason}")]
    Render { template: String, reason: String },

    #[error("[SSG-032] Target '{target}' failed: {source}")]
    TargetFailed {
        target: String,
        #[source]
        source: Box<SsgError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SsgError {
    /// Attach the declared target name to a failure
    pub fn in_target(self, target: &str) -> Self {
        match self {
            already @ SsgError::TargetFailed { .. } => already,
            other => SsgError::TargetFailed {
                target: target.to_string(),
                source: Box::new(other),
            },
        }
    }
}

impl FixSuggestion for SsgError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            SsgError::ConfigNotFound { .. } => Some("Run `ssg init` to create site.yaml"),
            SsgError::ConfigParse(_) => Some("Check YAML syntax: indentation and quoting"),
            SsgError::InvalidConfig { .. } => {
                Some("site.yaml must be a mapping with optional 'ignore' and 'targets' keys")
            }
            SsgError::MultiplePlaceholders { .. } => {
                Some("Use a single '%' per string, or escape literal percent signs as '%%'")
            }
            SsgError::InvalidGlob { .. } => Some("Check the characters around '%' in the recipe"),
            SsgError::GlobAccess { .. } => Some("Check permissions under src/"),
            SsgError::ContextDecode { .. } => {
                Some("Context files must contain valid JSON or YAML")
            }
            SsgError::RecipeExecution { .. } => {
                Some("Run the command by hand inside src/ to see why it fails")
            }
            SsgError::RecipeTimeout { .. } => {
                Some("Raise 'timeout' in site.yaml or set SSG_COMMAND_TIMEOUT")
            }
            SsgError::RecipeSpawn { .. } => {
                Some("Check the file exists in src/ or the command is on PATH")
            }
            SsgError::RecipeTokenize { .. } => Some("Close every quote in the recipe"),
            SsgError::EmptyRecipe => Some("Give the recipe a file path or a command"),
            SsgError::TemplateNotFound { .. } => {
                Some("Put the template in src/ or templates/")
            }
            SsgError::Render { .. } => {
                Some("Check that every variable used by the template is in its context")
            }
            SsgError::TargetFailed { source, .. } => source.fix_suggestion(),
            SsgError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
