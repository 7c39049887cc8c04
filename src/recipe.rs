//! Context recipes
//!
//! A recipe is either a path inside `src/` or a command line. File recipes
//! decode to structured data (JSON first, then YAML). Command recipes run
//! with `src/` as working directory and produce their stdout, or the
//! contents of the `$out` scratch file when the command takes one.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::error::{Result, SsgError};
use crate::process::{self, RunError, DEFAULT_TIMEOUT};
use crate::source::SourceTree;
use crate::wildcard;

/// Token replaced by a scratch file path in command recipes
pub const OUT_MARKER: &str = "$out";

/// Recipe string as written in site.yaml
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(String);

impl Recipe {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_placeholder(&self) -> bool {
        wildcard::has_placeholder(&self.0)
    }

    /// Copy of this recipe with every placeholder replaced
    pub fn with_replacement(&self, replacement: &str) -> Self {
        Self(wildcard::substitute(&self.0, replacement))
    }

    /// Split into shell words (quotes honored, nothing expanded)
    pub fn words(&self) -> Result<Vec<String>> {
        split_words(&self.0)
    }

    /// Glob patterns for every word that carries a placeholder.
    ///
    /// A word with more than one placeholder is rejected.
    pub fn glob_patterns(&self) -> Result<Vec<String>> {
        let mut patterns = Vec::new();
        for word in self.words()? {
            match wildcard::locate(&word).len() {
                0 => {}
                1 => patterns.push(wildcard::to_glob(&word)),
                _ => return Err(SsgError::MultiplePlaceholders { text: word }),
            }
        }
        Ok(patterns)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Recipe {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

fn split_words(text: &str) -> Result<Vec<String>> {
    shlex::split(text).ok_or_else(|| SsgError::RecipeTokenize {
        recipe: text.to_string(),
    })
}

/// Result of evaluating a recipe
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Decoded JSON/YAML file
    Data(Value),
    /// Raw command output
    Text(String),
}

impl ContextValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContextValue::Text(text) => Some(text),
            ContextValue::Data(Value::String(text)) => Some(text),
            ContextValue::Data(_) => None,
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            ContextValue::Data(value) => value,
            ContextValue::Text(text) => Value::String(text),
        }
    }
}

impl From<ContextValue> for Value {
    fn from(value: ContextValue) -> Self {
        value.into_json()
    }
}

/// How a recipe will be evaluated, decided by a file check in `src/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeKind {
    /// Regular file under `src/`
    File(PathBuf),
    /// Command argv
    Command(Vec<String>),
}

/// Evaluates recipes against a source tree
#[derive(Debug, Clone)]
pub struct RecipeEvaluator {
    source: SourceTree,
    timeout: Option<Duration>,
    scratch_dir: Option<PathBuf>,
}

impl RecipeEvaluator {
    pub fn new(source: SourceTree) -> Self {
        Self {
            source,
            timeout: Some(DEFAULT_TIMEOUT),
            scratch_dir: None,
        }
    }

    /// Per-command timeout (`None` waits forever)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory for `$out` files (system temp dir when unset)
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn source(&self) -> &SourceTree {
        &self.source
    }

    /// Decide which branch `recipe` takes.
    ///
    /// Checked fresh every time: the same recipe can flip from command to
    /// file when a matching file appears.
    pub fn classify(&self, recipe: &Recipe) -> Result<RecipeKind> {
        let text = wildcard::unescape(recipe.as_str());
        if self.source.is_file(&text) {
            return Ok(RecipeKind::File(self.source.resolve(&text)));
        }
        let words = split_words(&text)?;
        if words.is_empty() {
            return Err(SsgError::EmptyRecipe);
        }
        Ok(RecipeKind::Command(words))
    }

    /// Evaluate `recipe` into a context value
    #[instrument(skip_all, fields(recipe = %recipe))]
    pub fn evaluate(&self, recipe: &Recipe) -> Result<ContextValue> {
        match self.classify(recipe)? {
            RecipeKind::File(path) => {
                debug!(path = %path.display(), "decoding context file");
                let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
                    io::ErrorKind::InvalidData => SsgError::ContextDecode {
                        recipe: recipe.to_string(),
                        reason: e.to_string(),
                    },
                    _ => SsgError::Io(e),
                })?;
                decode(recipe, &text).map(ContextValue::Data)
            }
            RecipeKind::Command(words) => self.run_command(recipe, words),
        }
    }

    fn run_command(&self, recipe: &Recipe, mut words: Vec<String>) -> Result<ContextValue> {
        // Scratch file lives until the end of this function, whatever happens
        let mut out_file: Option<NamedTempFile> = None;
        if words.iter().any(|w| w == OUT_MARKER) {
            let file = match &self.scratch_dir {
                Some(dir) => NamedTempFile::new_in(dir)?,
                None => NamedTempFile::new()?,
            };
            let path = file.path().to_string_lossy().into_owned();
            for word in words.iter_mut().filter(|w| w.as_str() == OUT_MARKER) {
                *word = path.clone();
            }
            out_file = Some(file);
        }

        let output = process::run(&words, self.source.path(), self.timeout).map_err(|e| {
            match e {
                RunError::TimedOut(timeout) => SsgError::RecipeTimeout {
                    recipe: recipe.to_string(),
                    timeout,
                },
                other => SsgError::RecipeSpawn {
                    recipe: recipe.to_string(),
                    reason: other.to_string(),
                },
            }
        })?;

        if !output.status.success() {
            return Err(SsgError::RecipeExecution {
                recipe: recipe.to_string(),
                status: output.status.to_string(),
                stderr: output.stderr.trim_end().to_string(),
            });
        }

        match out_file {
            // Read by path: the command may have replaced the file
            Some(file) => Ok(ContextValue::Text(fs::read_to_string(file.path())?)),
            None => Ok(ContextValue::Text(output.stdout)),
        }
    }
}

/// Decode file contents: strict JSON first, permissive YAML second
fn decode(recipe: &Recipe, text: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            debug!(error = %json_err, "not JSON, trying YAML");
            serde_yaml::from_str::<Value>(text).map_err(|e| SsgError::ContextDecode {
                recipe: recipe.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
