//! Targets and wildcard expansion
//!
//! A declared target comes straight from site.yaml and may carry a `%` in
//! its name. Expansion turns it into concrete targets, one per substitution
//! that every wildcarded recipe of the target agrees on:
//!
//! ```text
//! "%.html" with content: "%.md"      src/foo.md, src/bar.md
//!            │                                │
//!            ▼                                ▼
//!   patterns {"*.md"}  ──────────▶  candidates {"bar", "foo"}
//!                                             │
//!                                             ▼
//!              bar.html (content: bar.md), foo.html (content: foo.md)
//! ```
//!
//! Targets are never modified in place; expansion builds new values.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::candidates::wildcard_candidates;
use crate::error::{Result, SsgError};
use crate::recipe::{Recipe, RecipeEvaluator};
use crate::source::SourceTree;
use crate::wildcard;

/// File to be generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Output path relative to `public/`; may hold one `%`
    pub name: String,
    /// Template identifier handed to the template engine
    pub template: String,
    /// Primary context recipe
    pub context: Option<Recipe>,
    /// Extra context keys, each bound to its own recipe
    pub namespace: BTreeMap<String, Recipe>,
}

impl Target {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            context: None,
            namespace: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, recipe: impl Into<Recipe>) -> Self {
        self.context = Some(recipe.into());
        self
    }

    pub fn with_binding(mut self, key: impl Into<String>, recipe: impl Into<Recipe>) -> Self {
        self.namespace.insert(key.into(), recipe.into());
        self
    }

    /// Check if the output name still has a placeholder
    pub fn is_wildcarded(&self) -> bool {
        wildcard::has_placeholder(&self.name)
    }

    /// Output path with `%%` escapes collapsed
    pub fn output_name(&self) -> String {
        wildcard::unescape(&self.name)
    }

    /// Primary recipe (if any) followed by namespace recipes
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.context.iter().chain(self.namespace.values())
    }

    /// Distinct glob patterns from every placeholder-bearing recipe word
    pub fn glob_patterns(&self) -> Result<BTreeSet<String>> {
        let mut patterns = BTreeSet::new();
        for recipe in self.recipes().filter(|r| r.has_placeholder()) {
            patterns.extend(recipe.glob_patterns()?);
        }
        Ok(patterns)
    }

    /// Concrete copy of this target with `%` replaced by the literal `value`
    pub fn with_replacement(&self, value: &str) -> Target {
        // A literal `%` in the value must not turn into a new placeholder
        let escaped = value.replace('%', "%%");
        Target {
            name: wildcard::substitute(&self.name, &escaped),
            template: self.template.clone(),
            context: self.context.as_ref().map(|r| substitute_recipe(r, &escaped)),
            namespace: self
                .namespace
                .iter()
                .map(|(k, r)| (k.clone(), substitute_recipe(r, &escaped)))
                .collect(),
        }
    }

    /// Expand into concrete targets using evidence from `source`.
    ///
    /// A target without a placeholder in its name yields only itself. A
    /// wildcarded target yields one target per candidate that survives the
    /// intersection across all of its patterns, in alphabetical order of
    /// the candidates. No patterns or no survivors yields nothing.
    #[instrument(skip_all, fields(target = %self.name))]
    pub fn expand(&self, source: &SourceTree) -> Result<Vec<Target>> {
        match wildcard::locate(&self.name).len() {
            0 => return Ok(vec![self.clone()]),
            1 => {}
            _ => {
                return Err(SsgError::MultiplePlaceholders {
                    text: self.name.clone(),
                })
            }
        }

        let patterns = self.glob_patterns()?;
        if patterns.is_empty() {
            warn!("wildcard target has no wildcard recipes to take evidence from");
            return Ok(Vec::new());
        }

        let mut surviving: Option<BTreeSet<String>> = None;
        for pattern in &patterns {
            let found: BTreeSet<String> = wildcard_candidates(source, pattern)?.collect();
            debug!(pattern = %pattern, candidates = ?found, "pattern evidence");
            surviving = Some(match surviving {
                None => found,
                Some(prev) => prev.intersection(&found).cloned().collect(),
            });
        }
        let surviving = surviving.unwrap_or_default();

        if surviving.is_empty() {
            warn!(patterns = ?patterns, "no substitution satisfies every pattern; target produces no output");
        }

        Ok(surviving
            .iter()
            .map(|value| self.with_replacement(value))
            .collect())
    }

    /// Evaluate the template context.
    ///
    /// Starts from the primary recipe (or an empty mapping) and adds one key
    /// per namespace binding. Bindings are skipped when the primary context
    /// isn't a mapping.
    #[instrument(skip_all, fields(target = %self.name))]
    pub fn eval_context(&self, evaluator: &RecipeEvaluator) -> Result<Value> {
        let mut context = match &self.context {
            Some(recipe) => evaluator.evaluate(recipe)?.into_json(),
            None => Value::Object(Map::new()),
        };

        match context.as_object_mut() {
            Some(map) => {
                for (key, recipe) in &self.namespace {
                    let value = evaluator.evaluate(recipe)?.into_json();
                    map.insert(key.clone(), value);
                }
            }
            None if !self.namespace.is_empty() => {
                warn!("context is not a mapping; ignoring 'with' bindings");
            }
            None => {}
        }

        Ok(context)
    }
}

fn substitute_recipe(recipe: &Recipe, escaped: &str) -> Recipe {
    if recipe.has_placeholder() {
        recipe.with_replacement(escaped)
    } else {
        recipe.clone()
    }
}
