//! site.yaml loading
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variable `SSG_COMMAND_TIMEOUT` (seconds, `0` = no limit)
//! 2. `timeout` in site.yaml
//! 3. Defaults

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SsgError};
use crate::process::DEFAULT_TIMEOUT;
use crate::recipe::Recipe;
use crate::target::Target;

/// Config file name inside a site root
pub const CONFIG_FILE: &str = "site.yaml";

/// Environment override for the command recipe timeout
pub const TIMEOUT_ENV: &str = "SSG_COMMAND_TIMEOUT";

/// site.yaml as written
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default)]
    targets: BTreeMap<String, TargetDef>,
}

/// One entry under `targets:`
#[derive(Debug, Deserialize)]
struct TargetDef {
    template: String,
    #[serde(default)]
    context: Option<Recipe>,
    #[serde(default, rename = "with")]
    namespace: BTreeMap<String, Recipe>,
}

/// Parsed site configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Globs removed from `public/` after the build
    pub ignore: Vec<String>,
    /// Per-command timeout for command recipes (`None` = no limit)
    pub timeout: Option<Duration>,
    /// Declared targets, ordered by name
    pub targets: Vec<Target>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            timeout: Some(DEFAULT_TIMEOUT),
            targets: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Parse site.yaml contents. An empty document is an empty config.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let raw: RawConfig = match serde_yaml::from_str::<serde_yaml::Value>(text)? {
            serde_yaml::Value::Null => RawConfig::default(),
            value @ serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)?,
            _ => {
                return Err(SsgError::InvalidConfig {
                    reason: "top level must be a mapping".to_string(),
                })
            }
        };

        let targets = raw
            .targets
            .into_iter()
            .map(|(name, def)| Target {
                name,
                template: def.template,
                context: def.context,
                namespace: def.namespace,
            })
            .collect();

        Ok(Self {
            ignore: raw.ignore,
            timeout: match raw.timeout {
                Some(secs) => seconds(secs),
                None => Some(DEFAULT_TIMEOUT),
            },
            targets,
        })
    }

    /// Load `root/site.yaml` and apply environment overrides
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Err(SsgError::ConfigNotFound { path });
        }
        let text = fs::read_to_string(&path)?;
        Self::from_yaml(&text)?.with_timeout_override(std::env::var(TIMEOUT_ENV).ok())
    }

    /// Apply a timeout override given in seconds
    pub fn with_timeout_override(mut self, value: Option<String>) -> Result<Self> {
        if let Some(value) = value {
            let secs: u64 = value.trim().parse().map_err(|_| SsgError::InvalidConfig {
                reason: format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, value),
            })?;
            self.timeout = seconds(secs);
        }
        Ok(self)
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config() {
        assert_eq!(SiteConfig::from_yaml("").unwrap(), SiteConfig::default());
        assert_eq!(SiteConfig::from_yaml("ignore: []").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_parse_targets() {
        let config = SiteConfig::from_yaml(
            r#"
ignore: ["post.html", "**/*.md"]
timeout: 5
targets:
  "%.html":
    template: post.html
    with:
      content: "%.md"
  index.html:
    template: index.html
    context: index.json
"#,
        )
        .unwrap();

        assert_eq!(config.ignore, vec!["post.html", "**/*.md"]);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(
            config.targets,
            vec![
                Target::new("%.html", "post.html").with_binding("content", "%.md"),
                Target::new("index.html", "index.html").with_context("index.json"),
            ]
        );
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let config = SiteConfig::from_yaml("timeout: 0").unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_timeout_override() {
        let config = SiteConfig::from_yaml("timeout: 5").unwrap();
        let config = config.with_timeout_override(Some("120".to_string())).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(120)));

        let err = SiteConfig::default()
            .with_timeout_override(Some("soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, SsgError::InvalidConfig { .. }));
    }

    #[test]
    fn test_non_mapping_is_invalid() {
        let err = SiteConfig::from_yaml("- a\n- b\n").unwrap_err();
        assert!(matches!(err, SsgError::InvalidConfig { .. }));
    }

    #[test]
    fn test_target_without_template_is_parse_error() {
        let err = SiteConfig::from_yaml("targets:\n  index.html:\n    context: a.json\n").unwrap_err();
        assert!(matches!(err, SsgError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let err = SiteConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, SsgError::ConfigNotFound { .. }));
    }
}
