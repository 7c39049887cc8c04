//! Sausage - a flexible template-based static site generator
//!
//! ## Module Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       TARGET RESOLUTION                      │
//! │  wildcard/    `%` placeholder algebra                        │
//! │  matching/    matching blocks between pattern and path       │
//! │  candidates/  wildcard substitutions backed by src/ entries  │
//! │  recipe/      file-or-command recipes → context values       │
//! │  target/      declared targets → concrete targets            │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         COLLABORATORS                        │
//! │  source/      src/ listing and reads                         │
//! │  process/     command execution with timeout                 │
//! │  engine/      template rendering (Handlebars)                │
//! │  config/      site.yaml                                      │
//! │  build/, init/  `ssg build`, `ssg init`                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod build;
pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod init;
pub mod matching;
pub mod process;
pub mod recipe;
pub mod source;
pub mod target;
pub mod wildcard;

pub use build::{build, build_with, BuildReport};
pub use config::SiteConfig;
pub use engine::{HandlebarsEngine, TemplateEngine};
pub use error::{FixSuggestion, Result, SsgError};
pub use recipe::{ContextValue, Recipe, RecipeEvaluator, RecipeKind};
pub use source::SourceTree;
pub use target::Target;
