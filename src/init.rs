//! Site initialization
//!
//! Creates the src/, templates/ and public/ directories plus a starter
//! site.yaml and README.md.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::build::PUBLIC_DIR;
use crate::config::CONFIG_FILE;
use crate::engine::TEMPLATES_DIR;
use crate::source::SOURCE_DIR;

/// Initialize a new site in `root`
pub fn init_site(root: &Path) -> Result<InitResult> {
    let config = root.join(CONFIG_FILE);
    if config.exists() {
        anyhow::bail!("{} already exists in {}", CONFIG_FILE, root.display());
    }

    let src = root.join(SOURCE_DIR);
    fs::create_dir_all(src.join("posts"))?;
    fs::create_dir_all(root.join(TEMPLATES_DIR))?;
    fs::create_dir_all(root.join(PUBLIC_DIR))?;

    fs::write(&config, SITE_TEMPLATE)?;
    fs::write(root.join("README.md"), README_TEMPLATE)?;
    fs::write(root.join(TEMPLATES_DIR).join("post.html"), POST_TEMPLATE)?;
    fs::write(src.join("posts/hello.md"), HELLO_POST)?;

    Ok(InitResult {
        site_dir: root.display().to_string(),
        files_created: vec![
            "src/".to_string(),
            "templates/".to_string(),
            "public/".to_string(),
            CONFIG_FILE.to_string(),
            "README.md".to_string(),
            "templates/post.html".to_string(),
            "src/posts/hello.md".to_string(),
        ],
    })
}

/// Result of site initialization
pub struct InitResult {
    pub site_dir: String,
    pub files_created: Vec<String>,
}

const SITE_TEMPLATE: &str = r#"# Site configuration
# Build with: ssg build

# Paths removed from public/ after the build
ignore:
  - "posts/*.md"

# Seconds a command recipe may run (0 = no limit)
timeout: 60

targets:
  # One page per src/posts/<name>.md
  "posts/%.html":
    template: post.html
    with:
      content: "posts/%.md"
"#;

const README_TEMPLATE: &str = r#"# My site

- `src/` is copied into `public/` as-is.
- `templates/` holds templates that are not copied.
- `site.yaml` declares generated targets.

Run `ssg build` to regenerate `public/`.
"#;

const POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <body>
    {{content}}
  </body>
</html>
"#;

const HELLO_POST: &str = "Hello, world!\n";
