//! End-to-end build tests
//!
//! Each test lays out a site (site.yaml, src/, public/) in a temp dir and
//! runs the library build against it.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use sausage::{build, SsgError};
use tempfile::TempDir;

/// Minimal site with empty site.yaml, src/ and public/
fn site_root() -> TempDir {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("site.yaml"), "").unwrap();
    fs::create_dir(root.path().join("src")).unwrap();
    fs::create_dir(root.path().join("public")).unwrap();
    root
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn public_listing(root: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(root.join("public"))
        .unwrap()
        .map(|e| PathBuf::from(e.unwrap().file_name()))
        .collect();
    entries.sort();
    entries
}

fn read_public(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join("public").join(name)).unwrap()
}

#[test]
fn test_build_copies_unignored_files_in_src() {
    let site = site_root();
    let root = site.path();
    write(root, "site.yaml", "ignore: []");
    write(root, "src/index.html", "<p>Hello, world!</p>");

    build(root).unwrap();

    assert_eq!(public_listing(root), vec![PathBuf::from("index.html")]);
    assert_eq!(read_public(root, "index.html"), "<p>Hello, world!</p>");
}

#[test]
fn test_build_does_not_copy_ignored_paths() {
    let site = site_root();
    let root = site.path();
    write(root, "site.yaml", "ignore: ['bar.html', 'baz']");
    write(root, "src/foo.html", "<p>Foo</p>");
    write(root, "src/bar.html", "<p>Bar</p>");
    write(root, "src/baz/inner.txt", "inner");

    let report = build(root).unwrap();

    assert_eq!(public_listing(root), vec![PathBuf::from("foo.html")]);
    assert_eq!(report.pruned.len(), 2);
}

#[test]
fn test_build_clears_stale_output() {
    let site = site_root();
    let root = site.path();
    write(root, "public/old.html", "stale");
    write(root, "src/new.html", "fresh");

    build(root).unwrap();

    assert_eq!(public_listing(root), vec![PathBuf::from("new.html")]);
}

#[test]
fn test_build_generates_simple_targets() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
ignore: ["page.tmpl"]
targets:
  page.html:
    template: page.tmpl
"#,
    );
    write(root, "src/page.tmpl", "{{#if true}}yes{{/if}}");

    let report = build(root).unwrap();

    assert_eq!(report.generated, vec!["page.html"]);
    assert_eq!(public_listing(root), vec![PathBuf::from("page.html")]);
    assert_eq!(read_public(root, "page.html"), "yes");
}

#[test]
fn test_build_generates_targets_with_wildcards() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
ignore: ["post.html", "**/*.md"]
targets:
  "%.html":
    template: post.html
    with:
      content: "%.md"
"#,
    );
    write(root, "src/post.html", "{{ content }}");
    write(root, "src/foo.md", "Foo");
    write(root, "src/bar.md", "Bar");
    write(root, "src/baz.md", "Baz");

    let report = build(root).unwrap();

    assert_eq!(report.generated, vec!["bar.html", "baz.html", "foo.html"]);
    assert_eq!(
        public_listing(root),
        vec![
            PathBuf::from("bar.html"),
            PathBuf::from("baz.html"),
            PathBuf::from("foo.html"),
        ]
    );
    for (name, expected) in [("foo.html", "Foo"), ("bar.html", "Bar"), ("baz.html", "Baz")] {
        assert_eq!(read_public(root, name), expected);
    }
}

#[test]
fn test_build_wildcard_intersection() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
ignore: ["*.md", "*.yaml", "post.html"]
targets:
  "%.html":
    template: post.html
    context: "%.yaml"
    with:
      body: "%.md"
"#,
    );
    write(root, "src/post.html", "{{title}}: {{body}}");
    write(root, "src/foo.md", "Foo body");
    write(root, "src/bar.md", "Bar body");
    write(root, "src/bar.yaml", "title: Bar");
    write(root, "src/baz.yaml", "title: Baz");

    let report = build(root).unwrap();

    assert_eq!(report.generated, vec!["bar.html"]);
    assert_eq!(read_public(root, "bar.html"), "Bar: Bar body");
}

#[test]
fn test_build_wildcard_without_evidence_generates_nothing() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
targets:
  "%.html":
    template: post.html
    with:
      content: "%.md"
"#,
    );
    write(root, "src/post.html", "{{content}}");

    let report = build(root).unwrap();

    assert!(report.generated.is_empty());
    assert_eq!(public_listing(root), vec![PathBuf::from("post.html")]);
}

#[test]
fn test_build_uses_json_context() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
ignore: ["index.json"]
targets:
  index.html:
    template: index.html
    context: index.json
"#,
    );
    write(root, "src/index.html", "{{ message }}");
    write(root, "src/index.json", r#"{ "message": "Hello, world!" }"#);

    build(root).unwrap();

    assert_eq!(public_listing(root), vec![PathBuf::from("index.html")]);
    assert_eq!(read_public(root, "index.html"), "Hello, world!");
}

#[test]
fn test_build_uses_yaml_context() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
ignore: ["index.yaml"]
targets:
  index.html:
    template: index.html
    context: index.yaml
"#,
    );
    write(root, "src/index.html", "{{ message }}");
    write(root, "src/index.yaml", "message: Hello, world!\n");

    build(root).unwrap();

    assert_eq!(public_listing(root), vec![PathBuf::from("index.html")]);
    assert_eq!(read_public(root, "index.html"), "Hello, world!");
}

#[test]
fn test_build_template_from_templates_dir() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
targets:
  about.html:
    template: layout.html
    context: about.json
"#,
    );
    write(root, "templates/layout.html", "<h1>{{title}}</h1>");
    write(root, "src/about.json", r#"{"title": "About"}"#);

    build(root).unwrap();

    assert_eq!(read_public(root, "about.html"), "<h1>About</h1>");
    assert!(!root.join("public/layout.html").exists());
}

#[cfg(unix)]
#[test]
fn test_build_with_context_command() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
targets:
  index.html:
    template: index.html
    with:
      message: printf 'Hello, world!'
"#,
    );
    write(root, "src/index.html", "{{ message }}");

    build(root).unwrap();

    assert_eq!(public_listing(root), vec![PathBuf::from("index.html")]);
    assert_eq!(read_public(root, "index.html"), "Hello, world!");
}

#[cfg(unix)]
#[test]
fn test_build_with_out_file_command() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
ignore: ["page.html"]
targets:
  "%.txt":
    template: page.html
    with:
      body: "sh -c 'tr a-z A-Z < \"$0\" > \"$1\"' %.src $out"
"#,
    );
    write(root, "src/page.html", "{{body}}");
    write(root, "src/shout.src", "hello");

    let report = build(root).unwrap();

    assert_eq!(report.generated, vec!["shout.txt"]);
    assert_eq!(read_public(root, "shout.txt"), "HELLO");
}

#[test]
fn test_build_undecodable_context_fails() {
    let site = site_root();
    let root = site.path();
    write(
        root,
        "site.yaml",
        r#"
targets:
  index.html:
    template: index.html
    context: notes.txt
"#,
    );
    write(root, "src/index.html", "{{x}}");
    write(root, "src/notes.txt", "a: b: c");

    let err = build(root).unwrap_err();
    match err {
        SsgError::TargetFailed { target, source } => {
            assert_eq!(target, "index.html");
            assert!(matches!(*source, SsgError::ContextDecode { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
