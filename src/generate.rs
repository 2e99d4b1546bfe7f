//! HTML page generation.
//!
//! Every [`DirectoryNode`] becomes one `index.html` in the mirrored output
//! tree. Generation happens in two steps:
//!
//! 1. [`build_page_model`] turns a node into a [`PageModel`]: plain data with
//!    every link already resolved relative to the page's own directory.
//! 2. [`render_page`] turns the model into HTML with [maud](https://maud.lambda.xyz/).
//!
//! ## Output Structure
//!
//! ```text
//! html/
//! ├── index.html                 # page for the source root
//! ├── a.jpg.small.jpg            # thumbnails live next to their page
//! ├── a.jpg.large.jpg
//! ├── static/                    # synced assets (see `assets`)
//! └── sub/
//!     ├── index.html
//!     ├── b.jpg.small.jpg
//!     └── b.jpg.large.jpg
//! ```
//!
//! Pages are regenerated on every run. Rendering is deterministic, so an
//! unchanged tree produces byte-identical pages.

use crate::types::DirectoryNode;
use maud::{DOCTYPE, Markup, html};
use serde::Serialize;
use std::fs;
use std::ffi::OsStr;
use std::path::{Component, Path};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run-wide settings shared by every page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Shown before the directory path in every title.
    pub title_prefix: Option<String>,
    /// Absolute URL of the static assets. Replaces the relative path when set.
    pub static_url: Option<String>,
    /// Base URL of the published originals. Items link there when set.
    pub original_base: Option<String>,
}

/// Everything a template needs to render one directory page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageModel {
    /// Directory path relative to the source root, `/`-separated.
    pub rel_dir: String,
    /// `/` followed by `rel_dir`.
    pub title: String,
    pub title_prefix: Option<String>,
    /// Location of the static directory as seen from this page.
    pub static_path: String,
    pub original_base: Option<String>,
    pub fingerprint: String,
    /// Link to the parent page; `None` on the root page.
    pub parent: Option<String>,
    pub directories: Vec<PageLink>,
    pub items: Vec<PageItem>,
}

impl PageModel {
    /// Title as shown in the browser tab.
    pub fn full_title(&self) -> String {
        match &self.title_prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}: {}", prefix, self.title),
            _ => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub name: String,
    pub href: String,
}

/// One item as rendered on a page. All URLs are percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageItem {
    pub name: String,
    /// Path of the original, relative to the source root.
    pub source_rel: String,
    pub thumbnail_small: String,
    pub thumbnail_large: String,
    /// Where clicking the item goes: the original when a base URL is
    /// configured, the large thumbnail otherwise.
    pub href: String,
}

// ============================================================================
// Path helpers
// ============================================================================

/// Join the normal components of `path` with `/`.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encode one name from its raw bytes, so names that are not valid
/// UTF-8 still link to the file on disk.
fn encode_segment(segment: &OsStr) -> String {
    urlencoding::encode_binary(segment.as_encoded_bytes()).into_owned()
}

/// Percent-encode each segment of a relative path, joined with `/`.
fn encode_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(encode_segment(s)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative path from a page at `depth` to `<output>/static`.
fn relative_static(depth: usize) -> String {
    let mut path = "../".repeat(depth);
    path.push_str("static");
    path
}

fn file_name_url(path: &Path) -> String {
    path.file_name().map(encode_segment).unwrap_or_default()
}

// ============================================================================
// Model
// ============================================================================

/// Build the page model for one directory.
///
/// Pure: reads only the node and the context. Thumbnails sit in the same
/// output directory as the page, so their links are bare file names.
pub fn build_page_model(node: &DirectoryNode, ctx: &PageContext) -> PageModel {
    let rel_dir = slash_path(&node.rel_path);
    let depth = node.depth();

    let static_path = match &ctx.static_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => relative_static(depth),
    };
    let original_base = ctx
        .original_base
        .as_ref()
        .map(|base| base.trim_end_matches('/').to_string());

    let items = node
        .items
        .iter()
        .map(|item| {
            let source_rel = if rel_dir.is_empty() {
                item.name.clone()
            } else {
                format!("{}/{}", rel_dir, item.name)
            };
            let thumbnail_small = file_name_url(&item.thumbnail_small);
            let thumbnail_large = file_name_url(&item.thumbnail_large);
            let source_file = node
                .rel_path
                .join(item.source_path.file_name().unwrap_or_default());
            let href = match &original_base {
                Some(base) => format!("{}/{}", base, encode_path(&source_file)),
                None => thumbnail_large.clone(),
            };
            PageItem {
                name: item.name.clone(),
                source_rel,
                thumbnail_small,
                thumbnail_large,
                href,
            }
        })
        .collect();

    let directories = node
        .subdirs
        .iter()
        .zip(&node.children)
        .map(|(name, child)| PageLink {
            name: name.clone(),
            href: format!("{}/index.html", file_name_url(&child.rel_path)),
        })
        .collect();

    PageModel {
        title: format!("/{}", rel_dir),
        rel_dir,
        title_prefix: ctx.title_prefix.clone(),
        static_path,
        original_base,
        fingerprint: node.content_fingerprint.clone(),
        parent: (depth > 0).then(|| "../index.html".to_string()),
        directories,
        items,
    }
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(model: &PageModel, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="gallery-fingerprint" content=(model.fingerprint);
                title { (model.full_title()) }
                link rel="stylesheet" href={ (model.static_path) "/style.css" };
            }
            body {
                (content)
            }
        }
    }
}

fn page_header(model: &PageModel) -> Markup {
    html! {
        header.page-header {
            @if let Some(prefix) = &model.title_prefix {
                span.site-title { (prefix) }
            }
            h1 { (model.title) }
        }
    }
}

fn directory_nav(model: &PageModel) -> Markup {
    html! {
        @if model.parent.is_some() || !model.directories.is_empty() {
            nav.directories {
                ul {
                    @if let Some(parent) = &model.parent {
                        li.parent { a href=(parent) { ".." } }
                    }
                    @for dir in &model.directories {
                        li { a href=(dir.href) { (dir.name) "/" } }
                    }
                }
            }
        }
    }
}

fn item_grid(model: &PageModel) -> Markup {
    html! {
        @if !model.items.is_empty() {
            div.item-grid {
                @for item in &model.items {
                    figure.item {
                        a href=(item.href) data-large=(item.thumbnail_large) {
                            img src=(item.thumbnail_small) alt=(item.name) loading="lazy";
                        }
                        figcaption { (item.name) }
                    }
                }
            }
        }
    }
}

/// Render a page model to HTML.
pub fn render_page(model: &PageModel) -> Markup {
    let content = html! {
        (page_header(model))
        main.gallery-page {
            (directory_nav(model))
            (item_grid(model))
        }
    };
    base_document(model, content)
}

// ============================================================================
// Writing
// ============================================================================

/// Render and write the page of every node under `root`.
///
/// Children are written before their parent. Returns the number of pages
/// written.
pub fn write_pages(
    root: &DirectoryNode,
    output_root: &Path,
    ctx: &PageContext,
) -> Result<usize, GenerateError> {
    let mut written = 0;
    for child in &root.children {
        written += write_pages(child, output_root, ctx)?;
    }

    let page_dir = output_root.join(&root.rel_path);
    fs::create_dir_all(&page_dir)?;
    let model = build_page_model(root, ctx);
    let page_path = page_dir.join("index.html");
    fs::write(&page_path, render_page(&model).into_string())?;
    debug!(page = %page_path.display(), items = model.items.len(), "page written");

    Ok(written + 1)
}

/// Write the directory tree as pretty-printed JSON.
pub fn write_manifest(root: &DirectoryNode, path: &Path) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(root)?;
    fs::write(path, json)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GalleryItem;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn item(out_dir: &str, name: &str) -> GalleryItem {
        let out = PathBuf::from("/out").join(out_dir);
        GalleryItem {
            name: name.to_string(),
            source_path: PathBuf::from("/src").join(out_dir).join(name),
            thumbnail_small: out.join(format!("{name}.small.jpg")),
            thumbnail_large: out.join(format!("{name}.large.jpg")),
        }
    }

    fn node(rel: &str, items: &[&str], children: Vec<DirectoryNode>) -> DirectoryNode {
        DirectoryNode {
            source_path: PathBuf::from("/src").join(rel),
            rel_path: PathBuf::from(rel),
            items: items.iter().map(|n| item(rel, n)).collect(),
            subdirs: children
                .iter()
                .map(|c| c.rel_path.file_name().unwrap().to_string_lossy().into_owned())
                .collect(),
            children,
            content_fingerprint: "0123456789abcdef".to_string(),
        }
    }

    // =========================================================================
    // Model
    // =========================================================================

    #[test]
    fn root_model_basics() {
        let tree = node("", &["a.jpg"], vec![node("sub", &["b.jpg"], vec![])]);
        let model = build_page_model(&tree, &PageContext::default());

        assert_eq!(model.rel_dir, "");
        assert_eq!(model.title, "/");
        assert_eq!(model.static_path, "static");
        assert_eq!(model.parent, None);
        assert_eq!(model.fingerprint, "0123456789abcdef");
        assert_eq!(
            model.directories,
            vec![PageLink {
                name: "sub".into(),
                href: "sub/index.html".into()
            }]
        );
    }

    #[test]
    fn nested_model_paths() {
        let sub = node("a/b", &["c.jpg"], vec![]);
        let model = build_page_model(&sub, &PageContext::default());

        assert_eq!(model.title, "/a/b");
        assert_eq!(model.static_path, "../../static");
        assert_eq!(model.parent.as_deref(), Some("../index.html"));

        let item = &model.items[0];
        assert_eq!(item.name, "c.jpg");
        assert_eq!(item.source_rel, "a/b/c.jpg");
        assert_eq!(item.thumbnail_small, "c.jpg.small.jpg");
        assert_eq!(item.thumbnail_large, "c.jpg.large.jpg");
        assert_eq!(item.href, "c.jpg.large.jpg");
    }

    #[test]
    fn static_url_override() {
        let ctx = PageContext {
            static_url: Some("https://cdn.example.com/static/".into()),
            ..Default::default()
        };
        let model = build_page_model(&node("deep/er", &[], vec![]), &ctx);
        assert_eq!(model.static_path, "https://cdn.example.com/static");
    }

    #[test]
    fn original_base_links_items_to_originals() {
        let ctx = PageContext {
            original_base: Some("https://example.com/photos/".into()),
            ..Default::default()
        };
        let model = build_page_model(&node("2024 trip", &["day 1.jpg"], vec![]), &ctx);
        assert_eq!(model.original_base.as_deref(), Some("https://example.com/photos"));
        assert_eq!(
            model.items[0].href,
            "https://example.com/photos/2024%20trip/day%201.jpg"
        );
    }

    #[test]
    fn names_are_percent_encoded_in_urls() {
        let tree = node("", &["50% #1.jpg"], vec![node("a b", &[], vec![])]);
        let model = build_page_model(&tree, &PageContext::default());
        assert_eq!(model.items[0].thumbnail_small, "50%25%20%231.jpg.small.jpg");
        assert_eq!(model.items[0].name, "50% #1.jpg");
        assert_eq!(model.directories[0].href, "a%20b/index.html");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_link_to_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xe9.jpg");
        let mut tree = node("", &[], vec![node("sub", &[], vec![])]);
        tree.items.push(GalleryItem {
            name: raw.to_string_lossy().into_owned(),
            source_path: Path::new("/src").join(raw),
            thumbnail_small: Path::new("/out").join(OsStr::from_bytes(b"caf\xe9.jpg.small.jpg")),
            thumbnail_large: Path::new("/out").join(OsStr::from_bytes(b"caf\xe9.jpg.large.jpg")),
        });
        tree.children[0].rel_path = PathBuf::from(OsStr::from_bytes(b"d\xe9j\xe0"));

        let ctx = PageContext {
            original_base: Some("https://example.com".into()),
            ..Default::default()
        };
        let model = build_page_model(&tree, &ctx);
        assert_eq!(model.items[0].name, "caf\u{FFFD}.jpg");
        assert_eq!(model.items[0].thumbnail_small, "caf%E9.jpg.small.jpg");
        assert_eq!(model.items[0].href, "https://example.com/caf%E9.jpg");
        assert_eq!(model.directories[0].href, "d%E9j%E0/index.html");
    }

    #[test]
    fn full_title_with_prefix() {
        let ctx = PageContext {
            title_prefix: Some("Holidays".into()),
            ..Default::default()
        };
        let model = build_page_model(&node("sub", &[], vec![]), &ctx);
        assert_eq!(model.full_title(), "Holidays: /sub");

        let bare = build_page_model(&node("sub", &[], vec![]), &PageContext::default());
        assert_eq!(bare.full_title(), "/sub");
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn render_includes_doctype_and_stylesheet() {
        let model = build_page_model(&node("sub", &[], vec![]), &PageContext::default());
        let html = render_page(&model).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"href="../static/style.css""#));
        assert!(html.contains("<title>/sub</title>"));
    }

    #[test]
    fn render_lists_items_and_directories() {
        let tree = node("", &["a.jpg"], vec![node("sub", &[], vec![])]);
        let html = render_page(&build_page_model(&tree, &PageContext::default())).into_string();
        assert!(html.contains(r#"src="a.jpg.small.jpg""#));
        assert!(html.contains(r#"data-large="a.jpg.large.jpg""#));
        assert!(html.contains(r#"href="sub/index.html""#));
        assert!(!html.contains(r#"href="../index.html""#));
    }

    #[test]
    fn render_empty_directory() {
        let html =
            render_page(&build_page_model(&node("empty", &[], vec![]), &PageContext::default()))
                .into_string();
        assert!(!html.contains("item-grid"));
        assert!(html.contains(r#"href="../index.html""#));
    }

    #[test]
    fn html_escape_in_maud() {
        let tree = node("", &["<script>.jpg"], vec![]);
        let html = render_page(&build_page_model(&tree, &PageContext::default())).into_string();
        assert!(!html.contains("<script>.jpg"));
        assert!(html.contains("&lt;script&gt;.jpg"));
    }

    #[test]
    fn render_is_deterministic() {
        let tree = node("", &["a.jpg", "b.jpg"], vec![node("x", &[], vec![])]);
        let ctx = PageContext::default();
        let a = render_page(&build_page_model(&tree, &ctx)).into_string();
        let b = render_page(&build_page_model(&tree, &ctx)).into_string();
        assert_eq!(a, b);
    }

    // =========================================================================
    // Writing
    // =========================================================================

    #[test]
    fn write_pages_creates_one_page_per_directory() {
        let tmp = TempDir::new().unwrap();
        let tree = node(
            "",
            &["a.jpg"],
            vec![node("sub", &["b.jpg"], vec![node("sub/deeper", &[], vec![])])],
        );

        let written = write_pages(&tree, tmp.path(), &PageContext::default()).unwrap();
        assert_eq!(written, 3);
        assert!(tmp.path().join("index.html").is_file());
        assert!(tmp.path().join("sub/index.html").is_file());
        assert!(tmp.path().join("sub/deeper/index.html").is_file());
    }

    #[test]
    fn write_manifest_serializes_tree() {
        let tmp = TempDir::new().unwrap();
        let tree = node("", &["a.jpg"], vec![node("sub", &[], vec![])]);
        let path = tmp.path().join("meta/tree.json");

        write_manifest(&tree, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["items"][0]["name"], "a.jpg");
        assert_eq!(value["subdirs"][0], "sub");
        assert_eq!(value["content_fingerprint"], "0123456789abcdef");
    }
}
