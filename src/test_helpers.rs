//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup, parsed sample content, and lookup helpers that
//! work with scan-phase data structures (`Manifest`, `Route`, `PageConfig`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let page = find_page(&manifest, "local-minima");
//! assert_eq!(page.title, "Local Minima");
//! find_route(&manifest, "/bio/bio-section-1/");
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

use crate::content::PortfolioContent;
use crate::gallery::GalleryRegistry;
use crate::pages::{PageConfig, PageRegistry};
use crate::scan::Manifest;
use crate::types::Route;

const PORTFOLIO_TOML: &str = include_str!("../fixtures/content/portfolio.toml");
const GALLERIES_TOML: &str = include_str!("../fixtures/content/galleries.toml");

fn fixtures_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/content"))
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir_recursive(fixtures_dir(), tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Append raw text to a fixture file.
pub fn append(path: &Path, text: &str) {
    let mut file = fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

/// Write a solid-colour PNG, creating parent directories.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .save(path)
        .unwrap();
}

// =========================================================================
// Parsed fixtures
// =========================================================================

pub fn sample_portfolio() -> PortfolioContent {
    PortfolioContent::from_toml_str(PORTFOLIO_TOML, "portfolio.toml").unwrap()
}

pub fn sample_galleries() -> GalleryRegistry {
    GalleryRegistry::from_toml_str(GALLERIES_TOML, "galleries.toml").unwrap()
}

pub fn sample_pages() -> PageRegistry {
    PageRegistry::load(fixtures_dir()).unwrap()
}

// =========================================================================
// Manifest lookups (panic with the available choices on miss)
// =========================================================================

/// Find a route by URL path. Panics if not found.
pub fn find_route<'a>(manifest: &'a Manifest, path: &str) -> &'a Route {
    manifest
        .routes
        .iter()
        .find(|r| r.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = manifest.routes.iter().map(|r| r.path.as_str()).collect();
            panic!("route '{path}' not found. Available: {paths:?}")
        })
}

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a PageConfig {
    manifest.pages.get(slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
        panic!("page '{slug}' not found. Available: {slugs:?}")
    })
}

/// Read a generated file relative to the output root. Panics if missing.
pub fn read_output(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("could not read generated {relative}: {e}"))
}
