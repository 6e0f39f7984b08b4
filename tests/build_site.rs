//! End-to-end pipeline test: scan `fixtures/content`, generate into a temp
//! directory, and check the site a visitor would get.

use folio::disclosure::DisclosureState;
use folio::generate::generate_site;
use folio::routes::{disclosure_path, state_from_path};
use folio::scan::{Manifest, scan};
use folio::types::RouteKind;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

/// Build once, share across tests.
fn site() -> &'static (Manifest, TempDir) {
    static SITE: OnceLock<(Manifest, TempDir)> = OnceLock::new();
    SITE.get_or_init(|| {
        let manifest = scan(&fixtures()).expect("fixture scan failed");
        let out = TempDir::new().unwrap();
        generate_site(&manifest, &fixtures(), out.path()).expect("generate failed");
        (manifest, out)
    })
}

fn read(relative: &str) -> String {
    let path = site().1.path().join(relative);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("missing {}: {e}", path.display()))
}

/// Every `href` in a page that points inside the site.
fn internal_links(html: &str) -> Vec<String> {
    html.split("href=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .filter(|href| href.starts_with('/') && !href.starts_with("//"))
        .map(|href| href.split('?').next().unwrap_or(href).to_string())
        .collect()
}

fn exists_in_site(root: &Path, href: &str) -> bool {
    let relative = href.trim_start_matches('/');
    let path = root.join(relative);
    if href.ends_with('/') {
        path.join("index.html").exists()
    } else {
        path.exists()
    }
}

#[test]
fn fixture_content_is_clean() {
    let (manifest, _) = site();
    assert!(
        manifest.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        manifest.diagnostics
    );
}

#[test]
fn every_route_has_a_file() {
    let (manifest, out) = site();
    for route in &manifest.routes {
        let file = out.path().join(route.output_file());
        assert!(file.exists(), "{} → {} missing", route.path, file.display());
    }
}

#[test]
fn snapshot_urls_round_trip_to_their_state() {
    let (manifest, _) = site();
    for route in &manifest.routes {
        if let RouteKind::Disclosure { state } = &route.kind {
            assert_eq!(disclosure_path(state), route.path);
            assert_eq!(state_from_path(&route.path).as_ref(), Some(state));
        }
    }
}

#[test]
fn internal_links_resolve() {
    let (manifest, out) = site();
    for route in &manifest.routes {
        let html = read(route.output_file().to_str().unwrap());
        for href in internal_links(&html) {
            if href.starts_with("/assets/") {
                continue;
            }
            assert!(
                exists_in_site(out.path(), &href),
                "{} links to missing {}",
                route.path,
                href
            );
        }
    }
}

#[test]
fn triggers_link_to_toggled_state() {
    let html = read("bio/bio-section-1/personal-interests/index.html");
    // Open nested trigger closes back to its parent.
    assert!(html.contains(r#"href="/bio/bio-section-1/""#));
    // Unopened nested trigger opens one level deeper.
    assert!(html.contains(r#"href="/bio/bio-section-1/personal-interests/photography/""#));
    // The open root collapses everything.
    assert!(html.contains(r#"href="/" aria-pressed="true""#));
}

#[test]
fn only_the_deepest_level_replays() {
    let html = read("bio/bio-section-1/personal-interests/index.html");
    assert_eq!(html.matches("data-typewriter").count(), 1);
    let tagged = html.split("data-typewriter").nth(1).unwrap();
    assert!(tagged.trim_start_matches(['>', ' ']).starts_with("I draw most"));
}

#[test]
fn collapsed_index_has_no_open_levels() {
    let html = read("index.html");
    assert!(!html.contains(r#"class="nested-content"#));
    assert!(!html.contains("data-dismiss-href"));
    let empty = DisclosureState::new();
    assert_eq!(disclosure_path(&empty), "/");
}

#[test]
fn content_pages_render_blocks() {
    let html = read("modernism-photography/index.html");
    assert!(html.contains("section-header"));
    assert!(html.contains("inline-image--magnifier"));
    assert!(html.contains("prefers-color-scheme: dark"));
    assert!(html.contains("image-stack"));
    assert!(html.contains("image-spread-grid"));
    assert!(html.contains("<video"));

    let essay = read("productivity-ai/index.html");
    assert!(essay.contains("portfolio-quote"));
    assert!(essay.contains("<cite>"));
    assert!(essay.contains("framed-text"));
    assert!(essay.contains("markdown-block"));
}

#[test]
fn not_found_page_exists() {
    let html = read("404.html");
    assert!(html.contains("Page not found"));
    assert!(html.contains(r#"href="/""#));
}
