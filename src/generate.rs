//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and writes the
//! final static site.
//!
//! ## Generated Pages
//!
//! - **Homepage** (`/index.html`): profile, bio sentences, history, awards,
//!   personal projects, contact
//! - **Disclosure snapshots** (`/bio/{k0}/{k1}/index.html`): the homepage with
//!   one disclosure state applied, one file per reachable state
//! - **Content pages** (`/{slug}/index.html`): long-form writing and
//!   photography pages built from typed blocks
//! - **Not found** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── style.css                  # Base styles with config colors injected
//! ├── typewriter.js              # Reveal replay, Escape / background dismiss
//! ├── bio/
//! │   └── bio-section-1/
//! │       ├── index.html
//! │       └── personal-interests/
//! │           └── index.html
//! ├── local-minima/
//! │   └── index.html
//! └── assets/                    # Copied from the content root
//! ```
//!
//! ## Snapshots instead of client state
//!
//! Every trigger is a plain link to the snapshot of the state it would
//! produce, so the widget works without JavaScript and every state has a
//! shareable URL. Snapshot bodies carry `data-dismiss-href` (the collapsed
//! homepage); `typewriter.js` follows it on Escape or a background click and
//! replays the reveal of the deepest open level.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, SiteConfig};
use crate::content::{BioSection, ContentLevels, HyperlinkTable, PortfolioContent, Segment};
use crate::dimensions::DimensionCache;
use crate::disclosure::DisclosureState;
use crate::pages::{PageConfig, render_blocks};
use crate::routes::{disclosure_path, page_path};
use crate::scan::Manifest;
use crate::typewriter::{DisclosureView, Progress, render_node};
use crate::types::{Route, RouteKind};
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset copy failed: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/typewriter.js");

/// What a generate run wrote.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub snapshots: usize,
    pub content_pages: usize,
    pub other_pages: usize,
    pub assets_copied: usize,
    pub images_measured: usize,
    pub asset_version: String,
}

impl GenerateReport {
    pub fn html_files(&self) -> usize {
        self.snapshots + self.content_pages + self.other_pages
    }
}

/// Shared inputs for every page renderer.
struct SiteContext<'a> {
    config: &'a SiteConfig,
    manifest: &'a Manifest,
    levels: ContentLevels,
    links: HyperlinkTable,
    dims: DimensionCache,
    year: i32,
    asset_version: String,
}

/// Read a manifest written by `scan`.
pub fn load_manifest(manifest_path: &Path) -> Result<Manifest, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    Ok(serde_json::from_str(&manifest_content)?)
}

pub fn generate_site(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;

    // Generate CSS with colors and theme from config
    let css = format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme, &config.typewriter),
        CSS_STATIC
    );
    let asset_version = asset_version(&css, JS);

    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join("style.css"), &css)?;
    fs::write(output_dir.join("typewriter.js"), JS)?;

    let assets_copied = copy_assets(
        &source_dir.join(&config.assets_dir),
        &output_dir.join("assets"),
    )?;

    let dims = DimensionCache::new(source_dir);
    let sources: Vec<&str> = manifest
        .pages
        .iter()
        .flat_map(|page| page.image_sources())
        .collect();
    let images_measured = dims.preload(&sources);
    debug!(images = sources.len(), measured = images_measured, "preloaded image dimensions");

    let ctx = SiteContext {
        config,
        manifest,
        levels: manifest.portfolio.levels(),
        links: manifest.portfolio.hyperlinks(),
        dims,
        year: chrono::Local::now().year(),
        asset_version: asset_version.clone(),
    };

    let mut report = GenerateReport {
        output: output_dir.to_path_buf(),
        assets_copied,
        images_measured,
        asset_version,
        ..Default::default()
    };

    for route in &manifest.routes {
        let markup = render_route(&ctx, route);
        let file = output_dir.join(route.output_file());
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, markup.into_string())?;
        debug!(path = %route.path, "wrote {}", route.label());
        match route.kind {
            RouteKind::Disclosure { .. } => report.snapshots += 1,
            RouteKind::Page { .. } => report.content_pages += 1,
            RouteKind::Index | RouteKind::NotFound => report.other_pages += 1,
        }
    }

    info!(
        files = report.html_files(),
        snapshots = report.snapshots,
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

fn render_route(ctx: &SiteContext<'_>, route: &Route) -> Markup {
    match &route.kind {
        RouteKind::Index => render_portfolio(ctx, &DisclosureState::new()),
        RouteKind::Disclosure { state } => render_portfolio(ctx, state),
        RouteKind::Page { slug } => match ctx.manifest.pages.get(slug) {
            Some(page) => render_content_page(ctx, page),
            None => render_not_found(ctx),
        },
        RouteKind::NotFound => render_not_found(ctx),
    }
}

/// Short content hash appended to stylesheet and script URLs.
fn asset_version(css: &str, js: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(css.as_bytes());
    hasher.update(js.as_bytes());
    hasher
        .finalize()
        .iter()
        .take(5)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Copy the assets directory verbatim, skipping dotfiles. Returns the number
/// of files copied.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    let entries = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));
    for entry in entries {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

struct PageHead<'a> {
    title: String,
    description: Option<&'a str>,
    path: String,
    og_type: &'static str,
}

/// Renders the base HTML document structure
fn base_document(
    ctx: &SiteContext<'_>,
    head: &PageHead<'_>,
    dismiss_href: Option<&str>,
    content: Markup,
) -> Markup {
    let site = &ctx.config.site;
    let url = site.canonical_url(&head.path);
    html! {
        (DOCTYPE)
        html lang=(site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (head.title) }
                @if let Some(description) = head.description {
                    meta name="description" content=(description);
                    meta property="og:description" content=(description);
                    meta name="twitter:description" content=(description);
                }
                meta property="og:title" content=(head.title);
                meta property="og:type" content=(head.og_type);
                meta property="og:url" content=(url);
                meta property="og:site_name" content=(site.name);
                meta name="twitter:card" content="summary";
                meta name="twitter:title" content=(head.title);
                meta name="robots" content="index, follow";
                link rel="canonical" href=(url);
                link rel="stylesheet" href={ "/style.css?v=" (ctx.asset_version) };
                script src={ "/typewriter.js?v=" (ctx.asset_version) } defer {}
            }
            body data-dismiss-href=[dismiss_href] {
                (content)
            }
        }
    }
}

fn multiline(text: &str) -> Markup {
    html! {
        @for (i, line) in text.lines().enumerate() {
            @if i > 0 { br; }
            (line)
        }
    }
}

// ============================================================================
// Portfolio (homepage and snapshots)
// ============================================================================

fn render_portfolio(ctx: &SiteContext<'_>, state: &DisclosureState) -> Markup {
    let portfolio = &ctx.manifest.portfolio;
    let dimmed = state.has_any_active();
    let view = DisclosureView {
        levels: &ctx.levels,
        galleries: &ctx.manifest.galleries,
        links: &ctx.links,
        state,
        progress: Progress::Settled,
    };

    let content = html! {
        main.portfolio {
            header.profile {
                h1.portfolio-text { (portfolio.profile.name) }
                p.portfolio-text.portfolio-text--muted { (portfolio.profile.title) }
            }
            section.bio aria-label="Bio" {
                @for section in &portfolio.bio {
                    (render_bio_section(ctx, &view, section))
                }
            }
            div class=(if dimmed { "dimmable dimmable--dimmed" } else { "dimmable" })
                aria-hidden=[dimmed.then_some("true")] {
                (render_history(portfolio))
                (render_awards(portfolio))
                (render_side_projects(ctx, dimmed))
                (render_contact(portfolio, dimmed))
                @if !portfolio.profile.tagline.is_empty() {
                    footer.tagline {
                        p.portfolio-text.portfolio-text--muted { (multiline(&portfolio.profile.tagline)) }
                    }
                }
            }
        }
    };

    let path = disclosure_path(state);
    let description = format!("{}, {}", portfolio.profile.name, portfolio.profile.title);
    let head = PageHead {
        title: ctx.config.site.name.clone(),
        description: Some(description.as_str()),
        path,
        og_type: "website",
    };
    let dismiss = dimmed.then_some("/");
    base_document(ctx, &head, dismiss, content)
}

/// One bio sentence plus, when open, its disclosure subtree.
fn render_bio_section(
    ctx: &SiteContext<'_>,
    view: &DisclosureView<'_>,
    section: &BioSection,
) -> Markup {
    let state = view.state;
    let open_root = state.active_at(0);
    let is_open = open_root == Some(section.id.as_str());
    let other_open = open_root.is_some() && !is_open;
    let class = match (is_open, other_open) {
        (true, _) => "bio-section bio-section--active",
        (false, true) => "bio-section bio-section--inactive",
        (false, false) => "bio-section",
    };

    html! {
        div class=(class) {
            p.portfolio-text {
                @for segment in &section.sentence {
                    @match segment {
                        Segment::Text { text } => (text),
                        Segment::Trigger { trigger_id, text } => {
                            (render_root_trigger(state, trigger_id, text))
                        },
                        Segment::Link { link_id, text } => {
                            (render_link(ctx.links.get(link_id), text, other_open))
                        },
                    }
                }
            }
            @if is_open {
                (render_node(view, 0, &section.id))
            }
        }
    }
}

fn render_root_trigger(state: &DisclosureState, key: &str, text: &str) -> Markup {
    let active = state.is_active(0, key);
    let disabled = state.has_any_active() && !active;
    let controls = format!("nested-content-0-{key}");
    html! {
        @if disabled {
            span.portfolio-trigger.portfolio-trigger--disabled aria-disabled="true"
                aria-controls=(controls) {
                (text)
            }
        } @else {
            a class=(if active { "portfolio-trigger portfolio-trigger--active" } else { "portfolio-trigger" })
                role="button" href=(disclosure_path(&state.toggled(0, key)))
                aria-pressed=(if active { "true" } else { "false" })
                aria-controls=(controls) data-depth="0" data-key=(key) {
                (text)
            }
        }
    }
}

/// External link; dimmed links stay visible but leave the tab order.
fn render_link(url: Option<&str>, text: &str, disabled: bool) -> Markup {
    html! {
        @match url {
            Some(url) if disabled => {
                a.portfolio-link.portfolio-link--disabled href=(url) tabindex="-1" aria-disabled="true" { (text) }
            },
            Some(url) => {
                a.portfolio-link href=(url) target="_blank" rel="noopener noreferrer" { (text) }
            },
            None => (text),
        }
    }
}

fn section_header(title: &str) -> Markup {
    html! {
        div.section-list-header {
            p.portfolio-text.portfolio-text--muted { (title) }
        }
    }
}

fn render_history(portfolio: &PortfolioContent) -> Markup {
    let section = &portfolio.work_history;
    html! {
        @if !section.items.is_empty() {
            section.section-list.history {
                (section_header(&section.section_title))
                @for item in &section.items {
                    div.section-list-row {
                        p.portfolio-text.section-list-left {
                            (item.company) span.portfolio-text--muted { " " (item.role) }
                        }
                        p.portfolio-text.portfolio-text--muted.section-list-right { (item.period) }
                    }
                }
            }
        }
    }
}

fn render_awards(portfolio: &PortfolioContent) -> Markup {
    let section = &portfolio.awards;
    html! {
        @if !section.items.is_empty() {
            section.section-list.awards {
                (section_header(&section.section_title))
                @for item in &section.items {
                    div.section-list-row {
                        p.portfolio-text.section-list-left { (item.title) }
                        p.portfolio-text.portfolio-text--muted.section-list-right { (item.year) }
                    }
                }
            }
        }
    }
}

fn render_side_projects(ctx: &SiteContext<'_>, disabled: bool) -> Markup {
    let section = &ctx.manifest.portfolio.side_projects;
    html! {
        @if !section.items.is_empty() {
            section.section-list.side-projects {
                (section_header(&section.section_title))
                @for item in &section.items {
                    @let page = ctx.manifest.pages.get(&item.key);
                    @let title = if !item.label.is_empty() {
                        item.label.clone()
                    } else {
                        page.map(|p| p.title.clone()).unwrap_or_else(|| item.key.clone())
                    };
                    @let meta = if item.is_wip() {
                        "WIP".to_string()
                    } else {
                        page.map(PageConfig::meta_label).unwrap_or_default()
                    };
                    @let wip_class = if item.is_wip() { " project--wip" } else { "" };
                    @let link_class = format!(
                        "portfolio-link project-link{wip_class}{}",
                        if disabled { " portfolio-link--disabled" } else { "" }
                    );
                    div.section-list-row {
                        p.portfolio-text.section-list-left {
                            @if item.is_clickable {
                                a class=(link_class)
                                    href=(page_path(&item.key))
                                    tabindex=[disabled.then_some("-1")]
                                    aria-disabled=[disabled.then_some("true")] {
                                    (title)
                                    @if !item.is_wip() {
                                        span.arrow aria-hidden="true" { "→" }
                                    }
                                }
                            } @else {
                                span class={ "project" (wip_class) } { (title) }
                            }
                        }
                        p.portfolio-text.portfolio-text--muted.section-list-right { (meta) }
                    }
                }
            }
        }
    }
}

fn render_contact(portfolio: &PortfolioContent, disabled: bool) -> Markup {
    let section = &portfolio.contact;
    html! {
        @if !section.items.is_empty() {
            section.section-list.contact {
                (section_header(&section.section_title))
                @for item in &section.items {
                    div.section-list-row {
                        p.portfolio-text.section-list-left { (item.platform) }
                        p.portfolio-text.section-list-right {
                            (render_link(Some(item.url.as_str()), &item.handle, disabled))
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Content pages
// ============================================================================

fn render_content_page(ctx: &SiteContext<'_>, page: &PageConfig) -> Markup {
    let subtitle = match &page.subtitle {
        Some(subtitle) => format!("{subtitle}, {}", ctx.year),
        None => ctx.year.to_string(),
    };
    let class = if page.full_width {
        "content-page content-page--full-width"
    } else {
        "content-page"
    };

    let content = html! {
        main class=(class) data-page-type=(page.page_type.to_string()) {
            nav.back-nav {
                a.back-link href="/" { span aria-hidden="true" { "← " } "Index" }
            }
            header.content-header {
                h1.portfolio-text { (page.title) }
                p.portfolio-text.portfolio-text--muted { (subtitle) }
            }
            article {
                (render_blocks(&page.blocks, page.page_type, &ctx.dims))
            }
        }
    };

    let head = PageHead {
        title: format!("{} | {}", page.title, ctx.config.site.name),
        description: page.description.as_deref(),
        path: page_path(&page.slug),
        og_type: "article",
    };
    base_document(ctx, &head, None, content)
}

fn render_not_found(ctx: &SiteContext<'_>) -> Markup {
    let content = html! {
        main.error-page {
            h1.portfolio-text { "Page not found" }
            p.portfolio-text.portfolio-text--muted {
                "The page you're looking for doesn't exist."
            }
            a.back-link href="/" { "← Back to index" }
        }
    };
    let head = PageHead {
        title: format!("Page not found | {}", ctx.config.site.name),
        description: None,
        path: "/404.html".to_string(),
        og_type: "website",
    };
    base_document(ctx, &head, None, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn build() -> (TempDir, TempDir, GenerateReport) {
        let source = setup_fixtures();
        let out = TempDir::new().unwrap();
        let manifest = scan(source.path()).unwrap();
        let report = generate_site(&manifest, source.path(), out.path()).unwrap();
        (source, out, report)
    }

    fn context(manifest: &Manifest) -> SiteContext<'_> {
        SiteContext {
            config: &manifest.config,
            manifest,
            levels: manifest.portfolio.levels(),
            links: manifest.portfolio.hyperlinks(),
            dims: DimensionCache::new("/nonexistent"),
            year: 2025,
            asset_version: "abc".into(),
        }
    }

    #[test]
    fn writes_every_route() {
        let (_src, out, report) = build();
        assert_eq!(report.snapshots, 5);
        assert_eq!(report.content_pages, 3);
        assert_eq!(report.other_pages, 2);
        for file in [
            "index.html",
            "404.html",
            "style.css",
            "typewriter.js",
            "bio/bio-section-1/index.html",
            "bio/bio-section-1/personal-interests/photography/index.html",
            "local-minima/index.html",
        ] {
            assert!(out.path().join(file).exists(), "missing {file}");
        }
    }

    #[test]
    fn homepage_is_collapsed() {
        let (_src, out, _) = build();
        let html = read_output(out.path(), "index.html");
        assert!(html.contains("Jason Kim"));
        assert!(html.contains(r#"href="/bio/bio-section-1/""#));
        assert!(!html.contains(r#"id="nested-content-0-bio-section-1""#));
        assert!(!html.contains("data-dismiss-href"));
        assert!(!html.contains("dimmable--dimmed"));
    }

    #[test]
    fn snapshot_dims_other_sections() {
        let (_src, out, _) = build();
        let html = read_output(out.path(), "bio/bio-section-1/index.html");
        assert!(html.contains(r#"data-dismiss-href="/""#));
        assert!(html.contains("dimmable--dimmed"));
        assert!(html.contains("portfolio-trigger--active"));
        assert!(html.contains("portfolio-trigger--disabled"));
        assert!(html.contains("portfolio-link--disabled"));
        assert!(html.contains("Just north of Prospect Park"));
        // Clicking the open root collapses back home.
        assert!(html.contains(r#"aria-pressed="true""#));
    }

    #[test]
    fn deepest_snapshot_shows_gallery() {
        let (_src, out, _) = build();
        let html = read_output(
            out.path(),
            "bio/bio-section-1/personal-interests/photography/index.html",
        );
        assert!(html.contains("modular-gallery-container"));
        assert!(html.contains("I draw most of my inspiration"));
    }

    #[test]
    fn side_projects_follow_status_rules() {
        let manifest = scan(setup_fixtures().path()).unwrap();
        let ctx = context(&manifest);
        let html = render_side_projects(&ctx, false).into_string();
        assert!(html.contains(r#"href="/local-minima/""#));
        assert!(html.contains("project--wip"));
        assert!(html.contains(">WIP<"));
        assert!(html.contains(">Photography<"));
        assert_eq!(html.matches("→").count(), 2);
    }

    #[test]
    fn content_page_head_and_subtitle() {
        let manifest = scan(setup_fixtures().path()).unwrap();
        let ctx = context(&manifest);
        let page = find_page(&manifest, "local-minima");
        let html = render_content_page(&ctx, page).into_string();
        assert!(html.contains("<title>Local Minima | Jason Kim</title>"));
        assert!(html.contains("Photography, 2025"));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/local-minima/">"#));
        assert!(html.contains(r#"content="index, follow""#));
        assert!(html.contains(r#"property="og:type" content="article""#));
        assert!(html.contains("Index"));
    }

    #[test]
    fn not_found_page_links_home() {
        let manifest = scan(setup_fixtures().path()).unwrap();
        let html = render_not_found(&context(&manifest)).into_string();
        assert!(html.contains("Page not found"));
        assert!(html.contains("← Back to index"));
    }

    #[test]
    fn tagline_keeps_line_breaks() {
        let (_src, out, _) = build();
        let html = read_output(out.path(), "index.html");
        assert!(html.contains("Building thoughtful products,<br>one honest conversation at a time."));
    }

    #[test]
    fn assets_are_copied_without_dotfiles() {
        let source = setup_fixtures();
        write_test_png(&source.path().join("assets/local-minima/01.webp.png"), 3, 3);
        let out = TempDir::new().unwrap();
        let manifest = scan(source.path()).unwrap();
        let report = generate_site(&manifest, source.path(), out.path()).unwrap();
        assert_eq!(report.assets_copied, 1);
        assert!(out.path().join("assets/local-minima/01.webp.png").exists());
        assert!(!out.path().join("assets/.gitkeep").exists());
    }

    #[test]
    fn asset_version_is_stable_hex() {
        let a = asset_version("css", "js");
        assert_eq!(a.len(), 10);
        assert_eq!(a, asset_version("css", "js"));
        assert_ne!(a, asset_version("css2", "js"));
    }

    #[test]
    fn stylesheet_carries_config_colors() {
        let (_src, out, _) = build();
        let css = read_output(out.path(), "style.css");
        assert!(css.contains("--portfolio-bg: #fbfbfa;"));
        assert!(css.contains("--typewriter-speed: 4;"));
    }

    #[test]
    fn generate_reads_manifest_json() {
        let source = setup_fixtures();
        let out = TempDir::new().unwrap();
        let manifest = scan(source.path()).unwrap();
        let manifest_path = out.path().join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();
        let loaded = load_manifest(&manifest_path).unwrap();
        assert_eq!(loaded.routes.len(), manifest.routes.len());
        let site = out.path().join("site");
        let report = generate_site(&loaded, source.path(), &site).unwrap();
        assert_eq!(report.html_files(), manifest.routes.len());
    }

    #[test]
    fn load_manifest_rejects_garbage() {
        let out = TempDir::new().unwrap();
        let manifest_path = out.path().join("manifest.json");
        fs::write(&manifest_path, "{ not json").unwrap();
        assert!(matches!(
            load_manifest(&manifest_path),
            Err(GenerateError::Json(_))
        ));
        assert!(matches!(
            load_manifest(&out.path().join("missing.json")),
            Err(GenerateError::Io(_))
        ));
    }

    #[test]
    fn replay_locks_triggers_while_typing() {
        let (_src, out, _) = build();
        let js = read_output(out.path(), "typewriter.js");
        assert_eq!(js, JS);
        // Keyboard activation is swallowed inside the typing level.
        assert!(js.contains(r#"(event.key === " " || event.key === "Enter") && insideTyping(target)"#));
        assert!(js.contains(r#"classList.contains("typewriter--typing")"#));
        // Clicks are cancelled in the capture phase, before the link navigates.
        assert!(js.contains("event.stopPropagation();"));
        assert!(js.contains("}, true);"));
        // Replayed triggers leave the tab order and come back once settled.
        assert!(js.contains(r#"el.setAttribute("tabindex", "-1");"#));
        assert!(js.contains(r#"el.setAttribute("aria-disabled", "true");"#));
        let settled = js.split("if (visible >= total) {").nth(1).unwrap();
        assert!(settled.find("unlock();").unwrap() < settled.find("return;").unwrap());
    }

    #[test]
    fn replay_clock_matches_reveal_cursor() {
        // First character lands at delay + per_char, like `RevealCursor`.
        assert!(JS.contains("Math.floor(elapsed / speed);"));
        assert!(!JS.contains("speed) + 1"));
    }

    #[test]
    fn html_escape_in_maud() {
        let text = "<script>alert('xss')</script>";
        let markup = html! { p { (text) } };
        assert!(markup.into_string().contains("&lt;script&gt;"));
    }
}
