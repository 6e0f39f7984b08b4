//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what an entity *is* (its key, title or label) and shows
//! where it came from as indented context. The bio tree is printed the way a
//! reader would open it: root sentences first, then each disclosure level
//! indented one step further.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Profile
//!     Jason Kim, Product Designer
//!
//! Bio
//! 001 bio-section-1 (text, 1 trigger)
//!     I'm based in NYC and currently work at Playground.
//!     personal-interests (text, 1 trigger)
//!         photography (gallery gallery-1)
//!
//! Galleries
//!     gallery-1 (3 images, 260px)
//!
//! Pages
//! 001 Local Minima (photography, 6 blocks)
//!     Route: /local-minima/
//!
//! Routes
//!     1 index, 5 snapshots, 3 pages, 1 not found
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! Snapshot bio-section-1 → bio/bio-section-1/index.html
//! Page local-minima → local-minima/index.html
//!
//! Generated 10 files (5 snapshots, 3 pages), copied 4 assets
//! ```
//!
//! ## Preview frames
//!
//! `[text]` is a trigger that can be activated, `[text]*` is the open one.
//! Triggers that are disabled or still typing print as plain text.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::content::{ContentNode, DisclosureNode, PortfolioContent, Segment};
use crate::gallery::GalleryRegistry;
use crate::generate::GenerateReport;
use crate::scan::{Diagnostic, Manifest};
use crate::session::Session;
use crate::types::RouteKind;
use crate::typewriter::allocate_segments;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Short description of a node's payload.
///
/// ```text
/// text, 2 triggers
/// gallery gallery-1
/// ```
fn node_summary(node: &ContentNode) -> String {
    match node {
        ContentNode::Gallery { gallery_id } => format!("gallery {gallery_id}"),
        ContentNode::RichText { .. } => match node.trigger_ids().count() {
            0 => "text".to_string(),
            n => format!("text, {}", plural(n, "trigger", "triggers")),
        },
    }
}

fn sentence_text(segments: &[Segment]) -> String {
    segments.iter().map(Segment::text).collect()
}

fn push_children(children: &[DisclosureNode], depth: usize, lines: &mut Vec<String>) {
    for child in children {
        lines.push(format!(
            "{}{} ({})",
            indent(depth),
            child.id,
            node_summary(&child.content)
        ));
        push_children(&child.children, depth + 1, lines);
    }
}

// ============================================================================
// scan
// ============================================================================

/// Format scan output: profile, bio tree, galleries, pages, routes, config.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let portfolio = &manifest.portfolio;

    lines.push("Profile".to_string());
    lines.push(format!(
        "    {}, {}",
        portfolio.profile.name, portfolio.profile.title
    ));

    lines.push(String::new());
    lines.push("Bio".to_string());
    for (i, section) in portfolio.bio.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            section.id,
            node_summary(&section.content)
        ));
        lines.push(format!("    {}", sentence_text(&section.sentence)));
        push_children(&section.children, 1, &mut lines);
    }

    if !manifest.galleries.is_empty() {
        lines.push(String::new());
        lines.push("Galleries".to_string());
        for gallery in manifest.galleries.iter() {
            lines.push(format!(
                "    {} ({}, {}px)",
                gallery.id,
                plural(gallery.images.len(), "image", "images"),
                gallery.height
            ));
        }
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            lines.push(format!(
                "{} {} ({}, {})",
                format_index(i + 1),
                page.title,
                page.page_type,
                plural(page.blocks.len(), "block", "blocks")
            ));
            lines.push(format!("    Route: /{}/", page.slug));
        }
    }

    lines.push(String::new());
    lines.push("Routes".to_string());
    lines.push(format!("    {}", route_summary(manifest)));

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    }
    if source_root.join(&manifest.config.assets_dir).is_dir() {
        lines.push(format!("    {}/", manifest.config.assets_dir));
    }

    if !manifest.diagnostics.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{} (run `folio check` for details)",
            plural(manifest.diagnostics.len(), "warning", "warnings")
        ));
    }

    lines
}

fn route_summary(manifest: &Manifest) -> String {
    let (mut index, mut snapshots, mut pages, mut not_found) = (0, 0, 0, 0);
    for route in &manifest.routes {
        match route.kind {
            RouteKind::Index => index += 1,
            RouteKind::Disclosure { .. } => snapshots += 1,
            RouteKind::Page { .. } => pages += 1,
            RouteKind::NotFound => not_found += 1,
        }
    }
    format!(
        "{index} index, {}, {}, {not_found} not found",
        plural(snapshots, "snapshot", "snapshots"),
        plural(pages, "page", "pages")
    )
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

pub fn format_check_output(diagnostics: &[Diagnostic]) -> Vec<String> {
    if diagnostics.is_empty() {
        return vec!["No problems found".to_string()];
    }
    let mut lines = vec![plural(diagnostics.len(), "warning", "warnings")];
    lines.extend(diagnostics.iter().map(|d| format!("    {d}")));
    lines
}

pub fn print_check_output(diagnostics: &[Diagnostic]) {
    for line in format_check_output(diagnostics) {
        println!("{}", line);
    }
}

// ============================================================================
// generate
// ============================================================================

/// Format generate output: one line per written route, then a summary.
pub fn format_generate_output(manifest: &Manifest, report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    for route in &manifest.routes {
        let file = route.output_file();
        let line = match &route.kind {
            RouteKind::Index => format!("Home → {}", file.display()),
            RouteKind::Disclosure { state } => {
                let path = state.path();
                format!(
                    "{}Snapshot {} → {}",
                    indent(path.len().saturating_sub(1)),
                    path.last().copied().unwrap_or_default(),
                    file.display()
                )
            }
            RouteKind::Page { slug } => format!("Page {slug} → {}", file.display()),
            RouteKind::NotFound => format!("Not found → {}", file.display()),
        };
        lines.push(line);
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({}, {}), copied {}",
        plural(report.html_files(), "file", "files"),
        plural(report.snapshots, "snapshot", "snapshots"),
        plural(report.content_pages, "page", "pages"),
        plural(report.assets_copied, "asset", "assets"),
    ));
    lines
}

pub fn print_generate_output(manifest: &Manifest, report: &GenerateReport) {
    for line in format_generate_output(manifest, report) {
        println!("{}", line);
    }
}

// ============================================================================
// preview
// ============================================================================

/// Render one preview frame: every root sentence, and under the open one each
/// level as far as it has been revealed.
pub fn format_frame(
    session: &Session,
    portfolio: &PortfolioContent,
    galleries: &GalleryRegistry,
) -> Vec<String> {
    let state = session.state();
    let mut lines = Vec::new();

    for section in &portfolio.bio {
        let mut sentence = String::new();
        for segment in &section.sentence {
            match segment {
                Segment::Trigger { trigger_id, text } => {
                    if state.is_active(0, trigger_id.as_str()) {
                        sentence.push_str(&format!("[{text}]*"));
                    } else if session.can_activate(0, trigger_id) {
                        sentence.push_str(&format!("[{text}]"));
                    } else {
                        sentence.push_str(text);
                    }
                }
                other => sentence.push_str(other.text()),
            }
        }
        lines.push(sentence);

        if state.active_at(0) != Some(section.id.as_str()) {
            continue;
        }
        for level in session.open_levels() {
            let pad = indent(level.depth + 1);
            match level.node {
                Some(ContentNode::Gallery { gallery_id }) if level.cursor.has_started() => {
                    let count = galleries.get(gallery_id).map_or(0, |g| g.images.len());
                    lines.push(format!(
                        "{pad}[gallery {gallery_id}: {}]",
                        plural(count, "image", "images")
                    ));
                }
                Some(ContentNode::RichText { segments }) => {
                    let cursor = level.cursor;
                    let mut text = String::new();
                    for piece in allocate_segments(segments, cursor.visible(), cursor.is_complete()) {
                        match piece.segment.trigger_id() {
                            Some(id) if state.is_active(level.depth + 1, id) => {
                                text.push_str(&format!("[{}]*", piece.text));
                            }
                            Some(_) if piece.interactive => {
                                text.push_str(&format!("[{}]", piece.text));
                            }
                            _ => text.push_str(piece.text),
                        }
                    }
                    if !text.is_empty() {
                        lines.extend(text.lines().map(|line| {
                            if line.is_empty() {
                                String::new()
                            } else {
                                format!("{pad}{line}")
                            }
                        }));
                    }
                }
                _ => {}
            }
        }
    }
    lines
}

pub fn print_frame(session: &Session, portfolio: &PortfolioContent, galleries: &GalleryRegistry) {
    for line in format_frame(session, portfolio, galleries) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::RevealTiming;
    use crate::scan::scan;
    use crate::session::Input;
    use crate::test_helpers::*;
    use std::time::Duration;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_picks_form() {
        assert_eq!(plural(1, "page", "pages"), "1 page");
        assert_eq!(plural(0, "page", "pages"), "0 pages");
    }

    #[test]
    fn scan_output_shows_bio_tree() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let lines = format_scan_output(&manifest, tmp.path());
        assert_eq!(lines[0], "Profile");
        assert_eq!(lines[1], "    Jason Kim, Product Designer");
        assert!(lines.contains(&"001 bio-section-1 (text, 1 trigger)".to_string()));
        assert!(lines.contains(&"    I'm based in NYC and currently work at Playground.".to_string()));
        assert!(lines.contains(&"    personal-interests (text, 1 trigger)".to_string()));
        assert!(lines.contains(&"        photography (gallery gallery-1)".to_string()));
        assert!(lines.contains(&"003 bio-section-3 (text)".to_string()));
    }

    #[test]
    fn scan_output_lists_galleries_pages_and_routes() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let lines = format_scan_output(&manifest, tmp.path());
        assert!(lines.contains(&"    gallery-1 (3 images, 260px)".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("001 Local Minima (photography, ")));
        assert!(lines.contains(&"    Route: /local-minima/".to_string()));
        assert!(lines.contains(&"    1 index, 5 snapshots, 3 pages, 1 not found".to_string()));
        assert!(lines.contains(&"    config.toml".to_string()));
        assert!(lines.contains(&"    assets/".to_string()));
        assert!(!lines.iter().any(|l| l.contains("warning")));
    }

    #[test]
    fn check_output_without_problems() {
        assert_eq!(format_check_output(&[]), vec!["No problems found"]);
    }

    #[test]
    fn check_output_lists_each_diagnostic() {
        let diagnostics = vec![
            Diagnostic::UnresolvedLink {
                link_id: "nope".into(),
            },
            Diagnostic::MissingProjectPage { key: "x".into() },
        ];
        let lines = format_check_output(&diagnostics);
        assert_eq!(lines[0], "2 warnings");
        assert_eq!(lines[1], "    link 'nope' has no URL in links or contact");
        assert_eq!(lines[2], "    side project 'x' is clickable but has no page");
    }

    #[test]
    fn generate_output_lists_routes() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let report = GenerateReport {
            snapshots: 5,
            content_pages: 3,
            other_pages: 2,
            assets_copied: 1,
            ..Default::default()
        };
        let lines = format_generate_output(&manifest, &report);
        assert_eq!(lines[0], "Home → index.html");
        assert!(lines.contains(&"    Snapshot personal-interests → bio/bio-section-1/personal-interests/index.html".to_string()));
        assert!(lines.contains(&"Page local-minima → local-minima/index.html".to_string()));
        assert!(lines.contains(&"Not found → 404.html".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Generated 10 files (5 snapshots, 3 pages), copied 1 asset"
        );
    }

    #[test]
    fn frame_collapsed_marks_root_triggers() {
        let portfolio = sample_portfolio();
        let session = Session::new(&portfolio, RevealTiming::default());
        let lines = format_frame(&session, &portfolio, &sample_galleries());
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "I'm [based in NYC] and currently work at Playground."
        );
    }

    #[test]
    fn frame_shows_partial_reveal_without_live_triggers() {
        let portfolio = sample_portfolio();
        let mut session = Session::new(&portfolio, RevealTiming::default());
        session.apply(Input::Activate {
            depth: 0,
            key: "bio-section-1".into(),
        });
        session.tick(Duration::from_millis(340));
        let lines = format_frame(&session, &portfolio, &sample_galleries());
        assert_eq!(lines[0], "I'm [based in NYC]* and currently work at Playground.");
        assert_eq!(lines[1], "    Just north");
        // Other roots are disabled while one is open.
        assert!(!lines.iter().any(|l| l.contains("[product design")));
    }

    #[test]
    fn frame_settled_path_shows_every_level() {
        let portfolio = sample_portfolio();
        let mut session = Session::new(&portfolio, RevealTiming::default()).with_path(&[
            "bio-section-1",
            "personal-interests",
            "photography",
        ]);
        session.finish();
        let lines = format_frame(&session, &portfolio, &sample_galleries());
        assert!(lines[1].starts_with("    Just north of Prospect Park"));
        assert!(lines[1].ends_with("[personal interests]*."));
        assert!(lines[2].starts_with("        I draw most of my inspiration from [photography]*"));
        assert_eq!(lines[3], "            [gallery gallery-1: 3 images]");
    }
}
