//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads a content directory, checks that the
//! pieces refer to each other consistently, and produces a [`Manifest`] that
//! the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── portfolio.toml               # Profile, bio tree, history, projects, contact
//! ├── galleries.toml               # Gallery registry (optional)
//! ├── pages/
//! │   ├── 010-local-minima.toml    # Content page (numbered = ordered)
//! │   └── 020-productivity-ai.toml
//! └── assets/                      # Copied verbatim into the site
//! ```
//!
//! ## Validation
//!
//! Broken references do not stop a build: the renderer already omits what it
//! cannot resolve. They are reported as [`Diagnostic`]s (and logged as
//! warnings) so `folio check` can surface them:
//!
//! - a trigger whose target has no content one level deeper
//! - a gallery node naming an unregistered gallery
//! - a link segment whose id is neither a link nor a contact
//! - a clickable side project with no page
//! - the same key twice at one depth (the later node wins)
//!
//! Hard errors are reserved for things that would produce a wrong site:
//! unreadable or malformed files, invalid config, duplicate page slugs, and
//! disclosure keys that cannot be used as URL path segments.

use crate::config::{self, SiteConfig};
use crate::content::{
    ContentError, ContentLevels, ContentNode, HyperlinkTable, PortfolioContent, Segment,
    duplicate_keys,
};
use crate::gallery::GalleryRegistry;
use crate::naming::is_url_safe;
use crate::pages::PageRegistry;
use crate::routes::site_routes;
use crate::types::Route;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Disclosure key '{key}' at depth {depth} is not URL-safe (use A-Z, a-z, 0-9, '-', '_')")]
    UnsafeKey { depth: usize, key: String },
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub config: SiteConfig,
    pub portfolio: PortfolioContent,
    pub galleries: GalleryRegistry,
    pub pages: PageRegistry,
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// A non-fatal content problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A trigger opens `key` at `depth`, but nothing is defined there.
    MissingTriggerTarget { depth: usize, key: String },
    MissingGallery {
        depth: usize,
        key: String,
        gallery_id: String,
    },
    UnresolvedLink { link_id: String },
    MissingProjectPage { key: String },
    DuplicateKey { depth: usize, key: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingTriggerTarget { depth, key } => {
                write!(f, "trigger '{key}' has no content at depth {depth}")
            }
            Diagnostic::MissingGallery {
                depth,
                key,
                gallery_id,
            } => write!(
                f,
                "node '{key}' at depth {depth} shows unknown gallery '{gallery_id}'"
            ),
            Diagnostic::UnresolvedLink { link_id } => {
                write!(f, "link '{link_id}' has no URL in links or contact")
            }
            Diagnostic::MissingProjectPage { key } => {
                write!(f, "side project '{key}' is clickable but has no page")
            }
            Diagnostic::DuplicateKey { depth, key } => {
                write!(f, "key '{key}' appears more than once at depth {depth}; the last one wins")
            }
        }
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    debug!(root = %root.display(), "scanning content");

    // Uses defaults if config.toml doesn't exist
    let config = config::load_config(root)?;
    let portfolio = PortfolioContent::load(root)?;
    let galleries = GalleryRegistry::load(root)?;
    let pages = PageRegistry::load(root)?;

    let levels = portfolio.levels();
    check_keys(&portfolio, &levels)?;

    let diagnostics = collect_diagnostics(&portfolio, &levels, &galleries, &pages);
    for diagnostic in &diagnostics {
        warn!("{diagnostic}");
    }

    let routes = site_routes(&portfolio, &pages);
    info!(
        sections = portfolio.bio.len(),
        nodes = levels.node_count(),
        pages = pages.len(),
        routes = routes.len(),
        warnings = diagnostics.len(),
        "scan complete"
    );

    Ok(Manifest {
        config,
        portfolio,
        galleries,
        pages,
        routes,
        diagnostics,
    })
}

/// Every disclosure key becomes a URL path segment.
fn check_keys(portfolio: &PortfolioContent, levels: &ContentLevels) -> Result<(), ScanError> {
    let sentence_triggers = portfolio
        .bio
        .iter()
        .flat_map(|s| s.sentence.iter().filter_map(Segment::trigger_id))
        .map(|key| (0, key));
    let node_keys = levels.iter().map(|(depth, key, _)| (depth, key));
    let nested_triggers = levels
        .iter()
        .flat_map(|(depth, _, node)| node.trigger_ids().map(move |key| (depth + 1, key)));

    for (depth, key) in sentence_triggers.chain(node_keys).chain(nested_triggers) {
        if !is_url_safe(key) {
            return Err(ScanError::UnsafeKey {
                depth,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

pub fn collect_diagnostics(
    portfolio: &PortfolioContent,
    levels: &ContentLevels,
    galleries: &GalleryRegistry,
    pages: &PageRegistry,
) -> Vec<Diagnostic> {
    let mut out: Vec<Diagnostic> = duplicate_keys(&portfolio.bio)
        .into_iter()
        .map(|(depth, key)| Diagnostic::DuplicateKey { depth, key })
        .collect();

    for section in &portfolio.bio {
        for key in section.sentence.iter().filter_map(Segment::trigger_id) {
            if levels.get(0, key).is_none() {
                push_once(
                    &mut out,
                    Diagnostic::MissingTriggerTarget {
                        depth: 0,
                        key: key.to_string(),
                    },
                );
            }
        }
    }

    for (depth, key, node) in levels.iter() {
        match node {
            ContentNode::Gallery { gallery_id } if !galleries.contains(gallery_id) => {
                out.push(Diagnostic::MissingGallery {
                    depth,
                    key: key.to_string(),
                    gallery_id: gallery_id.clone(),
                });
            }
            _ => {}
        }
        for child in node.trigger_ids() {
            if levels.get(depth + 1, child).is_none() {
                push_once(
                    &mut out,
                    Diagnostic::MissingTriggerTarget {
                        depth: depth + 1,
                        key: child.to_string(),
                    },
                );
            }
        }
    }

    let links = HyperlinkTable::from_content(portfolio);
    let all_segments = portfolio
        .bio
        .iter()
        .flat_map(|s| s.sentence.iter())
        .chain(levels.iter().flat_map(|(_, _, node)| node.segments().iter()));
    for segment in all_segments {
        if let Segment::Link { link_id, .. } = segment {
            if links.get(link_id).is_none() {
                push_once(
                    &mut out,
                    Diagnostic::UnresolvedLink {
                        link_id: link_id.clone(),
                    },
                );
            }
        }
    }

    for project in &portfolio.side_projects.items {
        if project.is_clickable && pages.get(&project.key).is_none() {
            out.push(Diagnostic::MissingProjectPage {
                key: project.key.clone(),
            });
        }
    }

    out
}

fn push_once(out: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    if !out.contains(&diagnostic) {
        out.push(diagnostic);
    }
}

// ============================================================================
// Tests
// ============================================================================
