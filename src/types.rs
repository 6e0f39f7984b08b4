//! Shared types used across pipeline stages.
//!
//! Routes are serialized into `manifest.json` by scan and read back by
//! generate, so both stages agree on which files get written.

use crate::disclosure::DisclosureState;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One page of the generated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Site-absolute URL path, always with a trailing slash except for
    /// `/404.html`.
    pub path: String,
    pub kind: RouteKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteKind {
    Index,
    /// Snapshot of the homepage with this disclosure state applied.
    Disclosure { state: DisclosureState },
    Page { slug: String },
    NotFound,
}

impl Route {
    /// Output file relative to the site root.
    pub fn output_file(&self) -> PathBuf {
        if self.path.ends_with(".html") {
            return PathBuf::from(self.path.trim_start_matches('/'));
        }
        let mut file = PathBuf::new();
        for part in self.path.split('/').filter(|p| !p.is_empty()) {
            file.push(part);
        }
        file.join("index.html")
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            RouteKind::Index => "index",
            RouteKind::Disclosure { .. } => "snapshot",
            RouteKind::Page { .. } => "page",
            RouteKind::NotFound => "404",
        }
    }
}
