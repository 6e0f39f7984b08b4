//! URL scheme for the generated site.
//!
//! ```text
//! /                          homepage, nothing disclosed
//! /bio/{k0}/                 bio section k0 open
//! /bio/{k0}/{k1}/            ... and child k1 open inside it
//! /{slug}/                   content page
//! /404.html                  not found
//! ```
//!
//! A snapshot URL is just the active key path, so every disclosure state maps
//! to exactly one URL and back. Keys must be URL-safe for this to hold; scan
//! rejects content that breaks that rule.

use crate::content::{ContentLevels, PortfolioContent};
use crate::disclosure::DisclosureState;
use crate::pages::PageRegistry;
use crate::types::{Route, RouteKind};

pub const SNAPSHOT_PREFIX: &str = "/bio/";
pub const NOT_FOUND_PATH: &str = "/404.html";

/// URL of the snapshot for `state`. The collapsed state is the homepage.
pub fn disclosure_path(state: &DisclosureState) -> String {
    let path = state.path();
    if path.is_empty() {
        return "/".to_string();
    }
    format!("{SNAPSHOT_PREFIX}{}/", path.join("/"))
}

/// Inverse of [`disclosure_path`].
pub fn state_from_path(url: &str) -> Option<DisclosureState> {
    if url == "/" || url.is_empty() {
        return Some(DisclosureState::new());
    }
    let rest = url.strip_prefix(SNAPSHOT_PREFIX)?;
    let keys: Vec<&str> = rest.split('/').filter(|k| !k.is_empty()).collect();
    if keys.is_empty() {
        return None;
    }
    Some(DisclosureState::from_path(keys))
}

pub fn page_path(slug: &str) -> String {
    format!("/{slug}/")
}

/// Every disclosure state a visitor can reach by clicking triggers, starting
/// from the collapsed homepage. Includes the empty state first.
///
/// Root triggers come from the bio sentences; deeper triggers from the
/// rich-text content of the deepest open node. A trigger whose target has no
/// content still yields a state (it renders nothing below), but nothing is
/// reachable past it.
pub fn reachable_states(content: &PortfolioContent, levels: &ContentLevels) -> Vec<DisclosureState> {
    let mut states = vec![DisclosureState::new()];
    let mut roots: Vec<&str> = content
        .bio
        .iter()
        .flat_map(|section| section.sentence.iter().filter_map(|s| s.trigger_id()))
        .collect();
    dedup_in_order(&mut roots);
    for key in roots {
        walk(DisclosureState::from_path([key]), levels, &mut states);
    }
    states
}

fn walk(state: DisclosureState, levels: &ContentLevels, out: &mut Vec<DisclosureState>) {
    let path = state.path();
    let depth = path.len() - 1;
    let mut children: Vec<&str> = levels
        .get(depth, path[depth])
        .map(|node| node.trigger_ids().collect())
        .unwrap_or_default();
    dedup_in_order(&mut children);
    let next: Vec<DisclosureState> = children
        .into_iter()
        .map(|key| state.toggled(depth + 1, key))
        .collect();
    out.push(state);
    for child in next {
        walk(child, levels, out);
    }
}

fn dedup_in_order(keys: &mut Vec<&str>) {
    let mut seen = std::collections::HashSet::new();
    keys.retain(|k| seen.insert(*k));
}

/// Full route table: homepage, snapshots, content pages, 404.
pub fn site_routes(content: &PortfolioContent, pages: &PageRegistry) -> Vec<Route> {
    let levels = content.levels();
    let mut routes: Vec<Route> = reachable_states(content, &levels)
        .into_iter()
        .map(|state| {
            if state.is_empty() {
                Route {
                    path: "/".to_string(),
                    kind: RouteKind::Index,
                }
            } else {
                Route {
                    path: disclosure_path(&state),
                    kind: RouteKind::Disclosure { state },
                }
            }
        })
        .collect();
    routes.extend(pages.iter().map(|page| Route {
        path: page_path(&page.slug),
        kind: RouteKind::Page {
            slug: page.slug.clone(),
        },
    }));
    routes.push(Route {
        path: NOT_FOUND_PATH.to_string(),
        kind: RouteKind::NotFound,
    });
    routes
}
