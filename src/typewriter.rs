//! Recursive disclosure renderer.
//!
//! Given the flattened content table, the disclosure state and a progress
//! source, [`render_node`] produces the markup for the node open at one
//! depth and, once that level has finished revealing, recurses into the
//! child open one level deeper.
//!
//! Reveal progress decides three things:
//!
//! - how much text is shown ([`allocate_segments`] spends the visible
//!   character budget across segments in order);
//! - whether triggers are interactive (only when their own text is fully
//!   visible *and* the whole node has finished);
//! - whether the next level is rendered at all.
//!
//! Static snapshots render with [`Progress::Settled`]: every level is
//! complete, and the deepest text level is tagged `data-typewriter` so the
//! client script can replay the reveal in the browser.

use crate::content::{ContentLevels, ContentNode, HyperlinkTable, Segment};
use crate::disclosure::DisclosureState;
use crate::gallery::{GalleryRegistry, render_gallery};
use crate::reveal::RevealCursor;
use crate::routes::disclosure_path;
use maud::{Markup, html};

/// One segment after the visible budget has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSegment<'a> {
    pub segment: &'a Segment,
    /// Visible prefix of the segment text.
    pub text: &'a str,
    pub fully_visible: bool,
    /// Only ever true for triggers.
    pub interactive: bool,
}

/// Spend `visible` characters across `segments` in order. Segments with no
/// visible characters are dropped.
pub fn allocate_segments(
    segments: &[Segment],
    visible: usize,
    complete: bool,
) -> Vec<VisibleSegment<'_>> {
    let mut budget = visible;
    let mut out = Vec::new();
    for segment in segments {
        if budget == 0 {
            break;
        }
        let full = segment.text();
        let len = full.chars().count();
        if len == 0 {
            continue;
        }
        let take = len.min(budget);
        budget -= take;
        let fully_visible = take == len;
        out.push(VisibleSegment {
            segment,
            text: char_prefix(full, take),
            fully_visible,
            interactive: complete && fully_visible && segment.trigger_id().is_some(),
        });
    }
    out
}

fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Where reveal progress comes from.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// Every level fully revealed.
    Settled,
    /// One cursor per open depth, index = depth. A depth with no cursor has
    /// not started.
    Live(&'a [RevealCursor]),
}

impl Progress<'_> {
    /// `(visible chars, started, complete)` for the node at `depth`.
    pub fn at(&self, depth: usize, total: usize) -> (usize, bool, bool) {
        match self {
            Progress::Settled => (total, true, true),
            Progress::Live(cursors) => match cursors.get(depth) {
                Some(c) => (c.visible().min(total), c.has_started(), c.is_complete()),
                None => (0, false, false),
            },
        }
    }

    fn is_settled(&self) -> bool {
        matches!(self, Progress::Settled)
    }
}

/// Everything the renderer reads.
#[derive(Debug, Clone, Copy)]
pub struct DisclosureView<'a> {
    pub levels: &'a ContentLevels,
    pub galleries: &'a GalleryRegistry,
    pub links: &'a HyperlinkTable,
    pub state: &'a DisclosureState,
    pub progress: Progress<'a>,
}

/// Render the node `key` open at `depth`. Missing content renders nothing.
pub fn render_node(view: &DisclosureView<'_>, depth: usize, key: &str) -> Markup {
    let Some(node) = view.levels.get(depth, key) else {
        return html! {};
    };
    let container_id = format!("nested-content-{depth}-{key}");
    match node {
        ContentNode::Gallery { gallery_id } => {
            let (_, started, _) = view.progress.at(depth, 0);
            html! {
                div.nested-content.nested-content--gallery id=(container_id)
                    data-depth=(depth) data-key=(key)
                    style={ "min-height: " (view.galleries.height_of(gallery_id)) "px;" } {
                    @if started {
                        (render_gallery(view.galleries, gallery_id, true))
                    }
                }
            }
        }
        ContentNode::RichText { segments } => {
            render_rich_text(view, depth, key, &container_id, segments)
        }
    }
}

/// Render a rich-text level and, once it is complete, its open child.
pub fn render_rich_text(
    view: &DisclosureView<'_>,
    depth: usize,
    key: &str,
    container_id: &str,
    segments: &[Segment],
) -> Markup {
    let total: usize = segments.iter().map(|s| s.text().chars().count()).sum();
    let (visible, _, complete) = view.progress.at(depth, total);
    let retype = view.progress.is_settled() && view.state.deepest() == Some(depth);
    let child = view.state.active_at(depth + 1).filter(|_| complete);

    html! {
        div.nested-content id=(container_id) data-depth=(depth) data-key=(key) {
            p.portfolio-text.typewriter-content data-typewriter[retype] {
                @for piece in allocate_segments(segments, visible, complete) {
                    (render_segment(view, depth, &piece))
                }
            }
            @if let Some(child_key) = child {
                (render_node(view, depth + 1, child_key))
            }
        }
    }
}

fn render_segment(view: &DisclosureView<'_>, depth: usize, piece: &VisibleSegment<'_>) -> Markup {
    match piece.segment {
        Segment::Text { .. } => html! { (piece.text) },
        Segment::Trigger { trigger_id, .. } => {
            render_trigger(view, depth + 1, trigger_id, piece.text, piece.interactive)
        }
        Segment::Link { link_id, .. } => match view.links.get(link_id) {
            Some(url) if piece.fully_visible => html! {
                a.portfolio-link href=(url) target="_blank" rel="noopener noreferrer" { (piece.text) }
            },
            _ => html! { (piece.text) },
        },
    }
}

/// Trigger opening `key` at `target_depth`.
pub fn render_trigger(
    view: &DisclosureView<'_>,
    target_depth: usize,
    key: &str,
    text: &str,
    interactive: bool,
) -> Markup {
    let expanded = view.state.is_active(target_depth, key);
    let controls = format!("nested-content-{target_depth}-{key}");
    let aria_expanded = if expanded { "true" } else { "false" };
    let class = if expanded {
        "nested-trigger nested-trigger--active"
    } else if interactive {
        "nested-trigger nested-trigger--inactive nested-trigger--clickable"
    } else {
        "nested-trigger nested-trigger--inactive"
    };

    html! {
        @if interactive {
            a class=(class) role="button"
                href=(disclosure_path(&view.state.toggled(target_depth, key)))
                aria-expanded=(aria_expanded) aria-controls=(controls)
                data-depth=(target_depth) data-key=(key) {
                (text)
            }
        } @else {
            span class=(class) aria-expanded=(aria_expanded) aria-controls=(controls)
                aria-disabled="true" data-depth=(target_depth) data-key=(key) {
                (text)
            }
        }
    }
}
