//! Event-driven interaction loop for the disclosure widget.
//!
//! A [`Session`] owns the disclosure state and one reveal cursor per open
//! depth. Inputs go through [`Session::apply`], which enforces the same
//! gating the rendered page does:
//!
//! - a root trigger is disabled while a different root section is open;
//! - a nested trigger only responds once its parent level has finished
//!   revealing, and only if that level actually contains it.
//!
//! After every state change the cursors are reconciled with the state. A
//! cursor whose depth now holds a different key (or nothing) is dropped,
//! which cancels its reveal. A child cursor is only created once the parent
//! cursor completes, so at most one cursor is ever in flight.
//!
//! Time is driven from outside: call [`Session::next_deadline`], sleep that
//! long, then [`Session::tick`]. `None` means everything has settled.

use crate::content::{ContentLevels, ContentNode, PortfolioContent};
use crate::disclosure::DisclosureState;
use crate::reveal::{RevealCursor, RevealTiming};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Click / Enter / Space on the trigger for `key` at `depth`.
    Activate { depth: usize, key: String },
    Escape,
    GlobalClick,
}

/// Parse a preview command: `open <depth> <key>`, `esc` or `click`.
impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("open") => {
                let depth = words
                    .next()
                    .ok_or("usage: open <depth> <key>")?
                    .parse::<usize>()
                    .map_err(|e| format!("bad depth: {e}"))?;
                let key = words.next().ok_or("usage: open <depth> <key>")?;
                Ok(Input::Activate {
                    depth,
                    key: key.to_string(),
                })
            }
            Some("esc" | "escape") => Ok(Input::Escape),
            Some("click") => Ok(Input::GlobalClick),
            Some(other) => Err(format!("unknown command '{other}'")),
            None => Err("empty command".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    levels: ContentLevels,
    roots: Vec<String>,
    timing: RevealTiming,
    state: DisclosureState,
    keys: Vec<String>,
    cursors: Vec<RevealCursor>,
}

/// One open depth as seen by a frame renderer.
#[derive(Debug, Clone, Copy)]
pub struct OpenLevel<'a> {
    pub depth: usize,
    pub key: &'a str,
    pub node: Option<&'a ContentNode>,
    pub cursor: &'a RevealCursor,
}

impl Session {
    pub fn new(content: &PortfolioContent, timing: RevealTiming) -> Self {
        let roots = content
            .bio
            .iter()
            .flat_map(|section| section.sentence.iter().filter_map(|s| s.trigger_id()))
            .map(str::to_string)
            .collect();
        Self {
            levels: content.levels(),
            roots,
            timing,
            state: DisclosureState::new(),
            keys: Vec::new(),
            cursors: Vec::new(),
        }
    }

    /// Start from an already-open path, as if each trigger had been clicked
    /// after its parent finished.
    pub fn with_path<S: AsRef<str>>(mut self, path: &[S]) -> Self {
        for (depth, key) in path.iter().enumerate() {
            self.finish();
            self.apply(Input::Activate {
                depth,
                key: key.as_ref().to_string(),
            });
        }
        self
    }

    pub fn state(&self) -> &DisclosureState {
        &self.state
    }

    pub fn levels(&self) -> &ContentLevels {
        &self.levels
    }

    /// Cursors indexed by depth, for [`crate::typewriter::Progress::Live`].
    pub fn cursors(&self) -> &[RevealCursor] {
        &self.cursors
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    /// Whether activating `key` at `depth` would be accepted right now.
    pub fn can_activate(&self, depth: usize, key: &str) -> bool {
        if depth == 0 {
            let known = self.roots.iter().any(|r| r == key);
            return known && self.state.active_at(0).is_none_or(|open| open == key);
        }
        let Some(parent) = self.state.active_at(depth - 1) else {
            return false;
        };
        let parent_complete = self
            .cursors
            .get(depth - 1)
            .is_some_and(RevealCursor::is_complete);
        parent_complete
            && self
                .levels
                .get(depth - 1, parent)
                .is_some_and(|node| node.trigger_ids().any(|id| id == key))
    }

    /// Feed one input. Returns `true` if the disclosure state changed.
    pub fn apply(&mut self, input: Input) -> bool {
        let changed = match &input {
            Input::Activate { depth, key } => {
                if self.can_activate(*depth, key) {
                    self.state.toggle(*depth, key.as_str());
                    true
                } else {
                    debug!(depth, key, "ignored activation of disabled trigger");
                    false
                }
            }
            Input::Escape | Input::GlobalClick => self.state.dismiss(),
        };
        if changed {
            debug!(?input, path = ?self.state.path(), "disclosure state changed");
            self.reconcile();
        }
        changed
    }

    /// Advance the in-flight reveal by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(cursor) = self.cursors.last_mut() {
            cursor.advance(dt);
        }
        self.reconcile();
    }

    /// Time until the next visible change, or `None` once settled.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.cursors.last().and_then(RevealCursor::next_deadline)
    }

    pub fn is_settled(&self) -> bool {
        self.next_deadline().is_none()
    }

    /// Complete every pending reveal, including children that open as a
    /// result.
    pub fn finish(&mut self) {
        while let Some(cursor) = self.cursors.last_mut() {
            if cursor.is_complete() {
                break;
            }
            cursor.finish();
            self.reconcile();
        }
    }

    pub fn open_levels(&self) -> impl Iterator<Item = OpenLevel<'_>> {
        self.keys
            .iter()
            .zip(&self.cursors)
            .enumerate()
            .map(|(depth, (key, cursor))| OpenLevel {
                depth,
                key: key.as_str(),
                node: self.levels.get(depth, key),
                cursor,
            })
    }

    /// Drop cursors the state no longer backs, then open the next level if
    /// its parent has finished.
    fn reconcile(&mut self) {
        let keep = self
            .keys
            .iter()
            .enumerate()
            .take_while(|(depth, key)| self.state.active_at(*depth) == Some(key.as_str()))
            .count();
        if keep < self.keys.len() {
            debug!(from = keep, "cancelled reveal");
        }
        self.keys.truncate(keep);
        self.cursors.truncate(keep);

        let path = self.state.path();
        let parent_done = self.cursors.last().is_none_or(RevealCursor::is_complete);
        if parent_done {
            if let Some(key) = path.get(self.keys.len()) {
                let depth = self.keys.len();
                let total = self
                    .levels
                    .get(depth, key)
                    .map(ContentNode::char_count)
                    .unwrap_or(0);
                self.keys.push(key.to_string());
                self.cursors.push(RevealCursor::new(total, self.timing));
            }
        }
    }
}
