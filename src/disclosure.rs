//! Disclosure state store.
//!
//! The homepage bio is a tree of nested "reveal more" nodes. At any moment at
//! most one node is open per nesting depth, and a node can only be open while
//! every ancestor above it is open. [`DisclosureState`] records that as a
//! sequence indexed by depth:
//!
//! ```text
//! depth:   0                1                     2
//! state:   [bio-section-1,  personal-interests,   photography]
//! ```
//!
//! There is exactly one mutation path, [`DisclosureState::toggle`], plus
//! [`DisclosureState::reset`] for the global dismiss gesture. Neither can
//! produce a hole in the active chain, so the ancestor invariant holds by
//! construction and is never checked at runtime.
//!
//! Every operation is total. Toggling at a depth past the current length is
//! allowed and extends the sequence, leaving the skipped positions empty.

use serde::{Deserialize, Serialize};

/// A single state transition, in reducer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Toggle { depth: usize, key: String },
    Reset,
}

/// Which disclosure node is active at each depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisclosureState {
    active: Vec<Option<String>>,
}

impl DisclosureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the state reached by activating `path[0]` at depth 0,
    /// `path[1]` at depth 1, and so on.
    pub fn from_path<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::new();
        for (depth, key) in path.into_iter().enumerate() {
            state.toggle(depth, key);
        }
        state
    }

    /// Toggle `key` at `depth`.
    ///
    /// If `key` is already active at `depth` the node collapses together with
    /// everything below it. Otherwise everything at and below `depth` is
    /// discarded and `key` becomes the active node at `depth`.
    pub fn toggle(&mut self, depth: usize, key: impl Into<String>) {
        let key = key.into();
        let collapse = self.active_at(depth) == Some(key.as_str());
        self.active.truncate(depth);
        if !collapse {
            self.active.resize(depth, None);
            self.active.push(Some(key));
        }
    }

    /// Collapse everything.
    pub fn reset(&mut self) {
        self.active.clear();
    }

    /// Global dismiss (background click, Escape). Only has work to do when a
    /// root node is open.
    pub fn dismiss(&mut self) -> bool {
        if self.has_any_active() {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Toggle { depth, key } => self.toggle(*depth, key.as_str()),
            Action::Reset => self.reset(),
        }
    }

    /// The state `toggle(depth, key)` would produce, leaving `self` untouched.
    pub fn toggled(&self, depth: usize, key: &str) -> Self {
        let mut next = self.clone();
        next.toggle(depth, key);
        next
    }

    pub fn active_at(&self, depth: usize) -> Option<&str> {
        self.active.get(depth).and_then(|k| k.as_deref())
    }

    pub fn is_active(&self, depth: usize, key: &str) -> bool {
        self.active_at(depth) == Some(key)
    }

    pub fn has_any_active(&self) -> bool {
        self.active_at(0).is_some()
    }

    /// Length of the underlying sequence, including empty positions.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Raw per-depth view.
    pub fn slots(&self) -> &[Option<String>] {
        &self.active
    }

    /// The contiguous chain of active keys starting at depth 0.
    pub fn path(&self) -> Vec<&str> {
        self.active.iter().map_while(|k| k.as_deref()).collect()
    }

    /// Deepest depth holding an active key within the contiguous chain.
    pub fn deepest(&self) -> Option<usize> {
        self.path().len().checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keys(state: &DisclosureState) -> Vec<Option<&str>> {
        state.slots().iter().map(|k| k.as_deref()).collect()
    }

    #[test]
    fn starts_empty() {
        let state = DisclosureState::new();
        assert!(state.is_empty());
        assert!(!state.has_any_active());
        assert_eq!(state.active_at(0), None);
    }

    #[test]
    fn sibling_switch_discards_subtree() {
        let mut state = DisclosureState::new();
        state.toggle(0, "A");
        assert_eq!(state.path(), vec!["A"]);
        state.toggle(1, "A1");
        assert_eq!(state.path(), vec!["A", "A1"]);
        state.toggle(0, "B");
        assert_eq!(state.path(), vec!["B"]);
        state.toggle(0, "B");
        assert!(state.is_empty());
    }

    #[test]
    fn retoggle_collapses_descendants() {
        let mut state = DisclosureState::from_path(["A", "A1", "A2"]);
        state.toggle(1, "A1");
        assert_eq!(state.path(), vec!["A"]);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn switching_child_keeps_ancestors() {
        let mut state = DisclosureState::from_path(["A", "A1", "A1x"]);
        state.toggle(1, "A2");
        assert_eq!(state.path(), vec!["A", "A2"]);
    }

    #[test]
    fn escape_on_nested_state_collapses_all() {
        let mut state = DisclosureState::from_path(["A", "A1"]);
        assert!(state.dismiss());
        assert!(state.is_empty());
    }

    #[test]
    fn dismiss_when_nothing_active_is_noop() {
        let mut state = DisclosureState::new();
        assert!(!state.dismiss());
        assert!(state.is_empty());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut state = DisclosureState::new();
        state.reset();
        assert!(state.is_empty());
        state.reset();
        assert_eq!(state.len(), 0);
    }

    #[test]
    fn toggle_past_end_extends_with_gaps() {
        let mut state = DisclosureState::new();
        state.toggle(2, "deep");
        assert_eq!(keys(&state), vec![None, None, Some("deep")]);
        // The gap means nothing is reachable from the root.
        assert!(state.path().is_empty());
        assert!(!state.has_any_active());
        assert_eq!(state.deepest(), None);
    }

    #[test]
    fn toggled_leaves_original_untouched() {
        let state = DisclosureState::from_path(["A"]);
        let next = state.toggled(1, "A1");
        assert_eq!(state.path(), vec!["A"]);
        assert_eq!(next.path(), vec!["A", "A1"]);
        assert_eq!(state.toggled(0, "A").len(), 0);
    }

    #[test]
    fn apply_mirrors_direct_calls() {
        let mut state = DisclosureState::new();
        state.apply(&Action::Toggle {
            depth: 0,
            key: "A".into(),
        });
        state.apply(&Action::Toggle {
            depth: 1,
            key: "A1".into(),
        });
        assert_eq!(state.deepest(), Some(1));
        state.apply(&Action::Reset);
        assert!(state.is_empty());
    }

    #[test]
    fn serializes_as_plain_array() {
        let state = DisclosureState::from_path(["A", "A1"]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"["A","A1"]"#);
        let back: DisclosureState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (0usize..4, prop::sample::select(vec!["a", "b", "c"]))
                .prop_map(|(depth, key)| Action::Toggle { depth, key: key.to_string() }),
            1 => Just(Action::Reset),
        ]
    }

    proptest! {
        #[test]
        fn toggle_length_law(
            prefix in prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 0..5),
            depth in 0usize..5,
            key in prop::sample::select(vec!["a", "b", "c"]),
        ) {
            let state = DisclosureState::from_path(prefix.iter().copied());
            let was_active = state.is_active(depth, key);
            let next = state.toggled(depth, key);
            if was_active {
                prop_assert_eq!(next.len(), depth);
            } else {
                prop_assert_eq!(next.len(), depth + 1);
                prop_assert_eq!(next.active_at(depth), Some(key));
            }
        }

        #[test]
        fn chain_never_has_holes_from_root(actions in prop::collection::vec(arb_action(), 0..32)) {
            // Starting from a reachable state and only toggling at depths that
            // are reachable keeps every active key connected to the root.
            let mut state = DisclosureState::new();
            for action in &actions {
                if let Action::Toggle { depth, .. } = action {
                    if *depth > state.path().len() {
                        continue;
                    }
                }
                state.apply(action);
                let slots = state.slots();
                for d in 1..slots.len() {
                    if slots[d].is_some() {
                        prop_assert!(slots[d - 1].is_some());
                    }
                }
            }
        }
    }
}
