//! # Folio
//!
//! A static site generator for single-page personal portfolios built around
//! a *typewriter disclosure* bio: a few sentences whose highlighted phrases
//! open nested paragraphs (or a fan of photos), each revealed one character
//! at a time.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (TOML files → checked, structured data)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so a broken build can be debugged by
//! reading what the scan stage understood. Generation is a pure function of
//! the manifest plus the assets directory.
//!
//! # The Disclosure Core
//!
//! The interactive part is modelled as three small pieces that know nothing
//! about HTML or terminals:
//!
//! - [`disclosure`]: the active key per depth. Toggling a depth clears
//!   everything deeper; escape or a background click resets.
//! - [`reveal`]: a cursor that turns elapsed time into a visible character
//!   count and says when the next character is due.
//! - [`session`]: feeds inputs into the store, enforces trigger gating, and
//!   keeps one cursor per open depth, dropping the ones a state change
//!   invalidates.
//!
//! [`typewriter`] renders any of this to HTML. The static site renders every
//! reachable state fully revealed, one page per state ([`routes`]), and lets
//! the browser replay the last reveal. `folio preview` drives a live
//! [`session::Session`] in the terminal instead.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: loads and cross-checks the content directory, produces the manifest |
//! | [`generate`] | Stage 2: renders the site from the manifest using Maud |
//! | [`content`] | Bio tree, profile and section types; flattened per-depth lookup table |
//! | [`disclosure`] | Disclosure state store |
//! | [`reveal`] | Reveal timing and cursor |
//! | [`typewriter`] | Segment allocation and the recursive disclosure renderer |
//! | [`session`] | Input handling and reveal scheduling for a live widget |
//! | [`gallery`] | Gallery registry and fan-layout markup |
//! | [`pages`] | Long-form content pages and their block renderer |
//! | [`dimensions`] | Image size lookups for `width`/`height` attributes |
//! | [`routes`] | URL scheme and reachable-state enumeration |
//! | [`naming`] | `NNN-slug` file naming convention |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Route types serialized in the manifest |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Page per Open State
//!
//! Triggers are links, not script handlers. Each reachable disclosure state
//! is written to `/bio/{k0}/{k1}/…/index.html`, so the widget works with
//! JavaScript disabled, the back button undoes a click, and any state can be
//! shared. The embedded script only adds Escape / background-click dismissal
//! and the character-by-character replay.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a build error, and every interpolation is escaped.
//!
//! ## Broken References Are Warnings
//!
//! A trigger without content, an unknown gallery or a link without a URL
//! renders as plain text and is reported by `folio check`. Anything that
//! would produce a wrong URL (duplicate page slugs, keys that are not
//! URL-safe) fails the scan.

pub mod config;
pub mod content;
pub mod dimensions;
pub mod disclosure;
pub mod gallery;
pub mod generate;
pub mod naming;
pub mod output;
pub mod pages;
pub mod reveal;
pub mod routes;
pub mod scan;
pub mod session;
pub mod types;
pub mod typewriter;

#[cfg(test)]
pub(crate) mod test_helpers;
