//! Portfolio content model.
//!
//! Everything on the homepage comes from `portfolio.toml`: the profile, the
//! bio sentences and their nested disclosure tree, work history, awards,
//! personal projects, and contact links.
//!
//! ## The disclosure tree
//!
//! Each bio section is a sentence with one trigger. Opening it reveals the
//! section's `content`, whose own triggers open `children`, and so on:
//!
//! ```toml
//! [[bio]]
//! id = "bio-section-1"
//! sentence = [
//!   { type = "text", text = "I'm " },
//!   { type = "trigger", trigger_id = "bio-section-1", text = "based in NYC" },
//! ]
//!
//! [bio.content]
//! type = "rich_text"
//! segments = [
//!   { type = "text", text = "This is where I spend my time on " },
//!   { type = "trigger", trigger_id = "personal-interests", text = "personal interests" },
//! ]
//!
//! [[bio.children]]
//! id = "personal-interests"
//! trigger_label = "personal interests"
//!
//! [bio.children.content]
//! type = "gallery"
//! gallery_id = "gallery-1"
//! ```
//!
//! The renderer never walks this tree directly. [`ContentLevels`] flattens it
//! once into `depth → key → content`, which is what the disclosure state
//! (also indexed by depth) needs for lookups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error in {file}: {source}")]
    Toml {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Duplicate page slug '{slug}': {first} and {second}")]
    DuplicatePage {
        slug: String,
        first: String,
        second: String,
    },
    #[error("Page file {0} has no slug after its number prefix")]
    EmptySlug(String),
}

/// One run of text inside a sentence or rich-text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    /// Opens the child node `trigger_id` one level deeper.
    Trigger { trigger_id: String, text: String },
    /// External link; `link_id` resolves through the [`HyperlinkTable`].
    Link { link_id: String, text: String },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Text { text }
            | Segment::Trigger { text, .. }
            | Segment::Link { text, .. } => text.as_str(),
        }
    }

    pub fn trigger_id(&self) -> Option<&str> {
        match self {
            Segment::Trigger { trigger_id, .. } => Some(trigger_id.as_str()),
            _ => None,
        }
    }
}

/// Payload of a disclosure node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    RichText {
        #[serde(default)]
        segments: Vec<Segment>,
    },
    Gallery { gallery_id: String },
}

impl ContentNode {
    pub fn segments(&self) -> &[Segment] {
        match self {
            ContentNode::RichText { segments } => segments.as_slice(),
            ContentNode::Gallery { .. } => &[],
        }
    }

    /// Concatenated text of all segments.
    pub fn plain_text(&self) -> String {
        self.segments().iter().map(Segment::text).collect()
    }

    pub fn char_count(&self) -> usize {
        self.segments().iter().map(|s| s.text().chars().count()).sum()
    }

    /// Trigger ids in the order they appear.
    pub fn trigger_ids(&self) -> impl Iterator<Item = &str> {
        self.segments().iter().filter_map(Segment::trigger_id)
    }
}

impl Default for ContentNode {
    fn default() -> Self {
        ContentNode::RichText {
            segments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisclosureNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trigger_label: String,
    pub content: ContentNode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DisclosureNode>,
}

/// A root sentence. Its id doubles as the depth-0 disclosure key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BioSection {
    pub id: String,
    pub sentence: Vec<Segment>,
    #[serde(default)]
    pub content: ContentNode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DisclosureNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    pub title: String,
    /// Closing line; newlines are preserved.
    pub tagline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioLink {
    pub id: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkHistoryItem {
    pub company: String,
    pub role: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwardItem {
    pub title: String,
    pub year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Wip,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideProjectItem {
    /// Page slug this project links to.
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_clickable: bool,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

impl SideProjectItem {
    pub fn is_wip(&self) -> bool {
        self.status == Some(ProjectStatus::Wip)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactItem {
    pub platform: String,
    pub handle: String,
    pub id: String,
    pub url: String,
}

/// A titled list section (history, awards, projects, contact).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section<T> {
    pub section_title: String,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Section<T> {
    fn titled(title: &str) -> Self {
        Self {
            section_title: title.to_string(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioContent {
    pub profile: Profile,
    pub links: BTreeMap<String, PortfolioLink>,
    pub bio: Vec<BioSection>,
    pub work_history: Section<WorkHistoryItem>,
    pub awards: Section<AwardItem>,
    pub side_projects: Section<SideProjectItem>,
    pub contact: Section<ContactItem>,
}

impl Default for PortfolioContent {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            links: BTreeMap::new(),
            bio: Vec::new(),
            work_history: Section::titled("History"),
            awards: Section::titled("Awards"),
            side_projects: Section::titled("Personal"),
            contact: Section::titled("Connect"),
        }
    }
}

impl PortfolioContent {
    pub fn from_toml_str(source: &str, file: &str) -> Result<Self, ContentError> {
        toml::from_str(source).map_err(|source| ContentError::Toml {
            file: file.to_string(),
            source,
        })
    }

    /// Load `portfolio.toml` from the content root.
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        let path = root.join("portfolio.toml");
        let source = fs::read_to_string(&path)?;
        Self::from_toml_str(&source, "portfolio.toml")
    }

    pub fn levels(&self) -> ContentLevels {
        ContentLevels::from_bio(&self.bio)
    }

    pub fn hyperlinks(&self) -> HyperlinkTable {
        HyperlinkTable::from_content(self)
    }
}

/// Flattened `depth → key → content` lookup table.
///
/// Built depth-first: bio sections land at depth 0, their children at depth
/// 1, and so on. Keys are only unique per depth; a later node with the same
/// key at the same depth replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLevels {
    levels: BTreeMap<usize, BTreeMap<String, ContentNode>>,
}

impl ContentLevels {
    pub fn from_bio(bio: &[BioSection]) -> Self {
        let mut levels = Self::default();
        for section in bio {
            levels.insert(0, &section.id, section.content.clone());
            levels.flatten(&section.children, 1);
        }
        levels
    }

    fn flatten(&mut self, nodes: &[DisclosureNode], depth: usize) {
        for node in nodes {
            self.insert(depth, &node.id, node.content.clone());
            self.flatten(&node.children, depth + 1);
        }
    }

    /// Returns `true` when the key was already present at that depth.
    fn insert(&mut self, depth: usize, key: &str, content: ContentNode) -> bool {
        self.levels
            .entry(depth)
            .or_default()
            .insert(key.to_string(), content)
            .is_some()
    }

    pub fn get(&self, depth: usize, key: &str) -> Option<&ContentNode> {
        self.levels.get(&depth)?.get(key)
    }

    pub fn depth(&self, depth: usize) -> Option<&BTreeMap<String, ContentNode>> {
        self.levels.get(&depth)
    }

    /// Number of populated depths.
    pub fn depth_count(&self) -> usize {
        self.levels.len()
    }

    pub fn node_count(&self) -> usize {
        self.levels.values().map(BTreeMap::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &ContentNode)> {
        self.levels.iter().flat_map(|(depth, nodes)| {
            nodes
                .iter()
                .map(move |(key, node)| (*depth, key.as_str(), node))
        })
    }
}

/// `(depth, key)` pairs that appear more than once in the bio tree.
pub fn duplicate_keys(bio: &[BioSection]) -> Vec<(usize, String)> {
    fn walk(
        nodes: &[DisclosureNode],
        depth: usize,
        seen: &mut ContentLevels,
        dups: &mut Vec<(usize, String)>,
    ) {
        for node in nodes {
            if seen.insert(depth, &node.id, ContentNode::default()) {
                dups.push((depth, node.id.clone()));
            }
            walk(&node.children, depth + 1, seen, dups);
        }
    }

    let mut seen = ContentLevels::default();
    let mut dups = Vec::new();
    for section in bio {
        if seen.insert(0, &section.id, ContentNode::default()) {
            dups.push((0, section.id.clone()));
        }
        walk(&section.children, 1, &mut seen, &mut dups);
    }
    dups
}

/// Link id → URL. Contact ids win over link ids on collision. URLs are not
/// validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperlinkTable {
    urls: BTreeMap<String, String>,
}

impl HyperlinkTable {
    pub fn from_content(content: &PortfolioContent) -> Self {
        let mut urls: BTreeMap<String, String> = content
            .links
            .values()
            .map(|link| (link.id.clone(), link.url.clone()))
            .collect();
        for item in &content.contact.items {
            urls.insert(item.id.clone(), item.url.clone());
        }
        Self { urls }
    }

    pub fn get(&self, link_id: &str) -> Option<&str> {
        self.urls.get(link_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
