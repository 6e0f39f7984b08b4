//! Gallery registry and fan layout rendering.
//!
//! A gallery is a small, hand-placed arrangement of photos that a disclosure
//! node can show instead of text. Galleries are declared in
//! `galleries.toml`:
//!
//! ```toml
//! [[gallery]]
//! id = "gallery-1"
//! name = "Gallery 1"
//! height = 260
//!
//! [[gallery.images]]
//! src = "/assets/typewriter-gallery/gallery1.webp"
//! alt = "Gallery photo 1"
//! position = { x = -8, y = 36, rotation = -18 }
//! styling = { size = "150px", background_position = "43.8% 74.81%" }
//!
//! [gallery.animations]
//! stagger = 0.2
//! duration = 0.6
//! ease = "ease_out"
//! ```
//!
//! An unknown gallery id is not an error anywhere: lookups return `None` and
//! [`render_gallery`] renders nothing.

use crate::content::ContentError;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Height used when a gallery id has no registry entry.
pub const FALLBACK_HEIGHT: u32 = 160;
const DEFAULT_IMAGE_SIZE: &str = "107px";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagePosition {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageStyling {
    pub size: Option<String>,
    pub class_name: Option<String>,
    pub background_position: Option<String>,
    pub background_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub position: ImagePosition,
    #[serde(default)]
    pub styling: ImageStyling,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Fan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Ease {
    pub fn css(self) -> &'static str {
        match self {
            Ease::Linear => "linear",
            Ease::EaseIn => "ease-in",
            Ease::EaseOut => "ease-out",
            Ease::EaseInOut => "ease-in-out",
        }
    }
}

/// Entrance animation timing, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Animations {
    pub stagger: f64,
    pub duration: f64,
    pub ease: Ease,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            stagger: 0.2,
            duration: 0.6,
            ease: Ease::EaseOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Gallery {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub images: Vec<GalleryImage>,
    #[serde(default)]
    pub animations: Option<Animations>,
}

fn default_height() -> u32 {
    FALLBACK_HEIGHT
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GalleryFile {
    gallery: Vec<Gallery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GalleryRegistry {
    galleries: BTreeMap<String, Gallery>,
}

impl GalleryRegistry {
    pub fn from_toml_str(source: &str, file: &str) -> Result<Self, ContentError> {
        let parsed: GalleryFile = toml::from_str(source).map_err(|source| ContentError::Toml {
            file: file.to_string(),
            source,
        })?;
        Ok(parsed.gallery.into_iter().collect())
    }

    /// Load `galleries.toml` from the content root. A missing file is an
    /// empty registry.
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        let path = root.join("galleries.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let source = fs::read_to_string(&path)?;
        Self::from_toml_str(&source, "galleries.toml")
    }

    pub fn get(&self, id: &str) -> Option<&Gallery> {
        self.galleries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.galleries.contains_key(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.galleries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.galleries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galleries.is_empty()
    }

    pub fn height_of(&self, id: &str) -> u32 {
        self.get(id).map(|g| g.height).unwrap_or(FALLBACK_HEIGHT)
    }

    /// Next free number for a `gallery-N` id.
    pub fn next_gallery_number(&self) -> u32 {
        self.ids()
            .filter_map(|id| id.strip_prefix("gallery-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .map(|n| n + 1)
            .unwrap_or(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gallery> {
        self.galleries.values()
    }
}

impl FromIterator<Gallery> for GalleryRegistry {
    fn from_iter<I: IntoIterator<Item = Gallery>>(iter: I) -> Self {
        Self {
            galleries: iter.into_iter().map(|g| (g.id.clone(), g)).collect(),
        }
    }
}

/// Render a gallery by id. Unknown ids render nothing.
pub fn render_gallery(registry: &GalleryRegistry, id: &str, animate: bool) -> Markup {
    match registry.get(id) {
        Some(gallery) => render_fan(gallery, animate),
        None => html! {},
    }
}

fn render_fan(gallery: &Gallery, animate: bool) -> Markup {
    let animations = gallery.animations.unwrap_or_default();
    html! {
        div class="modular-gallery-container" data-gallery=(gallery.id)
            style={ "height: " (gallery.height) "px;" } {
            @for (index, image) in gallery.images.iter().enumerate() {
                (render_fan_image(image, index, &animations, animate))
            }
        }
    }
}

fn render_fan_image(
    image: &GalleryImage,
    index: usize,
    animations: &Animations,
    animate: bool,
) -> Markup {
    let size = image
        .styling
        .size
        .as_deref()
        .unwrap_or(DEFAULT_IMAGE_SIZE);
    let scale = image.position.scale.unwrap_or(1.0) * 1.1;
    let mut style = format!(
        "left: {}px; top: {}px; width: {size}; height: {size}; --fan-rotate: {}deg; --fan-scale: {};",
        image.position.x, image.position.y, image.position.rotation, scale
    );
    if animate {
        style.push_str(&format!(
            " animation-delay: {:.2}s; animation-duration: {:.2}s; animation-timing-function: {};",
            index as f64 * animations.stagger,
            animations.duration,
            animations.ease.css()
        ));
    }
    let class = match (&image.styling.class_name, animate) {
        (Some(extra), true) => format!("modular-gallery-item fan-enter {extra}"),
        (Some(extra), false) => format!("modular-gallery-item {extra}"),
        (None, true) => "modular-gallery-item fan-enter".to_string(),
        (None, false) => "modular-gallery-item".to_string(),
    };
    let object_position = image
        .styling
        .background_position
        .as_deref()
        .unwrap_or("center");
    let object_fit = match image.styling.background_size.as_deref() {
        Some("contain") => "contain",
        _ => "cover",
    };

    html! {
        div class=(class) style=(style) {
            div class="modular-gallery-image" {
                img src=(image.src) alt=(image.alt) loading="lazy" decoding="async"
                    style={ "object-position: " (object_position) "; object-fit: " (object_fit) ";" }
                    onerror="this.style.visibility='hidden'";
            }
            div class="modular-gallery-frame" aria-hidden="true" {}
        }
    }
}
