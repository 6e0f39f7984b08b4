//! Content page registry and block rendering.
//!
//! Each file in `pages/` is one long-form page. The file stem gives the slug
//! and ordering (see [`crate::naming`]); the body is a small header plus a
//! list of typed blocks:
//!
//! ```toml
//! title = "Local Minima"
//! type = "photography"
//! subtitle = "Photography"
//! description = "Photographic study of subtle dips in mood and light."
//!
//! [[blocks]]
//! type = "text"
//! content = "In mathematics, a local minimum is a dip..."
//!
//! [[blocks]]
//! type = "image"
//! src = "/assets/local-minima/01.webp"
//! alt = "Local Minima photograph 1"
//! orientation = "portrait"
//! ```
//!
//! Block rendering is pure apart from the dimension cache lookup, which only
//! decides whether `width`/`height` attributes are emitted.

use crate::content::ContentError;
use crate::dimensions::DimensionCache;
use crate::naming::parse_page_stem;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

pub const DEFAULT_FRAMED_HEIGHT: u32 = 200;
pub const DEFAULT_STACK_HEIGHT: u32 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Photography,
    Writing,
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageType::Photography => write!(f, "photography"),
            PageType::Writing => write!(f, "writing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        content: String,
    },
    SectionHeader {
        title: String,
    },
    Image {
        src: String,
        alt: String,
        caption: Option<String>,
        orientation: Option<Orientation>,
    },
    ImageWithMagnifier {
        src: String,
        alt: String,
        caption: Option<String>,
        magnifier_src: Option<String>,
    },
    ImageNoBorder {
        src: String,
        alt: String,
        caption: Option<String>,
    },
    ImageThemeToggle {
        src: String,
        dark_src: String,
        alt: String,
        caption: Option<String>,
    },
    Video {
        src: String,
        caption: Option<String>,
    },
    Quote {
        quote: String,
        cite: Option<String>,
    },
    FramedText {
        text: String,
        height: Option<u32>,
    },
    ImageStack {
        stack: Vec<ImageRef>,
        height: Option<u32>,
        mobile_height: Option<u32>,
    },
    ImageSpreadStack {
        images: Vec<ImageRef>,
        caption: Option<String>,
        rows: Option<u32>,
        cols: Option<u32>,
        gap: Option<u32>,
    },
    Markdown {
        content: String,
    },
}

impl ContentBlock {
    /// Local image sources referenced by this block.
    pub fn image_sources(&self) -> Vec<&str> {
        match self {
            ContentBlock::Image { src, .. }
            | ContentBlock::ImageWithMagnifier { src, .. }
            | ContentBlock::ImageNoBorder { src, .. } => vec![src.as_str()],
            ContentBlock::ImageThemeToggle { src, dark_src, .. } => {
                vec![src.as_str(), dark_src.as_str()]
            }
            ContentBlock::ImageStack { stack: images, .. }
            | ContentBlock::ImageSpreadStack { images, .. } => {
                images.iter().map(|i| i.src.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// On-disk shape of a page file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PageFile {
    title: Option<String>,
    #[serde(rename = "type")]
    page_type: PageType,
    subtitle: Option<String>,
    description: Option<String>,
    #[serde(default)]
    full_width: bool,
    #[serde(default)]
    blocks: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub slug: String,
    pub order: Option<u32>,
    pub page_type: PageType,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub full_width: bool,
    pub blocks: Vec<ContentBlock>,
}

impl PageConfig {
    /// Parse a page file. `stem` is the file name without extension.
    pub fn from_toml_str(stem: &str, source: &str) -> Result<Self, ContentError> {
        let parsed = parse_page_stem(stem);
        if parsed.slug.is_empty() {
            return Err(ContentError::EmptySlug(stem.to_string()));
        }
        let file: PageFile = toml::from_str(source).map_err(|source| ContentError::Toml {
            file: format!("pages/{stem}.toml"),
            source,
        })?;
        Ok(Self {
            title: file.title.unwrap_or_else(|| parsed.fallback_title()),
            slug: parsed.slug,
            order: parsed.order,
            page_type: file.page_type,
            subtitle: file.subtitle,
            description: file.description,
            full_width: file.full_width,
            blocks: file.blocks,
        })
    }

    /// Text shown beside a side project entry: subtitle, else the page type.
    pub fn meta_label(&self) -> String {
        self.subtitle
            .clone()
            .unwrap_or_else(|| self.page_type.to_string())
    }

    pub fn image_sources(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().flat_map(ContentBlock::image_sources)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRegistry {
    pages: Vec<PageConfig>,
}

impl PageRegistry {
    /// Load every `*.toml` under `pages/`. A missing directory is an empty
    /// registry; two files resolving to the same slug is an error.
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        let dir = root.join("pages");
        if !dir.is_dir() {
            return Ok(Self::default());
        }
        let mut files: Vec<_> = fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "toml"))
            .collect();
        files.sort();

        let mut pages = Vec::with_capacity(files.len());
        let mut seen: Vec<(String, String)> = Vec::new();
        for path in files {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source = fs::read_to_string(&path)?;
            let page = PageConfig::from_toml_str(&stem, &source)?;
            if let Some((_, first)) = seen.iter().find(|(slug, _)| *slug == page.slug) {
                return Err(ContentError::DuplicatePage {
                    slug: page.slug,
                    first: first.clone(),
                    second: stem,
                });
            }
            seen.push((page.slug.clone(), stem));
            pages.push(page);
        }
        Ok(pages.into_iter().collect())
    }

    pub fn get(&self, slug: &str) -> Option<&PageConfig> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    pub fn pages_by_type(&self, page_type: PageType) -> impl Iterator<Item = &PageConfig> {
        self.pages.iter().filter(move |p| p.page_type == page_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageConfig> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromIterator<PageConfig> for PageRegistry {
    /// Collects in `NNN-` order, unnumbered pages last.
    fn from_iter<I: IntoIterator<Item = PageConfig>>(iter: I) -> Self {
        let mut pages: Vec<_> = iter.into_iter().collect();
        pages.sort_by(|a, b| {
            let ka = (a.order.unwrap_or(u32::MAX), a.slug.as_str());
            let kb = (b.order.unwrap_or(u32::MAX), b.slug.as_str());
            ka.cmp(&kb)
        });
        Self { pages }
    }
}

// ============================================================================
// Block rendering
// ============================================================================

pub fn render_blocks(blocks: &[ContentBlock], page_type: PageType, dims: &DimensionCache) -> Markup {
    html! {
        div class={ "content-blocks content-blocks--" (page_type.to_string()) } {
            @for block in blocks {
                (render_block(block, dims))
            }
        }
    }
}

pub fn render_block(block: &ContentBlock, dims: &DimensionCache) -> Markup {
    match block {
        ContentBlock::Text { content } => html! {
            p.portfolio-text { (content) }
        },
        ContentBlock::SectionHeader { title } => html! {
            div.section-header {
                span.portfolio-text.halbfett { (title) }
                span.section-header-rule {}
            }
        },
        ContentBlock::Image {
            src,
            alt,
            caption,
            orientation,
        } => {
            let class = match orientation {
                Some(Orientation::Portrait) => "inline-image inline-image--portrait",
                Some(Orientation::Landscape) => "inline-image inline-image--landscape",
                None => "inline-image",
            };
            html! {
                figure class=(class) {
                    (img(src, alt, dims))
                    (figcaption(caption.as_deref()))
                }
            }
        }
        ContentBlock::ImageWithMagnifier {
            src,
            alt,
            caption,
            magnifier_src,
        } => {
            let full = magnifier_src.as_deref().unwrap_or(src);
            html! {
                figure.inline-image.inline-image--magnifier data-magnifier-src=(full) {
                    a href=(full) target="_blank" rel="noopener noreferrer" {
                        (img(src, alt, dims))
                    }
                    (figcaption(caption.as_deref()))
                }
            }
        }
        ContentBlock::ImageNoBorder { src, alt, caption } => html! {
            figure.image-no-border {
                (img(src, alt, dims))
                (figcaption(caption.as_deref()))
            }
        },
        ContentBlock::ImageThemeToggle {
            src,
            dark_src,
            alt,
            caption,
        } => html! {
            figure.inline-image.inline-image--theme-toggle {
                picture {
                    source srcset=(dark_src) media="(prefers-color-scheme: dark)";
                    (img(src, alt, dims))
                }
                (figcaption(caption.as_deref()))
            }
        },
        ContentBlock::Video { src, caption } => html! {
            figure.inline-video {
                video src=(src) autoplay muted loop playsinline preload="metadata" {}
                (figcaption(caption.as_deref()))
            }
        },
        ContentBlock::Quote { quote, cite } => html! {
            blockquote.portfolio-quote {
                p {
                    @for (i, line) in quote.lines().enumerate() {
                        @if i > 0 { br; }
                        (line)
                    }
                }
                @if let Some(source) = cite {
                    cite { "— " (source) }
                }
            }
        },
        ContentBlock::FramedText { text, height } => html! {
            div.framed-text style={ "height: " (height.unwrap_or(DEFAULT_FRAMED_HEIGHT)) "px;" } {
                p.portfolio-text { (text) }
            }
        },
        ContentBlock::ImageStack {
            stack,
            height,
            mobile_height,
        } => {
            let height = height.unwrap_or(DEFAULT_STACK_HEIGHT);
            let mobile = mobile_height.unwrap_or(height);
            let top_caption = stack.first().and_then(|i| i.caption.as_deref());
            html! {
                figure.image-stack style={ "--stack-height: " (height) "px; --stack-mobile-height: " (mobile) "px;" } {
                    div.image-stack-cards {
                        @for (i, image) in stack.iter().enumerate() {
                            @let (angle, shift) = stack_tilt(&image.src, i);
                            div.image-stack-card style={
                                "z-index: " (stack.len() - i) "; transform: translateX(" (format!("{shift:.2}")) "px) rotate(" (format!("{angle:.2}")) "deg);"
                            } {
                                (img(&image.src, &image.alt, dims))
                            }
                        }
                    }
                    (figcaption(top_caption))
                }
            }
        }
        ContentBlock::ImageSpreadStack {
            images,
            caption,
            rows,
            cols,
            gap,
        } => {
            let count = images.len().max(1) as u32;
            let cols = cols.unwrap_or(5).clamp(1, count);
            let rows = rows.unwrap_or_else(|| count.div_ceil(cols));
            let gap = gap.unwrap_or(16);
            html! {
                figure.image-spread-stack {
                    div.image-spread-grid style={
                        "grid-template-columns: repeat(" (cols) ", 1fr); grid-template-rows: repeat(" (rows) ", auto); gap: " (gap) "px;"
                    } {
                        @for image in images {
                            (img(&image.src, &image.alt, dims))
                        }
                    }
                    (figcaption(caption.as_deref()))
                }
            }
        }
        ContentBlock::Markdown { content } => {
            let mut body = String::new();
            md_html::push_html(&mut body, Parser::new(content));
            html! {
                div.markdown-block { (PreEscaped(body)) }
            }
        }
    }
}

fn img(src: &str, alt: &str, dims: &DimensionCache) -> Markup {
    let size = dims.get(src);
    html! {
        img src=(src) alt=(alt)
            width=[size.map(|d| d.width)]
            height=[size.map(|d| d.height)]
            loading="lazy" decoding="async"
            onerror="this.style.display='none'";
    }
}

fn figcaption(caption: Option<&str>) -> Markup {
    html! {
        @if let Some(caption) = caption {
            figcaption { (caption) }
        }
    }
}

/// Deterministic tilt per stacked card so rebuilds don't reshuffle the look.
/// Returns (rotation degrees, horizontal shift px).
fn stack_tilt(src: &str, index: usize) -> (f64, f64) {
    let mut seed = format!("{src}:{index}")
        .chars()
        .fold(0u32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as u32));
    let mut next = || {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        seed as f64 / 4_294_967_296.0
    };
    let magnitude = 0.5 + next();
    let sign = if next() > 0.5 { 1.0 } else { -1.0 };
    let shift = next() * 2.0 - 1.0;
    (magnitude * sign, shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_pages, write_test_png};
    use tempfile::TempDir;

    fn no_dims() -> DimensionCache {
        DimensionCache::new("/nonexistent")
    }

    #[test]
    fn registry_orders_by_prefix() {
        let pages = sample_pages();
        let slugs: Vec<_> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec!["local-minima", "productivity-ai", "modernism-photography"]
        );
    }

    #[test]
    fn lookup_by_slug_and_type() {
        let pages = sample_pages();
        let page = pages.get("local-minima").unwrap();
        assert_eq!(page.page_type, PageType::Photography);
        assert_eq!(page.order, Some(10));
        assert!(pages.get("nope").is_none());
        assert_eq!(pages.pages_by_type(PageType::Writing).count(), 2);
    }

    #[test]
    fn title_falls_back_to_slug() {
        let page = PageConfig::from_toml_str("040-who-am-i", r#"type = "writing""#).unwrap();
        assert_eq!(page.title, "who am i");
        assert_eq!(page.meta_label(), "writing");
    }

    #[test]
    fn number_only_stem_is_rejected() {
        let err = PageConfig::from_toml_str("010", r#"type = "writing""#).unwrap_err();
        assert!(matches!(err, ContentError::EmptySlug(_)));
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let pages = tmp.path().join("pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("010-essay.toml"), r#"type = "writing""#).unwrap();
        fs::write(pages.join("essay.toml"), r#"type = "writing""#).unwrap();
        let err = PageRegistry::load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("essay"));
    }

    #[test]
    fn unknown_block_type_names_file() {
        let source = r#"
type = "writing"
[[blocks]]
type = "carousel"
"#;
        let err = PageConfig::from_toml_str("010-x", source).unwrap_err();
        assert!(err.to_string().contains("pages/010-x.toml"));
    }

    #[test]
    fn framed_text_default_height() {
        let block = ContentBlock::FramedText {
            text: "hi".into(),
            height: None,
        };
        let html = render_block(&block, &no_dims()).into_string();
        assert!(html.contains("height: 200px;"));
    }

    #[test]
    fn quote_keeps_line_breaks() {
        let block = ContentBlock::Quote {
            quote: "line one\nline two".into(),
            cite: Some("Someone".into()),
        };
        let html = render_block(&block, &no_dims()).into_string();
        assert!(html.contains("line one<br>line two"));
        assert!(html.contains("<cite>— Someone</cite>"));
    }

    #[test]
    fn markdown_block_renders_html() {
        let block = ContentBlock::Markdown {
            content: "Some **bold** text".into(),
        };
        let html = render_block(&block, &no_dims()).into_string();
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn text_is_escaped() {
        let block = ContentBlock::Text {
            content: "<script>alert(1)</script>".into(),
        };
        let html = render_block(&block, &no_dims()).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn images_get_dimensions_when_readable() {
        let tmp = TempDir::new().unwrap();
        write_test_png(&tmp.path().join("assets/p.png"), 12, 34);
        let dims = DimensionCache::new(tmp.path());
        let block = ContentBlock::Image {
            src: "assets/p.png".into(),
            alt: "p".into(),
            caption: None,
            orientation: Some(Orientation::Portrait),
        };
        let html = render_block(&block, &dims).into_string();
        assert!(html.contains(r#"width="12""#));
        assert!(html.contains(r#"height="34""#));
        assert!(html.contains("inline-image--portrait"));
    }

    #[test]
    fn missing_image_renders_without_dimensions() {
        let block = ContentBlock::ImageNoBorder {
            src: "assets/gone.webp".into(),
            alt: "gone".into(),
            caption: Some("cap".into()),
        };
        let html = render_block(&block, &no_dims()).into_string();
        assert!(!html.contains("width="));
        assert!(html.contains("<figcaption>cap</figcaption>"));
    }

    #[test]
    fn spread_stack_clamps_columns_to_image_count() {
        let block = ContentBlock::ImageSpreadStack {
            images: vec![
                ImageRef {
                    src: "a".into(),
                    alt: "a".into(),
                    caption: None,
                },
                ImageRef {
                    src: "b".into(),
                    alt: "b".into(),
                    caption: None,
                },
            ],
            caption: None,
            rows: None,
            cols: None,
            gap: None,
        };
        let html = render_block(&block, &no_dims()).into_string();
        assert!(html.contains("repeat(2, 1fr)"));
        assert!(html.contains("repeat(1, auto)"));
    }

    #[test]
    fn stack_tilt_is_deterministic_and_bounded() {
        let a = stack_tilt("assets/x.webp", 0);
        assert_eq!(a, stack_tilt("assets/x.webp", 0));
        assert!(a.0.abs() >= 0.5 && a.0.abs() <= 1.5);
        assert!(a.1.abs() <= 1.0);
    }

    #[test]
    fn image_sources_cover_all_image_blocks() {
        let pages = sample_pages();
        let page = pages.get("modernism-photography").unwrap();
        let sources: Vec<_> = page.image_sources().collect();
        assert!(sources.contains(&"/assets/modernism-photography/eggleston.webp"));
        assert!(sources.contains(&"/assets/modernism-photography/phomo2-dark.webp"));
        assert!(!sources.iter().any(|s| s.ends_with(".mp4")));
    }
}
