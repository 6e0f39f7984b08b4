//! `NNN-slug` file naming for content pages.
//!
//! Page files under `pages/` carry an optional numeric prefix that fixes
//! their order in listings; the rest of the stem is the URL slug:
//!
//! - `010-local-minima.toml` → order 10, slug `local-minima`
//! - `about.toml` → no order, slug `about` (sorted after numbered pages)
//!
//! The fallback title (used when the page file has no `title`) is the slug
//! with dashes turned into spaces.

/// Parsed page file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStem {
    pub order: Option<u32>,
    /// Empty for number-only stems like `010`.
    pub slug: String,
}

impl PageStem {
    pub fn fallback_title(&self) -> String {
        self.slug.replace('-', " ")
    }

    /// Sort key placing numbered pages first, in numeric order.
    pub fn sort_key(&self) -> (u32, &str) {
        (self.order.unwrap_or(u32::MAX), self.slug.as_str())
    }
}

pub fn parse_page_stem(stem: &str) -> PageStem {
    if let Some((prefix, rest)) = stem.split_once('-') {
        if let Ok(order) = prefix.parse::<u32>() {
            return PageStem {
                order: Some(order),
                slug: rest.to_string(),
            };
        }
    }
    match stem.parse::<u32>() {
        Ok(order) => PageStem {
            order: Some(order),
            slug: String::new(),
        },
        Err(_) => PageStem {
            order: None,
            slug: stem.to_string(),
        },
    }
}

/// Keys that can appear as a URL path segment without escaping.
pub fn is_url_safe(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
