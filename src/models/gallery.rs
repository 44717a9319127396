use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::timer::TimerId;

pub const ALL_FILTER: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub caption: String,
    /// Space-delimited category tags, e.g. `"hair braids"`.
    pub category: String,
}

impl GalleryItem {
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category.split_whitespace()
    }

    pub fn matches(&self, filter: &FilterTag) -> bool {
        match filter {
            FilterTag::All => true,
            FilterTag::Tag(tag) => self.categories().any(|c| c == tag),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GalleryCatalog {
    pub items: Vec<GalleryItem>,
}

impl GalleryCatalog {
    pub fn from_json(s: &str) -> Result<Self, AppError> {
        let catalog: GalleryCatalog = serde_json::from_str(s)?;
        for item in &catalog.items {
            if item.src.trim().is_empty() {
                return Err(AppError::Catalog(format!("gallery item {} has no image", item.id)));
            }
        }
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(include_str!("../../data/gallery.json"))
    }
}

/// The value carried by a filter control: the `all` sentinel or one tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FilterTag {
    #[default]
    All,
    Tag(String),
}

impl FilterTag {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL_FILTER {
            FilterTag::All
        } else {
            FilterTag::Tag(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterTag::All => ALL_FILTER,
            FilterTag::Tag(tag) => tag,
        }
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FilterTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FilterTag::parse(&s))
    }
}

/// Where a gallery item is in its show/hide transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemVisibility {
    Hidden,
    /// In the layout, waiting for the fade-in to start.
    Revealing(TimerId),
    Visible,
    /// Fading out, still occupying layout until the timer fires.
    FadingOut(TimerId),
}

impl ItemVisibility {
    /// True when the item is, or is about to be, shown.
    pub fn is_shown(&self) -> bool {
        matches!(self, ItemVisibility::Revealing(_) | ItemVisibility::Visible)
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        match self {
            ItemVisibility::Revealing(id) | ItemVisibility::FadingOut(id) => Some(*id),
            _ => None,
        }
    }
}

/// Opacity/scale pair applied to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Appearance {
    /// opacity 1, scale 1
    Shown,
    /// opacity 0, scale 0.8
    Receded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lightbox-{}", self.0)
    }
}

/// The lightbox node handed to the document for mounting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayNode {
    pub id: OverlayId,
    pub src: String,
    pub alt: String,
    pub caption: String,
}

impl OverlayNode {
    pub fn for_item(id: OverlayId, item: &GalleryItem) -> Self {
        Self {
            id,
            src: item.src.clone(),
            alt: item.alt.clone(),
            caption: item.caption.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayAnimation {
    FadeIn,
    FadeOut,
}

impl OverlayAnimation {
    pub fn css(&self, duration: Duration) -> String {
        let name = match self {
            OverlayAnimation::FadeIn => "fadeIn",
            OverlayAnimation::FadeOut => "fadeOut",
        };
        format!("{name} {}s ease", duration.as_secs_f64())
    }
}

/// What a click inside the overlay landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayTarget {
    Backdrop,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightboxPhase {
    Opening,
    Open,
    Closing,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: &str) -> GalleryItem {
        GalleryItem {
            id: "x".to_string(),
            src: "x.jpg".to_string(),
            alt: String::new(),
            caption: String::new(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(item("").matches(&FilterTag::All));
        assert!(item("nails").matches(&FilterTag::All));
    }

    #[test]
    fn test_tag_matches_whole_words_only() {
        let it = item("hair  braids");
        assert!(it.matches(&FilterTag::parse("braids")));
        assert!(it.matches(&FilterTag::parse("hair")));
        assert!(!it.matches(&FilterTag::parse("braid")));
        assert!(!it.matches(&FilterTag::parse("nails")));
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(FilterTag::parse("all"), FilterTag::All);
        assert_eq!(FilterTag::parse(""), FilterTag::All);
        assert_eq!(FilterTag::parse("nails"), FilterTag::Tag("nails".to_string()));
    }

    #[test]
    fn test_animation_css() {
        let css = OverlayAnimation::FadeOut.css(Duration::from_millis(300));
        assert_eq!(css, "fadeOut 0.3s ease");
        let css = OverlayAnimation::FadeIn.css(Duration::from_millis(250));
        assert_eq!(css, "fadeIn 0.25s ease");
    }

    #[test]
    fn test_builtin_gallery_loads() {
        let catalog = GalleryCatalog::builtin().unwrap();
        assert!(!catalog.items.is_empty());
    }
}
