use std::{collections::BTreeSet, fmt, str::FromStr, sync::Arc};

use crate::foundation::{
    core::ItemId,
    error::{CapsuleError, CapsuleResult},
};

/// Top-level clothing category. The persisted form is the display string ("Full Body").
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Category {
    #[serde(rename = "Top")]
    Top,
    #[serde(rename = "Bottom")]
    Bottom,
    #[serde(rename = "Full Body")]
    FullBody,
    #[serde(rename = "Footwear")]
    Footwear,
    #[serde(rename = "Accessory")]
    Accessory,
    #[serde(rename = "Outerwear")]
    Outerwear,
    #[serde(rename = "Underwear")]
    Underwear,
    #[serde(rename = "Nightwear")]
    Nightwear,
    #[serde(rename = "Sport")]
    Sport,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Top,
        Category::Bottom,
        Category::FullBody,
        Category::Footwear,
        Category::Accessory,
        Category::Outerwear,
        Category::Underwear,
        Category::Nightwear,
        Category::Sport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Top => "Top",
            Category::Bottom => "Bottom",
            Category::FullBody => "Full Body",
            Category::Footwear => "Footwear",
            Category::Accessory => "Accessory",
            Category::Outerwear => "Outerwear",
            Category::Underwear => "Underwear",
            Category::Nightwear => "Nightwear",
            Category::Sport => "Sport",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CapsuleError;

    fn from_str(s: &str) -> CapsuleResult<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CapsuleError::validation(format!("unknown category '{s}'")))
    }
}

/// Season tag attached to outfits.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Season {
    #[serde(rename = "Spring")]
    Spring,
    #[serde(rename = "Summer")]
    Summer,
    #[serde(rename = "Autumn")]
    Autumn,
    #[serde(rename = "Winter")]
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = CapsuleError;

    fn from_str(s: &str) -> CapsuleResult<Self> {
        Season::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CapsuleError::validation(format!("unknown season '{s}'")))
    }
}

/// Reads a season list, dropping names this build does not know instead of failing the record.
pub(crate) fn deserialize_seasons_lenient<'de, D>(de: D) -> Result<BTreeSet<Season>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <Vec<String> as serde::Deserialize>::deserialize(de)?;
    Ok(raw.iter().filter_map(|s| s.parse().ok()).collect())
}

/// Catalog item as seen by the composition engine. Owned by the catalog; never mutated here.
#[derive(Clone)]
pub struct ItemRef {
    pub id: ItemId,
    pub category: Category,
    pub brand: Option<String>,
    pub archived: bool,
    /// Encoded photo (PNG/JPEG/...). Items without a photo still place, but do not render.
    pub image: Option<Arc<[u8]>>,
    pub created_at_ms: u64,
}

impl fmt::Debug for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRef")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("brand", &self.brand)
            .field("archived", &self.archived)
            .field("image_len", &self.image.as_ref().map(|b| b.len()))
            .field("created_at_ms", &self.created_at_ms)
            .finish()
    }
}

impl ItemRef {
    pub fn new(id: ItemId, image: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id,
            category: Category::Top,
            brand: None,
            archived: false,
            image: Some(image.into()),
            created_at_ms: 0,
        }
    }

    pub fn without_image(id: ItemId) -> Self {
        Self {
            image: None,
            ..Self::new(id, Vec::new())
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_created_at_ms(mut self, created_at_ms: u64) -> Self {
        self.created_at_ms = created_at_ms;
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    pub fn image_bytes(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }
}

/// Picker query. Empty filter matches every non-archived item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<Category>,
    /// Case-insensitive exact brand match.
    pub brand: Option<String>,
    pub include_archived: bool,
}

impl ItemFilter {
    pub fn category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn matches(&self, item: &ItemRef) -> bool {
        if item.archived && !self.include_archived {
            return false;
        }
        if self.category.is_some_and(|c| c != item.category) {
            return false;
        }
        match (&self.brand, &item.brand) {
            (None, _) => true,
            (Some(want), Some(have)) => want.trim().eq_ignore_ascii_case(have.trim()),
            (Some(_), None) => false,
        }
    }
}
