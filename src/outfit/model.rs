use std::collections::BTreeSet;

use crate::{
    catalog::model::{Season, deserialize_seasons_lenient},
    foundation::core::{ItemId, OutfitId},
    foundation::error::{CapsuleError, CapsuleResult},
    layout::record::{LayoutRecord, deserialize_layout_lenient},
};

/// Number of members shown in the grid preview of an outfit without a snapshot.
pub const PREVIEW_ITEM_COUNT: usize = 4;

/// Persisted outfit aggregate. Always written as a whole.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: OutfitId,
    /// Membership, independent of the layout.
    pub item_ids: Vec<ItemId>,
    /// Positional metadata; absent for outfits saved before layouts existed. Damaged entries
    /// are dropped on read rather than failing the outfit.
    #[serde(default, deserialize_with = "deserialize_layout_lenient")]
    pub layout_record: Option<LayoutRecord>,
    /// PNG preview rendered at save time. Not regenerated when item photos change.
    ///
    /// Stored as a base64 string; records holding a plain byte array still read.
    #[serde(default, with = "snapshot_base64")]
    pub snapshot: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_seasons_lenient")]
    pub seasons: BTreeSet<Season>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub created_at_ms: u64,
}

impl Outfit {
    /// Bare outfit with membership only, as legacy records look.
    pub fn new(item_ids: Vec<ItemId>) -> Self {
        Self {
            id: OutfitId::new(),
            item_ids,
            layout_record: None,
            snapshot: None,
            seasons: BTreeSet::new(),
            notes: None,
            archived: false,
            favorite: false,
            created_at_ms: 0,
        }
    }

    pub fn contains_item(&self, id: ItemId) -> bool {
        self.item_ids.contains(&id)
    }

    /// Members to show as a grid when there is no snapshot.
    pub fn preview_item_ids(&self) -> &[ItemId] {
        let n = self.item_ids.len().min(PREVIEW_ITEM_COUNT);
        &self.item_ids[..n]
    }

    pub fn to_json(&self) -> CapsuleResult<String> {
        if let Some(layout) = &self.layout_record {
            layout.ensure_encodable()?;
        }
        serde_json::to_string_pretty(self)
            .map_err(|e| CapsuleError::serde(format!("encode outfit {}: {e}", self.id)))
    }

    pub fn from_json(s: &str) -> CapsuleResult<Self> {
        serde_json::from_str(s).map_err(|e| CapsuleError::serde(format!("decode outfit: {e}")))
    }
}

/// Trims user notes; blank notes are stored as absent.
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}


mod snapshot_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

    pub(super) fn serialize<S>(snapshot: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match snapshot {
            Some(bytes) => ser.serialize_some(&BASE64_STANDARD.encode(bytes)),
            None => ser.serialize_none(),
        }
    }

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Encoded(String),
        Bytes(Vec<u8>),
    }

    /// A snapshot that does not decode reads as absent; it is derived data.
    pub(super) fn deserialize<'de, D>(de: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let stored = <Option<serde_json::Value> as serde::Deserialize>::deserialize(de)?;
        let Some(value) = stored.filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        match serde_json::from_value::<Stored>(value) {
            Ok(Stored::Bytes(bytes)) => Ok(Some(bytes)),
            Ok(Stored::Encoded(text)) => match BASE64_STANDARD.decode(text.as_bytes()) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(err) => {
                    tracing::warn!(error = %err, "snapshot is not valid base64; ignored");
                    Ok(None)
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "snapshot has an unexpected shape; ignored");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/outfit/model.rs"]
mod tests;
