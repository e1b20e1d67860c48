use crate::{
    canvas::placed::PlacedItem,
    foundation::core::{ItemId, Vec2},
    foundation::error::{CapsuleError, CapsuleResult},
    transform::placement::Transform,
};

/// Persisted projection of one placed item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub item_id: ItemId,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation_degrees: f64,
    /// Render priority. Written as the list index; records without it read as 0.
    #[serde(default)]
    pub z_index: i64,
}

impl LayoutEntry {
    pub fn from_placed(item: &PlacedItem, z_index: i64) -> Self {
        let t = item.transform;
        Self {
            item_id: item.item_id(),
            x: t.offset.x,
            y: t.offset.y,
            scale: t.scale,
            rotation_degrees: t.rotation_deg,
            z_index,
        }
    }

    /// Transform described by this entry.
    ///
    /// A stored scale that is not a positive finite number reads as 1.0, and non-finite
    /// offsets or rotations read as 0, so one damaged field never loses the item.
    pub fn transform(&self) -> Transform {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        Transform {
            offset: Vec2::new(finite_or_zero(self.x), finite_or_zero(self.y)),
            scale,
            rotation_deg: finite_or_zero(self.rotation_degrees),
        }
    }

    fn ensure_encodable(&self) -> CapsuleResult<()> {
        let fields = [
            ("x", self.x),
            ("y", self.y),
            ("scale", self.scale),
            ("rotationDegrees", self.rotation_degrees),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(CapsuleError::serde(format!(
                    "layout entry for item {} has non-finite {name}",
                    self.item_id
                )));
            }
        }
        if self.scale <= 0.0 {
            return Err(CapsuleError::serde(format!(
                "layout entry for item {} has non-positive scale",
                self.item_id
            )));
        }
        Ok(())
    }
}

/// Ordered layout of an outfit; lower indices are drawn first.
///
/// On the wire this is a bare JSON array of entries.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayoutRecord {
    pub entries: Vec<LayoutEntry>,
}

impl LayoutRecord {
    /// Serialize a session's placed items, in list order.
    pub fn from_placed(items: &[PlacedItem]) -> Self {
        let entries = items
            .iter()
            .enumerate()
            .map(|(idx, item)| LayoutEntry::from_placed(item, idx as i64))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.entries.iter().map(|e| e.item_id).collect()
    }

    /// Entries sorted by `zIndex`; ties keep their stored order.
    pub fn render_order(&self) -> Vec<&LayoutEntry> {
        let mut out: Vec<&LayoutEntry> = self.entries.iter().collect();
        out.sort_by_key(|e| e.z_index);
        out
    }

    /// JSON has no encoding for NaN or infinities, so those fail here instead of being
    /// silently written as `null`.
    pub fn ensure_encodable(&self) -> CapsuleResult<()> {
        self.entries.iter().try_for_each(LayoutEntry::ensure_encodable)
    }

    pub fn to_json(&self) -> CapsuleResult<String> {
        self.ensure_encodable()?;
        serde_json::to_string(self)
            .map_err(|e| CapsuleError::serde(format!("encode layout record: {e}")))
    }

    pub fn from_json(s: &str) -> CapsuleResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| CapsuleError::serde(format!("decode layout record: {e}")))
    }
}

/// Reads an outfit's stored layout without letting one damaged entry sink the record.
///
/// Entries that do not decode are dropped; a value that is not an array at all reads as
/// no layout, which sends the outfit down the fallback placement path.
pub(crate) fn deserialize_layout_lenient<'de, D>(
    de: D,
) -> Result<Option<LayoutRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <Option<serde_json::Value> as serde::Deserialize>::deserialize(de)?;
    let entries = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Array(entries)) => entries,
        Some(other) => {
            tracing::warn!(kind = json_kind(&other), "layout record is not an array; ignored");
            return Ok(None);
        }
    };

    let entries = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, v)| match serde_json::from_value::<LayoutEntry>(v) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(index = idx, error = %err, "layout entry unreadable; skipped");
                None
            }
        })
        .collect();
    Ok(Some(LayoutRecord { entries }))
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/record.rs"]
mod tests;
