use std::collections::HashSet;

use crate::{
    canvas::placed::PlacedItem,
    catalog::ItemCatalog,
    foundation::{core::ItemId, math::Rng64},
    layout::record::LayoutRecord,
    outfit::model::Outfit,
    transform::placement::{Transform, jitter_offset},
};

/// Rebuild placed items from a persisted layout against the live catalog.
///
/// Entries are taken in `zIndex` order. Entries whose item no longer exists are skipped,
/// as are repeats of an item already placed. Never fails: a stale record just yields a
/// shorter list.
pub fn resolve_layout<C: ItemCatalog + ?Sized>(
    record: &LayoutRecord,
    catalog: &C,
) -> Vec<PlacedItem> {
    resolve_entries(record, catalog, |_| true)
}

/// Fresh placements for outfits without positional data: every item that still exists,
/// jittered around center at identity scale and rotation.
pub fn fallback_layout<C: ItemCatalog + ?Sized>(
    item_ids: &[ItemId],
    catalog: &C,
    rng: &mut Rng64,
    jitter_radius: f64,
) -> Vec<PlacedItem> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(item_ids.len());
    for &id in item_ids {
        if !seen.insert(id) {
            continue;
        }
        match catalog.lookup_by_id(id) {
            Some(item) => {
                let offset = jitter_offset(rng, jitter_radius);
                out.push(PlacedItem::new(item, Transform::at_offset(offset)));
            }
            None => tracing::debug!(item = %id, "outfit member no longer in catalog"),
        }
    }
    out
}

/// Reconstruct an editing session's items for a persisted outfit.
///
/// `item_ids` decides membership: layout entries for non-members are dropped, and members
/// the layout does not mention are appended with fallback placement.
#[tracing::instrument(skip(outfit, catalog, rng), fields(outfit = %outfit.id))]
pub fn reconcile_outfit<C: ItemCatalog + ?Sized>(
    outfit: &Outfit,
    catalog: &C,
    rng: &mut Rng64,
    jitter_radius: f64,
) -> Vec<PlacedItem> {
    let members: HashSet<ItemId> = outfit.item_ids.iter().copied().collect();

    let mut out = match &outfit.layout_record {
        Some(record) if !record.is_empty() => {
            resolve_entries(record, catalog, |id| members.contains(&id))
        }
        _ => Vec::new(),
    };

    let placed: HashSet<ItemId> = out.iter().map(PlacedItem::item_id).collect();
    let missing: Vec<ItemId> = outfit
        .item_ids
        .iter()
        .copied()
        .filter(|id| !placed.contains(id))
        .collect();
    out.extend(fallback_layout(&missing, catalog, rng, jitter_radius));
    out
}

fn resolve_entries<C, F>(record: &LayoutRecord, catalog: &C, admit: F) -> Vec<PlacedItem>
where
    C: ItemCatalog + ?Sized,
    F: Fn(ItemId) -> bool,
{
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(record.len());
    for entry in record.render_order() {
        if !admit(entry.item_id) {
            tracing::debug!(item = %entry.item_id, "layout entry is not an outfit member");
            continue;
        }
        if !seen.insert(entry.item_id) {
            tracing::debug!(item = %entry.item_id, "duplicate layout entry");
            continue;
        }
        let Some(item) = catalog.lookup_by_id(entry.item_id) else {
            tracing::debug!(item = %entry.item_id, "layout entry references a deleted item");
            continue;
        };
        out.push(PlacedItem::new(item, entry.transform()));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolve.rs"]
mod tests;
