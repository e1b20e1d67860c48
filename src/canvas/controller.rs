use std::collections::BTreeSet;

use crate::{
    canvas::state::{CanvasEvent, CanvasOutcome, CanvasState},
    catalog::{
        ItemCatalog,
        model::{ItemFilter, ItemRef, Season},
    },
    config::CanvasConfig,
    foundation::core::{ItemId, OutfitId, PlacedItemId},
    foundation::error::{CapsuleError, CapsuleResult},
    foundation::math::Rng64,
    layout::{record::LayoutRecord, resolve::reconcile_outfit},
    outfit::{
        model::{Outfit, normalize_notes},
        store::OutfitStore,
    },
    render::compositor::SnapshotCompositor,
    transform::placement::Transform,
};

/// User-entered outfit metadata collected by the save sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutfitDraft {
    pub seasons: BTreeSet<Season>,
    pub notes: Option<String>,
}

/// One picker cell: a catalog item and whether it is already on the canvas.
#[derive(Clone, Debug)]
pub struct PickerEntry {
    pub item: ItemRef,
    pub placed: bool,
}

/// Owns one editing session: the canvas state machine plus save/load orchestration.
#[derive(Clone, Debug)]
pub struct CanvasController {
    state: CanvasState,
    compositor: SnapshotCompositor,
    /// Outfit being edited, or the last one this session saved.
    editing: Option<Outfit>,
}

impl CanvasController {
    /// Fresh session for a new outfit.
    pub fn new(config: CanvasConfig, seed: u64) -> CapsuleResult<Self> {
        config.validate()?;
        Ok(Self {
            compositor: SnapshotCompositor::new(&config),
            state: CanvasState::new(config, seed),
            editing: None,
        })
    }

    /// Session re-editing a persisted outfit, reconciled against the live catalog.
    #[tracing::instrument(skip(outfit, catalog, config), fields(outfit = %outfit.id))]
    pub fn from_outfit<C: ItemCatalog + ?Sized>(
        outfit: &Outfit,
        catalog: &C,
        config: CanvasConfig,
        seed: u64,
    ) -> CapsuleResult<Self> {
        config.validate()?;
        let mut rng = Rng64::new(seed);
        let items = reconcile_outfit(outfit, catalog, &mut rng, config.jitter_radius);
        tracing::debug!(
            members = outfit.item_ids.len(),
            restored = items.len(),
            "outfit reconciled"
        );
        Ok(Self {
            compositor: SnapshotCompositor::new(&config),
            state: CanvasState::with_items(config, rng.next_u64(), items),
            editing: Some(outfit.clone()),
        })
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn editing(&self) -> Option<&Outfit> {
        self.editing.as_ref()
    }

    pub fn handle(&mut self, event: CanvasEvent) -> CapsuleResult<CanvasOutcome> {
        self.state.apply(event)
    }

    /// Look the item up in the catalog and place it.
    pub fn add_from_catalog<C: ItemCatalog + ?Sized>(
        &mut self,
        item_id: ItemId,
        catalog: &C,
    ) -> CapsuleResult<CanvasOutcome> {
        let item = catalog
            .lookup_by_id(item_id)
            .ok_or_else(|| CapsuleError::validation(format!("item {item_id} is not in the catalog")))?;
        self.state.apply(CanvasEvent::Add(item))
    }

    /// Catalog query for the picker, flagging items that cannot be added again.
    pub fn picker<C: ItemCatalog + ?Sized>(
        &self,
        catalog: &C,
        filter: &ItemFilter,
    ) -> Vec<PickerEntry> {
        catalog
            .query(filter)
            .into_iter()
            .map(|item| PickerEntry {
                placed: self.state.contains_item(item.id),
                item,
            })
            .collect()
    }

    pub fn live_transform(&self, id: PlacedItemId) -> Option<Transform> {
        self.state.live_transform(id)
    }

    /// Save-sheet defaults: the edited outfit's seasons and notes, or empty.
    pub fn draft(&self) -> OutfitDraft {
        self.editing
            .as_ref()
            .map(|o| OutfitDraft {
                seasons: o.seasons.clone(),
                notes: o.notes.clone(),
            })
            .unwrap_or_default()
    }

    /// Distill the session into a complete outfit aggregate without persisting it.
    ///
    /// Only committed transforms are read; in-flight gesture deltas never reach the output.
    pub fn build_outfit(&self, draft: OutfitDraft) -> CapsuleResult<Outfit> {
        let items = self.state.items();
        if items.is_empty() {
            return Err(CapsuleError::validation(
                "an outfit needs at least one item on the canvas",
            ));
        }

        let layout = LayoutRecord::from_placed(items);
        layout.ensure_encodable()?;
        let snapshot = self.compositor.composite_png(items)?;

        let (id, created_at_ms, archived, favorite) = match &self.editing {
            Some(o) => (o.id, o.created_at_ms, o.archived, o.favorite),
            None => (OutfitId::new(), now_ms(), false, false),
        };

        Ok(Outfit {
            id,
            item_ids: items.iter().map(|p| p.item_id()).collect(),
            layout_record: Some(layout),
            snapshot: Some(snapshot),
            seasons: draft.seasons,
            notes: normalize_notes(draft.notes),
            archived,
            favorite,
            created_at_ms,
        })
    }

    /// Build the aggregate and hand it to the store in one write.
    ///
    /// Nothing is written when serialization, compositing or encoding fails. On success the
    /// session keeps editing the saved outfit, so saving again updates it in place.
    #[tracing::instrument(skip_all, fields(items = self.state.items().len()))]
    pub fn save<S: OutfitStore + ?Sized>(
        &mut self,
        draft: OutfitDraft,
        store: &mut S,
    ) -> CapsuleResult<Outfit> {
        let outfit = self.build_outfit(draft)?;
        store.upsert_outfit(&outfit)?;
        tracing::debug!(outfit = %outfit.id, "outfit committed");
        self.editing = Some(outfit.clone());
        Ok(outfit)
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/controller.rs"]
mod tests;
