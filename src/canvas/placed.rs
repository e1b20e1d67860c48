use crate::{
    catalog::model::ItemRef,
    foundation::core::{ItemId, PlacedItemId},
    transform::placement::Transform,
};

/// One catalog item placed on the canvas during an editing session.
#[derive(Clone, Debug)]
pub struct PlacedItem {
    /// Session-local identity; not persisted.
    pub id: PlacedItemId,
    pub item: ItemRef,
    /// Committed placement. In-flight gesture deltas live in the canvas state, never here.
    pub transform: Transform,
}

impl PlacedItem {
    pub fn new(item: ItemRef, transform: Transform) -> Self {
        Self {
            id: PlacedItemId::new(),
            item,
            transform,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item.id
    }
}
