pub(crate) mod memory;
pub(crate) mod model;

use crate::{
    catalog::model::{ItemFilter, ItemRef},
    foundation::core::ItemId,
};

/// Read-only view of the item catalog, provided by the host app.
pub trait ItemCatalog {
    /// Live lookup; `None` once the item has been deleted.
    fn lookup_by_id(&self, id: ItemId) -> Option<ItemRef>;

    /// Items matching `filter`, in picker order.
    fn query(&self, filter: &ItemFilter) -> Vec<ItemRef>;
}
