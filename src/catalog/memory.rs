use crate::{
    catalog::{
        ItemCatalog,
        model::{ItemFilter, ItemRef},
    },
    foundation::core::ItemId,
};

/// In-process catalog. Queries return newest items first, like the picker grid.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    items: Vec<ItemRef>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace (by id).
    pub fn insert(&mut self, item: ItemRef) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: ItemId) -> Option<ItemRef> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ItemRef> for MemoryCatalog {
    fn from_iter<I: IntoIterator<Item = ItemRef>>(iter: I) -> Self {
        let mut out = Self::new();
        for item in iter {
            out.insert(item);
        }
        out
    }
}

impl ItemCatalog for MemoryCatalog {
    fn lookup_by_id(&self, id: ItemId) -> Option<ItemRef> {
        self.items.iter().find(|i| i.id == id).cloned()
    }

    fn query(&self, filter: &ItemFilter) -> Vec<ItemRef> {
        let mut out: Vec<ItemRef> = self
            .items
            .iter()
            .rev()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        // Stable, so equal timestamps stay newest-inserted first.
        out.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/memory.rs"]
mod tests;
