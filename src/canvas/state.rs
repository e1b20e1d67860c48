//! The canvas editing state machine.
//!
//! Input arrives as discrete [`CanvasEvent`]s, independent of any gesture-recognizer API.
//! [`CanvasState::apply`] is the only transition function: an accepted event mutates the
//! state and reports a [`CanvasOutcome`]; a rejected one returns an error and changes
//! nothing.

use std::collections::HashSet;

use crate::{
    canvas::placed::PlacedItem,
    catalog::model::ItemRef,
    config::CanvasConfig,
    foundation::core::{ItemId, PlacedItemId, Vec2},
    foundation::error::{CapsuleError, CapsuleResult},
    foundation::math::Rng64,
    transform::placement::{GestureDelta, Transform, check_scale_factor, jitter_offset},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(PlacedItemId),
}

/// Discrete canvas input.
///
/// `*Changed` events carry the gesture's cumulative value since it began (translation,
/// factor relative to start, degrees); `*Ended` carries the final value and commits it.
#[derive(Clone, Debug)]
pub enum CanvasEvent {
    TapBackground,
    SelectItem(PlacedItemId),
    DragChanged {
        id: PlacedItemId,
        translation: Vec2,
    },
    DragEnded {
        id: PlacedItemId,
        translation: Vec2,
    },
    PinchChanged {
        id: PlacedItemId,
        factor: f64,
    },
    PinchEnded {
        id: PlacedItemId,
        factor: f64,
    },
    RotateChanged {
        id: PlacedItemId,
        degrees: f64,
    },
    RotateEnded {
        id: PlacedItemId,
        degrees: f64,
    },
    Delete(PlacedItemId),
    Add(ItemRef),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasOutcome {
    Unchanged,
    Selected(PlacedItemId),
    Deselected,
    /// Transient or committed transform of this item changed.
    Updated(PlacedItemId),
    /// A pinch ended below the floor; the presentation should animate `from` back to `to`.
    ScaleSnapped {
        id: PlacedItemId,
        from: f64,
        to: f64,
    },
    Added(PlacedItemId),
    Removed(PlacedItemId),
}

#[derive(Clone, Copy, Debug)]
struct ActiveGesture {
    target: PlacedItemId,
    delta: GestureDelta,
}

#[derive(Clone, Debug)]
pub struct CanvasState {
    config: CanvasConfig,
    items: Vec<PlacedItem>,
    selection: Selection,
    gesture: Option<ActiveGesture>,
    rng: Rng64,
}

impl CanvasState {
    /// Empty canvas. `seed` drives the jitter of added items.
    pub fn new(config: CanvasConfig, seed: u64) -> Self {
        Self {
            config,
            items: Vec::new(),
            selection: Selection::Idle,
            gesture: None,
            rng: Rng64::new(seed),
        }
    }

    /// Canvas pre-populated with already-placed items; later repeats of an item are dropped.
    pub fn with_items(config: CanvasConfig, seed: u64, items: Vec<PlacedItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|p| seen.insert(p.item_id()))
            .collect();
        Self {
            items,
            ..Self::new(config, seed)
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Placed items in z-order, bottom first.
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: PlacedItemId) -> Option<&PlacedItem> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn selected_item(&self) -> Option<&PlacedItem> {
        match self.selection {
            Selection::Idle => None,
            Selection::Selected(id) => self.get(id),
        }
    }

    pub fn contains_item(&self, item: ItemId) -> bool {
        self.items.iter().any(|p| p.item_id() == item)
    }

    /// Committed transform with any in-flight gesture on this item folded in.
    pub fn live_transform(&self, id: PlacedItemId) -> Option<Transform> {
        let placed = self.get(id)?;
        Some(match self.gesture {
            Some(g) if g.target == id => placed.transform.composed_with(&g.delta),
            _ => placed.transform,
        })
    }

    pub fn apply(&mut self, event: CanvasEvent) -> CapsuleResult<CanvasOutcome> {
        match event {
            CanvasEvent::TapBackground => Ok(self.deselect()),
            CanvasEvent::SelectItem(id) => self.bring_to_front(id),
            CanvasEvent::DragChanged { id, translation } => {
                check_translation(translation)?;
                self.index_of(id)?;
                self.selection = Selection::Selected(id);
                self.delta_for(id).translation = translation;
                Ok(CanvasOutcome::Updated(id))
            }
            CanvasEvent::DragEnded { id, translation } => {
                let idx = self.index_of(id)?;
                self.items[idx]
                    .transform
                    .apply_translation_delta(translation.x, translation.y)?;
                self.selection = Selection::Selected(id);
                self.finish_delta(id, |d| d.translation = Vec2::ZERO);
                Ok(CanvasOutcome::Updated(id))
            }
            CanvasEvent::PinchChanged { id, factor } => {
                check_scale_factor(factor)?;
                self.index_of(id)?;
                self.selection = Selection::Selected(id);
                self.delta_for(id).scale_factor = factor;
                Ok(CanvasOutcome::Updated(id))
            }
            CanvasEvent::PinchEnded { id, factor } => {
                let idx = self.index_of(id)?;
                let policy = self.config.gesture;
                let transform = &mut self.items[idx].transform;
                transform.apply_scale_delta(factor)?;
                let snapped = transform.settle(&policy);
                let to = transform.scale;
                self.selection = Selection::Selected(id);
                self.finish_delta(id, |d| d.scale_factor = 1.0);
                Ok(match snapped {
                    Some(from) => CanvasOutcome::ScaleSnapped { id, from, to },
                    None => CanvasOutcome::Updated(id),
                })
            }
            CanvasEvent::RotateChanged { id, degrees } => {
                if !degrees.is_finite() {
                    return Err(CapsuleError::validation("rotation must be finite"));
                }
                self.index_of(id)?;
                self.selection = Selection::Selected(id);
                self.delta_for(id).rotation_deg = degrees;
                Ok(CanvasOutcome::Updated(id))
            }
            CanvasEvent::RotateEnded { id, degrees } => {
                let idx = self.index_of(id)?;
                self.items[idx].transform.apply_rotation_delta(degrees)?;
                self.selection = Selection::Selected(id);
                self.finish_delta(id, |d| d.rotation_deg = 0.0);
                Ok(CanvasOutcome::Updated(id))
            }
            CanvasEvent::Delete(id) => self.delete(id),
            CanvasEvent::Add(item) => self.add(item),
        }
    }

    fn deselect(&mut self) -> CanvasOutcome {
        match self.selection {
            Selection::Idle => CanvasOutcome::Unchanged,
            Selection::Selected(_) => {
                self.selection = Selection::Idle;
                CanvasOutcome::Deselected
            }
        }
    }

    fn bring_to_front(&mut self, id: PlacedItemId) -> CapsuleResult<CanvasOutcome> {
        let idx = self.index_of(id)?;
        let item = self.items.remove(idx);
        self.items.push(item);
        self.selection = Selection::Selected(id);
        Ok(CanvasOutcome::Selected(id))
    }

    fn delete(&mut self, id: PlacedItemId) -> CapsuleResult<CanvasOutcome> {
        if self.selection != Selection::Selected(id) {
            return Err(CapsuleError::validation(format!(
                "placed item {id} must be selected before it can be deleted"
            )));
        }
        let idx = self.index_of(id)?;
        self.items.remove(idx);
        if self.gesture.is_some_and(|g| g.target == id) {
            self.gesture = None;
        }
        self.selection = Selection::Idle;
        Ok(CanvasOutcome::Removed(id))
    }

    fn add(&mut self, item: ItemRef) -> CapsuleResult<CanvasOutcome> {
        if self.contains_item(item.id) {
            return Err(CapsuleError::validation(format!(
                "item {} is already on the canvas",
                item.id
            )));
        }
        let offset = jitter_offset(&mut self.rng, self.config.jitter_radius);
        let placed = PlacedItem::new(item, Transform::at_offset(offset));
        let id = placed.id;
        self.items.push(placed);
        self.selection = Selection::Selected(id);
        Ok(CanvasOutcome::Added(id))
    }

    fn index_of(&self, id: PlacedItemId) -> CapsuleResult<usize> {
        self.items
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CapsuleError::validation(format!("no placed item {id}")))
    }

    /// In-flight delta for `id`. Deltas of a gesture on another item that never ended are
    /// discarded; they were never committed.
    fn delta_for(&mut self, id: PlacedItemId) -> &mut GestureDelta {
        if !self.gesture.is_some_and(|g| g.target == id) {
            self.gesture = None;
        }
        let gesture = self.gesture.get_or_insert(ActiveGesture {
            target: id,
            delta: GestureDelta::default(),
        });
        &mut gesture.delta
    }

    fn finish_delta(&mut self, id: PlacedItemId, reset: impl FnOnce(&mut GestureDelta)) {
        let Some(g) = self.gesture.as_mut().filter(|g| g.target == id) else {
            return;
        };
        reset(&mut g.delta);
        if g.delta.is_identity() {
            self.gesture = None;
        }
    }
}

fn check_translation(v: Vec2) -> CapsuleResult<()> {
    if !(v.x.is_finite() && v.y.is_finite()) {
        return Err(CapsuleError::validation("translation must be finite"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/state.rs"]
mod tests;
