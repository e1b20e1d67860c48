//! Capsule is the outfit composition engine behind a personal wardrobe catalogue.
//!
//! Users arrange photos of their clothing items on a free-form canvas, save the arrangement
//! as an outfit, and later reopen it for editing. This crate owns everything between the
//! gestures and the stored record:
//!
//! 1. **Edit**: [`CanvasState`] applies discrete [`CanvasEvent`]s to an ordered list of
//!    [`PlacedItem`]s (selection, z-order, drag/pinch/rotate with transient deltas).
//! 2. **Persist**: [`LayoutRecord`] is the JSON projection of a session; [`Outfit`] is the
//!    aggregate handed to an [`OutfitStore`] in one write.
//! 3. **Restore**: [`reconcile_outfit`] rebuilds a session against the live [`ItemCatalog`],
//!    skipping deleted items and placing layout-less members with a jittered fallback.
//! 4. **Snapshot**: [`SnapshotCompositor`] rasterizes the committed arrangement on the CPU
//!    and [`encode_png`] turns it into the preview stored with the outfit.
//!
//! [`CanvasController`] ties the four together for one editing session.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: jitter comes from a seeded [`Rng64`], and compositing has no hidden
//!   state, so the same session always yields the same bytes.
//! - **Committed only**: in-flight gesture deltas are display state and never reach a
//!   layout record or a snapshot.
#![forbid(unsafe_code)]

mod assets;
mod canvas;
mod catalog;
mod config;
mod foundation;
mod layout;
mod outfit;
mod render;
mod transform;

pub use assets::decode::{DecodedImage, decode_image};
pub use canvas::controller::{CanvasController, OutfitDraft, PickerEntry};
pub use canvas::placed::PlacedItem;
pub use canvas::state::{CanvasEvent, CanvasOutcome, CanvasState, Selection};
pub use catalog::ItemCatalog;
pub use catalog::memory::MemoryCatalog;
pub use catalog::model::{Category, ItemFilter, ItemRef, Season};
pub use config::{CanvasConfig, GesturePolicy};
pub use foundation::core::{
    Affine, Canvas, ItemId, OutfitId, PlacedItemId, Point, Rect, Rgba8, Size, Vec2,
};
pub use foundation::error::{CapsuleError, CapsuleResult};
pub use foundation::math::Rng64;
pub use layout::record::{LayoutEntry, LayoutRecord};
pub use layout::resolve::{fallback_layout, reconcile_outfit, resolve_layout};
pub use outfit::model::{Outfit, PREVIEW_ITEM_COUNT, normalize_notes};
pub use outfit::store::{FsOutfitStore, MemoryOutfitStore, OutfitStore};
pub use render::compositor::{SnapshotCompositor, SnapshotFrame};
pub use render::encode::encode_png;
pub use transform::placement::{GestureDelta, Transform, jitter_offset};
