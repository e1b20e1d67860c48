use super::*;
use crate::{
    catalog::{memory::MemoryCatalog, model::ItemRef},
    foundation::core::Vec2,
    layout::record::LayoutEntry,
};

fn catalog_of(n: usize) -> (MemoryCatalog, Vec<ItemId>) {
    let items: Vec<ItemRef> = (0..n)
        .map(|_| ItemRef::without_image(ItemId::new()))
        .collect();
    let ids = items.iter().map(|i| i.id).collect();
    (items.into_iter().collect(), ids)
}

fn layout_for(ids: &[ItemId]) -> Vec<PlacedItem> {
    ids.iter()
        .enumerate()
        .map(|(i, &id)| {
            let mut t = Transform::at_offset(Vec2::new(10.0 * i as f64, -5.0 * i as f64));
            t.scale = 1.0 + i as f64 * 0.5;
            t.rotation_deg = 12.0 * i as f64;
            PlacedItem::new(ItemRef::without_image(id), t)
        })
        .collect()
}

fn summary(items: &[PlacedItem]) -> Vec<(ItemId, Transform)> {
    items.iter().map(|p| (p.item_id(), p.transform)).collect()
}

#[test]
fn resolve_round_trips_order_and_transforms() {
    let (cat, ids) = catalog_of(3);
    let placed = layout_for(&ids);
    let record = LayoutRecord::from_placed(&placed);

    let json = record.to_json().unwrap();
    let restored = resolve_layout(&LayoutRecord::from_json(&json).unwrap(), &cat);
    assert_eq!(summary(&restored), summary(&placed));
}

#[test]
fn resolve_is_idempotent() {
    let (cat, ids) = catalog_of(4);
    let record = LayoutRecord::from_placed(&layout_for(&ids));
    let once = resolve_layout(&record, &cat);
    let twice = resolve_layout(&LayoutRecord::from_placed(&once), &cat);
    assert_eq!(summary(&once), summary(&twice));
}

#[test]
fn deleted_items_are_skipped() {
    let (mut cat, ids) = catalog_of(3);
    let record = LayoutRecord::from_placed(&layout_for(&ids));
    cat.remove(ids[1]);

    let restored = resolve_layout(&record, &cat);
    let got: Vec<ItemId> = restored.iter().map(PlacedItem::item_id).collect();
    assert_eq!(got, vec![ids[0], ids[2]]);
}

#[test]
fn duplicate_entries_keep_first_in_render_order() {
    let (cat, ids) = catalog_of(1);
    let entry = |x: f64, z: i64| LayoutEntry {
        item_id: ids[0],
        x,
        y: 0.0,
        scale: 1.0,
        rotation_degrees: 0.0,
        z_index: z,
    };
    let record = LayoutRecord {
        entries: vec![entry(50.0, 3), entry(-50.0, 1)],
    };
    let restored = resolve_layout(&record, &cat);
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].transform.offset.x, -50.0);
}

#[test]
fn fallback_places_existing_members_near_center() {
    let (cat, ids) = catalog_of(3);
    let mut with_ghost = ids.clone();
    with_ghost.insert(1, ItemId::new());

    let mut rng = Rng64::new(3);
    let items = fallback_layout(&with_ghost, &cat, &mut rng, 20.0);
    let got: Vec<ItemId> = items.iter().map(PlacedItem::item_id).collect();
    assert_eq!(got, ids);
    for p in &items {
        assert!(p.transform.offset.x.abs() <= 20.0 && p.transform.offset.y.abs() <= 20.0);
        assert_eq!(p.transform.scale, 1.0);
        assert_eq!(p.transform.rotation_deg, 0.0);
    }
}

#[test]
fn reconcile_uses_fallback_for_legacy_and_empty_layouts() {
    let (cat, ids) = catalog_of(2);
    let mut outfit = Outfit::new(ids.clone());
    let mut rng = Rng64::new(1);

    let legacy = reconcile_outfit(&outfit, &cat, &mut rng, 0.0);
    assert_eq!(legacy.iter().map(PlacedItem::item_id).collect::<Vec<_>>(), ids);
    assert!(legacy.iter().all(|p| p.transform == Transform::IDENTITY));

    outfit.layout_record = Some(LayoutRecord::default());
    let empty = reconcile_outfit(&outfit, &cat, &mut rng, 0.0);
    assert_eq!(empty.len(), 2);
}

#[test]
fn reconcile_drops_non_members_and_appends_unplaced_members() {
    let (cat, ids) = catalog_of(3);
    let placed = layout_for(&ids[..2]);
    let record = LayoutRecord::from_placed(&placed);

    // Membership: ids[1] (in layout) and ids[2] (not in layout). ids[0] was removed.
    let mut outfit = Outfit::new(vec![ids[1], ids[2]]);
    outfit.layout_record = Some(record);

    let mut rng = Rng64::new(8);
    let items = reconcile_outfit(&outfit, &cat, &mut rng, 0.0);
    let got: Vec<ItemId> = items.iter().map(PlacedItem::item_id).collect();
    assert_eq!(got, vec![ids[1], ids[2]]);
    assert_eq!(items[0].transform, placed[1].transform);
    assert_eq!(items[1].transform, Transform::IDENTITY);
}
