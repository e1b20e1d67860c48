use super::*;
use crate::catalog::model::ItemRef;

fn placed_at(x: f64, y: f64) -> PlacedItem {
    let mut t = Transform::at_offset(Vec2::new(x, y));
    t.scale = 1.25;
    t.rotation_deg = -15.0;
    PlacedItem::new(ItemRef::without_image(ItemId::new()), t)
}

#[test]
fn wire_format_is_bare_array_with_camel_case_keys() {
    let items = vec![placed_at(10.0, -4.0), placed_at(0.0, 0.0)];
    let record = LayoutRecord::from_placed(&items);
    let json = record.to_json().unwrap();

    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    let first = arr[0].as_object().unwrap();
    for key in ["itemId", "x", "y", "scale", "rotationDegrees", "zIndex"] {
        assert!(first.contains_key(key), "missing key {key}");
    }
    assert_eq!(first["itemId"], items[0].item_id().to_string());
    assert_eq!(first["x"], 10.0);
    assert_eq!(first["rotationDegrees"], -15.0);
    assert_eq!(arr[1]["zIndex"], 1);

    assert_eq!(LayoutRecord::from_json(&json).unwrap(), record);
}

#[test]
fn entries_preserve_committed_transform() {
    let item = placed_at(33.5, -12.25);
    let record = LayoutRecord::from_placed(std::slice::from_ref(&item));
    assert_eq!(record.entries[0].transform(), item.transform);
}

#[test]
fn missing_z_index_reads_as_zero() {
    let id = ItemId::new();
    let json = format!(r#"[{{"itemId":"{id}","x":1.0,"y":2.0,"scale":1.5,"rotationDegrees":0.0}}]"#);
    let record = LayoutRecord::from_json(&json).unwrap();
    assert_eq!(record.entries[0].z_index, 0);
    assert_eq!(record.item_ids(), vec![id]);
}

#[test]
fn render_order_sorts_by_z_and_keeps_ties_stable() {
    let e = |z: i64| LayoutEntry {
        item_id: ItemId::new(),
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotation_degrees: 0.0,
        z_index: z,
    };
    let record = LayoutRecord {
        entries: vec![e(2), e(0), e(0), e(1)],
    };
    let ordered: Vec<ItemId> = record.render_order().iter().map(|e| e.item_id).collect();
    let ids = record.item_ids();
    assert_eq!(ordered, vec![ids[1], ids[2], ids[3], ids[0]]);
}

#[test]
fn damaged_values_normalize_on_read() {
    let entry = LayoutEntry {
        item_id: ItemId::new(),
        x: f64::NAN,
        y: 7.0,
        scale: -2.0,
        rotation_degrees: f64::INFINITY,
        z_index: 0,
    };
    let t = entry.transform();
    assert_eq!(t.offset, Vec2::new(0.0, 7.0));
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.rotation_deg, 0.0);
}

#[test]
fn non_finite_values_fail_to_encode() {
    let mut record = LayoutRecord::from_placed(&[placed_at(1.0, 1.0)]);
    record.entries[0].y = f64::NAN;
    assert!(matches!(record.to_json(), Err(CapsuleError::Serde(_))));

    record.entries[0].y = 1.0;
    record.entries[0].scale = 0.0;
    assert!(matches!(
        record.ensure_encodable(),
        Err(CapsuleError::Serde(_))
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        LayoutRecord::from_json("{\"not\":\"an array\"}"),
        Err(CapsuleError::Serde(_))
    ));
}
