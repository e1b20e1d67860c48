use super::*;
use crate::{
    catalog::model::Season,
    foundation::core::ItemId,
    layout::record::{LayoutEntry, LayoutRecord},
};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "capsule_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn sample_outfit() -> Outfit {
    let ids = vec![ItemId::new(), ItemId::new()];
    let mut outfit = Outfit::new(ids.clone());
    outfit.layout_record = Some(LayoutRecord {
        entries: ids
            .iter()
            .enumerate()
            .map(|(i, &item_id)| LayoutEntry {
                item_id,
                x: 12.5 * i as f64,
                y: -3.0,
                scale: 1.5,
                rotation_degrees: 30.0,
                z_index: i as i64,
            })
            .collect(),
    });
    outfit.snapshot = Some(vec![0x89, b'P', b'N', b'G']);
    outfit.seasons.insert(Season::Autumn);
    outfit.notes = Some("rainy".to_string());
    outfit.created_at_ms = 1_700_000_000_000;
    outfit
}

#[test]
fn memory_store_upserts_by_id() {
    let mut store = MemoryOutfitStore::new();
    let mut outfit = sample_outfit();
    store.upsert_outfit(&outfit).unwrap();
    outfit.favorite = true;
    store.upsert_outfit(&outfit).unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.load_outfit(outfit.id).unwrap().unwrap().favorite);
    assert!(store.load_outfit(OutfitId::new()).unwrap().is_none());
}

#[test]
fn fs_store_round_trips_and_leaves_no_temp_files() {
    let root = temp_dir("fs_store_roundtrip");
    let mut store = FsOutfitStore::open(&root).unwrap();
    let outfit = sample_outfit();

    store.upsert_outfit(&outfit).unwrap();
    assert!(store.path_for(outfit.id).exists());
    assert_eq!(store.load_outfit(outfit.id).unwrap(), Some(outfit.clone()));

    let names: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![format!("{}.json", outfit.id)]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn fs_store_missing_outfit_is_none() {
    let root = temp_dir("fs_store_missing");
    let store = FsOutfitStore::open(&root).unwrap();
    assert!(store.load_outfit(OutfitId::new()).unwrap().is_none());
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn fs_store_rejects_unencodable_layout_without_touching_disk() {
    let root = temp_dir("fs_store_nan");
    let mut store = FsOutfitStore::open(&root).unwrap();
    let mut outfit = sample_outfit();
    if let Some(layout) = outfit.layout_record.as_mut() {
        layout.entries[0].x = f64::NAN;
    }

    assert!(matches!(
        store.upsert_outfit(&outfit),
        Err(CapsuleError::Serde(_))
    ));
    assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 0);
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn fs_store_reports_corrupt_records() {
    let root = temp_dir("fs_store_corrupt");
    let store = FsOutfitStore::open(&root).unwrap();
    let id = OutfitId::new();
    std::fs::write(store.path_for(id), "{ not json").unwrap();

    assert!(matches!(store.load_outfit(id), Err(CapsuleError::Serde(_))));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn fs_store_failed_commit_leaves_no_temp_file() {
    let root = temp_dir("fs_store_failed_commit");
    let mut store = FsOutfitStore::open(&root).unwrap();
    let outfit = sample_outfit();

    // A non-empty directory at the destination makes the rename fail after the temp write.
    let blocker = store.path_for(outfit.id);
    std::fs::create_dir_all(blocker.join("occupied")).unwrap();

    assert!(matches!(
        store.upsert_outfit(&outfit),
        Err(CapsuleError::Store(_))
    ));
    assert!(!store.temp_path_for(outfit.id).exists());
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn fs_store_failed_write_keeps_previous_version() {
    let root = temp_dir("fs_store_failed_write");
    let mut store = FsOutfitStore::open(&root).unwrap();
    let mut outfit = sample_outfit();
    store.upsert_outfit(&outfit).unwrap();

    // The temp path is taken by a directory, so the write itself fails.
    std::fs::create_dir_all(store.temp_path_for(outfit.id)).unwrap();
    outfit.favorite = true;
    assert!(matches!(
        store.upsert_outfit(&outfit),
        Err(CapsuleError::Store(_))
    ));

    let loaded = store.load_outfit(outfit.id).unwrap().unwrap();
    assert!(!loaded.favorite);
    std::fs::remove_dir_all(&root).unwrap();
}
