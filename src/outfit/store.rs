use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    foundation::core::OutfitId,
    foundation::error::{CapsuleError, CapsuleResult},
    outfit::model::Outfit,
};

/// Persistence collaborator for outfit aggregates.
///
/// `upsert_outfit` receives the complete aggregate and must apply it all-or-nothing.
pub trait OutfitStore {
    fn upsert_outfit(&mut self, outfit: &Outfit) -> CapsuleResult<()>;

    fn load_outfit(&self, id: OutfitId) -> CapsuleResult<Option<Outfit>>;
}

/// Map-backed store for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryOutfitStore {
    outfits: BTreeMap<OutfitId, Outfit>,
}

impl MemoryOutfitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outfit> {
        self.outfits.values()
    }
}

impl OutfitStore for MemoryOutfitStore {
    fn upsert_outfit(&mut self, outfit: &Outfit) -> CapsuleResult<()> {
        self.outfits.insert(outfit.id, outfit.clone());
        Ok(())
    }

    fn load_outfit(&self, id: OutfitId) -> CapsuleResult<Option<Outfit>> {
        Ok(self.outfits.get(&id).cloned())
    }
}

/// One pretty-printed JSON file per outfit under a root directory.
///
/// Writes go to a hidden temp file first and are renamed into place, so a reader sees
/// either the previous aggregate or the new one, never a torn file.
#[derive(Clone, Debug)]
pub struct FsOutfitStore {
    root: PathBuf,
}

impl FsOutfitStore {
    pub fn open(root: impl Into<PathBuf>) -> CapsuleResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            CapsuleError::store(format!("create store dir '{}': {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: OutfitId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn temp_path_for(&self, id: OutfitId) -> PathBuf {
        self.root.join(format!(".{id}.json.tmp"))
    }
}

impl OutfitStore for FsOutfitStore {
    fn upsert_outfit(&mut self, outfit: &Outfit) -> CapsuleResult<()> {
        let json = outfit.to_json()?;
        let tmp = self.temp_path_for(outfit.id);
        let dst = self.path_for(outfit.id);

        let committed = std::fs::write(&tmp, json.as_bytes())
            .map_err(|e| CapsuleError::store(format!("write '{}': {e}", tmp.display())))
            .and_then(|()| {
                std::fs::rename(&tmp, &dst).map_err(|e| {
                    CapsuleError::store(format!("commit '{}': {e}", dst.display()))
                })
            });
        if committed.is_err() {
            // A failed write can leave a partial temp file behind.
            let _ = std::fs::remove_file(&tmp);
        }
        committed
    }

    fn load_outfit(&self, id: OutfitId) -> CapsuleResult<Option<Outfit>> {
        let path = self.path_for(id);
        let json = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CapsuleError::store(format!(
                    "read '{}': {e}",
                    path.display()
                )));
            }
        };
        Outfit::from_json(&json).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/outfit/store.rs"]
mod tests;
