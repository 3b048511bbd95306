//! Texture lookup
//!
//! The simulation only needs texture sizes to lay out nodes. Pixel data,
//! decoding and GPU upload stay with the host's asset loader.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle the host maps back to its own texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// A texture handle with its unscaled size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub id: TextureId,
    pub width: f32,
    pub height: f32,
}

impl Texture {
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Anything that can resolve a texture name to a handle
pub trait TextureProvider {
    fn texture(&self, name: &str) -> Option<Texture>;

    /// Resolve a list of names, skipping (and reporting) unknown ones
    fn resolve_all(&self, names: &[String]) -> Vec<Texture> {
        names
            .iter()
            .filter_map(|name| {
                let texture = self.texture(name);
                if texture.is_none() {
                    log::warn!("Unknown texture '{}'", name);
                }
                texture
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct AtlasEntry {
    width: f32,
    height: f32,
}

/// In-memory name → texture table filled by the host after loading assets
#[derive(Debug, Clone, Default)]
pub struct TextureAtlas {
    textures: HashMap<String, Texture>,
    next_id: u32,
}

impl TextureAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture size under a name, returning its handle.
    /// Re-registering a name keeps the old id and updates the size.
    pub fn insert(&mut self, name: impl Into<String>, width: f32, height: f32) -> Texture {
        let name = name.into();
        let id = match self.textures.get(&name) {
            Some(existing) => existing.id,
            None => {
                let id = TextureId(self.next_id);
                self.next_id += 1;
                id
            }
        };
        let texture = Texture { id, width, height };
        self.textures.insert(name, texture);
        texture
    }

    /// Parse `{"name": {"width": w, "height": h}, ...}`
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: HashMap<String, AtlasEntry> = serde_json::from_str(json)?;
        // Sort so ids are stable across runs
        let mut names: Vec<_> = entries.keys().cloned().collect();
        names.sort();

        let mut atlas = Self::new();
        for name in names {
            let entry = entries[&name];
            atlas.insert(name, entry.width, entry.height);
        }
        log::info!("Loaded {} texture sizes", atlas.len());
        Ok(atlas)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureProvider for TextureAtlas {
    fn texture(&self, name: &str) -> Option<Texture> {
        self.textures.get(name).copied()
    }
}

/// Sizes of the stock asset pack, covering every texture the default
/// `GameConfig` names
pub fn stock_atlas() -> TextureAtlas {
    let mut atlas = TextureAtlas::new();
    atlas.insert("column.png", 100.0, 300.0);
    atlas.insert("02_tree_1.png", 300.0, 500.0);
    atlas.insert("02_tree_2.png", 250.0, 480.0);
    atlas.insert("01_hanging_flower1.png", 60.0, 200.0);
    atlas.insert("01_hanging_flower2.png", 70.0, 220.0);
    atlas.insert("01_hanging_flower3.png", 80.0, 180.0);
    atlas.insert("05_far_BG.jpg", 1920.0, 720.0);
    atlas.insert("03_rear_silhouette.png", 1920.0, 370.0);
    atlas.insert("03_rear_canopy.png", 1920.0, 200.0);
    atlas.insert("01_front_silhouette.png", 1920.0, 330.0);
    atlas.insert("02_front_canopy.png", 1920.0, 180.0);
    atlas.insert("00_forest_floor.png", 1920.0, 158.0);
    atlas.insert("00_roof_leaves.png", 1920.0, 120.0);
    for star in ["star_01.png", "star_04.png", "star_07.png"] {
        atlas.insert(star, 512.0, 512.0);
    }
    for smoke in [
        "smoke_01.png",
        "smoke_02.png",
        "smoke_04.png",
        "smoke_05.png",
        "smoke_07.png",
        "smoke_08.png",
    ] {
        atlas.insert(smoke, 512.0, 512.0);
    }
    atlas
}
