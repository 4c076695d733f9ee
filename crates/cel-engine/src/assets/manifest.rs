use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::error::{EngineError, EngineResult};
use crate::assets::provider::AssetProvider;
use crate::assets::sheet::SpriteSheet;
use crate::components::visual::SpriteRegion;

/// Asset manifest describing sprite sheets and named sprites.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Sprite sheets to load.
    pub sheets: Vec<SheetDescriptor>,
    /// Named sprite lookup: name → sheet index + grid cell.
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    /// Optional audio assets.
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a single sheet and its grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDescriptor {
    /// Human-readable name (e.g. "base_tiles").
    pub name: String,
    /// Relative path to the image file.
    pub path: String,
    /// Number of columns in the grid.
    pub cols: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Border around each cell, in pixels.
    #[serde(default)]
    pub border: f32,
}

/// Describes a named sprite within a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Index into the sheets array.
    pub sheet: u32,
    /// Column in the sheet grid.
    pub col: u32,
    /// Row in the sheet grid.
    pub row: u32,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
}

impl AssetManifest {
    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads one described sheet through the asset provider and carves its
    /// grid.
    pub fn build_sheet(
        &self,
        index: usize,
        provider: &mut impl AssetProvider,
    ) -> EngineResult<SpriteSheet> {
        let desc = self.sheets.get(index).ok_or_else(|| {
            EngineError::invalid_argument(format!("no sheet at index {index}"))
        })?;
        let source = provider.image(&desc.path)?;
        Ok(SpriteSheet::new(source).grid(desc.cols, desc.rows, desc.border))
    }

    /// Resolves a named sprite against already-built sheets.
    pub fn named(&self, name: &str, sheets: &[SpriteSheet]) -> EngineResult<SpriteRegion> {
        let desc = self
            .sprites
            .get(name)
            .ok_or_else(|| EngineError::invalid_source(format!("unknown sprite {name:?}")))?;
        let sheet_desc = self.sheets.get(desc.sheet as usize).ok_or_else(|| {
            EngineError::invalid_source(format!(
                "sprite {name:?} references missing sheet {}",
                desc.sheet
            ))
        })?;
        let sheet = sheets.get(desc.sheet as usize).ok_or_else(|| {
            EngineError::invalid_source(format!("sheet {} not built", desc.sheet))
        })?;
        sheet.region((desc.row * sheet_desc.cols + desc.col) as usize)
    }
}
