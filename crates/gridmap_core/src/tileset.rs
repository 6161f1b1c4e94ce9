//! Tileset descriptor: atlas metadata mapping texture ids to pixel regions
//!
//! The descriptor is the JSON half of a tileset; the pixel half (the atlas
//! image) lives with the editor, which pairs the two at load time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur when loading or querying tilesets
#[derive(Debug, Error)]
pub enum TilesetError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Image error: {0}")]
    ImageError(String),
    #[error("Invalid tileset: {0}")]
    Invalid(String),
    #[error("Texture id '{0}' does not exist in the loaded tileset")]
    UnknownTexture(String),
}

/// A rectangle of atlas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One named entry in a tileset descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    #[serde(flatten)]
    pub region: TextureRegion,
}

/// Tileset metadata: an atlas image path plus its named regions
///
/// Region order is significant: it is the order texture ids are listed in,
/// which the palette UI relies on being stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetDescriptor {
    pub name: String,
    /// Path to the atlas image, relative to the descriptor file
    pub image: String,
    pub regions: Vec<NamedRegion>,
}

impl TilesetDescriptor {
    /// Parse a descriptor from JSON and validate it
    pub fn parse(json: &str) -> Result<Self, TilesetError> {
        let descriptor: TilesetDescriptor =
            serde_json::from_str(json).map_err(|e| TilesetError::ParseError(e.to_string()))?;

        descriptor.validate()?;

        Ok(descriptor)
    }

    /// Check the descriptor is usable: an image, at least one region,
    /// unique non-empty names, no zero-area rectangles
    pub fn validate(&self) -> Result<(), TilesetError> {
        if self.image.is_empty() {
            return Err(TilesetError::Invalid("no atlas image path".to_string()));
        }
        if self.regions.is_empty() {
            return Err(TilesetError::Invalid(
                "descriptor defines no regions".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.regions {
            if entry.name.is_empty() {
                return Err(TilesetError::Invalid("region with empty name".to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(TilesetError::Invalid(format!(
                    "duplicate region name '{}'",
                    entry.name
                )));
            }
            if entry.region.width == 0 || entry.region.height == 0 {
                return Err(TilesetError::Invalid(format!(
                    "region '{}' has zero area",
                    entry.name
                )));
            }
        }

        Ok(())
    }

    /// Find a region by texture id
    pub fn region(&self, name: &str) -> Option<&TextureRegion> {
        self.regions
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.region)
    }

    /// Texture ids in descriptor order
    pub fn texture_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|entry| entry.name.as_str())
    }
}
