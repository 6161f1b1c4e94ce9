//! A loaded tileset: descriptor metadata paired with atlas pixels

use gridmap_core::{TextureRegion, TileState, TilesetDescriptor, TilesetError};
use image::{imageops, imageops::FilterType, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

/// An atlas image plus the name-to-region lookup over it
///
/// Immutable once loaded; swapping tilesets on a map replaces the whole
/// value (`Map::change_tileset`). Construction fails outright when the
/// descriptor is malformed, the image cannot be read, or any region falls
/// outside the atlas; a partially usable tileset never exists.
pub struct Tileset {
    descriptor: TilesetDescriptor,
    atlas: RgbaImage,
    index: HashMap<String, usize>,
}

impl Tileset {
    /// Load a tileset from a descriptor file, resolving the atlas image
    /// path relative to it
    pub fn load(descriptor_path: &Path) -> Result<Self, TilesetError> {
        let json = std::fs::read_to_string(descriptor_path)
            .map_err(|e| TilesetError::IoError(e.to_string()))?;
        let descriptor = TilesetDescriptor::parse(&json)?;
        let base_dir = descriptor_path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_descriptor(descriptor, base_dir)
    }

    /// Build a tileset from parsed metadata, loading the atlas from disk
    pub fn from_descriptor(
        descriptor: TilesetDescriptor,
        base_dir: &Path,
    ) -> Result<Self, TilesetError> {
        let image_path = base_dir.join(&descriptor.image);
        let atlas = image::open(&image_path)
            .map_err(|e| TilesetError::ImageError(format!("{}: {}", image_path.display(), e)))?
            .to_rgba8();
        Self::from_parts(descriptor, atlas)
    }

    /// Build a tileset from metadata and an already-decoded atlas
    pub fn from_parts(
        descriptor: TilesetDescriptor,
        atlas: RgbaImage,
    ) -> Result<Self, TilesetError> {
        descriptor.validate()?;

        for entry in &descriptor.regions {
            let region = entry.region;
            if region.x + region.width > atlas.width() || region.y + region.height > atlas.height()
            {
                return Err(TilesetError::Invalid(format!(
                    "region '{}' falls outside the {}x{} atlas",
                    entry.name,
                    atlas.width(),
                    atlas.height()
                )));
            }
        }

        let index = descriptor
            .regions
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.clone(), i))
            .collect();

        Ok(Self {
            descriptor,
            atlas,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Texture ids in descriptor order
    pub fn texture_ids(&self) -> impl Iterator<Item = &str> {
        self.descriptor.texture_ids()
    }

    /// Check whether a texture id exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Resolve a texture id to its atlas region
    ///
    /// A miss here is a hard failure; the graceful "unknown id renders as a
    /// placeholder" rule applies only when deriving tile visuals, not to
    /// direct lookups.
    pub fn resolve(&self, id: &str) -> Result<&TextureRegion, TilesetError> {
        self.index
            .get(id)
            .map(|&i| &self.descriptor.regions[i].region)
            .ok_or_else(|| TilesetError::UnknownTexture(id.to_string()))
    }

    /// The raw atlas pixels, for hosts that upload it to a GPU texture
    pub fn atlas(&self) -> &RgbaImage {
        &self.atlas
    }

    /// Render a single tile state to a standalone square preview image
    ///
    /// Used for thumbnailing palette choices: the region is cropped,
    /// tinted, rotated and scaled the way the canvas would draw it, then
    /// centered on a transparent `size`x`size` square. The state's pixel
    /// offset is ignored; a preview is always centered. Empty states
    /// render fully transparent.
    pub fn render_preview(&self, state: &TileState, size: u32) -> Result<RgbaImage, TilesetError> {
        let size = size.max(1);
        let mut canvas = RgbaImage::new(size, size);

        if state.is_empty() {
            return Ok(canvas);
        }

        let region = self.resolve(&state.texture_id)?;
        let mut sprite = imageops::crop_imm(
            &self.atlas,
            region.x,
            region.y,
            region.width,
            region.height,
        )
        .to_image();

        apply_tint(&mut sprite, state.tint, state.alpha);

        // Fit the longer side to the cell, preserving aspect
        let base = (size as f32 * state.scale).max(1.0);
        let (w, h) = (sprite.width() as f32, sprite.height() as f32);
        let (target_w, target_h) = if w >= h {
            (base, base * h / w)
        } else {
            (base * w / h, base)
        };
        sprite = imageops::resize(
            &sprite,
            (target_w.round() as u32).max(1),
            (target_h.round() as u32).max(1),
            FilterType::Nearest,
        );

        let rotation = state.rotation_degrees.rem_euclid(360.0);
        if rotation != 0.0 {
            sprite = rotate_nearest(&sprite, rotation);
        }

        let offset_x = (size as i64 - sprite.width() as i64) / 2;
        let offset_y = (size as i64 - sprite.height() as i64) / 2;
        imageops::overlay(&mut canvas, &sprite, offset_x, offset_y);

        Ok(canvas)
    }
}

/// Multiply every pixel by the RGB tint and the alpha factor
fn apply_tint(sprite: &mut RgbaImage, tint: u32, alpha: f32) {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u32;
    if tint == 0xFFFFFF && alpha == 255 {
        return;
    }
    let r = (tint >> 16) & 0xFF;
    let g = (tint >> 8) & 0xFF;
    let b = tint & 0xFF;
    for pixel in sprite.pixels_mut() {
        pixel[0] = (pixel[0] as u32 * r / 255) as u8;
        pixel[1] = (pixel[1] as u32 * g / 255) as u8;
        pixel[2] = (pixel[2] as u32 * b / 255) as u8;
        pixel[3] = (pixel[3] as u32 * alpha / 255) as u8;
    }
}

/// Nearest-neighbor rotation about the image center, output sized to the
/// rotated bounding box
fn rotate_nearest(src: &RgbaImage, degrees: f32) -> RgbaImage {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let (w, h) = (src.width() as f32, src.height() as f32);
    let out_w = ((w * cos.abs() + h * sin.abs()).ceil() as u32).max(1);
    let out_h = ((w * sin.abs() + h * cos.abs()).ceil() as u32).max(1);
    let mut out = RgbaImage::new(out_w, out_h);

    let (src_cx, src_cy) = (w / 2.0, h / 2.0);
    let (out_cx, out_cy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);

    for oy in 0..out_h {
        for ox in 0..out_w {
            // Map the output pixel back into source space
            let dx = ox as f32 + 0.5 - out_cx;
            let dy = oy as f32 + 0.5 - out_cy;
            let sx = cos * dx + sin * dy + src_cx;
            let sy = -sin * dx + cos * dy + src_cy;
            if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                out.put_pixel(ox, oy, *src.get_pixel(sx as u32, sy as u32));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmap_core::{NamedRegion, Tile, TilePatch};
    use image::Rgba;

    fn checker_tileset() -> Tileset {
        // 4x2 atlas: left 2x2 red "wall", right 2x2 blue "floor"
        let mut atlas = RgbaImage::new(4, 2);
        for y in 0..2 {
            for x in 0..2 {
                atlas.put_pixel(x, y, Rgba([255, 0, 0, 255]));
                atlas.put_pixel(x + 2, y, Rgba([0, 0, 255, 255]));
            }
        }
        let descriptor = TilesetDescriptor {
            name: "checker".to_string(),
            image: "checker.png".to_string(),
            regions: vec![
                NamedRegion {
                    name: "wall".to_string(),
                    region: TextureRegion {
                        x: 0,
                        y: 0,
                        width: 2,
                        height: 2,
                    },
                },
                NamedRegion {
                    name: "floor".to_string(),
                    region: TextureRegion {
                        x: 2,
                        y: 0,
                        width: 2,
                        height: 2,
                    },
                },
            ],
        };
        Tileset::from_parts(descriptor, atlas).unwrap()
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let tileset = checker_tileset();
        assert_eq!(tileset.resolve("wall").unwrap().x, 0);
        assert_eq!(tileset.resolve("floor").unwrap().x, 2);
        assert!(matches!(
            tileset.resolve("lava"),
            Err(TilesetError::UnknownTexture(_))
        ));
    }

    #[test]
    fn test_texture_ids_ordered() {
        let tileset = checker_tileset();
        let ids: Vec<&str> = tileset.texture_ids().collect();
        assert_eq!(ids, vec!["wall", "floor"]);
    }

    #[test]
    fn test_region_outside_atlas_rejected() {
        let descriptor = TilesetDescriptor {
            name: "bad".to_string(),
            image: "bad.png".to_string(),
            regions: vec![NamedRegion {
                name: "oob".to_string(),
                region: TextureRegion {
                    x: 3,
                    y: 0,
                    width: 2,
                    height: 2,
                },
            }],
        };
        let atlas = RgbaImage::new(4, 2);
        assert!(matches!(
            Tileset::from_parts(descriptor, atlas),
            Err(TilesetError::Invalid(_))
        ));
    }

    #[test]
    fn test_preview_of_painted_state() {
        let tileset = checker_tileset();
        let mut tile = Tile::new(0, 0);
        tile.set_state(&TilePatch::new().texture("wall"));

        let preview = tileset
            .render_preview(tile.raw_state(), 8)
            .unwrap();
        assert_eq!((preview.width(), preview.height()), (8, 8));
        // Center pixel carries the (red) texture
        assert_eq!(preview.get_pixel(4, 4), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_preview_applies_tint_and_alpha() {
        let tileset = checker_tileset();
        let state = gridmap_core::TileState {
            tint: 0x00FF00,
            alpha: 0.5,
            ..gridmap_core::TileState::with_texture("wall")
        };
        let preview = tileset.render_preview(&state, 4).unwrap();
        // Red atlas pixels under a green tint go black, alpha halves
        let pixel = preview.get_pixel(2, 2);
        assert_eq!(pixel[0], 0);
        assert_eq!(pixel[1], 0);
        assert_eq!(pixel[3], 128);
    }

    #[test]
    fn test_preview_of_empty_state_is_transparent() {
        let tileset = checker_tileset();
        let preview = tileset
            .render_preview(&gridmap_core::TileState::default(), 4)
            .unwrap();
        assert!(preview.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_preview_of_unknown_texture_fails() {
        let tileset = checker_tileset();
        let state = gridmap_core::TileState::with_texture("lava");
        assert!(matches!(
            tileset.render_preview(&state, 4),
            Err(TilesetError::UnknownTexture(_))
        ));
    }
}
