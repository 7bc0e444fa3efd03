//! Atlas buffers and the compositor that copies source images into tile cells.
//!
//! Resampling is nearest-texel when enlarging and box-averaged when shrinking;
//! tile sizes are powers of two, so shrink factors are whole numbers.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::category::Category;
use crate::error::PipelineError;
use crate::texture::{DecodedImage, Rect, convert_texel};
use crate::tiles::{TILE_GRID_COLUMNS, TILE_GRID_ROWS};

/// Largest atlas allocation accepted, in bytes.
pub const MAX_ATLAS_BYTES: u64 = 1 << 31;

/// Mirror flags for one copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub const NONE: Flip = Flip {
        horizontal: false,
        vertical: false,
    };
    pub const HORIZONTAL: Flip = Flip {
        horizontal: true,
        vertical: false,
    };
    pub const VERTICAL: Flip = Flip {
        horizontal: false,
        vertical: true,
    };
    pub const BOTH: Flip = Flip {
        horizontal: true,
        vertical: true,
    };
}

// ---------------------------------------------------------------------------
// AtlasBuffer
// ---------------------------------------------------------------------------

/// The output image of one category, `16 x rows` tiles of `tile_size` pixels.
#[derive(Debug, Clone)]
pub struct AtlasBuffer {
    pub category: Category,
    pub tile_size: u32,
    pub image: DecodedImage,
}

impl AtlasBuffer {
    /// Allocates an atlas filled with the category's default texel.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AtlasTooLarge`] if the buffer would exceed
    /// [`MAX_ATLAS_BYTES`].
    pub fn new(category: Category, tile_size: u32) -> Result<Self, PipelineError> {
        let width = TILE_GRID_COLUMNS as u64 * tile_size as u64;
        let height = TILE_GRID_ROWS as u64 * tile_size as u64;
        let bytes = width * height * category.channels() as u64;
        if bytes > MAX_ATLAS_BYTES {
            return Err(PipelineError::AtlasTooLarge {
                width,
                height,
                bytes,
                max: MAX_ATLAS_BYTES,
            });
        }
        Ok(Self {
            category,
            tile_size,
            image: DecodedImage::filled(width as u32, height as u32, category.default_texel()),
        })
    }

    pub fn channels(&self) -> u8 {
        self.image.channels
    }

    /// Pixel rectangle of a tile cell.
    pub fn tile_rect(&self, column: u32, row: u32) -> Rect {
        Rect::new(
            column * self.tile_size,
            row * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Sets every texel of a tile to `texel` (converted to the atlas layout).
    pub fn fill_tile(&mut self, column: u32, row: u32, texel: &[u8]) {
        let rect = self.tile_rect(column, row);
        let mut value = vec![0u8; self.channels() as usize];
        convert_texel(texel, &mut value);
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.image.texel_mut(x, y).copy_from_slice(&value);
            }
        }
    }

    /// Clears a tile to fully empty (all zero).
    pub fn clear_tile(&mut self, column: u32, row: u32) {
        let zero = vec![0u8; self.channels() as usize];
        self.fill_tile(column, row, &zero);
    }

    /// Overwrites the whole atlas with `base`, resampled to the atlas size.
    pub fn prefill(&mut self, base: &DecodedImage) {
        let rgba = base.to_channels(4);
        let Some(source) = RgbaImage::from_raw(rgba.width, rgba.height, rgba.pixels) else {
            tracing::warn!("base image buffer does not match its {}x{} size", base.width, base.height);
            return;
        };
        let resized = imageops::resize(
            &source,
            self.image.width,
            self.image.height,
            FilterType::Nearest,
        );
        for (src, dst) in resized.pixels().zip(self.image.texels_mut()) {
            convert_texel(&src.0, dst);
        }
    }
}

// ---------------------------------------------------------------------------
// Compositing
// ---------------------------------------------------------------------------

/// Zoom factor from a logical source tile width to the atlas tile size.
pub fn zoom_for(tile_size: u32, logical_source_width: u32) -> f32 {
    tile_size as f32 / logical_source_width as f32
}

/// Copies `src_rect` of `source` into `dest_rect` of tile (`dest_column`, `dest_row`).
///
/// `dest_rect` is relative to the tile's top-left corner and must equal
/// `src_rect` scaled by `zoom`. Channels are converted to the atlas layout.
#[allow(clippy::too_many_arguments)]
pub fn composite(
    atlas: &mut AtlasBuffer,
    dest_column: u32,
    dest_row: u32,
    source: &DecodedImage,
    src_rect: Rect,
    dest_rect: Rect,
    flip: Flip,
    zoom: f32,
) {
    if src_rect.is_empty() || dest_rect.is_empty() {
        return;
    }
    debug_assert!(src_rect.x + src_rect.width <= source.width);
    debug_assert!(src_rect.y + src_rect.height <= source.height);
    debug_assert!(dest_rect.x + dest_rect.width <= atlas.tile_size);
    debug_assert!(dest_rect.y + dest_rect.height <= atlas.tile_size);

    let tile = atlas.tile_rect(dest_column, dest_row);
    // Whole source texels per destination texel when shrinking.
    let block = if zoom < 1.0 {
        (1.0 / zoom).round().max(1.0) as u32
    } else {
        1
    };
    let channels = source.channels as usize;
    let mut sum = vec![0u32; channels];
    let mut texel = vec![0u8; channels];

    for dy in 0..dest_rect.height {
        let ly = if flip.vertical {
            dest_rect.height - 1 - dy
        } else {
            dy
        };
        for dx in 0..dest_rect.width {
            let lx = if flip.horizontal {
                dest_rect.width - 1 - dx
            } else {
                dx
            };

            if block == 1 {
                let sx = (((lx as f32 + 0.5) / zoom) as u32).min(src_rect.width - 1);
                let sy = (((ly as f32 + 0.5) / zoom) as u32).min(src_rect.height - 1);
                texel.copy_from_slice(source.texel(src_rect.x + sx, src_rect.y + sy));
            } else {
                sum.iter_mut().for_each(|s| *s = 0);
                let x0 = (lx * block).min(src_rect.width - 1);
                let y0 = (ly * block).min(src_rect.height - 1);
                let x1 = (x0 + block).min(src_rect.width);
                let y1 = (y0 + block).min(src_rect.height);
                for sy in y0..y1 {
                    for sx in x0..x1 {
                        let t = source.texel(src_rect.x + sx, src_rect.y + sy);
                        for (s, v) in sum.iter_mut().zip(t) {
                            *s += *v as u32;
                        }
                    }
                }
                let n = (x1 - x0) * (y1 - y0);
                for (t, s) in texel.iter_mut().zip(&sum) {
                    *t = ((s + n / 2) / n) as u8;
                }
            }

            let out = atlas
                .image
                .texel_mut(tile.x + dest_rect.x + dx, tile.y + dest_rect.y + dy);
            convert_texel(&texel, out);
        }
    }
}
