//! Dimension validation for input textures.
//!
//! Widths must be powers of two. Square entities must be square; tile textures
//! may also be vertical animation strips (height a multiple of width) or
//! two-frame horizontal strips (height half the width).

use thiserror::Error;

use crate::texture::Rect;

/// Why an image's dimensions were rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("image is empty")]
    Empty,
    #[error("width {0} is not a power of two")]
    NotPowerOfTwo(u32),
    #[error("entity textures must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("height {height} is neither a multiple nor half of width {width}")]
    BadAspect { width: u32, height: u32 },
}

/// The layout of an accepted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileShape {
    /// One square frame.
    Single { width: u32 },
    /// `frames` square frames stacked vertically.
    Strip { width: u32, frames: u32 },
    /// Two square frames side by side.
    DualFrame { width: u32 },
}

impl TileShape {
    /// Width of one logical tile frame.
    pub fn logical_width(&self) -> u32 {
        match *self {
            TileShape::Single { width } | TileShape::Strip { width, .. } => width,
            TileShape::DualFrame { width } => width / 2,
        }
    }

    /// Source rectangle of the frame to use, and whether `chosen` had to wrap.
    ///
    /// Without a chosen frame the first frame is used.
    pub fn frame_rect(&self, chosen: Option<u32>) -> (Rect, bool) {
        match *self {
            TileShape::Single { width } => (Rect::full(width, width), false),
            TileShape::DualFrame { width } => (Rect::full(width / 2, width / 2), false),
            TileShape::Strip { width, frames } => {
                let wanted = chosen.unwrap_or(0);
                let frame = wanted % frames;
                (Rect::new(0, frame * width, width, width), wanted >= frames)
            }
        }
    }
}

/// Validates image dimensions.
pub fn validate(width: u32, height: u32, square_entity: bool) -> Result<TileShape, Rejection> {
    if width == 0 || height == 0 {
        return Err(Rejection::Empty);
    }
    if !width.is_power_of_two() {
        return Err(Rejection::NotPowerOfTwo(width));
    }
    if square_entity {
        return if height == width {
            Ok(TileShape::Single { width })
        } else {
            Err(Rejection::NotSquare { width, height })
        };
    }
    if height == width {
        Ok(TileShape::Single { width })
    } else if height.is_multiple_of(width) {
        Ok(TileShape::Strip {
            width,
            frames: height / width,
        })
    } else if height * 2 == width {
        Ok(TileShape::DualFrame { width })
    } else {
        Err(Rejection::BadAspect { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two_required() {
        assert_eq!(validate(48, 48, false), Err(Rejection::NotPowerOfTwo(48)));
        assert_eq!(validate(64, 64, false), Ok(TileShape::Single { width: 64 }));
        assert_eq!(validate(0, 16, false), Err(Rejection::Empty));
    }

    #[test]
    fn test_square_entities() {
        assert!(validate(64, 64, true).is_ok());
        assert!(matches!(
            validate(64, 128, true),
            Err(Rejection::NotSquare { .. })
        ));
    }

    #[test]
    fn test_strips() {
        let shape = validate(16, 512, false).unwrap();
        assert_eq!(shape, TileShape::Strip { width: 16, frames: 32 });
        assert_eq!(shape.logical_width(), 16);

        let dual = validate(32, 16, false).unwrap();
        assert_eq!(dual, TileShape::DualFrame { width: 32 });
        assert_eq!(dual.logical_width(), 16);

        assert!(matches!(
            validate(16, 24, false),
            Err(Rejection::BadAspect { .. })
        ));
        assert!(matches!(
            validate(64, 16, false),
            Err(Rejection::BadAspect { .. })
        ));
    }

    #[test]
    fn test_frame_selection() {
        let shape = TileShape::Strip { width: 16, frames: 4 };
        assert_eq!(shape.frame_rect(None), (Rect::new(0, 0, 16, 16), false));
        assert_eq!(shape.frame_rect(Some(2)), (Rect::new(0, 32, 16, 16), false));
        assert_eq!(shape.frame_rect(Some(5)), (Rect::new(0, 16, 16, 16), true));
        let dual = TileShape::DualFrame { width: 32 };
        assert_eq!(dual.frame_rect(Some(3)), (Rect::new(0, 0, 16, 16), false));
    }
}
