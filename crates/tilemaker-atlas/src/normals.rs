//! Normal map repair: renormalization of encoded unit vectors and conversion
//! of height fields into normal maps.
//!
//! X and Y are always packed as `[-1, 1] -> [0, 255]`. Z comes in two packings:
//! signed (`[-1, 1]`, flat = 255 via `(z + 1) / 2`) and unsigned (`[0, 1]`,
//! flat = 255 via `z`). Tangent space is Y-up.

use glam::Vec3;

use crate::texture::DecodedImage;

/// Mean length errors closer than this cannot tell the packings apart.
const PACKING_TIE: f32 = 0.002;
/// Vectors shorter than this carry no direction worth keeping.
const MIN_LENGTH: f32 = 0.05;
/// Default height field slope scale.
pub const DEFAULT_SLOPE_SCALE: f32 = 0.5;

/// How Z is packed into the third channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZPacking {
    /// `z in [-1, 1]`, stored as `(z + 1) / 2`.
    Signed,
    /// `z in [0, 1]`, stored directly.
    Unsigned,
}

impl ZPacking {
    fn unpack(self, b: u8) -> f32 {
        match self {
            ZPacking::Signed => unpack_signed(b),
            ZPacking::Unsigned => b as f32 / 255.0,
        }
    }

    fn pack(self, z: f32) -> u8 {
        match self {
            ZPacking::Signed => pack_signed(z),
            ZPacking::Unsigned => (z * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

fn unpack_signed(c: u8) -> f32 {
    c as f32 / 255.0 * 2.0 - 1.0
}

fn pack_signed(v: f32) -> u8 {
    ((v + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Guesses the Z packing of a normal map.
///
/// Each texel is unpacked both ways; the packing whose vectors come out closest
/// to unit length on average wins. Maps that read equally well both ways (flat
/// maps, for one) are ambiguous and read as signed.
pub fn detect_packing(image: &DecodedImage) -> ZPacking {
    let mut signed_error = 0.0f32;
    let mut unsigned_error = 0.0f32;
    for t in image.texels() {
        let x = unpack_signed(t[0]);
        let y = unpack_signed(t[1]);
        signed_error += (Vec3::new(x, y, ZPacking::Signed.unpack(t[2])).length() - 1.0).abs();
        unsigned_error += (Vec3::new(x, y, ZPacking::Unsigned.unpack(t[2])).length() - 1.0).abs();
    }
    let count = (image.width as usize * image.height as usize).max(1) as f32;
    if (signed_error - unsigned_error) / count > PACKING_TIE {
        ZPacking::Unsigned
    } else {
        ZPacking::Signed
    }
}

/// Renormalizes every texel of a 3- or 4-channel normal map in place.
///
/// The packing is detected first and kept. Returns it.
pub fn renormalize(image: &mut DecodedImage) -> ZPacking {
    let packing = detect_packing(image);
    renormalize_as(image, packing);
    packing
}

/// Renormalizes with a known Z packing.
///
/// Degenerate (near zero-length) vectors become straight up. Alpha is left
/// untouched.
pub fn renormalize_as(image: &mut DecodedImage, packing: ZPacking) {
    for t in image.texels_mut() {
        let v = Vec3::new(unpack_signed(t[0]), unpack_signed(t[1]), packing.unpack(t[2]));
        let n = if v.length() < MIN_LENGTH {
            Vec3::Z
        } else {
            v.normalize()
        };
        t[0] = pack_signed(n.x);
        t[1] = pack_signed(n.y);
        t[2] = packing.pack(n.z);
    }
}

/// Height of a texel in `[0, 1]`: gray value, or luminance for color texels.
fn height_of(texel: &[u8]) -> f32 {
    match texel.len() {
        1 | 2 => texel[0] as f32 / 255.0,
        _ => {
            (0.299 * texel[0] as f32 + 0.587 * texel[1] as f32 + 0.114 * texel[2] as f32) / 255.0
        }
    }
}

/// Builds an RGB normal map (unsigned Z) from a height field.
///
/// The gradient is a central difference expressed per tile width, so a ramp
/// rising by the full range across the image has slope 1 before scaling.
/// `wrap` selects wraparound sampling at the edges (tiling textures) instead
/// of clamping.
pub fn height_to_normal(image: &DecodedImage, slope_scale: f32, wrap: bool) -> DecodedImage {
    let (w, h) = (image.width as i64, image.height as i64);
    let heights: Vec<f32> = image.texels().map(height_of).collect();
    let sample = |x: i64, y: i64| -> f32 {
        let (x, y) = if wrap {
            (x.rem_euclid(w), y.rem_euclid(h))
        } else {
            (x.clamp(0, w - 1), y.clamp(0, h - 1))
        };
        heights[(y * w + x) as usize]
    };

    let mut out = DecodedImage::new(image.width, image.height, 3);
    for y in 0..h {
        for x in 0..w {
            let dx = (sample(x + 1, y) - sample(x - 1, y)) * 0.5 * w as f32;
            let dy = (sample(x, y + 1) - sample(x, y - 1)) * 0.5 * h as f32;
            // Image rows grow downward; tangent-space Y points up.
            let n = Vec3::new(-dx * slope_scale, dy * slope_scale, 1.0).normalize();
            let t = out.texel_mut(x as u32, y as u32);
            t[0] = pack_signed(n.x);
            t[1] = pack_signed(n.y);
            t[2] = ZPacking::Unsigned.pack(n.z);
        }
    }
    out
}
