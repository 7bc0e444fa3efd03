//! Content classification of decoded images.
//!
//! Material channels are checked for being entirely at their "unset" value.
//! Bump maps are sorted into true normal maps, height fields, and anything
//! else, and rejected when they carry no variation at all.

use crate::category::Category;
use crate::texture::DecodedImage;

/// Largest per-channel difference still counted as "no variation".
pub const FLAT_EPSILON: u8 = 2;
/// Largest R/G/B spread of a texel still counted as gray.
pub const GRAY_TOLERANCE: u8 = 2;
/// Share of texels that must point outward (blue >= 128) in a normal map.
const OUTWARD_SHARE: f32 = 0.9;

/// What the classifier decided about an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Use as is.
    Usable,
    /// Every texel holds the category's default value.
    Unused,
    /// A bump map with no variation.
    Flat,
    /// An encoded normal map.
    NormalMap,
    /// A gray or single-channel height field.
    HeightField,
    /// A colored bump map that is not a normal map; usable as a height field.
    Unrecognized,
}

/// Classifies `image` as input for `category`.
pub fn classify(image: &DecodedImage, category: Category) -> Classification {
    match category {
        c if c.is_material_channel() => {
            let unset = category.default_texel()[0];
            if image.texels().all(|t| t[0] == unset) {
                Classification::Unused
            } else {
                Classification::Usable
            }
        }
        Category::Normal | Category::Synthetic | Category::Heightmap => {
            let kind = bump_kind(image);
            if is_flat(image) {
                Classification::Flat
            } else {
                kind
            }
        }
        _ => Classification::Usable,
    }
}

/// Number of color channels, i.e. ignoring alpha.
fn color_channels(image: &DecodedImage) -> usize {
    match image.channels {
        1 | 2 => 1,
        _ => 3,
    }
}

/// Returns `true` if every texel is within [`FLAT_EPSILON`] of the first one.
pub fn is_flat(image: &DecodedImage) -> bool {
    let n = color_channels(image);
    let mut texels = image.texels();
    let Some(first) = texels.next() else {
        return true;
    };
    let first = &first[..n];
    texels.all(|t| {
        t[..n]
            .iter()
            .zip(first)
            .all(|(a, b)| a.abs_diff(*b) <= FLAT_EPSILON)
    })
}

/// Returns `true` if every texel has R, G and B within [`GRAY_TOLERANCE`].
pub fn is_grayscale(image: &DecodedImage) -> bool {
    if color_channels(image) == 1 {
        return true;
    }
    image
        .texels()
        .all(|t| t[0].abs_diff(t[1]) <= GRAY_TOLERANCE && t[1].abs_diff(t[2]) <= GRAY_TOLERANCE)
}

/// Three-way bump map test, ignoring flatness.
pub fn bump_kind(image: &DecodedImage) -> Classification {
    if is_grayscale(image) {
        return Classification::HeightField;
    }

    let mut seen_r = [false; 256];
    let mut seen_g = [false; 256];
    let mut seen_b = [false; 256];
    let mut outward = 0usize;
    let mut total = 0usize;
    for t in image.texels() {
        seen_r[t[0] as usize] = true;
        seen_g[t[1] as usize] = true;
        seen_b[t[2] as usize] = true;
        if t[2] >= 128 {
            outward += 1;
        }
        total += 1;
    }
    let distinct = |seen: &[bool; 256]| seen.iter().filter(|&&s| s).count();

    // Z must move with X/Y in a real normal map; a constant blue under
    // varying red/green is something else.
    let xy_varies = distinct(&seen_r) > 1 || distinct(&seen_g) > 1;
    let z_tracks = !xy_varies || distinct(&seen_b) >= 2;
    let mostly_outward = outward as f32 >= total as f32 * OUTWARD_SHARE;

    if mostly_outward && z_tracks {
        Classification::NormalMap
    } else {
        Classification::Unrecognized
    }
}

/// Moves roughness texels at zero up to one, so a deliberate "perfectly smooth"
/// value never reads as missing data downstream. Works on the first channel.
pub fn nudge_roughness(image: &mut DecodedImage) -> usize {
    let mut nudged = 0;
    for t in image.texels_mut() {
        if t[0] == 0 {
            t[0] = 1;
            nudged += 1;
        }
    }
    nudged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_bump(size: u32) -> DecodedImage {
        // Bumpy unit normals: tilt in x varies along the row.
        let mut img = DecodedImage::new(size, size, 3);
        for y in 0..size {
            for x in 0..size {
                let nx = ((x as f32 / size as f32) - 0.5) * 0.8;
                let nz = (1.0 - nx * nx).sqrt();
                let t = img.texel_mut(x, y);
                t[0] = ((nx + 1.0) * 127.5).round() as u8;
                t[1] = 128;
                t[2] = ((nz + 1.0) * 127.5).round() as u8;
            }
        }
        img
    }

    #[test]
    fn test_all_zero_metallic_is_unused() {
        let img = DecodedImage::filled(8, 8, &[0]);
        assert_eq!(classify(&img, Category::Metallic), Classification::Unused);
        assert_eq!(classify(&img, Category::Emission), Classification::Unused);
        assert_eq!(classify(&img, Category::Roughness), Classification::Usable);
    }

    #[test]
    fn test_all_max_roughness_is_unused() {
        let img = DecodedImage::filled(8, 8, &[255]);
        assert_eq!(classify(&img, Category::Roughness), Classification::Unused);
        assert_eq!(classify(&img, Category::Metallic), Classification::Usable);
    }

    #[test]
    fn test_normal_map_detected() {
        assert_eq!(classify(&normal_bump(16), Category::Normal), Classification::NormalMap);
    }

    #[test]
    fn test_gray_image_is_height_field() {
        let mut img = DecodedImage::new(8, 8, 3);
        for (i, t) in img.texels_mut().enumerate() {
            let v = (i * 4) as u8;
            t.copy_from_slice(&[v, v, v]);
        }
        assert_eq!(classify(&img, Category::Normal), Classification::HeightField);

        let mut single = DecodedImage::new(8, 8, 1);
        single.pixels[5] = 200;
        assert_eq!(classify(&single, Category::Normal), Classification::HeightField);
    }

    #[test]
    fn test_flat_bump_map() {
        let img = DecodedImage::filled(8, 8, &[128, 128, 255]);
        assert_eq!(classify(&img, Category::Normal), Classification::Flat);
        let gray = DecodedImage::filled(8, 8, &[90]);
        assert_eq!(classify(&gray, Category::Normal), Classification::Flat);
    }

    #[test]
    fn test_colored_non_normal_is_unrecognized() {
        // Red/green noise with a dark, constant blue.
        let mut img = DecodedImage::new(8, 8, 3);
        for (i, t) in img.texels_mut().enumerate() {
            t.copy_from_slice(&[(i * 3) as u8, (i * 7) as u8, 20]);
        }
        assert_eq!(classify(&img, Category::Normal), Classification::Unrecognized);
    }

    #[test]
    fn test_nudge_roughness() {
        let mut img = DecodedImage::new(2, 2, 1);
        img.pixels = vec![0, 5, 0, 255];
        assert_eq!(nudge_roughness(&mut img), 2);
        assert_eq!(img.pixels, vec![1, 5, 1, 255]);
    }
}
