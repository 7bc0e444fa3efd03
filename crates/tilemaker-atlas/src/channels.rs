//! Splitting combined material images into single material channels.
//!
//! `_mer` images carry metallic, emission and roughness in R, G and B.
//! `_s` images follow the LabPBR specular layout: R is perceptual smoothness,
//! G is F0 (values of 230 and up mark metals), A is emission with 255 meaning
//! "none".

use crate::category::Category;
use crate::texture::DecodedImage;

/// F0 values at or above this mark a metal.
pub const METAL_F0: u8 = 230;

/// Extracts `target` (Metallic, Emission or Roughness) from a combined image
/// of category `source` (Mer or Specular) as a one-channel image.
///
/// Returns `None` for any other pair of categories.
pub fn extract(source: Category, image: &DecodedImage, target: Category) -> Option<DecodedImage> {
    let convert: fn(&[u8]) -> u8 = match (source, target) {
        (Category::Mer, Category::Metallic) => |t| t[0],
        (Category::Mer, Category::Emission) => |t| t[1],
        (Category::Mer, Category::Roughness) => |t| t[2],
        (Category::Specular, Category::Metallic) => specular_metallic,
        (Category::Specular, Category::Emission) => specular_emission,
        (Category::Specular, Category::Roughness) => specular_roughness,
        _ => return None,
    };
    // Normalise to RGBA so the closures can index freely; missing alpha is opaque.
    let rgba = image.to_channels(4);
    let mut out = DecodedImage::new(image.width, image.height, 1);
    for (src, dst) in rgba.texels().zip(out.pixels.iter_mut()) {
        *dst = convert(src);
    }
    Some(out)
}

fn specular_metallic(t: &[u8]) -> u8 {
    if t[1] >= METAL_F0 { 255 } else { 0 }
}

fn specular_emission(t: &[u8]) -> u8 {
    let a = t[3] as u32;
    if a < 255 { (a * 255 / 254) as u8 } else { 0 }
}

fn specular_roughness(t: &[u8]) -> u8 {
    let smooth = t[0] as f32 / 255.0;
    let rough = (1.0 - smooth) * (1.0 - smooth);
    (rough * 255.0).round() as u8
}

/// Combined categories that can stand in for `target`, in priority order.
pub fn combined_sources(target: Category) -> &'static [Category] {
    match target {
        Category::Metallic | Category::Emission | Category::Roughness => {
            &[Category::Mer, Category::Specular]
        }
        _ => &[],
    }
}
