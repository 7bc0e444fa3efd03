//! Texture channel categories and their file-name suffixes.

use std::fmt;

/// Number of [`Category`] variants.
pub const CATEGORY_COUNT: usize = 9;

/// The kind of data a texture file carries for a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Base color, RGBA.
    Color,
    /// Tangent-space normal map, RGB.
    Normal,
    /// Metalness, single channel.
    Metallic,
    /// Emission strength, single channel.
    Emission,
    /// Roughness, single channel.
    Roughness,
    /// Combined specular map (LabPBR layout), RGBA.
    Specular,
    /// Combined metallic/emission/roughness map, RGB.
    Mer,
    /// Normal map synthesized by an earlier tool run; folded into [`Category::Normal`].
    Synthetic,
    /// Height field; folded into [`Category::Normal`].
    Heightmap,
}

/// File-name suffixes, longest first so `_mer` is tried before `_m`.
const SUFFIXES: &[(&str, Category)] = &[
    ("_heightmap", Category::Heightmap),
    ("_synthetic", Category::Synthetic),
    ("_normal", Category::Normal),
    ("_mer", Category::Mer),
    ("_n", Category::Normal),
    ("_m", Category::Metallic),
    ("_e", Category::Emission),
    ("_r", Category::Roughness),
    ("_s", Category::Specular),
];

impl Category {
    /// Every category, in index order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Color,
        Category::Normal,
        Category::Metallic,
        Category::Emission,
        Category::Roughness,
        Category::Specular,
        Category::Mer,
        Category::Synthetic,
        Category::Heightmap,
    ];

    /// Categories that produce an atlas image.
    pub const OUTPUTS: [Category; 5] = [
        Category::Color,
        Category::Normal,
        Category::Metallic,
        Category::Emission,
        Category::Roughness,
    ];

    /// Dense index used by the file grid.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical file-name suffix (empty for color).
    pub fn suffix(self) -> &'static str {
        match self {
            Category::Color => "",
            Category::Normal => "_n",
            Category::Metallic => "_m",
            Category::Emission => "_e",
            Category::Roughness => "_r",
            Category::Specular => "_s",
            Category::Mer => "_mer",
            Category::Synthetic => "_synthetic",
            Category::Heightmap => "_heightmap",
        }
    }

    /// Channel count of this category's atlas or expected input.
    pub fn channels(self) -> u8 {
        match self {
            Category::Color | Category::Specular => 4,
            Category::Normal | Category::Mer | Category::Synthetic => 3,
            Category::Metallic | Category::Emission | Category::Roughness | Category::Heightmap => 1,
        }
    }

    /// The "unset" texel value an empty atlas cell holds.
    pub fn default_texel(self) -> &'static [u8] {
        match self {
            Category::Color => &[0, 0, 0, 0],
            Category::Normal | Category::Synthetic => &[128, 128, 255],
            Category::Metallic | Category::Emission | Category::Heightmap => &[0],
            Category::Roughness => &[255],
            Category::Specular => &[0, 0, 0, 255],
            Category::Mer => &[0, 0, 255],
        }
    }

    /// Returns `true` for the single-channel material categories.
    pub fn is_material_channel(self) -> bool {
        matches!(
            self,
            Category::Metallic | Category::Emission | Category::Roughness
        )
    }

    /// Splits a lower-case file stem into its base name and category.
    ///
    /// A stem without a recognised suffix is a color texture.
    pub fn split_suffix(stem: &str) -> (&str, Category) {
        for (suffix, category) in SUFFIXES {
            if let Some(base) = stem.strip_suffix(suffix)
                && !base.is_empty()
            {
                return (base, *category);
            }
        }
        (stem, Category::Color)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Color => "color",
            Category::Normal => "normal",
            Category::Metallic => "metallic",
            Category::Emission => "emission",
            Category::Roughness => "roughness",
            Category::Specular => "specular",
            Category::Mer => "MER",
            Category::Synthetic => "synthetic normal",
            Category::Heightmap => "heightmap",
        };
        f.pad(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_split_suffix() {
        assert_eq!(Category::split_suffix("stone"), ("stone", Category::Color));
        assert_eq!(Category::split_suffix("stone_n"), ("stone", Category::Normal));
        assert_eq!(Category::split_suffix("stone_normal"), ("stone", Category::Normal));
        assert_eq!(Category::split_suffix("stone_mer"), ("stone", Category::Mer));
        assert_eq!(Category::split_suffix("stone_m"), ("stone", Category::Metallic));
        assert_eq!(
            Category::split_suffix("stone_heightmap"),
            ("stone", Category::Heightmap)
        );
    }

    #[test]
    fn test_bare_suffix_is_not_stripped() {
        assert_eq!(Category::split_suffix("_n"), ("_n", Category::Color));
    }

    #[test]
    fn test_default_texel_width_matches_channels() {
        for c in Category::ALL {
            assert_eq!(c.default_texel().len(), c.channels() as usize, "{c}");
        }
    }
}
