//! Name resolution: maps a texture file name to tile slots and a category.

use crate::category::Category;
use crate::tiles::{self, LEGACY_ALIASES};

/// Image file extensions considered during discovery.
pub const TEXTURE_EXTENSIONS: &[&str] = &["png", "tga", "jpg", "jpeg"];

/// Result of resolving a file stem against the tile registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameMatch {
    /// Lower-case base name after the category suffix was stripped.
    pub base: String,
    /// Category selected by the suffix.
    pub category: Category,
    /// Matching tile indices, normally exactly one.
    pub tiles: Vec<usize>,
    /// `true` if the match came through a legacy name.
    pub alternate: bool,
}

/// Splits `filename` into a lower-case stem if it has a texture extension.
pub fn texture_stem(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    TEXTURE_EXTENSIONS
        .contains(&ext.as_str())
        .then(|| stem.to_ascii_lowercase())
}

/// Resolves a file stem (extension already removed) to its tiles.
///
/// The canonical name is tried first; legacy names are consulted only when
/// `use_alternates` is set. Returns `None` when nothing matches at all.
pub fn resolve_name(stem: &str, use_alternates: bool) -> Option<NameMatch> {
    let lower = stem.to_ascii_lowercase();
    let (base, category) = Category::split_suffix(&lower);

    if let Some(found) = lookup(base, category, use_alternates) {
        return Some(found);
    }

    // A tile whose canonical name happens to end in a type suffix.
    if category != Category::Color {
        return lookup(&lower, Category::Color, use_alternates);
    }
    None
}

fn lookup(base: &str, category: Category, use_alternates: bool) -> Option<NameMatch> {
    let make = |tiles: Vec<usize>, alternate: bool| NameMatch {
        base: base.to_string(),
        category,
        tiles,
        alternate,
    };

    if let Some(index) = tiles::find_by_name(base) {
        return Some(make(vec![index], false));
    }
    if !use_alternates {
        return None;
    }

    let hits: Vec<usize> = tiles::alternates(base).collect();
    if !hits.is_empty() {
        return Some(make(hits, true));
    }

    LEGACY_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(base))
        .and_then(|(_, canonical)| tiles::find_by_name(canonical))
        .map(|index| make(vec![index], true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::slot;

    #[test]
    fn test_texture_stem() {
        assert_eq!(texture_stem("Stone.PNG").as_deref(), Some("stone"));
        assert_eq!(texture_stem("grass_n.tga").as_deref(), Some("grass_n"));
        assert_eq!(texture_stem("pack.mcmeta"), None);
        assert_eq!(texture_stem("noext"), None);
        assert_eq!(texture_stem(".png"), None);
    }

    #[test]
    fn test_canonical_match() {
        let m = resolve_name("stone_n", true).unwrap();
        assert_eq!(m.category, Category::Normal);
        assert_eq!(m.tiles.len(), 1);
        assert_eq!(slot(m.tiles[0]).name, "stone");
        assert!(!m.alternate);
    }

    #[test]
    fn test_alternate_match() {
        let m = resolve_name("planks_oak_r", true).unwrap();
        assert_eq!(m.category, Category::Roughness);
        assert_eq!(slot(m.tiles[0]).name, "oak_planks");
        assert!(m.alternate);
    }

    #[test]
    fn test_alternates_disabled() {
        assert!(resolve_name("planks_oak", false).is_none());
        assert!(resolve_name("oak_planks", false).is_some());
    }

    #[test]
    fn test_legacy_name_with_two_successors() {
        let m = resolve_name("redstone_dust_line", true).unwrap();
        assert_eq!(m.tiles.len(), 2);
    }

    #[test]
    fn test_legacy_alias_table() {
        let m = resolve_name("grass_side_carried", true).unwrap();
        assert_eq!(slot(m.tiles[0]).name, "grass_block_side_overlay");
        assert!(m.alternate);
    }

    #[test]
    fn test_no_match() {
        assert!(resolve_name("definitely_not_a_block", true).is_none());
        assert!(resolve_name("definitely_not_a_block_n", true).is_none());
    }
}
