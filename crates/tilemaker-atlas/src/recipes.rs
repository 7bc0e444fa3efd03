//! Composite entity recipes: how one square entity skin is cut into tiles.
//!
//! Rectangles are in recipe units. A source skin spans `source_units` units
//! across; a destination tile spans [`TILE_UNITS`]. Both are scaled to pixels
//! when a recipe is applied, so any power-of-two skin and tile size work.

use crate::compose::{AtlasBuffer, Flip, composite};
use crate::texture::{DecodedImage, Rect};
use crate::tiles;

/// Units across one destination tile.
pub const TILE_UNITS: u32 = 16;

/// Directory names whose files are entity skins instead of tiles.
pub const ENTITY_DIRECTORIES: &[&str] = &["chest", "decorated_pot"];

/// One copy from the skin into a destination tile.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    /// Index into the recipe's `tiles`.
    pub target: usize,
    pub src: Rect,
    pub dest: Rect,
    pub flip: Flip,
}

const fn place(target: usize, src: Rect, dest: Rect, flip: Flip) -> Placement {
    Placement {
        target,
        src,
        dest,
        flip,
    }
}

/// How one entity skin maps onto atlas tiles.
#[derive(Debug)]
pub struct CompositeEntityRecipe {
    /// Skin file base name, e.g. `trapped`.
    pub variant: &'static str,
    /// Directory the skin is found in.
    pub directory: &'static str,
    /// Units across the source skin.
    pub source_units: u32,
    /// Canonical names of the destination tiles.
    pub tiles: &'static [&'static str],
    pub placements: &'static [Placement],
}

impl CompositeEntityRecipe {
    /// Registry indices of the destination tiles, in `tiles` order.
    pub fn tile_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.tiles.iter().filter_map(|name| tiles::find_by_name(name))
    }

    /// Atlas-equivalent width of a skin `source_width` pixels across, i.e. the
    /// tile size at which the skin composites without scaling.
    pub fn logical_tile_width(&self, source_width: u32) -> u32 {
        (source_width * TILE_UNITS / self.source_units).max(1)
    }
}

// Chest skins are 64 units square. Lid and body faces are stored upside down.
// Targets: 0 = top, 1 = side, 2 = front.
const CHEST_PLACEMENTS: &[Placement] = &[
    // lid top
    place(0, Rect::new(14, 0, 14, 14), Rect::new(1, 1, 14, 14), Flip::VERTICAL),
    // lid and body side
    place(1, Rect::new(0, 14, 14, 5), Rect::new(1, 2, 14, 5), Flip::BOTH),
    place(1, Rect::new(0, 34, 14, 9), Rect::new(1, 7, 14, 9), Flip::BOTH),
    // lid and body front
    place(2, Rect::new(14, 14, 14, 5), Rect::new(1, 2, 14, 5), Flip::BOTH),
    place(2, Rect::new(14, 34, 14, 9), Rect::new(1, 7, 14, 9), Flip::BOTH),
    // latch
    place(2, Rect::new(1, 1, 2, 4), Rect::new(7, 5, 2, 4), Flip::BOTH),
];

// Pot base skins are 32 units: top face on the left, bottom on the right.
const POT_BASE_PLACEMENTS: &[Placement] = &[
    place(0, Rect::new(0, 13, 14, 14), Rect::new(1, 1, 14, 14), Flip::NONE),
    place(1, Rect::new(14, 13, 14, 14), Rect::new(1, 1, 14, 14), Flip::VERTICAL),
];

// Pot side skins are 16 units; the outer column on each side is unused.
const POT_SIDE_PLACEMENTS: &[Placement] = &[place(
    0,
    Rect::new(1, 0, 14, 16),
    Rect::new(1, 0, 14, 16),
    Flip::NONE,
)];

/// Every known recipe.
pub static RECIPES: &[CompositeEntityRecipe] = &[
    CompositeEntityRecipe {
        variant: "normal",
        directory: "chest",
        source_units: 64,
        tiles: &["chest_top", "chest_side", "chest_front"],
        placements: CHEST_PLACEMENTS,
    },
    CompositeEntityRecipe {
        variant: "trapped",
        directory: "chest",
        source_units: 64,
        tiles: &["trapped_chest_top", "trapped_chest_side", "trapped_chest_front"],
        placements: CHEST_PLACEMENTS,
    },
    CompositeEntityRecipe {
        variant: "ender",
        directory: "chest",
        source_units: 64,
        tiles: &["ender_chest_top", "ender_chest_side", "ender_chest_front"],
        placements: CHEST_PLACEMENTS,
    },
    CompositeEntityRecipe {
        variant: "decorated_pot_base",
        directory: "decorated_pot",
        source_units: 32,
        tiles: &["decorated_pot_top", "decorated_pot_bottom"],
        placements: POT_BASE_PLACEMENTS,
    },
    CompositeEntityRecipe {
        variant: "decorated_pot_side",
        directory: "decorated_pot",
        source_units: 16,
        tiles: &["decorated_pot_side"],
        placements: POT_SIDE_PLACEMENTS,
    },
];

/// Returns `true` if `name` is a directory of entity skins.
pub fn is_entity_directory(name: &str) -> bool {
    ENTITY_DIRECTORIES
        .iter()
        .any(|d| d.eq_ignore_ascii_case(name))
}

/// Looks up a recipe by variant name within an entity directory.
pub fn find_recipe(directory: &str, variant: &str) -> Option<&'static CompositeEntityRecipe> {
    RECIPES.iter().find(|r| {
        r.directory.eq_ignore_ascii_case(directory) && r.variant.eq_ignore_ascii_case(variant)
    })
}

/// Looks up a recipe by variant name alone.
pub fn recipe_by_variant(variant: &str) -> Option<&'static CompositeEntityRecipe> {
    RECIPES
        .iter()
        .find(|r| r.variant.eq_ignore_ascii_case(variant))
}

fn scale(r: Rect, num: u32, den: u32) -> Rect {
    let (x0, y0) = (r.x * num / den, r.y * num / den);
    let (x1, y1) = ((r.x + r.width) * num / den, (r.y + r.height) * num / den);
    Rect::new(x0, y0, x1 - x0, y1 - y0)
}

/// Applies every placement of `recipe` from `source` into `atlas`.
///
/// Each distinct destination tile is cleared once, before the first copy that
/// targets it. Placements that scale down to nothing are skipped. Returns the
/// number of copies made.
pub fn apply_recipe(
    atlas: &mut AtlasBuffer,
    recipe: &CompositeEntityRecipe,
    source: &DecodedImage,
) -> usize {
    let indices: Vec<Option<usize>> = recipe
        .tiles
        .iter()
        .map(|name| tiles::find_by_name(name))
        .collect();
    let tile_size = atlas.tile_size;
    let zoom = (tile_size * recipe.source_units) as f32 / (TILE_UNITS * source.width) as f32;

    let mut cleared: Vec<usize> = Vec::with_capacity(indices.len());
    let mut copies = 0;
    for p in recipe.placements {
        let Some(Some(index)) = indices.get(p.target).copied() else {
            continue;
        };
        let src = scale(p.src, source.width, recipe.source_units);
        let dest = scale(p.dest, tile_size, TILE_UNITS);
        if src.is_empty() || dest.is_empty() {
            continue;
        }
        let slot = tiles::slot(index);
        if !cleared.contains(&index) {
            atlas.clear_tile(slot.column, slot.row);
            cleared.push(index);
        }
        composite(atlas, slot.column, slot.row, source, src, dest, p.flip, zoom);
        copies += 1;
    }
    copies
}
