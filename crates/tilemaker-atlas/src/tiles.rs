//! Tile registry: the fixed atlas layout mapping canonical tile names to grid cells.
//!
//! Every cell of the `TILE_GRID_COLUMNS x TILE_GRID_ROWS` grid has exactly one
//! [`TileSlot`]. Slots are addressed by a plain index (`row * 16 + column`), which
//! is the foreign key used by the file grid and the composite entity recipes.

// ---------------------------------------------------------------------------
// Behaviour flags
// ---------------------------------------------------------------------------

/// Tile repeats seamlessly across block faces.
pub const TILING: u16 = 0b0000_0001;
/// Tile is a cutout decal; its color image is expected to carry transparency.
pub const DECAL: u16 = 0b0000_0010;
/// Tile is a leaves texture.
pub const LEAVES: u16 = 0b0000_0100;
/// Pure black texels of an alpha-less color image are treated as transparent.
pub const BLACK_ALPHA: u16 = 0b0000_1000;
/// Tile is filled from a composite entity texture, not from a file of its own.
pub const ENTITY: u16 = 0b0001_0000;

/// Number of tile columns in every atlas.
pub const TILE_GRID_COLUMNS: u32 = 16;
/// Number of tile rows in every atlas.
pub const TILE_GRID_ROWS: u32 = 10;
/// Total number of tile slots.
pub const TILE_COUNT: usize = (TILE_GRID_COLUMNS * TILE_GRID_ROWS) as usize;

// ---------------------------------------------------------------------------
// TileSlot
// ---------------------------------------------------------------------------

/// One immutable registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSlot {
    /// Canonical (current) texture name.
    pub name: &'static str,
    /// Legacy texture name, empty when the tile never had one.
    pub alt_name: &'static str,
    /// Atlas column.
    pub column: u32,
    /// Atlas row.
    pub row: u32,
    /// Bitset of behaviour flags.
    pub flags: u16,
}

impl TileSlot {
    const fn new(
        column: u32,
        row: u32,
        name: &'static str,
        alt_name: &'static str,
        flags: u16,
    ) -> Self {
        Self {
            name,
            alt_name,
            column,
            row,
            flags,
        }
    }

    /// Returns `true` if every bit of `flag` is set.
    pub fn has(&self, flag: u16) -> bool {
        self.flags & flag == flag
    }
}

const T: u16 = TILING;
const D: u16 = DECAL;
const L: u16 = LEAVES;
const DB: u16 = DECAL | BLACK_ALPHA;
const E: u16 = ENTITY;

/// The registry, in index order.
pub static TILES: [TileSlot; TILE_COUNT] = [
    // row 0
    TileSlot::new(0, 0, "grass_block_top", "grass_top", T),
    TileSlot::new(1, 0, "stone", "", T),
    TileSlot::new(2, 0, "dirt", "", T),
    TileSlot::new(3, 0, "grass_block_side", "grass_side", T),
    TileSlot::new(4, 0, "oak_planks", "planks_oak", T),
    TileSlot::new(5, 0, "smooth_stone_slab_side", "stone_slab_side", T),
    TileSlot::new(6, 0, "smooth_stone", "stone_slab_top", T),
    TileSlot::new(7, 0, "bricks", "brick", T),
    TileSlot::new(8, 0, "tnt_side", "", T),
    TileSlot::new(9, 0, "tnt_top", "", T),
    TileSlot::new(10, 0, "tnt_bottom", "", T),
    TileSlot::new(11, 0, "cobweb", "web", D),
    TileSlot::new(12, 0, "poppy", "flower_rose", D),
    TileSlot::new(13, 0, "dandelion", "flower_dandelion", D),
    TileSlot::new(14, 0, "nether_portal", "portal", T),
    TileSlot::new(15, 0, "oak_sapling", "sapling_oak", D),
    // row 1
    TileSlot::new(0, 1, "cobblestone", "", T),
    TileSlot::new(1, 1, "bedrock", "", T),
    TileSlot::new(2, 1, "sand", "", T),
    TileSlot::new(3, 1, "gravel", "", T),
    TileSlot::new(4, 1, "oak_log", "log_oak", T),
    TileSlot::new(5, 1, "oak_log_top", "log_oak_top", T),
    TileSlot::new(6, 1, "iron_block", "", T),
    TileSlot::new(7, 1, "gold_block", "", T),
    TileSlot::new(8, 1, "diamond_block", "", T),
    TileSlot::new(9, 1, "emerald_block", "", T),
    TileSlot::new(10, 1, "redstone_block", "", T),
    TileSlot::new(11, 1, "dropper_front", "dropper_front_horizontal", 0),
    TileSlot::new(12, 1, "red_mushroom", "mushroom_red", D),
    TileSlot::new(13, 1, "brown_mushroom", "mushroom_brown", D),
    TileSlot::new(14, 1, "jungle_sapling", "sapling_jungle", D),
    TileSlot::new(15, 1, "fire_0", "fire_layer_0", D),
    // row 2
    TileSlot::new(0, 2, "gold_ore", "", T),
    TileSlot::new(1, 2, "iron_ore", "", T),
    TileSlot::new(2, 2, "coal_ore", "", T),
    TileSlot::new(3, 2, "bookshelf", "", T),
    TileSlot::new(4, 2, "mossy_cobblestone", "cobblestone_mossy", T),
    TileSlot::new(5, 2, "obsidian", "", T),
    TileSlot::new(6, 2, "grass_block_side_overlay", "grass_side_overlay", T),
    TileSlot::new(7, 2, "short_grass", "tallgrass", D),
    TileSlot::new(8, 2, "dispenser_front", "dispenser_front_horizontal", 0),
    TileSlot::new(9, 2, "beacon", "", 0),
    TileSlot::new(10, 2, "dropper_front_vertical", "", 0),
    TileSlot::new(11, 2, "crafting_table_top", "", 0),
    TileSlot::new(12, 2, "furnace_front", "furnace_front_off", 0),
    TileSlot::new(13, 2, "furnace_side", "", T),
    TileSlot::new(14, 2, "dispenser_front_vertical", "", 0),
    TileSlot::new(15, 2, "fire_1", "fire_layer_1", D),
    // row 3
    TileSlot::new(0, 3, "sponge", "", T),
    TileSlot::new(1, 3, "glass", "", D),
    TileSlot::new(2, 3, "diamond_ore", "", T),
    TileSlot::new(3, 3, "redstone_ore", "", T),
    TileSlot::new(4, 3, "oak_leaves", "leaves_oak", L),
    TileSlot::new(5, 3, "stone_bricks", "stonebrick", T),
    TileSlot::new(6, 3, "dead_bush", "deadbush", D),
    TileSlot::new(7, 3, "fern", "", D),
    TileSlot::new(8, 3, "daylight_detector_top", "", 0),
    TileSlot::new(9, 3, "daylight_detector_side", "", 0),
    TileSlot::new(10, 3, "crafting_table_side", "", 0),
    TileSlot::new(11, 3, "crafting_table_front", "", 0),
    TileSlot::new(12, 3, "furnace_front_on", "", 0),
    TileSlot::new(13, 3, "furnace_top", "", T),
    TileSlot::new(14, 3, "spruce_sapling", "sapling_spruce", D),
    TileSlot::new(15, 3, "white_wool", "wool_colored_white", T),
    // row 4
    TileSlot::new(0, 4, "spawner", "mob_spawner", D),
    TileSlot::new(1, 4, "snow", "", T),
    TileSlot::new(2, 4, "ice", "", T),
    TileSlot::new(3, 4, "grass_block_snow", "grass_side_snowed", T),
    TileSlot::new(4, 4, "cactus_top", "", D),
    TileSlot::new(5, 4, "cactus_side", "", D),
    TileSlot::new(6, 4, "cactus_bottom", "", D),
    TileSlot::new(7, 4, "clay", "", T),
    TileSlot::new(8, 4, "sugar_cane", "reeds", D),
    TileSlot::new(9, 4, "jukebox_side", "", 0),
    TileSlot::new(10, 4, "jukebox_top", "", 0),
    TileSlot::new(11, 4, "lily_pad", "waterlily", DB),
    TileSlot::new(12, 4, "mycelium_side", "", T),
    TileSlot::new(13, 4, "mycelium_top", "", T),
    TileSlot::new(14, 4, "birch_sapling", "sapling_birch", D),
    TileSlot::new(15, 4, "torch", "torch_on", D),
    // row 5
    TileSlot::new(0, 5, "oak_door_top", "door_wood_upper", D),
    TileSlot::new(1, 5, "iron_door_top", "door_iron_upper", D),
    TileSlot::new(2, 5, "ladder", "", D),
    TileSlot::new(3, 5, "oak_trapdoor", "trapdoor", D),
    TileSlot::new(4, 5, "iron_bars", "", D),
    TileSlot::new(5, 5, "farmland_moist", "farmland_wet", 0),
    TileSlot::new(6, 5, "farmland", "farmland_dry", 0),
    TileSlot::new(7, 5, "wheat_stage0", "wheat_stage_0", D),
    TileSlot::new(8, 5, "wheat_stage1", "wheat_stage_1", D),
    TileSlot::new(9, 5, "wheat_stage2", "wheat_stage_2", D),
    TileSlot::new(10, 5, "wheat_stage3", "wheat_stage_3", D),
    TileSlot::new(11, 5, "wheat_stage4", "wheat_stage_4", D),
    TileSlot::new(12, 5, "wheat_stage5", "wheat_stage_5", D),
    TileSlot::new(13, 5, "wheat_stage6", "wheat_stage_6", D),
    TileSlot::new(14, 5, "wheat_stage7", "wheat_stage_7", D),
    TileSlot::new(15, 5, "lever", "", D),
    // row 6
    TileSlot::new(0, 6, "oak_door_bottom", "door_wood_lower", D),
    TileSlot::new(1, 6, "iron_door_bottom", "door_iron_lower", D),
    TileSlot::new(2, 6, "redstone_torch", "redstone_torch_on", D),
    TileSlot::new(3, 6, "mossy_stone_bricks", "stonebrick_mossy", T),
    TileSlot::new(4, 6, "cracked_stone_bricks", "stonebrick_cracked", T),
    TileSlot::new(5, 6, "pumpkin_top", "", 0),
    TileSlot::new(6, 6, "netherrack", "", T),
    TileSlot::new(7, 6, "soul_sand", "", T),
    TileSlot::new(8, 6, "glowstone", "", T),
    TileSlot::new(9, 6, "piston_top_sticky", "", 0),
    TileSlot::new(10, 6, "piston_top", "piston_top_normal", 0),
    TileSlot::new(11, 6, "piston_side", "", 0),
    TileSlot::new(12, 6, "piston_bottom", "", 0),
    TileSlot::new(13, 6, "piston_inner", "", 0),
    TileSlot::new(14, 6, "melon_stem", "melon_stem_disconnected", D),
    TileSlot::new(15, 6, "rail_corner", "rail_normal_turned", D),
    // row 7
    TileSlot::new(0, 7, "black_wool", "wool_colored_black", T),
    TileSlot::new(1, 7, "gray_wool", "wool_colored_gray", T),
    TileSlot::new(2, 7, "redstone_torch_off", "", D),
    TileSlot::new(3, 7, "spruce_log", "log_spruce", T),
    TileSlot::new(4, 7, "birch_log", "log_birch", T),
    TileSlot::new(5, 7, "pumpkin_side", "", 0),
    TileSlot::new(6, 7, "carved_pumpkin", "pumpkin_face_off", 0),
    TileSlot::new(7, 7, "jack_o_lantern", "pumpkin_face_on", 0),
    TileSlot::new(8, 7, "cake_top", "", D),
    TileSlot::new(9, 7, "cake_side", "", D),
    TileSlot::new(10, 7, "cake_inner", "", D),
    TileSlot::new(11, 7, "cake_bottom", "", D),
    TileSlot::new(12, 7, "red_mushroom_block", "mushroom_block_skin_red", T),
    TileSlot::new(13, 7, "brown_mushroom_block", "mushroom_block_skin_brown", T),
    TileSlot::new(14, 7, "attached_melon_stem", "melon_stem_connected", D),
    TileSlot::new(15, 7, "rail", "rail_normal", D),
    // row 8
    TileSlot::new(0, 8, "redstone_dust_dot", "", DB),
    TileSlot::new(1, 8, "redstone_dust_line0", "redstone_dust_line", DB),
    TileSlot::new(2, 8, "redstone_dust_line1", "redstone_dust_line", DB),
    TileSlot::new(3, 8, "water_still", "", T),
    TileSlot::new(4, 8, "water_flow", "", T),
    TileSlot::new(5, 8, "lava_still", "", T),
    TileSlot::new(6, 8, "lava_flow", "", T),
    TileSlot::new(7, 8, "chest_top", "", E),
    TileSlot::new(8, 8, "chest_side", "", E),
    TileSlot::new(9, 8, "chest_front", "", E),
    TileSlot::new(10, 8, "trapped_chest_top", "", E),
    TileSlot::new(11, 8, "trapped_chest_side", "", E),
    TileSlot::new(12, 8, "trapped_chest_front", "", E),
    TileSlot::new(13, 8, "ender_chest_top", "", E),
    TileSlot::new(14, 8, "ender_chest_side", "", E),
    TileSlot::new(15, 8, "ender_chest_front", "", E),
    // row 9
    TileSlot::new(0, 9, "decorated_pot_top", "", E),
    TileSlot::new(1, 9, "decorated_pot_bottom", "", E),
    TileSlot::new(2, 9, "decorated_pot_side", "", E),
    TileSlot::new(3, 9, "sea_lantern", "", T),
    TileSlot::new(4, 9, "magma_block", "magma", T),
    TileSlot::new(5, 9, "shroomlight", "", T),
    TileSlot::new(6, 9, "redstone_lamp", "redstone_lamp_off", T),
    TileSlot::new(7, 9, "redstone_lamp_on", "", T),
    TileSlot::new(8, 9, "spruce_leaves", "leaves_spruce", L),
    TileSlot::new(9, 9, "birch_leaves", "leaves_birch", L),
    TileSlot::new(10, 9, "jungle_leaves", "leaves_jungle", L),
    TileSlot::new(11, 9, "acacia_leaves", "leaves_acacia", L),
    TileSlot::new(12, 9, "dark_oak_leaves", "leaves_big_oak", L),
    TileSlot::new(13, 9, "copper_block", "", T),
    TileSlot::new(14, 9, "cut_copper", "", T),
    TileSlot::new(15, 9, "exposed_copper", "", T),
];

/// Extra legacy names that are not any slot's own alternate name, as
/// `(alias, canonical name)` pairs.
pub static LEGACY_ALIASES: &[(&str, &str)] = &[
    ("grass_side_carried", "grass_block_side_overlay"),
    ("grass_carried", "grass_block_top"),
    ("magma_block_carried", "magma_block"),
];

/// Tile pairs that stand in for each other when only one of the two is supplied.
pub static SHARED_TILES: &[(&str, &str)] = &[
    ("redstone_dust_line0", "redstone_dust_line1"),
    ("smooth_stone", "smooth_stone_slab_side"),
    ("fire_0", "fire_1"),
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Returns the slot at `index`.
///
/// # Panics
///
/// Panics if `index >= TILE_COUNT`; indices are only produced by this module.
pub fn slot(index: usize) -> &'static TileSlot {
    &TILES[index]
}

/// Returns the index of the tile whose canonical name is `name` (case-insensitive).
pub fn find_by_name(name: &str) -> Option<usize> {
    TILES
        .iter()
        .position(|t| !t.name.is_empty() && t.name.eq_ignore_ascii_case(name))
}

/// Iterates every slot index whose alternate name equals `name`.
///
/// Several slots may share a legacy name (the single pre-split texture covers
/// all of its successors), so this yields zero or more indices lazily.
pub fn alternates(name: &str) -> impl Iterator<Item = usize> + '_ {
    TILES
        .iter()
        .enumerate()
        .filter(move |(_, t)| !t.alt_name.is_empty() && t.alt_name.eq_ignore_ascii_case(name))
        .map(|(i, _)| i)
}

/// Returns the index for a grid coordinate.
pub fn index_of(column: u32, row: u32) -> usize {
    (row * TILE_GRID_COLUMNS + column) as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_index_matches_coordinates() {
        for (i, t) in TILES.iter().enumerate() {
            assert_eq!(index_of(t.column, t.row), i, "slot {} is out of place", t.name);
        }
    }

    #[test]
    fn test_canonical_names_are_unique() {
        let mut seen = HashSet::new();
        for t in TILES.iter() {
            assert!(seen.insert(t.name), "duplicate canonical name {}", t.name);
        }
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        assert_eq!(find_by_name("STONE"), Some(1));
        assert_eq!(find_by_name("Grass_Block_Top"), Some(0));
        assert_eq!(find_by_name("not_a_tile"), None);
    }

    #[test]
    fn test_shared_legacy_name_yields_both_slots() {
        let hits: Vec<usize> = alternates("redstone_dust_line").collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(slot(hits[0]).name, "redstone_dust_line0");
        assert_eq!(slot(hits[1]).name, "redstone_dust_line1");
    }

    #[test]
    fn test_alternates_iterator_restarts() {
        let first: Vec<usize> = alternates("leaves_oak").collect();
        let second: Vec<usize> = alternates("leaves_oak").collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_shared_pairs_name_real_tiles() {
        for (a, b) in SHARED_TILES {
            assert!(find_by_name(a).is_some(), "{a} missing");
            assert!(find_by_name(b).is_some(), "{b} missing");
        }
    }

    #[test]
    fn test_legacy_aliases_name_real_tiles() {
        for (alias, canonical) in LEGACY_ALIASES {
            assert!(find_by_name(canonical).is_some(), "{alias} -> {canonical} missing");
        }
    }

    #[test]
    fn test_flags() {
        let torch = slot(find_by_name("torch").unwrap());
        assert!(torch.has(DECAL));
        assert!(!torch.has(TILING));
        let dust = slot(find_by_name("redstone_dust_dot").unwrap());
        assert!(dust.has(DECAL | BLACK_ALPHA));
    }
}
