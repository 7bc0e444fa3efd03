//! File grid: at most one resolved input file per (category, tile) cell.
//!
//! Built during discovery, then adjusted by the sharing, legacy-folding and
//! naming passes, and pruned by validation and classification.

use std::path::{Path, PathBuf};

use crate::category::{CATEGORY_COUNT, Category};
use crate::diagnostics::{DiagnosticClass, Diagnostics};
use crate::names::{resolve_name, texture_stem};
use crate::recipes;
use crate::tiles::{self, SHARED_TILES, TILE_COUNT};

// ---------------------------------------------------------------------------
// FileRecord
// ---------------------------------------------------------------------------

/// A discovered input file bound to one grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    /// Lower-case base name the file resolved through.
    pub root_name: String,
    /// File name including extension, as found on disk.
    pub filename: String,
    /// Directory containing the file.
    pub dir: PathBuf,
    /// Cleared when the cell is deleted.
    pub exists: bool,
    /// `true` if a legacy name was needed to resolve the file.
    pub alternate: bool,
}

impl FileRecord {
    pub fn new(root_name: &str, filename: &str, dir: &Path, alternate: bool) -> Self {
        Self {
            root_name: root_name.to_string(),
            filename: filename.to_string(),
            dir: dir.to_path_buf(),
            exists: true,
            alternate,
        }
    }

    /// Full path of the file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// What happened to a file offered to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Stored in at least one empty cell.
    Added,
    /// Every target cell was already occupied; the earlier file was kept.
    Duplicate,
    /// The name matched no tile.
    Ignored,
}

// ---------------------------------------------------------------------------
// FileGrid
// ---------------------------------------------------------------------------

/// Category x tile table of resolved files with per-category occupancy counts.
#[derive(Clone, Debug)]
pub struct FileGrid {
    cells: Vec<Option<FileRecord>>,
    counts: [usize; CATEGORY_COUNT],
}

impl Default for FileGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl FileGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![None; CATEGORY_COUNT * TILE_COUNT],
            counts: [0; CATEGORY_COUNT],
        }
    }

    fn cell_index(category: Category, tile: usize) -> usize {
        category.index() * TILE_COUNT + tile
    }

    /// Returns the record in a cell if the cell is occupied.
    pub fn get(&self, category: Category, tile: usize) -> Option<&FileRecord> {
        self.cells[Self::cell_index(category, tile)]
            .as_ref()
            .filter(|r| r.exists)
    }

    pub fn is_occupied(&self, category: Category, tile: usize) -> bool {
        self.get(category, tile).is_some()
    }

    /// Number of occupied cells in a category.
    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// Total number of occupied cells.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterates the occupied tile indices of a category in registry order.
    pub fn occupied(&self, category: Category) -> impl Iterator<Item = usize> + '_ {
        (0..TILE_COUNT).filter(move |&t| self.is_occupied(category, t))
    }

    /// Stores `record` in an empty cell. Returns `false` if the cell is occupied.
    pub fn insert(&mut self, category: Category, tile: usize, record: FileRecord) -> bool {
        if self.is_occupied(category, tile) {
            return false;
        }
        self.cells[Self::cell_index(category, tile)] = Some(FileRecord {
            exists: true,
            ..record
        });
        self.counts[category.index()] += 1;
        true
    }

    /// Clears a cell and decrements its category count. No-op on empty cells.
    pub fn delete_file(&mut self, category: Category, tile: usize) {
        let idx = Self::cell_index(category, tile);
        if let Some(record) = self.cells[idx].as_mut()
            && record.exists
        {
            record.exists = false;
            self.counts[category.index()] -= 1;
        }
    }

    /// Removes and returns a cell's record.
    fn take(&mut self, category: Category, tile: usize) -> Option<FileRecord> {
        let record = self.get(category, tile).cloned()?;
        self.delete_file(category, tile);
        Some(record)
    }

    /// Resolves a discovered file and stores it in every cell it names.
    ///
    /// The first file to reach a cell keeps it; later ones are reported as
    /// duplicates. Files matching no tile are reported as unused.
    pub fn resolve(
        &mut self,
        dir: &Path,
        filename: &str,
        use_alternates: bool,
        diagnostics: &mut Diagnostics,
    ) -> ResolveOutcome {
        let Some(stem) = texture_stem(filename) else {
            return ResolveOutcome::Ignored;
        };
        let Some(found) = resolve_name(&stem, use_alternates) else {
            diagnostics.warn(
                DiagnosticClass::UnusedFile,
                format!(
                    "{} does not match any known tile and is not used",
                    dir.join(filename).display()
                ),
            );
            return ResolveOutcome::Ignored;
        };

        // Entity tiles are only filled from whole skins in an entity directory.
        let targets: Vec<usize> = found
            .tiles
            .iter()
            .copied()
            .filter(|&t| !tiles::slot(t).has(tiles::ENTITY))
            .collect();
        if targets.is_empty() {
            diagnostics.warn(
                DiagnosticClass::UnusedFile,
                format!(
                    "{} names a tile cut from an entity skin; put the whole skin in a {} directory instead",
                    dir.join(filename).display(),
                    recipes::ENTITY_DIRECTORIES.join(" or ")
                ),
            );
            return ResolveOutcome::Ignored;
        }

        self.store(
            found.category,
            &targets,
            &found.base,
            found.alternate,
            dir,
            filename,
            diagnostics,
        )
    }

    /// Resolves a file found in an entity skin directory such as `chest`.
    ///
    /// The stem (minus any category suffix) names a recipe variant; the file
    /// is stored in every tile the recipe draws into.
    pub fn resolve_entity(
        &mut self,
        dir: &Path,
        directory_name: &str,
        filename: &str,
        diagnostics: &mut Diagnostics,
    ) -> ResolveOutcome {
        let Some(stem) = texture_stem(filename) else {
            return ResolveOutcome::Ignored;
        };
        let (base, category) = Category::split_suffix(&stem);
        let Some(recipe) = recipes::find_recipe(directory_name, base) else {
            diagnostics.warn(
                DiagnosticClass::UnusedFile,
                format!(
                    "{} is not a known {directory_name} skin and is not used",
                    dir.join(filename).display()
                ),
            );
            return ResolveOutcome::Ignored;
        };
        let tiles: Vec<usize> = recipe.tile_indices().collect();
        self.store(category, &tiles, recipe.variant, false, dir, filename, diagnostics)
    }

    #[allow(clippy::too_many_arguments)]
    fn store(
        &mut self,
        category: Category,
        targets: &[usize],
        root_name: &str,
        alternate: bool,
        dir: &Path,
        filename: &str,
        diagnostics: &mut Diagnostics,
    ) -> ResolveOutcome {
        let mut added = false;
        for &tile in targets {
            let record = FileRecord::new(root_name, filename, dir, alternate);
            if self.insert(category, tile, record) {
                tracing::debug!("{} -> {} ({})", filename, tiles::slot(tile).name, category);
                added = true;
            } else if let Some(existing) = self.get(category, tile) {
                diagnostics.warn(
                    DiagnosticClass::DuplicateFile,
                    format!(
                        "{} and {} both supply the {} texture for {}; keeping the first",
                        existing.path().display(),
                        dir.join(filename).display(),
                        category,
                        tiles::slot(tile).name
                    ),
                );
            }
        }

        if added {
            ResolveOutcome::Added
        } else {
            ResolveOutcome::Duplicate
        }
    }

    /// For every category, copies the record of whichever of `a`/`b` is occupied
    /// into the other one, if exactly one of them is. Returns the number of
    /// cells filled.
    pub fn share_file_records(&mut self, a: usize, b: usize) -> usize {
        let mut copied = 0;
        for category in Category::ALL {
            let source = match (self.get(category, a), self.get(category, b)) {
                (Some(r), None) => Some((r.clone(), b)),
                (None, Some(r)) => Some((r.clone(), a)),
                _ => None,
            };
            if let Some((record, target)) = source
                && self.insert(category, target, record)
            {
                copied += 1;
            }
        }
        copied
    }

    /// Applies [`share_file_records`](Self::share_file_records) to every
    /// interchangeable tile pair, warning about each pair that was filled in.
    pub fn share_pairs(&mut self, diagnostics: &mut Diagnostics) -> usize {
        let mut total = 0;
        for (a, b) in SHARED_TILES {
            let (Some(ia), Some(ib)) = (tiles::find_by_name(a), tiles::find_by_name(b)) else {
                continue;
            };
            let copied = self.share_file_records(ia, ib);
            if copied > 0 {
                diagnostics.warn(
                    DiagnosticClass::SharedFile,
                    format!("only one of {a} and {b} was supplied; the same image is used for both"),
                );
            }
            total += copied;
        }
        total
    }

    /// Folds the legacy `_synthetic` and `_heightmap` categories into Normal.
    ///
    /// Priority is Normal, then Synthetic, then Heightmap. Returns the tiles whose
    /// normal cell now holds a height field, which must take the conversion path.
    pub fn fold_legacy_normals(&mut self, diagnostics: &mut Diagnostics) -> Vec<usize> {
        let mut height_tiles = Vec::new();
        for tile in 0..TILE_COUNT {
            for legacy in [Category::Synthetic, Category::Heightmap] {
                let Some(record) = self.take(legacy, tile) else {
                    continue;
                };
                if let Some(kept) = self.get(Category::Normal, tile) {
                    diagnostics.warn(
                        DiagnosticClass::DuplicateFile,
                        format!(
                            "{} is ignored because {} already supplies the normal map for {}",
                            record.filename,
                            kept.filename,
                            tiles::slot(tile).name
                        ),
                    );
                    continue;
                }
                self.insert(Category::Normal, tile, record);
                if legacy == Category::Heightmap {
                    height_tiles.push(tile);
                }
            }
        }
        height_tiles
    }

    /// Best-effort repair of swapped grass side/overlay files.
    ///
    /// Some packs ship the solid grass side under a "carried" name that resolves
    /// to the overlay slot. When the overlay's file name contains `carried` and
    /// the side's does not, the two records are exchanged. This is a filename
    /// heuristic; it does not look at image content.
    pub fn fix_grass_overlay_swap(&mut self, diagnostics: &mut Diagnostics) -> bool {
        let (Some(side), Some(overlay)) = (
            tiles::find_by_name("grass_block_side"),
            tiles::find_by_name("grass_block_side_overlay"),
        ) else {
            return false;
        };

        let overlay_carried = self
            .get(Category::Color, overlay)
            .is_some_and(|r| r.filename.to_ascii_lowercase().contains("carried"));
        let side_carried = self
            .get(Category::Color, side)
            .is_some_and(|r| r.filename.to_ascii_lowercase().contains("carried"));
        if !overlay_carried || side_carried {
            return false;
        }

        let overlay_record = self.take(Category::Color, overlay);
        let side_record = self.take(Category::Color, side);
        if let Some(r) = overlay_record {
            diagnostics.warn(
                DiagnosticClass::NamingSwap,
                format!(
                    "{} looks like a solid grass side, not an overlay; using it as grass_block_side (best guess)",
                    r.filename
                ),
            );
            self.insert(Category::Color, side, r);
        }
        if let Some(r) = side_record {
            self.insert(Category::Color, overlay, r);
        }
        true
    }

    /// Warns about tiles that have auxiliary channels but no color image, or
    /// a color image with only some of its material channels.
    pub fn check_counterparts(&self, diagnostics: &mut Diagnostics) {
        for tile in 0..TILE_COUNT {
            let name = tiles::slot(tile).name;
            let color = self.is_occupied(Category::Color, tile);
            for category in [
                Category::Normal,
                Category::Metallic,
                Category::Emission,
                Category::Roughness,
                Category::Specular,
                Category::Mer,
            ] {
                if !color
                    && let Some(r) = self.get(category, tile)
                    && !tiles::slot(tile).has(tiles::ENTITY)
                {
                    diagnostics.warn(
                        DiagnosticClass::MissingCounterpart,
                        format!(
                            "{} supplies a {category} texture for {name}, but there is no color texture for it",
                            r.filename
                        ),
                    );
                }
            }
        }
    }
}
