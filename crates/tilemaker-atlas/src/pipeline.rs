//! The pipeline driver: discovery, grid passes, validation, per-category
//! classification/repair/compositing, and atlas output.
//!
//! Runs single-threaded, category by category and tile by tile. Only one
//! decoded source image and one atlas are alive at any time.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::category::Category;
use crate::channels;
use crate::classify::{Classification, classify, nudge_roughness};
use crate::codec::ImageCodec;
use crate::compose::{AtlasBuffer, Flip, composite, zoom_for};
use crate::diagnostics::{DiagnosticClass, Diagnostics};
use crate::discover::{self, WalkOptions};
use crate::error::PipelineError;
use crate::grid::{FileGrid, FileRecord};
use crate::normals::{self, DEFAULT_SLOPE_SCALE};
use crate::recipes::{self, CompositeEntityRecipe};
use crate::texture::{DecodedImage, Rect};
use crate::tiles::{self, TILE_COUNT};
use crate::validate::{TileShape, validate};
use crate::writer;

/// Plain parameters of one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Searched in order; earlier directories win duplicate names.
    pub input_dirs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Output file stem; category suffixes are appended.
    pub output_name: String,
    /// Output tile size; otherwise the largest input tile width.
    pub forced_tile_size: Option<u32>,
    /// Existing color atlas to start from.
    pub base_image: Option<PathBuf>,
    /// Frame taken from vertical animation strips.
    pub chosen_frame: Option<u32>,
    /// Height field slope scale.
    pub slope_scale: f32,
    /// Log every placed file at `info` instead of `debug`.
    pub verbose: bool,
    /// Renormalize normal maps.
    pub clean_normals: bool,
    /// Resolve legacy texture names.
    pub use_alternates: bool,
    /// Directory names never descended into.
    pub skip_directories: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input_dirs: Vec::new(),
            output_dir: PathBuf::from("."),
            output_name: "terrainExt".to_string(),
            forced_tile_size: None,
            base_image: None,
            chosen_frame: None,
            slope_scale: DEFAULT_SLOPE_SCALE,
            verbose: false,
            clean_normals: true,
            use_alternates: true,
            skip_directories: Vec::new(),
        }
    }
}

/// Outcome of a run that was not stopped by a fatal error.
#[derive(Debug)]
pub struct RunReport {
    /// Output tile size, 0 if nothing survived validation.
    pub tile_size: u32,
    /// Atlases written, in category order.
    pub written: Vec<(Category, PathBuf)>,
    /// Distinct source files composited into some atlas.
    pub processed_files: usize,
    pub diagnostics: Diagnostics,
}

impl RunReport {
    /// Returns `true` if something was produced and no error was counted.
    pub fn succeeded(&self) -> bool {
        self.processed_files > 0 && self.diagnostics.error_count() == 0
    }

    /// Path of the atlas written for `category`, if any.
    pub fn output(&self, category: Category) -> Option<&Path> {
        self.written
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| p.as_path())
    }
}

/// Runs the whole pipeline.
///
/// # Errors
///
/// Only the fatal conditions of [`PipelineError`]; everything else is
/// reported through the returned diagnostics.
pub fn run(options: &PipelineOptions, codec: &impl ImageCodec) -> Result<RunReport, PipelineError> {
    if let Some(size) = options.forced_tile_size
        && !size.is_power_of_two()
    {
        return Err(PipelineError::TileSizeNotPowerOfTwo(size));
    }
    std::fs::create_dir_all(&options.output_dir).map_err(|source| {
        PipelineError::OutputDirectory {
            path: options.output_dir.clone(),
            source,
        }
    })?;

    let mut pipeline = Pipeline::new(options, codec);
    discover::discover(
        &options.input_dirs,
        WalkOptions {
            use_alternates: options.use_alternates,
            skip_directories: &options.skip_directories,
        },
        &mut pipeline.grid,
        &mut pipeline.diagnostics,
    )?;
    if pipeline.grid.total() == 0 {
        return Err(PipelineError::NoUsableInput);
    }

    pipeline.adjust_grid();
    let widest = pipeline.check_dimensions();
    let tile_size = options.forced_tile_size.unwrap_or(widest);
    if tile_size == 0 {
        tracing::warn!("no input survived validation; nothing to write");
        return Ok(pipeline.finish(0));
    }
    tracing::info!("output tile size {tile_size}");

    for category in Category::OUTPUTS {
        pipeline.build_category(category, tile_size)?;
    }
    Ok(pipeline.finish(tile_size))
}

// ---------------------------------------------------------------------------
// Pipeline state
// ---------------------------------------------------------------------------

/// What became of one source image on its way to an atlas.
enum Prepared {
    Ready(DecodedImage),
    /// Unusable; its cell is removed from the grid.
    Rejected,
    /// Nothing to contribute, but the cell stays (combined sources).
    Skipped,
}

struct Pipeline<'a, C: ImageCodec> {
    options: &'a PipelineOptions,
    codec: &'a C,
    grid: FileGrid,
    diagnostics: Diagnostics,
    /// Validated shape per source path.
    shapes: FxHashMap<PathBuf, TileShape>,
    /// Paths that already failed; later cells holding them are dropped quietly.
    failed: FxHashSet<PathBuf>,
    /// Tiles whose normal cell came from a `_heightmap` file.
    height_tiles: FxHashSet<usize>,
    frame_warned: FxHashSet<PathBuf>,
    processed: FxHashSet<PathBuf>,
    written: Vec<(Category, PathBuf)>,
}

impl<'a, C: ImageCodec> Pipeline<'a, C> {
    fn new(options: &'a PipelineOptions, codec: &'a C) -> Self {
        Self {
            options,
            codec,
            grid: FileGrid::new(),
            diagnostics: Diagnostics::new(),
            shapes: FxHashMap::default(),
            failed: FxHashSet::default(),
            height_tiles: FxHashSet::default(),
            frame_warned: FxHashSet::default(),
            processed: FxHashSet::default(),
            written: Vec::new(),
        }
    }

    fn finish(self, tile_size: u32) -> RunReport {
        tracing::info!(
            "done: {} file(s) processed, {} atlas(es) written, {} error(s), {} warning(s)",
            self.processed.len(),
            self.written.len(),
            self.diagnostics.error_count(),
            self.diagnostics.warning_count()
        );
        RunReport {
            tile_size,
            written: self.written,
            processed_files: self.processed.len(),
            diagnostics: self.diagnostics,
        }
    }

    /// Naming repair, legacy folding and sharing, then the counterpart check.
    fn adjust_grid(&mut self) {
        self.grid.fix_grass_overlay_swap(&mut self.diagnostics);
        self.height_tiles = self
            .grid
            .fold_legacy_normals(&mut self.diagnostics)
            .into_iter()
            .collect();
        self.grid.share_pairs(&mut self.diagnostics);
        self.grid.check_counterparts(&mut self.diagnostics);
    }

    // -- validation ---------------------------------------------------------

    /// Validates the dimensions of every occupied cell, deleting rejects.
    /// Returns the widest logical tile width seen.
    fn check_dimensions(&mut self) -> u32 {
        let mut widest = 0;
        for category in Category::ALL {
            let occupied: Vec<usize> = self.grid.occupied(category).collect();
            for tile in occupied {
                let Some(record) = self.grid.get(category, tile).cloned() else {
                    continue;
                };
                let path = record.path();
                let shape = match self.shapes.get(&path) {
                    Some(shape) => Some(*shape),
                    None if self.failed.contains(&path) => None,
                    None => self.measure(&path, tile),
                };
                match shape {
                    Some(shape) => widest = widest.max(logical_width(&record, tile, shape)),
                    None => self.grid.delete_file(category, tile),
                }
            }
        }
        widest
    }

    fn measure(&mut self, path: &Path, tile: usize) -> Option<TileShape> {
        if !path.is_file() {
            return self.fail(path, DiagnosticClass::ReadError, "file no longer exists".into());
        }
        let (width, height) = match self.codec.dimensions(path) {
            Ok(d) => d,
            Err(e) => return self.fail(path, DiagnosticClass::ReadError, e.to_string()),
        };
        match validate(width, height, tiles::slot(tile).has(tiles::ENTITY)) {
            Ok(shape) => {
                self.shapes.insert(path.to_path_buf(), shape);
                Some(shape)
            }
            Err(reason) => self.fail(
                path,
                DiagnosticClass::BadDimensions,
                format!("{width}x{height}: {reason}"),
            ),
        }
    }

    fn fail<T>(&mut self, path: &Path, class: DiagnosticClass, reason: String) -> Option<T> {
        self.diagnostics
            .error(class, format!("{}: {reason}", path.display()));
        self.failed.insert(path.to_path_buf());
        None
    }

    // -- per category -------------------------------------------------------

    /// `(tile, source category)` pairs that feed `category`'s atlas.
    fn sources_for(&self, category: Category) -> Vec<(usize, Category)> {
        (0..TILE_COUNT)
            .filter_map(|tile| {
                if self.grid.is_occupied(category, tile) {
                    return Some((tile, category));
                }
                channels::combined_sources(category)
                    .iter()
                    .find(|src| self.grid.is_occupied(**src, tile))
                    .map(|src| (tile, *src))
            })
            .collect()
    }

    fn build_category(&mut self, category: Category, tile_size: u32) -> Result<(), PipelineError> {
        let sources = self.sources_for(category);
        let base = match (&self.options.base_image, category) {
            (Some(path), Category::Color) => self.load_base(path),
            _ => None,
        };
        if sources.is_empty() && base.is_none() {
            tracing::debug!("no {category} input");
            return Ok(());
        }
        tracing::info!("compositing {category}: {} tile(s)", sources.len());

        let mut atlas = AtlasBuffer::new(category, tile_size)?;
        if let Some(base) = &base {
            atlas.prefill(base);
        }

        let mut placed = 0;
        let mut entities_done: Vec<&'static str> = Vec::new();
        for (tile, source) in sources {
            let Some(record) = self.grid.get(source, tile).cloned() else {
                continue;
            };
            let slot = tiles::slot(tile);

            if slot.has(tiles::ENTITY) {
                let Some(recipe) = recipes::recipe_by_variant(&record.root_name) else {
                    continue;
                };
                if entities_done.contains(&recipe.variant) {
                    continue;
                }
                entities_done.push(recipe.variant);
                match self.prepare(category, source, tile, &record) {
                    Prepared::Ready(image) => {
                        recipes::apply_recipe(&mut atlas, recipe, &image);
                        self.placed(&record, recipe.variant, category);
                        placed += 1;
                    }
                    Prepared::Rejected => self.delete_entity(source, recipe),
                    Prepared::Skipped => {}
                }
                continue;
            }

            match self.prepare(category, source, tile, &record) {
                Prepared::Ready(image) => {
                    let zoom = zoom_for(tile_size, image.width);
                    composite(
                        &mut atlas,
                        slot.column,
                        slot.row,
                        &image,
                        Rect::full(image.width, image.height),
                        Rect::full(tile_size, tile_size),
                        Flip::NONE,
                        zoom,
                    );
                    self.placed(&record, slot.name, category);
                    placed += 1;
                }
                Prepared::Rejected => self.grid.delete_file(source, tile),
                Prepared::Skipped => {}
            }
        }

        if placed == 0 && base.is_none() {
            tracing::info!("{category}: every input was dropped, no atlas written");
            return Ok(());
        }
        match writer::write_atlas(self.codec, &atlas, &self.options.output_dir, &self.options.output_name) {
            Ok(path) => self.written.push((category, path)),
            Err(e) => self.diagnostics.error(
                DiagnosticClass::WriteFailed,
                format!("cannot write the {category} atlas: {e}"),
            ),
        }
        Ok(())
    }

    fn placed(&mut self, record: &FileRecord, target: &str, category: Category) {
        if self.options.verbose {
            tracing::info!("{} -> {target} [{category}]", record.filename);
        } else {
            tracing::debug!("{} -> {target} [{category}]", record.filename);
        }
        self.processed.insert(record.path());
    }

    fn delete_entity(&mut self, source: Category, recipe: &CompositeEntityRecipe) {
        for tile in recipe.tile_indices() {
            self.grid.delete_file(source, tile);
        }
    }

    fn load_base(&mut self, path: &Path) -> Option<DecodedImage> {
        match self.codec.decode(path) {
            Ok(image) => Some(image),
            Err(e) => {
                self.diagnostics.error(
                    DiagnosticClass::ReadError,
                    format!("base image {}: {e}", path.display()),
                );
                None
            }
        }
    }

    // -- per tile -----------------------------------------------------------

    /// Reads one source image and runs it through validation, classification
    /// and repair for `category`.
    fn prepare(
        &mut self,
        category: Category,
        source: Category,
        tile: usize,
        record: &FileRecord,
    ) -> Prepared {
        let Some(image) = self.load(tile, record) else {
            return Prepared::Rejected;
        };
        match category {
            Category::Color => Prepared::Ready(self.prepare_color(image, tile, record)),
            Category::Normal => self.prepare_normal(image, tile, record),
            _ => self.prepare_material(image, category, source, record),
        }
    }

    /// Decodes a file and cuts out the frame to use.
    fn load(&mut self, tile: usize, record: &FileRecord) -> Option<DecodedImage> {
        let path = record.path();
        if self.failed.contains(&path) {
            return None;
        }
        if !path.is_file() {
            return self.fail(&path, DiagnosticClass::ReadError, "file no longer exists".into());
        }
        let image = match self.codec.decode(&path) {
            Ok(image) => image,
            Err(e) => return self.fail(&path, DiagnosticClass::ReadError, e.to_string()),
        };
        // The file may have changed since its dimensions were checked.
        let entity = tiles::slot(tile).has(tiles::ENTITY);
        let shape = match validate(image.width, image.height, entity) {
            Ok(shape) => shape,
            Err(reason) => {
                let (w, h) = (image.width, image.height);
                return self.fail(&path, DiagnosticClass::BadDimensions, format!("{w}x{h}: {reason}"));
            }
        };

        let (frame, wrapped) = shape.frame_rect(self.options.chosen_frame);
        if wrapped && self.frame_warned.insert(path.clone()) {
            self.diagnostics.warn(
                DiagnosticClass::FrameOutOfRange,
                format!(
                    "{} has fewer frames than requested frame {}; using frame {}",
                    record.filename,
                    self.options.chosen_frame.unwrap_or(0),
                    frame.y / frame.height.max(1)
                ),
            );
        }
        if frame == Rect::full(image.width, image.height) {
            Some(image)
        } else {
            Some(image.crop(frame))
        }
    }

    fn prepare_color(&mut self, mut image: DecodedImage, tile: usize, record: &FileRecord) -> DecodedImage {
        let slot = tiles::slot(tile);
        if slot.has(tiles::BLACK_ALPHA) && !image.has_alpha() {
            image = image.to_channels(4);
            for t in image.texels_mut() {
                if t[..3] == [0, 0, 0] {
                    t[3] = 0;
                }
            }
        }

        let transparent = image.texels().any(|t| DecodedImage::alpha_at(t) < 255);
        if !transparent && slot.has(tiles::DECAL) {
            self.diagnostics.warn(
                DiagnosticClass::ContentHint,
                format!(
                    "{} has no transparent texels, but {} is a cutout texture",
                    record.filename, slot.name
                ),
            );
        } else if !transparent && slot.has(tiles::LEAVES) {
            self.diagnostics.warn(
                DiagnosticClass::ContentHint,
                format!(
                    "{} is fully opaque; leaves such as {} normally have cutouts",
                    record.filename, slot.name
                ),
            );
        }
        image
    }

    fn prepare_normal(&mut self, mut image: DecodedImage, tile: usize, record: &FileRecord) -> Prepared {
        let slot = tiles::slot(tile);
        let wrap = slot.has(tiles::TILING);
        let slope = self.options.slope_scale;
        let from_heightmap = self.height_tiles.contains(&tile);

        match classify(&image, Category::Normal) {
            Classification::Flat => {
                self.diagnostics.warn(
                    DiagnosticClass::FlatBumpMap,
                    format!(
                        "{} has no variation and adds nothing over a flat normal map; ignored",
                        record.filename
                    ),
                );
                Prepared::Rejected
            }
            Classification::NormalMap if !from_heightmap => {
                if self.options.clean_normals {
                    let packing = normals::renormalize(&mut image);
                    tracing::debug!("{}: renormalized ({packing:?} z)", record.filename);
                }
                Prepared::Ready(image)
            }
            Classification::Unrecognized => {
                self.diagnostics.warn(
                    DiagnosticClass::UnknownBumpFormat,
                    format!(
                        "{} is not a recognised normal map format; using it as a height field",
                        record.filename
                    ),
                );
                Prepared::Ready(normals::height_to_normal(&image, slope, wrap))
            }
            _ => Prepared::Ready(normals::height_to_normal(&image, slope, wrap)),
        }
    }

    fn prepare_material(
        &mut self,
        image: DecodedImage,
        category: Category,
        source: Category,
        record: &FileRecord,
    ) -> Prepared {
        let combined = source != category;
        let mut image = if combined {
            match channels::extract(source, &image, category) {
                Some(extracted) => extracted,
                None => return Prepared::Skipped,
            }
        } else {
            image
        };

        if classify(&image, category) == Classification::Unused {
            if combined {
                tracing::debug!("{}: no {category} data", record.filename);
                return Prepared::Skipped;
            }
            self.diagnostics.warn(
                DiagnosticClass::DefaultChannel,
                format!(
                    "{} holds only the default {category} value; ignored",
                    record.filename
                ),
            );
            return Prepared::Rejected;
        }
        if category == Category::Roughness {
            let nudged = nudge_roughness(&mut image);
            if nudged > 0 {
                tracing::debug!("{}: {nudged} zero roughness texel(s) raised to 1", record.filename);
            }
        }
        Prepared::Ready(image)
    }
}

/// Tile width an accepted image represents at 1:1 scale.
fn logical_width(record: &FileRecord, tile: usize, shape: TileShape) -> u32 {
    if tiles::slot(tile).has(tiles::ENTITY)
        && let Some(recipe) = recipes::recipe_by_variant(&record.root_name)
    {
        return recipe.logical_tile_width(shape.logical_width());
    }
    shape.logical_width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, ImageCrateCodec};

    fn write(dir: &Path, name: &str, image: &DecodedImage) {
        ImageCrateCodec.encode(&dir.join(name), image).unwrap();
    }

    fn options(input: &Path, output: &Path) -> PipelineOptions {
        PipelineOptions {
            input_dirs: vec![input.to_path_buf()],
            output_dir: output.to_path_buf(),
            ..PipelineOptions::default()
        }
    }

    /// Deletes one file right after its dimensions were read.
    struct VanishingCodec {
        doomed: &'static str,
    }

    impl ImageCodec for VanishingCodec {
        fn dimensions(&self, path: &Path) -> Result<(u32, u32), CodecError> {
            let dims = ImageCrateCodec.dimensions(path)?;
            if path.file_name().is_some_and(|n| n == self.doomed) {
                std::fs::remove_file(path)?;
            }
            Ok(dims)
        }

        fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
            ImageCrateCodec.decode(path)
        }

        fn encode(&self, path: &Path, image: &DecodedImage) -> Result<(), CodecError> {
            ImageCrateCodec.encode(path, image)
        }
    }

    #[test]
    fn test_forced_tile_size_must_be_power_of_two() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path(), dir.path());
        opts.forced_tile_size = Some(24);
        let err = run(&opts, &ImageCrateCodec).unwrap_err();
        assert!(matches!(err, PipelineError::TileSizeNotPowerOfTwo(24)));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let err = run(&options(input.path(), output.path()), &ImageCrateCodec).unwrap_err();
        assert!(matches!(err, PipelineError::NoUsableInput));
    }

    #[test]
    fn test_forced_size_rescales() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "dirt.png", &DecodedImage::filled(16, 16, &[50, 40, 30]));
        let mut opts = options(input.path(), output.path());
        opts.forced_tile_size = Some(4);
        let report = run(&opts, &ImageCrateCodec).unwrap();
        assert_eq!(report.tile_size, 4);
        let atlas = ImageCrateCodec.decode(report.output(Category::Color).unwrap()).unwrap();
        assert_eq!((atlas.width, atlas.height), (64, 40));
        let dirt = tiles::slot(tiles::find_by_name("dirt").unwrap());
        assert_eq!(atlas.texel(dirt.column * 4 + 1, dirt.row * 4 + 2), &[50, 40, 30, 255]);
    }

    #[test]
    fn test_mer_feeds_missing_channels() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "stone.png", &DecodedImage::filled(8, 8, &[90, 90, 90]));
        write(input.path(), "stone_mer.png", &DecodedImage::filled(8, 8, &[200, 0, 60]));
        write(input.path(), "stone_r.png", &DecodedImage::filled(8, 8, &[0]));

        let report = run(&options(input.path(), output.path()), &ImageCrateCodec).unwrap();
        let stone = tiles::slot(tiles::find_by_name("stone").unwrap());
        let at = |c: Category| {
            let img = ImageCrateCodec.decode(report.output(c).unwrap()).unwrap();
            img.texel(stone.column * 8, stone.row * 8)[0]
        };
        assert_eq!(at(Category::Metallic), 200);
        // Separate roughness wins over the combined file, nudged off zero.
        assert_eq!(at(Category::Roughness), 1);
        // The combined file has no emission, so no emission atlas.
        assert!(report.output(Category::Emission).is_none());
        assert!(report.diagnostics.is_clean());
    }

    #[test]
    fn test_black_becomes_transparent_for_lily_pad() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut pad = DecodedImage::filled(4, 4, &[20, 120, 20]);
        pad.texel_mut(0, 0).copy_from_slice(&[0, 0, 0]);
        write(input.path(), "lily_pad.png", &pad);

        let report = run(&options(input.path(), output.path()), &ImageCrateCodec).unwrap();
        let atlas = ImageCrateCodec.decode(report.output(Category::Color).unwrap()).unwrap();
        let slot = tiles::slot(tiles::find_by_name("lily_pad").unwrap());
        assert_eq!(atlas.texel(slot.column * 4, slot.row * 4)[3], 0);
        assert_eq!(atlas.texel(slot.column * 4 + 1, slot.row * 4)[3], 255);
        // Now it has transparency, so the decal check stays quiet.
        assert_eq!(report.diagnostics.count(DiagnosticClass::ContentHint), 0);
    }

    #[test]
    fn test_opaque_decal_and_frame_wrap_warn() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "torch.png", &DecodedImage::filled(4, 4, &[200, 150, 0, 255]));
        let mut water = DecodedImage::new(4, 8, 3);
        for y in 0..8 {
            for x in 0..4 {
                let v = if y < 4 { 10 } else { 240 };
                water.texel_mut(x, y).copy_from_slice(&[v, v, 255]);
            }
        }
        write(input.path(), "water_still.png", &water);

        let mut opts = options(input.path(), output.path());
        opts.chosen_frame = Some(3);
        let report = run(&opts, &ImageCrateCodec).unwrap();
        assert_eq!(report.diagnostics.count(DiagnosticClass::ContentHint), 1);
        assert_eq!(report.diagnostics.count(DiagnosticClass::FrameOutOfRange), 1);

        // Frame 3 of 2 wraps to frame 1.
        let atlas = ImageCrateCodec.decode(report.output(Category::Color).unwrap()).unwrap();
        let slot = tiles::slot(tiles::find_by_name("water_still").unwrap());
        assert_eq!(atlas.texel(slot.column * 4, slot.row * 4)[0], 240);
    }

    #[test]
    fn test_chest_skin_is_decomposed() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::create_dir(input.path().join("chest")).unwrap();
        write(&input.path().join("chest"), "normal.png", &DecodedImage::filled(64, 64, &[120, 80, 40, 255]));
        write(input.path(), "stone.png", &DecodedImage::filled(16, 16, &[90, 90, 90]));

        let report = run(&options(input.path(), output.path()), &ImageCrateCodec).unwrap();
        assert_eq!(report.tile_size, 16);
        assert_eq!(report.processed_files, 2);
        let atlas = ImageCrateCodec.decode(report.output(Category::Color).unwrap()).unwrap();
        let top = tiles::slot(tiles::find_by_name("chest_top").unwrap());
        assert_eq!(atlas.texel(top.column * 16 + 8, top.row * 16 + 8), &[120, 80, 40, 255]);
        assert_eq!(atlas.texel(top.column * 16, top.row * 16), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_file_removed_before_reading_is_a_read_error() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "dirt.png", &DecodedImage::filled(16, 16, &[90, 60, 30]));
        write(input.path(), "stone.png", &DecodedImage::filled(16, 16, &[100, 100, 100]));
        let opts = options(input.path(), output.path());
        let codec = VanishingCodec { doomed: "dirt.png" };

        let mut pipeline = Pipeline::new(&opts, &codec);
        let walk = WalkOptions {
            use_alternates: true,
            skip_directories: &[],
        };
        discover::discover(&opts.input_dirs, walk, &mut pipeline.grid, &mut pipeline.diagnostics).unwrap();
        pipeline.adjust_grid();
        assert_eq!(pipeline.check_dimensions(), 16);
        pipeline.build_category(Category::Color, 16).unwrap();

        let dirt = tiles::find_by_name("dirt").unwrap();
        let stone = tiles::find_by_name("stone").unwrap();
        assert!(!pipeline.grid.is_occupied(Category::Color, dirt));
        assert!(pipeline.grid.is_occupied(Category::Color, stone));

        let report = pipeline.finish(16);
        assert_eq!(report.diagnostics.count(DiagnosticClass::ReadError), 1);
        assert_eq!(report.diagnostics.error_count(), 1);
        assert_eq!(report.processed_files, 1);
        assert!(report.output(Category::Color).is_some());
    }
}
