//! Directory traversal feeding the File Grid.
//!
//! Directories are walked depth-first with entries sorted by name, so the
//! "first file wins" rule is deterministic. Entity skin directories are leaves;
//! everything else is recursed into unless explicitly skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{DiagnosticClass, Diagnostics};
use crate::error::PipelineError;
use crate::grid::{FileGrid, ResolveOutcome};
use crate::recipes;

/// Counters from one discovery pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryStats {
    pub directories: usize,
    pub added: usize,
    pub duplicates: usize,
    pub ignored: usize,
}

impl DiscoveryStats {
    fn record(&mut self, outcome: ResolveOutcome) {
        match outcome {
            ResolveOutcome::Added => self.added += 1,
            ResolveOutcome::Duplicate => self.duplicates += 1,
            ResolveOutcome::Ignored => self.ignored += 1,
        }
    }
}

/// Options that shape the walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions<'a> {
    pub use_alternates: bool,
    /// Directory names (case-insensitive) never descended into.
    pub skip_directories: &'a [String],
}

/// Walks every input directory in order and resolves the files found.
///
/// Inaccessible input directories are reported as errors.
///
/// # Errors
///
/// Returns [`PipelineError::NoInputDirectory`] if none of them is accessible.
pub fn discover(
    inputs: &[PathBuf],
    options: WalkOptions<'_>,
    grid: &mut FileGrid,
    diagnostics: &mut Diagnostics,
) -> Result<DiscoveryStats, PipelineError> {
    let mut stats = DiscoveryStats::default();
    let mut accessible = 0;
    for input in inputs {
        if !input.is_dir() {
            diagnostics.error(
                DiagnosticClass::ReadError,
                format!("input directory {} is not accessible", input.display()),
            );
            continue;
        }
        accessible += 1;
        tracing::info!("scanning {}", input.display());
        walk(input, options, grid, diagnostics, &mut stats);
    }
    if accessible == 0 {
        return Err(PipelineError::NoInputDirectory(inputs.to_vec()));
    }
    tracing::info!(
        "discovery: {} director(ies), {} file(s) added, {} duplicate(s), {} ignored",
        stats.directories,
        stats.added,
        stats.duplicates,
        stats.ignored
    );
    Ok(stats)
}

/// Sorted `(name, is_dir)` entries of a directory.
fn list_files(dir: &Path) -> std::io::Result<Vec<(String, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let is_dir = entry.file_type()?.is_dir();
        entries.push((name, is_dir));
    }
    entries.sort();
    Ok(entries)
}

fn walk(
    dir: &Path,
    options: WalkOptions<'_>,
    grid: &mut FileGrid,
    diagnostics: &mut Diagnostics,
    stats: &mut DiscoveryStats,
) {
    let entries = match list_files(dir) {
        Ok(e) => e,
        Err(e) => {
            diagnostics.error(
                DiagnosticClass::ReadError,
                format!("cannot list {}: {e}", dir.display()),
            );
            return;
        }
    };
    stats.directories += 1;

    for (name, is_dir) in entries {
        if is_dir {
            let path = dir.join(&name);
            if options
                .skip_directories
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&name))
            {
                tracing::debug!("skipping {}", path.display());
            } else if recipes::is_entity_directory(&name) {
                walk_entities(&path, &name, grid, diagnostics, stats);
            } else {
                walk(&path, options, grid, diagnostics, stats);
            }
        } else {
            stats.record(grid.resolve(dir, &name, options.use_alternates, diagnostics));
        }
    }
}

fn walk_entities(
    dir: &Path,
    directory_name: &str,
    grid: &mut FileGrid,
    diagnostics: &mut Diagnostics,
    stats: &mut DiscoveryStats,
) {
    let entries = match list_files(dir) {
        Ok(e) => e,
        Err(e) => {
            diagnostics.error(
                DiagnosticClass::ReadError,
                format!("cannot list {}: {e}", dir.display()),
            );
            return;
        }
    };
    stats.directories += 1;
    let directory_name = directory_name.to_ascii_lowercase();
    for (name, is_dir) in entries {
        if !is_dir {
            stats.record(grid.resolve_entity(dir, &directory_name, &name, diagnostics));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::tiles;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"not really an image").unwrap();
    }

    fn opts(skip: &[String]) -> WalkOptions<'_> {
        WalkOptions {
            use_alternates: true,
            skip_directories: skip,
        }
    }

    #[test]
    fn test_walk_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b/stone.png"));
        touch(&dir.path().join("a/stone.png"));
        touch(&dir.path().join("a/deeper/dirt_n.png"));
        touch(&dir.path().join("readme.txt"));

        let mut grid = FileGrid::new();
        let mut diag = Diagnostics::new();
        let stats = discover(&[dir.path().to_path_buf()], opts(&[]), &mut grid, &mut diag).unwrap();

        assert_eq!(stats.added, 2);
        assert_eq!(stats.duplicates, 1);
        let stone = tiles::find_by_name("stone").unwrap();
        assert_eq!(grid.get(Category::Color, stone).unwrap().dir, dir.path().join("a"));
        assert!(grid.is_occupied(Category::Normal, tiles::find_by_name("dirt").unwrap()));
    }

    #[test]
    fn test_skip_and_entity_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Skipped/stone.png"));
        touch(&dir.path().join("chest/ender.png"));
        // Files named after tiles are not tiles inside a skin directory.
        touch(&dir.path().join("chest/stone.png"));

        let skip = vec!["skipped".to_string()];
        let mut grid = FileGrid::new();
        let mut diag = Diagnostics::new();
        discover(&[dir.path().to_path_buf()], opts(&skip), &mut grid, &mut diag).unwrap();

        assert!(!grid.is_occupied(Category::Color, tiles::find_by_name("stone").unwrap()));
        assert!(grid.is_occupied(Category::Color, tiles::find_by_name("ender_chest_front").unwrap()));
        assert_eq!(diag.count(DiagnosticClass::UnusedFile), 1);
    }

    #[test]
    fn test_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut grid = FileGrid::new();
        let mut diag = Diagnostics::new();

        let err = discover(&[missing.clone()], opts(&[]), &mut grid, &mut diag).unwrap_err();
        assert!(matches!(err, PipelineError::NoInputDirectory(_)));

        // One good directory is enough; the bad one is still an error.
        let mut diag = Diagnostics::new();
        discover(&[missing, dir.path().to_path_buf()], opts(&[]), &mut grid, &mut diag).unwrap();
        assert_eq!(diag.error_count(), 1);
    }
}
