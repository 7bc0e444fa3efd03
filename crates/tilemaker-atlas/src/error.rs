//! Fatal pipeline errors. Anything recoverable is a diagnostic instead.

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// None of the input directories could be opened.
    #[error("no input directory is accessible (tried {})", format_paths(.0))]
    NoInputDirectory(Vec<PathBuf>),

    /// The forced tile size is unusable.
    #[error("forced tile size {0} is not a power of two")]
    TileSizeNotPowerOfTwo(u32),

    /// An atlas would need more memory than allowed.
    #[error("a {width}x{height} atlas needs {bytes} bytes, over the {max} byte limit")]
    AtlasTooLarge {
        width: u64,
        height: u64,
        bytes: u64,
        max: u64,
    },

    /// Discovery found nothing that could be used.
    #[error("no usable texture files were found in the input directories")]
    NoUsableInput,

    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
