//! Texture discovery, classification and atlas compositing.
//!
//! Loosely named per-channel texture files are resolved to the slots of a fixed
//! tile registry, validated, classified, repaired where needed, and composited
//! into one atlas image per material channel at a single tile resolution.

pub mod category;
pub mod channels;
pub mod classify;
pub mod codec;
pub mod compose;
pub mod diagnostics;
pub mod discover;
mod error;
pub mod grid;
pub mod names;
pub mod normals;
pub mod pipeline;
pub mod recipes;
pub mod texture;
pub mod tiles;
pub mod validate;
pub mod writer;

pub use category::Category;
pub use codec::{CodecError, ImageCodec, ImageCrateCodec};
pub use compose::{AtlasBuffer, Flip};
pub use diagnostics::{Diagnostic, DiagnosticClass, Diagnostics, Severity};
pub use error::PipelineError;
pub use grid::{FileGrid, FileRecord, ResolveOutcome};
pub use pipeline::{PipelineOptions, RunReport, run};
pub use texture::{DecodedImage, Rect};
pub use tiles::TileSlot;
