//! Atlas Writer: one output image per populated category.

use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::codec::{CodecError, ImageCodec};
use crate::compose::AtlasBuffer;

/// Output path for a category: `<dir>/<name><suffix>.png`.
pub fn output_path(dir: &Path, name: &str, category: Category) -> PathBuf {
    dir.join(format!("{name}{}.png", category.suffix()))
}

/// Encodes `atlas` next to its siblings and returns where it went.
pub fn write_atlas(
    codec: &impl ImageCodec,
    atlas: &AtlasBuffer,
    dir: &Path,
    name: &str,
) -> Result<PathBuf, CodecError> {
    let path = output_path(dir, name, atlas.category);
    codec.encode(&path, &atlas.image)?;
    tracing::info!(
        "wrote {} ({}x{}, {} channel(s))",
        path.display(),
        atlas.image.width,
        atlas.image.height,
        atlas.channels()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageCrateCodec;

    #[test]
    fn test_output_paths() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, "terrainExt", Category::Color), dir.join("terrainExt.png"));
        assert_eq!(output_path(dir, "terrainExt", Category::Normal), dir.join("terrainExt_n.png"));
        assert_eq!(output_path(dir, "t", Category::Roughness), dir.join("t_r.png"));
    }

    #[test]
    fn test_write_atlas() {
        let dir = tempfile::tempdir().unwrap();
        let atlas = AtlasBuffer::new(Category::Metallic, 2).unwrap();
        let path = write_atlas(&ImageCrateCodec, &atlas, dir.path(), "atlas").unwrap();
        assert_eq!(path, dir.path().join("atlas_m.png"));
        let back = ImageCrateCodec.decode(&path).unwrap();
        assert_eq!((back.width, back.height, back.channels), (32, 20, 1));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let atlas = AtlasBuffer::new(Category::Emission, 1).unwrap();
        let missing = dir.path().join("nope");
        assert!(write_atlas(&ImageCrateCodec, &atlas, &missing, "a").is_err());
    }
}
