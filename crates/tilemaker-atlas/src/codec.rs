//! Image codec seam: decode files into [`DecodedImage`] and encode atlases back.
//!
//! The pipeline only talks to [`ImageCodec`]; [`ImageCrateCodec`] is the
//! production implementation on top of the `image` crate.

use std::path::Path;

use image::error::{ImageFormatHint, UnsupportedErrorKind};
use image::{ColorType, DynamicImage, ImageError, ImageReader};
use thiserror::Error;

use crate::texture::DecodedImage;

/// Codec failures, grouped into the categories reported to the user.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file does not start with a recognised image signature.
    #[error("unrecognised image signature: {0}")]
    BadSignature(String),

    /// The header or pixel data is damaged.
    #[error("corrupt image data: {0}")]
    Corrupt(String),

    /// A known format, or a feature of one, that this build cannot decode.
    #[error("unsupported image: {0}")]
    Unsupported(String),

    /// Decoding would exceed memory limits.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// The file is gone.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Anything else the codec reported.
    #[error("{0}")]
    Unknown(String),
}

impl From<ImageError> for CodecError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(e) => e.into(),
            ImageError::Unsupported(e) => match e.kind() {
                UnsupportedErrorKind::Format(ImageFormatHint::Unknown) => {
                    CodecError::BadSignature(e.to_string())
                }
                _ => CodecError::Unsupported(e.to_string()),
            },
            ImageError::Decoding(e) => CodecError::Corrupt(e.to_string()),
            ImageError::Limits(e) => CodecError::OutOfMemory(e.to_string()),
            other => CodecError::Unknown(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CodecError::FileNotFound(err.to_string()),
            std::io::ErrorKind::OutOfMemory => CodecError::OutOfMemory(err.to_string()),
            _ => CodecError::Unknown(err.to_string()),
        }
    }
}

/// Reads and writes raster files.
pub trait ImageCodec {
    /// Reads only the dimensions of an image.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), CodecError>;

    /// Decodes a whole image, keeping its channel count (8 bits per channel).
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError>;

    /// Encodes `image` to `path`; the format follows the file extension.
    fn encode(&self, path: &Path, image: &DecodedImage) -> Result<(), CodecError>;
}

/// [`ImageCodec`] backed by the `image` crate (PNG, JPEG, TGA).
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), CodecError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }

    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(from_dynamic(img))
    }

    fn encode(&self, path: &Path, image: &DecodedImage) -> Result<(), CodecError> {
        let color = match image.channels {
            1 => ColorType::L8,
            2 => ColorType::La8,
            3 => ColorType::Rgb8,
            _ => ColorType::Rgba8,
        };
        image::save_buffer(path, &image.pixels, image.width, image.height, color)?;
        Ok(())
    }
}

fn from_dynamic(img: DynamicImage) -> DecodedImage {
    let (width, height) = (img.width(), img.height());
    let (channels, pixels) = match img.color() {
        ColorType::L8 | ColorType::L16 => (1, img.into_luma8().into_raw()),
        ColorType::La8 | ColorType::La16 => (2, img.into_luma_alpha8().into_raw()),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => (3, img.into_rgb8().into_raw()),
        _ => (4, img.into_rgba8().into_raw()),
    };
    DecodedImage {
        width,
        height,
        channels,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_keeps_channels() {
        let dir = tempfile::tempdir().unwrap();
        let codec = ImageCrateCodec;
        for channels in [1u8, 3, 4] {
            let path = dir.path().join(format!("img{channels}.png"));
            let mut img = DecodedImage::new(8, 4, channels);
            img.pixels.iter_mut().enumerate().for_each(|(i, p)| *p = i as u8);
            codec.encode(&path, &img).unwrap();

            assert_eq!(codec.dimensions(&path).unwrap(), (8, 4));
            let back = codec.decode(&path).unwrap();
            assert_eq!(back, img);
        }
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageCrateCodec
            .decode(&dir.path().join("gone.png"))
            .unwrap_err();
        assert!(matches!(err, CodecError::FileNotFound(_)));
    }

    #[test]
    fn test_garbage_maps_to_signature_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        let err = ImageCrateCodec.decode(&path).unwrap_err();
        assert!(
            matches!(err, CodecError::BadSignature(_) | CodecError::Corrupt(_)),
            "{err:?}"
        );
    }

    #[test]
    fn test_format_without_decoder_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let unknown = dir.path().join("mystery.dat");
        std::fs::write(&unknown, b"no known magic here").unwrap();
        let err = ImageCrateCodec.decode(&unknown).unwrap_err();
        assert!(matches!(err, CodecError::BadSignature(_)), "{err:?}");

        // BMP is recognised by its magic, but this build has no BMP decoder.
        let bmp = dir.path().join("old.bmp");
        let mut bytes = b"BM".to_vec();
        bytes.resize(64, 0);
        std::fs::write(&bmp, bytes).unwrap();
        let err = ImageCrateCodec.decode(&bmp).unwrap_err();
        assert!(matches!(err, CodecError::Unsupported(_)), "{err:?}");
    }
}
