use crate::error::VolumeError;

use image::{ColorType, GrayImage};
use std::path::Path;

/// Codec boundary for slice input and derived-image output.
pub trait ImageIo {
    /// Decode `path` as a single-channel 8-bit image.
    fn decode(&self, path: &Path) -> Result<GrayImage, VolumeError>;

    /// Encode interleaved 8-bit `pixels` with `channels` samples per pixel.
    fn encode(
        &self,
        path: &Path,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<(), VolumeError>;
}

/// [`ImageIo`] backed by the `image` crate; the format follows the file
/// extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileIo;

impl ImageIo for ImageFileIo {
    fn decode(&self, path: &Path) -> Result<GrayImage, VolumeError> {
        image::open(path)
            .map(|img| img.into_luma8())
            .map_err(|e| VolumeError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn encode(
        &self,
        path: &Path,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<(), VolumeError> {
        let color = match channels {
            1 => ColorType::L8,
            3 => ColorType::Rgb8,
            other => {
                return Err(VolumeError::InvalidParameter(format!(
                    "cannot encode {other} channels"
                )));
            }
        };
        image::save_buffer(path, pixels, width, height, color).map_err(|e| {
            VolumeError::Encode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        log::info!("Saved {}", path.display());
        Ok(())
    }
}

/// Replicate a single intensity channel into RGB triplets.
pub fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&g| [g, g, g]).collect()
}
