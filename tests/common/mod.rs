#![allow(dead_code)]

use image::GrayImage;
use slice_volume::{ImageIo, Volume, VolumeError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Write `image` as a grayscale PNG at `dir/name`.
pub fn write_slice(dir: &Path, name: &str, image: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("should have written test slice");
    path
}

/// A `width x height` slice filled with `value`.
pub fn flat_slice(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, image::Luma([value]))
}

/// The 3 x 2 x 2 volume used throughout: z = 0 holds 10..=15, z = 1 holds 50..=55.
pub fn two_slice_volume() -> Volume {
    let data = vec![10, 11, 12, 13, 14, 15, 50, 51, 52, 53, 54, 55];
    Volume::from_raw(3, 2, 2, data).expect("buffer matches dimensions")
}

/// Deterministic pseudo-random volume.
pub fn noisy_volume(width: usize, height: usize, depth: usize, seed: u32) -> Volume {
    let mut state = seed.max(1);
    let data = (0..width * height * depth)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    Volume::from_raw(width, height, depth, data).expect("buffer matches dimensions")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub path: PathBuf,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

/// In-memory `ImageIo`: decodes from a map, records every encode.
#[derive(Default)]
pub struct MemoryIo {
    pub images: HashMap<PathBuf, GrayImage>,
    pub encoded: RefCell<Vec<Encoded>>,
}

impl MemoryIo {
    pub fn with_image(mut self, path: impl Into<PathBuf>, image: GrayImage) -> Self {
        self.images.insert(path.into(), image);
        self
    }
}

impl ImageIo for MemoryIo {
    fn decode(&self, path: &Path) -> Result<GrayImage, VolumeError> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| VolumeError::Decode {
                path: path.to_path_buf(),
                reason: "not in memory".to_string(),
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
        self.encoded.borrow_mut().push(Encoded {
            path: path.to_path_buf(),
            pixels: pixels.to_vec(),
            width,
            height,
            channels,
        });
        Ok(())
    }
}
