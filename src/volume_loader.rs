use crate::{error::VolumeError, image_io::ImageIo, volume::Volume};

use image::GrayImage;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Which slice files a load accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Inclusive lower bound on the parsed slice index
    pub first_slice: u64,
    /// Inclusive upper bound; `None` accepts every index from `first_slice` on
    pub last_slice: Option<u64>,
    /// Expected file extension, with or without the leading dot
    pub extension: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            first_slice: 1,
            last_slice: None,
            extension: "png".to_string(),
        }
    }
}

impl LoadOptions {
    fn accepts(&self, index: u64) -> bool {
        index >= self.first_slice && self.last_slice.is_none_or(|last| index <= last)
    }
}

/// A slice file together with the index parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceFile {
    pub path: PathBuf,
    pub index: u64,
}

/// Strategy that enumerates candidate slice files.
pub trait SliceSource {
    /// List files in `directory` whose name starts with `prefix` and ends in
    /// `extension`, paired with their parsed slice index. Order is
    /// unspecified.
    fn list_candidates(
        &self,
        directory: &Path,
        prefix: &str,
        extension: &str,
    ) -> Result<Vec<SliceFile>, VolumeError>;
}

/// [`SliceSource`] reading a directory on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectorySliceSource;

impl SliceSource for DirectorySliceSource {
    fn list_candidates(
        &self,
        directory: &Path,
        prefix: &str,
        extension: &str,
    ) -> Result<Vec<SliceFile>, VolumeError> {
        let files = fs::read_dir(directory)?
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                if !name.starts_with(prefix) {
                    return None;
                }
                let index = parse_slice_number(name, extension)?;
                Some(SliceFile {
                    path: entry.path(),
                    index,
                })
            })
            .collect();
        Ok(files)
    }
}

/// Parse the run of digits immediately preceding `.{extension}` in
/// `filename`.
///
/// Returns `None` when the extension does not match (ASCII
/// case-insensitive) or no digit precedes it.
pub fn parse_slice_number(filename: &str, extension: &str) -> Option<u64> {
    let extension = extension.trim_start_matches('.');
    let dot = filename.len().checked_sub(extension.len() + 1)?;
    let (stem, suffix) = filename.split_at_checked(dot)?;
    if !suffix.starts_with('.') || !suffix[1..].eq_ignore_ascii_case(extension) {
        return None;
    }
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[digits_start..].parse().ok()
}

/// Split a user path into the directory to scan and a filename prefix.
///
/// An existing directory is scanned with an empty prefix. Otherwise the
/// path splits at its last separator; with none, the current directory is
/// scanned.
pub fn split_directory_and_prefix(path: &Path) -> (PathBuf, String) {
    if path.is_dir() {
        return (path.to_path_buf(), String::new());
    }
    let text = path.to_string_lossy();
    match text.rfind(['/', '\\']) {
        None => (PathBuf::from("."), text.into_owned()),
        Some(pos) => {
            let dir = &text[..pos];
            let dir = if dir.is_empty() { "." } else { dir };
            (PathBuf::from(dir), text[pos + 1..].to_string())
        }
    }
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from slice images on disk
    ///
    /// # Arguments
    ///
    /// * `path` - A directory, or a directory plus filename prefix such as
    ///   `scans/vol`
    /// * `options` - Slice index range and file extension
    /// * `io` - Decoder for the slice images
    ///
    /// # Errors
    ///
    /// Returns error if no slice matches, a slice cannot be decoded or slice
    /// dimensions are inconsistent
    pub fn load(
        path: impl AsRef<Path>,
        options: &LoadOptions,
        io: &dyn ImageIo,
    ) -> Result<Volume, VolumeError> {
        Self::load_with_source(path, options, &DirectorySliceSource, io)
    }

    /// Load like [`VolumeLoader::load`] with a custom file enumeration strategy
    pub fn load_with_source(
        path: impl AsRef<Path>,
        options: &LoadOptions,
        source: &dyn SliceSource,
        io: &dyn ImageIo,
    ) -> Result<Volume, VolumeError> {
        let path = path.as_ref();
        let (directory, prefix) = split_directory_and_prefix(path);

        let mut files: Vec<_> = source
            .list_candidates(&directory, &prefix, &options.extension)?
            .into_iter()
            .filter(|file| options.accepts(file.index))
            .collect();

        if files.is_empty() {
            return Err(VolumeError::NoSlices {
                path: path.to_path_buf(),
            });
        }

        Self::sort_slices(&mut files);
        let volume = Self::build_volume(&files, io)?;

        log::info!(
            "Loaded {} slices from {}, volume dimension {} x {} x {}",
            volume.depth(),
            path.display(),
            volume.width(),
            volume.height(),
            volume.depth()
        );
        Ok(volume)
    }

    /// Load into an existing volume.
    ///
    /// `volume` is reset to an empty volume first, so it never holds a
    /// partially loaded stack after a failure.
    pub fn load_into(
        volume: &mut Volume,
        path: impl AsRef<Path>,
        options: &LoadOptions,
        io: &dyn ImageIo,
    ) -> Result<(), VolumeError> {
        *volume = Volume::default();
        *volume = Self::load(path, options, io)?;
        Ok(())
    }

    /// Load a volume from already decoded slices, in stack order
    ///
    /// # Errors
    ///
    /// Returns error if `images` is empty or dimensions are inconsistent
    pub fn load_from_images(images: &[GrayImage]) -> Result<Volume, VolumeError> {
        let first = images.first().ok_or_else(|| VolumeError::NoSlices {
            path: PathBuf::new(),
        })?;
        let expected = first.dimensions();
        let (width, height) = (expected.0 as usize, expected.1 as usize);
        let mut volume = Volume::new(width, height, images.len());

        for (z, image) in images.iter().enumerate() {
            if image.dimensions() != expected {
                return Err(VolumeError::DimensionMismatch {
                    path: PathBuf::from(format!("<slice {z}>")),
                    expected,
                    found: image.dimensions(),
                });
            }
            Self::copy_slice(&mut volume, z, image);
        }
        Ok(volume)
    }

    fn sort_slices(files: &mut [SliceFile]) {
        files.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
    }

    fn build_volume(files: &[SliceFile], io: &dyn ImageIo) -> Result<Volume, VolumeError> {
        let first = io.decode(&files[0].path)?;
        let expected = first.dimensions();
        let mut volume = Volume::new(expected.0 as usize, expected.1 as usize, files.len());
        Self::copy_slice(&mut volume, 0, &first);

        for (z, file) in files.iter().enumerate().skip(1) {
            let image = io.decode(&file.path)?;
            if image.dimensions() != expected {
                return Err(VolumeError::DimensionMismatch {
                    path: file.path.clone(),
                    expected,
                    found: image.dimensions(),
                });
            }
            Self::copy_slice(&mut volume, z, &image);
        }
        Ok(volume)
    }

    /// Copy one decoded slice into depth position `z`
    fn copy_slice(volume: &mut Volume, z: usize, image: &GrayImage) {
        let start = volume.index(0, 0, z);
        let len = volume.width() * volume.height();
        volume.data_mut()[start..start + len].copy_from_slice(image.as_raw());
    }
}
