use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`VolumeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    DimensionMismatch,
    OutOfRange,
    InvalidParameter,
}

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No slices found in {path:?}")]
    NoSlices { path: PathBuf },

    #[error("Failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to encode {path:?}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Slice dimension mismatch at {path:?}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("Buffer holds {found} samples, dimensions require {expected}")]
    BufferLength { expected: usize, found: usize },

    #[error("{axis} coordinate {value} out of range (0..{len})")]
    OutOfRange {
        axis: char,
        value: i64,
        len: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Volume has a zero dimension")]
    EmptyVolume,

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl VolumeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VolumeError::Io(_)
            | VolumeError::NoSlices { .. }
            | VolumeError::Decode { .. }
            | VolumeError::Encode { .. }
            | VolumeError::Config(_) => ErrorKind::Io,
            VolumeError::DimensionMismatch { .. }
            | VolumeError::BufferLength { .. }
            | VolumeError::Shape(_) => ErrorKind::DimensionMismatch,
            VolumeError::OutOfRange { .. } => ErrorKind::OutOfRange,
            VolumeError::InvalidParameter(_) | VolumeError::EmptyVolume => {
                ErrorKind::InvalidParameter
            }
        }
    }

    pub(crate) fn out_of_range(axis: char, value: impl TryInto<i64>, len: usize) -> Self {
        VolumeError::OutOfRange {
            axis,
            value: value.try_into().unwrap_or(i64::MAX),
            len,
        }
    }
}
