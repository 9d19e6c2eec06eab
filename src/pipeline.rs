//! Configuration-driven batch of volume operations.
//!
//! A pipeline loads one volume and then applies a list of operations to it
//! in order. Operations that fail (unknown projection or plane, coordinate
//! out of range, an entry missing a required field, ...) are logged and
//! skipped; the rest of the batch still runs. Only a failed load aborts the
//! run.

use crate::{
    enums::{BlurKind, Plane},
    error::VolumeError,
    gaussian::GaussianBlur3D,
    image_io::ImageIo,
    median::MedianBlur3D,
    projection::Projector,
    volume::Volume,
    volume_loader::{LoadOptions, VolumeLoader},
};

use serde::{Deserialize, Deserializer};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Slice directory, or directory plus filename prefix
    pub input: PathBuf,
    #[serde(default)]
    pub load: LoadOptions,
    #[serde(default, deserialize_with = "lenient_operations")]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Blur {
        kind: String,
        #[serde(default = "default_kernel_size")]
        kernel_size: usize,
        #[serde(default = "default_sigma")]
        sigma: f64,
    },
    Projection {
        kind: String,
        output: PathBuf,
        #[serde(default)]
        z_start: i64,
        #[serde(default = "default_z_end")]
        z_end: i64,
    },
    Slice {
        plane: String,
        coordinate: i64,
        output: PathBuf,
    },
    SaveSlices {
        folder: PathBuf,
        #[serde(default = "default_prefix")]
        prefix: String,
    },
    /// Entry with a known or unknown tag whose fields failed to parse
    #[serde(skip_deserializing)]
    Malformed { reason: String },
    #[serde(other)]
    Unknown,
}

/// Parse each operation on its own so one bad entry does not reject the
/// whole batch.
fn lenient_operations<'de, D>(deserializer: D) -> Result<Vec<Operation>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            Operation::deserialize(entry).unwrap_or_else(|e| Operation::Malformed {
                reason: e.to_string(),
            })
        })
        .collect())
}

fn default_kernel_size() -> usize {
    3
}

fn default_sigma() -> f64 {
    2.0
}

fn default_z_end() -> i64 {
    -1
}

fn default_prefix() -> String {
    "volume".to_string()
}

impl Operation {
    /// Run this operation against `volume`
    pub fn execute(&self, volume: &mut Volume, io: &dyn ImageIo) -> Result<(), VolumeError> {
        match self {
            Operation::Blur {
                kind,
                kernel_size,
                sigma,
            } => apply_blur(volume, kind, *kernel_size, *sigma),
            Operation::Projection {
                kind,
                output,
                z_start,
                z_end,
            } => {
                let image = Projector::apply_projection(volume, kind, *z_start, *z_end)?;
                Projector::save(output, &image, io)
            }
            Operation::Slice {
                plane,
                coordinate,
                output,
            } => {
                let plane: Plane = plane.parse()?;
                volume.save_slice(plane, *coordinate, output, io)
            }
            Operation::SaveSlices { folder, prefix } => volume.save_slices(folder, prefix, io),
            Operation::Malformed { reason } => Err(VolumeError::InvalidParameter(format!(
                "malformed operation: {reason}"
            ))),
            Operation::Unknown => Err(VolumeError::InvalidParameter(
                "unknown volume operation".to_string(),
            )),
        }
    }
}

/// Blur by filter name.
///
/// # Errors
///
/// Returns [`VolumeError::InvalidParameter`] for a name other than
/// `Gaussian` or `Median`; the volume is left untouched.
pub fn apply_blur(
    volume: &mut Volume,
    kind: &str,
    kernel_size: usize,
    sigma: f64,
) -> Result<(), VolumeError> {
    match kind.parse::<BlurKind>()? {
        BlurKind::Gaussian => GaussianBlur3D::apply(volume, kernel_size, sigma),
        BlurKind::Median => MedianBlur3D::apply(volume, kernel_size),
    }
    Ok(())
}

/// Read a JSON pipeline description
pub fn load_config(path: &Path) -> Result<PipelineConfig, VolumeError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| VolumeError::Config(format!("{}: {e}", path.display())))
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub completed: usize,
    pub skipped: usize,
}

pub struct Pipeline;

impl Pipeline {
    /// Load the configured volume and run every operation in order
    ///
    /// # Errors
    ///
    /// Returns error only if the volume cannot be loaded
    pub fn run(config: &PipelineConfig, io: &dyn ImageIo) -> Result<RunReport, VolumeError> {
        let mut volume = VolumeLoader::load(&config.input, &config.load, io)?;
        Ok(Self::run_on(&mut volume, &config.operations, io))
    }

    /// Run `operations` on an already loaded volume
    pub fn run_on(volume: &mut Volume, operations: &[Operation], io: &dyn ImageIo) -> RunReport {
        let mut report = RunReport::default();
        for (i, operation) in operations.iter().enumerate() {
            match operation.execute(volume, io) {
                Ok(()) => report.completed += 1,
                Err(e) => {
                    log::warn!("Skipping operation {i} ({operation:?}): {e}");
                    report.skipped += 1;
                }
            }
        }
        report
    }
}
