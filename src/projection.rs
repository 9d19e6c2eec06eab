use crate::{
    enums::ProjectionKind,
    error::VolumeError,
    image_io::{ImageIo, gray_to_rgb},
    volume::Volume,
};

use image::GrayImage;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::path::Path;

/// Intensity projections along the depth axis.
///
/// Every projection returns a `width x height` single-channel image. A volume
/// with a zero dimension cannot be projected and yields
/// [`VolumeError::EmptyVolume`].
pub struct Projector;

impl Projector {
    /// Project with optional slab bounds.
    ///
    /// Missing bounds behave like the `0` / `-1` defaults of
    /// [`Projector::apply_projection`].
    pub fn project(
        volume: &Volume,
        kind: ProjectionKind,
        z_start: Option<i64>,
        z_end: Option<i64>,
    ) -> Result<GrayImage, VolumeError> {
        Self::dispatch(volume, kind, z_start.unwrap_or(0), z_end.unwrap_or(-1))
    }

    /// Project by name.
    ///
    /// A slab is used when `z_start > 0` or `z_end >= 0`; a negative `z_end`
    /// then stands for the last slice. `AIPMedian` always covers the full
    /// depth.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidParameter`] for an unknown projection
    /// name.
    pub fn apply_projection(
        volume: &Volume,
        kind: &str,
        z_start: i64,
        z_end: i64,
    ) -> Result<GrayImage, VolumeError> {
        let kind: ProjectionKind = kind.parse()?;
        Self::dispatch(volume, kind, z_start, z_end)
    }

    fn dispatch(
        volume: &Volume,
        kind: ProjectionKind,
        z_start: i64,
        z_end: i64,
    ) -> Result<GrayImage, VolumeError> {
        Self::ensure_not_empty(volume)?;
        let last = volume.depth() as i64 - 1;

        if kind.supports_slab() && (z_start > 0 || z_end >= 0) {
            let zs = z_start.max(0);
            let ze = if z_end < 0 { last } else { z_end.min(last) };
            log::debug!("{kind} projection, slab {zs}..={ze}");
            match kind {
                ProjectionKind::Mip => Self::mip_slab(volume, zs, ze),
                ProjectionKind::MinIp => Self::min_ip_slab(volume, zs, ze),
                ProjectionKind::Aip => Self::aip_slab(volume, zs, ze),
                ProjectionKind::AipMedian => Self::aip_median(volume),
            }
        } else {
            log::debug!("{kind} projection, full depth");
            match kind {
                ProjectionKind::Mip => Self::mip(volume),
                ProjectionKind::MinIp => Self::min_ip(volume),
                ProjectionKind::Aip => Self::aip(volume),
                ProjectionKind::AipMedian => Self::aip_median(volume),
            }
        }
    }

    /// Maximum intensity over the full depth
    pub fn mip(volume: &Volume) -> Result<GrayImage, VolumeError> {
        Self::reduce(volume, Self::full_range(volume)?, max_of)
    }

    /// Minimum intensity over the full depth
    pub fn min_ip(volume: &Volume) -> Result<GrayImage, VolumeError> {
        Self::reduce(volume, Self::full_range(volume)?, min_of)
    }

    /// Truncated mean intensity over the full depth
    pub fn aip(volume: &Volume) -> Result<GrayImage, VolumeError> {
        Self::reduce(volume, Self::full_range(volume)?, mean_of)
    }

    /// Median intensity over the full depth.
    ///
    /// With an even depth the two middle values are averaged and rounded
    /// down.
    pub fn aip_median(volume: &Volume) -> Result<GrayImage, VolumeError> {
        Self::reduce(volume, Self::full_range(volume)?, median_of)
    }

    pub fn mip_slab(volume: &Volume, z_start: i64, z_end: i64) -> Result<GrayImage, VolumeError> {
        Self::reduce(volume, Self::slab_range(volume, z_start, z_end)?, max_of)
    }

    pub fn min_ip_slab(
        volume: &Volume,
        z_start: i64,
        z_end: i64,
    ) -> Result<GrayImage, VolumeError> {
        Self::reduce(volume, Self::slab_range(volume, z_start, z_end)?, min_of)
    }

    pub fn aip_slab(volume: &Volume, z_start: i64, z_end: i64) -> Result<GrayImage, VolumeError> {
        Self::reduce(volume, Self::slab_range(volume, z_start, z_end)?, mean_of)
    }

    /// Write a projection as a three-channel image with the intensity
    /// replicated into R, G and B.
    pub fn save(path: &Path, image: &GrayImage, io: &dyn ImageIo) -> Result<(), VolumeError> {
        let (width, height) = image.dimensions();
        io.encode(path, &gray_to_rgb(image.as_raw()), width, height, 3)
    }

    fn ensure_not_empty(volume: &Volume) -> Result<(), VolumeError> {
        if volume.is_empty() {
            return Err(VolumeError::EmptyVolume);
        }
        Ok(())
    }

    fn full_range(volume: &Volume) -> Result<RangeInclusive<usize>, VolumeError> {
        Self::ensure_not_empty(volume)?;
        Ok(0..=volume.depth() - 1)
    }

    /// Clamp both bounds into `[0, depth - 1]`, swapping them if reversed
    fn slab_range(
        volume: &Volume,
        z_start: i64,
        z_end: i64,
    ) -> Result<RangeInclusive<usize>, VolumeError> {
        Self::ensure_not_empty(volume)?;
        let last = volume.depth() as i64 - 1;
        let start = z_start.clamp(0, last) as usize;
        let end = z_end.clamp(0, last) as usize;
        Ok(start.min(end)..=start.max(end))
    }

    fn reduce<F>(
        volume: &Volume,
        z_range: RangeInclusive<usize>,
        reducer: F,
    ) -> Result<GrayImage, VolumeError>
    where
        F: Fn(&mut dyn Iterator<Item = u8>) -> u8 + Sync,
    {
        let (_, height, width) = volume.dim();
        let data = volume.data();
        let mut out = vec![0u8; width * height];

        out.par_chunks_mut(width).enumerate().for_each(|(y, out_row)| {
            for (x, out_px) in out_row.iter_mut().enumerate() {
                let mut column = z_range.clone().map(|z| data[volume.index(x, y, z)]);
                *out_px = reducer(&mut column);
            }
        });

        GrayImage::from_raw(width as u32, height as u32, out).ok_or(VolumeError::BufferLength {
            expected: width * height,
            found: 0,
        })
    }
}

fn max_of(column: &mut dyn Iterator<Item = u8>) -> u8 {
    column.fold(0, u8::max)
}

fn min_of(column: &mut dyn Iterator<Item = u8>) -> u8 {
    column.fold(u8::MAX, u8::min)
}

fn mean_of(column: &mut dyn Iterator<Item = u8>) -> u8 {
    let (sum, count) = column.fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    (sum / count.max(1)) as u8
}

fn median_of(column: &mut dyn Iterator<Item = u8>) -> u8 {
    let mut values: Vec<u8> = column.collect();
    values.sort_unstable();
    let n = values.len();
    if n == 0 {
        return 0;
    }
    if n % 2 == 1 {
        values[n / 2]
    } else {
        ((u16::from(values[n / 2 - 1]) + u16::from(values[n / 2])) / 2) as u8
    }
}
