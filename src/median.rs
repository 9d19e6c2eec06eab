use crate::{
    gaussian::{clamp_axis, odd_kernel_size},
    volume::Volume,
};

use rayon::prelude::*;

/// Cubic-window 3D median filter.
///
/// Each output row (fixed y, z) seeds a 256-bin histogram from the window at
/// `x = 0`, then slides it along x by removing the column that leaves and
/// adding the column that enters. Borders replicate the edge voxel on all
/// three axes.
pub struct MedianBlur3D;

impl MedianBlur3D {
    pub fn apply(volume: &mut Volume, kernel_size: usize) {
        let kernel_size = odd_kernel_size(kernel_size);
        log::debug!("3D median blur, kernel {kernel_size}");
        if volume.is_empty() {
            return;
        }
        let Some(window) = (kernel_size as u64).checked_pow(3) else {
            log::warn!("Median kernel {kernel_size} is too large, volume left unchanged");
            return;
        };
        let (_, height, width) = volume.dim();
        let radius = (kernel_size / 2) as isize;
        let threshold = window / 2;

        let source = &*volume;
        let mut out = vec![0u8; source.data().len()];
        out.par_chunks_mut(width).enumerate().for_each(|(row, out_row)| {
            let (y, z) = (row % height, row / height);
            Self::filter_row(source, y, z, radius, threshold, out_row);
        });
        volume.replace_data(out);
    }

    fn filter_row(
        volume: &Volume,
        y: usize,
        z: usize,
        radius: isize,
        threshold: u64,
        out_row: &mut [u8],
    ) {
        let width = volume.width();
        let mut histogram = Histogram::default();

        for dx in -radius..=radius {
            let nx = clamp_axis(dx, width);
            Self::update_column(volume, &mut histogram, nx, y, z, radius, Histogram::add);
        }
        out_row[0] = histogram.median(threshold);

        for x in 1..width {
            let leaving = clamp_axis(x as isize - radius - 1, width);
            let entering = clamp_axis(x as isize + radius, width);
            Self::update_column(volume, &mut histogram, leaving, y, z, radius, Histogram::remove);
            Self::update_column(volume, &mut histogram, entering, y, z, radius, Histogram::add);
            out_row[x] = histogram.median(threshold);
        }
    }

    /// Apply `op` to every voxel of the `(2r+1)^2` cross-section at column `x`
    fn update_column(
        volume: &Volume,
        histogram: &mut Histogram,
        x: usize,
        y: usize,
        z: usize,
        radius: isize,
        op: fn(&mut Histogram, u8),
    ) {
        let data = volume.data();
        for dz in -radius..=radius {
            let nz = clamp_axis(z as isize + dz, volume.depth());
            for dy in -radius..=radius {
                let ny = clamp_axis(y as isize + dy, volume.height());
                op(histogram, data[volume.index(x, ny, nz)]);
            }
        }
    }
}

struct Histogram {
    bins: [u64; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self { bins: [0; 256] }
    }
}

impl Histogram {
    #[inline]
    fn add(&mut self, value: u8) {
        self.bins[value as usize] += 1;
    }

    #[inline]
    fn remove(&mut self, value: u8) {
        self.bins[value as usize] -= 1;
    }

    /// First intensity whose cumulative count exceeds `threshold`
    fn median(&self, threshold: u64) -> u8 {
        let mut count = 0u64;
        for (value, &bin) in self.bins.iter().enumerate() {
            count += bin;
            if count > threshold {
                return value as u8;
            }
        }
        u8::MAX
    }
}
