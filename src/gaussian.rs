use crate::volume::Volume;

use rayon::prelude::*;

/// Separable 3D Gaussian blur with replicate-border clamping.
pub struct GaussianBlur3D;

impl GaussianBlur3D {
    /// Blur `volume` in place with a `kernel_size` wide Gaussian along each
    /// axis.
    ///
    /// An even `kernel_size` is bumped to the next odd value. The passes run
    /// X, then Y, then Z, each reading only the previous pass's buffer.
    pub fn apply(volume: &mut Volume, kernel_size: usize, sigma: f64) {
        let kernel_size = odd_kernel_size(kernel_size);
        log::debug!("3D Gaussian blur, kernel {kernel_size}, sigma {sigma}");
        if volume.is_empty() {
            return;
        }
        let kernel = Self::kernel(kernel_size, sigma);

        let pass_x = Self::pass_x(volume, &kernel);
        let pass_y = Self::pass_y(volume, &pass_x, &kernel);
        let pass_z = Self::pass_z(volume, &pass_y, &kernel);
        volume.replace_data(pass_z);
    }

    /// Normalized 1D Gaussian weights of length `kernel_size`.
    ///
    /// A non-positive or non-finite `sigma`, or one so small that the
    /// weights cannot be normalized, yields a unit impulse.
    pub fn kernel(kernel_size: usize, sigma: f64) -> Vec<f64> {
        let radius = (kernel_size / 2) as f64;
        let two_sigma_sq = 2.0 * sigma * sigma;
        if !(sigma.is_finite() && sigma > 0.0 && two_sigma_sq > 0.0) {
            return Self::impulse(kernel_size);
        }
        let mut kernel: Vec<f64> = (0..kernel_size)
            .map(|i| {
                let offset = i as f64 - radius;
                (-(offset * offset) / two_sigma_sq).exp()
            })
            .collect();
        let sum: f64 = kernel.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Self::impulse(kernel_size);
        }
        kernel.iter_mut().for_each(|w| *w /= sum);
        kernel
    }

    fn impulse(kernel_size: usize) -> Vec<f64> {
        let mut impulse = vec![0.0; kernel_size];
        impulse[kernel_size / 2] = 1.0;
        impulse
    }

    // Every pass fills whole output rows (fixed y, z) so rows can be
    // computed independently.

    fn pass_x(volume: &Volume, kernel: &[f64]) -> Vec<u8> {
        let (_, height, width) = volume.dim();
        let radius = (kernel.len() / 2) as isize;
        let src = volume.data();
        let mut out = vec![0u8; src.len()];

        out.par_chunks_mut(width).enumerate().for_each(|(row, out_row)| {
            let (y, z) = (row % height, row / height);
            for (x, out_px) in out_row.iter_mut().enumerate() {
                let mut sum = 0.0;
                let mut weight_sum = 0.0;
                for (k, &weight) in kernel.iter().enumerate() {
                    let nx = clamp_axis(x as isize + k as isize - radius, width);
                    sum += f64::from(src[volume.index(nx, y, z)]) * weight;
                    weight_sum += weight;
                }
                *out_px = (sum / weight_sum) as u8;
            }
        });
        out
    }

    fn pass_y(volume: &Volume, src: &[u8], kernel: &[f64]) -> Vec<u8> {
        let (_, height, width) = volume.dim();
        let radius = (kernel.len() / 2) as isize;
        let mut out = vec![0u8; src.len()];

        out.par_chunks_mut(width).enumerate().for_each(|(row, out_row)| {
            let (y, z) = (row % height, row / height);
            for (x, out_px) in out_row.iter_mut().enumerate() {
                let sum: f64 = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, &weight)| {
                        let ny = clamp_axis(y as isize + k as isize - radius, height);
                        f64::from(src[volume.index(x, ny, z)]) * weight
                    })
                    .sum();
                *out_px = sum as u8;
            }
        });
        out
    }

    fn pass_z(volume: &Volume, src: &[u8], kernel: &[f64]) -> Vec<u8> {
        let (depth, height, width) = volume.dim();
        let radius = (kernel.len() / 2) as isize;
        let mut out = vec![0u8; src.len()];

        out.par_chunks_mut(width).enumerate().for_each(|(row, out_row)| {
            let (y, z) = (row % height, row / height);
            for (x, out_px) in out_row.iter_mut().enumerate() {
                let sum: f64 = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, &weight)| {
                        let nz = clamp_axis(z as isize + k as isize - radius, depth);
                        f64::from(src[volume.index(x, y, nz)]) * weight
                    })
                    .sum();
                *out_px = sum as u8;
            }
        });
        out
    }
}

/// Round an even kernel size up to the next odd value.
pub(crate) fn odd_kernel_size(kernel_size: usize) -> usize {
    if kernel_size % 2 == 0 {
        kernel_size + 1
    } else {
        kernel_size
    }
}

/// Replicate-border clamp of a signed coordinate into `0..len`.
#[inline]
pub(crate) fn clamp_axis(coord: isize, len: usize) -> usize {
    coord.clamp(0, len as isize - 1) as usize
}
