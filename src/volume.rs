use crate::error::VolumeError;

use ndarray::ArrayView3;

/// Dense single-channel 8-bit volume.
///
/// Voxels are stored in one flat buffer linearized as
/// `x + width * (y + height * z)`; see [`Volume::index`]. The buffer length
/// always equals `width * height * depth`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Volume {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<u8>,
}

impl Volume {
    /// Zero-filled volume of the given size
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            data: vec![0; width * height * depth],
        }
    }

    /// Wrap an existing buffer laid out as described in [`Volume::index`].
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::BufferLength`] if `data` does not hold exactly
    /// `width * height * depth` samples.
    pub fn from_raw(
        width: usize,
        height: usize,
        depth: usize,
        data: Vec<u8>,
    ) -> Result<Self, VolumeError> {
        let expected = width * height * depth;
        if data.len() != expected {
            return Err(VolumeError::BufferLength {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        (self.depth, self.height, self.width)
    }

    /// True when any dimension is zero
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat buffer offset of `(x, y, z)`.
    ///
    /// This is the only place the voxel layout is defined. Callers are
    /// responsible for passing in-range coordinates.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.width * (y + self.height * z)
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the underlying data
    ///
    /// The length is fixed; only sample values can change.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read-only view with shape (depth, height, width).
    ///
    /// The view's standard layout coincides with [`Volume::index`], so
    /// `view[[z, y, x]] == data[index(x, y, z)]`.
    pub fn view(&self) -> Result<ArrayView3<'_, u8>, VolumeError> {
        Ok(ArrayView3::from_shape(self.dim(), &self.data)?)
    }

    pub fn get_voxel(&self, x: usize, y: usize, z: usize) -> Result<u8, VolumeError> {
        self.check_bounds(x, y, z)?;
        Ok(self.data[self.index(x, y, z)])
    }

    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, value: u8) -> Result<(), VolumeError> {
        self.check_bounds(x, y, z)?;
        let idx = self.index(x, y, z);
        self.data[idx] = value;
        Ok(())
    }

    /// Swap in a filtered buffer of identical size
    pub(crate) fn replace_data(&mut self, data: Vec<u8>) {
        debug_assert_eq!(data.len(), self.data.len());
        self.data = data;
    }

    fn check_bounds(&self, x: usize, y: usize, z: usize) -> Result<(), VolumeError> {
        if x >= self.width {
            return Err(VolumeError::out_of_range('x', x, self.width));
        }
        if y >= self.height {
            return Err(VolumeError::out_of_range('y', y, self.height));
        }
        if z >= self.depth {
            return Err(VolumeError::out_of_range('z', z, self.depth));
        }
        Ok(())
    }
}
