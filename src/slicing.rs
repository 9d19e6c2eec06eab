use crate::{enums::Plane, error::VolumeError, image_io::ImageIo, volume::Volume};

use image::GrayImage;
use ndarray::{ArrayView2, s};
use std::{fs, path::Path};

impl Volume {
    /// Copy an orthogonal cross-section out of the volume
    ///
    /// Output sizes (width x height): `XY` is width x height, `XZ` is
    /// width x depth and `YZ` is height x depth.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::OutOfRange`] if `coordinate` lies outside the
    /// axis fixed by `plane`.
    pub fn slice(&self, plane: Plane, coordinate: i64) -> Result<GrayImage, VolumeError> {
        let index = self.checked_plane_index(plane, coordinate)?;
        let view = self.view()?;
        let slice = match plane {
            Plane::XY => view.slice(s![index, .., ..]),
            Plane::XZ => view.slice(s![.., index, ..]),
            Plane::YZ => view.slice(s![.., .., index]),
        };
        Self::slice_to_image(&slice)
    }

    /// Slice by plane name, case-insensitively
    pub fn slice_by_name(&self, plane: &str, coordinate: i64) -> Result<GrayImage, VolumeError> {
        self.slice(plane.parse()?, coordinate)
    }

    /// Extract a cross-section and write it as a single-channel image.
    ///
    /// Nothing is written when the plane or coordinate is invalid.
    pub fn save_slice(
        &self,
        plane: Plane,
        coordinate: i64,
        path: &Path,
        io: &dyn ImageIo,
    ) -> Result<(), VolumeError> {
        let image = self.slice(plane, coordinate)?;
        io.encode(path, image.as_raw(), image.width(), image.height(), 1)?;
        log::info!("{plane} slice at {coordinate} saved to {}", path.display());
        Ok(())
    }

    /// Write every XY slice to `folder` as `{prefix}_slice_{z}.png`,
    /// creating the folder if needed.
    ///
    /// A slice that fails to encode is logged and the remaining slices are
    /// still written.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Encode`] naming `folder` if any slice failed.
    pub fn save_slices(
        &self,
        folder: &Path,
        prefix: &str,
        io: &dyn ImageIo,
    ) -> Result<(), VolumeError> {
        if self.is_empty() {
            return Err(VolumeError::EmptyVolume);
        }
        fs::create_dir_all(folder)?;
        let mut failed = 0;
        for z in 0..self.depth() {
            let path = folder.join(format!("{prefix}_slice_{z}.png"));
            if let Err(e) = self.save_slice(Plane::XY, z as i64, &path, io) {
                log::warn!("Failed to save slice {z} to {}: {e}", path.display());
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(VolumeError::Encode {
                path: folder.to_path_buf(),
                reason: format!("{failed} of {} slices not written", self.depth()),
            });
        }
        Ok(())
    }

    fn checked_plane_index(&self, plane: Plane, coordinate: i64) -> Result<usize, VolumeError> {
        let (axis, len) = match plane {
            Plane::XY => ('z', self.depth()),
            Plane::XZ => ('y', self.height()),
            Plane::YZ => ('x', self.width()),
        };
        usize::try_from(coordinate)
            .ok()
            .filter(|&index| index < len)
            .ok_or_else(|| VolumeError::out_of_range(axis, coordinate, len))
    }

    fn slice_to_image(slice: &ArrayView2<'_, u8>) -> Result<GrayImage, VolumeError> {
        let (height, width) = slice.dim();
        let pixel_data: Vec<u8> = slice.iter().copied().collect();
        GrayImage::from_raw(width as u32, height as u32, pixel_data).ok_or(
            VolumeError::BufferLength {
                expected: width * height,
                found: 0,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::RefCell;

    /// Records encoded file names and fails for one of them
    struct RejectingIo {
        reject: &'static str,
        written: RefCell<Vec<String>>,
    }

    impl ImageIo for RejectingIo {
        fn decode(&self, path: &Path) -> Result<GrayImage, VolumeError> {
            Err(VolumeError::Decode {
                path: path.to_path_buf(),
                reason: "write only".into(),
            })
        }

        fn encode(
            &self,
            path: &Path,
            _pixels: &[u8],
            _width: u32,
            _height: u32,
            _channels: u8,
        ) -> Result<(), VolumeError> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            if name == self.reject {
                return Err(VolumeError::Encode {
                    path: path.to_path_buf(),
                    reason: "disk full".into(),
                });
            }
            self.written.borrow_mut().push(name);
            Ok(())
        }
    }

    /// Voxel value encodes its coordinates: 100 * z + 10 * y + x
    fn coded_volume() -> Volume {
        let (w, h, d) = (4, 3, 2);
        let mut volume = Volume::new(w, h, d);
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    volume.set_voxel(x, y, z, (100 * z + 10 * y + x) as u8).unwrap();
                }
            }
        }
        volume
    }

    #[test]
    fn xy_slice_is_width_by_height() {
        let image = coded_volume().slice(Plane::XY, 1).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(3, 2).0, [123]);
        assert_eq!(image.get_pixel(0, 1).0, [110]);
    }

    #[test]
    fn xz_slice_has_depth_rows() {
        let image = coded_volume().slice(Plane::XZ, 2).unwrap();
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.into_raw(), vec![20, 21, 22, 23, 120, 121, 122, 123]);
    }

    #[test]
    fn yz_slice_is_height_by_depth() {
        let image = coded_volume().slice(Plane::YZ, 1).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.into_raw(), vec![1, 11, 21, 101, 111, 121]);
    }

    #[test]
    fn coordinates_outside_the_fixed_axis_fail() {
        let volume = coded_volume();
        for (plane, coordinate) in [(Plane::XY, 2), (Plane::XZ, 3), (Plane::YZ, 4), (Plane::XY, -1)] {
            let err = volume.slice(plane, coordinate).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange, "{plane} at {coordinate}");
        }
    }

    #[test]
    fn plane_names_are_case_insensitive() {
        let volume = coded_volume();
        assert_eq!(
            volume.slice_by_name("yz", 0).unwrap(),
            volume.slice(Plane::YZ, 0).unwrap()
        );
        let err = volume.slice_by_name("ZX", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn invalid_slice_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slice.png");
        let result = coded_volume().save_slice(Plane::XY, 5, &path, &crate::image_io::ImageFileIo);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn save_slices_writes_one_file_per_depth() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("dump");
        coded_volume()
            .save_slices(&folder, "vol", &crate::image_io::ImageFileIo)
            .unwrap();
        assert!(folder.join("vol_slice_0.png").is_file());
        assert!(folder.join("vol_slice_1.png").is_file());
        assert!(!folder.join("vol_slice_2.png").exists());
    }

    #[test]
    fn save_slices_continues_past_a_failed_slice() {
        let dir = tempfile::tempdir().unwrap();
        let volume = Volume::from_raw(2, 2, 3, vec![7; 12]).unwrap();
        let io = RejectingIo {
            reject: "vol_slice_0.png",
            written: RefCell::new(Vec::new()),
        };
        let err = volume.save_slices(dir.path(), "vol", &io).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(
            io.written.into_inner(),
            vec!["vol_slice_1.png".to_string(), "vol_slice_2.png".to_string()]
        );
    }
}
