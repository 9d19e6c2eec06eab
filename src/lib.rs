//! # slice-volume
//!
//! Treat a stack of 2D grayscale slice images as one dense 3D volume, filter
//! it, and derive 2D views from it.
//!
//! Slices are read from a directory (optionally restricted to a filename
//! prefix). The run of digits right before the file extension is the slice
//! index; indices only filter and order slices, the n-th accepted file
//! becomes depth position n. All slices must share one size.
//!
//! Once loaded, the volume can be
//!  - blurred with a separable 3D Gaussian ([`gaussian::GaussianBlur3D`])
//!  - denoised with a sliding-histogram 3D median
//!    ([`median::MedianBlur3D`])
//!  - projected along depth by maximum, minimum, mean or median, over the
//!    full depth or a z slab ([`projection::Projector`])
//!  - cut along the XY, XZ or YZ plane ([`Volume::slice`])
//!
//! Volumes are single-channel, 8 bits per voxel, and held fully in memory.
//!
//! # Examples
//!
//! ## Maximum intensity projection of a slab
//!
//! Load `scans/vol*.png`, smooth it and write the MIP of slices 10 to 20.
//!
//! ```no_run
//! # use slice_volume::{ImageFileIo, LoadOptions, Projector, VolumeLoader};
//! # use slice_volume::gaussian::GaussianBlur3D;
//! # use std::path::Path;
//! let io = ImageFileIo;
//! let mut volume = VolumeLoader::load("scans/vol", &LoadOptions::default(), &io)
//!     .expect("should have loaded slices from directory");
//! GaussianBlur3D::apply(&mut volume, 3, 1.0);
//! let mip = Projector::mip_slab(&volume, 10, 20).expect("volume is not empty");
//! Projector::save(Path::new("mip.png"), &mip, &io).expect("should have written projection");
//! ```
//!
//! ## Orthogonal slice
//!
//! ```no_run
//! # use slice_volume::{ImageFileIo, LoadOptions, Plane, VolumeLoader};
//! let volume = VolumeLoader::load("scans", &LoadOptions::default(), &ImageFileIo)
//!     .expect("should have loaded slices from directory");
//! let image = volume
//!     .slice(Plane::XZ, volume.height() as i64 / 2)
//!     .expect("should have returned slice at center of volume");
//! image.save("xz.png").expect("should have written slice");
//! ```

pub mod enums;
pub mod error;
pub mod gaussian;
pub mod image_io;
pub mod median;
pub mod pipeline;
pub mod projection;
mod slicing;
pub mod volume;
pub mod volume_loader;

pub use enums::{BlurKind, Plane, ProjectionKind};
pub use error::{ErrorKind, VolumeError};
pub use image_io::{ImageFileIo, ImageIo};
pub use projection::Projector;
pub use volume::Volume;
pub use volume_loader::{LoadOptions, VolumeLoader};
