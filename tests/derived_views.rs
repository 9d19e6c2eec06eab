mod common;

use common::{MemoryIo, noisy_volume, two_slice_volume};
use slice_volume::{ErrorKind, ImageFileIo, Plane, ProjectionKind, Projector};
use std::path::Path;

#[test]
fn two_slice_scenario() {
    let volume = two_slice_volume();

    let project = |kind| Projector::project(&volume, kind, None, None).unwrap().into_raw();
    assert_eq!(project(ProjectionKind::Mip), vec![50, 51, 52, 53, 54, 55]);
    assert_eq!(project(ProjectionKind::MinIp), vec![10, 11, 12, 13, 14, 15]);
    assert_eq!(project(ProjectionKind::Aip), vec![30, 31, 32, 33, 34, 35]);

    let slab = Projector::apply_projection(&volume, "MIP", 1, 1).unwrap();
    assert_eq!(slab.into_raw(), vec![50, 51, 52, 53, 54, 55]);

    let slice = volume.slice(Plane::XY, 1).unwrap();
    assert_eq!(slice.dimensions(), (3, 2));
    assert_eq!(slice.into_raw(), vec![50, 51, 52, 53, 54, 55]);
}

#[test]
fn projections_bound_every_column() {
    let volume = noisy_volume(6, 5, 7, 0x9e37_79b9);
    let mip = Projector::mip(&volume).unwrap();
    let min_ip = Projector::min_ip(&volume).unwrap();
    let aip = Projector::aip(&volume).unwrap();

    for y in 0..volume.height() {
        for x in 0..volume.width() {
            let column: Vec<u8> = (0..volume.depth())
                .map(|z| volume.get_voxel(x, y, z).unwrap())
                .collect();
            let (px, py) = (x as u32, y as u32);
            assert!(column.iter().all(|&v| mip.get_pixel(px, py).0[0] >= v));
            assert!(column.iter().all(|&v| min_ip.get_pixel(px, py).0[0] <= v));
            let sum: u32 = column.iter().map(|&v| u32::from(v)).sum();
            assert_eq!(u32::from(aip.get_pixel(px, py).0[0]), sum / column.len() as u32);
        }
    }
}

#[test]
fn median_projection_matches_sorted_middle() {
    for depth in [5, 6] {
        let volume = noisy_volume(4, 3, depth, 7 + depth as u32);
        let median = Projector::aip_median(&volume).unwrap();
        for y in 0..volume.height() {
            for x in 0..volume.width() {
                let mut column: Vec<u8> = (0..depth)
                    .map(|z| volume.get_voxel(x, y, z).unwrap())
                    .collect();
                column.sort_unstable();
                let expected = if depth % 2 == 1 {
                    column[depth / 2]
                } else {
                    ((u16::from(column[depth / 2 - 1]) + u16::from(column[depth / 2])) / 2) as u8
                };
                assert_eq!(median.get_pixel(x as u32, y as u32).0[0], expected);
            }
        }
    }
}

#[test]
fn reversed_slab_matches_ordered_slab() {
    let volume = noisy_volume(5, 4, 8, 42);
    for kind in ["MIP", "MinIP", "AIP"] {
        assert_eq!(
            Projector::apply_projection(&volume, kind, 6, 2).unwrap(),
            Projector::apply_projection(&volume, kind, 2, 6).unwrap(),
            "{kind}"
        );
    }
}

#[test]
fn projection_is_written_as_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mip.png");
    let mip = Projector::mip(&two_slice_volume()).unwrap();
    Projector::save(&path, &mip, &ImageFileIo).unwrap();

    let written = image::open(&path).unwrap();
    assert_eq!(written.color(), image::ColorType::Rgb8);
    let rgb = written.into_rgb8();
    assert_eq!(rgb.dimensions(), (3, 2));
    assert_eq!(rgb.get_pixel(2, 1).0, [55, 55, 55]);
}

#[test]
fn projection_encode_call_replicates_channels() {
    let io = MemoryIo::default();
    let aip = Projector::aip(&two_slice_volume()).unwrap();
    Projector::save(Path::new("aip.png"), &aip, &io).unwrap();

    let encoded = io.encoded.borrow();
    assert_eq!(encoded.len(), 1);
    assert_eq!(encoded[0].channels, 3);
    assert_eq!((encoded[0].width, encoded[0].height), (3, 2));
    assert_eq!(&encoded[0].pixels[..6], &[30, 30, 30, 31, 31, 31]);
}

#[test]
fn slices_are_written_single_channel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("yz.png");
    let volume = two_slice_volume();
    volume.save_slice(Plane::YZ, 2, &path, &ImageFileIo).unwrap();

    let written = image::open(&path).unwrap();
    assert_eq!(written.color(), image::ColorType::L8);
    let gray = written.into_luma8();
    assert_eq!(gray.dimensions(), (2, 2));
    assert_eq!(gray.into_raw(), vec![12, 15, 52, 55]);
}

#[test]
fn failed_slice_produces_no_output() {
    let io = MemoryIo::default();
    let volume = two_slice_volume();

    let err = volume.save_slice(Plane::XY, 2, Path::new("xy.png"), &io).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);

    let err = volume.slice_by_name("diagonal", 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    assert!(io.encoded.borrow().is_empty());
}
