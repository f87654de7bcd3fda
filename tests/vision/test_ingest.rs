// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image ingestion tests
//!
//! Covers EXIF orientation handling for files, NV21 buffer validation and
//! the ingestion limits from `VisionConfig`.

use std::path::{Path, PathBuf};

use fabstir_vision_bridge::vision::{
    CanonicalImage, ExifOrientationReader, ImageDescriptor, ImageIngestor, OrientationReader,
    Rotation, VisionConfig, VisionError,
};
use image::ImageFormat;

use super::fakes::{encoded_image, nv21_frame};

/// Big-endian TIFF header with a single IFD0 entry: Orientation (SHORT) = `orientation`
fn exif_segment(orientation: u16) -> Vec<u8> {
    let mut tiff = vec![b'M', b'M', 0x00, 0x2a, 0x00, 0x00, 0x00, 0x08];
    tiff.extend_from_slice(&[0x00, 0x01]);
    tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0x00, 0x00]);
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let length = (payload.len() + 2) as u16;
    let mut segment = vec![0xff, 0xe1];
    segment.extend_from_slice(&length.to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

/// Write a JPEG carrying the given EXIF orientation
fn jpeg_with_orientation(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    orientation: u16,
) -> PathBuf {
    let jpeg = encoded_image(width, height, ImageFormat::Jpeg);
    assert_eq!(&jpeg[..2], &[0xff, 0xd8]);

    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&exif_segment(orientation));
    bytes.extend_from_slice(&jpeg[2..]);

    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn ingest(descriptor: &ImageDescriptor) -> Result<CanonicalImage, VisionError> {
    ImageIngestor::new(&VisionConfig::default()).ingest(descriptor)
}

#[test]
fn test_exif_orientation_values() {
    let dir = tempfile::tempdir().unwrap();
    let reader = ExifOrientationReader;

    for (orientation, expected) in [
        (1, Rotation::Deg0),
        (6, Rotation::Deg90),
        (3, Rotation::Deg180),
        (8, Rotation::Deg270),
        (2, Rotation::Deg0),
    ] {
        let name = format!("o{}.jpg", orientation);
        let path = jpeg_with_orientation(dir.path(), &name, 4, 2, orientation);
        assert_eq!(
            reader.read(&path).unwrap(),
            expected,
            "orientation {}",
            orientation
        );
    }
}

#[test]
fn test_file_without_exif_is_upright() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.png");
    std::fs::write(&path, encoded_image(4, 2, ImageFormat::Png)).unwrap();

    assert_eq!(ExifOrientationReader.read(&path).unwrap(), Rotation::Deg0);

    match ingest(&ImageDescriptor::File { path: path.clone() }).unwrap() {
        CanonicalImage::FilePath { path: seen } => assert_eq!(seen, path),
        other => panic!("expected file path, got {:?}", other),
    }
}

#[test]
fn test_rotated_jpeg_decoded_upright() {
    let dir = tempfile::tempdir().unwrap();
    let path = jpeg_with_orientation(dir.path(), "rotated.jpg", 4, 2, 6);

    let image = ingest(&ImageDescriptor::File { path }).unwrap();
    assert_eq!(image.rotation(), Rotation::Deg0);
    match image {
        CanonicalImage::Bitmap { image } => {
            assert_eq!((image.width(), image.height()), (2, 4));
        }
        other => panic!("expected bitmap, got {:?}", other),
    }
}

#[test]
fn test_upside_down_jpeg_keeps_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = jpeg_with_orientation(dir.path(), "flipped.jpg", 4, 2, 3);

    match ingest(&ImageDescriptor::File { path }).unwrap() {
        CanonicalImage::Bitmap { image } => {
            assert_eq!((image.width(), image.height()), (4, 2));
        }
        other => panic!("expected bitmap, got {:?}", other),
    }
}

#[test]
fn test_upright_jpeg_passed_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = jpeg_with_orientation(dir.path(), "upright.jpg", 4, 2, 1);

    assert!(matches!(
        ingest(&ImageDescriptor::File { path }).unwrap(),
        CanonicalImage::FilePath { .. }
    ));
}

#[test]
fn test_rotation_refused_above_pixel_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = jpeg_with_orientation(dir.path(), "big.jpg", 8, 8, 8);

    let config = VisionConfig {
        max_decode_pixels: 32,
        ..Default::default()
    };
    let err = ImageIngestor::new(&config)
        .ingest(&ImageDescriptor::File { path })
        .unwrap_err();
    assert_eq!(err.code(), "MLVisionDetectorIOError");
}

#[test]
fn test_file_above_size_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.png");
    std::fs::write(&path, encoded_image(16, 16, ImageFormat::Png)).unwrap();

    let config = VisionConfig {
        max_image_bytes: 8,
        ..Default::default()
    };
    let err = ImageIngestor::new(&config)
        .ingest(&ImageDescriptor::File { path })
        .unwrap_err();
    assert!(matches!(err, VisionError::ImageDecode(_)));
}

#[test]
fn test_corrupt_rotated_file_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.jpg");
    let mut bytes = vec![0xff, 0xd8];
    bytes.extend_from_slice(&exif_segment(6));
    bytes.extend_from_slice(b"not really a jpeg");
    std::fs::write(&path, bytes).unwrap();

    let err = ingest(&ImageDescriptor::File { path }).unwrap_err();
    assert_eq!(err.code(), "MLVisionDetectorIOError");
}

#[test]
fn test_buffer_descriptor_from_arguments() {
    let args = serde_json::json!({
        "type": "bytes",
        "bytes": [0, 0, 0, 0, 0, 0],
        "metadata": { "width": 2.0, "height": 2.0, "rotation": 270.0 }
    });

    let descriptor = ImageDescriptor::from_arguments(&args).unwrap();
    assert_eq!(descriptor, nv21_frame(Rotation::Deg270));

    let image = ingest(&descriptor).unwrap();
    assert_eq!(image.rotation(), Rotation::Deg270);
}

#[test]
fn test_buffer_missing_width() {
    let args = serde_json::json!({
        "type": "bytes",
        "bytes": [0, 0, 0, 0, 0, 0],
        "metadata": { "height": 2, "rotation": 0 }
    });

    let err = ImageDescriptor::from_arguments(&args).unwrap_err();
    assert_eq!(err.code(), "MLVisionDetectorIOError");
}

#[test]
fn test_empty_buffer_rejected() {
    let descriptor = ImageDescriptor::Buffer {
        bytes: Vec::new(),
        width: 2,
        height: 2,
        rotation: Rotation::Deg0,
    };
    assert!(matches!(
        ingest(&descriptor),
        Err(VisionError::ImageDecode(_))
    ));
}
