// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image ingestion: descriptor parsing and orientation normalization
//!
//! File inputs are read for their EXIF orientation. Upright files are passed
//! to the capability by path; rotated files are decoded and rotated so the
//! capability always sees an upright bitmap. Buffer inputs are NV21 frames
//! whose rotation is stamped onto the canonical image for the capability.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use serde_json::{Map, Value};
use tracing::debug;

use super::config::VisionConfig;
use super::errors::VisionError;
use super::types::{CanonicalImage, ImageDescriptor, PixelFormat, Rotation};

/// Source of a file's orientation
pub trait OrientationReader: Send + Sync {
    /// Clockwise rotation needed to display the file upright
    fn read(&self, path: &Path) -> Result<Rotation, VisionError>;
}

/// Reads EXIF tag 0x0112 (Orientation) via `kamadak-exif`
///
/// Only the pure rotations are honoured: 6 = 90deg CW, 3 = 180deg,
/// 8 = 270deg CW. Mirrored orientations, a missing tag and files without
/// EXIF data all map to no rotation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifOrientationReader;

impl OrientationReader for ExifOrientationReader {
    fn read(&self, path: &Path) -> Result<Rotation, VisionError> {
        let file = File::open(path).map_err(|e| {
            VisionError::ImageDecode(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let mut reader = BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(e) => {
                debug!("No EXIF orientation in {}: {}", path.display(), e);
                return Ok(Rotation::Deg0);
            }
        };

        let orientation = exif
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .unwrap_or(1);

        Ok(rotation_for_orientation(orientation))
    }
}

/// Map an EXIF orientation value to a clockwise rotation
pub fn rotation_for_orientation(orientation: u32) -> Rotation {
    match orientation {
        6 => Rotation::Deg90,
        3 => Rotation::Deg180,
        8 => Rotation::Deg270,
        _ => Rotation::Deg0,
    }
}

impl ImageDescriptor {
    /// Parse the wire shape of an image descriptor
    ///
    /// * `{"type": "file", "path": "..."}`
    /// * `{"type": "bytes", "bytes": [..] | "<base64>", "metadata": {"width", "height", "rotation"}}`
    pub fn from_arguments(args: &Value) -> Result<Self, VisionError> {
        let image_type = args.get("type").and_then(Value::as_str);

        match image_type {
            Some("file") => {
                let path = args
                    .get("path")
                    .and_then(Value::as_str)
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| VisionError::ImageDecode("path is required".to_string()))?;
                Ok(ImageDescriptor::File {
                    path: PathBuf::from(path),
                })
            }
            Some("bytes") => {
                let metadata = args
                    .get("metadata")
                    .and_then(Value::as_object)
                    .ok_or_else(|| VisionError::ImageDecode("metadata is required".to_string()))?;

                let bytes = parse_bytes(args.get("bytes"))?;
                let width = dimension(metadata, "width")?;
                let height = dimension(metadata, "height")?;
                let rotation = rotation(metadata)?;

                Ok(ImageDescriptor::Buffer {
                    bytes,
                    width,
                    height,
                    rotation,
                })
            }
            Some(other) => Err(VisionError::UnsupportedImageType(other.to_string())),
            None => Err(VisionError::UnsupportedImageType(
                args.get("type")
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "null".to_string()),
            )),
        }
    }
}

fn parse_bytes(value: Option<&Value>) -> Result<Vec<u8>, VisionError> {
    match value {
        Some(Value::String(encoded)) => STANDARD
            .decode(encoded)
            .map_err(|e| VisionError::ImageDecode(format!("Invalid base64 bytes: {}", e))),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| {
                        VisionError::ImageDecode(format!("Invalid byte value: {}", item))
                    })
            })
            .collect(),
        Some(other) => Err(VisionError::ImageDecode(format!(
            "bytes must be a byte sequence, got {}",
            other
        ))),
        None => Err(VisionError::ImageDecode("bytes are required".to_string())),
    }
}

/// Integral numeric metadata field; hosts may send sizes as floating point
fn integral(metadata: &Map<String, Value>, key: &str) -> Result<i64, VisionError> {
    let value = metadata
        .get(key)
        .ok_or_else(|| VisionError::ImageDecode(format!("metadata.{} is required", key)))?;

    if let Some(n) = value.as_i64() {
        return Ok(n);
    }

    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(VisionError::ImageDecode(format!(
            "metadata.{} must be an integral number, got {}",
            key, value
        ))),
    }
}

fn dimension(metadata: &Map<String, Value>, key: &str) -> Result<u32, VisionError> {
    let n = integral(metadata, key)?;
    u32::try_from(n)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            VisionError::ImageDecode(format!("metadata.{} must be positive, got {}", key, n))
        })
}

fn rotation(metadata: &Map<String, Value>) -> Result<Rotation, VisionError> {
    let degrees = integral(metadata, "rotation")?;
    Rotation::try_from(degrees).map_err(|d| {
        VisionError::ImageDecode(format!(
            "metadata.rotation must be one of 0, 90, 180, 270, got {}",
            d
        ))
    })
}

/// Converts image descriptors into canonical images
pub struct ImageIngestor {
    max_image_bytes: usize,
    max_decode_pixels: u64,
    orientation: Box<dyn OrientationReader>,
}

impl ImageIngestor {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            max_image_bytes: config.max_image_bytes,
            max_decode_pixels: config.max_decode_pixels,
            orientation: Box::new(ExifOrientationReader),
        }
    }

    /// Replace the EXIF reader, e.g. for hosts that already know the orientation
    pub fn with_orientation_reader(mut self, reader: Box<dyn OrientationReader>) -> Self {
        self.orientation = reader;
        self
    }

    pub fn ingest(&self, descriptor: &ImageDescriptor) -> Result<CanonicalImage, VisionError> {
        match descriptor {
            ImageDescriptor::File { path } => self.ingest_file(path),
            ImageDescriptor::Buffer {
                bytes,
                width,
                height,
                rotation,
            } => self.ingest_buffer(bytes, *width, *height, *rotation),
        }
    }

    fn ingest_file(&self, path: &Path) -> Result<CanonicalImage, VisionError> {
        let size = std::fs::metadata(path)
            .map_err(|e| {
                VisionError::ImageDecode(format!("Failed to read {}: {}", path.display(), e))
            })?
            .len();
        if size > self.max_image_bytes as u64 {
            return Err(VisionError::ImageDecode(format!(
                "Image file is too large: {} bytes (max: {} bytes)",
                size, self.max_image_bytes
            )));
        }

        let rotation = self.orientation.read(path)?;
        if rotation.is_identity() {
            debug!("Ingested {} without rotation", path.display());
            return Ok(CanonicalImage::FilePath {
                path: path.to_path_buf(),
            });
        }

        let (width, height) = image::image_dimensions(path)
            .map_err(|e| VisionError::ImageDecode(format!("Failed to decode image: {}", e)))?;
        let pixels = width as u64 * height as u64;
        if pixels > self.max_decode_pixels {
            return Err(VisionError::ImageDecode(format!(
                "Image is too large to rotate: {}x{} (max: {} pixels)",
                width, height, self.max_decode_pixels
            )));
        }

        let image = image::open(path)
            .map_err(|e| VisionError::ImageDecode(format!("Failed to decode image: {}", e)))?;
        let rotated = rotate(image, rotation);

        debug!(
            "Ingested {} rotated by {} degrees: {}x{}",
            path.display(),
            rotation.degrees(),
            rotated.width(),
            rotated.height()
        );

        Ok(CanonicalImage::Bitmap { image: rotated })
    }

    fn ingest_buffer(
        &self,
        bytes: &[u8],
        width: u32,
        height: u32,
        rotation: Rotation,
    ) -> Result<CanonicalImage, VisionError> {
        if bytes.is_empty() {
            return Err(VisionError::ImageDecode("Image data is empty".to_string()));
        }
        if bytes.len() > self.max_image_bytes {
            return Err(VisionError::ImageDecode(format!(
                "Image data is too large: {} bytes (max: {} bytes)",
                bytes.len(),
                self.max_image_bytes
            )));
        }

        let format = PixelFormat::Nv21;
        let expected = format.frame_len(width, height);
        if (bytes.len() as u64) < expected {
            return Err(VisionError::ImageDecode(format!(
                "Buffer holds {} bytes, a {}x{} frame needs {}",
                bytes.len(),
                width,
                height,
                expected
            )));
        }

        debug!(
            "Ingested {}x{} buffer, rotation {}",
            width,
            height,
            rotation.degrees()
        );

        Ok(CanonicalImage::Buffer {
            bytes: bytes.to_vec(),
            width,
            height,
            rotation,
            format,
        })
    }
}

/// Rotate clockwise by a quarter-turn multiple
fn rotate(image: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::Deg0 => image,
        Rotation::Deg90 => image.rotate90(),
        Rotation::Deg180 => image.rotate180(),
        Rotation::Deg270 => image.rotate270(),
    }
}
