// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types shared by ingestion, the registry and the dispatcher

use std::fmt;
use std::path::PathBuf;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Caller-supplied identifier for a recognition session
pub type Handle = i32;

/// The four pluggable recognition capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Barcode,
    Face,
    Text,
    Label,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 4] = [
        CapabilityKind::Barcode,
        CapabilityKind::Face,
        CapabilityKind::Text,
        CapabilityKind::Label,
    ];

    /// Prefix used in method names, e.g. `FaceDetector#processImage`
    pub fn method_prefix(&self) -> &'static str {
        match self {
            CapabilityKind::Barcode => "BarcodeDetector",
            CapabilityKind::Face => "FaceDetector",
            CapabilityKind::Text => "TextRecognizer",
            CapabilityKind::Label => "ImageLabeler",
        }
    }

    pub fn from_method_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.method_prefix() == prefix)
    }

    /// Error code reported when the capability fails to process an image
    pub fn processing_error_code(&self) -> &'static str {
        match self {
            CapabilityKind::Barcode => "barcodeDetectorError",
            CapabilityKind::Face => "faceDetectorError",
            CapabilityKind::Text => "textRecognizerError",
            CapabilityKind::Label => "imageLabelerError",
        }
    }

    /// Error code reported when releasing the capability fails
    pub fn close_error_code(&self) -> String {
        format!("{}IOError", self.method_prefix())
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::Barcode => write!(f, "barcode"),
            CapabilityKind::Face => write!(f, "face"),
            CapabilityKind::Text => write!(f, "text"),
            CapabilityKind::Label => write!(f, "label"),
        }
    }
}

/// Clockwise rotation of an image, restricted to quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Rotation::Deg0)
    }
}

impl TryFrom<i64> for Rotation {
    type Error = i64;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(other),
        }
    }
}

/// Pixel layout of raw buffers handed to a capability
///
/// Only the NV21 (YUV 4:2:0 semi-planar) layout is accepted on the buffer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Nv21,
}

impl PixelFormat {
    /// Numeric tag understood by the recognition library
    pub fn tag(&self) -> i32 {
        match self {
            PixelFormat::Nv21 => 17,
        }
    }

    /// Minimum number of bytes holding one frame of the given size
    pub fn frame_len(&self, width: u32, height: u32) -> u64 {
        match self {
            PixelFormat::Nv21 => {
                let luma = width as u64 * height as u64;
                luma + luma / 2
            }
        }
    }
}

/// Raw image input as described by the host
#[derive(Debug, Clone, PartialEq)]
pub enum ImageDescriptor {
    /// Image file on disk; orientation is read from its metadata
    File { path: PathBuf },
    /// In-memory NV21 frame with explicit geometry
    Buffer {
        bytes: Vec<u8>,
        width: u32,
        height: u32,
        rotation: Rotation,
    },
}

/// Normalized image ready for a capability
#[derive(Debug, Clone)]
pub enum CanonicalImage {
    /// Direct file reference; the file needed no rotation
    FilePath { path: PathBuf },
    /// Decoded pixels with the file's rotation already applied
    Bitmap { image: DynamicImage },
    /// Raw frame; the capability applies `rotation` itself
    Buffer {
        bytes: Vec<u8>,
        width: u32,
        height: u32,
        rotation: Rotation,
        format: PixelFormat,
    },
}

impl CanonicalImage {
    /// Rotation the capability still has to account for
    pub fn rotation(&self) -> Rotation {
        match self {
            CanonicalImage::FilePath { .. } | CanonicalImage::Bitmap { .. } => Rotation::Deg0,
            CanonicalImage::Buffer { rotation, .. } => *rotation,
        }
    }
}
