// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Capability contract for external recognition libraries
//!
//! A [`Detector`] wraps one instance of an on-device recognizer. The bridge
//! never runs recognition itself; it hands a canonical image to the detector
//! and transcodes whatever native result comes back.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{CapabilityFailure, VisionError};
use super::native::Detection;
use super::types::{CanonicalImage, CapabilityKind};

/// One instance of an external recognition capability
#[async_trait]
pub trait Detector: Send + Sync {
    /// The capability this instance implements
    fn kind(&self) -> CapabilityKind;

    /// Run recognition on a canonical image
    ///
    /// The returned future resolves exactly once, with either the native
    /// result or the capability's failure.
    async fn process(&self, image: &CanonicalImage) -> Result<Detection, CapabilityFailure>;

    /// Release the underlying library resources
    fn close(&self) -> Result<(), CapabilityFailure>;
}

/// Constructs detectors from parsed options
#[cfg_attr(test, mockall::automock)]
pub trait DetectorFactory: Send + Sync {
    fn create(&self, options: &DetectorOptions) -> Result<Arc<dyn Detector>, VisionError>;
}

/// Barcode scanner configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarcodeScannerOptions {
    /// Bitmask of formats to scan for; 0 scans all formats
    pub barcode_formats: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceMode {
    #[default]
    Fast,
    Accurate,
}

/// Face detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceDetectorOptions {
    pub enable_classification: bool,
    pub enable_landmarks: bool,
    pub enable_contours: bool,
    pub enable_tracking: bool,
    /// Smallest face to detect, relative to the image width
    pub min_face_size: f32,
    pub mode: FaceMode,
}

impl Default for FaceDetectorOptions {
    fn default() -> Self {
        Self {
            enable_classification: false,
            enable_landmarks: false,
            enable_contours: false,
            enable_tracking: false,
            min_face_size: 0.1,
            mode: FaceMode::Fast,
        }
    }
}

/// Text recognition takes no options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRecognizerOptions {}

/// Image labeler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageLabelerOptions {
    /// Labels below this confidence are dropped by the labeler
    pub confidence_threshold: f32,
}

impl Default for ImageLabelerOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
        }
    }
}

/// Options a session was created with
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorOptions {
    Barcode(BarcodeScannerOptions),
    Face(FaceDetectorOptions),
    Text(TextRecognizerOptions),
    Label(ImageLabelerOptions),
}

impl DetectorOptions {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            DetectorOptions::Barcode(_) => CapabilityKind::Barcode,
            DetectorOptions::Face(_) => CapabilityKind::Face,
            DetectorOptions::Text(_) => CapabilityKind::Text,
            DetectorOptions::Label(_) => CapabilityKind::Label,
        }
    }

    /// Parse the option mapping sent with a detect call
    ///
    /// A missing or `null` mapping yields the defaults for `kind`. Unknown
    /// keys are ignored; a known key with the wrong type is an error.
    pub fn parse(kind: CapabilityKind, options: &Value) -> Result<Self, VisionError> {
        let options = match options {
            Value::Null => Value::Object(Default::default()),
            Value::Object(_) => options.clone(),
            other => {
                return Err(VisionError::InvalidOptions(format!(
                    "options must be a mapping, got {}",
                    other
                )))
            }
        };

        let parsed = match kind {
            CapabilityKind::Barcode => DetectorOptions::Barcode(from_options(options)?),
            CapabilityKind::Face => DetectorOptions::Face(from_options(options)?),
            CapabilityKind::Text => DetectorOptions::Text(TextRecognizerOptions::default()),
            CapabilityKind::Label => {
                let labeler: ImageLabelerOptions = from_options(options)?;
                if !(0.0..=1.0).contains(&labeler.confidence_threshold) {
                    return Err(VisionError::InvalidOptions(format!(
                        "confidenceThreshold must be between 0 and 1, got {}",
                        labeler.confidence_threshold
                    )));
                }
                DetectorOptions::Label(labeler)
            }
        };

        Ok(parsed)
    }
}

fn from_options<T: serde::de::DeserializeOwned>(options: Value) -> Result<T, VisionError> {
    serde_json::from_value(options).map_err(|e| VisionError::InvalidOptions(e.to_string()))
}
