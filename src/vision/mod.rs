// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! On-device vision recognition bridge
//!
//! This module provides:
//! - A handle-keyed registry of recognition sessions
//! - Image ingestion with orientation normalization
//! - Barcode, face, text and label result transcoding
//! - A dispatcher and method-call surface for host engines
//!
//! Recognition itself is delegated to external capabilities behind the
//! [`Detector`] trait.

pub mod channel;
pub mod completion;
pub mod config;
pub mod detector;
pub mod dispatcher;
pub mod errors;
pub mod ingest;
pub mod native;
pub mod registry;
pub mod transcode;
pub mod types;

pub use channel::{MethodCall, MethodResponse, Reply, VisionMethodHandler};
pub use completion::{completion, Completer, Completion};
pub use config::{OptionsPolicy, VisionConfig};
pub use detector::{
    BarcodeScannerOptions, Detector, DetectorFactory, DetectorOptions, FaceDetectorOptions,
    FaceMode, ImageLabelerOptions, TextRecognizerOptions,
};
pub use dispatcher::RecognitionDispatcher;
pub use errors::{CapabilityFailure, ErrorReply, VisionError};
pub use ingest::{ExifOrientationReader, ImageIngestor, OrientationReader};
pub use native::Detection;
pub use registry::{Session, SessionRegistry, SessionState};
pub use transcode::{transcode, GenericDocument};
pub use types::{CanonicalImage, CapabilityKind, Handle, ImageDescriptor, PixelFormat, Rotation};
