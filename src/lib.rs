// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod logging;
pub mod vision;

pub use vision::{
    CapabilityKind, Detector, DetectorFactory, ErrorReply, Handle, ImageDescriptor, MethodCall,
    MethodResponse, RecognitionDispatcher, VisionConfig, VisionError, VisionMethodHandler,
};
