// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the vision bridge
//!
//! Every failure path ends in exactly one [`ErrorReply`] carrying a
//! machine-readable code and a human-readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CapabilityKind, Handle};

/// Failure reported by an external recognition capability
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct CapabilityFailure {
    /// Capability-specific code, if the library supplies one
    pub code: Option<String>,
    pub message: String,
}

impl CapabilityFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Errors produced while serving detect and close calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisionError {
    #[error("Object for handle already exists: {0}")]
    DuplicateHandle(Handle),

    #[error("Object for handle does not exist: {0}")]
    HandleNotFound(Handle),

    #[error("No image type for: {0}")]
    UnsupportedImageType(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("{kind} capability failed: {message}")]
    CapabilityProcessing {
        kind: CapabilityKind,
        message: String,
    },

    #[error("Failed to release {kind} capability: {message}")]
    CloseFailed {
        kind: CapabilityKind,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid detector options: {0}")]
    InvalidOptions(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Handle {handle} is bound to a {bound} capability, not {requested}")]
    HandleKindMismatch {
        handle: Handle,
        bound: CapabilityKind,
        requested: CapabilityKind,
    },

    #[error("Options differ from those handle {0} was created with")]
    OptionsMismatch(Handle),
}

impl VisionError {
    pub fn processing(kind: CapabilityKind, failure: CapabilityFailure) -> Self {
        VisionError::CapabilityProcessing {
            kind,
            message: failure.message,
        }
    }

    pub fn close_failed(kind: CapabilityKind, failure: CapabilityFailure) -> Self {
        VisionError::CloseFailed {
            kind,
            code: failure.code,
            message: failure.message,
        }
    }

    /// Machine-readable error code sent back to the host
    pub fn code(&self) -> String {
        match self {
            VisionError::DuplicateHandle(_) => "duplicateHandleError".to_string(),
            VisionError::HandleNotFound(_) => "handleNotFoundError".to_string(),
            VisionError::UnsupportedImageType(_) => "unsupportedImageType".to_string(),
            VisionError::ImageDecode(_) => "MLVisionDetectorIOError".to_string(),
            VisionError::CapabilityProcessing { kind, .. } => {
                kind.processing_error_code().to_string()
            }
            VisionError::CloseFailed { kind, code, .. } => {
                code.clone().unwrap_or_else(|| kind.close_error_code())
            }
            VisionError::InvalidOptions(_) => "invalidOptions".to_string(),
            VisionError::InvalidArgument(_) => "invalidArgument".to_string(),
            VisionError::HandleKindMismatch { .. } => "handleKindMismatch".to_string(),
            VisionError::OptionsMismatch(_) => "optionsMismatch".to_string(),
        }
    }

    /// Human-readable message; capability failures pass the library's text through
    pub fn message(&self) -> String {
        match self {
            VisionError::CapabilityProcessing { message, .. }
            | VisionError::CloseFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn to_reply(&self) -> ErrorReply {
        let details = match self {
            VisionError::DuplicateHandle(handle)
            | VisionError::HandleNotFound(handle)
            | VisionError::OptionsMismatch(handle) => {
                Some(serde_json::json!({ "handle": handle }))
            }
            VisionError::HandleKindMismatch {
                handle,
                bound,
                requested,
            } => Some(serde_json::json!({
                "handle": handle,
                "bound": bound,
                "requested": requested,
            })),
            _ => None,
        };

        ErrorReply {
            code: self.code(),
            message: self.message(),
            details,
        }
    }
}

/// Error reply delivered to the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReply {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
