// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the vision bridge

use std::env;

/// Default maximum image size (10MB)
const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Default decode limit for rotated files (50 megapixels)
const DEFAULT_MAX_DECODE_PIXELS: u64 = 50_000_000;

/// What to do when a detect call on a live handle carries different options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionsPolicy {
    /// Keep using the session's original options
    #[default]
    Ignore,
    /// Fail the call with `OptionsMismatch`
    Reject,
}

impl OptionsPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ignore" => Some(OptionsPolicy::Ignore),
            "reject" => Some(OptionsPolicy::Reject),
            _ => None,
        }
    }
}

/// Configuration for ingestion limits and session behaviour
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Largest accepted buffer descriptor or image file, in bytes
    pub max_image_bytes: usize,
    /// Largest pixel count decoded when a file has to be rotated
    pub max_decode_pixels: u64,
    /// Handling of options supplied on a reused handle
    pub options_policy: OptionsPolicy,
}

impl VisionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_image_bytes: env::var("VISION_MAX_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_image_bytes),
            max_decode_pixels: env::var("VISION_MAX_DECODE_PIXELS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_decode_pixels),
            options_policy: env::var("VISION_OPTIONS_POLICY")
                .ok()
                .and_then(|v| OptionsPolicy::parse(&v))
                .unwrap_or(defaults.options_policy),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_image_bytes == 0 {
            return Err("Max image bytes must be greater than 0".to_string());
        }
        if self.max_decode_pixels == 0 {
            return Err("Max decode pixels must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_decode_pixels: DEFAULT_MAX_DECODE_PIXELS,
            options_policy: OptionsPolicy::Ignore,
        }
    }
}
