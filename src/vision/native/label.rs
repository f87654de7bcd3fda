// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image labeler results

/// A label describing image content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageLabel {
    pub text: String,
    /// 0.0 - 1.0
    pub confidence: f32,
    /// Stable index of the label in the labeler's model
    pub index: i32,
}
