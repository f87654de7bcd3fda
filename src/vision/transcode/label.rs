// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image label transcoding

use serde_json::{json, Value};

use super::number;
use crate::vision::native::ImageLabel;

/// Convert image labels into a sequence of `{confidence, entityId, text}`
pub fn transcode_labels(labels: &[ImageLabel]) -> Value {
    Value::Array(
        labels
            .iter()
            .map(|label| {
                json!({
                    "confidence": number(label.confidence),
                    "entityId": label.index.to_string(),
                    "text": label.text,
                })
            })
            .collect(),
    )
}
