// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversion of native recognition results into generic documents
//!
//! Each transcoder is a pure function. A native field that is absent is
//! omitted from the document; `null` appears only where the native model
//! itself reports a matched-but-empty value (an undetected landmark, a
//! barcode without raw text).

pub mod barcode;
pub mod face;
pub mod label;
pub mod text;

pub use barcode::transcode_barcodes;
pub use face::transcode_faces;
pub use label::transcode_labels;
pub use text::transcode_text;

use serde_json::{Map, Value};

use super::native::{Detection, Point, PointF, Rect};

/// Language-agnostic value returned across the host boundary
pub type GenericDocument = Value;

/// Convert any completed detection with the transcoder for its capability
pub fn transcode(detection: &Detection) -> GenericDocument {
    match detection {
        Detection::Barcodes(barcodes) => transcode_barcodes(barcodes),
        Detection::Faces(faces) => transcode_faces(faces),
        Detection::Text(text) => transcode_text(text),
        Detection::Labels(labels) => transcode_labels(labels),
    }
}

/// Flat `left/top/width/height` keys; nothing is written for an absent box
pub(crate) fn insert_bounding_box(map: &mut Map<String, Value>, bounds: Option<Rect>) {
    if let Some(rect) = bounds {
        map.insert("left".into(), Value::from(rect.left as f64));
        map.insert("top".into(), Value::from(rect.top as f64));
        map.insert("width".into(), Value::from(rect.width() as f64));
        map.insert("height".into(), Value::from(rect.height() as f64));
    }
}

pub(crate) fn point(p: &Point) -> Value {
    Value::Array(vec![Value::from(p.x as f64), Value::from(p.y as f64)])
}

pub(crate) fn point_f(p: &PointF) -> Value {
    Value::Array(vec![number(p.x), number(p.y)])
}

/// A recognizer float as a JSON number; NaN and infinities become `0.0`
pub(crate) fn number(value: f32) -> Value {
    if value.is_finite() {
        Value::from(value as f64)
    } else {
        Value::from(0.0)
    }
}

pub(crate) fn points(points: &[Point]) -> Value {
    Value::Array(points.iter().map(point).collect())
}

/// String or `null`
pub(crate) fn text_or_null(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}
