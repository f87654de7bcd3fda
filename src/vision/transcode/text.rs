// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text transcoding

use serde_json::{Map, Value};

use super::{insert_bounding_box, points, text_or_null};
use crate::vision::native::{RecognizedSpan, Text, TextBlock, TextLine};

/// Convert a text recognition into a single document with nested blocks
pub fn transcode_text(text: &Text) -> Value {
    let mut doc = Map::new();
    doc.insert("text".into(), Value::from(text.text.as_str()));
    doc.insert(
        "blocks".into(),
        Value::Array(text.blocks.iter().map(block_document).collect()),
    );
    Value::Object(doc)
}

fn block_document(block: &TextBlock) -> Value {
    let mut doc = span_document(block);
    doc.insert(
        "lines".into(),
        Value::Array(block.lines.iter().map(line_document).collect()),
    );
    Value::Object(doc)
}

fn line_document(line: &TextLine) -> Value {
    let mut doc = span_document(line);
    doc.insert(
        "elements".into(),
        Value::Array(
            line.elements
                .iter()
                .map(|element| Value::Object(span_document(element)))
                .collect(),
        ),
    );
    Value::Object(doc)
}

/// Fields common to blocks, lines and elements
fn span_document<S: RecognizedSpan>(span: &S) -> Map<String, Value> {
    let mut doc = Map::new();

    insert_bounding_box(&mut doc, span.bounding_box());
    doc.insert("points".into(), points(span.corner_points().unwrap_or(&[])));

    // Single-language wrapper kept for schema compatibility
    let mut language = Map::new();
    language.insert(
        "languageCode".into(),
        text_or_null(span.recognized_language()),
    );
    doc.insert(
        "recognizedLanguages".into(),
        Value::Array(vec![Value::Object(language)]),
    );

    doc.insert("text".into(), Value::from(span.text()));
    doc
}
