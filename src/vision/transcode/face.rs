// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face transcoding

use serde_json::{Map, Value};

use super::{insert_bounding_box, number, point_f};
use crate::vision::native::{ContourType, Face, LandmarkType};

/// Convert detected faces into a sequence of documents
pub fn transcode_faces(faces: &[Face]) -> Value {
    Value::Array(faces.iter().map(face_document).collect())
}

fn face_document(face: &Face) -> Value {
    let mut doc = Map::new();

    insert_bounding_box(&mut doc, Some(face.bounding_box));
    doc.insert("headEulerAngleY".into(), number(face.head_euler_angle_y));
    doc.insert("headEulerAngleZ".into(), number(face.head_euler_angle_z));

    let probabilities = [
        ("smilingProbability", face.smiling_probability),
        ("leftEyeOpenProbability", face.left_eye_open_probability),
        ("rightEyeOpenProbability", face.right_eye_open_probability),
    ];
    for (key, probability) in probabilities {
        if let Some(p) = probability {
            doc.insert(key.into(), number(p));
        }
    }

    if let Some(id) = face.tracking_id {
        doc.insert("trackingId".into(), Value::from(id));
    }

    doc.insert("landmarks".into(), landmarks_document(face));
    doc.insert("contours".into(), contours_document(face));

    Value::Object(doc)
}

/// All ten landmark keys; undetected landmarks are `null`
fn landmarks_document(face: &Face) -> Value {
    let landmarks = LandmarkType::ALL
        .iter()
        .map(|kind| {
            let position = face
                .landmark(*kind)
                .map_or(Value::Null, |landmark| point_f(&landmark.position));
            (kind.key().to_string(), position)
        })
        .collect::<Map<_, _>>();

    Value::Object(landmarks)
}

/// Thirteen named contours (`null` if undetected) plus `allPoints`
fn contours_document(face: &Face) -> Value {
    let mut contours = Map::new();

    let all_points = face
        .contours
        .iter()
        .flat_map(|contour| contour.points.iter().map(point_f))
        .collect();
    contours.insert("allPoints".into(), Value::Array(all_points));

    for kind in ContourType::ALL {
        let Some(key) = kind.key() else {
            continue;
        };
        let points = face.contour(kind).map_or(Value::Null, |contour| {
            Value::Array(contour.points.iter().map(point_f).collect())
        });
        contours.insert(key.into(), points);
    }

    Value::Object(contours)
}
