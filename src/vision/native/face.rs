// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face detector results

use super::{PointF, Rect};

/// Fixed facial landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkType {
    MouthBottom,
    LeftCheek,
    LeftEar,
    LeftEye,
    MouthLeft,
    NoseBase,
    RightCheek,
    RightEar,
    RightEye,
    MouthRight,
}

impl LandmarkType {
    pub const ALL: [LandmarkType; 10] = [
        LandmarkType::MouthBottom,
        LandmarkType::LeftCheek,
        LandmarkType::LeftEar,
        LandmarkType::LeftEye,
        LandmarkType::MouthLeft,
        LandmarkType::NoseBase,
        LandmarkType::RightCheek,
        LandmarkType::RightEar,
        LandmarkType::RightEye,
        LandmarkType::MouthRight,
    ];

    /// Key used in the landmarks document
    pub fn key(&self) -> &'static str {
        match self {
            LandmarkType::MouthBottom => "bottomMouth",
            LandmarkType::LeftCheek => "leftCheek",
            LandmarkType::LeftEar => "leftEar",
            LandmarkType::LeftEye => "leftEye",
            LandmarkType::MouthLeft => "leftMouth",
            LandmarkType::NoseBase => "noseBase",
            LandmarkType::RightCheek => "rightCheek",
            LandmarkType::RightEar => "rightEar",
            LandmarkType::RightEye => "rightEye",
            LandmarkType::MouthRight => "rightMouth",
        }
    }
}

/// Facial contours, in the detector's enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContourType {
    Face,
    LeftEyebrowTop,
    LeftEyebrowBottom,
    RightEyebrowTop,
    RightEyebrowBottom,
    LeftEye,
    RightEye,
    UpperLipTop,
    UpperLipBottom,
    LowerLipTop,
    LowerLipBottom,
    NoseBridge,
    NoseBottom,
    LeftCheek,
    RightCheek,
}

impl ContourType {
    pub const ALL: [ContourType; 15] = [
        ContourType::Face,
        ContourType::LeftEyebrowTop,
        ContourType::LeftEyebrowBottom,
        ContourType::RightEyebrowTop,
        ContourType::RightEyebrowBottom,
        ContourType::LeftEye,
        ContourType::RightEye,
        ContourType::UpperLipTop,
        ContourType::UpperLipBottom,
        ContourType::LowerLipTop,
        ContourType::LowerLipBottom,
        ContourType::NoseBridge,
        ContourType::NoseBottom,
        ContourType::LeftCheek,
        ContourType::RightCheek,
    ];

    /// Key used in the contours document; cheeks only feed `allPoints`
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ContourType::Face => Some("face"),
            ContourType::LeftEyebrowTop => Some("leftEyebrowTop"),
            ContourType::LeftEyebrowBottom => Some("leftEyebrowBottom"),
            ContourType::RightEyebrowTop => Some("rightEyebrowTop"),
            ContourType::RightEyebrowBottom => Some("rightEyebrowBottom"),
            ContourType::LeftEye => Some("leftEye"),
            ContourType::RightEye => Some("rightEye"),
            ContourType::UpperLipTop => Some("upperLipTop"),
            ContourType::UpperLipBottom => Some("upperLipBottom"),
            ContourType::LowerLipTop => Some("lowerLipTop"),
            ContourType::LowerLipBottom => Some("lowerLipBottom"),
            ContourType::NoseBridge => Some("noseBridge"),
            ContourType::NoseBottom => Some("noseBottom"),
            ContourType::LeftCheek | ContourType::RightCheek => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLandmark {
    pub kind: LandmarkType,
    pub position: PointF,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceContour {
    pub kind: ContourType,
    pub points: Vec<PointF>,
}

/// A detected face
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    pub bounding_box: Rect,
    /// Yaw, in degrees
    pub head_euler_angle_y: f32,
    /// Roll, in degrees
    pub head_euler_angle_z: f32,
    pub smiling_probability: Option<f32>,
    pub left_eye_open_probability: Option<f32>,
    pub right_eye_open_probability: Option<f32>,
    /// Set only when tracking is enabled and a track was assigned
    pub tracking_id: Option<i32>,
    pub landmarks: Vec<FaceLandmark>,
    /// Detected contours in the detector's enumeration order
    pub contours: Vec<FaceContour>,
}

impl Face {
    pub fn landmark(&self, kind: LandmarkType) -> Option<&FaceLandmark> {
        self.landmarks.iter().find(|l| l.kind == kind)
    }

    pub fn contour(&self, kind: ContourType) -> Option<&FaceContour> {
        self.contours.iter().find(|c| c.kind == kind)
    }
}
