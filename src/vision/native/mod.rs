// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed results produced by the external recognition library
//!
//! These mirror the library's own result objects. Fields the library may
//! leave unset are `Option`s; closed sets of variants are enums.

pub mod barcode;
pub mod face;
pub mod label;
pub mod text;

pub use barcode::{
    Address, Barcode, BarcodeValue, CalendarDateTime, CalendarEvent, ContactInfo, DriverLicense,
    Email, GeoPoint, PersonName, Phone, Sms, UrlBookmark, WiFi,
};
pub use face::{ContourType, Face, FaceContour, FaceLandmark, LandmarkType};
pub use label::ImageLabel;
pub use text::{RecognizedSpan, Text, TextBlock, TextElement, TextLine};

use super::types::CapabilityKind;

/// Axis-aligned integer rectangle (right/bottom exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Saturates instead of overflowing on extreme coordinates
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Sub-pixel position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A completed recognition, one variant per capability
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Barcodes(Vec<Barcode>),
    Faces(Vec<Face>),
    Text(Text),
    Labels(Vec<ImageLabel>),
}

impl Detection {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Detection::Barcodes(_) => CapabilityKind::Barcode,
            Detection::Faces(_) => CapabilityKind::Face,
            Detection::Text(_) => CapabilityKind::Text,
            Detection::Labels(_) => CapabilityKind::Label,
        }
    }
}
