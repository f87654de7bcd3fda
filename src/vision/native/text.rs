// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text recognizer results: blocks contain lines, lines contain elements

use super::{Point, Rect};

/// Geometry and content shared by blocks, lines and elements
pub trait RecognizedSpan {
    fn bounding_box(&self) -> Option<Rect>;
    fn corner_points(&self) -> Option<&[Point]>;
    fn recognized_language(&self) -> Option<&str>;
    fn text(&self) -> &str;
}

/// Full recognition result for one image
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub text: String,
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub bounding_box: Option<Rect>,
    pub corner_points: Option<Vec<Point>>,
    pub recognized_language: Option<String>,
    pub text: String,
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLine {
    pub bounding_box: Option<Rect>,
    pub corner_points: Option<Vec<Point>>,
    pub recognized_language: Option<String>,
    pub text: String,
    pub elements: Vec<TextElement>,
}

/// Roughly a word
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextElement {
    pub bounding_box: Option<Rect>,
    pub corner_points: Option<Vec<Point>>,
    pub recognized_language: Option<String>,
    pub text: String,
}

macro_rules! impl_recognized_span {
    ($($ty:ty),+) => {
        $(
            impl RecognizedSpan for $ty {
                fn bounding_box(&self) -> Option<Rect> {
                    self.bounding_box
                }

                fn corner_points(&self) -> Option<&[Point]> {
                    self.corner_points.as_deref()
                }

                fn recognized_language(&self) -> Option<&str> {
                    self.recognized_language.as_deref()
                }

                fn text(&self) -> &str {
                    &self.text
                }
            }
        )+
    };
}

impl_recognized_span!(TextBlock, TextLine, TextElement);
