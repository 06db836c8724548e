use std::f64::consts::PI;

use serde::Serialize;

use crate::overlap::Interval;

/// Label column a slice's label is drawn in. Each side is its own overlap
/// domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// Angles run clockwise from 12 o'clock, so the first half turn is the
    /// right-hand column.
    pub fn of_angle(angle: f64) -> Self {
        if angle < PI { Side::Right } else { Side::Left }
    }

    pub fn sign(self) -> f64 {
        match self {
            Side::Right => 1.0,
            Side::Left => -1.0,
        }
    }

    pub fn text_anchor(self) -> &'static str {
        match self {
            Side::Right => "start",
            Side::Left => "end",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SliceLayout {
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: String,
}

impl SliceLayout {
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + (self.end_angle - self.start_angle) / 2.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelLayout {
    /// Index of the slice this label belongs to.
    pub slice: usize,
    pub text: String,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub interval: Interval,
    /// Leader line: slice centroid, label-arc centroid, label column.
    pub line: [(f64, f64); 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleLayout {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Geometry of one frame. Coordinates of slices and labels are relative to
/// `center`.
#[derive(Debug, Clone, Serialize)]
pub struct PieLayout {
    pub width: f64,
    pub height: f64,
    pub center: (f64, f64),
    pub radius: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub slices: Vec<SliceLayout>,
    pub labels: Vec<LabelLayout>,
    pub dropped: Vec<LabelLayout>,
    pub title: Option<TitleLayout>,
}

impl PieLayout {
    pub fn is_label_visible(&self, slice: usize) -> bool {
        self.labels.iter().any(|label| label.slice == slice)
    }
}
