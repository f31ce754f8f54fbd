//! Gesture classification
//!
//! Counts finger valleys: deep convexity defects whose opening angle is acute
//! correspond to gaps between extended fingers. The bucket counts and the
//! confidence attached to each label were tuned against live camera footage,
//! so they are fixed here rather than configurable.

use glam::IVec2;

use super::contour::{self, Defect};
use super::frame::Mask;
use crate::consts::*;

/// Recognized hand poses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureLabel {
    OpenHand,
    ClosedFist,
    Pointing,
    Peace,
    Unknown,
}

/// One classification result, shared with the input unifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub label: GestureLabel,
    pub confidence: f32,
    /// Hand centroid in camera coordinates, when a hand was found
    pub centroid: Option<IVec2>,
}

impl GestureSample {
    pub fn none() -> Self {
        Self {
            label: GestureLabel::Unknown,
            confidence: 0.0,
            centroid: None,
        }
    }
}

/// True for defects that look like the valley between two fingers: deep
/// enough, and opening at 90 degrees or less
fn is_finger_valley(contour: &[IVec2], defect: &Defect) -> bool {
    if defect.depth <= MIN_DEFECT_DEPTH {
        return false;
    }
    let s = contour[defect.start].as_vec2();
    let e = contour[defect.end].as_vec2();
    let f = contour[defect.farthest].as_vec2();
    let a = s - f;
    let b = e - f;
    let lengths = a.length() * b.length();
    if lengths < 1e-5 {
        return false;
    }
    let cos = (a.dot(b) / lengths).clamp(-1.0, 1.0);
    cos.acos().to_degrees() <= 90.0
}

/// Classify the largest blob in a segmented mask
pub fn classify(mask: &Mask) -> GestureSample {
    let contours = contour::find_contours(mask);
    let Some(hand) = contours
        .iter()
        .max_by(|a, b| contour::contour_area(a).total_cmp(&contour::contour_area(b)))
    else {
        return GestureSample::none();
    };
    if contour::contour_area(hand) < MIN_HAND_AREA {
        return GestureSample::none();
    }

    let centroid = contour::centroid(hand);
    let hull = contour::convex_hull(hand);
    if hull.len() < 3 {
        // Collinear blob, no interior to read fingers from: report nothing,
        // so the sample cannot clear the movement confidence gate either
        return GestureSample::none();
    }

    let valleys = contour::convexity_defects(hand, &hull)
        .iter()
        .filter(|d| is_finger_valley(hand, d))
        .count();

    let (label, confidence) = match valleys {
        v if v >= 4 => (GestureLabel::OpenHand, 0.9),
        0 => (GestureLabel::ClosedFist, 0.8),
        1 => (GestureLabel::Pointing, 0.7),
        2 => (GestureLabel::Peace, 0.6),
        _ => (GestureLabel::Unknown, 0.3),
    };
    GestureSample {
        label,
        confidence,
        centroid,
    }
}
