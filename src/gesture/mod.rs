//! Hand-gesture recognition pipeline
//!
//! Frames flow through four stages: skin segmentation in HSV, morphological
//! cleanup, contour and convexity analysis, and finger-valley classification.
//! Everything below the [`FrameSource`] seam is pure and runs the same on
//! synthetic masks as on camera frames.

pub mod classify;
pub mod contour;
pub mod controller;
pub mod frame;

pub use classify::{classify, GestureLabel, GestureSample};
pub use contour::{centroid, contour_area, convex_hull, convexity_defects, find_contours, Defect};
pub use controller::{CameraError, FrameSource, GestureController};
pub use frame::{segment, Frame, Mask, SkinRange};
