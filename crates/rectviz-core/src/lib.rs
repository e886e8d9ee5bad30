//! # rectviz Core
//!
//! Data model for the rectviz plots: rectangle records with their computed
//! properties, rectangle construction steps with their traits, elementary
//! geometry (bounding boxes, diagonals, circumscribed circles) and the
//! color rules both figures share.

pub mod color;
pub mod error;
pub mod geometry;
pub mod rectangle;
pub mod steps;

pub use color::{generate_distinct_colors, rectangle_tint, Color, DistinctColor};
pub use error::ModelError;
pub use geometry::{diagonal_length, BBox, CircleSpec, Point, Polygon};
pub use rectangle::{NamedPoint, Property, PropertyValue, RectangleRecord, RectangleSet};
pub use steps::{RectState, Step, StepSequence, TraitKey, TraitValue, Traits};
