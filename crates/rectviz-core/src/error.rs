use thiserror::Error;

/// Input that parses as JSON but does not describe a drawable figure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("property object must have exactly one key, found {0}")]
    NotSingleKey(usize),

    #[error("rectangle '{name}' has {count} points, at least 3 are needed to close a polygon")]
    TooFewPoints { name: String, count: usize },

    #[error("no rectangles to draw")]
    NoRectangles,

    #[error("no construction steps to show")]
    NoSteps,
}
