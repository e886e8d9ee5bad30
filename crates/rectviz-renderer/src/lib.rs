//! # rectviz Renderer
//!
//! Turns the core model into figures. A [`Scene`] describes one set of
//! equal-aspect axes in data coordinates; [`static_plot`] and [`step_plot`]
//! build scenes for the two programs, and [`svg::render_svg`] maps a scene
//! through a [`Viewport`] into an SVG document.

pub mod scene;
pub mod static_plot;
pub mod step_plot;
pub mod stepper;
pub mod svg;
pub mod viewport;

pub use scene::{Legend, LegendEntry, Scene, Shape, Stroke, TextStyle};
pub use stepper::StepVisualizer;
pub use svg::{render_svg, FigureSize};
pub use viewport::Viewport;
