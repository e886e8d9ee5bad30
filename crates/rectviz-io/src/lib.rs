//! # rectviz I/O
//!
//! Reads the JSON inputs of both programs into the core model, holds the
//! render settings and writes finished figures next to their input.

pub mod loader;
pub mod output;
pub mod settings;

pub use loader::{load_rectangles, load_steps, parse_rectangles, parse_steps, LoadError};
pub use output::{output_path_for, write_figure};
pub use settings::RenderSettings;
