use serde::{Deserialize, Serialize};

use rectviz_renderer::FigureSize;

/// Figure sizes and output naming shared by both programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Static rectangles figure, in pixels.
    pub static_width: f64,
    pub static_height: f64,
    /// Step visualizer figure, in pixels.
    pub step_width: f64,
    pub step_height: f64,
    /// Pixels per inch, sets how large point-sized text and lines come out.
    pub dpi: f64,
    pub output_extension: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            static_width: 1920.0,
            static_height: 1080.0,
            step_width: 1200.0,
            step_height: 800.0,
            dpi: 100.0,
            output_extension: "svg".to_string(),
        }
    }
}

impl RenderSettings {
    pub fn static_figure(&self) -> FigureSize {
        FigureSize::new(self.static_width, self.static_height, self.dpi)
    }

    pub fn step_figure(&self) -> FigureSize {
        FigureSize::new(self.step_width, self.step_height, self.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.output_extension, "svg");
        let fig = settings.static_figure();
        assert_eq!((fig.width_px, fig.height_px), (1920.0, 1080.0));
        let fig = settings.step_figure();
        assert_eq!((fig.width_px, fig.height_px, fig.dpi), (1200.0, 800.0, 100.0));
    }

    #[test]
    fn test_settings_json() {
        let json = serde_json::to_string(&RenderSettings::default()).unwrap();
        let back: RenderSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RenderSettings::default());
    }
}
