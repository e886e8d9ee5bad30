use rectviz_core::{BBox, Point};

/// Maps plot data coordinates onto a pixel region of the figure.
///
/// Data Y grows upwards, screen Y grows downwards.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Center X in data coordinates.
    pub center_x: f64,
    /// Center Y in data coordinates.
    pub center_y: f64,
    /// Zoom level (pixels per data unit).
    pub zoom: f64,
    /// Left edge of the drawing region in figure pixels.
    pub canvas_x: f64,
    /// Top edge of the drawing region in figure pixels.
    pub canvas_y: f64,
    /// Region width in pixels.
    pub canvas_width: f64,
    /// Region height in pixels.
    pub canvas_height: f64,
}

impl Viewport {
    pub fn at(canvas_x: f64, canvas_y: f64, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom: 1.0,
            canvas_x,
            canvas_y,
            canvas_width,
            canvas_height,
        }
    }

    /// Zoom to fit a bounding box exactly along its tighter axis, keeping one
    /// data unit the same length on both axes.
    pub fn fit_bbox(&mut self, bbox: &BBox) {
        let width = bbox.width();
        let height = bbox.height();
        if width <= 0.0 || height <= 0.0 {
            log::warn!("cannot fit a degenerate {width}x{height} box, keeping zoom");
            return;
        }

        let center = bbox.center();
        self.center_x = center.x;
        self.center_y = center.y;

        let zoom_x = self.canvas_width / width;
        let zoom_y = self.canvas_height / height;
        self.zoom = zoom_x.min(zoom_y);
    }

    /// Convert a data X coordinate to a figure pixel column.
    pub fn layout_to_screen_x(&self, layout_x: f64) -> f64 {
        self.canvas_x + (layout_x - self.center_x) * self.zoom + self.canvas_width / 2.0
    }

    /// Convert a data Y coordinate to a figure pixel row.
    pub fn layout_to_screen_y(&self, layout_y: f64) -> f64 {
        self.canvas_y + self.canvas_height / 2.0 - (layout_y - self.center_y) * self.zoom
    }

    pub fn layout_to_screen(&self, p: &Point) -> (f64, f64) {
        (self.layout_to_screen_x(p.x), self.layout_to_screen_y(p.y))
    }

    /// Pixel rectangle `(x, y, width, height)` covered by `bbox`.
    pub fn screen_rect(&self, bbox: &BBox) -> (f64, f64, f64, f64) {
        let x0 = self.layout_to_screen_x(bbox.min.x);
        let x1 = self.layout_to_screen_x(bbox.max.x);
        let y0 = self.layout_to_screen_y(bbox.max.y);
        let y1 = self.layout_to_screen_y(bbox.min.y);
        (x0, y0, x1 - x0, y1 - y0)
    }
}

/// Round tick positions covering `[min, max]` with roughly `target` steps,
/// spaced by 1, 2 or 5 times a power of ten. Returns the ticks and the step.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> (Vec<f64>, f64) {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() || target == 0 {
        return (vec![min], 0.0);
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    let ticks = (first..=last)
        .map(|i| i as f64 * step)
        // keep "0" from printing as "-0"
        .map(|t| if t == 0.0 { 0.0 } else { t })
        .collect();
    (ticks, step)
}

/// Tick label with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10()).ceil() as usize
    };
    format!("{value:.decimals$}")
}
