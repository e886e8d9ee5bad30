use rectviz_core::{BBox, Color, Point};

/// Dash style of a stroked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDash {
    Solid,
    Dashed,
    Dotted,
}

/// How a line or outline is stroked. Widths are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dash: LineDash,
    pub alpha: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: LineDash::Solid,
            alpha: 1.0,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dash = LineDash::Dashed;
        self
    }

    pub fn dotted(mut self) -> Self {
        self.dash = LineDash::Dotted;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Effective opacity: the stroke alpha times the color's own alpha.
    pub fn opacity(&self) -> f64 {
        self.alpha * self.color.a
    }
}

/// Horizontal placement of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Vertical placement of text relative to its anchor point. `Bottom` puts
/// the text above the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f64,
    pub bold: bool,
    pub color: Color,
    pub anchor: Anchor,
    pub baseline: Baseline,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f64,
    /// Screen offset in points from the anchor, x right and y up.
    pub offset: (f64, f64),
    /// Translucent box drawn behind the text.
    pub background: Option<Color>,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            bold: false,
            color: Color::BLACK,
            anchor: Anchor::Start,
            baseline: Baseline::Bottom,
            rotation: 0.0,
            offset: (0.0, 0.0),
            background: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, anchor: Anchor, baseline: Baseline) -> Self {
        self.anchor = anchor;
        self.baseline = baseline;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset = (dx, dy);
        self
    }

    pub fn boxed(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }
}

/// A drawable primitive in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Closed polygon. `fill` carries its own alpha.
    Polygon {
        points: Vec<Point>,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        label: Option<String>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        label: Option<String>,
    },
    /// Filled dot with a diameter in points.
    Marker { at: Point, size: f64, color: Color },
    /// Circle with a radius in data units.
    Circle {
        center: Point,
        radius: f64,
        stroke: Stroke,
        label: Option<String>,
    },
    Text {
        at: Point,
        text: String,
        style: TextStyle,
    },
}

impl Shape {
    pub fn line(from: Point, to: Point, stroke: Stroke) -> Self {
        Shape::Line {
            from,
            to,
            stroke,
            label: None,
        }
    }

    pub fn labeled_line(from: Point, to: Point, stroke: Stroke, label: &str) -> Self {
        Shape::Line {
            from,
            to,
            stroke,
            label: Some(label.to_string()),
        }
    }

    pub fn text(at: Point, text: impl Into<String>, style: TextStyle) -> Self {
        Shape::Text {
            at,
            text: text.into(),
            style,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Shape::Text { .. })
    }

    /// Legend entry for a labeled shape, like a plotting library collects
    /// handles from labeled artists.
    pub fn legend_entry(&self) -> Option<LegendEntry> {
        match self {
            Shape::Polygon {
                fill,
                stroke,
                label: Some(label),
                ..
            } => Some(LegendEntry::new(
                LegendHandle::Patch {
                    fill: fill.unwrap_or(Color::TRANSPARENT),
                    stroke: *stroke,
                },
                label,
            )),
            Shape::Line {
                stroke,
                label: Some(label),
                ..
            } => Some(LegendEntry::new(LegendHandle::Line(*stroke), label)),
            Shape::Circle {
                stroke,
                label: Some(label),
                ..
            } => Some(LegendEntry::new(
                LegendHandle::Patch {
                    fill: Color::TRANSPARENT,
                    stroke: Some(*stroke),
                },
                label,
            )),
            _ => None,
        }
    }
}

/// Swatch drawn next to a legend entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendHandle {
    Patch { fill: Color, stroke: Option<Stroke> },
    Line(Stroke),
    /// Reserves the swatch column but draws nothing.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub handle: LegendHandle,
    pub text: String,
    pub text_color: Color,
}

impl LegendEntry {
    pub fn new(handle: LegendHandle, text: &str) -> Self {
        Self {
            handle,
            text: text.to_string(),
            text_color: Color::BLACK,
        }
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }
}

/// Legend box placed to the right of the axes, vertically centered.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
    /// Font size of the entries in points.
    pub font_size: f64,
}

impl Legend {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            entries: Vec::new(),
            font_size: 10.0,
        }
    }

    pub fn push(&mut self, entry: LegendEntry) {
        self.entries.push(entry);
    }
}

/// A complete figure: one set of equal-aspect axes plus decorations.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Axis limits in data coordinates.
    pub bounds: BBox,
    pub grid: bool,
    /// Shapes in draw order.
    pub shapes: Vec<Shape>,
    pub legend: Option<Legend>,
    /// Small caption under the axes.
    pub footer: Option<String>,
}

impl Scene {
    pub fn new(bounds: BBox) -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            bounds,
            grid: true,
            shapes: Vec::new(),
            legend: None,
            footer: None,
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Legend entries of every labeled shape, in draw order.
    pub fn labeled_entries(&self) -> Vec<LegendEntry> {
        self.shapes.iter().filter_map(Shape::legend_entry).collect()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
