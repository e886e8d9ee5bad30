//! SVG backend for [`Scene`]s.
//!
//! Layout follows a single-axes figure: title on top, equal-aspect axes in
//! the remaining space, tick labels and axis labels around the axes and the
//! legend to the right of it. Sizes in the scene are points and are scaled
//! by the figure dpi.

use std::borrow::Cow;
use std::fmt::{self, Write};

use rectviz_core::{BBox, Color, Point};

use crate::scene::{Anchor, Baseline, Legend, LegendHandle, LineDash, Scene, Shape, Stroke, TextStyle};
use crate::viewport::{format_tick, nice_ticks, Viewport};

/// Output figure dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_px: f64,
    pub height_px: f64,
    pub dpi: f64,
}

impl FigureSize {
    pub fn new(width_px: f64, height_px: f64, dpi: f64) -> Self {
        Self {
            width_px,
            height_px,
            dpi,
        }
    }

    /// Pixels per point.
    pub fn px_per_pt(&self) -> f64 {
        self.dpi / 72.0
    }
}

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 80.0;
const LEGEND_GAP: f64 = 20.0;
const LEGEND_HANDLE_WIDTH: f64 = 28.0;
const TICK_LENGTH: f64 = 5.0;
const GRID_COLOR: &str = "#b0b0b0";

/// Rough advance width of a character as a fraction of the font size.
const CHAR_WIDTH: f64 = 0.6;

/// Escape text for use inside SVG elements and attributes.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn text_width(text: &str, size_px: f64) -> f64 {
    text.chars().count() as f64 * size_px * CHAR_WIDTH
}

/// Pixel geometry of the legend box.
struct LegendLayout {
    width: f64,
    height: f64,
    row_height: f64,
    title_height: f64,
    font_px: f64,
}

impl LegendLayout {
    fn measure(legend: &Legend, figure: &FigureSize) -> Self {
        let font_px = legend.font_size * figure.px_per_pt();
        let row_height = font_px * 1.7;
        let title_height = if legend.title.is_empty() { 0.0 } else { font_px * 2.0 };
        let widest_entry = legend
            .entries
            .iter()
            .map(|e| text_width(&e.text, font_px))
            .fold(0.0, f64::max);
        let title_width = text_width(&legend.title, font_px);
        let width = (LEGEND_HANDLE_WIDTH + 10.0 + widest_entry).max(title_width) + 20.0;
        let height = title_height + legend.entries.len() as f64 * row_height + 12.0;
        Self {
            width,
            height,
            row_height,
            title_height,
            font_px,
        }
    }
}

/// Bounds that can be fitted: zero spans are widened by one unit.
fn drawable_bounds(bounds: &BBox) -> BBox {
    let mut b = *bounds;
    if b.width() <= 0.0 {
        b.min.x -= 0.5;
        b.max.x += 0.5;
    }
    if b.height() <= 0.0 {
        b.min.y -= 0.5;
        b.max.y += 0.5;
    }
    b
}

fn dash_array(stroke: &Stroke, px_per_pt: f64) -> Option<String> {
    let lw = stroke.width * px_per_pt;
    match stroke.dash {
        LineDash::Solid => None,
        LineDash::Dashed => Some(format!("{:.2},{:.2}", 3.7 * lw, 1.6 * lw)),
        LineDash::Dotted => Some(format!("{:.2},{:.2}", 1.0 * lw, 1.65 * lw)),
    }
}

fn stroke_attrs(stroke: &Stroke, px_per_pt: f64) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{:.2}" stroke-opacity="{:.3}""#,
        stroke.color.to_svg(),
        stroke.width * px_per_pt,
        stroke.opacity()
    );
    if let Some(dashes) = dash_array(stroke, px_per_pt) {
        attrs.push_str(&format!(r#" stroke-dasharray="{dashes}""#));
    }
    attrs
}

fn fill_attrs(fill: Option<Color>) -> String {
    match fill {
        Some(c) if !c.is_transparent() => {
            format!(r#"fill="{}" fill-opacity="{:.3}""#, c.to_svg(), c.a)
        }
        _ => r#"fill="none""#.to_string(),
    }
}

/// Writes one scene into an SVG string.
struct SvgWriter<'a> {
    out: String,
    figure: &'a FigureSize,
    viewport: Viewport,
}

impl<'a> SvgWriter<'a> {
    fn pt(&self, points: f64) -> f64 {
        points * self.figure.px_per_pt()
    }

    fn header(&mut self) -> fmt::Result {
        let (w, h) = (self.figure.width_px, self.figure.height_px);
        writeln!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="DejaVu Sans, Arial, sans-serif">"#
        )?;
        writeln!(self.out, r#"  <rect width="{w:.0}" height="{h:.0}" fill="white"/>"#)
    }

    fn clip_path(&mut self, axes: (f64, f64, f64, f64)) -> fmt::Result {
        let (x, y, w, h) = axes;
        writeln!(
            self.out,
            r#"  <defs><clipPath id="axes-clip"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}"/></clipPath></defs>"#
        )
    }

    fn grid_and_ticks(&mut self, scene: &Scene, axes: (f64, f64, f64, f64)) -> fmt::Result {
        let (ax, ay, aw, ah) = axes;
        let tick_font = self.pt(10.0);
        let x_target = ((aw / 90.0).round() as usize).max(2);
        let y_target = ((ah / 70.0).round() as usize).max(2);
        let (x_ticks, x_step) = nice_ticks(scene.bounds.min.x, scene.bounds.max.x, x_target);
        let (y_ticks, y_step) = nice_ticks(scene.bounds.min.y, scene.bounds.max.y, y_target);

        for &t in &x_ticks {
            let sx = self.viewport.layout_to_screen_x(t);
            if scene.grid {
                writeln!(
                    self.out,
                    r#"  <line x1="{sx:.2}" y1="{ay:.2}" x2="{sx:.2}" y2="{:.2}" stroke="{GRID_COLOR}" stroke-opacity="0.3" stroke-dasharray="4,2"/>"#,
                    ay + ah
                )?;
            }
            writeln!(
                self.out,
                r#"  <line x1="{sx:.2}" y1="{:.2}" x2="{sx:.2}" y2="{:.2}" stroke="black"/>"#,
                ay + ah,
                ay + ah + TICK_LENGTH
            )?;
            writeln!(
                self.out,
                r#"  <text x="{sx:.2}" y="{:.2}" font-size="{tick_font:.1}" text-anchor="middle" dominant-baseline="hanging">{}</text>"#,
                ay + ah + TICK_LENGTH + 3.0,
                format_tick(t, x_step)
            )?;
        }
        for &t in &y_ticks {
            let sy = self.viewport.layout_to_screen_y(t);
            if scene.grid {
                writeln!(
                    self.out,
                    r#"  <line x1="{ax:.2}" y1="{sy:.2}" x2="{:.2}" y2="{sy:.2}" stroke="{GRID_COLOR}" stroke-opacity="0.3" stroke-dasharray="4,2"/>"#,
                    ax + aw
                )?;
            }
            writeln!(
                self.out,
                r#"  <line x1="{:.2}" y1="{sy:.2}" x2="{ax:.2}" y2="{sy:.2}" stroke="black"/>"#,
                ax - TICK_LENGTH
            )?;
            writeln!(
                self.out,
                r#"  <text x="{:.2}" y="{sy:.2}" font-size="{tick_font:.1}" text-anchor="end" dominant-baseline="central">{}</text>"#,
                ax - TICK_LENGTH - 3.0,
                format_tick(t, y_step)
            )?;
        }
        Ok(())
    }

    fn shape(&mut self, shape: &Shape) -> fmt::Result {
        let ppt = self.figure.px_per_pt();
        match shape {
            Shape::Polygon {
                points,
                fill,
                stroke,
                ..
            } => {
                let pts: Vec<String> = points
                    .iter()
                    .map(|p| {
                        let (x, y) = self.viewport.layout_to_screen(p);
                        format!("{x:.2},{y:.2}")
                    })
                    .collect();
                let stroke = stroke.map_or_else(|| r#"stroke="none""#.to_string(), |s| stroke_attrs(&s, ppt));
                writeln!(
                    self.out,
                    r#"    <polygon points="{}" {} {} stroke-linejoin="round"/>"#,
                    pts.join(" "),
                    fill_attrs(*fill),
                    stroke
                )
            }
            Shape::Line { from, to, stroke, .. } => {
                let (x1, y1) = self.viewport.layout_to_screen(from);
                let (x2, y2) = self.viewport.layout_to_screen(to);
                writeln!(
                    self.out,
                    r#"    <line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" {}/>"#,
                    stroke_attrs(stroke, ppt)
                )
            }
            Shape::Marker { at, size, color } => {
                let (cx, cy) = self.viewport.layout_to_screen(at);
                writeln!(
                    self.out,
                    r#"    <circle cx="{cx:.2}" cy="{cy:.2}" r="{:.2}" fill="{}" fill-opacity="{:.3}"/>"#,
                    size * ppt / 2.0,
                    color.to_svg(),
                    color.a
                )
            }
            Shape::Circle {
                center,
                radius,
                stroke,
                ..
            } => {
                let (cx, cy) = self.viewport.layout_to_screen(center);
                writeln!(
                    self.out,
                    r#"    <circle cx="{cx:.2}" cy="{cy:.2}" r="{:.2}" fill="none" {}/>"#,
                    radius * self.viewport.zoom,
                    stroke_attrs(stroke, ppt)
                )
            }
            Shape::Text { at, text, style } => self.text(at, text, style),
        }
    }

    fn text(&mut self, at: &Point, text: &str, style: &TextStyle) -> fmt::Result {
        let (sx, sy) = self.viewport.layout_to_screen(at);
        let x = sx + self.pt(style.offset.0);
        let y = sy - self.pt(style.offset.1);
        let size_px = self.pt(style.size);
        let anchor = match style.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let baseline = match style.baseline {
            Baseline::Top => "text-before-edge",
            Baseline::Middle => "central",
            Baseline::Bottom => "text-after-edge",
        };
        let transform = if style.rotation != 0.0 {
            format!(r#" transform="rotate({:.1} {x:.2} {y:.2})""#, -style.rotation)
        } else {
            String::new()
        };

        if let Some(bg) = style.background {
            let pad = self.pt(2.0);
            let w = text_width(text, size_px) + 2.0 * pad;
            let h = size_px * 1.2 + 2.0 * pad;
            let bx = match style.anchor {
                Anchor::Start => x - pad,
                Anchor::Middle => x - w / 2.0,
                Anchor::End => x - w + pad,
            };
            let by = match style.baseline {
                Baseline::Top => y - pad,
                Baseline::Middle => y - h / 2.0,
                Baseline::Bottom => y - h + pad,
            };
            writeln!(
                self.out,
                r#"  <rect x="{bx:.2}" y="{by:.2}" width="{w:.2}" height="{h:.2}" fill="{}" fill-opacity="{:.3}"{transform}/>"#,
                bg.to_svg(),
                bg.a
            )?;
        }

        writeln!(
            self.out,
            r#"  <text x="{x:.2}" y="{y:.2}" font-size="{size_px:.1}" font-weight="{}" fill="{}" fill-opacity="{:.3}" text-anchor="{anchor}" dominant-baseline="{baseline}"{transform}>{}</text>"#,
            if style.bold { "bold" } else { "normal" },
            style.color.to_svg(),
            style.color.a,
            escape(text)
        )
    }

    fn labels(&mut self, scene: &Scene, axes: (f64, f64, f64, f64)) -> fmt::Result {
        let (ax, ay, aw, ah) = axes;
        let label_px = self.pt(12.0);
        if !scene.x_label.is_empty() {
            writeln!(
                self.out,
                r#"  <text x="{:.2}" y="{:.2}" font-size="{label_px:.1}" font-weight="bold" text-anchor="middle">{}</text>"#,
                ax + aw / 2.0,
                ay + ah + TICK_LENGTH + label_px * 2.6,
                escape(&scene.x_label)
            )?;
        }
        if !scene.y_label.is_empty() {
            let x = ax - TICK_LENGTH - label_px * 3.4;
            let y = ay + ah / 2.0;
            writeln!(
                self.out,
                r#"  <text x="{x:.2}" y="{y:.2}" font-size="{label_px:.1}" font-weight="bold" text-anchor="middle" transform="rotate(-90 {x:.2} {y:.2})">{}</text>"#,
                escape(&scene.y_label)
            )?;
        }
        if !scene.title.is_empty() {
            let title_px = self.pt(15.0);
            writeln!(
                self.out,
                r#"  <text x="{:.2}" y="{:.2}" font-size="{title_px:.1}" font-weight="bold" text-anchor="middle">{}</text>"#,
                ax + aw / 2.0,
                ay - title_px * 0.9,
                escape(&scene.title)
            )?;
        }
        if let Some(footer) = &scene.footer {
            writeln!(
                self.out,
                r##"  <text x="{:.2}" y="{:.2}" font-size="{:.1}" fill="#555555" text-anchor="middle">{}</text>"##,
                self.figure.width_px / 2.0,
                self.figure.height_px - 12.0,
                self.pt(9.0),
                escape(footer)
            )?;
        }
        Ok(())
    }

    fn legend(&mut self, legend: &Legend, layout: &LegendLayout, axes: (f64, f64, f64, f64)) -> fmt::Result {
        let (ax, ay, aw, ah) = axes;
        let x = ax + aw + LEGEND_GAP;
        let y = ay + ah / 2.0 - layout.height / 2.0;
        let ppt = self.figure.px_per_pt();
        writeln!(
            self.out,
            r##"  <rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" rx="4" fill="white" fill-opacity="0.8" stroke="#cccccc"/>"##,
            layout.width, layout.height
        )?;
        if !legend.title.is_empty() {
            writeln!(
                self.out,
                r#"  <text x="{:.2}" y="{:.2}" font-size="{:.1}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                x + layout.width / 2.0,
                y + 6.0 + layout.title_height / 2.0,
                layout.font_px,
                escape(&legend.title)
            )?;
        }
        for (i, entry) in legend.entries.iter().enumerate() {
            let row_mid = y + 6.0 + layout.title_height + (i as f64 + 0.5) * layout.row_height;
            let hx = x + 10.0;
            match &entry.handle {
                LegendHandle::Patch { fill, stroke } => {
                    let stroke = stroke.map_or_else(|| r#"stroke="none""#.to_string(), |s| stroke_attrs(&s, ppt));
                    writeln!(
                        self.out,
                        r#"  <rect x="{hx:.2}" y="{:.2}" width="{LEGEND_HANDLE_WIDTH:.2}" height="{:.2}" {} {}/>"#,
                        row_mid - layout.font_px * 0.45,
                        layout.font_px * 0.9,
                        fill_attrs(Some(*fill)),
                        stroke
                    )?;
                }
                LegendHandle::Line(stroke) => {
                    writeln!(
                        self.out,
                        r#"  <line x1="{hx:.2}" y1="{row_mid:.2}" x2="{:.2}" y2="{row_mid:.2}" {}/>"#,
                        hx + LEGEND_HANDLE_WIDTH,
                        stroke_attrs(stroke, ppt)
                    )?;
                }
                LegendHandle::Empty => {}
            }
            writeln!(
                self.out,
                r#"  <text x="{:.2}" y="{row_mid:.2}" font-size="{:.1}" fill="{}" dominant-baseline="central">{}</text>"#,
                hx + LEGEND_HANDLE_WIDTH + 10.0,
                layout.font_px,
                entry.text_color.to_svg(),
                escape(&entry.text)
            )?;
        }
        Ok(())
    }
}

/// Render `scene` into a standalone SVG document of the given size.
pub fn render_svg(scene: &Scene, figure: &FigureSize) -> Result<String, fmt::Error> {
    let legend_layout = scene
        .legend
        .as_ref()
        .filter(|l| !l.entries.is_empty())
        .map(|l| (l, LegendLayout::measure(l, figure)));
    let legend_space = legend_layout
        .as_ref()
        .map_or(0.0, |(_, layout)| layout.width + LEGEND_GAP);

    let region_w = (figure.width_px - MARGIN_LEFT - MARGIN_RIGHT - legend_space).max(1.0);
    let region_h = (figure.height_px - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

    // Fit into the free region, then re-center on the box the bounds occupy.
    let bounds = drawable_bounds(&scene.bounds);
    let mut viewport = Viewport::at(MARGIN_LEFT, MARGIN_TOP, region_w, region_h);
    viewport.fit_bbox(&bounds);
    let axes = viewport.screen_rect(&bounds);
    log::debug!(
        "axes at ({:.1}, {:.1}) size {:.1}x{:.1}, zoom {:.3}",
        axes.0,
        axes.1,
        axes.2,
        axes.3,
        viewport.zoom
    );

    let mut writer = SvgWriter {
        out: String::with_capacity(16 * 1024),
        figure,
        viewport,
    };
    writer.header()?;
    writer.clip_path(axes)?;
    writer.grid_and_ticks(scene, axes)?;

    writeln!(writer.out, r#"  <g clip-path="url(#axes-clip)">"#)?;
    for shape in scene.shapes.iter().filter(|s| !s.is_text()) {
        writer.shape(shape)?;
    }
    writeln!(writer.out, "  </g>")?;

    let (ax, ay, aw, ah) = axes;
    writeln!(
        writer.out,
        r#"  <rect x="{ax:.2}" y="{ay:.2}" width="{aw:.2}" height="{ah:.2}" fill="none" stroke="black"/>"#
    )?;

    for shape in scene.shapes.iter().filter(|s| s.is_text()) {
        writer.shape(shape)?;
    }
    writer.labels(scene, axes)?;
    if let Some((legend, layout)) = &legend_layout {
        writer.legend(legend, layout, axes)?;
    }
    writeln!(writer.out, "</svg>")?;
    Ok(writer.out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LegendEntry;

    fn figure() -> FigureSize {
        FigureSize::new(800.0, 600.0, 100.0)
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
        assert_eq!(escape(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn test_document_structure() {
        let mut scene = Scene::new(BBox::square(0.0, 10.0));
        scene.title = "Step 1: <start>".to_string();
        scene.push(Shape::line(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Stroke::new(Color::RED, 2.0).dashed(),
        ));
        scene.push(Shape::text(Point::new(5.0, 5.0), "A", TextStyle::new(12.0).bold()));
        let mut legend = Legend::new("Properties");
        legend.push(LegendEntry::new(LegendHandle::Empty, "Area: 12.00").text_color(Color::RED));
        scene.legend = Some(legend);

        let svg = render_svg(&scene, &figure()).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Step 1: &lt;start&gt;"));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(">Area: 12.00</text>"));
        assert!(svg.contains(r##"fill="#ff0000" dominant-baseline="central">Area: 12.00"##));
        assert!(svg.contains(">Properties</text>"));
    }

    #[test]
    fn test_shapes_clipped_text_not() {
        let mut scene = Scene::new(BBox::square(0.0, 1.0));
        scene.push(Shape::text(Point::new(0.5, 0.5), "label", TextStyle::new(10.0)));
        scene.push(Shape::Marker {
            at: Point::new(0.5, 0.5),
            size: 8.0,
            color: Color::BLACK,
        });
        let svg = render_svg(&scene, &figure()).unwrap();
        let group_start = svg.find("<g clip-path").unwrap();
        let group_end = svg.find("</g>").unwrap();
        let marker = svg.find("<circle").unwrap();
        let label = svg.find(">label</text>").unwrap();
        assert!(group_start < marker && marker < group_end);
        assert!(label > group_end);
    }

    #[test]
    fn test_degenerate_bounds_still_render() {
        let scene = Scene::new(BBox::square(2.0, 2.0));
        let svg = render_svg(&scene, &figure()).unwrap();
        assert!(svg.contains("axes-clip"));
    }
}
