//! Figure for one step of a rectangle construction sequence.
//!
//! Everything is derived from the step's sides and traits plus the trait
//! keys of the previous step, so redrawing any step from scratch yields the
//! same picture.

use std::collections::HashSet;

use rectviz_core::{
    diagonal_length, rectangle_tint, BBox, CircleSpec, Color, Point, StepSequence, TraitKey, Traits,
};

use crate::scene::{Anchor, Baseline, Legend, LegendEntry, LegendHandle, Scene, Shape, Stroke, TextStyle};

pub const LEGEND_TITLE: &str = "Properties";

const SIDE_ALPHA: f64 = 0.6;
const SIDE_WIDTH: f64 = 2.0;
const CORNER_MARKER_SIZE: f64 = 8.0;

/// Everything needed to draw one step.
#[derive(Debug, Clone)]
pub struct StepFrame<'a> {
    pub index: usize,
    pub description: &'a str,
    /// Sides to draw, with unset sides replaced by the final step's.
    pub width: f64,
    pub height: f64,
    /// Both declared sides are non-zero, so their lengths are annotated.
    pub show_dimensions: bool,
    pub traits: &'a Traits,
    pub new_traits: &'a HashSet<TraitKey>,
}

impl<'a> StepFrame<'a> {
    pub fn new(sequence: &'a StepSequence, index: usize, new_traits: &'a HashSet<TraitKey>) -> Option<Self> {
        let step = sequence.get(index)?;
        let (width, height) = sequence.effective_dimensions(index)?;
        Some(Self {
            index,
            description: &step.description,
            width,
            height,
            show_dimensions: step.state.has_dimensions(),
            traits: &step.state.traits,
            new_traits,
        })
    }

    fn has(&self, key: &TraitKey) -> bool {
        self.traits.contains(key)
    }

    /// Circumscribed circle from whichever of radius/diameter is known.
    pub fn circle(&self) -> Option<CircleSpec> {
        CircleSpec::resolve(
            self.traits.single(&TraitKey::CircumscribedCircleRadius),
            self.traits.single(&TraitKey::CircumscribedCircleDiameter),
        )
    }

    /// Upper axis limit before the lower margin is applied: the larger side,
    /// or the circle's diameter when that is larger, plus 30%.
    pub fn plot_extent(&self) -> f64 {
        let mut extent = self.width.max(self.height);
        if let Some(circle) = self.circle() {
            extent = extent.max(circle.radius * 2.0);
        }
        extent * 1.3
    }

    /// Both axes run from -30% to 120% of the plot extent.
    pub fn bounds(&self) -> BBox {
        let extent = self.plot_extent();
        BBox::square(-extent * 0.3, extent * 1.2)
    }
}

/// Which color each side of the rectangle is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideColors {
    pub bottom: Color,
    pub right: Color,
    pub top: Color,
    pub left: Color,
}

/// Bigger sides go red and smaller sides green when those traits are known.
/// Everything else stays blue. `None` means a plain outline.
pub fn side_colors(width: f64, height: f64, traits: &Traits) -> Option<SideColors> {
    let bigger = traits.contains(&TraitKey::BiggerSide);
    let smaller = traits.contains(&TraitKey::SmallerSide);
    if !bigger && !smaller {
        return None;
    }
    let width_is_bigger = width >= height;
    let horizontal = if bigger && width_is_bigger {
        Color::RED
    } else if smaller && !width_is_bigger {
        Color::GREEN
    } else {
        Color::BLUE
    };
    let vertical = if bigger && !width_is_bigger {
        Color::RED
    } else if smaller && width_is_bigger {
        Color::GREEN
    } else {
        Color::BLUE
    };
    Some(SideColors {
        bottom: horizontal,
        right: vertical,
        top: horizontal,
        left: vertical,
    })
}

fn base_rectangle(scene: &mut Scene, frame: &StepFrame<'_>) {
    let (w, h) = (frame.width, frame.height);
    scene.push(Shape::Polygon {
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ],
        fill: Some(rectangle_tint(frame.traits).with_alpha(0.5)),
        stroke: None,
        label: Some("Rectangle".to_string()),
    });
}

fn sides(scene: &mut Scene, frame: &StepFrame<'_>) {
    let (w, h) = (frame.width, frame.height);
    let a = Point::new(0.0, 0.0);
    let b = Point::new(w, 0.0);
    let c = Point::new(w, h);
    let d = Point::new(0.0, h);
    let side = |color: Color| Stroke::new(color, SIDE_WIDTH).with_alpha(SIDE_ALPHA);

    match side_colors(w, h, frame.traits) {
        Some(colors) => {
            scene.push(Shape::line(a, b, side(colors.bottom)));
            scene.push(Shape::line(b, c, side(colors.right)));
            scene.push(Shape::line(d, c, side(colors.top)));
            scene.push(Shape::line(a, d, side(colors.left)));
        }
        None => scene.push(Shape::Polygon {
            points: vec![a, b, c, d],
            fill: None,
            stroke: Some(side(Color::BLUE)),
            label: None,
        }),
    }
}

fn corners(scene: &mut Scene, frame: &StepFrame<'_>) {
    let (w, h) = (frame.width, frame.height);
    let corners = [
        ("A", Point::new(0.0, 0.0)),
        ("B", Point::new(w, 0.0)),
        ("C", Point::new(w, h)),
        ("D", Point::new(0.0, h)),
    ];
    for (label, at) in corners {
        scene.push(Shape::Marker {
            at,
            size: CORNER_MARKER_SIZE,
            color: Color::BLACK,
        });
        scene.push(Shape::text(
            at,
            label,
            TextStyle::new(12.0).bold().offset(5.0, 5.0),
        ));
    }
}

fn side_dimensions(scene: &mut Scene, frame: &StepFrame<'_>) {
    let (w, h) = (frame.width, frame.height);
    scene.push(Shape::text(
        Point::new(w / 2.0, -h * 0.015),
        format!("{w:.2}"),
        TextStyle::new(10.0)
            .align(Anchor::Middle, Baseline::Top)
            .offset(0.0, -10.0),
    ));
    scene.push(Shape::text(
        Point::new(-w * 0.015, h / 2.0),
        format!("{h:.2}"),
        TextStyle::new(10.0)
            .align(Anchor::End, Baseline::Middle)
            .offset(-10.0, 0.0)
            .rotated(90.0),
    ));
}

fn side_distances(scene: &mut Scene, frame: &StepFrame<'_>) {
    let Some(value) = frame.traits.get(&TraitKey::SideDistances) else {
        return;
    };
    let center = Point::new(frame.width / 2.0, frame.height / 2.0);
    let guide = Stroke::new(Color::BLACK, 1.5).dashed().with_alpha(0.7);
    scene.push(Shape::labeled_line(
        center,
        Point::new(0.0, center.y),
        guide,
        "Side Distance X",
    ));
    scene.push(Shape::labeled_line(
        center,
        Point::new(center.x, 0.0),
        guide,
        "Side Distance Y",
    ));

    if let Some((dx, dy)) = value.as_pair() {
        scene.push(Shape::text(
            Point::new(center.x / 2.0, center.y),
            format!("{dx:.2}"),
            TextStyle::new(10.0).align(Anchor::Middle, Baseline::Bottom),
        ));
        scene.push(Shape::text(
            Point::new(center.x, center.y / 2.0),
            format!("{dy:.2}"),
            TextStyle::new(10.0).align(Anchor::Start, Baseline::Middle),
        ));
    }
}

fn diagonals(scene: &mut Scene, frame: &StepFrame<'_>) {
    let (w, h) = (frame.width, frame.height);
    let known = frame.has(&TraitKey::Diagonal);
    let alpha = if known { 0.7 } else { 0.25 };
    let stroke = Stroke::new(Color::RED, 2.0).dashed().with_alpha(alpha);
    let ac = (Point::new(0.0, 0.0), Point::new(w, h));
    let bd = (Point::new(w, 0.0), Point::new(0.0, h));

    if !known {
        scene.push(Shape::line(ac.0, ac.1, stroke));
        scene.push(Shape::line(bd.0, bd.1, stroke));
        return;
    }
    scene.push(Shape::labeled_line(ac.0, ac.1, stroke, "Diagonal AC"));
    scene.push(Shape::labeled_line(bd.0, bd.1, stroke, "Diagonal BD"));
    scene.push(Shape::text(
        Point::new(w / 2.0, h / 3.5),
        format!("{:.2}", diagonal_length(w, h)),
        TextStyle::new(10.0)
            .color(Color::RED)
            .align(Anchor::Middle, Baseline::Bottom),
    ));
}

fn circumscribed_circle(scene: &mut Scene, frame: &StepFrame<'_>, circle: CircleSpec) {
    let center = Point::new(frame.width / 2.0, frame.height / 2.0);
    let r = circle.radius;
    let guide = Stroke::new(Color::GREEN, 1.5).dotted();
    let note = TextStyle::new(10.0)
        .color(Color::GREEN)
        .align(Anchor::End, Baseline::Middle)
        .rotated(90.0);

    scene.push(Shape::Circle {
        center,
        radius: r,
        stroke: Stroke::new(Color::GREEN, 2.0).dashed().with_alpha(0.7),
        label: Some("Circumscribed Circle".to_string()),
    });
    scene.push(Shape::line(center, center.translate(0.0, r), guide));
    scene.push(Shape::text(
        Point::new(center.x - r * 0.1, center.y + r / 1.75),
        format!("R={r:.2}"),
        note.clone(),
    ));

    if frame.has(&TraitKey::Diagonal) {
        scene.push(Shape::line(
            center.translate(0.0, -r),
            center.translate(0.0, r),
            guide,
        ));
        scene.push(Shape::text(
            Point::new(center.x - r * 0.1, center.y - r / 1.75),
            format!("D={:.2}", circle.diameter),
            note,
        ));
    }
}

fn legend(scene: &Scene, frame: &StepFrame<'_>) -> Legend {
    let mut legend = Legend::new(LEGEND_TITLE);
    legend.entries = scene.labeled_entries();
    for (key, value) in frame.traits.iter() {
        let color = if frame.new_traits.contains(key) {
            Color::RED
        } else {
            Color::BLACK
        };
        legend.push(
            LegendEntry::new(LegendHandle::Empty, &Traits::legend_line(key, value)).text_color(color),
        );
    }
    legend
}

/// Figure for step `index`, or `None` past the end of the sequence.
pub fn build_scene(sequence: &StepSequence, index: usize) -> Option<Scene> {
    let new_traits = sequence.new_traits(index);
    let frame = StepFrame::new(sequence, index, &new_traits)?;
    Some(draw_frame(&frame))
}

/// Build the figure for one prepared step.
pub fn draw_frame(frame: &StepFrame<'_>) -> Scene {
    let mut scene = Scene::new(frame.bounds());
    scene.title = format!("Step {}: {}", frame.index + 1, frame.description);
    scene.x_label = "Width".to_string();
    scene.y_label = "Height".to_string();

    base_rectangle(&mut scene, frame);
    sides(&mut scene, frame);
    corners(&mut scene, frame);
    if frame.show_dimensions {
        side_dimensions(&mut scene, frame);
    }
    side_distances(&mut scene, frame);
    diagonals(&mut scene, frame);
    if let Some(circle) = frame.circle() {
        circumscribed_circle(&mut scene, frame, circle);
    }

    scene.legend = Some(legend(&scene, frame));
    log::debug!(
        "step {} drawn with {} shapes, {} new traits",
        frame.index + 1,
        scene.shapes.len(),
        frame.new_traits.len()
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LineDash;
    use rectviz_core::TraitValue;

    const STEPS: &str = r#"[
        ["Given the perimeter and ratio", {"width": 0, "height": 0,
            "traits": {"Perimeter": 28.0, "Ratio": {"Pair": [3, 4]}}}],
        ["Find the sides", {"width": 6, "height": 8,
            "traits": {"Perimeter": 28.0, "Ratio": {"Pair": [3, 4]},
                       "SmallerSide": 6.0, "BiggerSide": 8.0}}],
        ["Find the diagonal", {"width": 6, "height": 8,
            "traits": {"Perimeter": 28.0, "Diagonal": 10.0,
                       "SideDistances": {"Pair": [3.0, 4.0]}}}],
        ["Circumscribed circle", {"width": 6, "height": 8,
            "traits": {"Diagonal": 10.0, "CircumscribedCircleRadius": {"Single": 5.0}}}]
    ]"#;

    fn sequence() -> StepSequence {
        serde_json::from_str(STEPS).unwrap()
    }

    fn scene_for(seq: &StepSequence, index: usize) -> Scene {
        build_scene(seq, index).unwrap()
    }

    fn legend_texts(scene: &Scene) -> Vec<(String, Color)> {
        scene
            .legend
            .as_ref()
            .unwrap()
            .entries
            .iter()
            .map(|e| (e.text.clone(), e.text_color))
            .collect()
    }

    #[test]
    fn test_unset_sides_use_final_dimensions_without_annotations() {
        let seq = sequence();
        let new_traits = seq.new_traits(0);
        let frame = StepFrame::new(&seq, 0, &new_traits).unwrap();
        assert_eq!((frame.width, frame.height), (6.0, 8.0));
        assert!(!frame.show_dimensions);

        let first = scene_for(&seq, 0);
        assert!(!first.texts().any(|t| t == "6.00" || t == "8.00"));

        let second = scene_for(&seq, 1);
        let texts: Vec<&str> = second.texts().collect();
        assert!(texts.contains(&"6.00") && texts.contains(&"8.00"));
    }

    #[test]
    fn test_one_zero_side_suppresses_both_annotations() {
        let seq: StepSequence = serde_json::from_str(
            r#"[
            ["Width known", {"width": 5, "height": 0, "traits": {"Perimeter": 26.0}}],
            ["Both", {"width": 5, "height": 8, "traits": {"Perimeter": 26.0}}]
        ]"#,
        )
        .unwrap();
        let new_traits = seq.new_traits(0);
        let frame = StepFrame::new(&seq, 0, &new_traits).unwrap();
        assert_eq!((frame.width, frame.height), (5.0, 8.0));

        let first = scene_for(&seq, 0);
        assert!(!first.texts().any(|t| t == "5.00" || t == "8.00"));
        assert!(first.texts().any(|t| t == "C"));

        let second = scene_for(&seq, 1);
        let texts: Vec<&str> = second.texts().collect();
        assert!(texts.contains(&"5.00") && texts.contains(&"8.00"));
    }

    #[test]
    fn test_corner_labels_clockwise_from_origin() {
        let scene = scene_for(&sequence(), 1);
        let corners: Vec<(&str, Point)> = scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text { at, text, .. } if text.len() == 1 => Some((text.as_str(), *at)),
                _ => None,
            })
            .collect();
        assert_eq!(
            corners,
            vec![
                ("A", Point::new(0.0, 0.0)),
                ("B", Point::new(6.0, 0.0)),
                ("C", Point::new(6.0, 8.0)),
                ("D", Point::new(0.0, 8.0)),
            ]
        );
    }

    #[test]
    fn test_side_colors() {
        let mut traits = Traits::default();
        assert_eq!(side_colors(6.0, 8.0, &traits), None);

        traits.insert(TraitKey::BiggerSide, TraitValue::Single(8.0));
        let tall = side_colors(6.0, 8.0, &traits).unwrap();
        assert_eq!((tall.bottom, tall.left), (Color::BLUE, Color::RED));

        traits.insert(TraitKey::SmallerSide, TraitValue::Single(6.0));
        let tall = side_colors(6.0, 8.0, &traits).unwrap();
        assert_eq!((tall.bottom, tall.top, tall.left, tall.right), (Color::GREEN, Color::GREEN, Color::RED, Color::RED));

        let wide = side_colors(8.0, 6.0, &traits).unwrap();
        assert_eq!((wide.bottom, wide.left), (Color::RED, Color::GREEN));
    }

    #[test]
    fn test_new_traits_highlighted_in_legend() {
        let seq = sequence();
        let first = legend_texts(&scene_for(&seq, 0));
        assert!(first.iter().all(|(_, c)| *c == Color::BLACK));

        let third = legend_texts(&scene_for(&seq, 2));
        let color_of = |needle: &str| {
            third
                .iter()
                .find(|(t, _)| t.starts_with(needle))
                .map(|(_, c)| *c)
                .unwrap()
        };
        assert_eq!(color_of("Perimeter: 28.00"), Color::BLACK);
        assert_eq!(color_of("Diagonal: 10.00"), Color::RED);
        assert_eq!(color_of("Side Distances: (3.00, 4.00)"), Color::RED);
    }

    #[test]
    fn test_auto_labels_precede_traits() {
        let scene = scene_for(&sequence(), 2);
        let texts: Vec<String> = legend_texts(&scene).into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            texts,
            vec![
                "Rectangle",
                "Side Distance X",
                "Side Distance Y",
                "Diagonal AC",
                "Diagonal BD",
                "Perimeter: 28.00",
                "Diagonal: 10.00",
                "Side Distances: (3.00, 4.00)",
            ]
        );
    }

    #[test]
    fn test_diagonals_always_drawn_but_annotated_only_when_known() {
        let seq = sequence();
        let count_red_lines = |scene: &Scene| {
            scene
                .shapes
                .iter()
                .filter(|s| {
                    matches!(s, Shape::Line { stroke, .. }
                        if stroke.color == Color::RED && stroke.dash == LineDash::Dashed)
                })
                .count()
        };
        // step 2 also draws its longer sides red, but solid
        let without = scene_for(&seq, 1);
        assert_eq!(count_red_lines(&without), 2);
        assert!(!without.texts().any(|t| t == "10.00"));

        let with = scene_for(&seq, 2);
        assert_eq!(count_red_lines(&with), 2);
        assert!(with.texts().any(|t| t == "10.00"));
    }

    #[test]
    fn test_circle_and_bounds() {
        let seq = sequence();
        let scene = scene_for(&seq, 3);
        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"R=5.00"));
        assert!(texts.contains(&"D=10.00"));
        assert!(scene
            .shapes
            .iter()
            .any(|s| matches!(s, Shape::Circle { radius, .. } if *radius == 5.0)));

        // max(6, 8, 2 * 5) = 10, plus 30% = 13
        let extent = 13.0;
        assert!((scene.bounds.min.x - (-extent * 0.3)).abs() < 1e-9);
        assert!((scene.bounds.max.y - extent * 1.2).abs() < 1e-9);
        assert_eq!(scene.title, "Step 4: Circumscribed circle");
    }

    #[test]
    fn test_out_of_range_step() {
        assert!(build_scene(&sequence(), 4).is_none());
    }

    #[test]
    fn test_diameter_line_needs_diagonal() {
        let json = r#"[["Radius only", {"width": 6, "height": 8,
            "traits": {"CircumscribedCircleDiameter": 10.0}}]]"#;
        let seq: StepSequence = serde_json::from_str(json).unwrap();
        let scene = scene_for(&seq, 0);
        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"R=5.00"));
        assert!(!texts.iter().any(|t| t.starts_with("D=")));
    }
}
