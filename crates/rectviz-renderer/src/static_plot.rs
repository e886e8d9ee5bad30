//! Figure for a set of rectangle records: every polygon in its own color,
//! named corners, a centroid name tag and a legend of computed properties.

use rectviz_core::{generate_distinct_colors, BBox, Color, RectangleSet};

use crate::scene::{Anchor, Baseline, Legend, LegendEntry, LegendHandle, Scene, Shape, Stroke, TextStyle};

pub const TITLE: &str = "Rectangles";
pub const LEGEND_TITLE: &str = "Rectangle Properties";

const EDGE_WIDTH: f64 = 2.0;
const FILL_ALPHA: f64 = 0.3;
const INTERSECTION_ALPHA: f64 = 0.8;
const VERTEX_MARKER_SIZE: f64 = 8.0;

pub fn build_scene(set: &RectangleSet) -> Scene {
    let bounds = set
        .view_bounds()
        .unwrap_or_else(|| BBox::square(-1.0, 1.0));
    let mut scene = Scene::new(bounds);
    scene.title = TITLE.to_string();
    scene.x_label = "X".to_string();
    scene.y_label = "Y".to_string();

    let colors = generate_distinct_colors(set.len());
    let mut legend = Legend::new(LEGEND_TITLE);
    let label_box = Color::WHITE.with_alpha(0.7);

    for (record, distinct) in set.records().iter().zip(&colors) {
        let color = distinct.color;
        let polygon = record.polygon();
        log::debug!(
            "rectangle '{}': {} vertices, hue {:.3}",
            record.name,
            polygon.vertex_count(),
            distinct.hue
        );

        let shape = if record.is_intersection() {
            Shape::Polygon {
                points: polygon.vertices.clone(),
                fill: None,
                stroke: Some(Stroke::new(color, EDGE_WIDTH).dashed().with_alpha(INTERSECTION_ALPHA)),
                label: None,
            }
        } else {
            Shape::Polygon {
                points: polygon.vertices.clone(),
                fill: Some(color.with_alpha(FILL_ALPHA)),
                stroke: Some(Stroke::new(color, EDGE_WIDTH).with_alpha(FILL_ALPHA)),
                label: None,
            }
        };
        scene.push(shape);

        for vertex in &record.points {
            let at = vertex.point();
            scene.push(Shape::Marker {
                at,
                size: VERTEX_MARKER_SIZE,
                color,
            });
            scene.push(Shape::text(
                at,
                vertex.name.clone(),
                TextStyle::new(11.0)
                    .bold()
                    .align(Anchor::Middle, Baseline::Bottom)
                    .boxed(label_box),
            ));
        }

        if let Some(center) = polygon.centroid() {
            scene.push(Shape::text(
                center,
                record.name.clone(),
                TextStyle::new(14.0)
                    .bold()
                    .align(Anchor::Middle, Baseline::Middle)
                    .boxed(label_box),
            ));
        }

        if let Some((from, to)) = record.diagonal_segment() {
            scene.push(Shape::line(from, to, Stroke::new(color, EDGE_WIDTH).dashed()));
        }

        if let Some(text) = record.legend_text() {
            legend.push(LegendEntry::new(
                LegendHandle::Patch {
                    fill: color.with_alpha(0.5),
                    stroke: None,
                },
                &text,
            ));
        }
    }

    scene.legend = Some(legend);
    scene
}
