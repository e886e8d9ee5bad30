use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::geometry::{BBox, Point, Polygon};

pub const INTERSECTION_FLAG: &str = "IsIntersection";
pub const DIAGONAL_PROPERTY: &str = "Diagonal";

/// A polygon vertex with its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl NamedPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Value side of a single-key property object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Flag(bool),
    Number(f64),
}

impl PropertyValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            PropertyValue::Flag(true) => 1.0,
            PropertyValue::Flag(false) => 0.0,
            PropertyValue::Number(n) => *n,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Flag(b) => *b,
            PropertyValue::Number(n) => *n != 0.0,
        }
    }
}

/// A named property such as `{"Area": 12.0}` or `{"IsIntersection": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, PropertyValue>",
    into = "BTreeMap<String, PropertyValue>"
)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: &str, value: PropertyValue) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }

    /// `Name: value` with the value rounded to two decimals and printed in
    /// its shortest form, e.g. `Area: 12.35` or `Perimeter: 14.0`.
    ///
    /// Exact ties round to even, matching the `{:.2}` used for step traits.
    pub fn legend_fragment(&self) -> String {
        let value = self.value.as_f64();
        let rounded = format!("{value:.2}").parse::<f64>().unwrap_or(value);
        format!("{}: {:?}", self.name, rounded)
    }
}

impl TryFrom<BTreeMap<String, PropertyValue>> for Property {
    type Error = ModelError;

    fn try_from(map: BTreeMap<String, PropertyValue>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(ModelError::NotSingleKey(map.len()));
        }
        let (name, value) = map
            .into_iter()
            .next()
            .ok_or(ModelError::NotSingleKey(0))?;
        Ok(Self { name, value })
    }
}

impl From<Property> for BTreeMap<String, PropertyValue> {
    fn from(p: Property) -> Self {
        BTreeMap::from([(p.name, p.value)])
    }
}

/// One rectangle (or intersection polygon) of the static figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleRecord {
    pub name: String,
    pub points: Vec<NamedPoint>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl RectangleRecord {
    pub fn polygon(&self) -> Polygon {
        Polygon::new(self.points.iter().map(NamedPoint::point).collect())
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Whether this record marks the overlap of other rectangles.
    pub fn is_intersection(&self) -> bool {
        self.properties
            .iter()
            .any(|p| p.name == INTERSECTION_FLAG && p.value.is_truthy())
    }

    /// Endpoints of the drawn diagonal: the first and third declared points.
    /// Only present when the record carries a non-zero `Diagonal`.
    pub fn diagonal_segment(&self) -> Option<(Point, Point)> {
        let has_diagonal = self
            .property(DIAGONAL_PROPERTY)
            .is_some_and(PropertyValue::is_truthy);
        if !has_diagonal {
            return None;
        }
        match (self.points.first(), self.points.get(2)) {
            (Some(a), Some(c)) => Some((a.point(), c.point())),
            _ => None,
        }
    }

    /// Legend line for this record, `None` when it has no properties.
    pub fn legend_text(&self) -> Option<String> {
        if self.properties.is_empty() {
            return None;
        }
        let props: Vec<String> = self
            .properties
            .iter()
            .map(Property::legend_fragment)
            .collect();
        Some(format!("{} - {}", self.name, props.join(", ")))
    }
}

/// The validated input of the static renderer: at least one record, each
/// with at least three points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RectangleRecord>", into = "Vec<RectangleRecord>")]
pub struct RectangleSet {
    records: Vec<RectangleRecord>,
}

impl RectangleSet {
    pub fn new(records: Vec<RectangleRecord>) -> Result<Self, ModelError> {
        if records.is_empty() {
            return Err(ModelError::NoRectangles);
        }
        if let Some(bad) = records.iter().find(|r| r.points.len() < 3) {
            return Err(ModelError::TooFewPoints {
                name: bad.name.clone(),
                count: bad.points.len(),
            });
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[RectangleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Common view for every record: the bounding box of all points padded
    /// by 10% of its larger span.
    pub fn view_bounds(&self) -> Option<BBox> {
        let bounds = self
            .records
            .iter()
            .filter_map(|r| r.polygon().bbox())
            .reduce(|acc, b| acc.union(&b))?;
        if bounds.width() == 0.0 && bounds.height() == 0.0 {
            log::warn!("all points coincide, view has zero span");
        }
        Some(bounds.padded(0.1))
    }
}

impl TryFrom<Vec<RectangleRecord>> for RectangleSet {
    type Error = ModelError;

    fn try_from(records: Vec<RectangleRecord>) -> Result<Self, Self::Error> {
        Self::new(records)
    }
}

impl From<RectangleSet> for Vec<RectangleRecord> {
    fn from(set: RectangleSet) -> Self {
        set.records
    }
}
