//! Construction steps for the step visualizer.
//!
//! Each step pairs a human-readable description with the rectangle state
//! known at that point: its sides (zero while still unknown) and the traits
//! derived so far. Traits keep the order they were declared in.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// Name of a geometric trait of a rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TraitKey {
    Perimeter,
    Area,
    Diagonal,
    DiagonalDiagonalAngle,
    SideXDiagonalAngle,
    SideYDiagonalAngle,
    SmallerSide,
    BiggerSide,
    Ratio,
    SideDistances,
    CircumscribedCircleRadius,
    CircumscribedCircleDiameter,
    CircumscribedCircleArea,
    CircumscribedCirclePerimeter,
    CircleRectRatio,
    Other(String),
}

impl TraitKey {
    const KNOWN: [(TraitKey, &'static str, &'static str); 15] = [
        (TraitKey::Perimeter, "Perimeter", "Perimeter"),
        (TraitKey::Area, "Area", "Area"),
        (TraitKey::Diagonal, "Diagonal", "Diagonal"),
        (TraitKey::DiagonalDiagonalAngle, "DiagonalDiagonalAngle", "Diagonal Angle"),
        (TraitKey::SideXDiagonalAngle, "SideXDiagonalAngle", "Side-X Angle"),
        (TraitKey::SideYDiagonalAngle, "SideYDiagonalAngle", "Side-Y Angle"),
        (TraitKey::SmallerSide, "SmallerSide", "Smaller Side"),
        (TraitKey::BiggerSide, "BiggerSide", "Bigger Side"),
        (TraitKey::Ratio, "Ratio", "Ratio"),
        (TraitKey::SideDistances, "SideDistances", "Side Distances"),
        (TraitKey::CircumscribedCircleRadius, "CircumscribedCircleRadius", "Circle Radius"),
        (TraitKey::CircumscribedCircleDiameter, "CircumscribedCircleDiameter", "Circle Diameter"),
        (TraitKey::CircumscribedCircleArea, "CircumscribedCircleArea", "Circle Area"),
        (TraitKey::CircumscribedCirclePerimeter, "CircumscribedCirclePerimeter", "Circle Perimeter"),
        (TraitKey::CircleRectRatio, "CircleRectRatio", "Circle-Rectangle Ratio"),
    ];

    /// Key as it appears in the JSON input.
    pub fn as_str(&self) -> &str {
        match self {
            TraitKey::Other(raw) => raw,
            known => Self::KNOWN
                .iter()
                .find(|(k, _, _)| k == known)
                .map_or("", |(_, raw, _)| *raw),
        }
    }

    /// Name shown in the legend. Unknown keys are shown verbatim.
    pub fn display_name(&self) -> &str {
        match self {
            TraitKey::Other(raw) => raw,
            known => Self::KNOWN
                .iter()
                .find(|(k, _, _)| k == known)
                .map_or("", |(_, _, display)| *display),
        }
    }
}

impl From<String> for TraitKey {
    fn from(raw: String) -> Self {
        Self::KNOWN
            .iter()
            .find(|(_, name, _)| *name == raw)
            .map(|(k, _, _)| k.clone())
            .unwrap_or(TraitKey::Other(raw))
    }
}

impl From<&str> for TraitKey {
    fn from(raw: &str) -> Self {
        TraitKey::from(raw.to_string())
    }
}

impl From<TraitKey> for String {
    fn from(key: TraitKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for TraitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trait value: one scalar or a pair of scalars (e.g. the distances from
/// the center to the two sides).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTraitValue")]
pub enum TraitValue {
    Single(f64),
    Pair(f64, f64),
}

/// Every shape a trait value takes on the wire: a bare number, a bare
/// two-element array, or the tagged `{"Single": n}` / `{"Pair": [a, b]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTraitValue {
    Number(f64),
    Bare(f64, f64),
    Tagged(TaggedTraitValue),
}

#[derive(Deserialize)]
enum TaggedTraitValue {
    Single(f64),
    Pair(f64, f64),
}

impl From<RawTraitValue> for TraitValue {
    fn from(raw: RawTraitValue) -> Self {
        match raw {
            RawTraitValue::Number(n) | RawTraitValue::Tagged(TaggedTraitValue::Single(n)) => {
                TraitValue::Single(n)
            }
            RawTraitValue::Bare(a, b) | RawTraitValue::Tagged(TaggedTraitValue::Pair(a, b)) => {
                TraitValue::Pair(a, b)
            }
        }
    }
}

impl TraitValue {
    pub fn as_single(&self) -> Option<f64> {
        match self {
            TraitValue::Single(v) => Some(*v),
            TraitValue::Pair(..) => None,
        }
    }

    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            TraitValue::Pair(a, b) => Some((*a, *b)),
            TraitValue::Single(_) => None,
        }
    }
}

impl fmt::Display for TraitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitValue::Single(v) => write!(f, "{v:.2}"),
            TraitValue::Pair(a, b) => write!(f, "({a:.2}, {b:.2})"),
        }
    }
}

/// Traits of one rectangle state, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traits {
    entries: Vec<(TraitKey, TraitValue)>,
}

impl Traits {
    /// Insert or replace a trait. A replaced trait keeps its position.
    pub fn insert(&mut self, key: TraitKey, value: TraitValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &TraitKey) -> Option<&TraitValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &TraitKey) -> bool {
        self.get(key).is_some()
    }

    /// Scalar value of a trait, `None` if absent or a pair.
    pub fn single(&self, key: &TraitKey) -> Option<f64> {
        self.get(key).and_then(TraitValue::as_single)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TraitKey, &TraitValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &TraitKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Legend line for one trait, e.g. `Circle Radius: 2.50`.
    pub fn legend_line(key: &TraitKey, value: &TraitValue) -> String {
        format!("{}: {}", key.display_name(), value)
    }
}

impl Serialize for Traits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k.as_str(), v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Traits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TraitsVisitor;

        impl<'de> Visitor<'de> for TraitsVisitor {
            type Value = Traits;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from trait name to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Traits, A::Error> {
                let mut traits = Traits::default();
                while let Some((key, value)) = access.next_entry::<String, TraitValue>()? {
                    traits.insert(TraitKey::from(key), value);
                }
                Ok(traits)
            }
        }

        deserializer.deserialize_map(TraitsVisitor)
    }
}

/// Rectangle state at one step. A zero side means "not known yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectState {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub traits: Traits,
}

impl RectState {
    pub fn has_dimensions(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }
}

/// One `[description, state]` entry of a construction sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, RectState)", into = "(String, RectState)")]
pub struct Step {
    pub description: String,
    pub state: RectState,
}

impl From<(String, RectState)> for Step {
    fn from((description, state): (String, RectState)) -> Self {
        Self { description, state }
    }
}

impl From<Step> for (String, RectState) {
    fn from(step: Step) -> Self {
        (step.description, step.state)
    }
}

/// A non-empty, ordered list of construction steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Step>", into = "Vec<Step>")]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    pub fn new(steps: Vec<Step>) -> Result<Self, ModelError> {
        if steps.is_empty() {
            return Err(ModelError::NoSteps);
        }
        log::debug!("loaded {} construction steps", steps.len());
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Width and height of the final step. They stand in for sides that are
    /// still zero in earlier steps.
    pub fn reference_dimensions(&self) -> (f64, f64) {
        self.steps
            .last()
            .map_or((0.0, 0.0), |s| (s.state.width, s.state.height))
    }

    /// Sides to draw at `index`, with zero sides replaced by the reference
    /// dimensions.
    pub fn effective_dimensions(&self, index: usize) -> Option<(f64, f64)> {
        let state = &self.steps.get(index)?.state;
        let (ref_w, ref_h) = self.reference_dimensions();
        let width = if state.width != 0.0 { state.width } else { ref_w };
        let height = if state.height != 0.0 { state.height } else { ref_h };
        Some((width, height))
    }

    /// Trait keys present at `index` but not at `index - 1`. Always empty
    /// for the first step.
    pub fn new_traits(&self, index: usize) -> HashSet<TraitKey> {
        let (Some(prev_index), Some(current)) = (index.checked_sub(1), self.steps.get(index))
        else {
            return HashSet::new();
        };
        let previous: HashSet<&TraitKey> = self
            .steps
            .get(prev_index)
            .map(|s| s.state.traits.keys().collect())
            .unwrap_or_default();
        current
            .state
            .traits
            .keys()
            .filter(|k| !previous.contains(k))
            .cloned()
            .collect()
    }
}

impl TryFrom<Vec<Step>> for StepSequence {
    type Error = ModelError;

    fn try_from(steps: Vec<Step>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<StepSequence> for Vec<Step> {
    fn from(seq: StepSequence) -> Self {
        seq.steps
    }
}
