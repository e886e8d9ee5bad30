use std::collections::HashSet;

use rectviz_core::{BBox, Step, StepSequence, TraitKey};

use crate::scene::Scene;
use crate::step_plot::{self, StepFrame};

/// Navigation state over a construction sequence.
///
/// The current index always stays within the sequence, so moving past
/// either end is a no-op.
#[derive(Debug, Clone)]
pub struct StepVisualizer {
    sequence: StepSequence,
    current: usize,
    new_traits: HashSet<TraitKey>,
}

impl StepVisualizer {
    pub fn new(sequence: StepSequence) -> Self {
        let new_traits = sequence.new_traits(0);
        Self {
            sequence,
            current: 0,
            new_traits,
        }
    }

    /// Zero-based index of the step on screen.
    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn step(&self) -> Option<&Step> {
        self.sequence.get(self.current)
    }

    pub fn description(&self) -> &str {
        self.step().map_or("", |s| s.description.as_str())
    }

    /// Trait keys that first appear in the current step.
    pub fn new_traits(&self) -> &HashSet<TraitKey> {
        &self.new_traits
    }

    pub fn next_step(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn previous_step(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Jump to `index`. Returns `false` and stays put if it is out of range
    /// or already current.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.sequence.len() || index == self.current {
            return false;
        }
        self.current = index;
        self.new_traits = self.sequence.new_traits(index);
        log::debug!(
            "moved to step {} of {}, {} new traits",
            index + 1,
            self.sequence.len(),
            self.new_traits.len()
        );
        true
    }

    /// Figure for the current step, with the key help as footer.
    pub fn scene(&self) -> Scene {
        let mut scene = match StepFrame::new(&self.sequence, self.current, &self.new_traits) {
            Some(frame) => step_plot::draw_frame(&frame),
            None => Scene::new(BBox::square(0.0, 1.0)),
        };
        scene.footer = Some(format!(
            "Step {} of {} \u{b7} n: next, p: previous, q: quit",
            self.current + 1,
            self.sequence.len()
        ));
        scene
    }
}
