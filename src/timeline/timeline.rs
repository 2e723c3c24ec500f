use serde::{Deserialize, Serialize};

use crate::timeline::step::{Position, Step, TweenSpec};

/// Playback state of one timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineState {
    #[default]
    NotStarted,
    Running,
    Complete,
}

/// Start and end of a step, relative to the start of its timeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Slot {
    pub start: f64,
    pub end: f64,
}

/// An ordered sequence of steps played on one local clock.
///
/// Steps are declared up front; their start times are derived from declaration order
/// and [`Position`] markers when the timeline starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub name: String,
    /// Starts when the session is constructed; otherwise waits for a trigger.
    #[serde(default = "default_autostart")]
    pub autostart: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_autostart() -> bool {
    true
}

impl Timeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            autostart: true,
            steps: Vec::new(),
        }
    }

    /// Wait for a trigger instead of starting with the session.
    pub fn triggered(mut self) -> Self {
        self.autostart = false;
        self
    }

    /// Append a step after everything already declared.
    pub fn to(self, name: impl Into<String>, tween: TweenSpec) -> Self {
        self.push(name, Position::Append, tween)
    }

    /// Add a step starting together with the previous one.
    pub fn with_previous(self, name: impl Into<String>, tween: TweenSpec) -> Self {
        self.push(name, Position::WithPrevious, tween)
    }

    /// Add a step at an absolute offset.
    pub fn at(self, name: impl Into<String>, offset: f64, tween: TweenSpec) -> Self {
        self.push(name, Position::At(offset), tween)
    }

    fn push(mut self, name: impl Into<String>, position: Position, tween: TweenSpec) -> Self {
        self.steps.push(Step {
            name: name.into(),
            position,
            tween,
        });
        self
    }

    pub fn step_index(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.name == name)
    }

    /// Place every step given how many targets each resolved to.
    ///
    /// A step's delay is added to its anchor: the timeline end so far for appended steps,
    /// the previous step's start for overlapping ones. Its end covers the staggered
    /// sub-tween of its last target. Steps with no targets keep their slot.
    pub fn layout(&self, counts: &[usize]) -> Vec<Slot> {
        let mut slots: Vec<Slot> = Vec::with_capacity(self.steps.len());
        let mut end_so_far = 0.0_f64;
        for (i, step) in self.steps.iter().enumerate() {
            let anchor = match step.position {
                Position::Append => end_so_far,
                Position::WithPrevious => slots.last().map_or(0.0, |s| s.start),
                Position::At(t) => t,
            };
            let start = anchor + step.tween.delay;
            let n = counts.get(i).copied().unwrap_or(0);
            let end = start + step.tween.span(n);
            end_so_far = end_so_far.max(end);
            slots.push(Slot { start, end });
        }
        slots
    }

    /// Local duration once laid out.
    pub fn duration(&self, counts: &[usize]) -> f64 {
        self.layout(counts)
            .iter()
            .fold(0.0_f64, |acc, s| acc.max(s.end))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timeline.rs"]
mod tests;
