use crate::animation::ease::Curve;
use crate::animation::value::{Prop, PropValue};
use crate::foundation::error::LanderResult;
use crate::scene::tree::{NodeId, SceneTree};
use crate::timeline::step::TweenSpec;

const END_TOLERANCE: f64 = 1e-9;

struct Track {
    node: NodeId,
    /// Captured the first time this target's sub-tween is sampled.
    from: Option<Vec<PropValue>>,
    done: bool,
}

/// A tween in flight: one staggered sub-tween per resolved target.
pub struct TweenRun {
    owner: String,
    start: f64,
    duration: f64,
    stagger: f64,
    curve: Curve,
    to: Vec<(Prop, PropValue)>,
    tracks: Vec<Track>,
}

impl TweenRun {
    /// `start` is the first target's start on the session clock (delay already applied).
    pub fn new(
        owner: impl Into<String>,
        start: f64,
        spec: &TweenSpec,
        curve: Curve,
        nodes: Vec<NodeId>,
    ) -> LanderResult<Self> {
        Ok(Self {
            owner: owner.into(),
            start,
            duration: spec.duration,
            stagger: spec.stagger,
            curve,
            to: spec.coerced()?,
            tracks: nodes
                .into_iter()
                .map(|node| Track {
                    node,
                    from: None,
                    done: false,
                })
                .collect(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn targets(&self) -> usize {
        self.tracks.len()
    }

    pub fn end(&self) -> f64 {
        let extra = self.tracks.len().saturating_sub(1) as f64 * self.stagger;
        self.start + self.duration + extra
    }

    pub fn is_finished(&self) -> bool {
        self.tracks.iter().all(|t| t.done)
    }

    /// Write every started target's value at time `t`.
    pub fn sample(&mut self, t: f64, tree: &mut SceneTree) {
        for (i, track) in self.tracks.iter_mut().enumerate() {
            if track.done {
                continue;
            }
            let begin = self.start + i as f64 * self.stagger;
            if t < begin {
                continue;
            }
            let progress = if t >= begin + self.duration - END_TOLERANCE {
                1.0
            } else {
                ((t - begin) / self.duration).clamp(0.0, 1.0)
            };
            let node = track.node;
            let from = track
                .from
                .get_or_insert_with(|| self.to.iter().map(|(p, _)| tree.computed(node, *p)).collect());
            let eased = if progress >= 1.0 {
                1.0
            } else {
                self.curve.apply(progress)
            };
            for ((prop, to), from) in self.to.iter().zip(from.iter()) {
                let v = if progress >= 1.0 {
                    to.clone()
                } else {
                    PropValue::interpolate(from, to, eased)
                };
                tree.set_style(node, *prop, v);
            }
            track.done = progress >= 1.0;
        }
    }

    /// Jump every target to its end value.
    pub fn finish(&mut self, tree: &mut SceneTree) {
        self.sample(self.end() + END_TOLERANCE, tree);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/tween.rs"]
mod tests;
