use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::animation::value::{Prop, PropValue};
use crate::foundation::error::{LanderError, LanderResult};
use crate::scene::selector::Selector;
use crate::scene::tree::{NodeId, SceneTree};

/// An animation target: a concrete node or a selector resolved when the step starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Node(NodeId),
    Selector(String),
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Self::Selector(s.to_owned())
    }
}

/// Build a target list from node handles, skipping absent ones.
pub fn node_targets<I>(nodes: I) -> Vec<Target>
where
    I: IntoIterator<Item = Option<NodeId>>,
{
    nodes.into_iter().flatten().map(Target::Node).collect()
}

/// Resolve targets to nodes in order, dropping duplicates and unknown nodes.
pub fn resolve_targets(tree: &SceneTree, targets: &[Target]) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::new();
    for target in targets {
        let found = match target {
            Target::Node(id) if tree.contains(*id) => vec![*id],
            Target::Node(id) => {
                tracing::debug!(node = id.0, "target node not in tree");
                Vec::new()
            }
            Target::Selector(s) => match Selector::parse(s) {
                Ok(sel) => tree.select(&sel),
                Err(e) => {
                    tracing::warn!(selector = %s, error = %e, "target selector ignored");
                    Vec::new()
                }
            },
        };
        for id in found {
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}

fn default_duration() -> f64 {
    0.5
}

/// A timed property transition over a set of targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TweenSpec {
    pub targets: Vec<Target>,
    pub to: BTreeMap<Prop, PropValue>,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub delay: f64,
    /// Offset between successive targets' start times.
    #[serde(default)]
    pub stagger: f64,
    #[serde(default)]
    pub ease: Ease,
}

impl TweenSpec {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            to: BTreeMap::new(),
            duration: default_duration(),
            delay: 0.0,
            stagger: 0.0,
            ease: Ease::default(),
        }
    }

    pub fn to(mut self, prop: Prop, value: PropValue) -> Self {
        self.to.insert(prop, value);
        self
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    pub fn delay(mut self, secs: f64) -> Self {
        self.delay = secs;
        self
    }

    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = secs;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Time from the first target's start to the last target's end.
    pub fn span(&self, targets: usize) -> f64 {
        let extra = targets.saturating_sub(1) as f64 * self.stagger;
        self.duration + extra
    }

    pub fn validate(&self, context: &str) -> LanderResult<()> {
        check_secs(self.duration, context, "duration")?;
        check_secs(self.delay, context, "delay")?;
        check_secs(self.stagger, context, "stagger")?;
        if self.to.is_empty() {
            return Err(LanderError::validation(format!(
                "{context}: tween animates no properties"
            )));
        }
        check_targets(&self.targets, context)?;
        check_values(&self.to, context)
    }

    /// Target values coerced to their property shapes.
    pub fn coerced(&self) -> LanderResult<Vec<(Prop, PropValue)>> {
        self.to
            .iter()
            .map(|(p, v)| Ok((*p, v.clone().coerce(*p)?)))
            .collect()
    }
}

/// Instant assignment of values, with no transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetSpec {
    pub targets: Vec<Target>,
    pub values: BTreeMap<Prop, PropValue>,
}

impl SetSpec {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            values: BTreeMap::new(),
        }
    }

    pub fn value(mut self, prop: Prop, value: PropValue) -> Self {
        self.values.insert(prop, value);
        self
    }

    pub fn validate(&self, context: &str) -> LanderResult<()> {
        check_targets(&self.targets, context)?;
        check_values(&self.values, context)
    }

    /// Apply to the resolved targets; returns the number of nodes touched.
    pub fn apply(&self, tree: &mut SceneTree) -> usize {
        let nodes = resolve_targets(tree, &self.targets);
        for (prop, value) in &self.values {
            match value.clone().coerce(*prop) {
                Ok(v) => {
                    for &n in &nodes {
                        tree.set_style(n, *prop, v.clone());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "set skipped"),
            }
        }
        nodes.len()
    }
}

/// Where a step sits relative to the steps declared before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// After everything already on the timeline has finished.
    #[default]
    Append,
    /// At the start time of the previous step.
    WithPrevious,
    /// At an absolute offset from the timeline start.
    At(f64),
}

/// A named tween placed on a timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    #[serde(default)]
    pub position: Position,
    pub tween: TweenSpec,
}

fn check_secs(v: f64, context: &str, what: &str) -> LanderResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(LanderError::validation(format!(
            "{context}: {what} must be finite and >= 0 (got {v})"
        )));
    }
    Ok(())
}

fn check_targets(targets: &[Target], context: &str) -> LanderResult<()> {
    for t in targets {
        if let Target::Selector(s) = t {
            Selector::parse(s).map_err(|e| LanderError::validation(format!("{context}: {e}")))?;
        }
    }
    Ok(())
}

fn check_values(values: &BTreeMap<Prop, PropValue>, context: &str) -> LanderResult<()> {
    for (p, v) in values {
        v.clone()
            .coerce(*p)
            .map_err(|e| LanderError::validation(format!("{context}: {e}")))?;
    }
    Ok(())
}

pub(crate) fn check_delay(v: f64, context: &str) -> LanderResult<()> {
    check_secs(v, context, "delay")
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/step.rs"]
mod tests;
