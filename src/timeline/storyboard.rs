//! The stage/trigger graph: timelines, detached actions, and the edges that start them.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::animation::ease::EaseRegistry;
use crate::foundation::error::{LanderError, LanderResult};
use crate::timeline::step::{Position, SetSpec, TweenSpec, check_delay};
use crate::timeline::timeline::Timeline;

/// The moment of a stage that fires its outgoing triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    Complete,
}

/// When `source` reaches `edge`, invoke `target` after `delay` seconds of logical time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub source: String,
    pub edge: Edge,
    #[serde(default)]
    pub delay: f64,
    pub target: String,
}

impl Trigger {
    pub fn on_start(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edge: Edge::Start,
            delay: 0.0,
            target: target.into(),
        }
    }

    pub fn on_complete(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            edge: Edge::Complete,
            ..Self::on_start(source, target)
        }
    }

    pub fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// Work performed by a detached stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Tween(TweenSpec),
    Set(SetSpec),
    PlayTimeline(String),
    StartRotation,
}

/// A named action outside any timeline, run when a trigger targets it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub action: Action,
}

impl Stage {
    pub fn new(name: impl Into<String>, action: Action) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

/// What a stage name refers to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StageRef<'a> {
    Timeline(&'a Timeline),
    Step { timeline: &'a Timeline, index: usize },
    Detached(&'a Stage),
}

/// A complete animation description, playable by an [`IntroSession`](crate::IntroSession).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storyboard {
    /// Custom easing curves, registered before anything plays.
    pub eases: EaseRegistry,
    /// Values assigned before the first timeline starts.
    pub initial: Vec<SetSpec>,
    pub timelines: Vec<Timeline>,
    pub stages: Vec<Stage>,
    pub triggers: Vec<Trigger>,
}

impl Storyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> LanderResult<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    pub fn push_initial(&mut self, set: SetSpec) {
        self.initial.push(set);
    }

    pub fn push_timeline(&mut self, timeline: Timeline) {
        self.timelines.push(timeline);
    }

    pub fn push_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn push_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    pub fn timeline(&self, name: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.name == name)
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Resolve a stage name to the timeline, step, or detached stage it denotes.
    pub fn lookup(&self, name: &str) -> Option<StageRef<'_>> {
        if let Some(t) = self.timeline(name) {
            return Some(StageRef::Timeline(t));
        }
        for t in &self.timelines {
            if let Some(index) = t.step_index(name) {
                return Some(StageRef::Step { timeline: t, index });
            }
        }
        self.stage(name).map(StageRef::Detached)
    }

    /// Triggers fired when `source` reaches `edge`, in declaration order.
    pub fn triggers_from(&self, source: &str, edge: Edge) -> Vec<&Trigger> {
        self.triggers
            .iter()
            .filter(|t| t.source == source && t.edge == edge)
            .collect()
    }

    /// Check names, timings, values, easing references, and the trigger graph.
    #[tracing::instrument(skip_all, fields(timelines = self.timelines.len(), stages = self.stages.len()))]
    pub fn validate(&self) -> LanderResult<()> {
        let mut errors: Vec<String> = Vec::new();

        // Pass 1: every timeline, step, and stage name is unique.
        let mut names = HashSet::<&str>::new();
        let declared = self
            .timelines
            .iter()
            .flat_map(|t| {
                std::iter::once(t.name.as_str()).chain(t.steps.iter().map(|s| s.name.as_str()))
            })
            .chain(self.stages.iter().map(|s| s.name.as_str()));
        for name in declared {
            if name.trim().is_empty() {
                errors.push("stage names must be non-empty".to_owned());
            } else if !names.insert(name) {
                errors.push(format!("duplicate stage name \"{name}\""));
            }
        }

        // Pass 2: per-item checks and references.
        for (i, set) in self.initial.iter().enumerate() {
            push_err(&mut errors, set.validate(&format!("initial[{i}]")));
        }
        for t in &self.timelines {
            for s in &t.steps {
                let ctx = format!("step \"{}\"", s.name);
                push_err(&mut errors, s.tween.validate(&ctx));
                push_err(&mut errors, self.check_ease(&s.tween, &ctx));
                if let Position::At(at) = s.position
                    && (!at.is_finite() || at < 0.0)
                {
                    errors.push(format!("{ctx}: position must be finite and >= 0"));
                }
            }
        }
        for s in &self.stages {
            let ctx = format!("stage \"{}\"", s.name);
            match &s.action {
                Action::Tween(tw) => {
                    push_err(&mut errors, tw.validate(&ctx));
                    push_err(&mut errors, self.check_ease(tw, &ctx));
                }
                Action::Set(set) => push_err(&mut errors, set.validate(&ctx)),
                Action::PlayTimeline(name) => {
                    if self.timeline(name).is_none() {
                        errors.push(format!("{ctx}: unknown timeline \"{name}\""));
                    }
                }
                Action::StartRotation => {}
            }
        }
        for (i, tr) in self.triggers.iter().enumerate() {
            let ctx = format!("triggers[{i}]");
            push_err(&mut errors, check_delay(tr.delay, &ctx));
            if !names.contains(tr.source.as_str()) {
                errors.push(format!("{ctx}: unknown source \"{}\"", tr.source));
            }
            match self.lookup(&tr.target) {
                None => errors.push(format!("{ctx}: unknown target \"{}\"", tr.target)),
                Some(StageRef::Step { .. }) => errors.push(format!(
                    "{ctx}: target \"{}\" is a timeline step; trigger its timeline instead",
                    tr.target
                )),
                Some(_) => {}
            }
        }

        if !errors.is_empty() {
            return Err(LanderError::validation(errors.join("; ")));
        }

        // Pass 3: the graph of "invoking X starts Y" must be acyclic.
        if let Some(cycle) = self.find_cycle() {
            return Err(LanderError::validation(format!(
                "trigger cycle: {}",
                cycle.join(" -> ")
            )));
        }
        Ok(())
    }

    fn check_ease(&self, tween: &TweenSpec, ctx: &str) -> LanderResult<()> {
        tween
            .ease
            .resolve(&self.eases)
            .map(|_| ())
            .map_err(|e| LanderError::validation(format!("{ctx}: {e}")))
    }

    fn edges(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut out: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for t in &self.timelines {
            let list = out.entry(t.name.as_str()).or_default();
            list.extend(t.steps.iter().map(|s| s.name.as_str()));
        }
        for s in &self.stages {
            if let Action::PlayTimeline(name) = &s.action {
                out.entry(s.name.as_str()).or_default().push(name.as_str());
            }
        }
        for tr in &self.triggers {
            out.entry(tr.source.as_str())
                .or_default()
                .push(tr.target.as_str());
        }
        out
    }

    fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            node: &'a str,
            edges: &BTreeMap<&'a str, Vec<&'a str>>,
            marks: &mut BTreeMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let from = path.iter().position(|&n| n == node).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[from..].iter().map(|s| (*s).to_owned()).collect();
                    cycle.push(node.to_owned());
                    return Some(cycle);
                }
                None => {}
            }
            marks.insert(node, Mark::Visiting);
            path.push(node);
            for &next in edges.get(node).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(c) = visit(next, edges, marks, path) {
                    return Some(c);
                }
            }
            path.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let edges = self.edges();
        let mut marks = BTreeMap::new();
        let mut path = Vec::new();
        edges
            .keys()
            .find_map(|&start| visit(start, &edges, &mut marks, &mut path))
    }
}

fn push_err(errors: &mut Vec<String>, r: LanderResult<()>) {
    match r {
        Ok(()) => {}
        Err(LanderError::Validation(msg)) => errors.push(msg),
        Err(e) => errors.push(e.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/storyboard.rs"]
mod tests;
