//! Playback of a storyboard on one logical clock.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::IntroConfig;
use crate::content::hydrate::Hydrator;
use crate::content::project::ProjectRecord;
use crate::foundation::error::{LanderError, LanderResult};
use crate::intro::{SplitText, intro_storyboard};
use crate::rotator::ImageRotator;
use crate::scene::page::PageRegions;
use crate::scene::split::split_words;
use crate::scene::tree::{NodeId, SceneTree};
use crate::schedule::clock::Clock;
use crate::schedule::tween::TweenRun;
use crate::timeline::step::resolve_targets;
use crate::timeline::storyboard::{Action, Edge, StageRef, Storyboard};
use crate::timeline::timeline::{Slot, TimelineState};

/// One dispatched event, stamped with its logical time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceEntry {
    pub at: f64,
    #[serde(flatten)]
    pub event: TraceEvent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    TimelineStarted { timeline: String },
    TimelineCompleted { timeline: String },
    StepStarted { step: String, targets: usize },
    StepCompleted { step: String },
    StageInvoked { stage: String },
    StageCompleted { stage: String },
    RotationCycle { cycle: u32, terminal: bool },
}

impl TraceEvent {
    /// The timeline, step, or stage this event belongs to.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::TimelineStarted { timeline } | Self::TimelineCompleted { timeline } => {
                Some(timeline)
            }
            Self::StepStarted { step, .. } | Self::StepCompleted { step } => Some(step),
            Self::StageInvoked { stage } | Self::StageCompleted { stage } => Some(stage),
            Self::RotationCycle { .. } => None,
        }
    }

    fn is_start(&self) -> bool {
        matches!(
            self,
            Self::TimelineStarted { .. } | Self::StepStarted { .. } | Self::StageInvoked { .. }
        )
    }

    fn is_completion(&self) -> bool {
        matches!(
            self,
            Self::TimelineCompleted { .. } | Self::StepCompleted { .. } | Self::StageCompleted { .. }
        )
    }
}

/// Everything a session dispatched, in dispatch order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When the named timeline, step, or stage started.
    pub fn started_at(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.event.is_start() && e.event.name() == Some(name))
            .map(|e| e.at)
    }

    /// When the named timeline, step, or stage completed.
    pub fn completed_at(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.event.is_completion() && e.event.name() == Some(name))
            .map(|e| e.at)
    }

    /// Times of every rotation cycle, in order.
    pub fn rotation_times(&self) -> Vec<f64> {
        self.entries
            .iter()
            .filter(|e| matches!(e.event, TraceEvent::RotationCycle { .. }))
            .map(|e| e.at)
            .collect()
    }

    fn push(&mut self, at: f64, event: TraceEvent) {
        tracing::debug!(at, ?event, "dispatch");
        self.entries.push(TraceEntry { at, event });
    }
}

#[derive(Debug)]
enum Event {
    TimelineStart(usize),
    StepStart { timeline: usize, step: usize },
    StepComplete { timeline: usize, step: usize, run: u64 },
    StageComplete { stage: usize, run: u64 },
    Invoke(String),
    RotationCycle(u32),
}

#[derive(Default)]
struct TimelineRun {
    state: TimelineState,
    slots: Vec<Slot>,
    targets: Vec<Vec<NodeId>>,
    pending: usize,
}

/// A storyboard being played against a scene tree.
///
/// Construction starts every autostart timeline at time zero; [`advance_to`](Self::advance_to)
/// moves the clock forward, dispatching timeline steps, trigger delays and rotation cycles
/// in time order.
pub struct IntroSession {
    tree: SceneTree,
    storyboard: Storyboard,
    clock: Clock<Event>,
    timelines: Vec<TimelineRun>,
    active: Vec<(u64, TweenRun)>,
    next_run: u64,
    rotator: Option<ImageRotator>,
    rng: StdRng,
    trace: Trace,
}

impl IntroSession {
    /// Hydrate the page, split its text, build the intro storyboard and start it.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub fn start(
        config: &IntroConfig,
        records: &[ProjectRecord],
        mut tree: SceneTree,
    ) -> LanderResult<Self> {
        config.validate()?;
        let regions = PageRegions::locate(&tree)?;
        let hydrated = Hydrator::from_regions(&regions).hydrate(&mut tree, records);
        let words = SplitText {
            title: regions
                .title
                .map(|n| split_words(&mut tree, n))
                .unwrap_or_default(),
            intro_copy: regions
                .intro_copy
                .map(|n| split_words(&mut tree, n))
                .unwrap_or_default(),
        };
        let storyboard = intro_storyboard(config, &regions, &hydrated, &words)?;
        let rotator =
            ImageRotator::from_regions(config.pool.build()?, &regions, config.rotation.clone());
        Self::from_storyboard(tree, storyboard, Some(rotator), config.seed)
    }

    /// Play an arbitrary storyboard. Without a seed the sampler is seeded from the OS.
    #[tracing::instrument(skip(tree, storyboard, rotator))]
    pub fn from_storyboard(
        tree: SceneTree,
        storyboard: Storyboard,
        rotator: Option<ImageRotator>,
        seed: Option<u64>,
    ) -> LanderResult<Self> {
        storyboard.validate()?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let mut session = Self {
            tree,
            timelines: storyboard
                .timelines
                .iter()
                .map(|_| TimelineRun::default())
                .collect(),
            storyboard,
            clock: Clock::new(),
            active: Vec::new(),
            next_run: 0,
            rotator,
            rng,
            trace: Trace::default(),
        };

        for set in &session.storyboard.initial {
            set.apply(&mut session.tree);
        }
        for (i, t) in session.storyboard.timelines.iter().enumerate() {
            if t.autostart {
                session.clock.schedule_at(0.0, Event::TimelineStart(i))?;
            }
        }
        session.advance_to(0.0)?;
        Ok(session)
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn into_tree(self) -> SceneTree {
        self.tree
    }

    pub fn storyboard(&self) -> &Storyboard {
        &self.storyboard
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn rotator(&self) -> Option<&ImageRotator> {
        self.rotator.as_ref()
    }

    pub fn timeline_state(&self, name: &str) -> Option<TimelineState> {
        let i = self.storyboard.timelines.iter().position(|t| t.name == name)?;
        Some(self.timelines[i].state)
    }

    /// True once nothing is left on the agenda.
    pub fn is_finished(&self) -> bool {
        self.clock.is_idle()
    }

    /// Dispatch everything due up to `t`, then render active tweens at `t`.
    pub fn advance_to(&mut self, t: f64) -> LanderResult<()> {
        if !t.is_finite() {
            return Err(LanderError::schedule(format!("cannot advance to {t}")));
        }
        while let Some((at, event)) = self.clock.pop_due(t) {
            self.sample_active(at);
            self.dispatch(at, event)?;
        }
        self.clock.advance(t);
        self.sample_active(self.clock.now());
        Ok(())
    }

    /// Play until the agenda is empty; returns the final time.
    pub fn run_to_end(&mut self) -> LanderResult<f64> {
        while let Some(at) = self.clock.next_at() {
            self.advance_to(at)?;
        }
        Ok(self.clock.now())
    }

    fn sample_active(&mut self, at: f64) {
        for (_, run) in &mut self.active {
            run.sample(at, &mut self.tree);
        }
    }

    fn dispatch(&mut self, at: f64, event: Event) -> LanderResult<()> {
        match event {
            Event::TimelineStart(i) => self.start_timeline(at, i),
            Event::StepStart { timeline, step } => self.start_step(at, timeline, step),
            Event::StepComplete {
                timeline,
                step,
                run,
            } => self.complete_step(at, timeline, step, run),
            Event::StageComplete { stage, run } => {
                self.finish_run(run);
                let name = self.storyboard.stages[stage].name.clone();
                self.trace
                    .push(at, TraceEvent::StageCompleted { stage: name.clone() });
                self.fire(&name, Edge::Complete)
            }
            Event::Invoke(target) => self.invoke(at, &target),
            Event::RotationCycle(cycle) => {
                if let Some(rotator) = self.rotator.as_mut()
                    && let Some(report) = rotator.fire(cycle, &mut self.tree, &mut self.rng)
                {
                    self.trace.push(
                        at,
                        TraceEvent::RotationCycle {
                            cycle: report.cycle,
                            terminal: report.terminal,
                        },
                    );
                }
                Ok(())
            }
        }
    }

    fn start_timeline(&mut self, at: f64, i: usize) -> LanderResult<()> {
        let timeline = &self.storyboard.timelines[i];
        if self.timelines[i].state != TimelineState::NotStarted {
            tracing::warn!(timeline = %timeline.name, "timeline already played");
            return Ok(());
        }
        let targets: Vec<Vec<NodeId>> = timeline
            .steps
            .iter()
            .map(|s| {
                let found = resolve_targets(&self.tree, &s.tween.targets);
                if found.is_empty() {
                    tracing::warn!(step = %s.name, "step matched no targets");
                }
                found
            })
            .collect();
        let counts: Vec<usize> = targets.iter().map(Vec::len).collect();
        let slots = timeline.layout(&counts);
        let name = timeline.name.clone();

        for (step, slot) in slots.iter().enumerate() {
            self.clock.schedule_at(
                at + slot.start,
                Event::StepStart {
                    timeline: i,
                    step,
                },
            )?;
        }
        let pending = slots.len();
        self.timelines[i] = TimelineRun {
            state: TimelineState::Running,
            slots,
            targets,
            pending,
        };
        self.trace.push(
            at,
            TraceEvent::TimelineStarted {
                timeline: name.clone(),
            },
        );
        self.fire(&name, Edge::Start)?;
        if pending == 0 {
            self.complete_timeline(at, i)?;
        }
        Ok(())
    }

    fn start_step(&mut self, at: f64, timeline: usize, step: usize) -> LanderResult<()> {
        let spec = &self.storyboard.timelines[timeline].steps[step];
        let name = spec.name.clone();
        let run_state = &self.timelines[timeline];
        let nodes = run_state.targets[step].clone();
        let slot = run_state.slots[step];
        let curve = spec.tween.ease.resolve(&self.storyboard.eases)?;
        let mut run = TweenRun::new(name.clone(), at, &spec.tween, curve, nodes)?;
        run.sample(at, &mut self.tree);

        let id = self.next_run;
        self.next_run += 1;
        self.active.push((id, run));
        let duration = slot.end - slot.start;
        self.clock.schedule_at(
            at + duration,
            Event::StepComplete {
                timeline,
                step,
                run: id,
            },
        )?;

        let targets = self.timelines[timeline].targets[step].len();
        self.trace.push(
            at,
            TraceEvent::StepStarted {
                step: name.clone(),
                targets,
            },
        );
        self.fire(&name, Edge::Start)
    }

    fn complete_step(&mut self, at: f64, timeline: usize, step: usize, run: u64) -> LanderResult<()> {
        self.finish_run(run);
        let name = self.storyboard.timelines[timeline].steps[step].name.clone();
        self.trace
            .push(at, TraceEvent::StepCompleted { step: name.clone() });
        self.fire(&name, Edge::Complete)?;

        let state = &mut self.timelines[timeline];
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            self.complete_timeline(at, timeline)?;
        }
        Ok(())
    }

    fn complete_timeline(&mut self, at: f64, i: usize) -> LanderResult<()> {
        self.timelines[i].state = TimelineState::Complete;
        let name = self.storyboard.timelines[i].name.clone();
        self.trace.push(
            at,
            TraceEvent::TimelineCompleted {
                timeline: name.clone(),
            },
        );
        self.fire(&name, Edge::Complete)
    }

    fn invoke(&mut self, at: f64, target: &str) -> LanderResult<()> {
        let stage = match self.storyboard.lookup(target) {
            Some(StageRef::Timeline(_)) => return self.play_timeline(at, target),
            Some(StageRef::Detached(_)) => self
                .storyboard
                .stages
                .iter()
                .position(|s| s.name == target)
                .ok_or_else(|| LanderError::validation(format!("unknown stage \"{target}\"")))?,
            Some(StageRef::Step { .. }) | None => {
                return Err(LanderError::validation(format!(
                    "\"{target}\" cannot be invoked"
                )));
            }
        };

        let name = target.to_owned();
        self.trace
            .push(at, TraceEvent::StageInvoked { stage: name.clone() });
        self.fire(&name, Edge::Start)?;

        match self.storyboard.stages[stage].action.clone() {
            Action::Tween(spec) => {
                let nodes = resolve_targets(&self.tree, &spec.targets);
                if nodes.is_empty() {
                    tracing::warn!(stage = %name, "stage matched no targets");
                }
                let curve = spec.ease.resolve(&self.storyboard.eases)?;
                let mut run = TweenRun::new(name, at + spec.delay, &spec, curve, nodes)?;
                run.sample(at, &mut self.tree);
                let end = run.end();
                let id = self.next_run;
                self.next_run += 1;
                self.active.push((id, run));
                self.clock
                    .schedule_at(end, Event::StageComplete { stage, run: id })
            }
            Action::Set(set) => {
                if set.apply(&mut self.tree) == 0 {
                    tracing::warn!(stage = %name, "stage matched no targets");
                }
                self.complete_stage(at, name)
            }
            Action::PlayTimeline(timeline) => {
                self.play_timeline(at, &timeline)?;
                self.complete_stage(at, name)
            }
            Action::StartRotation => {
                match self.rotator.as_mut() {
                    Some(rotator) => {
                        for (cycle, offset) in rotator.start() {
                            self.clock
                                .schedule_at(at + offset, Event::RotationCycle(cycle))?;
                        }
                    }
                    None => tracing::warn!(stage = %name, "no image rotator attached"),
                }
                self.complete_stage(at, name)
            }
        }
    }

    fn complete_stage(&mut self, at: f64, name: String) -> LanderResult<()> {
        self.trace
            .push(at, TraceEvent::StageCompleted { stage: name.clone() });
        self.fire(&name, Edge::Complete)
    }

    fn play_timeline(&mut self, at: f64, name: &str) -> LanderResult<()> {
        let i = self
            .storyboard
            .timelines
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| LanderError::validation(format!("unknown timeline \"{name}\"")))?;
        self.start_timeline(at, i)
    }

    fn fire(&mut self, source: &str, edge: Edge) -> LanderResult<()> {
        let due: Vec<(f64, String)> = self
            .storyboard
            .triggers_from(source, edge)
            .into_iter()
            .map(|t| (t.delay, t.target.clone()))
            .collect();
        for (delay, target) in due {
            self.clock.schedule_in(delay, Event::Invoke(target))?;
        }
        Ok(())
    }

    fn finish_run(&mut self, run: u64) {
        if let Some(pos) = self.active.iter().position(|(id, _)| *id == run) {
            let (_, mut tween) = self.active.remove(pos);
            tween.finish(&mut self.tree);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
