//! Lander plays landing-page intro animations as deterministic storyboards.
//!
//! An intro is a set of timelines (ordered, staggered, eased property tweens over a
//! [`SceneTree`]) and detached stages wired together by start/complete triggers. Everything,
//! including the periodic image rotation, runs on one logical clock:
//!
//! - Build a page ([`standard_page`]) and load [`ProjectRecord`]s
//! - Start an [`IntroSession`] with an [`IntroConfig`]
//! - Advance the clock and inspect the tree or the dispatched [`Trace`]
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod content;
mod foundation;
pub mod intro;
pub(crate) mod rotator;
pub(crate) mod scene;
pub(crate) mod schedule;
pub(crate) mod session;
pub(crate) mod timeline;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Rgba8, Secs};
pub use crate::foundation::error::{LanderError, LanderResult};

pub use crate::animation::ease::{Curve, Ease, EaseDir, EaseRegistry};
pub use crate::animation::value::{ClipPath, Length, Prop, PropValue, Unit, ValueKind};
pub use crate::config::{IntroConfig, PoolConfig, RotationConfig};
pub use crate::content::hydrate::{Hydrated, Hydrator};
pub use crate::content::pool::{INDEX_PLACEHOLDER, ImagePool, ImageSample, sample};
pub use crate::content::project::{ProjectRecord, load_projects, projects_from_reader};
pub use crate::intro::{SplitText, intro_storyboard};
pub use crate::rotator::{CycleReport, ImageRotator, RotatorState};
pub use crate::scene::page::{PageLayout, PageRegions, selectors, standard_page};
pub use crate::scene::selector::Selector;
pub use crate::scene::split::{WORD_CLASS, split_all, split_words};
pub use crate::scene::tree::{NodeId, NodeSnapshot, SceneTree, TreeSnapshot};
pub use crate::schedule::clock::Clock;
pub use crate::schedule::tween::TweenRun;
pub use crate::session::{IntroSession, Trace, TraceEntry, TraceEvent};
pub use crate::timeline::step::{Position, SetSpec, Step, Target, TweenSpec, resolve_targets};
pub use crate::timeline::storyboard::{Action, Edge, Stage, StageRef, Storyboard, Trigger};
pub use crate::timeline::timeline::{Slot, Timeline, TimelineState};
