//! Periodic reassignment of grid images from fresh samples of the pool.

use rand::Rng;
use serde::Serialize;

use crate::animation::value::{Prop, PropValue};
use crate::config::RotationConfig;
use crate::content::pool::{ImagePool, sample};
use crate::scene::page::PageRegions;
use crate::scene::tree::{NodeId, SceneTree};

/// Lifecycle of a rotator; it runs at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RotatorState {
    Idle,
    Running,
    Finished,
}

/// What one rotation cycle changed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CycleReport {
    pub cycle: u32,
    pub terminal: bool,
    /// `(img node, source)` pairs in slot order.
    pub assigned: Vec<(NodeId, String)>,
}

/// Runs exactly `total_cycles` assignment events, then stops for good.
///
/// Every cycle draws a fresh sample sized to the grid and gives non-hero slot `i` the
/// sample's entry `i`. A pool smaller than the grid leaves the trailing slots as they are.
/// The hero slot is left alone until the last cycle, which pins the configured image and
/// scale on it.
#[derive(Clone, Debug)]
pub struct ImageRotator {
    pool: ImagePool,
    /// The `img` inside each grid slot.
    slots: Vec<Option<NodeId>>,
    hero_slot: Option<usize>,
    hero_inner: Option<NodeId>,
    settings: RotationConfig,
    state: RotatorState,
    fired: u32,
}

impl ImageRotator {
    pub fn new(
        pool: ImagePool,
        slots: Vec<Option<NodeId>>,
        hero_slot: Option<usize>,
        hero_inner: Option<NodeId>,
        settings: RotationConfig,
    ) -> Self {
        Self {
            pool,
            slots,
            hero_slot,
            hero_inner,
            settings,
            state: RotatorState::Idle,
            fired: 0,
        }
    }

    pub fn from_regions(pool: ImagePool, regions: &PageRegions, settings: RotationConfig) -> Self {
        Self::new(
            pool,
            regions.grid_inner.clone(),
            regions.hero_slot(),
            regions.hero_inner,
            settings,
        )
    }

    pub fn state(&self) -> RotatorState {
        self.state
    }

    pub fn total_cycles(&self) -> u32 {
        self.settings.total_cycles
    }

    pub fn cycles_fired(&self) -> u32 {
        self.fired
    }

    /// Begin rotating; returns each cycle with its offset from now.
    ///
    /// Offsets are `cycle * interval`, all relative to this call. Starting twice does nothing.
    pub fn start(&mut self) -> Vec<(u32, f64)> {
        if self.state != RotatorState::Idle {
            tracing::warn!(state = ?self.state, "rotation already started");
            return Vec::new();
        }
        self.state = RotatorState::Running;
        (0..self.settings.total_cycles)
            .map(|c| (c, f64::from(c) * self.settings.interval))
            .collect()
    }

    /// Apply cycle `cycle`; cycles must arrive in order and only while running.
    #[tracing::instrument(level = "debug", skip(self, tree, rng))]
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        cycle: u32,
        tree: &mut SceneTree,
        rng: &mut R,
    ) -> Option<CycleReport> {
        if self.state != RotatorState::Running || cycle != self.fired {
            tracing::debug!(state = ?self.state, fired = self.fired, "rotation event ignored");
            return None;
        }
        let terminal = cycle + 1 == self.settings.total_cycles;
        let drawn = sample(&self.pool, self.slots.len(), rng);

        let mut assigned = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if Some(i) == self.hero_slot {
                if terminal && let Some(img) = self.hero_inner.or(*slot) {
                    let src = self.settings.hero_image.clone();
                    tree.set_style(img, Prop::Src, PropValue::Source(src.clone()));
                    tree.set_style(img, Prop::Scale, PropValue::Number(self.settings.hero_scale));
                    assigned.push((img, src));
                }
                continue;
            }
            let Some(img) = *slot else {
                tracing::debug!(slot = i, "grid slot has no image, skipped");
                continue;
            };
            let Some(src) = drawn.get(i) else {
                tracing::debug!(
                    slot = i,
                    drawn = drawn.len(),
                    "pool exhausted, slot keeps its image"
                );
                continue;
            };
            tree.set_style(img, Prop::Src, PropValue::Source(src.to_owned()));
            assigned.push((img, src.to_owned()));
        }

        self.fired += 1;
        if self.fired == self.settings.total_cycles {
            self.state = RotatorState::Finished;
            tracing::debug!("rotation finished");
        }
        Some(CycleReport {
            cycle,
            terminal,
            assigned,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/rotator.rs"]
mod tests;
