//! Tunable constants of the intro, loadable from JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::pool::{INDEX_PLACEHOLDER, ImagePool};
use crate::foundation::error::{LanderError, LanderResult};
use crate::scene::page::PageLayout;

/// Image pool generated from a file pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub size: usize,
    /// Identifier pattern; `{n}` is replaced by the 1-based index.
    pub pattern: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 20,
            pattern: format!("images/img{INDEX_PLACEHOLDER}.jpg"),
        }
    }
}

impl PoolConfig {
    pub fn build(&self) -> LanderResult<ImagePool> {
        ImagePool::from_pattern(&self.pattern, self.size)
    }
}

/// Image rotation cadence and the terminal hero treatment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub total_cycles: u32,
    /// Seconds between cycles.
    pub interval: f64,
    /// Seconds from the grid reveal starting to the first cycle.
    pub start_delay: f64,
    pub hero_image: String,
    pub hero_scale: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            total_cycles: 20,
            interval: 0.15,
            start_delay: 1.0,
            hero_image: "images/img2.jpg".to_owned(),
            hero_scale: 2.0,
        }
    }
}

impl RotationConfig {
    pub fn validate(&self) -> LanderResult<()> {
        if self.total_cycles == 0 {
            return Err(LanderError::validation("rotation.total_cycles must be > 0"));
        }
        for (name, v) in [
            ("interval", self.interval),
            ("start_delay", self.start_delay),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(LanderError::validation(format!(
                    "rotation.{name} must be finite and >= 0"
                )));
            }
        }
        if !self.hero_scale.is_finite() {
            return Err(LanderError::validation("rotation.hero_scale must be finite"));
        }
        if self.hero_image.trim().is_empty() {
            return Err(LanderError::validation("rotation.hero_image must be non-empty"));
        }
        Ok(())
    }
}

/// Everything the canonical intro needs besides the page and the records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub page: PageLayout,
    pub pool: PoolConfig,
    pub rotation: RotationConfig,
    /// Control points of the `hop` curve.
    pub hop: [f64; 4],
    /// Fixed seed for the image sampler; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            page: PageLayout::default(),
            pool: PoolConfig::default(),
            rotation: RotationConfig::default(),
            hop: [0.9, 0.0, 0.1, 1.0],
            seed: None,
        }
    }
}

impl IntroConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> LanderResult<Self> {
        let cfg: Self = serde_json::from_reader(r)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> LanderResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LanderError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> LanderResult<()> {
        self.page.validate()?;
        self.pool.build()?;
        self.rotation.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
