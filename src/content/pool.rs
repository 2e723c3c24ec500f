use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::foundation::error::{LanderError, LanderResult};

/// Placeholder replaced by the 1-based image number in a pool pattern.
pub const INDEX_PLACEHOLDER: &str = "{n}";

/// Fixed, ordered set of image identifiers the rotator draws from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImagePool {
    ids: Vec<String>,
}

impl ImagePool {
    /// Build `count` identifiers from `pattern`, e.g. `images/img{n}.jpg` -> `images/img1.jpg`...
    pub fn from_pattern(pattern: &str, count: usize) -> LanderResult<Self> {
        if count == 0 {
            return Err(LanderError::validation("image pool must not be empty"));
        }
        if !pattern.contains(INDEX_PLACEHOLDER) {
            return Err(LanderError::validation(format!(
                "image pool pattern '{pattern}' must contain {INDEX_PLACEHOLDER}"
            )));
        }
        let ids = (1..=count)
            .map(|n| pattern.replace(INDEX_PLACEHOLDER, &n.to_string()))
            .collect();
        Ok(Self { ids })
    }

    pub fn from_ids(ids: Vec<String>) -> LanderResult<Self> {
        if ids.is_empty() {
            return Err(LanderError::validation("image pool must not be empty"));
        }
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }
}

/// One draw from an [`ImagePool`]: distinct identifiers in random order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageSample {
    ids: Vec<String>,
}

impl ImageSample {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Uniformly shuffle a copy of `pool` and keep the first `k` identifiers.
///
/// `k` larger than the pool is clamped to the pool size. The pool itself is never mutated
/// and draws are independent of each other.
pub fn sample<R: Rng + ?Sized>(pool: &ImagePool, k: usize, rng: &mut R) -> ImageSample {
    let k = k.min(pool.len());
    let mut ids = pool.ids.clone();
    let (head, _) = ids.partial_shuffle(rng, k);
    ImageSample { ids: head.to_vec() }
}

#[cfg(test)]
#[path = "../../tests/unit/content/pool.rs"]
mod tests;
