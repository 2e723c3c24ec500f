/// Convenience result type used across the crate.
pub type LanderResult<T> = Result<T, LanderError>;

/// Top-level error type for storyboard construction and playback.
///
/// Playback itself is best-effort: these errors surface for malformed authored input
/// (storyboards, configs, selectors) and never for a missing page element.
#[derive(thiserror::Error, Debug)]
pub enum LanderError {
    /// Invalid authored input (storyboard, config, record file).
    #[error("validation error: {0}")]
    Validation(String),

    /// A selector string could not be parsed.
    #[error("selector error: {0}")]
    Selector(String),

    /// Invalid animation data (easing, property values).
    #[error("animation error: {0}")]
    Animation(String),

    /// Logical clock misuse (time going backwards, non-finite times).
    #[error("schedule error: {0}")]
    Schedule(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LanderError {
    /// Build a [`LanderError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LanderError::Selector`] value.
    pub fn selector(msg: impl Into<String>) -> Self {
        Self::Selector(msg.into())
    }

    /// Build a [`LanderError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`LanderError::Schedule`] value.
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::Schedule(msg.into())
    }

    /// Build a [`LanderError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LanderError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
