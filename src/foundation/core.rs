use crate::foundation::error::{LanderError, LanderResult};

pub use kurbo::Point;

/// Absolute 0-based frame index used when sampling playback at a fixed rate.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> LanderResult<Self> {
        if den == 0 {
            return Err(LanderError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LanderError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse `"30"` or `"30000/1001"`.
    pub fn parse(s: &str) -> LanderResult<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num = num
            .parse::<u32>()
            .map_err(|e| LanderError::validation(format!("invalid fps numerator '{num}': {e}")))?;
        let den = den
            .parse::<u32>()
            .map_err(|e| LanderError::validation(format!("invalid fps denominator '{den}': {e}")))?;
        Self::new(num, den)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Time of the start of `frame`, in seconds.
    pub fn frame_time_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * self.frame_duration_secs()
    }

    /// Number of frames needed to cover `secs`, rounding up.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

/// Straight-alpha RGBA8 color, as written in CSS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(s: &str) -> LanderResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| LanderError::animation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() {
            return Err(LanderError::animation(format!("color '{s}' is not ascii")));
        }

        fn channel(s: &str, full: &str) -> LanderResult<u8> {
            u8::from_str_radix(s, 16)
                .map_err(|e| LanderError::animation(format!("invalid color '{full}': {e}")))
        }

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string(), s)?;
                    out[i] = v * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 | 8 => {
                let r = channel(&hex[0..2], s)?;
                let g = channel(&hex[2..4], s)?;
                let b = channel(&hex[4..6], s)?;
                let a = if hex.len() == 8 {
                    channel(&hex[6..8], s)?
                } else {
                    255
                };
                Ok(Self { r, g, b, a })
            }
            _ => Err(LanderError::animation(format!(
                "color '{s}' must have 3, 6 or 8 hex digits"
            ))),
        }
    }

    /// Linear per-channel interpolation.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(self.r, to.r, t),
            g: lerp_u8(self.g, to.g, t),
            b: lerp_u8(self.b, to.b, t),
            a: lerp_u8(self.a, to.a, t),
        }
    }
}

impl std::fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Total-order wrapper for finite `f64` seconds on the logical clock.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Secs(pub f64);

impl Eq for Secs {}

impl PartialOrd for Secs {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Secs {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
