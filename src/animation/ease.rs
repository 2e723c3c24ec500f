use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{LanderError, LanderResult};

/// Direction of a power curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EaseDir {
    /// Accelerate from rest.
    In,
    /// Decelerate to rest.
    Out,
    /// Accelerate then decelerate.
    InOut,
}

/// Easing as authored on a step: a built-in curve, an explicit cubic-bezier, or a name
/// registered in an [`EaseRegistry`].
#[derive(Clone, Debug, PartialEq)]
pub enum Ease {
    /// No easing (`"none"` / `"linear"`).
    Linear,
    /// Polynomial curve `powerN.in/out/inOut` of degree `N + 1`.
    Power {
        /// Power level, 1..=4.
        level: u8,
        /// Curve direction.
        dir: EaseDir,
    },
    /// CSS-style cubic-bezier with fixed endpoints (0,0) and (1,1).
    CubicBezier {
        /// First control point x, in `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
    /// Custom curve looked up by name at resolve time.
    Named(String),
}

impl Default for Ease {
    fn default() -> Self {
        Self::Power {
            level: 1,
            dir: EaseDir::Out,
        }
    }
}

impl Ease {
    /// Parse the string form (`"none"`, `"power3.out"`, `"ease-in-out"`, or a custom name).
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s {
            "none" | "linear" | "power0" | "power0.in" | "power0.out" | "power0.inOut" => {
                return Self::Linear;
            }
            "ease" => return Self::bezier(0.25, 0.1, 0.25, 1.0),
            "ease-in" => return Self::bezier(0.42, 0.0, 1.0, 1.0),
            "ease-out" => return Self::bezier(0.0, 0.0, 0.58, 1.0),
            "ease-in-out" => return Self::bezier(0.42, 0.0, 0.58, 1.0),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("power") {
            let (level, dir) = match rest.split_once('.') {
                Some((l, d)) => (l, Some(d)),
                None => (rest, None),
            };
            let dir = match dir {
                None | Some("out") => Some(EaseDir::Out),
                Some("in") => Some(EaseDir::In),
                Some("inOut") => Some(EaseDir::InOut),
                Some(_) => None,
            };
            if let (Ok(level @ 1..=4), Some(dir)) = (level.parse::<u8>(), dir) {
                return Self::Power { level, dir };
            }
        }

        Self::Named(s.to_owned())
    }

    /// Explicit cubic-bezier curve.
    pub fn bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Resolve to an evaluable [`Curve`], looking up named curves in `registry`.
    pub fn resolve(&self, registry: &EaseRegistry) -> LanderResult<Curve> {
        match self {
            Self::Linear => Ok(Curve::Linear),
            Self::Power { level, dir } => Ok(Curve::Power {
                degree: i32::from(*level) + 1,
                dir: *dir,
            }),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                check_bezier([*x1, *y1, *x2, *y2])?;
                Ok(Curve::Bezier([*x1, *y1, *x2, *y2]))
            }
            Self::Named(name) => registry
                .get(name)
                .map(Curve::Bezier)
                .ok_or_else(|| LanderError::animation(format!("unknown ease \"{name}\""))),
        }
    }

    fn name(&self) -> Option<String> {
        match self {
            Self::Linear => Some("none".to_owned()),
            Self::Power { level, dir } => Some(match dir {
                EaseDir::In => format!("power{level}.in"),
                EaseDir::Out => format!("power{level}.out"),
                EaseDir::InOut => format!("power{level}.inOut"),
            }),
            Self::Named(n) => Some(n.clone()),
            Self::CubicBezier { .. } => None,
        }
    }
}

impl Serialize for Ease {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct Bezier {
            cubic_bezier: [f64; 4],
        }

        match (self, self.name()) {
            (_, Some(name)) => serializer.serialize_str(&name),
            (Self::CubicBezier { x1, y1, x2, y2 }, None) => Bezier {
                cubic_bezier: [*x1, *y1, *x2, *y2],
            }
            .serialize(serializer),
            (_, None) => serializer.serialize_str("none"),
        }
    }
}

impl<'de> Deserialize<'de> for Ease {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            CubicBezier { cubic_bezier: [f64; 4] },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Ok(Self::parse(&s)),
            Repr::CubicBezier { cubic_bezier: [x1, y1, x2, y2] } => {
                Ok(Self::CubicBezier { x1, y1, x2, y2 })
            }
        }
    }
}

/// A resolved easing function mapping normalized progress to eased progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    /// Identity.
    Linear,
    /// Polynomial of the given degree.
    Power {
        /// Polynomial degree (2..=5).
        degree: i32,
        /// Curve direction.
        dir: EaseDir,
    },
    /// Cubic-bezier control points `[x1, y1, x2, y2]`.
    Bezier([f64; 4]),
}

impl Curve {
    /// Apply this curve to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power { degree, dir } => match dir {
                EaseDir::In => t.powi(degree),
                EaseDir::Out => 1.0 - (1.0 - t).powi(degree),
                EaseDir::InOut => {
                    if t < 0.5 {
                        (2.0 * t).powi(degree) / 2.0
                    } else {
                        1.0 - (2.0 * (1.0 - t)).powi(degree) / 2.0
                    }
                }
            },
            Self::Bezier([x1, y1, x2, y2]) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

/// Named custom curves, registered once at startup.
///
/// Deserialization goes through [`EaseRegistry::register`], so loaded curves obey the same
/// rules as registered ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EaseRegistry {
    curves: BTreeMap<String, [f64; 4]>,
}

impl<'de> Deserialize<'de> for EaseRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            #[serde(default)]
            curves: BTreeMap<String, [f64; 4]>,
        }

        let repr = Repr::deserialize(deserializer)?;
        let mut out = Self::new();
        for (name, bezier) in repr.curves {
            out.register(name, bezier).map_err(serde::de::Error::custom)?;
        }
        Ok(out)
    }
}

impl EaseRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cubic-bezier curve under `name`.
    ///
    /// Names are write-once and may not shadow a built-in ease.
    pub fn register(&mut self, name: impl Into<String>, bezier: [f64; 4]) -> LanderResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LanderError::animation("ease name must be non-empty"));
        }
        if !matches!(Ease::parse(&name), Ease::Named(_)) {
            return Err(LanderError::animation(format!(
                "ease name \"{name}\" shadows a built-in ease"
            )));
        }
        if self.curves.contains_key(&name) {
            return Err(LanderError::animation(format!(
                "ease \"{name}\" is already registered"
            )));
        }
        check_bezier(bezier)?;
        self.curves.insert(name, bezier);
        Ok(())
    }

    /// Look up a registered curve.
    pub fn get(&self, name: &str) -> Option<[f64; 4]> {
        self.curves.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }
}

fn check_bezier([x1, y1, x2, y2]: [f64; 4]) -> LanderResult<()> {
    if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
        return Err(LanderError::animation(
            "cubic-bezier parameters must be finite",
        ));
    }
    if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
        return Err(LanderError::animation(
            "cubic-bezier x parameters must be within [0, 1]",
        ));
    }
    Ok(())
}

fn cubic_bezier_ease(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    // Solve u such that bx(u) = x, then return by(u).
    fn sample_curve(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * t * a1 + 3.0 * omt * t * t * a2 + t * t * t
    }
    fn sample_curve_derivative(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * a1 + 6.0 * omt * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    let mut t = x;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t) - x;
        if x_t.abs() < 1e-9 {
            return sample_curve(y1, y2, t);
        }
        let d = sample_curve_derivative(x1, x2, t);
        if d.abs() < 1e-7 {
            break;
        }
        t = (t - x_t / d).clamp(0.0, 1.0);
    }

    // Steep curves (like `hop`) can stall Newton near the flat ends; bisect instead.
    let mut lo = 0.0;
    let mut hi = 1.0;
    t = x;
    for _ in 0..40 {
        let x_t = sample_curve(x1, x2, t);
        if (x_t - x).abs() < 1e-9 {
            break;
        }
        if x_t < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }

    sample_curve(y1, y2, t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
