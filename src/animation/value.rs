use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{LanderError, LanderResult};

/// Animatable style properties understood by the scene tree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Prop {
    Opacity,
    Color,
    BackgroundPosition,
    ClipPath,
    X,
    Y,
    Left,
    Scale,
    Rotate,
    Src,
}

/// Shape of the values a [`Prop`] accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Length,
    Pair,
    Color,
    ClipPath,
    Source,
}

impl Prop {
    pub fn kind(self) -> ValueKind {
        match self {
            Self::Opacity | Self::Scale | Self::Rotate => ValueKind::Number,
            Self::X | Self::Y | Self::Left => ValueKind::Length,
            Self::BackgroundPosition => ValueKind::Pair,
            Self::Color => ValueKind::Color,
            Self::ClipPath => ValueKind::ClipPath,
            Self::Src => ValueKind::Source,
        }
    }

    /// Value used when neither inline style nor stylesheet sets the property.
    pub fn initial(self) -> PropValue {
        match self {
            Self::Opacity | Self::Scale => PropValue::Number(1.0),
            Self::Rotate => PropValue::Number(0.0),
            Self::X | Self::Y | Self::Left => PropValue::Length(Length::px(0.0)),
            Self::BackgroundPosition => {
                PropValue::Pair(Length::percent(0.0), Length::percent(0.0))
            }
            Self::Color => PropValue::Color(Rgba8::rgb(0, 0, 0)),
            Self::ClipPath => PropValue::ClipPath(ClipPath::full()),
            Self::Src => PropValue::Source(String::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::Color => "color",
            Self::BackgroundPosition => "background_position",
            Self::ClipPath => "clip_path",
            Self::X => "x",
            Self::Y => "y",
            Self::Left => "left",
            Self::Scale => "scale",
            Self::Rotate => "rotate",
            Self::Src => "src",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Px,
    Percent,
    Vw,
}

impl Unit {
    fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Percent => "%",
            Self::Vw => "vw",
        }
    }
}

/// A CSS length with an explicit unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub const fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    pub const fn percent(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    pub const fn vw(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Vw,
        }
    }

    pub fn parse(s: &str) -> LanderResult<Self> {
        let s = s.trim();
        let (num, unit) = if let Some(n) = s.strip_suffix("px") {
            (n, Unit::Px)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Unit::Percent)
        } else if let Some(n) = s.strip_suffix("vw") {
            (n, Unit::Vw)
        } else {
            (s, Unit::Px)
        };
        let value = num
            .trim()
            .parse::<f64>()
            .map_err(|e| LanderError::animation(format!("invalid length '{s}': {e}")))?;
        if !value.is_finite() {
            return Err(LanderError::animation(format!("length '{s}' is not finite")));
        }
        Ok(Self { value, unit })
    }

    /// Interpolate toward `to`; returns `None` when the units cannot be mixed.
    ///
    /// A zero start value is unit-agnostic and adopts the target unit.
    fn lerp(self, to: Self, t: f64) -> Option<Self> {
        let from = if self.unit != to.unit && self.value == 0.0 {
            Self {
                value: 0.0,
                unit: to.unit,
            }
        } else {
            self
        };
        if from.unit != to.unit {
            return None;
        }
        Some(Self {
            value: from.value + (to.value - from.value) * t,
            unit: to.unit,
        })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", fmt_num(self.value), self.unit.suffix())
    }
}

/// Polygon clip region; vertices are percentages of the element box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipPath {
    pub points: Vec<Point>,
}

impl ClipPath {
    /// Unclipped rectangle.
    pub fn full() -> Self {
        Self::rect(0.0, 0.0, 100.0, 100.0)
    }

    /// Axis-aligned rectangle polygon, clockwise from top-left.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            points: vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
        }
    }

    /// Parse `polygon(x% y%, ...)`.
    pub fn parse(s: &str) -> LanderResult<Self> {
        let inner = s
            .trim()
            .strip_prefix("polygon(")
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(|| LanderError::animation(format!("clip path '{s}' is not a polygon()")))?;
        let mut points = Vec::new();
        for vertex in inner.split(',') {
            let mut parts = vertex.split_whitespace();
            let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(LanderError::animation(format!(
                    "clip path vertex '{}' must have two coordinates",
                    vertex.trim()
                )));
            };
            let x = Length::parse(x)?;
            let y = Length::parse(y)?;
            if x.unit != Unit::Percent || y.unit != Unit::Percent {
                return Err(LanderError::animation(
                    "clip path coordinates must be percentages",
                ));
            }
            points.push(Point::new(x.value, y.value));
        }
        if points.len() < 3 {
            return Err(LanderError::animation(
                "clip path polygon needs at least three vertices",
            ));
        }
        Ok(Self { points })
    }

    /// Area of the clipped region as a fraction of the element box.
    pub fn coverage(&self) -> f64 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        (twice.abs() / 2.0) / 10_000.0
    }
}

impl fmt::Display for ClipPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("polygon(")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}% {}%", fmt_num(p.x), fmt_num(p.y))?;
        }
        f.write_str(")")
    }
}

/// A style value. JSON form is a bare number or its CSS text.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Number(f64),
    Length(Length),
    Pair(Length, Length),
    Color(Rgba8),
    ClipPath(ClipPath),
    Source(String),
}

impl PropValue {
    /// Parse CSS-ish text without knowing the target property.
    pub fn parse(s: &str) -> LanderResult<Self> {
        let t = s.trim();
        if t.starts_with('#') {
            return Ok(Self::Color(Rgba8::parse_hex(t)?));
        }
        if t.starts_with("polygon(") {
            return Ok(Self::ClipPath(ClipPath::parse(t)?));
        }
        let parts: Vec<&str> = t.split_whitespace().collect();
        match parts.as_slice() {
            [one] => match Length::parse(one) {
                Ok(len) if one.ends_with(['%', 'x', 'w']) => Ok(Self::Length(len)),
                Ok(len) => Ok(Self::Number(len.value)),
                Err(_) => Ok(Self::Source(t.to_owned())),
            },
            [a, b] => match (Length::parse(a), Length::parse(b)) {
                (Ok(a), Ok(b)) => Ok(Self::Pair(a, b)),
                _ => Ok(Self::Source(t.to_owned())),
            },
            _ => Ok(Self::Source(t.to_owned())),
        }
    }

    /// Coerce into the shape `prop` expects (bare numbers become `px` lengths, etc).
    pub fn coerce(self, prop: Prop) -> LanderResult<Self> {
        let out = match (prop.kind(), self) {
            (ValueKind::Number, v @ Self::Number(_)) => v,
            (ValueKind::Length, Self::Number(n)) => Self::Length(Length::px(n)),
            (ValueKind::Length, v @ Self::Length(_)) => v,
            (ValueKind::Pair, Self::Length(l)) => Self::Pair(l, Length::percent(50.0)),
            (ValueKind::Pair, v @ Self::Pair(..)) => v,
            (ValueKind::Color, v @ Self::Color(_)) => v,
            (ValueKind::ClipPath, v @ Self::ClipPath(_)) => v,
            (ValueKind::Source, Self::Source(s)) => Self::Source(s),
            (ValueKind::Source, other) => Self::Source(other.to_string()),
            (_, other) => {
                return Err(LanderError::animation(format!(
                    "value '{other}' does not fit property '{}'",
                    prop.as_str()
                )));
            }
        };
        if let Self::Number(n) = out
            && !n.is_finite()
        {
            return Err(LanderError::animation(format!(
                "value for '{}' is not finite",
                prop.as_str()
            )));
        }
        Ok(out)
    }

    /// Interpolate between two values of the same shape.
    ///
    /// Shapes that cannot be blended (mixed units, different vertex counts, sources) hold
    /// `from` until `t` reaches 1.
    pub fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        let blended = match (from, to) {
            (Self::Number(a), Self::Number(b)) => Some(Self::Number(a + (b - a) * t)),
            (Self::Length(a), Self::Length(b)) => a.lerp(*b, t).map(Self::Length),
            (Self::Pair(ax, ay), Self::Pair(bx, by)) => match (ax.lerp(*bx, t), ay.lerp(*by, t)) {
                (Some(x), Some(y)) => Some(Self::Pair(x, y)),
                _ => None,
            },
            (Self::Color(a), Self::Color(b)) => Some(Self::Color(a.lerp(*b, t))),
            (Self::ClipPath(a), Self::ClipPath(b)) if a.points.len() == b.points.len() => {
                Some(Self::ClipPath(ClipPath {
                    points: a
                        .points
                        .iter()
                        .zip(&b.points)
                        .map(|(p, q)| p.lerp(*q, t))
                        .collect(),
                }))
            }
            _ => None,
        };
        match blended {
            Some(v) if t < 1.0 => v,
            _ if t >= 1.0 => to.clone(),
            _ => from.clone(),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&fmt_num(*n)),
            Self::Length(l) => write!(f, "{l}"),
            Self::Pair(a, b) => write!(f, "{a} {b}"),
            Self::Color(c) => write!(f, "{c}"),
            Self::ClipPath(c) => write!(f, "{c}"),
            Self::Source(s) => f.write_str(s),
        }
    }
}

impl Serialize for PropValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Number(n) => serializer.serialize_f64(*n),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(Self::Number(n)),
            Repr::Str(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

fn fmt_num(v: f64) -> String {
    let rounded = (v * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    format!("{rounded}")
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
