//! Source waveforms.
//!
//! A voltage source value is compiled once, at construction time, into a
//! [`Waveform`]. Evaluating a waveform has no side effects, so the same
//! value can be sampled at any `t >= 0` in any order.

use std::f64::consts::PI;

use tracing::warn;

use super::ElementValue;
use crate::dsl::parse_value;

/// Time-dependent source voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// Constant value
    Constant(f64),
    /// `offset + amplitude * sin(2π * frequency * t)`
    Sine {
        offset: f64,
        amplitude: f64,
        frequency: f64,
    },
}

impl Waveform {
    /// Compile a source specification.
    ///
    /// Unrecognised text yields a zero source and a warning.
    pub fn compile(spec: &ElementValue) -> Self {
        match spec {
            ElementValue::Number(v) => Waveform::Constant(*v),
            ElementValue::Text(text) => Self::parse(text).unwrap_or_else(|| {
                warn!(spec = %text, "unrecognised source specification, using 0 V");
                Waveform::Constant(0.0)
            }),
        }
    }

    /// Parse a numeric literal or a `SIN(V0 VP F)` descriptor.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(v) = parse_value(text) {
            return Some(Waveform::Constant(v));
        }
        parse_sine(text)
    }

    /// Check that every parameter is finite.
    pub fn is_finite(&self) -> bool {
        match *self {
            Waveform::Constant(v) => v.is_finite(),
            Waveform::Sine {
                offset,
                amplitude,
                frequency,
            } => offset.is_finite() && amplitude.is_finite() && frequency.is_finite(),
        }
    }

    /// Source voltage at time `t`.
    pub fn at(&self, t: f64) -> f64 {
        match *self {
            Waveform::Constant(v) => v,
            Waveform::Sine {
                offset,
                amplitude,
                frequency,
            } => offset + amplitude * (2.0 * PI * frequency * t).sin(),
        }
    }
}

/// `SIN(` prefix (any case), exactly three whitespace-separated numbers,
/// then `)`. Anything after the closing parenthesis is ignored.
fn parse_sine(text: &str) -> Option<Waveform> {
    let head = text.get(..4)?;
    if !head.eq_ignore_ascii_case("sin(") {
        return None;
    }
    let rest = &text[4..];
    let inner = &rest[..rest.find(')')?];

    let tokens: Vec<&str> = inner.split_whitespace().collect();
    if tokens.len() != 3 || tokens.iter().any(|tok| tok.contains(',')) {
        return None;
    }

    Some(Waveform::Sine {
        offset: parse_value(tokens[0])?,
        amplitude: parse_value(tokens[1])?,
        frequency: parse_value(tokens[2])?,
    })
}
