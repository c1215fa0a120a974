//! Interpolable values.
//!
//! A closed union over the kinds the engine knows how to blend. Each kind
//! defines three operations: `interpolate`, `snap` and `add` (relative offsets).
//! Mismatched kinds fail soft: interpolation yields the end value.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Vec2,
    Vec3,
    Color,
    Int,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// 2D vector
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// RGBA color (linear by convention)
    Color([f32; 4]),

    /// Integer; blended in float space and rounded.
    Int(i32),
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn lerp_n<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = a;
    for i in 0..N {
        out[i] = lerp_f32(a[i], b[i], t);
    }
    out
}

#[inline]
fn round_n<const N: usize>(mut v: [f32; N]) -> [f32; N] {
    for c in v.iter_mut() {
        *c = c.round();
    }
    v
}

#[inline]
fn add_n<const N: usize>(mut a: [f32; N], b: [f32; N]) -> [f32; N] {
    for i in 0..N {
        a[i] += b[i];
    }
    a
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Color(_) => ValueKind::Color,
            Value::Int(_) => ValueKind::Int,
        }
    }

    /// Zero of the given kind (transparent black for colors).
    pub fn zero(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Vec2 => Value::Vec2([0.0; 2]),
            ValueKind::Vec3 => Value::Vec3([0.0; 3]),
            ValueKind::Color => Value::Color([0.0; 4]),
            ValueKind::Int => Value::Int(0),
        }
    }

    /// Blend `start` toward `end` by `t`. Component-wise for vectors and colors.
    /// Returns `end` unchanged when the kinds differ.
    #[inline]
    pub fn interpolate(start: &Value, end: &Value, t: f32) -> Value {
        match (start, end) {
            (Value::Float(a), Value::Float(b)) => Value::Float(lerp_f32(*a, *b, t)),
            (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(lerp_n(*a, *b, t)),
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(lerp_n(*a, *b, t)),
            (Value::Color(a), Value::Color(b)) => Value::Color(lerp_n(*a, *b, t)),
            (Value::Int(a), Value::Int(b)) => {
                Value::Int(lerp_f32(*a as f32, *b as f32, t).round() as i32)
            }
            _ => *end,
        }
    }

    /// Round every numeric component to the nearest integer.
    #[inline]
    pub fn snap(&self) -> Value {
        match self {
            Value::Float(v) => Value::Float(v.round()),
            Value::Vec2(v) => Value::Vec2(round_n(*v)),
            Value::Vec3(v) => Value::Vec3(round_n(*v)),
            Value::Color(v) => Value::Color(round_n(*v)),
            Value::Int(v) => Value::Int(*v),
        }
    }

    /// Component-wise sum, used to resolve relative offsets.
    /// Mismatched kinds yield `self`.
    #[inline]
    pub fn add(&self, offset: &Value) -> Value {
        match (self, offset) {
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(add_n(*a, *b)),
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(add_n(*a, *b)),
            (Value::Color(a), Value::Color(b)) => Value::Color(add_n(*a, *b)),
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(*b)),
            _ => *self,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v as f32)
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Value::Vec2(v)
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Value::Vec3(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_midpoint_is_exact() {
        assert_eq!(
            Value::interpolate(&Value::Float(0.0), &Value::Float(10.0), 0.5),
            Value::Float(5.0)
        );
    }

    #[test]
    fn vectors_blend_per_component() {
        let v = Value::interpolate(&Value::Vec3([0.0, 2.0, -4.0]), &Value::Vec3([4.0, 2.0, 4.0]), 0.25);
        assert_eq!(v, Value::Vec3([1.0, 2.0, -2.0]));
        let c = Value::interpolate(
            &Value::Color([0.0, 0.0, 0.0, 1.0]),
            &Value::Color([1.0, 0.5, 0.0, 0.0]),
            0.5,
        );
        assert_eq!(c, Value::Color([0.5, 0.25, 0.0, 0.5]));
    }

    #[test]
    fn ints_round_after_blending() {
        assert_eq!(
            Value::interpolate(&Value::Int(0), &Value::Int(3), 0.5),
            Value::Int(2)
        );
    }

    #[test]
    fn mismatched_kinds_pass_end_through() {
        let end = Value::Vec2([3.0, 4.0]);
        assert_eq!(Value::interpolate(&Value::Float(1.0), &end, 0.3), end);
    }

    #[test]
    fn snap_rounds_components() {
        assert_eq!(Value::Vec2([1.4, 2.6]).snap(), Value::Vec2([1.0, 3.0]));
        assert_eq!(Value::Float(-0.6).snap(), Value::Float(-1.0));
    }

    #[test]
    fn add_offsets() {
        assert_eq!(
            Value::Vec2([1.0, 1.0]).add(&Value::Vec2([2.0, -1.0])),
            Value::Vec2([3.0, 0.0])
        );
        assert_eq!(Value::Int(4).add(&Value::Float(1.0)), Value::Int(4));
    }

    #[test]
    fn serde_shape_is_tagged() {
        let s = serde_json::to_string(&Value::Float(1.5)).unwrap();
        assert_eq!(s, r#"{"type":"Float","data":1.5}"#);
    }
}
