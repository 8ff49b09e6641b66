//! Loosely-typed inputs
//!
//! Navigation requests and settings arrive from markup attributes, config
//! files or code, so every field may be a boolean, a number or a string.
//! The coercions here decide what counts as a usable value; anything they
//! reject is treated as absent by the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::Direction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Non-negative integer, accepting integral floats and numeric strings
    pub fn as_non_negative_int(&self) -> Option<u64> {
        match self {
            RawValue::Int(n) => u64::try_from(*n).ok(),
            RawValue::Float(f) => integral(*f),
            RawValue::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            RawValue::Bool(_) => None,
        }
    }

    /// Literal boolean or case-insensitive `"true"` / `"false"`
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            RawValue::Bool(b) => Some(*b),
            RawValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            RawValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn as_direction(&self) -> Option<Direction> {
        match self {
            RawValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

fn integral(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(n) => write!(f, "{n}"),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v.into())
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Int(v.into())
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<Direction> for RawValue {
    fn from(v: Direction) -> Self {
        RawValue::Text(v.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_int() {
        assert_eq!(RawValue::from(300).as_non_negative_int(), Some(300));
        assert_eq!(RawValue::from(0).as_non_negative_int(), Some(0));
        assert_eq!(RawValue::from(250.0).as_non_negative_int(), Some(250));
        assert_eq!(RawValue::from(" 120 ").as_non_negative_int(), Some(120));
        assert_eq!(RawValue::from("1e3").as_non_negative_int(), Some(1000));

        assert_eq!(RawValue::from(-1).as_non_negative_int(), None);
        assert_eq!(RawValue::from(12.5).as_non_negative_int(), None);
        assert_eq!(RawValue::from("12.5").as_non_negative_int(), None);
        assert_eq!(RawValue::from("fast").as_non_negative_int(), None);
        assert_eq!(RawValue::from(f64::NAN).as_non_negative_int(), None);
        assert_eq!(RawValue::from(true).as_non_negative_int(), None);
    }

    #[test]
    fn test_flag() {
        assert_eq!(RawValue::from(true).as_flag(), Some(true));
        assert_eq!(RawValue::from("TRUE").as_flag(), Some(true));
        assert_eq!(RawValue::from("False").as_flag(), Some(false));
        assert_eq!(RawValue::from("yes").as_flag(), None);
        assert_eq!(RawValue::from(1).as_flag(), None);
    }

    #[test]
    fn test_direction() {
        assert_eq!(RawValue::from("fadeleft").as_direction(), Some(Direction::FadeLeft));
        assert_eq!(RawValue::from("sideways").as_direction(), None);
        assert_eq!(RawValue::from(3).as_direction(), None);
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[true, 5, 2.5, "left"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Bool(true),
                RawValue::Int(5),
                RawValue::Float(2.5),
                RawValue::Text("left".into()),
            ]
        );
    }
}
