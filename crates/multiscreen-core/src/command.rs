//! Animation commands
//!
//! A command names how a screen enters or leaves: one of eight compass
//! directions, the same eight combined with a fade, or a bare fade.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Signed unit step along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    #[inline]
    pub fn as_i64(self) -> i64 {
        match self {
            Sign::Negative => -1,
            Sign::Zero => 0,
            Sign::Positive => 1,
        }
    }
}

/// Motion described by a command: which edge the screen travels to or from,
/// and whether its opacity is tweened along the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Motion {
    /// Horizontal edge (negative = left)
    pub dx: Sign,
    /// Vertical edge (negative = top)
    pub dy: Sign,
    pub fade: bool,
}

impl Motion {
    const fn new(dx: Sign, dy: Sign, fade: bool) -> Self {
        Self { dx, dy, fade }
    }
}

/// Transition command for an entering or exiting screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Fade,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
    FadeTop,
    FadeTopRight,
    FadeRight,
    FadeBottomRight,
    FadeBottom,
    FadeBottomLeft,
    FadeLeft,
    FadeTopLeft,
}

impl Direction {
    /// Every command, in the order they are documented
    pub const ALL: [Direction; 17] = [
        Direction::Fade,
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::Left,
        Direction::TopLeft,
        Direction::FadeTop,
        Direction::FadeTopRight,
        Direction::FadeRight,
        Direction::FadeBottomRight,
        Direction::FadeBottom,
        Direction::FadeBottomLeft,
        Direction::FadeLeft,
        Direction::FadeTopLeft,
    ];

    /// Motion table entry for this command
    pub const fn motion(self) -> Motion {
        use Sign::{Negative as N, Positive as P, Zero as Z};
        match self {
            Direction::Fade => Motion::new(Z, Z, true),
            Direction::Top => Motion::new(Z, N, false),
            Direction::TopRight => Motion::new(P, N, false),
            Direction::Right => Motion::new(P, Z, false),
            Direction::BottomRight => Motion::new(P, P, false),
            Direction::Bottom => Motion::new(Z, P, false),
            Direction::BottomLeft => Motion::new(N, P, false),
            Direction::Left => Motion::new(N, Z, false),
            Direction::TopLeft => Motion::new(N, N, false),
            Direction::FadeTop => Motion::new(Z, N, true),
            Direction::FadeTopRight => Motion::new(P, N, true),
            Direction::FadeRight => Motion::new(P, Z, true),
            Direction::FadeBottomRight => Motion::new(P, P, true),
            Direction::FadeBottom => Motion::new(Z, P, true),
            Direction::FadeBottomLeft => Motion::new(N, P, true),
            Direction::FadeLeft => Motion::new(N, Z, true),
            Direction::FadeTopLeft => Motion::new(N, N, true),
        }
    }

    #[inline]
    pub fn has_fade(self) -> bool {
        self.motion().fade
    }

    /// True when the screen travels to or from the left edge
    #[inline]
    pub fn is_left(self) -> bool {
        self.motion().dx == Sign::Negative
    }

    /// True when the screen travels to or from the top edge
    #[inline]
    pub fn is_top(self) -> bool {
        self.motion().dy == Sign::Negative
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Fade => "fade",
            Direction::Top => "top",
            Direction::TopRight => "topright",
            Direction::Right => "right",
            Direction::BottomRight => "bottomright",
            Direction::Bottom => "bottom",
            Direction::BottomLeft => "bottomleft",
            Direction::Left => "left",
            Direction::TopLeft => "topleft",
            Direction::FadeTop => "fadetop",
            Direction::FadeTopRight => "fadetopright",
            Direction::FadeRight => "faderight",
            Direction::FadeBottomRight => "fadebottomright",
            Direction::FadeBottom => "fadebottom",
            Direction::FadeBottomLeft => "fadebottomleft",
            Direction::FadeLeft => "fadeleft",
            Direction::FadeTopLeft => "fadetopleft",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    /// Commands are matched exactly; there is no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::InvalidCommand(s.to_string()))
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
