//! Off-canvas travel vectors for entering and exiting screens

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::{Direction, Sign};
use crate::error::Error;

/// Rendered box size in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = Error;

    /// Parses `WIDTHxHEIGHT`, e.g. `1280x720`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNumeric {
            field: "size",
            value: s.to_string(),
        };
        let (w, h) = s.split_once(|c| c == 'x' || c == 'X').ok_or_else(invalid)?;
        Ok(Size {
            width: w.trim().parse().map_err(|_| invalid())?,
            height: h.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Signed pixel offset from a screen's natural position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Vector {
    pub x: i64,
    pub y: i64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0, y: 0 };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Offsets for both screens of a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Movement {
    /// Where the entering screen starts
    pub enter: Vector,
    /// Where the exiting screen ends
    pub exit: Vector,
}

/// Sizes sampled from the view layer at switch time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub current: Size,
    pub target: Size,
    pub viewport: Size,
}

/// Extra travel beyond the edge, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buffers {
    pub vertical: u64,
    pub horizontal: u64,
}

/// Compute travel vectors for the entering and exiting screen.
///
/// On each axis the distance is the larger of the relevant screen dimension
/// and the viewport dimension, plus the buffer. The relevant width is the
/// target's when the command comes from the left and the current screen's
/// otherwise; heights follow the same rule for the top edge.
///
/// The rule picks by command edge, not by role, so it holds for the exit
/// vector too: a screen leaving towards the left travels the target's width.
pub fn compute_movement(
    layout: Layout,
    enter: Direction,
    exit: Direction,
    buffers: Buffers,
) -> Movement {
    Movement {
        enter: vector(layout, enter, buffers),
        exit: vector(layout, exit, buffers),
    }
}

fn vector(layout: Layout, direction: Direction, buffers: Buffers) -> Vector {
    let motion = direction.motion();

    let width = if direction.is_left() {
        layout.target.width
    } else {
        layout.current.width
    };
    let height = if direction.is_top() {
        layout.target.height
    } else {
        layout.current.height
    };

    Vector {
        x: offset(motion.dx, width, layout.viewport.width, buffers.horizontal),
        y: offset(motion.dy, height, layout.viewport.height, buffers.vertical),
    }
}

fn offset(sign: Sign, dimension: u32, viewport: u32, buffer: u64) -> i64 {
    if sign == Sign::Zero {
        return 0;
    }
    let travel = u64::from(dimension.max(viewport)).saturating_add(buffer);
    i64::try_from(travel).unwrap_or(i64::MAX) * sign.as_i64()
}

/// Travel distance on one axis before the sign is applied
pub fn travel_distance(dimension: u32, viewport: u32, buffer: u64) -> u64 {
    offset(Sign::Positive, dimension, viewport, buffer).unsigned_abs()
}
