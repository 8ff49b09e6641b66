//! Three-phase style plans
//!
//! Each screen in a switch gets a `pre` delta applied instantly, an
//! `animate` delta that the view layer tweens to, and a `post` delta applied
//! instantly once the tween completes.

use serde::Serialize;

use crate::geometry::Vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Block,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Absolute,
    Fixed,
}

/// Sparse set of style properties; `None` means "leave as is"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(rename = "z-index", skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Horizontal offset in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<i64>,
    /// Vertical offset in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<i64>,
}

impl StyleDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` on top of `self`
    pub fn merge(&mut self, other: &StyleDelta) {
        self.display = other.display.or(self.display);
        self.position = other.position.or(self.position);
        self.z_index = other.z_index.or(self.z_index);
        self.opacity = other.opacity.or(self.opacity);
        self.left = other.left.or(self.left);
        self.top = other.top.or(self.top);
    }

    pub fn merged(&self, other: &StyleDelta) -> StyleDelta {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    fn stacked(mut self, position: Position, z_index: i32) -> Self {
        self.position = Some(position);
        self.z_index = Some(z_index);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StylePlan {
    pub pre: StyleDelta,
    pub animate: StyleDelta,
    pub post: StyleDelta,
}

impl StylePlan {
    /// Style a screen holds once every phase has been applied
    pub fn settled(&self) -> StyleDelta {
        self.pre.merged(&self.animate).merged(&self.post)
    }
}

/// Plan for the entering screen: starts at `offset` and slides to (0, 0),
/// optionally fading in, then stacks above the exiting screen.
pub fn target_plan(offset: Vector, fade: bool) -> StylePlan {
    let mut pre = StyleDelta {
        display: Some(Display::Block),
        left: Some(offset.x),
        top: Some(offset.y),
        ..Default::default()
    };
    let mut animate = StyleDelta::default();

    if fade {
        pre.opacity = Some(0.0);
        animate.opacity = Some(1.0);
    }
    if offset.x != 0 {
        animate.left = Some(0);
    }
    if offset.y != 0 {
        animate.top = Some(0);
    }

    StylePlan {
        pre,
        animate,
        post: StyleDelta::default().stacked(Position::Absolute, 2),
    }
}

/// Plan for the exiting screen: slides from (0, 0) to `offset`, optionally
/// fading out, then hides with opacity restored for its next entrance.
pub fn current_plan(offset: Vector, fade: bool) -> StylePlan {
    let mut pre = StyleDelta::default();
    let mut animate = StyleDelta {
        left: Some(offset.x),
        top: Some(offset.y),
        ..Default::default()
    };
    let mut post = StyleDelta {
        display: Some(Display::None),
        ..Default::default()
    };

    if fade {
        animate.opacity = Some(0.0);
        post.opacity = Some(1.0);
    }

    // Sliding screens drop behind before they move; a pure fade only after
    if offset.is_zero() {
        post = post.stacked(Position::Fixed, 1);
    } else {
        pre = pre.stacked(Position::Fixed, 1);
    }

    StylePlan { pre, animate, post }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Direction;

    fn offset_for(d: Direction) -> Vector {
        let m = d.motion();
        Vector {
            x: 1500 * m.dx.as_i64(),
            y: 900 * m.dy.as_i64(),
        }
    }

    #[test]
    fn test_entering_screen_lands_at_origin() {
        for d in Direction::ALL {
            let plan = target_plan(offset_for(d), d.has_fade());
            let end = plan.pre.merged(&plan.animate);
            assert_eq!(end.left, Some(0), "{d}");
            assert_eq!(end.top, Some(0), "{d}");
            if plan.pre.left != Some(0) {
                assert_eq!(plan.animate.left, Some(0), "{d}");
            }
            if plan.pre.top != Some(0) {
                assert_eq!(plan.animate.top, Some(0), "{d}");
            }
        }
    }

    #[test]
    fn test_exiting_screen_ends_at_offset_and_hidden() {
        for d in Direction::ALL {
            let offset = offset_for(d);
            let plan = current_plan(offset, d.has_fade());
            assert_eq!(plan.pre.left, None, "{d}");
            assert_eq!(plan.pre.top, None, "{d}");
            assert_eq!(plan.animate.left, Some(offset.x), "{d}");
            assert_eq!(plan.animate.top, Some(offset.y), "{d}");

            let settled = plan.settled();
            assert_eq!(settled.display, Some(Display::None), "{d}");
            assert_eq!(settled.position, Some(Position::Fixed), "{d}");
            assert_eq!(settled.z_index, Some(1), "{d}");
        }
    }

    #[test]
    fn test_entering_screen_stacks_above() {
        let plan = target_plan(Vector { x: -1200, y: 0 }, false);
        assert_eq!(plan.post.position, Some(Position::Absolute));
        assert_eq!(plan.post.z_index, Some(2));
        assert_eq!(plan.pre.display, Some(Display::Block));
        assert_eq!(plan.pre.opacity, None);
        assert_eq!(plan.animate.top, None);
    }

    #[test]
    fn test_slide_drops_behind_before_moving() {
        let plan = current_plan(Vector { x: 1200, y: 0 }, false);
        assert_eq!(plan.pre.position, Some(Position::Fixed));
        assert_eq!(plan.pre.z_index, Some(1));
        assert_eq!(plan.post.position, None);
        assert_eq!(plan.post.opacity, None);
    }

    #[test]
    fn test_pure_fade_drops_behind_after_tween() {
        let plan = current_plan(Vector::ZERO, true);
        assert!(plan.pre.is_empty());
        assert_eq!(plan.animate.opacity, Some(0.0));
        assert_eq!(plan.post.position, Some(Position::Fixed));
        assert_eq!(plan.post.z_index, Some(1));
        assert_eq!(plan.post.opacity, Some(1.0));
    }

    #[test]
    fn test_fade_composes_with_slide() {
        let target = target_plan(Vector { x: 0, y: -900 }, true);
        assert_eq!(target.pre.opacity, Some(0.0));
        assert_eq!(target.animate.opacity, Some(1.0));
        assert_eq!(target.animate.top, Some(0));

        let current = current_plan(Vector { x: 0, y: 900 }, true);
        assert_eq!(current.pre.position, Some(Position::Fixed));
        assert_eq!(current.animate.opacity, Some(0.0));
        assert_eq!(current.animate.top, Some(900));
        assert_eq!(current.post.opacity, Some(1.0));
    }

    #[test]
    fn test_serializes_as_css_properties() {
        let plan = current_plan(Vector { x: -10, y: 0 }, true);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["pre"]["position"], "fixed");
        assert_eq!(json["pre"]["z-index"], 1);
        assert_eq!(json["post"]["display"], "none");
        assert!(json["pre"].get("opacity").is_none());
    }
}
