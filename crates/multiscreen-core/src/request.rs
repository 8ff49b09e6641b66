//! Navigation requests and their resolution
//!
//! A [`RawSwitchRequest`] carries whatever the trigger supplied. Resolving it
//! walks each field's fallback chain (specific value, then the shared
//! generic value, then the defaults store) and produces a fully-specified
//! [`SwitchRequest`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::command::Direction;
use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::host::Screen;
use crate::registry::Registry;
use crate::value::RawValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSwitchRequest {
    pub target: Option<String>,
    pub enter: Option<RawValue>,
    pub exit: Option<RawValue>,
    /// Applies to both enter and exit unless they are given
    pub animation: Option<RawValue>,
    pub enter_time: Option<RawValue>,
    pub exit_time: Option<RawValue>,
    pub time: Option<RawValue>,
    pub delay: Option<RawValue>,
    pub vertical_distance: Option<RawValue>,
    pub horizontal_distance: Option<RawValue>,
    pub distance: Option<RawValue>,
    pub scroll_time: Option<RawValue>,
    /// Follow-up switch queued once this one completes
    pub chain: Option<Box<RawSwitchRequest>>,
}

impl RawSwitchRequest {
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Default::default()
        }
    }

    pub fn enter(mut self, v: impl Into<RawValue>) -> Self {
        self.enter = Some(v.into());
        self
    }

    pub fn exit(mut self, v: impl Into<RawValue>) -> Self {
        self.exit = Some(v.into());
        self
    }

    pub fn animation(mut self, v: impl Into<RawValue>) -> Self {
        self.animation = Some(v.into());
        self
    }

    pub fn enter_time(mut self, v: impl Into<RawValue>) -> Self {
        self.enter_time = Some(v.into());
        self
    }

    pub fn exit_time(mut self, v: impl Into<RawValue>) -> Self {
        self.exit_time = Some(v.into());
        self
    }

    pub fn time(mut self, v: impl Into<RawValue>) -> Self {
        self.time = Some(v.into());
        self
    }

    pub fn delay(mut self, v: impl Into<RawValue>) -> Self {
        self.delay = Some(v.into());
        self
    }

    pub fn vertical_distance(mut self, v: impl Into<RawValue>) -> Self {
        self.vertical_distance = Some(v.into());
        self
    }

    pub fn horizontal_distance(mut self, v: impl Into<RawValue>) -> Self {
        self.horizontal_distance = Some(v.into());
        self
    }

    pub fn distance(mut self, v: impl Into<RawValue>) -> Self {
        self.distance = Some(v.into());
        self
    }

    pub fn scroll_time(mut self, v: impl Into<RawValue>) -> Self {
        self.scroll_time = Some(v.into());
        self
    }

    pub fn then(mut self, next: RawSwitchRequest) -> Self {
        self.chain = Some(Box::new(next));
        self
    }
}

/// A navigation request with every field resolved
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchRequest {
    pub target_id: String,
    pub enter: Direction,
    pub exit: Direction,
    pub enter_time: Duration,
    pub exit_time: Duration,
    pub delay: bool,
    pub vertical_distance: u64,
    pub horizontal_distance: u64,
    pub scroll_time: Duration,
    pub chained: Option<Box<RawSwitchRequest>>,
}

impl SwitchRequest {
    /// Resolve `raw` against the registered screens and the defaults store.
    ///
    /// Only the target can cause a rejection: it must name a registered
    /// screen other than `current`. Every other invalid field is replaced
    /// through its fallback chain.
    pub fn resolve<S: Screen>(
        raw: &RawSwitchRequest,
        registry: &Registry<S>,
        current: Option<&str>,
        defaults: &mut Defaults,
    ) -> Result<Self> {
        let target_id = raw.target.as_deref().ok_or(Error::MissingTarget)?;
        if !registry.contains(target_id) {
            return Err(Error::UnknownScreen(target_id.to_string()));
        }
        if current == Some(target_id) {
            return Err(Error::AlreadyCurrent(target_id.to_string()));
        }

        let enter = chain(
            &[("enter", &raw.enter), ("animation", &raw.animation)],
            RawValue::as_direction,
        )
        .unwrap_or_else(|| defaults.enter_animation());
        let exit = chain(
            &[("exit", &raw.exit), ("animation", &raw.animation)],
            RawValue::as_direction,
        )
        .unwrap_or_else(|| defaults.exit_animation());

        let enter_time = chain(
            &[("enter_time", &raw.enter_time), ("time", &raw.time)],
            RawValue::as_non_negative_int,
        )
        .map(Duration::from_millis)
        .unwrap_or_else(|| defaults.enter_time());
        let exit_time = chain(
            &[("exit_time", &raw.exit_time), ("time", &raw.time)],
            RawValue::as_non_negative_int,
        )
        .map(Duration::from_millis)
        .unwrap_or_else(|| defaults.exit_time());
        let scroll_time = chain(&[("scroll_time", &raw.scroll_time)], RawValue::as_non_negative_int)
            .map(Duration::from_millis)
            .unwrap_or_else(|| defaults.scroll_time());

        let delay = chain(&[("delay", &raw.delay)], RawValue::as_flag)
            .unwrap_or_else(|| defaults.delay());

        let vertical_distance = chain(
            &[("vertical_distance", &raw.vertical_distance), ("distance", &raw.distance)],
            RawValue::as_non_negative_int,
        )
        .unwrap_or_else(|| defaults.vertical_distance());
        let horizontal_distance = chain(
            &[("horizontal_distance", &raw.horizontal_distance), ("distance", &raw.distance)],
            RawValue::as_non_negative_int,
        )
        .unwrap_or_else(|| defaults.horizontal_distance());

        Ok(SwitchRequest {
            target_id: target_id.to_string(),
            enter,
            exit,
            enter_time,
            exit_time,
            delay,
            vertical_distance,
            horizontal_distance,
            scroll_time,
            chained: raw.chain.clone(),
        })
    }
}

/// First usable value along a fallback chain. Supplied but unusable values
/// are skipped with a warning.
fn chain<T>(
    links: &[(&str, &Option<RawValue>)],
    parse: impl Fn(&RawValue) -> Option<T>,
) -> Option<T> {
    links.iter().find_map(|(name, value)| {
        let Some(value) = *value else {
            return None;
        };
        let parsed = parse(value);
        if parsed.is_none() {
            warn!("Ignoring invalid {} value {}, falling back", name, value);
        }
        parsed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::Settings;
    use crate::geometry::Size;

    #[derive(Debug, Clone)]
    struct Panel(&'static str);

    impl Screen for Panel {
        fn id(&self) -> Option<&str> {
            Some(self.0)
        }

        fn outer_size(&self) -> Size {
            Size::new(800, 600)
        }
    }

    fn registry() -> Registry<Panel> {
        let mut registry = Registry::new();
        registry.register([Panel("home"), Panel("about"), Panel("contact")]);
        registry
    }

    fn resolve(raw: &RawSwitchRequest, defaults: &mut Defaults) -> Result<SwitchRequest> {
        SwitchRequest::resolve(raw, &registry(), Some("home"), defaults)
    }

    #[test]
    fn test_rejects_bad_targets() {
        let mut defaults = Defaults::new();
        assert!(matches!(
            resolve(&RawSwitchRequest::default(), &mut defaults),
            Err(Error::MissingTarget)
        ));
        assert!(matches!(
            resolve(&RawSwitchRequest::to("blog"), &mut defaults),
            Err(Error::UnknownScreen(id)) if id == "blog"
        ));
        assert!(matches!(
            resolve(&RawSwitchRequest::to("home"), &mut defaults),
            Err(Error::AlreadyCurrent(id)) if id == "home"
        ));
    }

    #[test]
    fn test_bare_request_uses_defaults() {
        let mut defaults = Defaults::new();
        let req = resolve(&RawSwitchRequest::to("about"), &mut defaults).unwrap();
        assert_eq!(req.target_id, "about");
        assert_eq!(req.enter, Direction::Fade);
        assert_eq!(req.exit, Direction::Fade);
        assert_eq!(req.enter_time, Duration::from_millis(500));
        assert_eq!(req.exit_time, Duration::from_millis(500));
        assert_eq!(req.scroll_time, Duration::from_millis(200));
        assert!(!req.delay);
        assert_eq!(req.vertical_distance, 200);
        assert_eq!(req.horizontal_distance, 200);
        assert_eq!(req.chained, None);
    }

    #[test]
    fn test_specific_values_win() {
        let mut defaults = Defaults::new();
        let raw = RawSwitchRequest::to("about")
            .enter("left")
            .exit("right")
            .animation("top")
            .enter_time(300)
            .exit_time("150")
            .time(900)
            .delay("TRUE")
            .vertical_distance(10)
            .horizontal_distance(20)
            .distance(99)
            .scroll_time(0);
        let req = resolve(&raw, &mut defaults).unwrap();
        assert_eq!(req.enter, Direction::Left);
        assert_eq!(req.exit, Direction::Right);
        assert_eq!(req.enter_time, Duration::from_millis(300));
        assert_eq!(req.exit_time, Duration::from_millis(150));
        assert!(req.delay);
        assert_eq!(req.vertical_distance, 10);
        assert_eq!(req.horizontal_distance, 20);
        assert_eq!(req.scroll_time, Duration::ZERO);
    }

    #[test]
    fn test_generic_values_fill_both_sides() {
        let mut defaults = Defaults::new();
        let raw = RawSwitchRequest::to("about")
            .animation("fadebottom")
            .time(250)
            .distance(40);
        let req = resolve(&raw, &mut defaults).unwrap();
        assert_eq!(req.enter, Direction::FadeBottom);
        assert_eq!(req.exit, Direction::FadeBottom);
        assert_eq!(req.enter_time, Duration::from_millis(250));
        assert_eq!(req.exit_time, Duration::from_millis(250));
        assert_eq!(req.vertical_distance, 40);
        assert_eq!(req.horizontal_distance, 40);
    }

    #[test]
    fn test_invalid_values_fall_through_the_chain() {
        let mut defaults = Defaults::new();
        Settings::new()
            .with("default_exit_animation", "bottom")
            .with("default_exit_time", 700)
            .with("default_delay", true)
            .apply(&mut defaults);

        let raw = RawSwitchRequest::to("about")
            .enter("sideways")
            .animation("topleft")
            .exit("nowhere")
            .enter_time(-3)
            .time(12.5)
            .exit_time("soon")
            .delay("maybe")
            .horizontal_distance("far")
            .distance(30);
        let req = resolve(&raw, &mut defaults).unwrap();
        assert_eq!(req.enter, Direction::TopLeft);
        assert_eq!(req.exit, Direction::TopLeft);
        assert_eq!(req.enter_time, Duration::from_millis(500));
        assert_eq!(req.exit_time, Duration::from_millis(700));
        assert!(req.delay);
        assert_eq!(req.horizontal_distance, 30);
        assert_eq!(req.vertical_distance, 30);
    }

    #[test]
    fn test_invalid_command_without_generic_uses_side_default() {
        let mut defaults = Defaults::new();
        Settings::new()
            .with("default_enter_animation", "right")
            .with("default_exit_animation", "fadeleft")
            .apply(&mut defaults);

        let raw = RawSwitchRequest::to("about").enter("up").exit(5);
        let req = resolve(&raw, &mut defaults).unwrap();
        assert_eq!(req.enter, Direction::Right);
        assert_eq!(req.exit, Direction::FadeLeft);
    }

    #[test]
    fn test_chain_is_carried_unresolved() {
        let mut defaults = Defaults::new();
        let next = RawSwitchRequest::to("contact").enter("bogus");
        let raw = RawSwitchRequest::to("about").then(next.clone());
        let req = resolve(&raw, &mut defaults).unwrap();
        assert_eq!(req.chained.as_deref(), Some(&next));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let raw: RawSwitchRequest = toml::from_str(
            r#"
            target = "about"
            enter = "left"
            enter_time = 300
            delay = "false"

            [chain]
            target = "contact"
            "#,
        )
        .unwrap();
        assert_eq!(raw.target.as_deref(), Some("about"));
        assert_eq!(raw.enter_time, Some(RawValue::Int(300)));
        assert_eq!(raw.chain.and_then(|c| c.target), Some("contact".to_string()));
    }
}
