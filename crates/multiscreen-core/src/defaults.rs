//! Process-wide transition defaults and the settings surface that edits them
//!
//! Every field starts unset. The first read of an unset field stores its
//! fallback constant, so later reads return the same value until a setter
//! replaces it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::Direction;
use crate::error::{Error, Result};
use crate::value::RawValue;

pub const FALLBACK_ANIMATION: Direction = Direction::Fade;
pub const FALLBACK_TIME_MS: u64 = 500;
pub const FALLBACK_SCROLL_TIME_MS: u64 = 200;
pub const FALLBACK_DELAY: bool = false;
pub const FALLBACK_DISTANCE_PX: u64 = 200;

/// A single slot of the defaults store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefaultField {
    EnterAnimation,
    ExitAnimation,
    EnterTime,
    ExitTime,
    ScrollTime,
    Delay,
    VerticalDistance,
    HorizontalDistance,
}

impl DefaultField {
    pub fn name(self) -> &'static str {
        match self {
            DefaultField::EnterAnimation => "enter_animation",
            DefaultField::ExitAnimation => "exit_animation",
            DefaultField::EnterTime => "enter_time",
            DefaultField::ExitTime => "exit_time",
            DefaultField::ScrollTime => "scroll_time",
            DefaultField::Delay => "delay",
            DefaultField::VerticalDistance => "vertical_distance",
            DefaultField::HorizontalDistance => "horizontal_distance",
        }
    }
}

impl fmt::Display for DefaultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value held by a [`DefaultField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Animation(Direction),
    Millis(u64),
    Flag(bool),
    Pixels(u64),
}

/// Lazily-initialised transition defaults
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    enter_animation: Option<Direction>,
    exit_animation: Option<Direction>,
    enter_time_ms: Option<u64>,
    exit_time_ms: Option<u64>,
    scroll_time_ms: Option<u64>,
    delay: Option<bool>,
    vertical_distance_px: Option<u64>,
    horizontal_distance_px: Option<u64>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_animation(&mut self) -> Direction {
        *self.enter_animation.get_or_insert(FALLBACK_ANIMATION)
    }

    pub fn exit_animation(&mut self) -> Direction {
        *self.exit_animation.get_or_insert(FALLBACK_ANIMATION)
    }

    pub fn enter_time(&mut self) -> Duration {
        Duration::from_millis(*self.enter_time_ms.get_or_insert(FALLBACK_TIME_MS))
    }

    pub fn exit_time(&mut self) -> Duration {
        Duration::from_millis(*self.exit_time_ms.get_or_insert(FALLBACK_TIME_MS))
    }

    pub fn scroll_time(&mut self) -> Duration {
        Duration::from_millis(*self.scroll_time_ms.get_or_insert(FALLBACK_SCROLL_TIME_MS))
    }

    pub fn delay(&mut self) -> bool {
        *self.delay.get_or_insert(FALLBACK_DELAY)
    }

    pub fn vertical_distance(&mut self) -> u64 {
        *self.vertical_distance_px.get_or_insert(FALLBACK_DISTANCE_PX)
    }

    pub fn horizontal_distance(&mut self) -> u64 {
        *self.horizontal_distance_px.get_or_insert(FALLBACK_DISTANCE_PX)
    }

    /// Read a field, memoizing its fallback if it was never set
    pub fn get(&mut self, field: DefaultField) -> DefaultValue {
        match field {
            DefaultField::EnterAnimation => DefaultValue::Animation(self.enter_animation()),
            DefaultField::ExitAnimation => DefaultValue::Animation(self.exit_animation()),
            DefaultField::EnterTime => DefaultValue::Millis(self.enter_time().as_millis() as u64),
            DefaultField::ExitTime => DefaultValue::Millis(self.exit_time().as_millis() as u64),
            DefaultField::ScrollTime => DefaultValue::Millis(self.scroll_time().as_millis() as u64),
            DefaultField::Delay => DefaultValue::Flag(self.delay()),
            DefaultField::VerticalDistance => DefaultValue::Pixels(self.vertical_distance()),
            DefaultField::HorizontalDistance => DefaultValue::Pixels(self.horizontal_distance()),
        }
    }

    /// True when the field has been stored, either by a setter or a read
    pub fn is_set(&self, field: DefaultField) -> bool {
        match field {
            DefaultField::EnterAnimation => self.enter_animation.is_some(),
            DefaultField::ExitAnimation => self.exit_animation.is_some(),
            DefaultField::EnterTime => self.enter_time_ms.is_some(),
            DefaultField::ExitTime => self.exit_time_ms.is_some(),
            DefaultField::ScrollTime => self.scroll_time_ms.is_some(),
            DefaultField::Delay => self.delay.is_some(),
            DefaultField::VerticalDistance => self.vertical_distance_px.is_some(),
            DefaultField::HorizontalDistance => self.horizontal_distance_px.is_some(),
        }
    }

    /// Validate and store a value. A rejected value leaves the field untouched.
    pub fn set(&mut self, field: DefaultField, value: &RawValue) -> Result<()> {
        match field {
            DefaultField::EnterAnimation => self.enter_animation = Some(command(value)?),
            DefaultField::ExitAnimation => self.exit_animation = Some(command(value)?),
            DefaultField::EnterTime => self.enter_time_ms = Some(number(field, value)?),
            DefaultField::ExitTime => self.exit_time_ms = Some(number(field, value)?),
            DefaultField::ScrollTime => self.scroll_time_ms = Some(number(field, value)?),
            DefaultField::Delay => {
                self.delay = Some(
                    value
                        .as_flag()
                        .ok_or_else(|| Error::InvalidFlag(value.to_string()))?,
                )
            }
            DefaultField::VerticalDistance => {
                self.vertical_distance_px = Some(number(field, value)?)
            }
            DefaultField::HorizontalDistance => {
                self.horizontal_distance_px = Some(number(field, value)?)
            }
        }
        Ok(())
    }
}

fn command(value: &RawValue) -> Result<Direction> {
    value
        .as_direction()
        .ok_or_else(|| Error::InvalidCommand(value.to_string()))
}

fn number(field: DefaultField, value: &RawValue) -> Result<u64> {
    value.as_non_negative_int().ok_or_else(|| Error::InvalidNumeric {
        field: field.name(),
        value: value.to_string(),
    })
}

/// Recognized keys of the settings surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    DefaultTime,
    DefaultEnterTime,
    DefaultExitTime,
    DefaultScrollTime,
    DefaultAnimation,
    DefaultEnterAnimation,
    DefaultExitAnimation,
    DefaultDelay,
    DefaultDistance,
    DefaultVerticalDistance,
    DefaultHorizontalDistance,
}

impl SettingKey {
    pub const ALL: [SettingKey; 11] = [
        SettingKey::DefaultTime,
        SettingKey::DefaultEnterTime,
        SettingKey::DefaultExitTime,
        SettingKey::DefaultScrollTime,
        SettingKey::DefaultAnimation,
        SettingKey::DefaultEnterAnimation,
        SettingKey::DefaultExitAnimation,
        SettingKey::DefaultDelay,
        SettingKey::DefaultDistance,
        SettingKey::DefaultVerticalDistance,
        SettingKey::DefaultHorizontalDistance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::DefaultTime => "default_time",
            SettingKey::DefaultEnterTime => "default_enter_time",
            SettingKey::DefaultExitTime => "default_exit_time",
            SettingKey::DefaultScrollTime => "default_scroll_time",
            SettingKey::DefaultAnimation => "default_animation",
            SettingKey::DefaultEnterAnimation => "default_enter_animation",
            SettingKey::DefaultExitAnimation => "default_exit_animation",
            SettingKey::DefaultDelay => "default_delay",
            SettingKey::DefaultDistance => "default_distance",
            SettingKey::DefaultVerticalDistance => "default_vertical_distance",
            SettingKey::DefaultHorizontalDistance => "default_horizontal_distance",
        }
    }

    /// Store fields written by this key
    pub fn fields(self) -> &'static [DefaultField] {
        match self {
            SettingKey::DefaultTime => &[DefaultField::EnterTime, DefaultField::ExitTime],
            SettingKey::DefaultEnterTime => &[DefaultField::EnterTime],
            SettingKey::DefaultExitTime => &[DefaultField::ExitTime],
            SettingKey::DefaultScrollTime => &[DefaultField::ScrollTime],
            SettingKey::DefaultAnimation => {
                &[DefaultField::EnterAnimation, DefaultField::ExitAnimation]
            }
            SettingKey::DefaultEnterAnimation => &[DefaultField::EnterAnimation],
            SettingKey::DefaultExitAnimation => &[DefaultField::ExitAnimation],
            SettingKey::DefaultDelay => &[DefaultField::Delay],
            SettingKey::DefaultDistance => {
                &[DefaultField::VerticalDistance, DefaultField::HorizontalDistance]
            }
            SettingKey::DefaultVerticalDistance => &[DefaultField::VerticalDistance],
            SettingKey::DefaultHorizontalDistance => &[DefaultField::HorizontalDistance],
        }
    }

    /// Keys covering several fields are applied first so a specific key wins
    fn is_generic(self) -> bool {
        self.fields().len() > 1
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownSetting(s.to_string()))
    }
}

/// A batch of settings, keyed by their public names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, RawValue>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply every key to `defaults`, reporting each outcome separately
    pub fn apply(&self, defaults: &mut Defaults) -> SettingsReport {
        let mut outcomes = Vec::with_capacity(self.0.len());
        let mut known = Vec::new();

        for (name, value) in &self.0 {
            match name.parse::<SettingKey>() {
                Ok(key) => known.push((key, name, value)),
                Err(e) => outcomes.push((name.clone(), Err(e))),
            }
        }
        known.sort_by_key(|(key, _, _)| (!key.is_generic(), *key));

        for (key, name, value) in known {
            outcomes.push((name.clone(), apply_key(defaults, key, value)));
        }

        SettingsReport { outcomes }
    }
}

fn apply_key(defaults: &mut Defaults, key: SettingKey, value: &RawValue) -> Result<()> {
    // Validate against a scratch copy so a generic key is all-or-nothing
    let mut staged = defaults.clone();
    for field in key.fields() {
        staged.set(*field, value)?;
    }
    *defaults = staged;
    Ok(())
}

/// Per-key outcome of [`Settings::apply`]
#[derive(Debug, Default)]
pub struct SettingsReport {
    outcomes: Vec<(String, Result<()>)>,
}

impl SettingsReport {
    pub fn outcomes(&self) -> &[(String, Result<()>)] {
        &self.outcomes
    }

    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|(_, r)| r.is_ok())
    }

    pub fn is_ok(&self, key: &str) -> Option<bool> {
        self.outcomes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, r)| r.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|(k, r)| r.as_ref().err().map(|e| (k.as_str(), e)))
    }
}
