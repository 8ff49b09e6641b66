pub mod command;
pub mod config;
pub mod defaults;
pub mod error;
pub mod geometry;
pub mod host;
pub mod registry;
pub mod request;
pub mod sequencer;
pub mod sim;
pub mod style;
pub mod value;

pub use command::Direction;
pub use config::AppConfig;
pub use defaults::{DefaultField, DefaultValue, Defaults, SettingKey, Settings, SettingsReport};
pub use error::{Error, Result};
pub use geometry::{Size, Vector};
pub use host::{Completer, Completion, Screen, ViewLayer};
pub use request::{RawSwitchRequest, SwitchRequest};
pub use sequencer::{Coordinator, SwitchTask};
pub use style::{StyleDelta, StylePlan};
pub use value::RawValue;
