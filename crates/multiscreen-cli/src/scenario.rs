//! Scenario files for `multiscreen run`
//!
//! ```toml
//! [viewport]
//! width = 1280
//! height = 720
//! scroll_top = 0
//!
//! [defaults]
//! default_time = 300
//!
//! [[screens]]
//! id = "home"
//! width = 1280
//! height = 720
//!
//! [[steps]]
//! at_ms = 0
//! request = { target = "about", enter = "left", exit = "right" }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use multiscreen_core::sim::SimulatedView;
use multiscreen_core::{RawSwitchRequest, Settings, Size};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub viewport: Viewport,
    #[serde(default)]
    pub defaults: Settings,
    pub screens: Vec<ScreenSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Initial page scroll offset
    #[serde(default)]
    pub scroll_top: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenSpec {
    /// Screens without an id are rendered but never addressable
    pub id: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Carries the default marker before init
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Offset from scenario start, before time scaling
    #[serde(default)]
    pub at_ms: u64,
    #[serde(default)]
    pub action: Action,
    pub request: RawSwitchRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Start a new switch
    #[default]
    Switch,
    /// Attach to the switch in flight
    Chain,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut scenario: Scenario = toml::from_str(content)?;
        // Same-time steps keep file order
        scenario.steps.sort_by_key(|s| s.at_ms);
        Ok(scenario)
    }

    /// Build the headless view described by this scenario
    pub fn view(&self, time_scale: f64) -> SimulatedView {
        let viewport = Size::new(self.viewport.width, self.viewport.height);
        let mut view = SimulatedView::new(viewport)
            .with_scroll_top(self.viewport.scroll_top)
            .with_time_scale(time_scale);

        for spec in &self.screens {
            let size = Size::new(spec.width, spec.height);
            view = match (&spec.id, spec.default) {
                (Some(id), true) => view.marked_screen(id.clone(), size),
                (Some(id), false) => view.screen(id.clone(), size),
                (None, _) => view.anonymous_screen(size),
            };
        }

        view
    }
}
