use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use multiscreen_core::geometry::{compute_movement, Buffers, Layout, Movement};
use multiscreen_core::style::{current_plan, target_plan};
use multiscreen_core::{AppConfig, Defaults, Direction, Size, StylePlan};

pub struct PlanArgs {
    pub enter: Direction,
    pub exit: Direction,
    pub current: Size,
    pub target: Size,
    pub viewport: Size,
    pub vertical_distance: Option<u64>,
    pub horizontal_distance: Option<u64>,
}

#[derive(Serialize)]
struct PlanOutput {
    movement: Movement,
    /// Plan for the exiting screen
    current: StylePlan,
    /// Plan for the entering screen
    target: StylePlan,
}

pub fn run(config: &AppConfig, args: PlanArgs) -> Result<()> {
    // Distances not given on the command line come from the configured defaults
    let mut defaults = Defaults::new();
    for (key, e) in config.defaults.apply(&mut defaults).failures() {
        warn!("Ignoring config default {}: {}", key, e);
    }

    let buffers = Buffers {
        vertical: args
            .vertical_distance
            .unwrap_or_else(|| defaults.vertical_distance()),
        horizontal: args
            .horizontal_distance
            .unwrap_or_else(|| defaults.horizontal_distance()),
    };
    let layout = Layout {
        current: args.current,
        target: args.target,
        viewport: args.viewport,
    };

    let movement = compute_movement(layout, args.enter, args.exit, buffers);
    let output = PlanOutput {
        movement,
        current: current_plan(movement.exit, args.exit.has_fade()),
        target: target_plan(movement.enter, args.enter.has_fade()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
