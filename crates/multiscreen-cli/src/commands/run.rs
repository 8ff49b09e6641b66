use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{info, warn};

use multiscreen_core::sim::{scale_duration, EventKind, TimelineEvent};
use multiscreen_core::{AppConfig, Coordinator, StyleDelta};

use crate::scenario::{Action, Scenario};

/// What happened to one scripted step
#[derive(Debug, Serialize)]
struct StepOutcome {
    at_ms: u64,
    action: Action,
    target: Option<String>,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    steps: &'a [StepOutcome],
    timeline: &'a [TimelineEvent],
    final_screen: Option<String>,
}

pub async fn run(config: &AppConfig, path: &Path, time_scale: f64, json: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let time_scale = if time_scale.is_finite() { time_scale.max(0.0) } else { 1.0 };

    let coordinator = Coordinator::new(scenario.view(time_scale));

    // Scenario defaults are applied after the config file, so they win
    coordinator.apply_settings(&config.defaults);
    coordinator.apply_settings(&scenario.defaults);
    coordinator.init()?;

    let start = Instant::now();
    let mut tasks = Vec::new();
    let mut outcomes = Vec::with_capacity(scenario.steps.len());

    for step in &scenario.steps {
        let offset = scale_duration(Duration::from_millis(step.at_ms), time_scale);
        match start.checked_add(offset) {
            Some(deadline) => sleep_until(deadline).await,
            None => sleep(offset).await,
        }

        let target = step.request.target.clone();
        let result = match step.action {
            Action::Switch => coordinator
                .try_switch_to(step.request.clone())
                .map(|task| tasks.push(task)),
            Action::Chain => coordinator.try_chain(step.request.clone()),
        };

        if let Err(e) = &result {
            warn!("Step at {}ms towards {:?} rejected: {}", step.at_ms, target, e);
        }
        outcomes.push(StepOutcome {
            at_ms: step.at_ms,
            action: step.action,
            target,
            accepted: result.is_ok(),
            reason: result.err().map(|e| e.to_string()),
        });
    }

    for task in tasks {
        task.finished().await;
    }

    let timeline = coordinator.view().timeline();
    let final_screen = coordinator.current_screen();
    info!(
        "Scenario finished after {}ms on screen {}",
        start.elapsed().as_millis(),
        final_screen.as_deref().unwrap_or("-")
    );

    if json {
        let output = RunOutput {
            steps: &outcomes,
            timeline: &timeline,
            final_screen,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Steps:");
    for outcome in &outcomes {
        let verdict = match &outcome.reason {
            None => "accepted".to_string(),
            Some(reason) => format!("rejected ({})", reason),
        };
        println!(
            "  {:>6}ms  {:<6} -> {:<12} {}",
            outcome.at_ms,
            format!("{:?}", outcome.action).to_lowercase(),
            outcome.target.as_deref().unwrap_or("-"),
            verdict
        );
    }

    println!("\nTimeline:");
    for event in &timeline {
        println!(
            "  {:>6}ms  {:<12} {}",
            event.at_ms,
            event.screen.as_deref().unwrap_or("(page)"),
            describe(&event.kind)?
        );
    }

    println!(
        "\nCurrent screen: {}",
        coordinator.current_screen().as_deref().unwrap_or("-")
    );

    Ok(())
}

fn describe(kind: &EventKind) -> Result<String> {
    Ok(match kind {
        EventKind::Styled { styles } => format!("set {}", css(styles)?),
        EventKind::AnimationStarted {
            styles,
            duration_ms,
        } => format!("animate {}ms to {}", duration_ms, css(styles)?),
        EventKind::AnimationFinished => "animation finished".to_string(),
        EventKind::ScrollStarted { duration_ms } => format!("scroll to top over {}ms", duration_ms),
        EventKind::ScrollFinished => "scroll finished".to_string(),
        EventKind::Marked { marked: true } => "marked as default".to_string(),
        EventKind::Marked { marked: false } => "default marker removed".to_string(),
    })
}

fn css(styles: &StyleDelta) -> Result<String> {
    Ok(serde_json::to_string(styles)?)
}
