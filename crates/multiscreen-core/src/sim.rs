//! Headless view layer
//!
//! `SimulatedView` stands in for a real rendering host: screens have fixed
//! sizes, animations finish after their (scaled) duration on the tokio
//! clock, and every command the coordinator issues is recorded in a
//! timeline. It backs the CLI scenario runner and the coordinator tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::geometry::Size;
use crate::host::{Completer, Completion, Screen, ViewLayer};
use crate::style::StyleDelta;

/// Multiply `duration` by `factor`, saturating at `Duration::MAX` instead of
/// panicking on overflow. Non-finite or negative factors count as zero.
pub fn scale_duration(duration: Duration, factor: f64) -> Duration {
    if factor.is_nan() || factor <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimScreen {
    index: usize,
    id: Option<String>,
    size: Size,
}

impl Screen for SimScreen {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn outer_size(&self) -> Size {
        self.size
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    Styled { styles: StyleDelta },
    AnimationStarted { styles: StyleDelta, duration_ms: u64 },
    AnimationFinished,
    ScrollStarted { duration_ms: u64 },
    ScrollFinished,
    Marked { marked: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    /// Milliseconds since the view was created, on the tokio clock
    pub at_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Default)]
struct SimState {
    scroll_top: u32,
    markers: Vec<bool>,
    styles: Vec<StyleDelta>,
    timeline: Vec<TimelineEvent>,
}

#[derive(Debug)]
struct Shared {
    origin: Instant,
    state: Mutex<SimState>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, screen: Option<&SimScreen>, kind: EventKind) {
        let at_ms = self.origin.elapsed().as_millis() as u64;
        self.state().timeline.push(TimelineEvent {
            at_ms,
            screen: screen.and_then(|s| s.id.clone()),
            kind,
        });
    }
}

#[derive(Debug)]
pub struct SimulatedView {
    screens: Vec<SimScreen>,
    viewport: Size,
    time_scale: f64,
    shared: Arc<Shared>,
}

impl SimulatedView {
    pub fn new(viewport: Size) -> Self {
        Self {
            screens: Vec::new(),
            viewport,
            time_scale: 1.0,
            shared: Arc::new(Shared {
                origin: Instant::now(),
                state: Mutex::new(SimState::default()),
            }),
        }
    }

    /// Add a screen with an id
    pub fn screen(self, id: impl Into<String>, size: Size) -> Self {
        self.push(Some(id.into()), size, false)
    }

    /// Add a screen carrying the default marker
    pub fn marked_screen(self, id: impl Into<String>, size: Size) -> Self {
        self.push(Some(id.into()), size, true)
    }

    /// Add a screen without an id; it can never be navigated to
    pub fn anonymous_screen(self, size: Size) -> Self {
        self.push(None, size, false)
    }

    pub fn with_scroll_top(self, scroll_top: u32) -> Self {
        self.shared.state().scroll_top = scroll_top;
        self
    }

    /// Multiply every animation duration by `scale` (0 finishes instantly)
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
        self
    }

    fn push(mut self, id: Option<String>, size: Size, marked: bool) -> Self {
        let index = self.screens.len();
        self.screens.push(SimScreen { index, id, size });
        {
            let mut state = self.shared.state();
            state.markers.push(marked);
            state.styles.push(StyleDelta::default());
        }
        self
    }

    pub fn timeline(&self) -> Vec<TimelineEvent> {
        self.shared.state().timeline.clone()
    }

    /// Accumulated style of a screen after every applied or finished phase
    pub fn style_of(&self, id: &str) -> Option<StyleDelta> {
        let screen = self.find(id)?;
        self.shared.state().styles.get(screen.index).cloned()
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.find(id)
            .and_then(|s| self.shared.state().markers.get(s.index).copied())
            .unwrap_or(false)
    }

    pub fn scroll_position(&self) -> u32 {
        self.shared.state().scroll_top
    }

    fn find(&self, id: &str) -> Option<&SimScreen> {
        self.screens.iter().find(|s| s.id.as_deref() == Some(id))
    }

    fn scaled(&self, duration: Duration) -> Duration {
        scale_duration(duration, self.time_scale)
    }

    /// Fire `on_done` after `delay` on the tokio clock, or right away when
    /// no runtime is available
    fn after(&self, delay: Duration, on_done: impl FnOnce(&Shared) + Send + 'static) -> Completion {
        let (completer, completion) = Completion::channel();
        let shared = Arc::clone(&self.shared);
        let finish = move |completer: Completer| {
            on_done(&shared);
            completer.complete();
        };
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    finish(completer);
                });
            }
            Err(_) => finish(completer),
        }
        completion
    }
}

impl ViewLayer for SimulatedView {
    type Screen = SimScreen;

    fn query_screens(&self) -> Vec<SimScreen> {
        self.screens.clone()
    }

    fn query_default_marked(&self) -> Vec<SimScreen> {
        let state = self.shared.state();
        self.screens
            .iter()
            .filter(|s| state.markers.get(s.index).copied().unwrap_or(false))
            .cloned()
            .collect()
    }

    fn set_default_marker(&self, screen: &SimScreen, marked: bool) {
        if let Some(slot) = self.shared.state().markers.get_mut(screen.index) {
            *slot = marked;
        }
        self.shared.record(Some(screen), EventKind::Marked { marked });
    }

    fn apply_styles(&self, screen: &SimScreen, styles: &StyleDelta) {
        if let Some(current) = self.shared.state().styles.get_mut(screen.index) {
            current.merge(styles);
        }
        self.shared.record(
            Some(screen),
            EventKind::Styled {
                styles: styles.clone(),
            },
        );
    }

    fn animate(&self, screen: &SimScreen, styles: &StyleDelta, duration: Duration) -> Completion {
        self.shared.record(
            Some(screen),
            EventKind::AnimationStarted {
                styles: styles.clone(),
                duration_ms: duration.as_millis() as u64,
            },
        );
        let screen = screen.clone();
        let styles = styles.clone();
        self.after(self.scaled(duration), move |shared| {
            if let Some(current) = shared.state().styles.get_mut(screen.index) {
                current.merge(&styles);
            }
            shared.record(Some(&screen), EventKind::AnimationFinished);
        })
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn scroll_top(&self) -> u32 {
        self.shared.state().scroll_top
    }

    fn scroll_to_top(&self, duration: Duration) -> Completion {
        self.shared.record(
            None,
            EventKind::ScrollStarted {
                duration_ms: duration.as_millis() as u64,
            },
        );
        self.after(self.scaled(duration), |shared| {
            shared.state().scroll_top = 0;
            shared.record(None, EventKind::ScrollFinished);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SimulatedView {
        SimulatedView::new(Size::new(1024, 768))
            .screen("home", Size::new(1024, 768))
            .anonymous_screen(Size::new(10, 10))
            .marked_screen("about", Size::new(800, 1200))
    }

    #[test]
    fn test_screens_and_markers() {
        let view = view();
        assert_eq!(view.query_screens().len(), 3);
        let marked = view.query_default_marked();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].id(), Some("about"));
        assert_eq!(marked[0].outer_size(), Size::new(800, 1200));

        view.set_default_marker(&marked[0], false);
        assert!(!view.is_marked("about"));
        assert!(view.query_default_marked().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_animation_completes_after_duration() {
        let view = view();
        let home = view.query_screens().remove(0);
        let styles = StyleDelta {
            left: Some(-400),
            ..Default::default()
        };

        view.animate(&home, &styles, Duration::from_millis(300)).await;

        let timeline = view.timeline();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].at_ms, 0);
        assert_eq!(timeline[1].at_ms, 300);
        assert_eq!(timeline[1].kind, EventKind::AnimationFinished);
        assert_eq!(view.style_of("home").and_then(|s| s.left), Some(-400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_scale_stretches_animations() {
        let view = view().with_time_scale(2.0);
        let home = view.query_screens().remove(0);
        view.animate(&home, &StyleDelta::default(), Duration::from_millis(100)).await;
        assert_eq!(view.timeline()[1].at_ms, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_to_top_resets_offset() {
        let view = view().with_scroll_top(350);
        assert_eq!(view.scroll_top(), 350);
        view.scroll_to_top(Duration::from_millis(200)).await;
        assert_eq!(view.scroll_position(), 0);
        assert_eq!(view.timeline()[1].kind, EventKind::ScrollFinished);
    }

    #[test]
    fn test_scale_duration_saturates() {
        let second = Duration::from_secs(1);
        assert_eq!(scale_duration(second, 0.5), Duration::from_millis(500));
        assert_eq!(scale_duration(second, 0.0), Duration::ZERO);
        assert_eq!(scale_duration(second, f64::NAN), Duration::ZERO);
        assert_eq!(scale_duration(second, 1e300), Duration::MAX);
        assert_eq!(scale_duration(Duration::ZERO, 1e300), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_time_scale_does_not_panic() {
        let view = view().with_time_scale(1e300);
        let home = view.query_screens().remove(0);
        view.animate(&home, &StyleDelta::default(), Duration::from_millis(100)).await;
        assert_eq!(view.timeline()[1].kind, EventKind::AnimationFinished);
    }

    #[test]
    fn test_completes_immediately_without_runtime() {
        let view = view();
        let home = view.query_screens().remove(0);
        let _completion = view.animate(&home, &StyleDelta::default(), Duration::from_secs(5));
        assert_eq!(view.timeline().len(), 2);
    }
}
