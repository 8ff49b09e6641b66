//! Switch sequencing
//!
//! [`Coordinator`] owns the navigation lock, the queue slot and the
//! defaults store. Accepting a request takes the lock synchronously; the
//! animation sequence then runs as a tokio task which, once the entering
//! screen has finished, releases the lock and picks up a queued chained
//! request, if any.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::defaults::{DefaultField, DefaultValue, Defaults, Settings, SettingsReport};
use crate::error::{Error, Result};
use crate::geometry::{compute_movement, Buffers, Layout};
use crate::host::{Completion, Screen, ViewLayer};
use crate::registry::Registry;
use crate::request::{RawSwitchRequest, SwitchRequest};
use crate::style::{current_plan, target_plan, StylePlan};
use crate::value::RawValue;

/// Mutable state shared by every switch of one coordinator
#[derive(Debug)]
struct SwitchContext<S> {
    registry: Registry<S>,
    defaults: Defaults,
    current: Option<String>,
    /// Navigation lock: set while a switch sequence is in flight
    locked: bool,
    /// At most one chained request waiting for the in-flight switch
    queued: Option<RawSwitchRequest>,
}

impl<S: Screen> SwitchContext<S> {
    fn new() -> Self {
        Self {
            registry: Registry::new(),
            defaults: Defaults::new(),
            current: None,
            locked: false,
            queued: None,
        }
    }

    /// Resolve `raw` and, on success, take the lock and make its target current
    fn accept(&mut self, raw: &RawSwitchRequest) -> Result<Switch<S>> {
        let current_id = self
            .current
            .clone()
            .ok_or(Error::NotEnoughScreens(self.registry.len()))?;
        let request = SwitchRequest::resolve(
            raw,
            &self.registry,
            Some(current_id.as_str()),
            &mut self.defaults,
        )?;

        let current = self
            .registry
            .get(&current_id)
            .cloned()
            .ok_or_else(|| Error::UnknownScreen(current_id.clone()))?;
        let target = self
            .registry
            .get(&request.target_id)
            .cloned()
            .ok_or_else(|| Error::UnknownScreen(request.target_id.clone()))?;

        self.locked = true;
        self.current = Some(request.target_id.clone());
        if let Some(next) = request.chained.as_deref() {
            self.queued = Some(next.clone());
        }

        Ok(Switch {
            from: current_id,
            request,
            current,
            target,
        })
    }
}

/// An accepted switch, ready to animate
#[derive(Debug, Clone)]
struct Switch<S> {
    from: String,
    request: SwitchRequest,
    current: S,
    target: S,
}

struct Inner<V: ViewLayer> {
    view: V,
    context: Mutex<SwitchContext<V::Screen>>,
}

impl<V: ViewLayer> Inner<V> {
    fn context(&self) -> MutexGuard<'_, SwitchContext<V::Screen>> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `switch` and every chained switch queued behind it, then wait for
    /// exiting screens that were still settling.
    async fn run(self: Arc<Self>, mut switch: Switch<V::Screen>) {
        let mut settling = Vec::new();
        loop {
            settling.extend(self.perform(&switch).await);
            match self.finish() {
                Some(next) => switch = next,
                None => break,
            }
        }
        for handle in settling {
            if let Err(e) = handle.await {
                warn!("Exit animation task ended abnormally: {}", e);
            }
        }
    }

    /// Animate one switch up to the entering screen's completion. In parallel
    /// mode the exiting screen may still be running; its task is returned.
    async fn perform(self: &Arc<Self>, switch: &Switch<V::Screen>) -> Option<JoinHandle<()>> {
        let request = &switch.request;
        debug!(
            "Switching {} -> {} (enter={}, exit={}, delay={})",
            switch.from, request.target_id, request.enter, request.exit, request.delay
        );

        // Geometry depends on the scroll position, so settle it first
        if self.view.scroll_top() > 0 {
            self.view.scroll_to_top(request.scroll_time).await;
        }

        let layout = Layout {
            current: switch.current.outer_size(),
            target: switch.target.outer_size(),
            viewport: self.view.viewport_size(),
        };
        let movement = compute_movement(
            layout,
            request.enter,
            request.exit,
            Buffers {
                vertical: request.vertical_distance,
                horizontal: request.horizontal_distance,
            },
        );
        let exit_plan = current_plan(movement.exit, request.exit.has_fade());
        let enter_plan = target_plan(movement.enter, request.enter.has_fade());

        if request.delay {
            self.play(&switch.current, &exit_plan, request.exit_time).await;
            self.play(&switch.target, &enter_plan, request.enter_time).await;
            None
        } else {
            let exit = self.start(&switch.current, &exit_plan, request.exit_time);
            let enter = self.start(&switch.target, &enter_plan, request.enter_time);

            // The exiting screen settles on its own schedule
            let inner = Arc::clone(self);
            let screen = switch.current.clone();
            let post = exit_plan.post;
            let settle = tokio::spawn(async move {
                exit.await;
                inner.view.apply_styles(&screen, &post);
            });

            enter.await;
            self.view.apply_styles(&switch.target, &enter_plan.post);
            Some(settle)
        }
    }

    fn start(&self, screen: &V::Screen, plan: &StylePlan, duration: Duration) -> Completion {
        self.view.apply_styles(screen, &plan.pre);
        self.view.animate(screen, &plan.animate, duration)
    }

    async fn play(&self, screen: &V::Screen, plan: &StylePlan, duration: Duration) {
        self.start(screen, plan, duration).await;
        self.view.apply_styles(screen, &plan.post);
    }

    /// Release the lock and take the queued request in one step, so a chained
    /// switch re-locks before anyone else can observe the coordinator idle.
    fn finish(&self) -> Option<Switch<V::Screen>> {
        let mut context = self.context();
        context.locked = false;
        let next = context.queued.take()?;
        match context.accept(&next) {
            Ok(switch) => {
                debug!("Starting chained switch to {}", switch.request.target_id);
                Some(switch)
            }
            Err(e) => {
                warn!("Dropping chained switch: {}", e);
                None
            }
        }
    }
}

/// Handle to the task animating an accepted switch
#[derive(Debug)]
pub struct SwitchTask {
    handle: JoinHandle<()>,
}

impl SwitchTask {
    /// Wait until this switch, and every switch chained behind it, has
    /// settled. The navigation lock is released earlier, as soon as the last
    /// entering screen finishes.
    pub async fn finished(self) {
        if let Err(e) = self.handle.await {
            warn!("Switch task ended abnormally: {}", e);
        }
    }
}

/// Screen-switch coordinator
pub struct Coordinator<V: ViewLayer> {
    inner: Arc<Inner<V>>,
}

impl<V: ViewLayer> Clone for Coordinator<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: ViewLayer> Coordinator<V> {
    /// Create a coordinator with no screens registered. Call [`init`](Self::init)
    /// before navigating.
    pub fn new(view: V) -> Self {
        Self {
            inner: Arc::new(Inner {
                view,
                context: Mutex::new(SwitchContext::new()),
            }),
        }
    }

    /// Create, apply `settings` and initialize in one go
    pub fn init_with(view: V, settings: &Settings) -> Result<(Self, SettingsReport)> {
        let coordinator = Self::new(view);
        let report = coordinator.apply_settings(settings);
        coordinator.init()?;
        Ok((coordinator, report))
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    /// Register screens from the view layer and choose the current one.
    ///
    /// The first marked screen becomes current and any other markers are
    /// removed. Without a marked screen the first registered screen is
    /// marked and used. Fewer than two addressable screens leaves navigation
    /// disabled.
    pub fn init(&self) -> Result<()> {
        let view = &self.inner.view;
        let screens = view.query_screens();
        let mut registry = Registry::new();
        registry.register(screens);

        if registry.len() < 2 {
            let mut context = self.inner.context();
            context.registry = registry;
            context.current = None;
            warn!(
                "Navigation disabled: {} addressable screen(s) found",
                context.registry.len()
            );
            return Err(Error::NotEnoughScreens(context.registry.len()));
        }

        let marked: Vec<V::Screen> = view
            .query_default_marked()
            .into_iter()
            .filter(|s| s.id().is_some_and(|id| registry.contains(id)))
            .collect();

        let default = match marked.split_first() {
            Some((first, rest)) => {
                for screen in rest {
                    view.set_default_marker(screen, false);
                }
                first.clone()
            }
            None => {
                let first = registry
                    .ids()
                    .next()
                    .and_then(|id| registry.get(id))
                    .cloned()
                    .ok_or(Error::NotEnoughScreens(0))?;
                view.set_default_marker(&first, true);
                first
            }
        };
        let default_id = default.id().map(str::to_string);

        info!(
            "Registered {} screens, current screen: {}",
            registry.len(),
            default_id.as_deref().unwrap_or_default()
        );

        let mut context = self.inner.context();
        context.registry = registry;
        context.current = default_id;
        Ok(())
    }

    /// Apply a batch of settings to the defaults store
    pub fn apply_settings(&self, settings: &Settings) -> SettingsReport {
        let report = settings.apply(&mut self.inner.context().defaults);
        for (key, e) in report.failures() {
            warn!("Rejected setting {}: {}", key, e);
        }
        report
    }

    pub fn get_default(&self, field: DefaultField) -> DefaultValue {
        self.inner.context().defaults.get(field)
    }

    pub fn set_default(&self, field: DefaultField, value: impl Into<RawValue>) -> Result<()> {
        self.inner.context().defaults.set(field, &value.into())
    }

    /// Start a switch. Returns `false` when the request was rejected.
    pub fn switch_to(&self, raw: RawSwitchRequest) -> bool {
        self.try_switch_to(raw).is_ok()
    }

    /// Entry point for navigation triggers such as link activations
    pub fn on_navigation_triggered(&self, raw: RawSwitchRequest) -> bool {
        debug!("Navigation triggered towards {:?}", raw.target);
        self.switch_to(raw)
    }

    /// Start a switch, returning the reason when it is rejected.
    ///
    /// Must be called from within a tokio runtime. The lock is taken before
    /// this returns, so a second call made right after is refused as `Busy`.
    pub fn try_switch_to(&self, raw: RawSwitchRequest) -> Result<SwitchTask> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let switch = {
            let mut context = self.inner.context();
            if context.locked {
                debug!("Ignoring switch to {:?}: navigation locked", raw.target);
                return Err(Error::Busy);
            }
            context.accept(&raw).inspect_err(|e| {
                debug!("Ignoring switch: {}", e);
            })?
        };

        let inner = Arc::clone(&self.inner);
        let handle = runtime.spawn(inner.run(switch));
        Ok(SwitchTask { handle })
    }

    /// Queue `raw` to run right after the in-flight switch, replacing any
    /// request already queued. Returns `false` when nothing is in flight.
    pub fn chain(&self, raw: RawSwitchRequest) -> bool {
        self.try_chain(raw).is_ok()
    }

    pub fn try_chain(&self, raw: RawSwitchRequest) -> Result<()> {
        let mut context = self.inner.context();
        if !context.locked {
            return Err(Error::NotInFlight);
        }
        if context.queued.is_some() {
            debug!("Replacing queued switch with one to {:?}", raw.target);
        }
        context.queued = Some(raw);
        Ok(())
    }

    pub fn current_screen(&self) -> Option<String> {
        self.inner.context().current.clone()
    }

    pub fn is_locked(&self) -> bool {
        self.inner.context().locked
    }

    pub fn has_queued(&self) -> bool {
        self.inner.context().queued.is_some()
    }

    pub fn screen_ids(&self) -> Vec<String> {
        self.inner
            .context()
            .registry
            .ids()
            .map(str::to_string)
            .collect()
    }
}
