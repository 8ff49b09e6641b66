//! View-layer interface
//!
//! The coordinator never touches rendering directly. It reads geometry from,
//! and issues style and animation commands to, an implementation of
//! [`ViewLayer`] supplied by the host.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::warn;

use crate::geometry::Size;
use crate::style::StyleDelta;

/// A panel taking part in mutually-exclusive display
pub trait Screen: Clone + Send + Sync + 'static {
    /// Identifier used to address the screen; screens without one are ignored
    fn id(&self) -> Option<&str>;

    /// Rendered outer box size
    fn outer_size(&self) -> Size;
}

pub trait ViewLayer: Send + Sync + 'static {
    type Screen: Screen;

    /// All candidate screens, in document order
    fn query_screens(&self) -> Vec<Self::Screen>;

    /// Screens pre-marked as the default, in document order
    fn query_default_marked(&self) -> Vec<Self::Screen>;

    /// Add or remove the default marker on a screen
    fn set_default_marker(&self, screen: &Self::Screen, marked: bool);

    /// Apply styles instantly
    fn apply_styles(&self, screen: &Self::Screen, styles: &StyleDelta);

    /// Start tweening `screen` towards `styles`.
    ///
    /// The animation must have started by the time this returns; the
    /// returned [`Completion`] resolves when it ends.
    fn animate(&self, screen: &Self::Screen, styles: &StyleDelta, duration: Duration) -> Completion;

    fn viewport_size(&self) -> Size;

    /// Vertical scroll offset of the host page
    fn scroll_top(&self) -> u32;

    /// Start scrolling the page to the top
    fn scroll_to_top(&self, duration: Duration) -> Completion;
}

/// Future resolved by the view layer when an animation or scroll ends
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<()>,
}

/// Host-side half of a [`Completion`]
#[derive(Debug)]
pub struct Completer {
    tx: oneshot::Sender<()>,
}

impl Completion {
    pub fn channel() -> (Completer, Completion) {
        let (tx, rx) = oneshot::channel();
        (Completer { tx }, Completion { rx })
    }

    /// A completion that has already fired
    pub fn ready() -> Completion {
        let (completer, completion) = Self::channel();
        completer.complete();
        completion
    }
}

impl Completer {
    pub fn complete(self) {
        // The receiver may already be gone if the coordinator was dropped
        let _ = self.tx.send(());
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(()),
            Poll::Ready(Err(_)) => {
                warn!("View layer dropped an animation without completing it");
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
