//! Icon fallback: each link icon races load, error and a timeout.
//!
//! The first of the three to arrive settles the icon; later events for the
//! same icon are ignored.

use crate::page::{NodeId, PageView};
use crate::schedule::{Scheduler, Task, TimerHandle};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const LINK_ICON_SELECTOR: &str = ".link-icon";

/// Where an icon stands in its decision window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconLoadState {
    Pending,
    Loaded,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, Copy)]
struct Watch {
    timer: TimerHandle,
    state: IconLoadState,
}

/// Tracks every icon armed at page-ready time
#[derive(Debug)]
pub struct IconFallback {
    fallback_src: String,
    watches: BTreeMap<NodeId, Watch>,
}

impl IconFallback {
    #[must_use]
    pub fn new(fallback_src: impl Into<String>) -> Self {
        Self {
            fallback_src: fallback_src.into(),
            watches: BTreeMap::new(),
        }
    }

    /// Starts a timeout for every `.link-icon` on the page. Returns the
    /// number of icons armed.
    pub fn arm<P: PageView + ?Sized>(
        &mut self,
        page: &P,
        scheduler: &mut Scheduler,
        timeout_ms: u64,
    ) -> usize {
        let icons = page.query_all(LINK_ICON_SELECTOR);
        for &icon in &icons {
            let timer = scheduler.schedule_once(timeout_ms, Task::IconTimeout(icon));
            self.watches.insert(
                icon,
                Watch {
                    timer,
                    state: IconLoadState::Pending,
                },
            );
        }
        debug!("Armed icon fallback for {} icons", icons.len());
        icons.len()
    }

    /// Icons being watched
    pub fn icons(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.watches.keys().copied()
    }

    #[must_use]
    pub fn state(&self, icon: NodeId) -> Option<IconLoadState> {
        self.watches.get(&icon).map(|w| w.state)
    }

    /// The icon loaded; its source is kept
    pub fn on_load(&mut self, icon: NodeId, scheduler: &mut Scheduler) {
        let Some(watch) = self.pending(icon) else {
            return;
        };
        scheduler.cancel(watch.timer);
        watch.state = IconLoadState::Loaded;
    }

    /// The icon failed to load; the fallback is substituted
    pub fn on_error<P: PageView + ?Sized>(
        &mut self,
        page: &mut P,
        icon: NodeId,
        scheduler: &mut Scheduler,
    ) {
        let fallback = self.fallback_src.clone();
        let Some(watch) = self.pending(icon) else {
            return;
        };
        scheduler.cancel(watch.timer);
        watch.state = IconLoadState::Failed;
        info!("Icon failed to load, using {fallback}");
        page.set_attribute(icon, "src", &fallback);
    }

    /// The decision window elapsed; an icon without pixels gets the fallback
    pub fn on_timeout<P: PageView + ?Sized>(&mut self, page: &mut P, icon: NodeId) {
        let fallback = self.fallback_src.clone();
        let Some(watch) = self.pending(icon) else {
            return;
        };
        if page.image_state(icon).is_loaded() {
            watch.state = IconLoadState::Loaded;
            return;
        }
        watch.state = IconLoadState::TimedOut;
        info!("Icon load timed out, using {fallback}");
        page.set_attribute(icon, "src", &fallback);
    }

    fn pending(&mut self, icon: NodeId) -> Option<&mut Watch> {
        self.watches
            .get_mut(&icon)
            .filter(|w| w.state == IconLoadState::Pending)
    }
}
