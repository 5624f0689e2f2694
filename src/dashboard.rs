//! The page controller.
//!
//! `Dashboard` owns the page, the host services, the timer queue and the
//! per-component state. Every public entry point runs inside the error
//! boundary: a failure is logged, shown as a banner, and never propagates.

use crate::boundary;
use crate::clock;
use crate::config::{Clock, Config};
use crate::error::Result;
use crate::icons::{IconFallback, IconLoadState};
use crate::page::{require_id, NodeId, PageView};
use crate::platform::{Environment, PreferenceStore};
use crate::random::{self, LinkHistory, Pick, RandomLinkPicker};
use crate::reveal;
use crate::schedule::{Scheduler, Task, TimerHandle};
use crate::scroll;
use crate::search::{self, SearchOutcome};
use crate::theme::{self, Theme};
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Id of the free-text search box
pub const SEARCH_INPUT_ID: &str = "searchInput";

pub struct Dashboard<P, E, S> {
    page: P,
    env: E,
    store: S,
    config: Config,
    scheduler: Scheduler,
    picker: RandomLinkPicker,
    icons: IconFallback,
    progress_bar: Option<NodeId>,
    back_to_top: Option<NodeId>,
    clock_timer: Option<TimerHandle>,
}

impl<P, E, S> Dashboard<P, E, S>
where
    P: PageView,
    E: Environment,
    S: PreferenceStore,
{
    #[must_use]
    pub fn new(page: P, env: E, store: S, config: Config) -> Self {
        let picker = RandomLinkPicker::new(config.timings.history_capacity);
        Self::with_picker(page, env, store, config, picker)
    }

    /// Controller whose random picks come from `rng`
    #[must_use]
    pub fn with_rng(page: P, env: E, store: S, config: Config, rng: StdRng) -> Self {
        let picker = RandomLinkPicker::with_rng(config.timings.history_capacity, rng);
        Self::with_picker(page, env, store, config, picker)
    }

    fn with_picker(page: P, env: E, store: S, config: Config, picker: RandomLinkPicker) -> Self {
        let icons = IconFallback::new(config.fallback_icon.clone());
        Self {
            page,
            env,
            store,
            config,
            scheduler: Scheduler::new(),
            picker,
            icons,
            progress_bar: None,
            back_to_top: None,
            clock_timer: None,
        }
    }

    /// Runs `f`, sending any error to the boundary under `context`
    fn guard<T>(&mut self, context: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Option<T> {
        match f(self) {
            Ok(value) => Some(value),
            Err(error) => {
                boundary::report(&mut self.page, self.config.locale, &error, context);
                None
            }
        }
    }

    /// Page-ready sequence. Each step is guarded on its own, so one failing
    /// step leaves the others working.
    pub fn init(&mut self) {
        info!("Initializing page controller");

        self.guard("initDarkMode function", |d| {
            theme::init_theme(
                &mut d.page,
                &d.store,
                &d.env,
                &d.config.theme_storage_key,
                d.config.locale,
            )
        });

        self.init_time_display();

        self.guard("initScrollProgress function", |d| {
            d.progress_bar = Some(scroll::insert_progress_bar(&mut d.page)?);
            Ok(())
        });

        self.guard("initBackToTopButton function", |d| {
            d.back_to_top = Some(scroll::insert_back_to_top(&mut d.page, d.config.locale)?);
            Ok(())
        });

        let timeout = self.config.timings.icon_timeout_ms;
        self.icons.arm(&self.page, &mut self.scheduler, timeout);

        let timings = &self.config.timings;
        let reveals = reveal::schedule_reveal(
            &self.page,
            &mut self.scheduler,
            timings.reveal_delay_ms,
            timings.reveal_stagger_ms,
        );
        debug!("Scheduled reveal of {} categories", reveals.len());
    }

    /// Shows the time now and refreshes it every clock interval
    pub fn init_time_display(&mut self) {
        if self.config.clock == Clock::NoClock {
            debug!("Clock disabled");
            return;
        }
        self.update_time();
        if self.clock_timer.is_none() {
            let period = self.config.timings.clock_interval_ms;
            self.clock_timer = Some(self.scheduler.schedule_every(period, Task::ClockTick));
        }
    }

    /// One clock tick; errors are reported per tick and the timer keeps running
    pub fn update_time(&mut self) {
        self.guard("updateTime function", |d| {
            let now = d.env.local_now()?;
            clock::update_time(&mut d.page, &now, d.config.clock, d.config.locale)
        });
    }

    /// Scroll listener for both the progress bar and back-to-top control
    pub fn on_scroll(&mut self) {
        let metrics = self.env.scroll_metrics();
        if let Some(bar) = self.progress_bar {
            scroll::update_progress(&mut self.page, bar, metrics);
        }
        if let Some(button) = self.back_to_top {
            let threshold = self.config.timings.back_to_top_threshold_px;
            scroll::update_back_to_top(&mut self.page, button, metrics, threshold);
        }
    }

    pub fn back_to_top_clicked(&mut self) {
        self.env.scroll_to_top();
    }

    pub fn icon_loaded(&mut self, icon: NodeId) {
        self.icons.on_load(icon, &mut self.scheduler);
    }

    pub fn icon_failed(&mut self, icon: NodeId) {
        self.icons.on_error(&mut self.page, icon, &mut self.scheduler);
    }

    /// Filters the link list for `query`
    pub fn search(&mut self, query: &str) -> Option<SearchOutcome> {
        self.guard("searchWebsites function", |d| {
            search::apply_search(&mut d.page, query, d.config.locale)
        })
    }

    /// Filters the link list for whatever the search box holds
    pub fn search_from_input(&mut self) -> Option<SearchOutcome> {
        self.guard("searchWebsites function", |d| {
            let input = require_id(&d.page, SEARCH_INPUT_ID)?;
            let query = d.page.input_value(input).unwrap_or_default();
            search::apply_search(&mut d.page, &query, d.config.locale)
        })
    }

    /// Picks a link, shows the toast and opens it in a new tab
    pub fn random_link(&mut self) -> Option<Pick> {
        self.guard("getRandomLink function", |d| {
            let pick = d.picker.pick(&d.page)?;
            random::show_toast(
                &mut d.page,
                &mut d.scheduler,
                &pick,
                d.config.locale,
                d.config.timings.toast_visible_ms,
            )?;
            d.env.open_in_new_tab(&pick.href)?;
            Ok(pick)
        })
    }

    pub fn toggle_theme(&mut self) -> Option<Theme> {
        self.guard("toggleDarkMode function", |d| {
            theme::toggle_theme(
                &mut d.page,
                &mut d.store,
                &d.config.theme_storage_key,
                d.config.locale,
            )
        })
    }

    /// Runs every task due at or before `now_ms`, in due order
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some(task) = self.scheduler.pop_due(now_ms) {
            self.run_task(task);
        }
        self.scheduler.settle(now_ms);
    }

    /// Runs every task due within the next `ms`; saturates at `u64::MAX`
    pub fn advance_by(&mut self, ms: u64) {
        let target = self.scheduler.now().saturating_add(ms);
        self.advance_to(target);
    }

    /// When the next task is due, for hosts that arm a real timer
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ClockTick => self.update_time(),
            Task::IconTimeout(icon) => self.icons.on_timeout(&mut self.page, icon),
            Task::Reveal(category) => reveal::reveal(&mut self.page, category),
            Task::ToastFade(toast) => {
                let fade = self.config.timings.toast_fade_ms;
                random::fade_toast(&mut self.page, &mut self.scheduler, toast, fade);
            }
            Task::ToastRemove(toast) => self.page.remove(toast),
        }
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &LinkHistory {
        self.picker.history()
    }

    /// Theme currently applied to the document root
    #[must_use]
    pub fn theme(&self) -> Theme {
        theme::current_theme(&self.page)
    }

    #[must_use]
    pub fn icon_state(&self, icon: NodeId) -> Option<IconLoadState> {
        self.icons.state(icon)
    }

    /// Icons armed by [`Dashboard::init`]
    #[must_use]
    pub fn watched_icons(&self) -> Vec<NodeId> {
        self.icons.icons().collect()
    }

    #[must_use]
    pub fn back_to_top_control(&self) -> Option<NodeId> {
        self.back_to_top
    }

    #[must_use]
    pub fn progress_bar(&self) -> Option<NodeId> {
        self.progress_bar
    }

    /// Number of timers still pending
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }
}
