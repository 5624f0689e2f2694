//! # Linkdeck Library
//!
//! Client-side behavior for a static bookmark directory page: a live clock,
//! a scroll progress bar, a back-to-top control, icon fallbacks, search with
//! highlighting, a "random link" recommender and a persisted light/dark theme.
//!
//! ## Overview
//!
//! Every component works against the [`page::PageView`] trait, so the same
//! logic runs over the in-memory [`memory::MemoryPage`] in tests and over the
//! live document in the browser (the `web` feature). Timers are registrations
//! on a deterministic [`schedule::Scheduler`] that the host advances.
//!
//! ## Getting Started
//!
//! ```
//! use linkdeck::config::{Category, Config, Link};
//! use linkdeck::dashboard::Dashboard;
//! use linkdeck::memory::MemoryPage;
//! use linkdeck::platform::{FixedEnvironment, MemoryStore};
//!
//! let config = Config {
//!     categories: vec![Category {
//!         name: "Code".to_string(),
//!         links: vec![Link {
//!             name: "GitHub".to_string(),
//!             url: "https://github.com".to_string(),
//!             icon: None,
//!         }],
//!     }],
//!     ..Config::default()
//! };
//! let page = MemoryPage::from_config(&config);
//! let mut dashboard = Dashboard::new(page, FixedEnvironment::default(), MemoryStore::new(), config);
//!
//! dashboard.init();
//! let outcome = dashboard.search("git").expect("search succeeds");
//! assert_eq!(outcome.matched_links, 1);
//! ```
//!
//! ## Architecture
//!
//! - `dashboard` owns all state and wraps every entry point in the error boundary
//! - `clock`, `scroll`, `icons`, `reveal`, `search`, `random` and `theme` are the
//!   individual page behaviors
//! - `page`, `memory`, `platform` and `schedule` abstract the host
//! - `render` produces the static page the controller runs on

/// Custom error types module
///
/// Defines the `LinkDeckError` enum shared by every component. Errors never
/// escape an entry point; the boundary turns them into a banner.
pub mod error;

/// Configuration management module
///
/// Loads the page description and controller tunables from a JSON5 file and
/// provides the locale-specific fixed strings.
pub mod config;

/// Page abstraction
///
/// The minimal document interface every component reads and writes.
pub mod page;

/// In-memory document implementing the page abstraction
pub mod memory;

/// Host services: wall clock, scrolling, new tabs, OS theme, preference storage
pub mod platform;

/// Deterministic timer queue with cancel handles
pub mod schedule;

/// Error boundary that logs failures and shows a banner
pub mod boundary;

/// Time and date display
pub mod clock;

/// Scroll progress bar and back-to-top control
pub mod scroll;

/// Icon load/error/timeout race with a default icon
pub mod icons;

/// Staggered reveal of category sections
pub mod reveal;

/// Search filter with highlighting and a no-results notice
pub mod search;

/// Random link picker with a bounded history of recent picks
pub mod random;

/// Light/dark theme with a persisted explicit choice
pub mod theme;

/// The page controller tying every component together
pub mod dashboard;

/// Static page rendering
///
/// Renders the link directory from configuration using askama, honoring the
/// element ids and class names the controller expects.
pub mod render;

/// Browser bindings for the page controller
#[cfg(feature = "web")]
pub mod web;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a formatting subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Calling it more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
