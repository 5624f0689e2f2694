//! Host services outside the document: wall clock, scrolling, new tabs,
//! the OS color scheme and durable key-value storage.

use crate::error::Result;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Scroll position and extent as the browser reports it, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// `document.documentElement.scrollTop`
    pub scroll_top: f64,
    /// `document.body.scrollTop`, consulted when the root reports zero
    pub body_scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    /// `window.pageYOffset`
    pub page_y_offset: f64,
}

/// Window-level services the controller needs
pub trait Environment {
    /// Current local wall-clock time
    ///
    /// # Errors
    ///
    /// Returns an error if the host clock cannot be represented
    fn local_now(&self) -> Result<NaiveDateTime>;

    /// Whether the OS asks for a dark color scheme
    fn prefers_dark_scheme(&self) -> bool;

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Smooth-scrolls the viewport to the top
    fn scroll_to_top(&mut self);

    /// Opens `url` in a new browsing context
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses to open the context
    fn open_in_new_tab(&mut self, url: &str) -> Result<()>;
}

/// Durable key-value storage for preferences
pub trait PreferenceStore {
    /// # Errors
    ///
    /// Returns an error if the storage is unavailable
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the storage is unavailable or full
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preference store kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry
    #[must_use]
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Scripted environment: fixed time, fixed scroll state, and a record of
/// the tabs it was asked to open
#[derive(Debug, Clone)]
pub struct FixedEnvironment {
    pub now: NaiveDateTime,
    pub prefers_dark: bool,
    pub metrics: ScrollMetrics,
    pub scroll_to_top_calls: usize,
    pub opened: Vec<String>,
}

impl FixedEnvironment {
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            prefers_dark: false,
            metrics: ScrollMetrics::default(),
            scroll_to_top_calls: 0,
            opened: Vec::new(),
        }
    }
}

impl Default for FixedEnvironment {
    fn default() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }
}

impl Environment for FixedEnvironment {
    fn local_now(&self) -> Result<NaiveDateTime> {
        Ok(self.now)
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.prefers_dark
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn scroll_to_top(&mut self) {
        self.scroll_to_top_calls += 1;
        self.metrics.scroll_top = 0.0;
        self.metrics.body_scroll_top = 0.0;
        self.metrics.page_y_offset = 0.0;
    }

    fn open_in_new_tab(&mut self, url: &str) -> Result<()> {
        self.opened.push(url.to_string());
        Ok(())
    }
}
