//! "Random link" recommender with a short memory of recent picks.

use crate::config::Locale;
use crate::error::{LinkDeckError, Result};
use crate::page::{Insert, NodeId, PageView};
use crate::schedule::{Scheduler, Task};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use tracing::info;

pub const RANDOM_LINK_SELECTOR: &str = ".links a";
pub const RANDOM_TOOLTIP_CLASS: &str = "random-tooltip";

/// Most recent picks first, bounded to a fixed capacity
#[derive(Debug, Clone)]
pub struct LinkHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl LinkHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Records a pick at the front, evicting the oldest beyond capacity
    pub fn record(&mut self, url: impl Into<String>) {
        self.entries.push_front(url.into());
        self.entries.truncate(self.capacity);
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|u| u == url)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// The link a pick settled on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub node: NodeId,
    /// Trimmed link text
    pub label: String,
    /// Resolved URL, as recorded in history
    pub url: String,
    /// Raw `href` attribute, as opened
    pub href: String,
}

/// Uniform random choice that avoids recently picked URLs
#[derive(Debug)]
pub struct RandomLinkPicker {
    history: LinkHistory,
    rng: StdRng,
}

impl RandomLinkPicker {
    /// Picker seeded from the operating system
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    /// Picker with a caller-provided generator, for reproducible picks
    #[must_use]
    pub fn with_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            history: LinkHistory::new(capacity),
            rng,
        }
    }

    #[must_use]
    pub fn history(&self) -> &LinkHistory {
        &self.history
    }

    /// Picks a link and records it. Links already in history are skipped
    /// unless history covers every link, in which case all are candidates.
    ///
    /// # Errors
    ///
    /// Returns [`LinkDeckError::NoLinks`] when the page has no links
    pub fn pick<P: PageView + ?Sized>(&mut self, page: &P) -> Result<Pick> {
        let links: Vec<(NodeId, String)> = page
            .query_all(RANDOM_LINK_SELECTOR)
            .into_iter()
            .map(|node| {
                let url = page
                    .resolved_href(node)
                    .or_else(|| page.attribute(node, "href"))
                    .unwrap_or_default();
                (node, url)
            })
            .collect();

        let available: Vec<&(NodeId, String)> = links
            .iter()
            .filter(|(_, url)| !self.history.contains(url))
            .collect();
        let candidates: Vec<&(NodeId, String)> = if available.is_empty() {
            links.iter().collect()
        } else {
            available
        };

        let &&(node, ref url) = candidates
            .choose(&mut self.rng)
            .ok_or(LinkDeckError::NoLinks)?;

        self.history.record(url.clone());
        let href = page.attribute(node, "href").unwrap_or_else(|| url.clone());
        Ok(Pick {
            node,
            label: page.text_content(node).trim().to_string(),
            url: url.clone(),
            href,
        })
    }
}

/// Appends the toast for `pick` to `<body>` and schedules its fade
///
/// # Errors
///
/// Returns an error if the toast cannot be created or inserted
pub fn show_toast<P: PageView + ?Sized>(
    page: &mut P,
    scheduler: &mut Scheduler,
    pick: &Pick,
    locale: Locale,
    visible_ms: u64,
) -> Result<NodeId> {
    let toast = page.create_element("div")?;
    page.add_class(toast, RANDOM_TOOLTIP_CLASS);
    page.set_text(toast, &format!("{}{}", locale.toast_prefix(), pick.label));
    let body = page.body();
    page.insert(toast, Insert::Append(body))?;
    page.set_style(toast, "opacity", "1");
    scheduler.schedule_once(visible_ms, Task::ToastFade(toast));
    info!("Random pick: {} ({})", pick.label, pick.url);
    Ok(toast)
}

/// Starts the fade-out and schedules removal once it finishes
pub fn fade_toast<P: PageView + ?Sized>(
    page: &mut P,
    scheduler: &mut Scheduler,
    toast: NodeId,
    fade_ms: u64,
) {
    page.set_style(toast, "opacity", "0");
    scheduler.schedule_once(fade_ms, Task::ToastRemove(toast));
}
