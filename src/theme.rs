//! Light/dark theme with a persisted explicit choice.
//!
//! The stored flag is `enabled` (dark) or `disabled` (light). Without a
//! stored flag the OS color scheme decides, and nothing is written until
//! the user toggles.

use crate::config::Locale;
use crate::error::Result;
use crate::page::{require_id, PageView};
use crate::platform::{Environment, PreferenceStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const MODE_TOGGLE_ID: &str = "modeToggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Value of the root `data-theme` attribute
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Persisted flag for an explicit choice
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Theme::Light => "disabled",
            Theme::Dark => "enabled",
        }
    }

    /// Parses a persisted flag; anything unrecognized counts as absent
    #[must_use]
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "enabled" => Some(Theme::Dark),
            "disabled" => Some(Theme::Light),
            _ => None,
        }
    }

    /// Toggle label, naming the mode a click would switch to
    #[must_use]
    pub fn toggle_label(self, locale: Locale) -> &'static str {
        match self {
            Theme::Light => locale.switch_to_dark(),
            Theme::Dark => locale.switch_to_light(),
        }
    }
}

/// Theme currently applied to the document root
pub fn current_theme<P: PageView + ?Sized>(page: &P) -> Theme {
    let root = page.root();
    if page.attribute(root, THEME_ATTRIBUTE).as_deref() == Some("dark") {
        Theme::Dark
    } else {
        Theme::Light
    }
}

fn apply_attribute<P: PageView + ?Sized>(page: &mut P, theme: Theme) {
    let root = page.root();
    page.set_attribute(root, THEME_ATTRIBUTE, theme.as_str());
}

fn apply_label<P: PageView + ?Sized>(page: &mut P, theme: Theme, locale: Locale) -> Result<()> {
    let toggle = require_id(page, MODE_TOGGLE_ID)?;
    page.set_text(toggle, theme.toggle_label(locale));
    Ok(())
}

/// Applies the stored choice, or the OS preference when none is stored
///
/// # Errors
///
/// Returns an error if storage is unreadable or the toggle control is missing
pub fn init_theme<P, S, E>(
    page: &mut P,
    store: &S,
    env: &E,
    key: &str,
    locale: Locale,
) -> Result<Theme>
where
    P: PageView + ?Sized,
    S: PreferenceStore + ?Sized,
    E: Environment + ?Sized,
{
    let stored = store.get(key)?;
    let theme = match stored.as_deref().and_then(Theme::from_flag) {
        Some(theme) => {
            debug!("Using stored theme {}", theme.as_str());
            theme
        }
        None if env.prefers_dark_scheme() => Theme::Dark,
        None => Theme::Light,
    };
    apply_attribute(page, theme);
    apply_label(page, theme, locale)?;
    Ok(theme)
}

/// Flips the active theme and persists the new explicit choice
///
/// # Errors
///
/// Returns an error if storage rejects the write or the toggle control is missing
pub fn toggle_theme<P, S>(page: &mut P, store: &mut S, key: &str, locale: Locale) -> Result<Theme>
where
    P: PageView + ?Sized,
    S: PreferenceStore + ?Sized,
{
    let next = current_theme(page).toggled();
    apply_attribute(page, next);
    store.set(key, next.flag())?;
    apply_label(page, next, locale)?;
    info!("Theme switched to {}", next.as_str());
    Ok(next)
}
