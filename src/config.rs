use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Default configuration file name
pub const CONFIG_FILE: &str = "config.json5";

/// Icon substituted when a link icon fails to load
pub const DEFAULT_FALLBACK_ICON: &str = "favicon.svg";

/// Storage key holding the explicit theme choice
pub const DEFAULT_THEME_STORAGE_KEY: &str = "dark-mode";

/// Application configuration structure
///
/// Describes the link directory page and tunes the controller that runs on it.
/// Every field has a default, so an empty `{}` file is a valid configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Name of the site displayed in the page title and header
    pub site_name: String,
    /// Clock format to use (24-hour, 12-hour, or no clock)
    pub clock: Clock,
    /// Locale for dates, times and fixed UI strings
    pub locale: Locale,
    /// Relative path of the icon used when a link icon cannot be loaded
    pub fallback_icon: String,
    /// Key under which the theme preference is persisted
    pub theme_storage_key: String,
    /// Delays, intervals and thresholds used by the controller
    pub timings: Timings,
    /// Link categories in display order
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_name: "Links".to_string(),
            clock: Clock::default(),
            locale: Locale::default(),
            fallback_icon: DEFAULT_FALLBACK_ICON.to_string(),
            theme_storage_key: DEFAULT_THEME_STORAGE_KEY.to_string(),
            timings: Timings::default(),
            categories: Vec::new(),
        }
    }
}

/// A labeled group of bookmarks
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Category {
    /// Heading shown above the group
    pub name: String,
    /// Bookmarks in display order
    pub links: Vec<Link>,
}

/// Represents a bookmarked website in the directory
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Link {
    /// Display name for the site
    pub name: String,
    /// URL of the site
    pub url: String,
    /// Optional icon URL; the fallback icon is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Timer periods and thresholds, all in milliseconds unless noted
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Timings {
    pub clock_interval_ms: u64,
    pub icon_timeout_ms: u64,
    pub toast_visible_ms: u64,
    pub toast_fade_ms: u64,
    pub reveal_delay_ms: u64,
    pub reveal_stagger_ms: u64,
    /// Vertical offset in pixels past which the back-to-top control shows
    pub back_to_top_threshold_px: f64,
    /// Number of recent random picks to avoid
    pub history_capacity: usize,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            clock_interval_ms: 1000,
            icon_timeout_ms: 5000,
            toast_visible_ms: 2000,
            toast_fade_ms: 500,
            reveal_delay_ms: 500,
            reveal_stagger_ms: 200,
            back_to_top_threshold_px: 300.0,
            history_capacity: 5,
        }
    }
}

impl Config {
    /// Load the configuration from a JSON5 file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON5 object,
    /// or fails validation
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        tracing::debug!("Loading configuration from {}", path.display());
        let config_str = fs::read_to_string(path)?;

        // Deserialize to a JSON Value first so a bare array or scalar is rejected clearly
        let value: serde_json::Value = json5::from_str(&config_str)?;
        if !value.is_object() {
            return Err(crate::error::LinkDeckError::from("Config is not an object"));
        }

        let config: Config = serde_json::from_value(value)?;
        config.validate()?;

        tracing::info!(
            "Configuration loaded with {} categories",
            config.categories.len()
        );
        Ok(config)
    }

    /// Validates names, URLs and timings
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid entry
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.site_name.trim().is_empty() {
            return Err(crate::error::LinkDeckError::from("Site name cannot be empty"));
        }
        if self.timings.history_capacity == 0 {
            return Err(crate::error::LinkDeckError::from(
                "History capacity must be at least 1",
            ));
        }
        if self.timings.clock_interval_ms == 0 {
            return Err(crate::error::LinkDeckError::from(
                "Clock interval must be positive",
            ));
        }

        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(crate::error::LinkDeckError::from(
                    "Category name cannot be empty",
                ));
            }
            for link in &category.links {
                if link.name.trim().is_empty() {
                    return Err(crate::error::LinkDeckError::from("Link name cannot be empty"));
                }
                if Url::parse(&link.url).is_err() {
                    return Err(crate::error::LinkDeckError::from(format!(
                        "Invalid URL format: {}",
                        link.url
                    )));
                }
            }
        }

        Ok(())
    }

    /// Total number of links across all categories
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.categories.iter().map(|c| c.links.len()).sum()
    }
}

/// Clock format options
///
/// Defines the format in which to display the time on the page
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Clock {
    /// 24-hour format (e.g., 13:00:00)
    #[default]
    TwentyFourHour,
    /// 12-hour format with AM/PM (e.g., 1:00:00 PM)
    TwelveHour,
    /// No clock displayed
    NoClock,
}

impl std::fmt::Display for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Clock::TwentyFourHour => f.write_str("24hour"),
            Clock::TwelveHour => f.write_str("12hour"),
            Clock::NoClock => f.write_str("noclock"),
        }
    }
}

/// Locale for formatted dates and the fixed strings the page shows
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    /// Title of the error banner
    #[must_use]
    pub fn error_title(self) -> &'static str {
        match self {
            Locale::ZhCn => "出错了",
            Locale::EnUs => "Something went wrong",
        }
    }

    /// Retry suggestion under the error message
    #[must_use]
    pub fn error_hint(self) -> &'static str {
        match self {
            Locale::ZhCn => "请刷新页面或稍后再试",
            Locale::EnUs => "Please refresh the page or try again later",
        }
    }

    #[must_use]
    pub fn no_results(self) -> &'static str {
        match self {
            Locale::ZhCn => "没有找到匹配的网站",
            Locale::EnUs => "No matching sites found",
        }
    }

    /// Prefix of the random pick toast
    #[must_use]
    pub fn toast_prefix(self) -> &'static str {
        match self {
            Locale::ZhCn => "推荐: ",
            Locale::EnUs => "Suggested: ",
        }
    }

    #[must_use]
    pub fn back_to_top_title(self) -> &'static str {
        match self {
            Locale::ZhCn => "返回顶部",
            Locale::EnUs => "Back to top",
        }
    }

    /// Toggle label offering to switch to dark mode
    #[must_use]
    pub fn switch_to_dark(self) -> &'static str {
        match self {
            Locale::ZhCn => "切换深色模式",
            Locale::EnUs => "Switch to dark mode",
        }
    }

    /// Toggle label offering to switch to light mode
    #[must_use]
    pub fn switch_to_light(self) -> &'static str {
        match self {
            Locale::ZhCn => "切换浅色模式",
            Locale::EnUs => "Switch to light mode",
        }
    }

    /// BCP 47 tag used for the `lang` attribute
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }
}
