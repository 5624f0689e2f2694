//! Scroll progress indicator and back-to-top control.

use crate::config::Locale;
use crate::error::Result;
use crate::page::{Insert, NodeId, PageView};
use crate::platform::ScrollMetrics;

pub const SCROLL_PROGRESS_CLASS: &str = "scroll-progress";
pub const BACK_TO_TOP_CLASS: &str = "back-to-top";
pub const VISIBLE_CLASS: &str = "visible";

/// Percentage of the scrollable range already scrolled.
///
/// Not clamped: a page shorter than the viewport divides by zero or a
/// negative range and yields `NaN` or an infinity.
#[must_use]
pub fn progress_percent(metrics: ScrollMetrics) -> f64 {
    let top = if metrics.scroll_top == 0.0 || metrics.scroll_top.is_nan() {
        metrics.body_scroll_top
    } else {
        metrics.scroll_top
    };
    top / (metrics.scroll_height - metrics.client_height) * 100.0
}

/// CSS width value for a progress percentage, spelled the way browsers
/// print non-finite numbers
#[must_use]
pub fn width_value(percent: f64) -> String {
    if percent.is_infinite() {
        let sign = if percent < 0.0 { "-" } else { "" };
        format!("{sign}Infinity%")
    } else {
        format!("{percent}%")
    }
}

/// Prepends the progress bar to `<body>`
///
/// # Errors
///
/// Returns an error if the element cannot be created or inserted
pub fn insert_progress_bar<P: PageView + ?Sized>(page: &mut P) -> Result<NodeId> {
    let bar = page.create_element("div")?;
    page.add_class(bar, SCROLL_PROGRESS_CLASS);
    let body = page.body();
    page.insert(bar, Insert::Prepend(body))?;
    Ok(bar)
}

pub fn update_progress<P: PageView + ?Sized>(page: &mut P, bar: NodeId, metrics: ScrollMetrics) {
    let width = width_value(progress_percent(metrics));
    page.set_style(bar, "width", &width);
}

/// Appends the back-to-top control to `<body>`
///
/// # Errors
///
/// Returns an error if the element cannot be created or inserted
pub fn insert_back_to_top<P: PageView + ?Sized>(page: &mut P, locale: Locale) -> Result<NodeId> {
    let button = page.create_element("div")?;
    page.add_class(button, BACK_TO_TOP_CLASS);
    page.set_text(button, "↑");
    page.set_attribute(button, "title", locale.back_to_top_title());
    let body = page.body();
    page.insert(button, Insert::Append(body))?;
    Ok(button)
}

/// Shows the control once the page is scrolled past `threshold_px`
pub fn update_back_to_top<P: PageView + ?Sized>(
    page: &mut P,
    button: NodeId,
    metrics: ScrollMetrics,
    threshold_px: f64,
) {
    if metrics.page_y_offset > threshold_px {
        page.add_class(button, VISIBLE_CLASS);
    } else {
        page.remove_class(button, VISIBLE_CLASS);
    }
}
