use crate::config::{Clock, Locale};
use crate::error::{LinkDeckError, Result};
use crate::page::{require_id, PageView};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt::Write;

/// Id of the element showing the time
pub const TIME_SLOT_ID: &str = "current-time";

/// Id of the element showing the date
pub const DATE_SLOT_ID: &str = "current-date";

const ZH_WEEKDAYS: [&str; 7] = [
    "星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日",
];

fn render(now: &NaiveDateTime, pattern: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", now.format(pattern))
        .map_err(|e| LinkDeckError::Format(format!("{pattern}: {e}")))?;
    Ok(out)
}

/// Format the time of day for the time slot
///
/// Returns `None` when the clock is disabled.
///
/// # Errors
///
/// Returns an error if the time cannot be formatted
pub fn format_time(now: &NaiveDateTime, clock: Clock, locale: Locale) -> Result<Option<String>> {
    let text = match (clock, locale) {
        (Clock::NoClock, _) => return Ok(None),
        (Clock::TwentyFourHour, _) => render(now, "%H:%M:%S")?,
        (Clock::TwelveHour, Locale::EnUs) => render(now, "%-I:%M:%S %p")?,
        (Clock::TwelveHour, Locale::ZhCn) => {
            let period = if now.hour() < 12 { "上午" } else { "下午" };
            format!("{period}{}", render(now, "%-I:%M:%S")?)
        }
    };
    Ok(Some(text))
}

/// Format the long-form date (year, month name, day, weekday)
///
/// # Errors
///
/// Returns an error if the date cannot be formatted
pub fn format_date(now: &NaiveDateTime, locale: Locale) -> Result<String> {
    match locale {
        Locale::ZhCn => {
            let weekday = ZH_WEEKDAYS[now.weekday().num_days_from_monday() as usize];
            Ok(format!(
                "{}年{}月{}日{weekday}",
                now.year(),
                now.month(),
                now.day()
            ))
        }
        Locale::EnUs => render(now, "%A, %B %-d, %Y"),
    }
}

/// Writes the formatted time and date into their display slots
///
/// # Errors
///
/// Returns an error if a slot is missing or formatting fails
pub fn update_time<P: PageView + ?Sized>(
    page: &mut P,
    now: &NaiveDateTime,
    clock: Clock,
    locale: Locale,
) -> Result<()> {
    let Some(time) = format_time(now, clock, locale)? else {
        return Ok(());
    };

    let time_slot = require_id(page, TIME_SLOT_ID)?;
    page.set_text(time_slot, &time);

    let date_slot = require_id(page, DATE_SLOT_ID)?;
    let date = format_date(now, locale)?;
    page.set_text(date_slot, &date);

    tracing::trace!("Clock updated to {time}");
    Ok(())
}
