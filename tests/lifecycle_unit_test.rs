mod common;

use chrono::Duration;
use common::{dashboard, dashboard_with, test_config};
use linkdeck::clock::{DATE_SLOT_ID, TIME_SLOT_ID};
use linkdeck::config::{Clock, Config, Locale};
use linkdeck::icons::IconLoadState;
use linkdeck::page::{ImageState, PageView};
use linkdeck::platform::{MemoryStore, ScrollMetrics};
use linkdeck::scroll::VISIBLE_CLASS;

fn slot(dashboard: &common::TestDashboard, id: &str) -> String {
    let page = dashboard.page();
    page.text_content(page.by_id(id).expect("slot present"))
}

#[test]
fn test_clock_fills_slots_and_ticks_every_second() {
    let mut dashboard = dashboard();
    dashboard.init();
    assert_eq!(slot(&dashboard, TIME_SLOT_ID), "14:05:09");
    assert_eq!(slot(&dashboard, DATE_SLOT_ID), "2024年1月15日星期一");

    dashboard.env_mut().now += Duration::seconds(1);
    dashboard.advance_by(999);
    assert_eq!(slot(&dashboard, TIME_SLOT_ID), "14:05:09");
    dashboard.advance_by(1);
    assert_eq!(slot(&dashboard, TIME_SLOT_ID), "14:05:10");
}

#[test]
fn test_english_twelve_hour_clock() {
    let config = Config {
        clock: Clock::TwelveHour,
        locale: Locale::EnUs,
        ..test_config()
    };
    let mut dashboard = dashboard_with(config, MemoryStore::new(), false);
    dashboard.init();
    assert_eq!(slot(&dashboard, TIME_SLOT_ID), "2:05:09 PM");
    assert_eq!(slot(&dashboard, DATE_SLOT_ID), "Monday, January 15, 2024");
}

#[test]
fn test_disabled_clock_leaves_slots_alone() {
    let config = Config {
        clock: Clock::NoClock,
        ..test_config()
    };
    let mut dashboard = dashboard_with(config, MemoryStore::new(), false);
    dashboard.init();
    assert_eq!(slot(&dashboard, TIME_SLOT_ID), "");

    let before = dashboard.pending_timers();
    dashboard.advance_by(10_000);
    assert_eq!(slot(&dashboard, TIME_SLOT_ID), "");
    assert!(dashboard.pending_timers() <= before);
}

#[test]
fn test_missing_clock_slot_reports_each_tick() {
    let mut dashboard = dashboard();
    let time_slot = dashboard.page().by_id(TIME_SLOT_ID).unwrap();
    dashboard.page_mut().remove(time_slot);

    dashboard.init();
    assert_eq!(dashboard.page().query_all(".error-boundary").len(), 1);

    dashboard.advance_by(1000);
    dashboard.advance_by(1000);
    let page = dashboard.page();
    let banners = page.query_all(".error-boundary");
    assert_eq!(banners.len(), 3);
    assert!(page.text_content(banners[0]).contains("current-time"));
    // the rest of the page keeps working
    assert!(dashboard.page().query(".scroll-progress").is_some());
}

#[test]
fn test_scroll_updates_progress_and_back_to_top() {
    let mut dashboard = dashboard();
    dashboard.init();
    let bar = dashboard.progress_bar().expect("progress bar inserted");
    let button = dashboard.back_to_top_control().expect("button inserted");
    let page = dashboard.page();
    assert_eq!(page.children(page.body())[0], bar);
    assert!(!page.has_class(button, VISIBLE_CLASS));

    dashboard.env_mut().metrics = ScrollMetrics {
        scroll_top: 500.0,
        body_scroll_top: 0.0,
        scroll_height: 2000.0,
        client_height: 1000.0,
        page_y_offset: 500.0,
    };
    dashboard.on_scroll();
    assert_eq!(dashboard.page().style(bar, "width").as_deref(), Some("50%"));
    assert!(dashboard.page().has_class(button, VISIBLE_CLASS));

    dashboard.back_to_top_clicked();
    assert_eq!(dashboard.env().scroll_to_top_calls, 1);
    dashboard.on_scroll();
    assert_eq!(dashboard.page().style(bar, "width").as_deref(), Some("0%"));
    assert!(!dashboard.page().has_class(button, VISIBLE_CLASS));
}

#[test]
fn test_back_to_top_threshold_is_exclusive() {
    let mut dashboard = dashboard();
    dashboard.init();
    let button = dashboard.back_to_top_control().unwrap();

    dashboard.env_mut().metrics.page_y_offset = 300.0;
    dashboard.on_scroll();
    assert!(!dashboard.page().has_class(button, VISIBLE_CLASS));
    dashboard.env_mut().metrics.page_y_offset = 301.0;
    dashboard.on_scroll();
    assert!(dashboard.page().has_class(button, VISIBLE_CLASS));
}

#[test]
fn test_failed_icon_is_replaced_once() {
    let mut dashboard = dashboard();
    dashboard.init();
    let icons = dashboard.watched_icons();
    assert_eq!(icons.len(), 5);
    let icon = icons[0];

    dashboard.icon_failed(icon);
    assert_eq!(dashboard.icon_state(icon), Some(IconLoadState::Failed));
    assert_eq!(
        dashboard.page().attribute(icon, "src").as_deref(),
        Some("favicon.svg")
    );

    // a later error or timeout leaves the fallback in place
    dashboard.page_mut().set_attribute(icon, "src", "custom.png");
    dashboard.icon_failed(icon);
    dashboard.advance_by(5000);
    assert_eq!(
        dashboard.page().attribute(icon, "src").as_deref(),
        Some("custom.png")
    );
    assert_eq!(dashboard.icon_state(icon), Some(IconLoadState::Failed));
}

#[test]
fn test_icon_timeout_checks_pixels() {
    let mut dashboard = dashboard();
    dashboard.init();
    let icons = dashboard.watched_icons();
    let (slow, painted, loaded) = (icons[1], icons[2], icons[3]);
    let original = dashboard.page().attribute(painted, "src");

    dashboard.page_mut().set_image_state(
        painted,
        ImageState {
            complete: true,
            natural_width: 16,
        },
    );
    dashboard.icon_loaded(loaded);

    dashboard.advance_by(4999);
    assert_eq!(dashboard.icon_state(slow), Some(IconLoadState::Pending));
    dashboard.advance_by(1);

    assert_eq!(dashboard.icon_state(slow), Some(IconLoadState::TimedOut));
    assert_eq!(
        dashboard.page().attribute(slow, "src").as_deref(),
        Some("favicon.svg")
    );
    assert_eq!(dashboard.icon_state(painted), Some(IconLoadState::Loaded));
    assert_eq!(dashboard.page().attribute(painted, "src"), original);
    assert_eq!(dashboard.icon_state(loaded), Some(IconLoadState::Loaded));
}

#[test]
fn test_categories_reveal_in_stagger() {
    let mut dashboard = dashboard();
    dashboard.init();
    let categories = dashboard.page().query_all(".category");
    assert_eq!(categories.len(), 2);

    dashboard.advance_to(499);
    assert!(!dashboard.page().has_class(categories[0], VISIBLE_CLASS));
    dashboard.advance_to(500);
    assert!(dashboard.page().has_class(categories[0], VISIBLE_CLASS));
    assert!(!dashboard.page().has_class(categories[1], VISIBLE_CLASS));
    dashboard.advance_to(700);
    assert!(dashboard.page().has_class(categories[1], VISIBLE_CLASS));
}

#[test]
fn test_init_on_bare_page_does_not_panic() {
    let page = linkdeck::memory::MemoryPage::new();
    let env = linkdeck::platform::FixedEnvironment::new(common::fixed_now());
    let mut dashboard =
        linkdeck::dashboard::Dashboard::new(page, env, MemoryStore::new(), Config::default());
    dashboard.init();
    dashboard.advance_by(10_000);
    assert!(dashboard.search("x").is_none());
    assert!(dashboard.random_link().is_none());
    assert!(dashboard.toggle_theme().is_none());
}

#[test]
fn test_advancing_to_end_of_time_settles() {
    let mut dashboard = dashboard();
    dashboard.init();
    dashboard.advance_by(10);
    dashboard.env_mut().now += Duration::seconds(1);
    dashboard.advance_by(u64::MAX);

    // the clock ticked once on the way and every one-shot task ran
    assert_eq!(slot(&dashboard, TIME_SLOT_ID), "14:05:10");
    for category in dashboard.page().query_all(".category") {
        assert!(dashboard.page().has_class(category, VISIBLE_CLASS));
    }
    assert_eq!(dashboard.pending_timers(), 0);

    dashboard.advance_by(u64::MAX);
    assert_eq!(dashboard.next_due(), None);
}
