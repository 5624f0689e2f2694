#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use linkdeck::config::{Category, Config, Link};
use linkdeck::dashboard::Dashboard;
use linkdeck::memory::MemoryPage;
use linkdeck::page::{NodeId, PageView};
use linkdeck::platform::{FixedEnvironment, MemoryStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub type TestDashboard = Dashboard<MemoryPage, FixedEnvironment, MemoryStore>;

fn link(name: &str, url: &str) -> Link {
    Link {
        name: name.to_string(),
        url: url.to_string(),
        icon: Some(format!("{url}/favicon.ico")),
    }
}

pub fn test_config() -> Config {
    Config {
        site_name: "Test Links".to_string(),
        categories: vec![
            Category {
                name: "Code".to_string(),
                links: vec![
                    link("GitHub", "https://github.com"),
                    link("GitLab", "https://gitlab.com"),
                    link("Example", "https://example.com"),
                ],
            },
            Category {
                name: "Search".to_string(),
                links: vec![
                    link("Google", "https://www.google.com"),
                    link("Bing", "https://www.bing.com"),
                ],
            },
        ],
        ..Config::default()
    }
}

pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(14, 5, 9))
        .expect("valid fixed time")
}

pub fn dashboard_with(config: Config, store: MemoryStore, prefers_dark: bool) -> TestDashboard {
    let page = MemoryPage::from_config(&config);
    let mut env = FixedEnvironment::new(fixed_now());
    env.prefers_dark = prefers_dark;
    Dashboard::with_rng(page, env, store, config, StdRng::seed_from_u64(7))
}

pub fn dashboard() -> TestDashboard {
    dashboard_with(test_config(), MemoryStore::new(), false)
}

pub fn link_named(page: &MemoryPage, name: &str) -> NodeId {
    page.query_all(".link-item")
        .into_iter()
        .find(|&l| page.text_content(l) == name)
        .unwrap_or_else(|| panic!("no link named {name}"))
}

pub fn is_shown(page: &MemoryPage, node: NodeId) -> bool {
    page.style(node, "display").as_deref() != Some("none")
}
