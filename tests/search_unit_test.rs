mod common;

use common::{dashboard, is_shown, link_named};
use linkdeck::page::PageView;

#[test]
fn test_git_query_shows_and_highlights_matches() {
    let mut dashboard = dashboard();
    dashboard.init();

    let outcome = dashboard.search("git").expect("search should succeed");
    assert_eq!(outcome.matched_links, 2);
    assert_eq!(outcome.visible_categories, 1);

    let page = dashboard.page();
    for name in ["GitHub", "GitLab"] {
        let link = link_named(page, name);
        assert_eq!(page.style(link, "display").as_deref(), Some("flex"));
        let spans = page.query_all_within(link, "span.highlight");
        assert_eq!(spans.len(), 1, "{name} should carry one highlight");
        assert_eq!(page.text_content(spans[0]), "Git");
    }

    let example = link_named(page, "Example");
    assert_eq!(page.style(example, "display").as_deref(), Some("none"));
    assert!(page.query_all_within(example, "span.highlight").is_empty());

    let categories = page.query_all(".category");
    assert_eq!(page.style(categories[0], "display").as_deref(), Some("block"));
    assert_eq!(page.style(categories[1], "display").as_deref(), Some("none"));
    assert!(page.query(".no-results").is_none());
}

#[test]
fn test_unmatched_query_hides_everything_and_places_notice_before_footer() {
    let mut dashboard = dashboard();
    dashboard.init();

    // Twice, to check the notice is replaced rather than duplicated
    dashboard.search("zzzempty").expect("search should succeed");
    let outcome = dashboard.search("zzzempty").expect("search should succeed");
    assert_eq!(outcome.matched_links, 0);

    let page = dashboard.page();
    for category in page.query_all(".category") {
        assert_eq!(page.style(category, "display").as_deref(), Some("none"));
    }

    let notices = page.query_all(".no-results");
    assert_eq!(notices.len(), 1);
    let container = page.query(".container").unwrap();
    let footer = page.query("footer").unwrap();
    let children = page.children(container);
    let footer_index = children.iter().position(|&c| c == footer).unwrap();
    assert_eq!(children[footer_index - 1], notices[0]);
    assert_eq!(page.text_content(notices[0]), "没有找到匹配的网站");
}

#[test]
fn test_clearing_restores_every_link_without_markup() {
    let mut dashboard = dashboard();
    dashboard.init();

    for query in ["git", "o", "zzzempty", "B", "hub"] {
        dashboard.search(query).expect("search should succeed");
        dashboard.search("").expect("clear should succeed");

        let page = dashboard.page();
        for category in page.query_all(".category") {
            assert_eq!(page.style(category, "display").as_deref(), Some("block"));
        }
        for link in page.query_all(".link-item") {
            assert_eq!(page.style(link, "display").as_deref(), Some("flex"));
        }
        assert!(page.query(".highlight").is_none(), "leftover markup after {query}");
        assert!(page.query(".no-results").is_none());
    }
}

#[test]
fn test_visibility_matches_case_insensitive_substring() {
    let mut dashboard = dashboard();
    dashboard.init();
    let names = ["GitHub", "GitLab", "Example", "Google", "Bing"];

    for query in ["g", "GIT", "o", "Hub", "xam", "ng", "q"] {
        dashboard.search(query).expect("search should succeed");
        let page = dashboard.page();
        for name in names {
            let link = link_named(page, name);
            let expected = name.to_lowercase().contains(&query.to_lowercase());
            assert_eq!(
                is_shown(page, link),
                expected,
                "query {query:?} link {name}"
            );
        }
    }
}

#[test]
fn test_refining_query_does_not_nest_highlights() {
    let mut dashboard = dashboard();
    dashboard.init();

    dashboard.search("g").expect("search should succeed");
    dashboard.search("gi").expect("search should succeed");

    let page = dashboard.page();
    assert!(page.query_all("span.highlight span.highlight").is_empty());
    let github = link_named(page, "GitHub");
    let spans = page.query_all_within(github, "span.highlight");
    assert_eq!(spans.len(), 1);
    assert_eq!(page.text_content(spans[0]), "Gi");

    // Google matched "g" but not "gi"; its old highlight is gone
    let google = link_named(page, "Google");
    assert!(!is_shown(page, google));
    assert!(page.query_all_within(google, "span.highlight").is_empty());
}

#[test]
fn test_every_occurrence_is_highlighted() {
    let mut dashboard = dashboard();
    dashboard.init();
    dashboard.search("o").expect("search should succeed");

    let page = dashboard.page();
    let google = link_named(page, "Google");
    let spans = page.query_all_within(google, "span.highlight");
    assert_eq!(spans.len(), 2);
    assert_eq!(page.inner_html(google).matches("<span class=\"highlight\">o</span>").count(), 2);
}

#[test]
fn test_search_reads_input_value() {
    let mut dashboard = dashboard();
    dashboard.init();

    let input = dashboard.page().by_id("searchInput").unwrap();
    dashboard.page_mut().set_attribute(input, "value", "bing");
    let outcome = dashboard.search_from_input().expect("search should succeed");
    assert_eq!(outcome.matched_links, 1);
    assert!(is_shown(dashboard.page(), link_named(dashboard.page(), "Bing")));
}

#[test]
fn test_missing_footer_is_reported_by_boundary() {
    let mut dashboard = dashboard();
    dashboard.init();
    let footer = dashboard.page().query("footer").unwrap();
    dashboard.page_mut().remove(footer);

    assert!(dashboard.search("zzzempty").is_none());
    let page = dashboard.page();
    let banners = page.query_all(".error-boundary");
    assert_eq!(banners.len(), 1);
    assert!(page.text_content(banners[0]).contains("footer"));
}
