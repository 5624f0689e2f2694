//! Substring search with highlighting over the categorized link list.
//!
//! Matching is case-insensitive and literal. Before a new query is applied
//! every link is restored to plain text, so highlight markup never nests.

use crate::config::Locale;
use crate::error::{LinkDeckError, Result};
use crate::page::{require, Insert, PageView, TextSegment};
use crate::reveal::CATEGORY_SELECTOR;
use regex::{Regex, RegexBuilder};
use tracing::debug;

pub const LINK_ITEM_SELECTOR: &str = ".link-item";
pub const NO_RESULTS_CLASS: &str = "no-results";

/// What a search left visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    pub matched_links: usize,
    pub visible_categories: usize,
}

/// Builds a literal, case-insensitive matcher for `query`
///
/// # Errors
///
/// Returns an error if the escaped pattern cannot be compiled
pub fn matcher(query: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| LinkDeckError::Generic(format!("Invalid search query: {e}")))
}

/// Splits `text` into plain and highlighted runs, one highlight per
/// non-overlapping match
#[must_use]
pub fn segments(text: &str, matcher: &Regex) -> Vec<TextSegment> {
    let mut out = Vec::new();
    let mut last = 0;
    for found in matcher.find_iter(text) {
        if found.start() > last {
            out.push(TextSegment::Plain(text[last..found.start()].to_string()));
        }
        out.push(TextSegment::Highlight(found.as_str().to_string()));
        last = found.end();
    }
    if last < text.len() {
        out.push(TextSegment::Plain(text[last..].to_string()));
    }
    out
}

/// Filters and highlights links for `query`; an empty query restores the
/// full list
///
/// # Errors
///
/// Returns an error if the no-results notice cannot be placed
pub fn apply_search<P: PageView + ?Sized>(
    page: &mut P,
    query: &str,
    locale: Locale,
) -> Result<SearchOutcome> {
    let categories = page.query_all(CATEGORY_SELECTOR);

    if query.is_empty() {
        let mut outcome = SearchOutcome::default();
        for category in categories {
            page.set_style(category, "display", "block");
            outcome.visible_categories += 1;
            for link in page.query_all_within(category, LINK_ITEM_SELECTOR) {
                page.set_style(link, "display", "flex");
                page.clear_highlights(link);
                outcome.matched_links += 1;
            }
        }
        remove_notice(page);
        debug!("Search cleared");
        return Ok(outcome);
    }

    let matcher = matcher(query)?;
    let mut outcome = SearchOutcome::default();

    for category in categories {
        let mut category_has_results = false;
        for link in page.query_all_within(category, LINK_ITEM_SELECTOR) {
            page.clear_highlights(link);
            let text = page.text_content(link);
            if matcher.is_match(&text) {
                page.set_style(link, "display", "flex");
                category_has_results = true;
                outcome.matched_links += 1;
                let runs = segments(&text, &matcher);
                page.highlight(link, &text, &runs);
            } else {
                page.set_style(link, "display", "none");
            }
        }

        if category_has_results {
            page.set_style(category, "display", "block");
            outcome.visible_categories += 1;
        } else {
            page.set_style(category, "display", "none");
        }
    }

    remove_notice(page);
    if outcome.matched_links == 0 {
        let container = require(page, ".container")?;
        let footer = require(page, "footer")?;
        let notice = page.create_element("div")?;
        page.add_class(notice, NO_RESULTS_CLASS);
        page.set_text(notice, locale.no_results());
        page.insert(
            notice,
            Insert::Before {
                parent: container,
                reference: footer,
            },
        )?;
    }

    debug!(
        query,
        matched = outcome.matched_links,
        categories = outcome.visible_categories,
        "Search applied"
    );
    Ok(outcome)
}

fn remove_notice<P: PageView + ?Sized>(page: &mut P) {
    for notice in page.query_all(&format!(".{NO_RESULTS_CLASS}")) {
        page.remove(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg_text(segments: &[TextSegment]) -> Vec<(bool, &str)> {
        segments
            .iter()
            .map(|s| match s {
                TextSegment::Plain(t) => (false, t.as_str()),
                TextSegment::Highlight(t) => (true, t.as_str()),
            })
            .collect()
    }

    #[test]
    fn test_segments_keep_original_case() {
        let m = matcher("git").unwrap();
        assert_eq!(
            seg_text(&segments("GitHub", &m)),
            vec![(true, "Git"), (false, "Hub")]
        );
    }

    #[test]
    fn test_segments_every_occurrence() {
        let m = matcher("a").unwrap();
        assert_eq!(
            seg_text(&segments("banana", &m)),
            vec![
                (false, "b"),
                (true, "a"),
                (false, "n"),
                (true, "a"),
                (false, "n"),
                (true, "a"),
            ]
        );
    }

    #[test]
    fn test_query_is_literal() {
        let m = matcher("c++").unwrap();
        assert!(m.is_match("Learn C++ today"));
        assert!(!m.is_match("Learn C today"));
        let dot = matcher(".").unwrap();
        assert!(!dot.is_match("abc"));
    }

    #[test]
    fn test_segments_no_match_is_single_plain_run() {
        let m = matcher("zzz").unwrap();
        assert_eq!(seg_text(&segments("Example", &m)), vec![(false, "Example")]);
    }
}
