use crate::config::{Config, Locale};
use crate::error::Result;
use askama::Template;

/// Id of the script element carrying the serialized configuration
pub const CONFIG_ELEMENT_ID: &str = "linkdeck-config";

struct LinkView<'a> {
    name: &'a str,
    url: &'a str,
    icon: &'a str,
}

struct CategoryView<'a> {
    name: &'a str,
    links: Vec<LinkView<'a>>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    site_name: &'a str,
    lang: &'a str,
    fallback_icon: &'a str,
    toggle_label: &'a str,
    random_label: &'a str,
    categories: Vec<CategoryView<'a>>,
    config_element_id: &'a str,
    settings_json: String,
}

fn random_label(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhCn => "随机推荐",
        Locale::EnUs => "Surprise me",
    }
}

/// Render the static link directory page for `config`
///
/// The configuration is embedded as JSON so the browser controller runs
/// with the same timings, locale and clock format.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized or the
/// template fails to render
pub fn render_page(config: &Config) -> Result<String> {
    tracing::debug!("Rendering page for {} categories", config.categories.len());

    let categories = config
        .categories
        .iter()
        .map(|category| CategoryView {
            name: &category.name,
            links: category
                .links
                .iter()
                .map(|link| LinkView {
                    name: &link.name,
                    url: &link.url,
                    icon: link.icon.as_deref().unwrap_or(&config.fallback_icon),
                })
                .collect(),
        })
        .collect();

    // `</` would close the script element early
    let settings_json = serde_json::to_string(config)?.replace("</", "<\\/");

    let template = IndexTemplate {
        site_name: &config.site_name,
        lang: config.locale.tag(),
        fallback_icon: &config.fallback_icon,
        toggle_label: config.locale.switch_to_dark(),
        random_label: random_label(config.locale),
        categories,
        config_element_id: CONFIG_ELEMENT_ID,
        settings_json,
    };

    let html = template.render()?;
    tracing::info!("Rendered page with {} links", config.link_count());
    Ok(html)
}
