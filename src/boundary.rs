//! Terminal error handler for every page entry point.
//!
//! Failures are logged and turned into a banner at the top of the main
//! container. Reporting itself never fails; when the container is missing
//! the error is only logged.

use crate::config::Locale;
use crate::error::LinkDeckError;
use crate::page::{Insert, PageView};
use tracing::{error, warn};

/// Class carried by the inserted banner
pub const ERROR_BOUNDARY_CLASS: &str = "error-boundary";

/// Logs `error` with its context label and prepends a banner to `.container`.
///
/// Repeated calls insert repeated banners.
pub fn report<P: PageView + ?Sized>(
    page: &mut P,
    locale: Locale,
    error: &LinkDeckError,
    context: &str,
) {
    error!(context, %error, "Error caught by error boundary");

    let Some(container) = page.query(".container") else {
        warn!(context, "No .container element; error banner not shown");
        return;
    };

    let message = error.to_string();
    let built = (|| -> crate::error::Result<()> {
        let banner = page.create_element("div")?;
        page.add_class(banner, ERROR_BOUNDARY_CLASS);
        for (tag, text) in [
            ("h3", locale.error_title()),
            ("p", message.as_str()),
            ("p", locale.error_hint()),
        ] {
            let line = page.create_element(tag)?;
            page.set_text(line, text);
            page.insert(line, Insert::Append(banner))?;
        }
        page.insert(banner, Insert::Prepend(container))
    })();

    if let Err(e) = built {
        warn!(context, "Failed to show error banner: {e}");
    }
}
