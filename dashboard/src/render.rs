mod html;
mod text;

use chrono::DateTime;

pub use html::{render_error_page, render_page};
pub use text::render_text;

/// Format a Unix timestamp in seconds for display, in UTC.
pub(crate) fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}
