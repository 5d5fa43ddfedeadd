use super::{float2, format_timestamp};
use crate::model::{DashboardView, DetailPanels, SummaryColumn, SummaryRow, SummarySort};
use itertools::Itertools;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 2rem; color: #1f2933; }
h1 { margin-bottom: 0; }
.caption { color: #7b8794; margin-top: 0.25rem; }
table { border-collapse: collapse; width: 100%; margin: 0.5rem 0 1rem; }
th, td { border: 1px solid #e4e7eb; padding: 0.35rem 0.6rem; text-align: left; }
th a { color: inherit; text-decoration: none; }
details { border: 1px solid #e4e7eb; border-radius: 4px; margin: 0.75rem 0; padding: 0.5rem 1rem; }
summary { font-weight: 600; cursor: pointer; }
.alert { padding: 0.75rem 1rem; border-radius: 4px; margin-top: 0.75rem; }
.alert.success { background: #e3f9e5; color: #0e5814; }
.alert.error { background: #ffe3e3; color: #8a041a; }
"#;

/// Render the dashboard as a complete HTML page.
pub fn render_page(view: &DashboardView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - {caption}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{title}</h1>
<p class="caption">{caption}</p>
<h2>All Pipelines Overview</h2>
{summary}
{selector}
{detail}
<h2>Actions</h2>
{actions}
</body>
</html>
"#,
        title = escape(&view.title),
        caption = escape(&view.caption),
        summary = summary_table(view),
        selector = pipeline_selector(view),
        detail = detail_panels(&view.detail),
        actions = actions(view),
    )
}

/// A minimal page for requests that could not be rendered.
pub fn render_error_page(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title><style>{STYLE}</style></head>
<body>
<h1>{title}</h1>
<div class="alert error">{message}</div>
<p><a href="/">Back to the dashboard</a></p>
</body>
</html>
"#,
        title = escape(title),
        message = escape(message),
    )
}

fn summary_table(view: &DashboardView) -> String {
    let header = SummaryColumn::ALL
        .iter()
        .map(|column| {
            // Clicking the active column flips its direction, any other column sorts ascending
            let active = view.sort.column == *column;
            let next = SummarySort {
                column: *column,
                descending: active && !view.sort.descending,
            };
            let marker = match (active, view.sort.descending) {
                (true, false) => " &#9650;",
                (true, true) => " &#9660;",
                (false, _) => "",
            };
            format!(
                r#"<th><a href="{href}">{label}{marker}</a></th>"#,
                href = escape(&page_href(&view.selected, next)),
                label = escape(column.label()),
            )
        })
        .join("");

    let rows = view.summary.iter().map(summary_row).join("\n");

    format!("<table id=\"summary\">\n<thead><tr>{header}</tr></thead>\n<tbody>\n{rows}\n</tbody>\n</table>")
}

fn summary_row(row: &SummaryRow) -> String {
    let cells = [
        escape(&row.pipeline),
        row.status.to_string(),
        format_timestamp(row.started_at),
        row.sla.to_string(),
        float2(&row.avg_duration_s),
        escape(&row.owner),
        escape(&row.pipeline_type),
        escape(&row.connection),
    ];
    format!(
        "<tr>{}</tr>",
        cells.iter().map(|c| format!("<td>{c}</td>")).join("")
    )
}

fn pipeline_selector(view: &DashboardView) -> String {
    let options = view
        .pipelines
        .iter()
        .map(|pipeline| {
            let selected = if *pipeline == view.selected {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{name}"{selected}>{name}</option>"#,
                name = escape(pipeline)
            )
        })
        .join("");

    format!(
        r#"<form method="get" action="/">
{sort_fields}
<label for="pipeline">Select Pipeline for Details</label>
<select id="pipeline" name="pipeline" onchange="this.form.submit()">{options}</select>
<noscript><button type="submit">Show</button></noscript>
</form>"#,
        sort_fields = sort_fields(view.sort),
    )
}

fn detail_panels(detail: &DetailPanels) -> String {
    let metadata = &detail.metadata;
    let metadata_rows = [
        ("Pipeline ID", escape(&metadata.pipeline_id)),
        ("Pipeline Type", escape(&metadata.pipeline_type)),
        ("Connection", escape(&metadata.connection)),
        ("Owner", escape(&metadata.owner)),
        (
            "Tags",
            metadata.tags.iter().map(|tag| escape(tag)).join(", "),
        ),
    ]
    .iter()
    .map(|(key, value)| format!("<tr><th>{key}</th><td>{value}</td></tr>"))
    .join("\n");

    let run_rows = detail
        .runs
        .iter()
        .map(|run| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                format_timestamp(run.started_at),
                format_timestamp(run.ended_at),
                run.duration_s,
                run.status,
                run.sla,
            )
        })
        .join("\n");

    let event_rows = detail
        .event_log
        .iter()
        .map(|event| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                format_timestamp(event.time),
                event.level.as_str(),
                escape(&event.message),
            )
        })
        .join("\n");

    let query_rows = detail
        .query_history
        .iter()
        .map(|query| {
            format!(
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
                escape(&query.query),
                query.execution_time_ms,
                query.status.as_str(),
            )
        })
        .join("\n");

    format!(
        r#"<details id="metadata" open>
<summary>Pipeline Metadata</summary>
<table>
{metadata_rows}
</table>
</details>
<details id="run-details" open>
<summary>Run Details</summary>
<table>
<thead><tr><th>Start</th><th>End</th><th>Duration (s)</th><th>Status</th><th>SLA</th></tr></thead>
<tbody>
{run_rows}
</tbody>
</table>
</details>
<details id="event-log">
<summary>Event Log</summary>
<table>
<thead><tr><th>Time</th><th>Level</th><th>Message</th></tr></thead>
<tbody>
{event_rows}
</tbody>
</table>
</details>
<details id="query-history">
<summary>Query History</summary>
<p>Sample query history for pipeline tasks...</p>
<table>
<thead><tr><th>Query</th><th>Execution Time (ms)</th><th>Status</th></tr></thead>
<tbody>
{query_rows}
</tbody>
</table>
</details>"#
    )
}

fn actions(view: &DashboardView) -> String {
    let message = view
        .rerun
        .as_ref()
        .map(|outcome| {
            let class = if outcome.is_success() {
                "success"
            } else {
                "error"
            };
            format!(
                r#"<div class="alert {class}" id="rerun-result">{}</div>"#,
                escape(outcome.message())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<form method="post" action="/rerun">
<input type="hidden" name="pipeline" value="{pipeline}">
{sort_fields}
<button type="submit">Re-Run {pipeline}</button>
</form>
{message}"#,
        pipeline = escape(&view.selected),
        sort_fields = sort_fields(view.sort),
    )
}

/// Hidden inputs that carry the current summary order through a form submission.
fn sort_fields(sort: SummarySort) -> String {
    format!(
        r#"<input type="hidden" name="sort" value="{}">
<input type="hidden" name="desc" value="{}">"#,
        sort.column.key(),
        sort.descending
    )
}

fn page_href(pipeline: &str, sort: SummarySort) -> String {
    format!(
        "/?pipeline={pipeline}&sort={}&desc={}",
        sort.column.key(),
        sort.descending
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
