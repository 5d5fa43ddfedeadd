mod tables;

use crate::model::DashboardView;
use std::fmt::Write;
use tables::{EventTableRow, MetadataTableRow, QueryTableRow, RunTableRow, SummaryTableRow};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render the dashboard as plain text tables for a terminal.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let detail = &view.detail;
    let metadata = &detail.metadata;

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.caption);

    section(
        &mut out,
        "All Pipelines Overview",
        view.summary.iter().map(SummaryTableRow::from),
    );

    let _ = writeln!(out, "\nSelected pipeline: {}", view.selected);

    section(
        &mut out,
        "Pipeline Metadata",
        [
            ("Pipeline ID", metadata.pipeline_id.clone()),
            ("Pipeline Type", metadata.pipeline_type.clone()),
            ("Connection", metadata.connection.clone()),
            ("Owner", metadata.owner.clone()),
            ("Tags", metadata.tags.join(", ")),
        ]
        .into_iter()
        .map(|(field, value)| MetadataTableRow { field, value }),
    );
    section(
        &mut out,
        "Run Details",
        detail.runs.iter().map(RunTableRow::from),
    );
    section(
        &mut out,
        "Event Log",
        detail.event_log.iter().map(EventTableRow::from),
    );
    section(
        &mut out,
        "Query History",
        detail.query_history.iter().map(QueryTableRow::from),
    );

    let _ = writeln!(out, "\nActions");
    match &view.rerun {
        Some(outcome) if outcome.is_success() => {
            let _ = writeln!(out, "[success] {}", outcome.message());
        }
        Some(outcome) => {
            let _ = writeln!(out, "[error] {}", outcome.message());
        }
        None => {
            let _ = writeln!(out, "Re-Run {} (pass --rerun to trigger)", view.selected);
        }
    }

    out
}

fn section<T, I>(out: &mut String, heading: &str, rows: I)
where
    T: Tabled,
    I: IntoIterator<Item = T>,
{
    let mut table = Table::new(rows);
    table.with(Style::modern());

    let _ = writeln!(out, "\n{heading}");
    let _ = writeln!(out, "{table}");
}
