use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::AnalysisRun;
use crate::error::Result;
use crate::models::AggregateReport;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    documents_processed: usize,
    documents_failed: usize,
    report: &'a AggregateReport,
}

pub fn format_json(run: &AnalysisRun) -> Result<String> {
    let payload = JsonReport {
        generated_at: run.generated_at,
        documents_processed: run.documents_processed,
        documents_failed: run.documents_failed,
        report: &run.report,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

const CSV_HEADER: [&str; 12] = [
    "Source",
    "ID",
    "Category",
    "Title",
    "Severity",
    "Urgency",
    "Effort",
    "Priority Score",
    "Description",
    "Root Cause",
    "Impact",
    "Suggested Actions",
];

/// One row per top item.
pub fn format_csv(run: &AnalysisRun) -> String {
    let mut output = csv_row(CSV_HEADER.iter().map(|s| s.to_string()));

    for item in &run.report.top_items {
        output.push_str(&csv_row([
            item.source_id().to_string(),
            item.id().to_string(),
            item.category().to_string(),
            item.title().to_string(),
            item.severity().to_string(),
            item.urgency().to_string(),
            item.effort().to_string(),
            format!("{:.2}", item.priority_score()),
            item.description().to_string(),
            item.root_cause().to_string(),
            item.impact().to_string(),
            item.suggested_actions().join("; "),
        ]));
    }

    output
}

fn csv_row<I>(fields: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut row = fields
        .into_iter()
        .map(|f| escape_csv(&f))
        .collect::<Vec<_>>()
        .join(",");
    row.push_str("\r\n");
    row
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Aggregator, Classifier};
    use crate::models::RawIssue;

    fn run_with(text: &str) -> AnalysisRun {
        let item = Classifier::default()
            .build_item(&RawIssue::new(text, Some("Bugs"), "Core"), "DEBT-001")
            .unwrap();
        let items = vec![item];
        let report = Aggregator::new().aggregate(&items, 5).unwrap();
        AnalysisRun {
            items,
            report,
            documents_processed: 1,
            documents_failed: 0,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let csv = format_csv(&run_with(r#"Parser drops the "quoted, escaped" value on retry"#));
        let mut lines = csv.lines();

        assert_eq!(lines.next().unwrap().split(',').count(), 12);
        let row = lines.next().unwrap();
        assert!(row.starts_with("Core,DEBT-001,bugs,"));
        assert!(row.contains(r#""Parser drops the ""quoted, escaped"" value on retry""#));
    }

    #[test]
    fn test_escape_csv_plain_field() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
    }

    #[test]
    fn test_json_envelope() {
        let json = format_json(&run_with("Off-by-one error in the pagination cursor")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["documents_processed"], 1);
        assert_eq!(value["report"]["total_items"], 1);
        assert_eq!(value["report"]["top_items"][0]["category"], "bugs");
        assert_eq!(value["report"]["severity_distribution"].as_array().unwrap().len(), 5);
        assert!(value["generated_at"].is_string());
    }
}
