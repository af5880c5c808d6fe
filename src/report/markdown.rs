use crate::analysis::AnalysisRun;

use super::severity_badge;

pub fn format_text(run: &AnalysisRun) -> String {
    let report = &run.report;
    let mut output = String::new();

    output.push_str("\n=== Technical Debt Analysis ===\n\n");
    output.push_str(&format!("Documents analyzed: {}\n", run.documents_processed));
    if run.documents_failed > 0 {
        output.push_str(&format!("Documents skipped: {}\n", run.documents_failed));
    }
    output.push_str(&format!("Debt items: {}\n", report.total_items));
    output.push_str(&format!("Average severity: {:.2} / 5\n", report.average_severity));
    output.push_str(&format!("Average priority: {:.2} / 100\n\n", report.average_priority));

    output.push_str("Top Priority Items:\n");
    for (idx, item) in report.top_items.iter().enumerate() {
        output.push_str(&format!(
            "  {}. [{:.2}] {} ({}, {}): {}\n",
            idx + 1,
            item.priority_score(),
            item.id(),
            item.source_id(),
            item.category(),
            item.title()
        ));
    }

    output.push_str("\nCategories:\n");
    for entry in report.category_counts.iter().filter(|c| c.count > 0) {
        output.push_str(&format!(
            "  - {}: {} ({:.1}%)\n",
            entry.category, entry.count, entry.percentage
        ));
    }

    output.push_str("\nSources by total priority:\n");
    for ranking in &report.source_rankings {
        output.push_str(&format!(
            "  - {}: {:.2} ({} items)\n",
            ranking.source_id, ranking.total_priority_score, ranking.item_count
        ));
    }

    output.push_str(&format!(
        "\nGenerated on: {}\n",
        run.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

pub fn format_markdown(run: &AnalysisRun) -> String {
    let report = &run.report;
    let mut output = String::new();

    output.push_str("# Technical Debt Analysis Report\n\n");
    output.push_str(&format!(
        "**Generated:** {}\n\n---\n\n",
        run.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    // Executive summary
    output.push_str("## Executive Summary\n\n");
    output.push_str(&format!(
        "- **Total Sources Analyzed:** {}\n",
        report.total_sources
    ));
    output.push_str(&format!(
        "- **Total Debt Items Identified:** {}\n",
        report.total_items
    ));
    output.push_str(&format!(
        "- **Average Severity:** {:.2} / 5.0\n",
        report.average_severity
    ));
    output.push_str(&format!(
        "- **Average Priority Score:** {:.2} / 100\n\n",
        report.average_priority
    ));

    // Top priority items
    output.push_str("## Top Priority Items\n\n");
    output.push_str(
        "These items should be addressed first based on severity, urgency, and effort.\n\n",
    );

    for (idx, item) in report.top_items.iter().enumerate() {
        output.push_str(&format!("### {}. {}\n\n", idx + 1, item.title()));
        output.push_str(&format!("**Source:** {}  \n", item.source_id()));
        output.push_str(&format!("**Category:** {}  \n", item.category()));
        output.push_str(&format!(
            "**Priority Score:** {:.2} / 100  \n",
            item.priority_score()
        ));
        output.push_str(&format!("**Severity:** {}  \n", severity_badge(item.severity())));
        output.push_str(&format!("**Urgency:** {}/5  \n", item.urgency()));
        output.push_str(&format!("**Effort:** {}/5  \n\n", item.effort()));
        output.push_str(&format!("**Description:** {}\n\n", item.description()));

        if !item.root_cause().is_empty() {
            output.push_str(&format!("**Root Cause:** {}\n\n", item.root_cause()));
        }
        if !item.impact().is_empty() {
            output.push_str(&format!("**Impact:** {}\n\n", item.impact()));
        }
        if !item.suggested_actions().is_empty() {
            output.push_str("**Suggested Actions:**\n");
            for action in item.suggested_actions() {
                output.push_str(&format!("- {}\n", action));
            }
            output.push('\n');
        }

        output.push_str("---\n\n");
    }

    // Category breakdown, largest first
    output.push_str("## Category Breakdown\n\n");
    if report.is_empty() {
        output.push_str("No categories found.\n\n");
    } else {
        let mut categories: Vec<_> = report.category_counts.iter().filter(|c| c.count > 0).collect();
        categories.sort_by(|a, b| b.count.cmp(&a.count));

        output.push_str("| Category | Count | Percentage |\n");
        output.push_str("|----------|-------|------------|\n");
        for entry in categories {
            output.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                escape_cell(entry.category.as_str()),
                entry.count,
                entry.percentage
            ));
        }
        output.push('\n');
    }

    // Source rankings
    output.push_str("## Source Rankings\n\n");
    output.push_str("Sources ranked by total priority score (higher = more urgent debt).\n\n");
    output.push_str("| Rank | Source | Items | Total Priority Score |\n");
    output.push_str("|------|--------|-------|----------------------|\n");
    for (rank, ranking) in report.source_rankings.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {} | {} | {:.2} |\n",
            rank + 1,
            escape_cell(&ranking.source_id),
            ranking.item_count,
            ranking.total_priority_score
        ));
    }
    output.push('\n');

    // Severity distribution, most severe first
    output.push_str("## Severity Distribution\n\n");
    output.push_str("| Severity | Count | Percentage |\n");
    output.push_str("|----------|-------|------------|\n");
    for bucket in report.severity_distribution.iter().rev() {
        output.push_str(&format!(
            "| {} - {} | {} | {:.1}% |\n",
            bucket.severity, bucket.label, bucket.count, bucket.percentage
        ));
    }

    output.push_str("\n---\n\n*Report generated by debtrank*\n");

    output
}

/// Keeps `|` inside a table cell from starting a new column.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
