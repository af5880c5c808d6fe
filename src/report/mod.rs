pub mod export;
pub mod markdown;

use clap::ValueEnum;
use std::path::PathBuf;

use crate::analysis::AnalysisRun;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
    Csv,
}

pub fn render(format: ReportFormat, run: &AnalysisRun) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(markdown::format_text(run)),
        ReportFormat::Markdown => Ok(markdown::format_markdown(run)),
        ReportFormat::Json => export::format_json(run),
        ReportFormat::Csv => Ok(export::format_csv(run)),
    }
}

/// Renders the run once per requested output and writes each file.
pub fn write_outputs(run: &AnalysisRun, outputs: &[(ReportFormat, PathBuf)]) -> Result<()> {
    for (format, path) in outputs {
        std::fs::write(path, render(*format, run)?)?;
        tracing::info!("{:?} report written to: {}", format, path.display());
    }
    Ok(())
}

pub(crate) fn severity_badge(severity: u8) -> String {
    let icon = match severity {
        5 => "🔴",
        4 => "🟠",
        3 => "🟡",
        2 => "🟢",
        _ => "⚪",
    };
    format!(
        "{} {} ({}/5)",
        icon,
        crate::models::SeverityBand::from_severity(severity),
        severity
    )
}
