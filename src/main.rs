use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use debtrank::markdown::DocumentSplitter;
use debtrank::{
    report, AnalysisPipeline, Classifier, Config, FsDocumentSource, PipelineConfig, ReportFormat,
    RuleTables,
};

#[derive(Parser, Debug)]
#[command(name = "debtrank")]
#[command(version = "0.1.0")]
#[command(about = "Turn code-review markdown into a ranked technical debt backlog")]
struct Args {
    /// Directory containing markdown code review summaries
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: ReportFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a Markdown report to this file
    #[arg(long)]
    output_md: Option<PathBuf>,

    /// Also write a JSON report to this file
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Also write a CSV report to this file
    #[arg(long)]
    output_csv: Option<PathBuf>,

    /// Number of top priority items to highlight
    #[arg(long)]
    top_n: Option<usize>,

    /// Maximum number of files to process
    #[arg(long)]
    max_files: Option<usize>,

    /// Number of documents loaded concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Bullets of this many characters or fewer are ignored
    #[arg(long)]
    min_issue_len: Option<usize>,

    /// Continue processing even if some files fail to load
    #[arg(long)]
    skip_errors: bool,

    /// Run the analysis but do not write any output
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debtrank=debug" } else { "debtrank=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration, CLI flags win
    let mut config = Config::from_env()?;
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(max_files) = args.max_files {
        config.max_files = Some(max_files);
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency_limit = concurrency.max(1);
    }
    config.skip_errors |= args.skip_errors;
    if let Some(min_issue_len) = args.min_issue_len {
        config.min_issue_len = min_issue_len;
    }

    let source = FsDocumentSource::new(&args.input_dir);
    let classifier = Classifier::new(RuleTables::new());
    let splitter = DocumentSplitter::new().with_min_issue_len(config.min_issue_len);
    let pipeline = AnalysisPipeline::new(source, classifier, PipelineConfig::from(&config))
        .with_splitter(splitter);

    // Run analysis
    tracing::info!("Starting analysis of {}", args.input_dir.display());
    let run = pipeline.run().await?;

    tracing::info!(
        "Identified {} debt items across {} sources",
        run.report.total_items,
        run.report.total_sources
    );

    if args.dry_run {
        tracing::info!("Dry run: skipping {:?} report output", args.format);
        return Ok(());
    }

    // Output results
    let mut outputs: Vec<(ReportFormat, PathBuf)> = [
        (ReportFormat::Markdown, args.output_md.clone()),
        (ReportFormat::Json, args.output_json.clone()),
        (ReportFormat::Csv, args.output_csv.clone()),
    ]
    .into_iter()
    .filter_map(|(format, path)| path.map(|p| (format, p)))
    .collect();

    if let Some(ref path) = args.output {
        outputs.push((args.format, path.clone()));
    } else if outputs.is_empty() {
        println!("{}", report::render(args.format, &run)?);
    }

    report::write_outputs(&run, &outputs)?;

    Ok(())
}
