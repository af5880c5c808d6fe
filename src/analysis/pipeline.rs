use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::analysis::aggregator::Aggregator;
use crate::analysis::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::markdown::{DocumentSource, DocumentSplitter};
use crate::models::{AggregateReport, DebtItem, DocumentRef, RawIssue};

/// Everything one run produced, ready for rendering.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub items: Vec<DebtItem>,
    pub report: AggregateReport,
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub generated_at: DateTime<Utc>,
}

pub struct AnalysisPipeline {
    source: Arc<dyn DocumentSource>,
    splitter: DocumentSplitter,
    classifier: Classifier,
    aggregator: Aggregator,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(
        source: impl DocumentSource + 'static,
        classifier: Classifier,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            splitter: DocumentSplitter::new(),
            classifier,
            aggregator: Aggregator::new(),
            config,
        }
    }

    pub fn with_splitter(mut self, splitter: DocumentSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub async fn run(&self) -> Result<AnalysisRun> {
        if self.config.top_n == 0 {
            return Err(Error::InvalidTopN(self.config.top_n));
        }

        // Step 1: Discover documents
        tracing::info!("Scanning {}", self.source.name());
        let mut documents = self.source.discover().await?;

        if let Some(max) = self.config.max_files {
            documents.truncate(max);
        }

        if documents.is_empty() {
            return Err(Error::NoDocuments(self.source.name().to_string()));
        }
        tracing::info!("Found {} documents to process", documents.len());

        // Step 2: Load and split documents concurrently
        let results = self.load_all(&documents).await;

        // Step 3: Merge in discovery order
        let mut issues = Vec::new();
        let mut documents_processed = 0;
        let mut documents_failed = 0;

        for (doc, result) in documents.iter().zip(results) {
            match result {
                Ok(Some(doc_issues)) => {
                    tracing::info!(
                        "Extracted {} raw issues from {}",
                        doc_issues.len(),
                        doc.source_id
                    );
                    documents_processed += 1;
                    issues.extend(doc_issues);
                }
                Ok(None) => {
                    tracing::warn!("Skipping empty document: {}", doc.location);
                }
                Err(e) if self.config.skip_errors && e.is_skippable() => {
                    tracing::warn!("Skipping {}: {}", doc.location, e);
                    documents_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        // Step 4: Classify and score
        let items = self.classify_issues(&issues)?;
        tracing::info!("Classified {} debt items", items.len());

        // Step 5: Aggregate
        let report = self.aggregator.aggregate(&items, self.config.top_n)?;

        Ok(AnalysisRun {
            items,
            report,
            documents_processed,
            documents_failed,
            generated_at: Utc::now(),
        })
    }

    /// Builds debt items in input order, numbering them `DEBT-NNN` per source.
    pub fn classify_issues(&self, issues: &[RawIssue]) -> Result<Vec<DebtItem>> {
        let mut counters: HashMap<&str, usize> = HashMap::new();

        issues
            .iter()
            .map(|issue| {
                let counter = counters.entry(issue.source_id.as_str()).or_insert(0);
                *counter += 1;
                self.classifier
                    .build_item(issue, format!("DEBT-{:03}", counter))
            })
            .collect()
    }

    async fn load_all(&self, documents: &[DocumentRef]) -> Vec<Result<Option<Vec<RawIssue>>>> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));

        let pb = if documents.len() > 1 {
            ProgressBar::new(documents.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        let futures = documents.iter().map(|doc| {
            let sem = semaphore.clone();
            let pb = pb.clone();

            async move {
                let _permit = sem.acquire().await.ok();
                let result = self.source.load(doc).await.map(|loaded| {
                    if loaded.content.trim().is_empty() {
                        None
                    } else {
                        Some(self.splitter.split(&loaded.content, &loaded.source_id))
                    }
                });
                pb.inc(1);
                result
            }
        });

        let results = join_all(futures).await;
        pb.finish_with_message("Loaded all documents");
        results
    }
}
