pub mod config;
pub mod error;
pub mod models;
pub mod taxonomy;
pub mod analysis;
pub mod markdown;
pub mod report;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use taxonomy::RuleTables;
pub use analysis::{Aggregator, AnalysisPipeline, AnalysisRun, Classifier};
pub use markdown::{DocumentSource, FsDocumentSource, MemoryDocumentSource};
pub use report::ReportFormat;
