pub mod aggregator;
pub mod classifier;
pub mod pipeline;
pub mod scorer;

pub use aggregator::Aggregator;
pub use classifier::{Classification, Classifier};
pub use pipeline::{AnalysisPipeline, AnalysisRun};
