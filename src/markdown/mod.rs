pub mod source;
pub mod splitter;

pub use source::{DocumentSource, FsDocumentSource, MemoryDocumentSource};
pub use splitter::DocumentSplitter;
