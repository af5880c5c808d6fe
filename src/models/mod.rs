pub mod debt;
pub mod issue;
pub mod report;

pub use debt::*;
pub use issue::*;
pub use report::*;
