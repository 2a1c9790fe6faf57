//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod dashboard;
pub mod log;
pub mod normalize;
pub mod profit;
pub mod record;
pub mod source;

// Re-export main types for cleaner imports
pub use currency::{Currency, PerCurrency};
pub use dashboard::{Dashboard, NormalizedTransaction};
pub use profit::ProfitAnalysis;
pub use source::{SheetSource, SourceStatus};
