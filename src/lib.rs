// Reftree - explore a paper's references-of-references through Crossref

pub mod config;
pub mod crossref; // Crossref REST API client and wire records
pub mod models;
pub mod render;
pub mod tree; // Bounded reference tree construction with per-session cache
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use crossref::{CrossrefClient, WorkSource};
pub use tree::{ReferenceTreeBuilder, SearchReport, TreeOutcome};
pub use types::{AppError, AppResult};
