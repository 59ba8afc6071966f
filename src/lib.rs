pub mod config;
pub mod delay_manager;
pub mod export;
pub mod extractor;
pub mod logger;
pub mod page_fetcher;
pub mod pipeline;
pub mod query_builder;
pub mod search_engine;

// Exporting types for convenience
pub use config::{ConfigError, ModeInput, ScanConfig, ValidScan};
pub use delay_manager::DelayPolicy;
pub use extractor::{extract_contacts, ContactInfo, Extractor};
pub use page_fetcher::{FetchFailure, PageFetcher};
pub use pipeline::{Pipeline, ResultRow, ScanMode, ScanOutcome, ScanStatus};
pub use search_engine::{SearchEngine, SearchError, SearchItem, SearchPage};
