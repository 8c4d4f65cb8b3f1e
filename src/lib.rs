//! Anime Analytics Library
//!
//! Loads an anime titles dataset, derives per-title metrics and builds the
//! render-ready data of the dashboard pages. The binaries in this crate are
//! thin hosts around [`pipeline::Dashboard`].

pub mod config;
pub mod dataset;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod server;
pub mod views;

// Re-export commonly used types for convenience
pub use dataset::{load_dataset, ColumnMapping, DatasetError, ErrorKind};
pub use filter::{evaluate_filter, FilterCriteria, GenreMatch};
pub use metrics::{derive, DerivedTable};
pub use pipeline::{Dashboard, Page, RenderedPage};
pub use server::{run_server, RequestsLoggingLevel};
