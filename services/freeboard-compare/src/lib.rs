//! Compare ICESat freeboard with E3SM sea-ice output.
//!
//! The binary wraps these modules; they are exposed as a library so the
//! pipeline can be driven from tests.

pub mod config;
pub mod config_loader;
pub mod pipeline;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{run_compare, CompareReport};
