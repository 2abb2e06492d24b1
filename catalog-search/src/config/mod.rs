//! Configuration and dependency wiring for the catalog search service.

pub mod dependencies;
pub mod settings;

pub use dependencies::Dependencies;
pub use settings::{LogFormat, Settings};
