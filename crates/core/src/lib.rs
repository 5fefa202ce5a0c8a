//! Droidtail Core
//!
//! Shared error type, tool configuration, and Gradle project introspection.

pub mod config;
pub mod error;
pub mod project;

pub use config::AppConfig;
pub use error::{DroidtailError, Result};
pub use project::ProjectInfo;
