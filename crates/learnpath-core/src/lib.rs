//! Learnpath core: shared errors and configuration traits.
//!
//! This crate has no internal learnpath dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Configuration abstraction

pub mod error;
pub mod traits;

pub use error::{Error, Result};
pub use traits::ConfigProvider;
