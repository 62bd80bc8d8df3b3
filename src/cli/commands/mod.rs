//! CLI command implementations.

pub mod config;
pub mod providers;
pub mod sessions;
pub mod signals;
pub mod source;
pub mod validate;
