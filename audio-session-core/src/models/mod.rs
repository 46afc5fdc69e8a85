pub mod attributes;
pub mod capabilities;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod latency;
pub mod permissions;
pub mod state;
