//! Library crate for vhost-sweep exposing the sweep pipeline.
pub mod checker;
pub mod config;
pub mod error;
pub mod names;
pub mod notifier;
pub mod prober;
pub mod report;
pub mod types;
