//! Utility helpers shared by the library and the CLI.

pub mod interval;

pub use interval::{format_interval, parse_interval};
