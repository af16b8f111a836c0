/// sTTS - a single-screen text-to-speech utility (TUI Edition)
///
/// Core library providing locale-filtered voice discovery and a
/// fire-and-forget speech form over the platform speech engine.

pub mod config;
pub mod core;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
