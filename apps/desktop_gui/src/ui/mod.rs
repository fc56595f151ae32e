//! UI layer for the desktop app: app shell and theming.

pub mod app;
pub mod theme;

pub use app::AnalyzerApp;
