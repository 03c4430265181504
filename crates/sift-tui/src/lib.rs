//! sift-tui: terminal viewer over the sift query engine.
//!
//! The app state machine, keymap, and renderer are pure and fully
//! testable; only [`runtime`] talks to the terminal, and only
//! [`fs_source`] talks to the filesystem.

pub mod app;
pub mod fs_source;
pub mod headless;
pub mod keymap;
pub mod query_hints;
pub mod render;
pub mod runtime;

pub use app::{ViewSnapshot, ViewerApp, ViewerCommand, ViewerConfig, ViewerMode};
pub use fs_source::FsLineSource;
