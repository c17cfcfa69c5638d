//! Dioxus components for the desktop viewer.

pub mod logs;

pub use logs::*;
