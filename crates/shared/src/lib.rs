//! Shared types for the logdeck live-log endpoint and its clients.

pub mod models;
pub mod protocol;
pub mod error;

pub use models::*;
pub use protocol::*;
pub use error::*;
