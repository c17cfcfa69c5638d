//! Stores for application state.

pub mod logs;
mod subscribers;

pub use logs::LogStore;
pub use subscribers::Subscription;
