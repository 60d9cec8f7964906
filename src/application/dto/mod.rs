//! Data Transfer Objects - For API boundaries
//!
//! Request bodies for the host HTTP surface. Response bodies reuse the
//! domain value objects directly since they already derive serde.

pub mod action;
pub mod settings;

pub use action::*;
pub use settings::*;
