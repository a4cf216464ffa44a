//! Common types shared across the WealthWiz crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
