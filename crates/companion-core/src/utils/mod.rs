//! Shared utilities.

mod hashing;
mod time;

pub use hashing::stable_key;
pub use time::{format_millis, now_millis};
