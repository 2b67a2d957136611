pub mod client;
pub mod creds;
pub mod download;
pub mod error;
pub mod links;
pub mod navigator;
pub mod portal;
pub mod rate_limit;
pub mod score;
pub mod submission;

#[cfg(test)]
mod fixtures;
mod util;

pub use error::{AuthError, Error, LayoutError, Result};
