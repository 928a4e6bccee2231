//! Base types and error handling.
//!
//! - [`NetError`]: network error codes matching Chromium's `net_error_list.h`
//! - [`Error`]: profile resolution and transport configuration failures

pub mod error;
pub mod neterror;

pub use self::error::{Error, Result};
pub use self::neterror::NetError;

#[cfg(test)]
mod tests;
