//! Browser profile registries.
//!
//! One constructor per family. Each maps a version string to a
//! [`ClientSpec`](super::ClientSpec), validating every TLS profile it can
//! hand out before returning.

mod chromium;
mod firefox;
mod safari;

pub use chromium::chromium;
pub use firefox::firefox;
pub use safari::safari;

use super::version::parse_major_version;
use crate::base::{Error, Result};
use crate::socket::tls::HelloId;
use http::HeaderValue;

/// Parse `version` and reject majors below `min`.
fn supported_major<'a>(family: &'static str, version: &'a str, min: u32) -> Result<(&'a str, u32)> {
    let (major, num) = parse_major_version(version)?;
    if num < min {
        return Err(Error::UnsupportedVersion {
            family,
            version: version.to_string(),
        });
    }
    Ok((major, num))
}

/// First entry whose exclusive upper bound exceeds `major`, else `newest`.
fn select(table: &[(u32, HelloId)], newest: HelloId, major: u32) -> HelloId {
    table
        .iter()
        .find(|(bound, _)| major < *bound)
        .map_or(newest, |(_, id)| *id)
}

fn header_value(name: &'static str, value: String) -> Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(|_| Error::InvalidHeader { name })
}
