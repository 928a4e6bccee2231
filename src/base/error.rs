use crate::base::neterror::NetError;
use crate::emulation::Platform;
use crate::socket::tls::HelloId;
use std::num::ParseIntError;
use thiserror::Error;

/// Failures while resolving a browser profile or applying it to a transport.
///
/// Every variant is terminal for the operation that produced it. A transport
/// whose configuration failed half way is not rolled back and should be
/// discarded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested major version predates the oldest profile of the family.
    #[error("{family} {version}: unsupported version")]
    UnsupportedVersion { family: &'static str, version: String },

    /// The family has no profile for the requested client platform.
    #[error("{family}: unsupported platform {platform}")]
    UnsupportedPlatform {
        family: &'static str,
        platform: Platform,
    },

    /// The leading component of a version string is not a non-negative integer.
    #[error("parsing major version {major:?}: {source}")]
    VersionParse {
        major: String,
        #[source]
        source: ParseIntError,
    },

    /// A profile table names a hello template the TLS catalogue cannot build.
    #[error("resolving TLS profile {id}: {reason}")]
    ProfileResolution { id: HelloId, reason: String },

    /// The base transport refused to switch on its HTTP/2 layer.
    #[error("enabling http2 support: {0}")]
    Http2Enable(#[source] NetError),

    /// A header template rendered into a value that is not a legal header.
    #[error("building default header {name}: invalid value")]
    InvalidHeader { name: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
