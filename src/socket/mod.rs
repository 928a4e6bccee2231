//! Socket and connection management.
//!
//! - [`client`]: the plain or TLS socket handed to the HTTP layer
//! - [`connectjob`]: DNS → TCP → CONNECT tunnel → TLS connection flow
//! - [`matcher`]: `NO_PROXY` bypass rules
//! - [`proxy`]: environment driven HTTP proxy selection
//! - [`tls`]: ClientHello templates and their BoringSSL application

pub mod client;
pub mod connectjob;
pub mod matcher;
pub mod proxy;
pub mod tls;
