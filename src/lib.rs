//! # mimic
//!
//! An HTTP client transport that looks like a real browser on the wire.
//!
//! `mimic` resolves a browser identity (family, brand, version) and a client
//! platform into a TLS ClientHello template, an HTTP/2 connection profile and
//! a set of default headers, then applies them to every request issued
//! through a [`Transport`].
//!
//! ## Features
//!
//! - **TLS fingerprinting**: Chromium, Safari/iOS and Firefox ClientHello
//!   templates applied to BoringSSL
//! - **HTTP/2 fingerprinting**: SETTINGS order and values, connection window,
//!   HEADERS priority and pseudo-header order
//! - **Default headers**: User-Agent per platform and Chromium client hints
//!   with GREASE brands
//! - **Header order**: randomized per request unless the caller pins one
//! - **Proxy support**: `HTTP(S)_PROXY` / `NO_PROXY` from the environment,
//!   CONNECT tunnels with basic auth
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mimic::{chromium, Brand, Platform, RoundTrip, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let spec = chromium(Brand::Chrome, "137.0.0.0")?;
//!     let transport = Transport::new(&spec, Platform::Windows)?;
//!
//!     let request = http::Request::get("https://example.com").body(bytes::Bytes::new())?;
//!     let response = transport.round_trip(request).await?;
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`emulation`] - Browser profiles and version parsing
//! - [`http`] - Executor traits, request annotations, HTTP/2 configuration
//!   and the default executor
//! - [`socket`] - TCP/TLS connection setup, proxies and ClientHello templates
//! - [`transport`] - The fingerprint-aware transport

pub mod base;
pub mod emulation;
pub mod http;
pub mod socket;
pub mod transport;

pub use crate::base::{Error, NetError, Result};
pub use crate::emulation::{
    chromium, firefox, safari, Brand, BrowserFamily, ClientSpec, Http2Profile, Platform,
};
pub use crate::http::{ConfigurableTransport, HttpTransport, RoundTrip};
pub use crate::transport::{
    HeaderShuffle, NoShuffle, SeededShuffle, ThreadRngShuffle, Transport, TransportBuilder,
};
