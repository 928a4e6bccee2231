//! The fingerprint-aware transport.
//!
//! [`Transport`] wraps a base executor configured from a [`ClientSpec`] and,
//! for every request, pins the browser's pseudo-header order, fills in the
//! browser's default headers and picks a header order.
//!
//! # Example
//!
//! ```rust,ignore
//! use mimic::{chromium, Brand, Platform, Transport, RoundTrip};
//!
//! let spec = chromium(Brand::Chrome, "137.0.0.0")?;
//! let transport = Transport::new(&spec, Platform::Windows)?;
//!
//! let request = http::Request::get("https://example.com").body(bytes::Bytes::new())?;
//! let response = transport.round_trip(request).await?;
//! ```

use crate::base::{NetError, Result};
use crate::emulation::{ClientSpec, Platform};
use crate::http::httptransport::HttpTransport;
use crate::http::order::{HeaderOrder, PseudoHeaderOrder};
use crate::http::roundtrip::{ConfigurableTransport, RoundTrip};
use bytes::Bytes;
use futures::future::BoxFuture;
use http::header::HeaderName;
use http::{HeaderMap, Request, Response};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Chooses the order of regular headers for requests that do not carry a
/// [`HeaderOrder`].
pub trait HeaderShuffle: Send + Sync + fmt::Debug {
    fn shuffle(&self, names: &mut [HeaderName]);
}

/// Uniform permutation from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngShuffle;

impl HeaderShuffle for ThreadRngShuffle {
    fn shuffle(&self, names: &mut [HeaderName]) {
        names.shuffle(&mut rand::thread_rng());
    }
}

/// Reproducible permutations from a seeded RNG.
#[derive(Debug)]
pub struct SeededShuffle {
    rng: Mutex<StdRng>,
}

impl SeededShuffle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl HeaderShuffle for SeededShuffle {
    fn shuffle(&self, names: &mut [HeaderName]) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        names.shuffle(&mut *rng);
    }
}

/// Keeps headers in insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShuffle;

impl HeaderShuffle for NoShuffle {
    fn shuffle(&self, _names: &mut [HeaderName]) {}
}

/// A base executor dressed as one browser on one platform.
///
/// Holds no per-request state; share it freely between tasks.
#[derive(Debug, Clone)]
pub struct Transport<T = HttpTransport> {
    inner: T,
    pseudo_order: PseudoHeaderOrder,
    default_headers: HeaderMap,
    shuffle: Arc<dyn HeaderShuffle>,
}

impl Transport<HttpTransport> {
    /// Wrap a default [`HttpTransport`].
    pub fn new(spec: &ClientSpec, platform: Platform) -> Result<Self> {
        Self::builder(spec, platform).build()
    }

    pub fn builder(spec: &ClientSpec, platform: Platform) -> TransportBuilder<'_, HttpTransport> {
        TransportBuilder {
            spec,
            platform,
            base: HttpTransport::default(),
            shuffle: Arc::new(ThreadRngShuffle),
        }
    }
}

impl<T> Transport<T> {
    #[inline]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    #[inline]
    pub fn pseudo_header_order(&self) -> PseudoHeaderOrder {
        self.pseudo_order
    }

    #[inline]
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Annotate `request` the way [`RoundTrip::round_trip`] does before
    /// delegating.
    pub fn prepare(&self, request: &mut Request<Bytes>) {
        request.extensions_mut().insert(self.pseudo_order);

        let headers = request.headers_mut();
        for (name, value) in &self.default_headers {
            let missing = headers.get(name).map_or(true, |v| v.is_empty());
            if missing {
                headers.insert(name.clone(), value.clone());
            }
        }

        if request.extensions().get::<HeaderOrder>().is_none() {
            let mut names: Vec<HeaderName> = request.headers().keys().cloned().collect();
            self.shuffle.shuffle(&mut names);
            tracing::trace!(order = ?names, "shuffled header order");
            request.extensions_mut().insert(HeaderOrder(names));
        }
    }
}

impl<T: RoundTrip> RoundTrip for Transport<T> {
    fn round_trip(
        &self,
        mut request: Request<Bytes>,
    ) -> BoxFuture<'_, std::result::Result<Response<Bytes>, NetError>> {
        self.prepare(&mut request);
        self.inner.round_trip(request)
    }
}

/// Builder for [`Transport`].
#[must_use]
pub struct TransportBuilder<'a, T> {
    spec: &'a ClientSpec,
    platform: Platform,
    base: T,
    shuffle: Arc<dyn HeaderShuffle>,
}

impl<'a, T> TransportBuilder<'a, T> {
    /// Use `base` instead of a default [`HttpTransport`].
    pub fn base_transport<U>(self, base: U) -> TransportBuilder<'a, U> {
        TransportBuilder {
            spec: self.spec,
            platform: self.platform,
            base,
            shuffle: self.shuffle,
        }
    }

    pub fn header_shuffle(mut self, shuffle: impl HeaderShuffle + 'static) -> Self {
        self.shuffle = Arc::new(shuffle);
        self
    }
}

impl<'a, T: ConfigurableTransport> TransportBuilder<'a, T> {
    /// Configure the base executor and wrap it.
    pub fn build(self) -> Result<Transport<T>> {
        let mut inner = self.base;
        self.spec.configure_transport(&mut inner, self.platform)?;
        let default_headers = self.spec.default_headers(self.platform)?;

        Ok(Transport {
            inner,
            pseudo_order: self.spec.pseudo_header_order(),
            default_headers,
            shuffle: self.shuffle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&'static str]) -> Vec<HeaderName> {
        list.iter().map(|n| HeaderName::from_static(n)).collect()
    }

    #[test]
    fn test_no_shuffle_keeps_order() {
        let mut list = names(&["a", "b", "c"]);
        NoShuffle.shuffle(&mut list);
        assert_eq!(list, names(&["a", "b", "c"]));
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let original = names(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let mut first = original.clone();
        let mut second = original.clone();
        SeededShuffle::new(7).shuffle(&mut first);
        SeededShuffle::new(7).shuffle(&mut second);
        assert_eq!(first, second);

        first.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(first, original);
    }

    #[test]
    fn test_thread_rng_shuffle_is_permutation() {
        let mut list = names(&["x-a", "x-b", "x-c", "x-d"]);
        ThreadRngShuffle.shuffle(&mut list);
        list.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(list, names(&["x-a", "x-b", "x-c", "x-d"]));
    }
}
