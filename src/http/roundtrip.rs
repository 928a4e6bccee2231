use crate::base::neterror::NetError;
use crate::http::h2settings::Http2Config;
use crate::socket::tls::ClientHelloFactory;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use std::sync::Arc;

/// Executes one HTTP request and returns the buffered response.
///
/// Dropping the returned future cancels the exchange.
pub trait RoundTrip: Send + Sync {
    fn round_trip(&self, request: Request<Bytes>)
        -> BoxFuture<'_, Result<Response<Bytes>, NetError>>;
}

impl<T: RoundTrip + ?Sized> RoundTrip for Arc<T> {
    fn round_trip(
        &self,
        request: Request<Bytes>,
    ) -> BoxFuture<'_, Result<Response<Bytes>, NetError>> {
        (**self).round_trip(request)
    }
}

/// A base transport whose TLS and HTTP/2 layers can be tuned.
pub trait ConfigurableTransport {
    /// Install the supplier of per-connection ClientHello templates.
    fn set_client_hello_factory(&mut self, factory: ClientHelloFactory);

    /// Switch the HTTP/2 layer on and expose its configuration.
    ///
    /// Calling this on a transport that already has HTTP/2 enabled returns
    /// the existing configuration.
    fn configure_http2(&mut self) -> Result<&mut Http2Config, NetError>;
}
