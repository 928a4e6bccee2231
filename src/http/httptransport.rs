//! The default base executor.

use crate::base::neterror::NetError;
use crate::http::h2settings::Http2Config;
use crate::http::order::{HeaderOrder, PseudoHeaderOrder};
use crate::http::pool::{ConnectionPool, PoolKey};
use crate::http::roundtrip::{ConfigurableTransport, RoundTrip};
use crate::http::streamfactory::HttpStream;
use crate::socket::connectjob::ConnectJob;
use crate::socket::proxy::{ProxyConfig, ProxySettings};
use crate::socket::tls::{ClientHelloFactory, ClientHelloSpec};
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// HTTP/1.1 + HTTP/2 client transport over BoringSSL.
///
/// Defaults: proxy from the environment, 30s dial timeout and TCP
/// keep-alive, HTTP/2 attempted, 100 idle connections kept for 90s, 10s TLS
/// handshake timeout, 1s expect-continue timeout.
#[derive(Clone)]
pub struct HttpTransport {
    proxy: ProxyConfig,
    dial_timeout: Duration,
    keep_alive: Duration,
    force_attempt_http2: bool,
    max_idle_conns: usize,
    idle_conn_timeout: Duration,
    tls_handshake_timeout: Duration,
    expect_continue_timeout: Duration,
    client_hello: Option<ClientHelloFactory>,
    http2: Option<Http2Config>,
    pool: Arc<ConnectionPool>,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::from_env(),
            dial_timeout: Duration::from_secs(30),
            keep_alive: Duration::from_secs(30),
            force_attempt_http2: true,
            max_idle_conns: 100,
            idle_conn_timeout: Duration::from_secs(90),
            tls_handshake_timeout: Duration::from_secs(10),
            expect_continue_timeout: Duration::from_secs(1),
            client_hello: None,
            http2: None,
            pool: Arc::new(ConnectionPool::new()),
        }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("proxy", &self.proxy)
            .field("dial_timeout", &self.dial_timeout)
            .field("keep_alive", &self.keep_alive)
            .field("force_attempt_http2", &self.force_attempt_http2)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("idle_conn_timeout", &self.idle_conn_timeout)
            .field("tls_handshake_timeout", &self.tls_handshake_timeout)
            .field("expect_continue_timeout", &self.expect_continue_timeout)
            .field("client_hello", &self.client_hello.is_some())
            .field("http2", &self.http2)
            .finish()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    pub fn keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    pub fn force_attempt_http2(mut self, enabled: bool) -> Self {
        self.force_attempt_http2 = enabled;
        self
    }

    pub fn max_idle_conns(mut self, max: usize) -> Self {
        self.max_idle_conns = max;
        self
    }

    pub fn idle_conn_timeout(mut self, timeout: Duration) -> Self {
        self.idle_conn_timeout = timeout;
        self
    }

    pub fn tls_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.tls_handshake_timeout = timeout;
        self
    }

    /// hyper sends request bodies without waiting for `100 Continue`, so
    /// this value is reported but behaves as an immediate expiry.
    pub fn expect_continue_timeout(mut self, timeout: Duration) -> Self {
        self.expect_continue_timeout = timeout;
        self
    }

    #[inline]
    pub fn proxy_config(&self) -> &ProxyConfig {
        &self.proxy
    }

    #[inline]
    pub fn get_dial_timeout(&self) -> Duration {
        self.dial_timeout
    }

    #[inline]
    pub fn get_keep_alive(&self) -> Duration {
        self.keep_alive
    }

    #[inline]
    pub fn attempts_http2(&self) -> bool {
        self.force_attempt_http2 || self.http2.is_some()
    }

    #[inline]
    pub fn get_max_idle_conns(&self) -> usize {
        self.max_idle_conns
    }

    #[inline]
    pub fn get_idle_conn_timeout(&self) -> Duration {
        self.idle_conn_timeout
    }

    #[inline]
    pub fn get_tls_handshake_timeout(&self) -> Duration {
        self.tls_handshake_timeout
    }

    #[inline]
    pub fn get_expect_continue_timeout(&self) -> Duration {
        self.expect_continue_timeout
    }

    #[inline]
    pub fn client_hello_factory(&self) -> Option<&ClientHelloFactory> {
        self.client_hello.as_ref()
    }

    /// HTTP/2 configuration, present once HTTP/2 has been configured.
    #[inline]
    pub fn http2_config(&self) -> Option<&Http2Config> {
        self.http2.as_ref()
    }

    /// Drop every pooled connection. In-flight requests are unaffected.
    pub fn close_idle_connections(&self) {
        self.pool.cleanup(Duration::ZERO);
    }

    /// The HTTP/2 parameters to use on a connection where ALPN picked h2.
    fn effective_http2(&self) -> Option<Http2Config> {
        match &self.http2 {
            Some(config) => Some(config.clone()),
            None if self.force_attempt_http2 => Some(Http2Config::default()),
            None => None,
        }
    }

    /// A fresh hello for one connection attempt, with `h2` withdrawn from
    /// ALPN when this transport will not speak HTTP/2.
    fn hello_for_attempt(&self) -> Option<ClientHelloSpec> {
        let mut hello = self.client_hello.as_ref().map(|factory| factory())?;
        if !self.attempts_http2() {
            hello.alpn_protocols.retain(|p| p != "h2");
            hello.alps_protocols.retain(|p| p != "h2");
        }
        Some(hello)
    }

    async fn connect(
        &self,
        url: &Url,
        proxy: Option<&ProxySettings>,
        pseudo_order: Option<PseudoHeaderOrder>,
    ) -> Result<HttpStream, NetError> {
        let job = ConnectJob {
            url,
            proxy,
            hello: self.hello_for_attempt(),
            offer_h2: self.attempts_http2(),
            dial_timeout: self.dial_timeout,
            keep_alive: self.keep_alive,
            tls_handshake_timeout: self.tls_handshake_timeout,
        };
        let socket = job.connect().await?;
        let http2 = self.effective_http2();
        HttpStream::handshake(socket, http2.as_ref(), pseudo_order).await
    }

    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>, NetError> {
        let url = Url::parse(&request.uri().to_string()).map_err(|_| NetError::InvalidUrl)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetError::UnknownUrlScheme);
        }

        let proxy = self.proxy.proxy_for(&url);
        let pseudo_order = request.extensions().get::<PseudoHeaderOrder>().copied();
        let key = PoolKey::new(&url, proxy, pseudo_order).ok_or(NetError::InvalidUrl)?;

        let mut stream = match self.pool.checkout(&key, self.idle_conn_timeout) {
            Some(stream) => {
                tracing::trace!(host = ?url.host_str(), "reusing pooled connection");
                stream
            }
            None => {
                let stream = self.connect(&url, proxy, pseudo_order).await?;
                if let Some(shared) = stream.share() {
                    self.pool.checkin(
                        key.clone(),
                        shared,
                        self.max_idle_conns,
                        self.idle_conn_timeout,
                    );
                }
                stream
            }
        };

        let request = apply_header_order(request);
        let response = stream.send(request).await?;

        if !stream.is_multiplexed() {
            self.pool
                .checkin(key, stream, self.max_idle_conns, self.idle_conn_timeout);
        }
        Ok(response)
    }
}

/// Reorder the request's headers when it carries a [`HeaderOrder`].
fn apply_header_order(mut request: Request<Bytes>) -> Request<Bytes> {
    if let Some(order) = request.extensions().get::<HeaderOrder>() {
        let ordered = order.apply(request.headers());
        *request.headers_mut() = ordered;
    }
    request
}

impl RoundTrip for HttpTransport {
    fn round_trip(
        &self,
        request: Request<Bytes>,
    ) -> BoxFuture<'_, Result<Response<Bytes>, NetError>> {
        Box::pin(self.execute(request))
    }
}

/// Installing a ClientHello or touching the HTTP/2 configuration starts a
/// fresh connection pool. Clones taken earlier keep the old one.
impl ConfigurableTransport for HttpTransport {
    fn set_client_hello_factory(&mut self, factory: ClientHelloFactory) {
        self.client_hello = Some(factory);
        self.pool = Arc::new(ConnectionPool::new());
    }

    fn configure_http2(&mut self) -> Result<&mut Http2Config, NetError> {
        self.pool = Arc::new(ConnectionPool::new());
        Ok(self.http2.get_or_insert_with(Http2Config::default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::tls::{hello_spec_factory, HelloId};
    use http::header::HeaderName;

    fn direct() -> HttpTransport {
        HttpTransport::new().proxy(ProxyConfig::direct())
    }

    #[test]
    fn test_defaults() {
        let t = direct();
        assert_eq!(t.get_dial_timeout(), Duration::from_secs(30));
        assert_eq!(t.get_keep_alive(), Duration::from_secs(30));
        assert!(t.attempts_http2());
        assert_eq!(t.get_max_idle_conns(), 100);
        assert_eq!(t.get_idle_conn_timeout(), Duration::from_secs(90));
        assert_eq!(t.get_tls_handshake_timeout(), Duration::from_secs(10));
        assert_eq!(t.get_expect_continue_timeout(), Duration::from_secs(1));
        assert!(t.client_hello_factory().is_none());
        assert!(t.http2_config().is_none());
    }

    #[test]
    fn test_configure_http2_is_idempotent() {
        let mut t = direct();
        t.configure_http2().unwrap().header_table_size = 65536;
        let again = t.configure_http2().unwrap();
        assert_eq!(again.header_table_size, 65536);
    }

    #[test]
    fn test_h2_withdrawn_when_disabled() {
        let mut t = direct().force_attempt_http2(false);
        t.set_client_hello_factory(hello_spec_factory(HelloId::Chrome120));
        let hello = t.hello_for_attempt().unwrap();
        assert_eq!(hello.alpn_protocols, ["http/1.1"]);
        assert!(hello.alps_protocols.is_empty());
        assert_eq!(hello.validate(), Ok(()));

        t.configure_http2().unwrap();
        let hello = t.hello_for_attempt().unwrap();
        assert_eq!(hello.alpn_protocols, ["h2", "http/1.1"]);
    }

    #[test]
    fn test_header_order_applied() {
        let mut request = Request::get("https://example.com/")
            .header("b", "2")
            .header("a", "1")
            .body(Bytes::new())
            .unwrap();
        request.extensions_mut().insert(HeaderOrder(vec![
            HeaderName::from_static("a"),
            HeaderName::from_static("b"),
        ]));
        let request = apply_header_order(request);
        let names: Vec<&str> = request.headers().keys().map(|k| k.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    /// Plain HTTP/1.1 origin answering every request with an empty 200.
    async fn spawn_origin() -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    while let Ok(n) = sock.read(&mut buf).await {
                        if n == 0 {
                            return;
                        }
                        let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n";
                        if sock.write_all(reply).await.is_err() {
                            return;
                        }
                    }
                });
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_expired_groups_are_pruned() {
        let first = spawn_origin().await;
        let second = spawn_origin().await;
        let transport = direct().idle_conn_timeout(Duration::from_millis(50));

        let get = |addr: std::net::SocketAddr| {
            Request::get(format!("http://{addr}/"))
                .body(Bytes::new())
                .unwrap()
        };
        transport.round_trip(get(first)).await.unwrap();
        assert_eq!(transport.pool.group_count(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        transport.round_trip(get(second)).await.unwrap();
        assert_eq!(transport.pool.group_count(), 1);
        assert_eq!(transport.pool.idle_count(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let key = PoolKey::new(&Url::parse(&format!("http://{second}/")).unwrap(), None, None)
            .unwrap();
        assert!(transport.pool.checkout(&key, Duration::from_millis(50)).is_none());
        assert_eq!(transport.pool.group_count(), 0);
    }

    #[test]
    fn test_reconfiguring_detaches_pool() {
        let base = direct();
        let mut chrome = base.clone();
        assert!(Arc::ptr_eq(&base.pool, &chrome.pool));

        chrome.set_client_hello_factory(hello_spec_factory(HelloId::Chrome100));
        assert!(!Arc::ptr_eq(&base.pool, &chrome.pool));

        let mut other = base.clone();
        other.configure_http2().unwrap();
        assert!(!Arc::ptr_eq(&base.pool, &other.pool));
        assert!(!Arc::ptr_eq(&chrome.pool, &other.pool));
    }

    #[tokio::test]
    async fn test_rejects_unknown_scheme() {
        let request = Request::get("ftp://example.com/file").body(Bytes::new()).unwrap();
        let err = direct().round_trip(request).await.unwrap_err();
        assert_eq!(err, NetError::UnknownUrlScheme);
    }
}
