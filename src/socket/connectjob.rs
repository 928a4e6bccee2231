use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use crate::socket::proxy::ProxySettings;
use crate::socket::tls::ClientHelloSpec;
use boring::ssl::{SslConnector, SslMethod};
use socket2::{SockRef, TcpKeepalive};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use url::{Host, Url};

const MAX_TUNNEL_RESPONSE: usize = 8 * 1024;

/// Manages the connection process: DNS -> TCP -> CONNECT tunnel -> TLS.
/// Roughly equivalent to net::ConnectJob.
#[derive(Debug)]
pub struct ConnectJob<'a> {
    pub url: &'a Url,
    pub proxy: Option<&'a ProxySettings>,
    /// ClientHello for this attempt. `None` means BoringSSL defaults.
    pub hello: Option<ClientHelloSpec>,
    /// Offer `h2` in ALPN when no hello template is installed.
    pub offer_h2: bool,
    pub dial_timeout: Duration,
    pub keep_alive: Duration,
    pub tls_handshake_timeout: Duration,
}

impl ConnectJob<'_> {
    pub async fn connect(self) -> Result<SocketType, NetError> {
        let target_host = dial_host(self.url).ok_or(NetError::InvalidUrl)?;
        let target_port = self.url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        let (host, port) = match self.proxy {
            Some(p) => p.host_port().ok_or(NetError::InvalidUrl)?,
            None => (target_host.clone(), target_port),
        };

        let mut stream = self.dial(&host, port).await?;

        if let Some(proxy) = self.proxy {
            // CONNECT keeps the bracketed IPv6 authority form.
            let authority = self.url.host_str().ok_or(NetError::InvalidUrl)?;
            tunnel(&mut stream, proxy, authority, target_port).await?;
        }

        if self.url.scheme() != "https" {
            return Ok(SocketType::Tcp(stream));
        }

        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;
        match &self.hello {
            Some(hello) => hello.apply_to_builder(&mut builder)?,
            None => {
                let protos: &[u8] = if self.offer_h2 {
                    b"\x02h2\x08http/1.1"
                } else {
                    b"\x08http/1.1"
                };
                builder
                    .set_alpn_protos(protos)
                    .map_err(|_| NetError::SslProtocolError)?;
            }
        }

        let config = builder
            .build()
            .configure()
            .map_err(|_| NetError::SslProtocolError)?;
        if let Some(hello) = &self.hello {
            hello.apply_to_connection(&config);
        }

        let handshake = tokio_boring::connect(config, &target_host, stream);
        let tls_stream = timeout(self.tls_handshake_timeout, handshake)
            .await
            .map_err(|_| NetError::ConnectionTimedOut)?
            .map_err(|e| {
                tracing::debug!(host = %target_host, error = ?e, "TLS handshake failed");
                NetError::SslProtocolError
            })?;

        tracing::debug!(
            host = %target_host,
            alpn = ?tls_stream.ssl().selected_alpn_protocol().map(String::from_utf8_lossy),
            "TLS established"
        );
        Ok(SocketType::Ssl(tls_stream))
    }

    async fn dial(&self, host: &str, port: u16) -> Result<TcpStream, NetError> {
        tracing::debug!(host = %host, port, "resolving");
        let addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|_| NetError::NameNotResolved)?;

        let mut last_err = NetError::NameNotResolved;
        for addr in addrs {
            match timeout(self.dial_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    let keepalive = TcpKeepalive::new()
                        .with_time(self.keep_alive)
                        .with_interval(self.keep_alive);
                    if let Err(e) = SockRef::from(&stream).set_tcp_keepalive(&keepalive) {
                        tracing::warn!(%addr, error = %e, "failed to enable TCP keep-alive");
                    }
                    let _ = stream.set_nodelay(true);
                    return Ok(stream);
                }
                Ok(Err(e)) => {
                    tracing::debug!(%addr, error = %e, "connect failed");
                    last_err = NetError::from(e);
                }
                Err(_) => {
                    tracing::debug!(%addr, "connect timed out");
                    last_err = NetError::ConnectionTimedOut;
                }
            }
        }
        Err(last_err)
    }
}

/// Host of `url` as used for resolution, SNI and certificate checks.
/// IPv6 literals come back without their brackets.
pub(crate) fn dial_host(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) => Some(domain.to_string()),
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Establish an HTTP CONNECT tunnel to `host:port` through `proxy`.
async fn tunnel(
    stream: &mut TcpStream,
    proxy: &ProxySettings,
    host: &str,
    port: u16,
) -> Result<(), NetError> {
    if !proxy.is_supported() {
        return Err(NetError::NoSupportedProxies);
    }

    let target = format!("{host}:{port}");
    let mut connect_req = format!("CONNECT {target} HTTP/1.1\r\nHost: {target}\r\n");
    if let Some(auth) = proxy.authorization() {
        connect_req.push_str(&format!("Proxy-Authorization: {auth}\r\n"));
    }
    connect_req.push_str("\r\n");

    stream
        .write_all(connect_req.as_bytes())
        .await
        .map_err(|_| NetError::ProxyConnectionFailed)?;

    let mut response = Vec::with_capacity(256);
    let mut buf = [0u8; 512];
    while !response.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|_| NetError::ProxyConnectionFailed)?;
        if n == 0 {
            return Err(NetError::EmptyResponse);
        }
        response.extend_from_slice(&buf[..n]);
        if response.len() > MAX_TUNNEL_RESPONSE {
            return Err(NetError::ResponseHeadersTooBig);
        }
    }

    match tunnel_status(&response) {
        Some(200) => Ok(()),
        Some(407) => Err(NetError::ProxyAuthRequested),
        status => {
            tracing::debug!(?status, proxy = %proxy.url, "proxy refused tunnel");
            Err(NetError::TunnelConnectionFailed)
        }
    }
}

fn tunnel_status(response: &[u8]) -> Option<u16> {
    let line_end = response.iter().position(|&b| b == b'\r')?;
    let line = std::str::from_utf8(&response[..line_end]).ok()?;
    let mut parts = line.split(' ');
    let version = parts.next()?;
    if !version.starts_with("HTTP/1.") {
        return None;
    }
    parts.next()?.parse().ok()
}
