use crate::base::neterror::NetError;
use crate::http::h2conn::H2Connection;
use crate::http::h2settings::Http2Config;
use crate::http::order::PseudoHeaderOrder;
use crate::socket::client::SocketType;
use bytes::Bytes;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, Request, Response, Uri};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;

/// Headers that are meaningless (and rejected) on an HTTP/2 stream.
const CONNECTION_HEADERS: [HeaderName; 5] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
];

/// Wraps the underlying protocol stream (H1/H2).
/// Equivalent to net::HttpStream.
#[derive(Debug)]
pub enum HttpStream {
    Http1(http1::SendRequest<Full<Bytes>>),
    Http2(H2Connection),
}

impl HttpStream {
    /// Drive the protocol handshake on a freshly connected socket.
    pub async fn handshake(
        socket: SocketType,
        http2: Option<&Http2Config>,
        pseudo_order: Option<PseudoHeaderOrder>,
    ) -> Result<Self, NetError> {
        match http2 {
            Some(config) if socket.negotiated_h2() => {
                tracing::debug!("ALPN selected h2");
                Ok(HttpStream::Http2(
                    H2Connection::handshake(socket, config, pseudo_order).await?,
                ))
            }
            _ => {
                let (sender, conn) = http1::handshake(TokioIo::new(socket))
                    .await
                    .map_err(|_| NetError::ConnectionFailed)?;
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        tracing::debug!(error = %e, "HTTP/1.1 connection closed with error");
                    }
                });
                Ok(HttpStream::Http1(sender))
            }
        }
    }

    pub fn is_multiplexed(&self) -> bool {
        matches!(self, HttpStream::Http2(_))
    }

    /// A second handle on a multiplexed connection.
    pub fn share(&self) -> Option<Self> {
        match self {
            HttpStream::Http2(conn) => Some(HttpStream::Http2(conn.clone())),
            HttpStream::Http1(_) => None,
        }
    }

    /// Whether the stream can take another request.
    pub fn is_reusable(&self) -> bool {
        match self {
            HttpStream::Http1(sender) => !sender.is_closed(),
            HttpStream::Http2(conn) => !conn.is_closed(),
        }
    }

    /// Send one request. `headers` are already in wire order.
    pub async fn send(&mut self, request: Request<Bytes>) -> Result<Response<Bytes>, NetError> {
        match self {
            HttpStream::Http1(sender) => {
                let request = to_http1(request)?;
                sender
                    .ready()
                    .await
                    .map_err(|_| NetError::ConnectionClosed)?;
                let response = sender.send_request(request).await.map_err(|e| {
                    tracing::debug!(error = %e, "HTTP/1.1 request failed");
                    if e.is_parse() {
                        NetError::InvalidResponse
                    } else {
                        NetError::ConnectionClosed
                    }
                })?;
                let (parts, body) = response.into_parts();
                let body = body
                    .collect()
                    .await
                    .map_err(|_| NetError::ConnectionClosed)?
                    .to_bytes();
                Ok(Response::from_parts(parts, body))
            }
            HttpStream::Http2(conn) => conn.send(to_http2(request)).await,
        }
    }
}

/// Origin-form target plus a leading Host header when the caller gave none.
fn to_http1(request: Request<Bytes>) -> Result<Request<Full<Bytes>>, NetError> {
    let (mut parts, body) = request.into_parts();

    if !parts.headers.contains_key(header::HOST) {
        let authority = parts.uri.authority().ok_or(NetError::InvalidUrl)?;
        let host =
            HeaderValue::from_str(authority.as_str()).map_err(|_| NetError::InvalidUrl)?;
        let mut headers = HeaderMap::with_capacity(parts.headers.len() + 1);
        headers.insert(header::HOST, host);
        for (name, value) in &parts.headers {
            headers.append(name.clone(), value.clone());
        }
        parts.headers = headers;
    }

    let path = parts
        .uri
        .path_and_query()
        .map_or("/", |pq| pq.as_str())
        .to_string();
    parts.uri = path.parse::<Uri>().map_err(|_| NetError::InvalidUrl)?;

    Ok(Request::from_parts(parts, Full::new(body)))
}

/// Drop headers HTTP/2 forbids. The map is rebuilt so the surviving
/// headers keep their relative order.
fn to_http2(mut request: Request<Bytes>) -> Request<Bytes> {
    let headers = std::mem::take(request.headers_mut());
    let mut kept = HeaderMap::with_capacity(headers.len());
    for (name, value) in &headers {
        if allowed_on_http2(name, value) {
            kept.append(name.clone(), value.clone());
        }
    }
    *request.headers_mut() = kept;
    request
}

fn allowed_on_http2(name: &HeaderName, value: &HeaderValue) -> bool {
    if *name == header::HOST || CONNECTION_HEADERS.contains(name) {
        return false;
    }
    *name != header::TE || value == "trailers"
}
