//! HTTP/2 connections built on the fingerprint-capable `http2` crate.

use crate::base::neterror::NetError;
use crate::http::h2settings::{Http2Config, SettingId};
use crate::http::order::{PseudoHeader, PseudoHeaderOrder};
use bytes::{Bytes, BytesMut};
use http::{Request, Response};
use http2::client::{Builder, SendRequest};
use http2::frame::{PseudoId, PseudoOrder, SettingsOrder, StreamDependency, StreamId};
use http2::Reason;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// A multiplexed HTTP/2 connection. Clones share the same connection.
#[derive(Clone)]
pub struct H2Connection {
    sender: SendRequest<Bytes>,
    closed: Arc<AtomicBool>,
}

impl std::fmt::Debug for H2Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("H2Connection")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl H2Connection {
    /// Run the HTTP/2 preface over `io` and spawn the connection driver.
    pub async fn handshake<T>(
        io: T,
        config: &Http2Config,
        pseudo_order: Option<PseudoHeaderOrder>,
    ) -> Result<Self, NetError>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let builder = builder_for(config, pseudo_order);
        let (sender, connection) = builder
            .handshake::<_, Bytes>(io)
            .await
            .map_err(map_h2_error)?;

        let closed = Arc::new(AtomicBool::new(false));
        let driver_closed = Arc::clone(&closed);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "HTTP/2 connection error");
            }
            driver_closed.store(true, Ordering::Release);
        });

        Ok(Self { sender, closed })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Send `request` on a new stream and buffer the whole response.
    pub async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, NetError> {
        let (parts, body) = request.into_parts();
        let request = Request::from_parts(parts, ());

        let mut sender = self.sender.clone().ready().await.map_err(map_h2_error)?;
        let end_of_stream = body.is_empty();
        let (response, mut send_stream) = sender
            .send_request(request, end_of_stream)
            .map_err(map_h2_error)?;
        if !end_of_stream {
            send_stream.send_data(body, true).map_err(map_h2_error)?;
        }

        let (parts, mut recv) = response.await.map_err(map_h2_error)?.into_parts();
        let mut buf = BytesMut::new();
        while let Some(chunk) = recv.data().await {
            let chunk = chunk.map_err(map_h2_error)?;
            let _ = recv.flow_control().release_capacity(chunk.len());
            buf.extend_from_slice(&chunk);
        }
        Ok(Response::from_parts(parts, buf.freeze()))
    }
}

/// Translate an [`Http2Config`] into a client builder.
///
/// When the SETTINGS list is non-empty it alone decides which settings go
/// into the preface, in list order.
fn builder_for(config: &Http2Config, pseudo_order: Option<PseudoHeaderOrder>) -> Builder {
    let mut builder = Builder::new();
    builder.initial_connection_window_size(config.connection_window());

    if config.settings.is_empty() {
        builder
            .header_table_size(config.header_table_size)
            .initial_window_size(config.initial_window_size);
        if config.max_header_list_size > 0 {
            builder.max_header_list_size(config.max_header_list_size);
        }
    } else {
        let mut order = Vec::with_capacity(config.settings.len());
        for setting in &config.settings {
            match setting.id {
                SettingId::HeaderTableSize => {
                    builder.header_table_size(setting.val);
                }
                SettingId::EnablePush => {
                    builder.enable_push(setting.val != 0);
                }
                SettingId::MaxConcurrentStreams => {
                    builder.max_concurrent_streams(setting.val);
                }
                SettingId::InitialWindowSize => {
                    builder.initial_window_size(setting.val);
                }
                SettingId::MaxFrameSize => {
                    builder.max_frame_size(setting.val);
                }
                SettingId::MaxHeaderListSize => {
                    builder.max_header_list_size(setting.val);
                }
                SettingId::EnableConnectProtocol => {
                    builder.enable_connect_protocol(setting.val != 0);
                }
            }
            order.push(wire_setting_id(setting.id));
        }
        builder.settings_order(SettingsOrder::builder().extend(order).build());
    }

    if let Some(pseudo_order) = pseudo_order {
        builder.headers_pseudo_order(
            PseudoOrder::builder()
                .extend(pseudo_order.as_slice().iter().map(|p| wire_pseudo_id(*p)))
                .build(),
        );
    }

    if let Some(priority) = config.header_priority {
        builder.headers_stream_dependency(StreamDependency::new(
            StreamId::from(priority.stream_dep),
            priority.weight,
            priority.exclusive,
        ));
    }

    builder
}

fn wire_setting_id(id: SettingId) -> http2::frame::SettingId {
    use http2::frame::SettingId as Wire;
    match id {
        SettingId::HeaderTableSize => Wire::HeaderTableSize,
        SettingId::EnablePush => Wire::EnablePush,
        SettingId::MaxConcurrentStreams => Wire::MaxConcurrentStreams,
        SettingId::InitialWindowSize => Wire::InitialWindowSize,
        SettingId::MaxFrameSize => Wire::MaxFrameSize,
        SettingId::MaxHeaderListSize => Wire::MaxHeaderListSize,
        SettingId::EnableConnectProtocol => Wire::EnableConnectProtocol,
    }
}

fn wire_pseudo_id(pseudo: PseudoHeader) -> PseudoId {
    match pseudo {
        PseudoHeader::Method => PseudoId::Method,
        PseudoHeader::Authority => PseudoId::Authority,
        PseudoHeader::Scheme => PseudoId::Scheme,
        PseudoHeader::Path => PseudoId::Path,
    }
}

fn map_h2_error(err: http2::Error) -> NetError {
    if err.is_io() {
        tracing::debug!(error = %err, "HTTP/2 I/O error");
        return NetError::ConnectionClosed;
    }
    match err.reason() {
        Some(Reason::REFUSED_STREAM) => NetError::Http2ServerRefusedStream,
        Some(Reason::FLOW_CONTROL_ERROR) => NetError::Http2FlowControlError,
        Some(Reason::FRAME_SIZE_ERROR) => NetError::Http2FrameSizeError,
        Some(Reason::COMPRESSION_ERROR) => NetError::Http2CompressionError,
        Some(Reason::STREAM_CLOSED) => NetError::Http2StreamClosed,
        Some(Reason::INADEQUATE_SECURITY) => NetError::Http2InadequateTransportSecurity,
        _ => {
            tracing::debug!(error = %err, "HTTP/2 protocol error");
            NetError::Http2ProtocolError
        }
    }
}
