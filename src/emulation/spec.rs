use super::{BrowserFamily, Platform};
use crate::base::{Error, Result};
use crate::http::h2settings::{PriorityParam, Setting};
use crate::http::order::PseudoHeaderOrder;
use crate::http::roundtrip::ConfigurableTransport;
use crate::socket::tls::{hello_spec_factory, HelloId};
use http::HeaderMap;
use std::fmt;
use std::sync::Arc;

/// HTTP/2 parameters of one browser build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Http2Profile {
    /// SETTINGS frame entries, in wire order.
    pub settings: Vec<Setting>,
    pub pseudo_order: PseudoHeaderOrder,
    pub max_header_list_size: u32,
    pub initial_window_size: u32,
    pub header_table_size: u32,
    /// Connection WINDOW_UPDATE increment. `0` keeps the transport default.
    pub connection_flow: u32,
    /// `None` keeps the transport default.
    pub header_priority: Option<PriorityParam>,
}

pub(crate) type HelloResolver = Arc<dyn Fn(Platform) -> Result<HelloId> + Send + Sync>;
pub(crate) type HeaderBuilder = Arc<dyn Fn(Platform) -> Result<HeaderMap> + Send + Sync>;

/// A resolved browser identity: TLS profile, HTTP/2 profile and default
/// headers for one family and version.
///
/// Built by [`chromium`](super::chromium), [`safari`](super::safari) or
/// [`firefox`](super::firefox). Immutable once built.
#[derive(Clone)]
pub struct ClientSpec {
    family: BrowserFamily,
    version: String,
    major: u32,
    http2: Http2Profile,
    hello: HelloResolver,
    headers: HeaderBuilder,
}

impl fmt::Debug for ClientSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSpec")
            .field("family", &self.family)
            .field("version", &self.version)
            .field("http2", &self.http2)
            .finish_non_exhaustive()
    }
}

impl ClientSpec {
    pub(crate) fn new(
        family: BrowserFamily,
        version: &str,
        major: u32,
        http2: Http2Profile,
        hello: HelloResolver,
        headers: HeaderBuilder,
    ) -> Self {
        Self {
            family,
            version: version.to_string(),
            major,
            http2,
            hello,
            headers,
        }
    }

    #[inline]
    pub fn family(&self) -> BrowserFamily {
        self.family
    }

    /// The version string this spec was built from, verbatim.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[inline]
    pub fn major_version(&self) -> u32 {
        self.major
    }

    #[inline]
    pub fn http2_profile(&self) -> &Http2Profile {
        &self.http2
    }

    #[inline]
    pub fn pseudo_header_order(&self) -> PseudoHeaderOrder {
        self.http2.pseudo_order
    }

    /// TLS profile used on `platform`.
    pub fn hello_id(&self, platform: Platform) -> Result<HelloId> {
        (self.hello)(platform)
    }

    /// Headers every request carries unless the caller sets them.
    pub fn default_headers(&self, platform: Platform) -> Result<HeaderMap> {
        (self.headers)(platform)
    }

    /// Apply this identity's TLS and HTTP/2 parameters to `transport`.
    ///
    /// Nothing is written to the transport when the platform is not
    /// supported. A failure after that point leaves the transport partially
    /// configured.
    pub fn configure_transport<T>(&self, transport: &mut T, platform: Platform) -> Result<()>
    where
        T: ConfigurableTransport + ?Sized,
    {
        let id = self.hello_id(platform)?;
        transport.set_client_hello_factory(hello_spec_factory(id));

        let config = transport.configure_http2().map_err(Error::Http2Enable)?;
        let profile = &self.http2;
        config.settings = profile.settings.clone();
        config.max_header_list_size = profile.max_header_list_size;
        config.initial_window_size = profile.initial_window_size;
        config.header_table_size = profile.header_table_size;
        if profile.connection_flow > 0 {
            config.connection_flow = profile.connection_flow;
        }
        if let Some(priority) = profile.header_priority {
            config.header_priority = Some(priority);
        }

        tracing::debug!(
            family = self.family.name(),
            version = %self.version,
            %platform,
            hello = %id,
            "configured transport"
        );
        Ok(())
    }
}
