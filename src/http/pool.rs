use crate::http::order::PseudoHeaderOrder;
use crate::http::streamfactory::HttpStream;
use crate::socket::proxy::ProxySettings;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use url::Url;

/// Identifies connections that may serve a request.
///
/// The pseudo-header order is part of the key because an HTTP/2 connection
/// fixes it at handshake time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey {
    scheme: String,
    host: String,
    port: u16,
    proxy: Option<String>,
    pseudo_order: Option<PseudoHeaderOrder>,
}

impl PoolKey {
    pub fn new(
        url: &Url,
        proxy: Option<&ProxySettings>,
        pseudo_order: Option<PseudoHeaderOrder>,
    ) -> Option<Self> {
        Some(PoolKey {
            scheme: url.scheme().to_string(),
            host: url.host_str()?.to_ascii_lowercase(),
            port: url.port_or_known_default()?,
            proxy: proxy.map(|p| p.url.to_string()),
            pseudo_order,
        })
    }
}

#[derive(Debug)]
struct IdleStream {
    stream: HttpStream,
    since: Instant,
}

/// Idle HTTP/1.1 connections and live HTTP/2 connections, per [`PoolKey`].
#[derive(Debug, Default)]
pub struct ConnectionPool {
    groups: DashMap<PoolKey, Vec<IdleStream>>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a usable stream for `key`.
    ///
    /// HTTP/2 connections stay in the pool and a shared handle is returned;
    /// HTTP/1.1 connections are removed until checked back in.
    pub fn checkout(&self, key: &PoolKey, idle_timeout: Duration) -> Option<HttpStream> {
        let stream = {
            let mut group = self.groups.get_mut(key)?;
            let now = Instant::now();
            group.retain(|idle| {
                now.duration_since(idle.since) < idle_timeout && idle.stream.is_reusable()
            });

            if let Some(idle) = group.iter_mut().find(|idle| idle.stream.is_multiplexed()) {
                idle.since = now;
                return idle.stream.share();
            }
            group.pop().map(|idle| idle.stream)
        };
        self.groups.remove_if(key, |_, group| group.is_empty());
        stream
    }

    /// Return a stream to the pool, unless `max_idle` streams are already kept.
    ///
    /// Expired streams and empty groups are swept first.
    pub fn checkin(
        &self,
        key: PoolKey,
        stream: HttpStream,
        max_idle: usize,
        idle_timeout: Duration,
    ) {
        self.cleanup(idle_timeout);
        if !stream.is_reusable() || self.idle_count() >= max_idle {
            return;
        }
        self.groups.entry(key).or_default().push(IdleStream {
            stream,
            since: Instant::now(),
        });
    }

    /// Number of distinct keys with at least one pooled stream.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn idle_count(&self) -> usize {
        self.groups.iter().map(|group| group.len()).sum()
    }

    /// Drop expired or closed streams and empty groups.
    pub fn cleanup(&self, idle_timeout: Duration) {
        let now = Instant::now();
        self.groups.retain(|_, group| {
            group.retain(|idle| {
                now.duration_since(idle.since) < idle_timeout && idle.stream.is_reusable()
            });
            !group.is_empty()
        });
    }
}
