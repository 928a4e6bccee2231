//! HTTP layer: executor traits, request annotations, HTTP/2 configuration
//! and the default base executor.

pub mod h2conn;
pub mod h2settings;
pub mod httptransport;
pub mod order;
pub mod pool;
pub mod roundtrip;
pub mod streamfactory;

// Re-exports for convenience
pub use h2settings::{Http2Config, PriorityParam, Setting, SettingId};
pub use httptransport::HttpTransport;
pub use order::{HeaderOrder, PseudoHeader, PseudoHeaderOrder};
pub use roundtrip::{ConfigurableTransport, RoundTrip};
