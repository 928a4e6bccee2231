//! Safari on macOS, iOS and iPadOS.

use super::{header_value, supported_major};
use crate::base::{Error, Result};
use crate::emulation::spec::{ClientSpec, Http2Profile};
use crate::emulation::{BrowserFamily, Platform};
use crate::http::h2settings::{Setting, SettingId};
use crate::http::order::{PseudoHeader, PseudoHeaderOrder};
use crate::socket::tls::{validate_hello_id, HelloId};
use http::{header, HeaderMap};
use std::sync::Arc;

const FAMILY: &str = "safari";
const MIN_MAJOR: u32 = 16;

/// Build the identity of Safari.
///
/// `version` is the Safari version, e.g. `"18.3"`. The TLS profile depends
/// on the platform: iOS has its own, macOS and iPadOS share the desktop one.
/// Safari sends no client hints.
pub fn safari(version: &str) -> Result<ClientSpec> {
    let (_, num) = supported_major(FAMILY, version, MIN_MAJOR)?;

    for id in [HelloId::Safari16_0, HelloId::Ios14] {
        validate_hello_id(id)?;
    }
    tracing::debug!(family = FAMILY, version, "resolved profile");

    let owned_version = version.to_string();
    Ok(ClientSpec::new(
        BrowserFamily::Safari,
        version,
        num,
        http2_profile(),
        Arc::new(hello_id),
        Arc::new(move |platform: Platform| build_headers(&owned_version, platform)),
    ))
}

fn hello_id(platform: Platform) -> Result<HelloId> {
    match platform {
        Platform::Ios => Ok(HelloId::Ios14),
        Platform::Mac | Platform::IpadOs => Ok(HelloId::Safari16_0),
        Platform::Windows | Platform::Linux => Err(Error::UnsupportedPlatform {
            family: FAMILY,
            platform,
        }),
    }
}

fn http2_profile() -> Http2Profile {
    use SettingId::*;

    Http2Profile {
        settings: vec![
            Setting::new(HeaderTableSize, 4096),
            Setting::new(EnablePush, 0),
            Setting::new(MaxConcurrentStreams, 100),
            Setting::new(InitialWindowSize, 2097152),
            Setting::new(MaxFrameSize, 16384),
            Setting::new(EnableConnectProtocol, 1),
        ],
        pseudo_order: PseudoHeaderOrder::new([
            PseudoHeader::Method,
            PseudoHeader::Scheme,
            PseudoHeader::Path,
            PseudoHeader::Authority,
        ]),
        // Not advertised; the transport default applies to received lists.
        max_header_list_size: 0,
        initial_window_size: 2097152,
        header_table_size: 4096,
        connection_flow: 10485760,
        header_priority: None,
    }
}

fn build_headers(version: &str, platform: Platform) -> Result<HeaderMap> {
    let ua = match platform {
        // macOS Safari freezes the OS version.
        Platform::Mac => format!(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{version} Safari/605.1.15"
        ),
        Platform::Ios => format!(
            "Mozilla/5.0 (iPhone; CPU iPhone OS {} like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{version} Mobile/15E148 Safari/604.1",
            version.replace('.', "_")
        ),
        Platform::IpadOs => format!(
            "Mozilla/5.0 (iPad; CPU OS {} like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{version} Mobile/15E148 Safari/604.1",
            version.replace('.', "_")
        ),
        Platform::Windows | Platform::Linux => {
            return Err(Error::UnsupportedPlatform {
                family: FAMILY,
                platform,
            })
        }
    };

    let mut headers = HeaderMap::with_capacity(1);
    headers.insert(header::USER_AGENT, header_value("user-agent", ua)?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_per_platform() {
        assert_eq!(hello_id(Platform::Ios), Ok(HelloId::Ios14));
        assert_eq!(hello_id(Platform::Mac), Ok(HelloId::Safari16_0));
        assert_eq!(hello_id(Platform::IpadOs), Ok(HelloId::Safari16_0));
        assert!(matches!(
            hello_id(Platform::Windows),
            Err(Error::UnsupportedPlatform { family: "safari", .. })
        ));
    }

    #[test]
    fn test_http2_profile() {
        let profile = http2_profile();
        assert_eq!(
            profile.settings.last(),
            Some(&Setting::new(SettingId::EnableConnectProtocol, 1))
        );
        assert_eq!(profile.connection_flow, 10485760);
        assert_eq!(
            profile.pseudo_order.as_slice(),
            [
                PseudoHeader::Method,
                PseudoHeader::Scheme,
                PseudoHeader::Path,
                PseudoHeader::Authority
            ]
        );
    }

    #[test]
    fn test_ipad_user_agent() {
        let headers = build_headers("17.4.1", Platform::IpadOs).unwrap();
        let ua = headers[header::USER_AGENT].to_str().unwrap();
        assert!(ua.starts_with("Mozilla/5.0 (iPad; CPU OS 17_4_1 like Mac OS X)"));
        assert!(ua.contains("Version/17.4.1 Mobile/15E148"));
    }
}
