//! Firefox on desktop platforms.
//!
//! Firefox opens each connection with standalone PRIORITY frames that build
//! a dependency tree. Those are not reproduced; SETTINGS, WINDOW_UPDATE,
//! HEADERS priority and pseudo-header order are.

use super::{header_value, select, supported_major};
use crate::base::{Error, Result};
use crate::emulation::spec::{ClientSpec, Http2Profile};
use crate::emulation::{BrowserFamily, Platform};
use crate::http::h2settings::{PriorityParam, Setting, SettingId};
use crate::http::order::{PseudoHeader, PseudoHeaderOrder};
use crate::socket::tls::{validate_hello_id, HelloId};
use http::{header, HeaderMap};
use std::sync::Arc;

const FAMILY: &str = "firefox";
const MIN_MAJOR: u32 = 55;

const HELLOS: &[(u32, HelloId)] = &[
    (56, HelloId::Firefox55),
    (63, HelloId::Firefox56),
    (65, HelloId::Firefox63),
    (99, HelloId::Firefox65),
    (102, HelloId::Firefox99),
    (105, HelloId::Firefox102),
    (120, HelloId::Firefox105),
];
const NEWEST: HelloId = HelloId::Firefox120;

/// Build the identity of Firefox.
///
/// `version` is the Firefox version, e.g. `"134.0"`. Firefox sends no
/// client hints.
pub fn firefox(version: &str) -> Result<ClientSpec> {
    let (_, num) = supported_major(FAMILY, version, MIN_MAJOR)?;

    let id = select(HELLOS, NEWEST, num);
    validate_hello_id(id)?;
    tracing::debug!(family = FAMILY, version, hello = %id, "resolved profile");

    let owned_version = version.to_string();
    Ok(ClientSpec::new(
        BrowserFamily::Firefox,
        version,
        num,
        http2_profile(),
        Arc::new(move |_: Platform| -> Result<HelloId> { Ok(id) }),
        Arc::new(move |platform: Platform| build_headers(&owned_version, platform)),
    ))
}

fn http2_profile() -> Http2Profile {
    use SettingId::*;

    Http2Profile {
        settings: vec![
            Setting::new(HeaderTableSize, 65536),
            Setting::new(InitialWindowSize, 131072),
            Setting::new(MaxFrameSize, 16384),
        ],
        pseudo_order: PseudoHeaderOrder::new([
            PseudoHeader::Method,
            PseudoHeader::Path,
            PseudoHeader::Authority,
            PseudoHeader::Scheme,
        ]),
        max_header_list_size: 0,
        initial_window_size: 131072,
        header_table_size: 65536,
        connection_flow: 12517377,
        // Stream 13 leads the tree; wire weight 41 is weight 42.
        header_priority: Some(PriorityParam {
            stream_dep: 13,
            exclusive: false,
            weight: 41,
        }),
    }
}

fn build_headers(version: &str, platform: Platform) -> Result<HeaderMap> {
    let ua_platform = match platform {
        Platform::Windows => "Windows NT 10.0; Win64; x64",
        // Dots, not underscores.
        Platform::Mac => "Macintosh; Intel Mac OS X 10.15",
        Platform::Linux => "X11; Linux x86_64",
        Platform::Ios | Platform::IpadOs => {
            return Err(Error::UnsupportedPlatform {
                family: FAMILY,
                platform,
            })
        }
    };

    let ua = format!("Mozilla/5.0 ({ua_platform}; rv:{version}) Gecko/20100101 Firefox/{version}");
    let mut headers = HeaderMap::with_capacity(1);
    headers.insert(header::USER_AGENT, header_value("user-agent", ua)?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_table_boundaries() {
        let cases = [
            (55, HelloId::Firefox55),
            (56, HelloId::Firefox56),
            (62, HelloId::Firefox56),
            (63, HelloId::Firefox63),
            (65, HelloId::Firefox65),
            (98, HelloId::Firefox65),
            (99, HelloId::Firefox99),
            (102, HelloId::Firefox102),
            (105, HelloId::Firefox105),
            (119, HelloId::Firefox105),
            (120, HelloId::Firefox120),
            (134, HelloId::Firefox120),
        ];
        for (major, expected) in cases {
            assert_eq!(select(HELLOS, NEWEST, major), expected, "major {major}");
        }
    }

    #[test]
    fn test_http2_profile() {
        let profile = http2_profile();
        assert_eq!(profile.settings.len(), 3);
        assert_eq!(profile.connection_flow, 12517377);
        let priority = profile.header_priority.unwrap();
        assert_eq!(priority.stream_dep, 13);
        assert!(!priority.exclusive);
        assert_eq!(priority.weight, 41);
    }

    #[test]
    fn test_mac_user_agent_uses_dots() {
        let headers = build_headers("120.0", Platform::Mac).unwrap();
        assert_eq!(
            headers[header::USER_AGENT],
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:120.0) Gecko/20100101 Firefox/120.0"
        );
    }

    #[test]
    fn test_mobile_platforms_rejected() {
        for platform in [Platform::Ios, Platform::IpadOs] {
            assert!(matches!(
                build_headers("120.0", platform),
                Err(Error::UnsupportedPlatform { family: "firefox", .. })
            ));
        }
    }
}
