//! Chromium-based browsers: Chrome, Brave and Edge.

use super::{header_value, select, supported_major};
use crate::base::{Error, Result};
use crate::emulation::clienthints::sec_ch_ua;
use crate::emulation::spec::{ClientSpec, Http2Profile};
use crate::emulation::{Brand, BrowserFamily, Platform};
use crate::http::h2settings::{Setting, SettingId};
use crate::http::order::{PseudoHeader, PseudoHeaderOrder};
use crate::socket::tls::{validate_hello_id, HelloId};
use http::{header, HeaderMap, HeaderValue};
use std::sync::Arc;

const FAMILY: &str = "chromium";
const MIN_MAJOR: u32 = 100;

const HELLOS: &[(u32, HelloId)] = &[
    (102, HelloId::Chrome100),
    (106, HelloId::Chrome102),
    (112, HelloId::Chrome106Shuffle),
    (114, HelloId::Chrome112PskShuffle),
    (115, HelloId::Chrome114PaddingPskShuffle),
    (120, HelloId::Chrome115Pq),
    (131, HelloId::Chrome120),
    (133, HelloId::Chrome131),
];
const NEWEST: HelloId = HelloId::Chrome133;

const PSEUDO_ORDER: PseudoHeaderOrder = PseudoHeaderOrder::new([
    PseudoHeader::Method,
    PseudoHeader::Authority,
    PseudoHeader::Scheme,
    PseudoHeader::Path,
]);

/// Build the identity of a Chromium-based browser.
///
/// `version` is the full version string, e.g. `"137.0.0.0"`. Versions
/// before 100 are rejected.
pub fn chromium(brand: Brand, version: &str) -> Result<ClientSpec> {
    let (major, num) = supported_major(FAMILY, version, MIN_MAJOR)?;

    let id = select(HELLOS, NEWEST, num);
    validate_hello_id(id)?;
    tracing::debug!(family = FAMILY, %brand, version, hello = %id, "resolved profile");

    let client_hints = sec_ch_ua(brand, major, num);
    let owned_version = version.to_string();
    let headers = move |platform: Platform| {
        build_headers(brand, &owned_version, &client_hints, platform)
    };

    Ok(ClientSpec::new(
        BrowserFamily::Chromium { brand },
        version,
        num,
        http2_profile(num),
        Arc::new(move |_: Platform| -> Result<HelloId> { Ok(id) }),
        Arc::new(headers),
    ))
}

fn http2_profile(major: u32) -> Http2Profile {
    use SettingId::*;

    let (settings, max_header_list_size) = match major {
        0..=106 => (
            vec![
                Setting::new(HeaderTableSize, 65536),
                Setting::new(MaxConcurrentStreams, 1000),
                Setting::new(InitialWindowSize, 6291456),
                Setting::new(MaxHeaderListSize, 100000),
            ],
            100000,
        ),
        107..=119 => (
            vec![
                Setting::new(HeaderTableSize, 65536),
                Setting::new(EnablePush, 0),
                Setting::new(MaxConcurrentStreams, 1000),
                Setting::new(InitialWindowSize, 6291456),
                Setting::new(MaxHeaderListSize, 262144),
            ],
            262144,
        ),
        _ => (
            vec![
                Setting::new(HeaderTableSize, 65536),
                Setting::new(EnablePush, 0),
                Setting::new(InitialWindowSize, 6291456),
                Setting::new(MaxHeaderListSize, 262144),
            ],
            262144,
        ),
    };

    Http2Profile {
        settings,
        pseudo_order: PSEUDO_ORDER,
        max_header_list_size,
        initial_window_size: 6291456,
        header_table_size: 65536,
        connection_flow: 0,
        header_priority: None,
    }
}

fn build_headers(
    brand: Brand,
    version: &str,
    client_hints: &str,
    platform: Platform,
) -> Result<HeaderMap> {
    let (ua_platform, hint_platform) = match platform {
        Platform::Windows => ("Windows NT 10.0; Win64; x64", "Windows"),
        Platform::Mac => ("Macintosh; Intel Mac OS X 10_15_7", "macOS"),
        Platform::Linux => ("X11; Linux x86_64", "Linux"),
        Platform::Ios | Platform::IpadOs => {
            return Err(Error::UnsupportedPlatform {
                family: FAMILY,
                platform,
            })
        }
    };

    let mut ua = format!(
        "Mozilla/5.0 ({ua_platform}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{version} Safari/537.36"
    );
    // Brave sends Chrome's UA unchanged.
    if brand == Brand::Edge {
        ua.push_str(" Edg/");
        ua.push_str(version);
    }

    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(header::USER_AGENT, header_value("user-agent", ua)?);
    headers.insert(
        "sec-ch-ua",
        header_value("sec-ch-ua", client_hints.to_string())?,
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert(
        "sec-ch-ua-platform",
        header_value("sec-ch-ua-platform", format!("\"{hint_platform}\""))?,
    );
    Ok(headers)
}
