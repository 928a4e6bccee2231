//! Browser emulation module.
//!
//! Resolves a browser identity (family, brand, version) into a [`ClientSpec`]:
//! - TLS fingerprinting (which ClientHello template to send)
//! - HTTP/2 fingerprinting (SETTINGS, windows, pseudo-header order, priority)
//! - Default headers (User-Agent and, for Chromium, client hints)

mod clienthints;
pub mod profiles;
mod spec;
mod version;

pub use clienthints::sec_ch_ua;
pub use profiles::{chromium, firefox, safari};
pub use spec::{ClientSpec, Http2Profile};
pub use version::parse_major_version;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system the emulated browser claims to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "win", alias = "windows")]
    Windows,
    #[serde(rename = "mac")]
    Mac,
    #[serde(rename = "linux")]
    Linux,
    #[serde(rename = "ios")]
    Ios,
    #[serde(rename = "ipados")]
    IpadOs,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Windows,
        Platform::Mac,
        Platform::Linux,
        Platform::Ios,
        Platform::IpadOs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "win",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
            Platform::Ios => "ios",
            Platform::IpadOs => "ipados",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a platform name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform {0:?}")]
pub struct ParsePlatformError(String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "windows" => Ok(Platform::Windows),
            "mac" | "macos" => Ok(Platform::Mac),
            "linux" => Ok(Platform::Linux),
            "ios" => Ok(Platform::Ios),
            "ipados" => Ok(Platform::IpadOs),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// Chromium-based browser brands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    #[default]
    Chrome,
    Brave,
    Edge,
}

impl Brand {
    /// Name advertised in the `sec-ch-ua` brand list.
    pub fn display_name(&self) -> &'static str {
        match self {
            Brand::Chrome => "Google Chrome",
            Brand::Brave => "Brave",
            Brand::Edge => "Microsoft Edge",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Selects which profile registry a [`ClientSpec`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum BrowserFamily {
    Chromium { brand: Brand },
    Safari,
    Firefox,
}

impl BrowserFamily {
    /// Short lowercase name used in error messages and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            BrowserFamily::Chromium { .. } => "chromium",
            BrowserFamily::Safari => "safari",
            BrowserFamily::Firefox => "firefox",
        }
    }

    /// Resolve the family's registry for `version`.
    pub fn client_spec(&self, version: &str) -> crate::Result<ClientSpec> {
        match *self {
            BrowserFamily::Chromium { brand } => chromium(brand, version),
            BrowserFamily::Safari => safari(version),
            BrowserFamily::Firefox => firefox(version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_through_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
        assert_eq!("Windows".parse::<Platform>(), Ok(Platform::Windows));
        assert!("android".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serde_names() {
        let json = serde_json::to_string(&Platform::IpadOs).unwrap();
        assert_eq!(json, "\"ipados\"");
        let parsed: Platform = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(parsed, Platform::Windows);
    }

    #[test]
    fn test_brand_display_names() {
        assert_eq!(Brand::Chrome.display_name(), "Google Chrome");
        assert_eq!(Brand::Brave.display_name(), "Brave");
        assert_eq!(Brand::Edge.display_name(), "Microsoft Edge");
    }

    #[test]
    fn test_family_from_config() {
        let family: BrowserFamily =
            serde_json::from_str(r#"{"family":"chromium","brand":"edge"}"#).unwrap();
        assert_eq!(family, BrowserFamily::Chromium { brand: Brand::Edge });
        let spec = family.client_spec("120.0.0.0").unwrap();
        assert_eq!(spec.version(), "120.0.0.0");
    }
}
