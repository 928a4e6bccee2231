//! TLS ClientHello fingerprinting.
//!
//! Browser builds are named by a [`HelloId`]. The id resolves to a
//! [`ClientHelloSpec`] template which is applied to a BoringSSL connector for
//! every connection attempt.

use crate::base::{Error, Result};
use std::fmt;
use std::sync::Arc;

mod impersonate;
pub mod options;

pub use self::options::{CertCompression, ClientHelloSpec, ClientHelloSpecBuilder, TlsVersion};

/// Identifier of a pre-built ClientHello template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HelloId {
    Chrome100,
    Chrome102,
    Chrome106Shuffle,
    Chrome112PskShuffle,
    Chrome114PaddingPskShuffle,
    Chrome115Pq,
    Chrome120,
    Chrome131,
    Chrome133,
    Safari16_0,
    Ios14,
    Firefox55,
    Firefox56,
    Firefox63,
    Firefox65,
    Firefox99,
    Firefox102,
    Firefox105,
    Firefox120,
}

impl HelloId {
    pub const ALL: [HelloId; 19] = [
        HelloId::Chrome100,
        HelloId::Chrome102,
        HelloId::Chrome106Shuffle,
        HelloId::Chrome112PskShuffle,
        HelloId::Chrome114PaddingPskShuffle,
        HelloId::Chrome115Pq,
        HelloId::Chrome120,
        HelloId::Chrome131,
        HelloId::Chrome133,
        HelloId::Safari16_0,
        HelloId::Ios14,
        HelloId::Firefox55,
        HelloId::Firefox56,
        HelloId::Firefox63,
        HelloId::Firefox65,
        HelloId::Firefox99,
        HelloId::Firefox102,
        HelloId::Firefox105,
        HelloId::Firefox120,
    ];

    /// Client name and version label, e.g. `("Chrome", "106_shuffle")`.
    pub fn parts(&self) -> (&'static str, &'static str) {
        match self {
            HelloId::Chrome100 => ("Chrome", "100"),
            HelloId::Chrome102 => ("Chrome", "102"),
            HelloId::Chrome106Shuffle => ("Chrome", "106_shuffle"),
            HelloId::Chrome112PskShuffle => ("Chrome", "112_PSK_shuffle"),
            HelloId::Chrome114PaddingPskShuffle => ("Chrome", "114_padding_PSK_shuffle"),
            HelloId::Chrome115Pq => ("Chrome", "115_PQ"),
            HelloId::Chrome120 => ("Chrome", "120"),
            HelloId::Chrome131 => ("Chrome", "131"),
            HelloId::Chrome133 => ("Chrome", "133"),
            HelloId::Safari16_0 => ("Safari", "16.0"),
            HelloId::Ios14 => ("iOS", "14"),
            HelloId::Firefox55 => ("Firefox", "55"),
            HelloId::Firefox56 => ("Firefox", "56"),
            HelloId::Firefox63 => ("Firefox", "63"),
            HelloId::Firefox65 => ("Firefox", "65"),
            HelloId::Firefox99 => ("Firefox", "99"),
            HelloId::Firefox102 => ("Firefox", "102"),
            HelloId::Firefox105 => ("Firefox", "105"),
            HelloId::Firefox120 => ("Firefox", "120"),
        }
    }
}

impl fmt::Display for HelloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (client, version) = self.parts();
        write!(f, "{client} {version}")
    }
}

/// Supplies a fresh ClientHello template for each connection attempt.
pub type ClientHelloFactory = Arc<dyn Fn() -> ClientHelloSpec + Send + Sync>;

/// Check that `id` resolves to a usable template.
pub fn validate_hello_id(id: HelloId) -> Result<()> {
    id.spec()
        .validate()
        .map_err(|reason| Error::ProfileResolution { id, reason })
}

/// Factory returning a new copy of the template for `id` on every call.
pub fn hello_spec_factory(id: HelloId) -> ClientHelloFactory {
    Arc::new(move || id.spec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hello_id_resolves() {
        for id in HelloId::ALL {
            assert_eq!(validate_hello_id(id), Ok(()), "{id}");
        }
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(HelloId::Chrome106Shuffle.to_string(), "Chrome 106_shuffle");
        assert_eq!(HelloId::Safari16_0.to_string(), "Safari 16.0");
        assert_eq!(HelloId::Ios14.to_string(), "iOS 14");
        assert_eq!(HelloId::Firefox120.to_string(), "Firefox 120");
    }

    #[test]
    fn test_factory_copies_are_independent() {
        let factory = hello_spec_factory(HelloId::Chrome133);
        let mut first = factory();
        let second = factory();
        assert_eq!(first, second);

        first.alpn_protocols.clear();
        first.grease = false;
        assert_ne!(first, second);
        assert_eq!(factory(), second);
    }

    #[test]
    fn test_chrome_evolution() {
        assert!(!HelloId::Chrome102.spec().permute_extensions);
        assert!(HelloId::Chrome106Shuffle.spec().permute_extensions);
        assert!(!HelloId::Chrome106Shuffle.spec().pre_shared_key);
        assert!(HelloId::Chrome112PskShuffle.spec().pre_shared_key);
        assert!(!HelloId::Chrome112PskShuffle.spec().padding);
        assert!(HelloId::Chrome114PaddingPskShuffle.spec().padding);
        assert_ne!(
            HelloId::Chrome112PskShuffle.spec(),
            HelloId::Chrome114PaddingPskShuffle.spec()
        );
        assert!(!HelloId::Chrome114PaddingPskShuffle.spec().post_quantum);
        assert!(HelloId::Chrome115Pq.spec().post_quantum);
        assert!(!HelloId::Chrome115Pq.spec().ech_grease);
        assert!(HelloId::Chrome120.spec().ech_grease);
        assert!(HelloId::Chrome131.spec().curves_list.starts_with("X25519MLKEM768"));
        assert!(!HelloId::Chrome131.spec().alps_use_new_codepoint);
        assert!(HelloId::Chrome133.spec().alps_use_new_codepoint);
    }

    #[test]
    fn test_safari_and_ios_differ() {
        let safari = HelloId::Safari16_0.spec();
        let ios = HelloId::Ios14.spec();
        assert_eq!(safari.cert_compression, [CertCompression::Zlib]);
        assert!(ios.cert_compression.is_empty());
        assert!(ios.cipher_list.contains("ECDHE-ECDSA-AES256-SHA384"));
        assert!(!safari.cipher_list.contains("SHA384:"));
        assert_eq!(safari.sigalgs_list, ios.sigalgs_list);
        assert_eq!(ios.validate(), Ok(()));
    }

    #[test]
    fn test_templates_are_distinct() {
        // Builds whose hello did not change share a template.
        let same = [
            (HelloId::Chrome100, HelloId::Chrome102),
            (HelloId::Firefox55, HelloId::Firefox56),
        ];
        for (i, a) in HelloId::ALL.iter().enumerate() {
            for b in &HelloId::ALL[i + 1..] {
                if same.contains(&(*a, *b)) {
                    assert_eq!(a.spec(), b.spec(), "{a} / {b}");
                } else {
                    assert_ne!(a.spec(), b.spec(), "{a} / {b}");
                }
            }
        }
    }

    #[test]
    fn test_firefox_never_greases() {
        for id in [HelloId::Firefox55, HelloId::Firefox105, HelloId::Firefox120] {
            let spec = id.spec();
            assert!(!spec.grease, "{id}");
            assert!(!spec.permute_extensions, "{id}");
        }
        assert_eq!(HelloId::Firefox56.spec().max_tls_version, TlsVersion::Tls12);
        assert_eq!(HelloId::Firefox63.spec().max_tls_version, TlsVersion::Tls13);
        assert_eq!(HelloId::Firefox65.spec().record_size_limit, Some(16385));
        assert!(!HelloId::Firefox99.spec().pre_shared_key);
        assert!(HelloId::Firefox102.spec().pre_shared_key);
    }
}
