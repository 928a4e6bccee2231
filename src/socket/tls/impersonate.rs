//! ClientHello templates per browser build.

use super::options::{CertCompression, ClientHelloSpec, ClientHelloSpecBuilder, TlsVersion};
use super::HelloId;

// --- Constants ---

// Chrome. TLS 1.3 suites are fixed inside BoringSSL and not listed here.
const CHROME_CIPHERS: &str = "ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-CHACHA20-POLY1305:ECDHE-RSA-AES128-SHA:ECDHE-RSA-AES256-SHA:AES128-GCM-SHA256:AES256-GCM-SHA384:AES128-SHA:AES256-SHA";
const CHROME_CURVES: &str = "X25519:P-256:P-384";
const CHROME_KYBER_CURVES: &str = "X25519Kyber768Draft00:X25519:P-256:P-384";
const CHROME_MLKEM_CURVES: &str = "X25519MLKEM768:X25519:P-256:P-384";
const CHROME_SIGALGS: &str = "ecdsa_secp256r1_sha256:rsa_pss_rsae_sha256:rsa_pkcs1_sha256:ecdsa_secp384r1_sha384:rsa_pss_rsae_sha384:rsa_pkcs1_sha384:rsa_pss_rsae_sha512:rsa_pkcs1_sha512";

// Firefox
const FIREFOX_CIPHERS: &str = "ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-CHACHA20-POLY1305:ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-ECDSA-AES256-SHA:ECDHE-ECDSA-AES128-SHA:ECDHE-RSA-AES128-SHA:ECDHE-RSA-AES256-SHA:AES128-GCM-SHA256:AES256-GCM-SHA384:AES128-SHA:AES256-SHA";
const FIREFOX_LEGACY_CIPHERS: &str = "ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-CHACHA20-POLY1305:ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-ECDSA-AES256-SHA:ECDHE-ECDSA-AES128-SHA:ECDHE-RSA-AES128-SHA:ECDHE-RSA-AES256-SHA:AES128-SHA:AES256-SHA:DES-CBC3-SHA";
const FIREFOX_CURVES: &str = "X25519:P-256:P-384:P-521";
const FIREFOX_MLKEM_CURVES: &str = "X25519MLKEM768:X25519:P-256:P-384:P-521";
const FIREFOX_SIGALGS: &str = "ecdsa_secp256r1_sha256:ecdsa_secp384r1_sha384:ecdsa_secp521r1_sha512:rsa_pss_rsae_sha256:rsa_pss_rsae_sha384:rsa_pss_rsae_sha512:rsa_pkcs1_sha256:rsa_pkcs1_sha384:rsa_pkcs1_sha512:ecdsa_sha1:rsa_pkcs1_sha1";

// Safari / iOS
const SAFARI_CIPHERS: &str = "ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-RSA-CHACHA20-POLY1305:ECDHE-ECDSA-AES256-SHA:ECDHE-ECDSA-AES128-SHA:ECDHE-RSA-AES256-SHA:ECDHE-RSA-AES128-SHA:AES256-GCM-SHA384:AES128-GCM-SHA256:AES256-SHA:AES128-SHA:ECDHE-ECDSA-DES-CBC3-SHA:ECDHE-RSA-DES-CBC3-SHA:DES-CBC3-SHA";
const IOS14_CIPHERS: &str = "ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-RSA-CHACHA20-POLY1305:ECDHE-ECDSA-AES256-SHA384:ECDHE-ECDSA-AES128-SHA256:ECDHE-ECDSA-AES256-SHA:ECDHE-ECDSA-AES128-SHA:ECDHE-RSA-AES256-SHA384:ECDHE-RSA-AES128-SHA256:ECDHE-RSA-AES256-SHA:ECDHE-RSA-AES128-SHA:AES256-GCM-SHA384:AES128-GCM-SHA256:AES256-SHA256:AES128-SHA256:AES256-SHA:AES128-SHA:ECDHE-ECDSA-DES-CBC3-SHA:ECDHE-RSA-DES-CBC3-SHA:DES-CBC3-SHA";
const SAFARI_CURVES: &str = "X25519:P-256:P-384:P-521";
const SAFARI_SIGALGS: &str = "ecdsa_secp256r1_sha256:rsa_pss_rsae_sha256:rsa_pkcs1_sha256:ecdsa_secp384r1_sha384:ecdsa_sha1:rsa_pss_rsae_sha384:rsa_pkcs1_sha384:rsa_pss_rsae_sha512:rsa_pkcs1_sha512:rsa_pkcs1_sha1";

impl HelloId {
    /// Build a fresh, independently owned template for this id.
    pub fn spec(&self) -> ClientHelloSpec {
        match self {
            // Chrome 101 and 102 shipped the Chrome 100 hello unchanged.
            HelloId::Chrome100 | HelloId::Chrome102 => chrome_base().build(),
            HelloId::Chrome106Shuffle => chrome_base().permute_extensions(true).build(),
            // pre_shared_key must be last, so 112 dropped the padding extension.
            HelloId::Chrome112PskShuffle => chrome_base()
                .permute_extensions(true)
                .pre_shared_key(true)
                .padding(false)
                .build(),
            HelloId::Chrome114PaddingPskShuffle => chrome_base()
                .permute_extensions(true)
                .pre_shared_key(true)
                .build(),
            HelloId::Chrome115Pq => chrome_pq(CHROME_KYBER_CURVES).build(),
            HelloId::Chrome120 => chrome_pq(CHROME_KYBER_CURVES).ech_grease(true).build(),
            HelloId::Chrome131 => chrome_pq(CHROME_MLKEM_CURVES).ech_grease(true).build(),
            HelloId::Chrome133 => chrome_pq(CHROME_MLKEM_CURVES)
                .ech_grease(true)
                .alps_use_new_codepoint(true)
                .build(),
            HelloId::Safari16_0 => safari_base()
                .cert_compression(&[CertCompression::Zlib])
                .build(),
            HelloId::Ios14 => safari_base().cipher_list(IOS14_CIPHERS).build(),
            HelloId::Firefox55 | HelloId::Firefox56 => firefox_legacy().build(),
            HelloId::Firefox63 => firefox_base().build(),
            HelloId::Firefox65 => firefox_base().record_size_limit(16385).build(),
            HelloId::Firefox99 => firefox_base()
                .record_size_limit(16385)
                .delegated_credentials(true)
                .padding(true)
                .build(),
            HelloId::Firefox102 => firefox_base()
                .record_size_limit(16385)
                .delegated_credentials(true)
                .pre_shared_key(true)
                .build(),
            HelloId::Firefox105 => firefox_base()
                .record_size_limit(16385)
                .delegated_credentials(true)
                .pre_shared_key(true)
                .cert_compression(&[CertCompression::Zlib])
                .build(),
            HelloId::Firefox120 => firefox_base()
                .curves_list(FIREFOX_MLKEM_CURVES)
                .post_quantum(true)
                .record_size_limit(16385)
                .delegated_credentials(true)
                .pre_shared_key(true)
                .ech_grease(true)
                .cert_compression(&[
                    CertCompression::Zlib,
                    CertCompression::Brotli,
                    CertCompression::Zstd,
                ])
                .build(),
        }
    }
}

fn chrome_base() -> ClientHelloSpecBuilder {
    ClientHelloSpec::builder()
        .cipher_list(CHROME_CIPHERS)
        .curves_list(CHROME_CURVES)
        .sigalgs_list(CHROME_SIGALGS)
        .tls_versions(TlsVersion::Tls12, TlsVersion::Tls13)
        .grease(true)
        .padding(true)
        .ocsp_stapling(true)
        .signed_cert_timestamps(true)
        .alps_protocols(&["h2"])
        .cert_compression(&[CertCompression::Brotli])
}

fn chrome_pq(curves: &str) -> ClientHelloSpecBuilder {
    chrome_base()
        .curves_list(curves)
        .post_quantum(true)
        .permute_extensions(true)
        .pre_shared_key(true)
}

fn firefox_base() -> ClientHelloSpecBuilder {
    ClientHelloSpec::builder()
        .cipher_list(FIREFOX_CIPHERS)
        .curves_list(FIREFOX_CURVES)
        .sigalgs_list(FIREFOX_SIGALGS)
        .tls_versions(TlsVersion::Tls12, TlsVersion::Tls13)
        .ocsp_stapling(true)
}

fn firefox_legacy() -> ClientHelloSpecBuilder {
    ClientHelloSpec::builder()
        .cipher_list(FIREFOX_LEGACY_CIPHERS)
        .curves_list(FIREFOX_CURVES)
        .sigalgs_list(FIREFOX_SIGALGS)
        .tls_versions(TlsVersion::Tls10, TlsVersion::Tls12)
        .ocsp_stapling(true)
}

fn safari_base() -> ClientHelloSpecBuilder {
    ClientHelloSpec::builder()
        .cipher_list(SAFARI_CIPHERS)
        .curves_list(SAFARI_CURVES)
        .sigalgs_list(SAFARI_SIGALGS)
        .tls_versions(TlsVersion::Tls10, TlsVersion::Tls13)
        .grease(true)
        .ocsp_stapling(true)
        .signed_cert_timestamps(true)
}
