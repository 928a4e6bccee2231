use crate::base::neterror::NetError;
use boring::ssl::{
    CertificateCompressionAlgorithm, CertificateCompressor, SslConnectorBuilder, SslOptions,
    SslRef, SslVerifyMode, SslVersion,
};
use std::io::{self, Read, Write};

/// TLS protocol versions a hello template may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    Tls10,
    Tls11,
    Tls12,
    Tls13,
}

impl TlsVersion {
    fn ssl_version(self) -> SslVersion {
        match self {
            TlsVersion::Tls10 => SslVersion::TLS1,
            TlsVersion::Tls11 => SslVersion::TLS1_1,
            TlsVersion::Tls12 => SslVersion::TLS1_2,
            TlsVersion::Tls13 => SslVersion::TLS1_3,
        }
    }
}

/// Certificate compression algorithms (RFC 8879).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertCompression {
    Zlib,
    Brotli,
    Zstd,
}

/// Builder for `ClientHelloSpec`.
#[must_use]
#[derive(Debug, Clone)]
pub struct ClientHelloSpecBuilder {
    spec: ClientHelloSpec,
}

/// A ClientHello template.
///
/// Each connection attempt gets its own copy; the handshake may consume or
/// rewrite parts of it, so templates are never shared between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHelloSpec {
    /// ALPN protocols, in preference order.
    pub alpn_protocols: Vec<String>,

    /// Minimum TLS version.
    pub min_tls_version: TlsVersion,

    /// Maximum TLS version.
    pub max_tls_version: TlsVersion,

    /// OpenSSL-style cipher list for TLS 1.2 and below.
    pub cipher_list: String,

    /// Supported groups, in key-share preference order.
    pub curves_list: String,

    /// Signature algorithms.
    pub sigalgs_list: String,

    /// Send GREASE values in cipher, group and extension lists.
    pub grease: bool,

    /// Randomise extension order per connection.
    pub permute_extensions: bool,

    /// Offer a pre-shared key extension on resumption.
    pub pre_shared_key: bool,

    /// Pad the hello to dodge the 256..511 byte middlebox bug.
    pub padding: bool,

    /// A post-quantum hybrid group leads the key shares.
    pub post_quantum: bool,

    /// Send an ECH GREASE extension.
    pub ech_grease: bool,

    /// Request OCSP stapling.
    pub ocsp_stapling: bool,

    /// Request signed certificate timestamps.
    pub signed_cert_timestamps: bool,

    /// Advertise session ticket support.
    pub session_ticket: bool,

    /// Advertise delegated credentials.
    pub delegated_credentials: bool,

    /// ALPS protocols (application_settings extension).
    pub alps_protocols: Vec<String>,

    /// Use the new ALPS codepoint (17613) instead of 17513.
    pub alps_use_new_codepoint: bool,

    /// Certificate compression algorithms.
    pub cert_compression: Vec<CertCompression>,

    /// record_size_limit extension value.
    pub record_size_limit: Option<u16>,
}

impl Default for ClientHelloSpec {
    fn default() -> Self {
        Self {
            alpn_protocols: vec!["h2".to_string(), "http/1.1".to_string()],
            min_tls_version: TlsVersion::Tls12,
            max_tls_version: TlsVersion::Tls13,
            cipher_list: String::new(),
            curves_list: String::new(),
            sigalgs_list: String::new(),
            grease: false,
            permute_extensions: false,
            pre_shared_key: false,
            padding: false,
            post_quantum: false,
            ech_grease: false,
            ocsp_stapling: false,
            signed_cert_timestamps: false,
            session_ticket: true,
            delegated_credentials: false,
            alps_protocols: Vec::new(),
            alps_use_new_codepoint: false,
            cert_compression: Vec::new(),
            record_size_limit: None,
        }
    }
}

impl ClientHelloSpecBuilder {
    pub fn new() -> Self {
        Self {
            spec: ClientHelloSpec::default(),
        }
    }

    /// Start from an existing template.
    pub fn from_spec(spec: ClientHelloSpec) -> Self {
        Self { spec }
    }

    pub fn alpn_protocols(mut self, alpn: &[&str]) -> Self {
        self.spec.alpn_protocols = alpn.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tls_versions(mut self, min: TlsVersion, max: TlsVersion) -> Self {
        self.spec.min_tls_version = min;
        self.spec.max_tls_version = max;
        self
    }

    pub fn cipher_list(mut self, ciphers: &str) -> Self {
        self.spec.cipher_list = ciphers.to_string();
        self
    }

    pub fn curves_list(mut self, curves: &str) -> Self {
        self.spec.curves_list = curves.to_string();
        self
    }

    pub fn sigalgs_list(mut self, sigalgs: &str) -> Self {
        self.spec.sigalgs_list = sigalgs.to_string();
        self
    }

    pub fn grease(mut self, enabled: bool) -> Self {
        self.spec.grease = enabled;
        self
    }

    pub fn permute_extensions(mut self, enabled: bool) -> Self {
        self.spec.permute_extensions = enabled;
        self
    }

    pub fn pre_shared_key(mut self, enabled: bool) -> Self {
        self.spec.pre_shared_key = enabled;
        self
    }

    pub fn padding(mut self, enabled: bool) -> Self {
        self.spec.padding = enabled;
        self
    }

    pub fn post_quantum(mut self, enabled: bool) -> Self {
        self.spec.post_quantum = enabled;
        self
    }

    pub fn ech_grease(mut self, enabled: bool) -> Self {
        self.spec.ech_grease = enabled;
        self
    }

    pub fn ocsp_stapling(mut self, enabled: bool) -> Self {
        self.spec.ocsp_stapling = enabled;
        self
    }

    pub fn signed_cert_timestamps(mut self, enabled: bool) -> Self {
        self.spec.signed_cert_timestamps = enabled;
        self
    }

    pub fn session_ticket(mut self, enabled: bool) -> Self {
        self.spec.session_ticket = enabled;
        self
    }

    pub fn delegated_credentials(mut self, enabled: bool) -> Self {
        self.spec.delegated_credentials = enabled;
        self
    }

    pub fn alps_protocols(mut self, alps: &[&str]) -> Self {
        self.spec.alps_protocols = alps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn alps_use_new_codepoint(mut self, enabled: bool) -> Self {
        self.spec.alps_use_new_codepoint = enabled;
        self
    }

    pub fn cert_compression(mut self, algs: &[CertCompression]) -> Self {
        self.spec.cert_compression = algs.to_vec();
        self
    }

    pub fn record_size_limit(mut self, limit: u16) -> Self {
        self.spec.record_size_limit = Some(limit);
        self
    }

    pub fn build(self) -> ClientHelloSpec {
        self.spec
    }
}

impl Default for ClientHelloSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Groups BoringSSL has always understood. Used when the linked library
/// rejects a newer post-quantum group name.
const CLASSICAL_GROUPS: [&str; 4] = ["X25519", "P-256", "P-384", "P-521"];

impl ClientHelloSpec {
    pub fn builder() -> ClientHelloSpecBuilder {
        ClientHelloSpecBuilder::new()
    }

    /// Structural checks that do not need a TLS library.
    ///
    /// Returns a human-readable reason for the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_tls_version > self.max_tls_version {
            return Err(format!(
                "min version {:?} above max version {:?}",
                self.min_tls_version, self.max_tls_version
            ));
        }
        if self.cipher_list.is_empty() {
            return Err("empty cipher list".to_string());
        }
        if self.curves_list.is_empty() {
            return Err("empty supported groups".to_string());
        }
        if self.sigalgs_list.is_empty() {
            return Err("empty signature algorithms".to_string());
        }
        for list in [&self.cipher_list, &self.curves_list, &self.sigalgs_list] {
            if list.split(':').any(|item| item.is_empty() || item.contains(' ')) {
                return Err(format!("malformed list {list:?}"));
            }
        }
        if self.alpn_protocols.is_empty() {
            return Err("no ALPN protocols".to_string());
        }
        self.alpn_wire().map_err(|_| "ALPN protocol too long".to_string())?;
        if self
            .alps_protocols
            .iter()
            .any(|p| !self.alpn_protocols.contains(p))
        {
            return Err("ALPS protocol not offered in ALPN".to_string());
        }
        if self.post_quantum && !self.curves_list.split(':').any(is_post_quantum_group) {
            return Err("post-quantum flag without a post-quantum group".to_string());
        }
        if self.pre_shared_key && self.max_tls_version < TlsVersion::Tls13 {
            return Err("pre_shared_key requires TLS 1.3".to_string());
        }
        Ok(())
    }

    /// ALPN protocols in wire format (length-prefixed).
    pub fn alpn_wire(&self) -> Result<Vec<u8>, NetError> {
        let mut alpn_wire = Vec::new();
        for proto in &self.alpn_protocols {
            if proto.is_empty() || proto.len() > 255 {
                return Err(NetError::SslProtocolError);
            }
            alpn_wire.push(proto.len() as u8);
            alpn_wire.extend_from_slice(proto.as_bytes());
        }
        Ok(alpn_wire)
    }

    /// Whether the template lets the server pick HTTP/2.
    pub fn offers_h2(&self) -> bool {
        self.alpn_protocols.iter().any(|p| p == "h2")
    }

    /// Apply the context-wide part of this template to a connector builder.
    ///
    /// PSK, ALPS, padding, delegated credentials and record_size_limit have
    /// no BoringSSL setter and stay descriptive. ECH GREASE is per
    /// connection, see [`apply_to_connection`](Self::apply_to_connection).
    pub fn apply_to_builder(&self, builder: &mut SslConnectorBuilder) -> Result<(), NetError> {
        builder
            .set_min_proto_version(Some(self.min_tls_version.ssl_version()))
            .map_err(|_| NetError::SslProtocolError)?;
        builder
            .set_max_proto_version(Some(self.max_tls_version.ssl_version()))
            .map_err(|_| NetError::SslProtocolError)?;

        builder
            .set_cipher_list(&self.cipher_list)
            .map_err(|_| NetError::SslVersionOrCipherMismatch)?;

        let alpn_wire = self.alpn_wire()?;
        builder
            .set_alpn_protos(&alpn_wire)
            .map_err(|_| NetError::SslProtocolError)?;

        builder
            .set_sigalgs_list(&self.sigalgs_list)
            .map_err(|_| NetError::SslProtocolError)?;

        if builder.set_curves_list(&self.curves_list).is_err() {
            let classical = self
                .curves_list
                .split(':')
                .filter(|g| CLASSICAL_GROUPS.contains(g))
                .collect::<Vec<_>>()
                .join(":");
            tracing::warn!(
                groups = %self.curves_list,
                fallback = %classical,
                "supported groups rejected by BoringSSL, dropping post-quantum groups"
            );
            builder
                .set_curves_list(&classical)
                .map_err(|_| NetError::SslProtocolError)?;
        }

        builder.set_grease_enabled(self.grease);
        builder.set_permute_extensions(self.permute_extensions);

        if self.ocsp_stapling {
            builder.enable_ocsp_stapling();
        }
        if self.signed_cert_timestamps {
            builder.enable_signed_cert_timestamps();
        }
        if !self.session_ticket {
            builder.set_options(SslOptions::NO_TICKET);
        }

        for alg in &self.cert_compression {
            let added = match alg {
                CertCompression::Brotli => {
                    builder.add_certificate_compression_algorithm(BrotliCertificateDecoder)
                }
                CertCompression::Zlib => {
                    builder.add_certificate_compression_algorithm(ZlibCertificateDecoder)
                }
                CertCompression::Zstd => {
                    tracing::debug!("zstd certificate compression has no BoringSSL codepoint, skipped");
                    continue;
                }
            };
            added.map_err(|_| NetError::SslProtocolError)?;
        }

        // Certificate verification (use system verifier)
        builder.set_verify(SslVerifyMode::PEER);

        Ok(())
    }

    /// Apply the per-connection part of this template.
    pub fn apply_to_connection(&self, ssl: &SslRef) {
        if self.ech_grease {
            ssl.set_enable_ech_grease(true);
        }
    }
}

/// Brotli certificate decompression (RFC 8879). The client never compresses.
struct BrotliCertificateDecoder;

impl CertificateCompressor for BrotliCertificateDecoder {
    const ALGORITHM: CertificateCompressionAlgorithm = CertificateCompressionAlgorithm::BROTLI;
    const CAN_COMPRESS: bool = false;
    const CAN_DECOMPRESS: bool = true;

    fn decompress<W>(&self, input: &[u8], output: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let mut decoder = brotli::Decompressor::new(input, 4096);
        io::copy(&mut decoder, output)?;
        Ok(())
    }
}

/// Zlib certificate decompression (RFC 8879).
struct ZlibCertificateDecoder;

impl CertificateCompressor for ZlibCertificateDecoder {
    const ALGORITHM: CertificateCompressionAlgorithm = CertificateCompressionAlgorithm::ZLIB;
    const CAN_COMPRESS: bool = false;
    const CAN_DECOMPRESS: bool = true;

    fn decompress<W>(&self, input: &[u8], output: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let mut decoder = flate2::read::ZlibDecoder::new(input);
        let mut buf = Vec::new();
        decoder.read_to_end(&mut buf)?;
        output.write_all(&buf)
    }
}

fn is_post_quantum_group(group: &str) -> bool {
    group.contains("Kyber") || group.contains("MLKEM")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ClientHelloSpec {
        ClientHelloSpec::builder()
            .cipher_list("ECDHE-ECDSA-AES128-GCM-SHA256")
            .curves_list("X25519:P-256")
            .sigalgs_list("ecdsa_secp256r1_sha256")
            .build()
    }

    #[test]
    fn test_minimal_template_is_valid() {
        assert_eq!(minimal().validate(), Ok(()));
    }

    #[test]
    fn test_alpn_wire_format() {
        let wire = minimal().alpn_wire().unwrap();
        assert_eq!(wire, b"\x02h2\x08http/1.1");
    }

    #[test]
    fn test_rejects_inverted_versions() {
        let spec = ClientHelloSpecBuilder::from_spec(minimal())
            .tls_versions(TlsVersion::Tls13, TlsVersion::Tls12)
            .build();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_rejects_alps_outside_alpn() {
        let spec = ClientHelloSpecBuilder::from_spec(minimal())
            .alpn_protocols(&["http/1.1"])
            .alps_protocols(&["h2"])
            .build();
        assert!(spec.validate().unwrap_err().contains("ALPS"));
        assert!(!spec.offers_h2());
    }

    #[test]
    fn test_post_quantum_needs_group() {
        let spec = ClientHelloSpecBuilder::from_spec(minimal())
            .post_quantum(true)
            .build();
        assert!(spec.validate().is_err());

        let spec = ClientHelloSpecBuilder::from_spec(minimal())
            .curves_list("X25519MLKEM768:X25519")
            .post_quantum(true)
            .build();
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn test_zlib_certificate_decoder() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;

        let certificate = b"0\x82\x01\x0acertificate bytes".repeat(20);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&certificate).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut out = Vec::new();
        ZlibCertificateDecoder.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, certificate);
        assert!(ZlibCertificateDecoder
            .decompress(b"not zlib", &mut Vec::new())
            .is_err());
    }

    #[test]
    fn test_brotli_certificate_decoder() {
        let certificate = b"0\x82\x01\x0acertificate bytes".repeat(20);
        let mut compressed = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 5, 22);
            writer.write_all(&certificate).unwrap();
        }

        let mut out = Vec::new();
        BrotliCertificateDecoder.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, certificate);
    }

    #[test]
    fn test_rejects_malformed_lists() {
        let spec = ClientHelloSpecBuilder::from_spec(minimal())
            .cipher_list("AES128-SHA::AES256-SHA")
            .build();
        assert!(spec.validate().is_err());
    }
}
