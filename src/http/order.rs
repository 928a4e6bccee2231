//! Per-request ordering annotations.
//!
//! Both types travel in [`http::Extensions`]; the executor reads them when
//! it serialises the request.

use http::header::HeaderName;
use http::HeaderMap;
use std::fmt;

/// An HTTP/2 request pseudo-header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoHeader {
    Method,
    Authority,
    Scheme,
    Path,
}

impl PseudoHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoHeader::Method => ":method",
            PseudoHeader::Authority => ":authority",
            PseudoHeader::Scheme => ":scheme",
            PseudoHeader::Path => ":path",
        }
    }
}

impl fmt::Display for PseudoHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order of the four request pseudo-headers in a HEADERS frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PseudoHeaderOrder(pub [PseudoHeader; 4]);

impl PseudoHeaderOrder {
    pub const fn new(order: [PseudoHeader; 4]) -> Self {
        Self(order)
    }

    pub fn as_slice(&self) -> &[PseudoHeader] {
        &self.0
    }

    /// True when every pseudo-header appears exactly once.
    pub fn is_permutation(&self) -> bool {
        [
            PseudoHeader::Method,
            PseudoHeader::Authority,
            PseudoHeader::Scheme,
            PseudoHeader::Path,
        ]
        .iter()
        .all(|p| self.0.iter().filter(|q| *q == p).count() == 1)
    }
}

/// Explicit order for regular header fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderOrder(pub Vec<HeaderName>);

impl HeaderOrder {
    /// Rebuild `headers` so the listed names come first, in list order.
    /// Unlisted names follow in their existing order. Values of a
    /// repeated name keep their relative order.
    pub fn apply(&self, headers: &HeaderMap) -> HeaderMap {
        let mut ordered = HeaderMap::with_capacity(headers.len());

        for name in &self.0 {
            if ordered.contains_key(name) {
                continue;
            }
            for value in headers.get_all(name) {
                ordered.append(name.clone(), value.clone());
            }
        }

        for (name, value) in headers {
            if !self.0.contains(name) {
                ordered.append(name.clone(), value.clone());
            }
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_permutation_check() {
        use PseudoHeader::*;
        assert!(PseudoHeaderOrder::new([Method, Path, Authority, Scheme]).is_permutation());
        assert!(!PseudoHeaderOrder::new([Method, Method, Authority, Scheme]).is_permutation());
    }

    #[test]
    fn test_apply_moves_listed_names_first() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));
        headers.append("cookie", HeaderValue::from_static("a=1"));
        headers.append("cookie", HeaderValue::from_static("b=2"));
        headers.insert("user-agent", HeaderValue::from_static("test"));
        headers.insert("x-extra", HeaderValue::from_static("1"));

        let order = HeaderOrder(vec![
            HeaderName::from_static("user-agent"),
            HeaderName::from_static("cookie"),
            HeaderName::from_static("missing"),
        ]);
        let ordered = order.apply(&headers);

        let names: Vec<&str> = ordered.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, ["user-agent", "cookie", "accept", "x-extra"]);
        let cookies: Vec<_> = ordered.get_all("cookie").iter().collect();
        assert_eq!(cookies, ["a=1", "b=2"]);
        assert_eq!(ordered.len(), 5);
    }
}
