//! `NO_PROXY` bypass rules.

use std::net::IpAddr;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    Everything,
    Ip(IpAddr),
    Network { base: IpAddr, prefix: u8 },
    /// Matches the domain itself and any subdomain.
    Domain(String),
}

/// Hosts that are reached directly even when a proxy is configured.
///
/// Accepts the comma separated curl syntax: `*`, bare IPs, CIDR blocks and
/// domain names with an optional leading `.` or `*.`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoProxy {
    rules: Vec<Rule>,
}

impl NoProxy {
    pub fn parse(raw: &str) -> Self {
        let rules = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_rule)
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `host` (a name or an IP literal, brackets allowed) bypasses the proxy.
    pub fn matches(&self, host: &str) -> bool {
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let ip = host.parse::<IpAddr>().ok();
        let host = host.trim_end_matches('.').to_ascii_lowercase();

        self.rules.iter().any(|rule| match (rule, ip) {
            (Rule::Everything, _) => true,
            (Rule::Ip(expected), Some(ip)) => *expected == ip,
            (Rule::Network { base, prefix }, Some(ip)) => in_network(*base, *prefix, ip),
            (Rule::Domain(domain), None) => {
                host == *domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            }
            _ => false,
        })
    }

    pub fn matches_url(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| self.matches(host))
    }
}

fn parse_rule(entry: &str) -> Rule {
    if entry == "*" {
        return Rule::Everything;
    }
    if let Some((base, prefix)) = entry.split_once('/') {
        if let (Ok(base), Ok(prefix)) = (base.parse::<IpAddr>(), prefix.parse::<u8>()) {
            return Rule::Network { base, prefix };
        }
    }
    let bare = entry.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Rule::Ip(ip);
    }
    let domain = entry
        .trim_start_matches("*.")
        .trim_start_matches('.')
        .trim_end_matches('.');
    Rule::Domain(domain.to_ascii_lowercase())
}

fn in_network(base: IpAddr, prefix: u8, ip: IpAddr) -> bool {
    match (base, ip) {
        (IpAddr::V4(base), IpAddr::V4(ip)) if prefix <= 32 => {
            let shift = 32 - u32::from(prefix);
            u32::from(base).checked_shr(shift).unwrap_or(0)
                == u32::from(ip).checked_shr(shift).unwrap_or(0)
        }
        (IpAddr::V6(base), IpAddr::V6(ip)) if prefix <= 128 => {
            let shift = 128 - u32::from(prefix);
            u128::from(base).checked_shr(shift).unwrap_or(0)
                == u128::from(ip).checked_shr(shift).unwrap_or(0)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard() {
        let rules = NoProxy::parse("*");
        assert!(rules.matches("anything.com"));
        assert!(rules.matches("192.168.1.1"));
    }

    #[test]
    fn test_domain_and_subdomains() {
        let rules = NoProxy::parse("example.com, .internal.corp, *.svc.local");
        assert!(rules.matches("example.com"));
        assert!(rules.matches("API.Example.com"));
        assert!(rules.matches("internal.corp"));
        assert!(rules.matches("a.b.internal.corp"));
        assert!(rules.matches("db.svc.local"));
        assert!(!rules.matches("notexample.com"));
        assert!(!rules.matches("example.com.evil.net"));
    }

    #[test]
    fn test_ip_and_networks() {
        let rules = NoProxy::parse("10.0.0.0/8, 192.168.1.7, ::1, 2001:db8::/32");
        assert!(rules.matches("10.20.30.40"));
        assert!(rules.matches("192.168.1.7"));
        assert!(!rules.matches("192.168.1.8"));
        assert!(rules.matches("[::1]"));
        assert!(rules.matches("2001:db8::1"));
        assert!(!rules.matches("2001:db9::1"));
    }

    #[test]
    fn test_zero_prefix_matches_family() {
        let rules = NoProxy::parse("0.0.0.0/0");
        assert!(rules.matches("8.8.8.8"));
        assert!(!rules.matches("::1"));
    }

    #[test]
    fn test_empty() {
        let rules = NoProxy::parse(" , ");
        assert!(rules.is_empty());
        assert!(!rules.matches("localhost"));
    }
}
