//! Reviewer identifier resolution
//!
//! The survey page makes a best-effort fetch of the client's public IP from
//! an external lookup service and reports it when creating the session. When
//! that is unavailable the service falls back to proxy-supplied headers, and
//! finally to a timestamp-derived pseudo-identifier. Never fatal.

use axum::http::HeaderMap;
use tracing::debug;

/// Resolve the reviewer identifier for a new session
pub fn resolve_identifier(
    reported_ip: Option<&str>,
    headers: &HeaderMap,
    now_ms: i64,
) -> String {
    if let Some(ip) = reported_ip.filter(|ip| plausible_ip(ip)) {
        return ip.to_string();
    }
    if let Some(ip) = client_ip_from_headers(headers) {
        return ip;
    }
    debug!("No client IP available, using timestamp fallback identifier");
    fallback_identifier(now_ms)
}

/// Client address from proxy headers (first X-Forwarded-For hop, then
/// X-Real-Ip)
pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        let first = forwarded.split(',').next().map(str::trim).unwrap_or("");
        if plausible_ip(first) {
            return Some(first.to_string());
        }
    }
    header_str(headers, "x-real-ip")
        .filter(|ip| plausible_ip(ip))
        .map(str::to_string)
}

/// Pseudo-identifier used when no IP address could be determined
pub fn fallback_identifier(now_ms: i64) -> String {
    now_ms.to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Loose sanity check: enough to reject garbage, not a full parser
fn plausible_ip(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= 45
        && candidate
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '.' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_reported_ip_wins() {
        let headers = HeaderMap::new();
        let id = resolve_identifier(Some("203.0.113.9"), &headers, 1234);
        assert_eq!(id, "203.0.113.9");
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.7, 10.0.0.1"),
        );
        assert_eq!(
            client_ip_from_headers(&headers),
            Some("198.51.100.7".to_string())
        );
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));
        assert_eq!(
            client_ip_from_headers(&headers),
            Some("2001:db8::1".to_string())
        );
    }

    #[test]
    fn test_timestamp_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_identifier(None, &headers, 1_700_000_000_000), "1700000000000");
    }

    #[test]
    fn test_garbage_reported_ip_is_ignored() {
        let headers = HeaderMap::new();
        let id = resolve_identifier(Some("<script>alert(1)</script>"), &headers, 77);
        assert_eq!(id, "77");
    }
}
