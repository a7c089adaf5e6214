//! Client identity for admission limiting.
//!
//! The key is the client IP. Proxy headers are only believed as far as the
//! configured number of trusted proxies allows.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the client IP: `X-Forwarded-For` (honoring `trusted_proxy_count`), then
/// `X-Real-IP`, then the socket peer address, else `"unknown"`.
pub fn extract_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| client_from_forwarded_for(value, trusted_proxy_count));

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_ip)
    };

    forwarded
        .or_else(real_ip)
        .or_else(|| peer.map(|addr| addr.ip()))
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Pick the client out of a `client, proxy1, proxy2` chain.
///
/// The last `trusted_proxy_count` hops were appended by our own proxies; the entry
/// just before them is the client. With no trusted proxies, or a chain too short
/// to contain them, only the hop closest to us is used.
fn client_from_forwarded_for(value: &str, trusted_proxy_count: usize) -> Option<IpAddr> {
    let hops: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    let position = if trusted_proxy_count == 0 || hops.len() <= trusted_proxy_count {
        hops.len().checked_sub(1)?
    } else {
        hops.len() - trusted_proxy_count - 1
    };

    parse_ip(hops[position])
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}
