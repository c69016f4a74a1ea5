//! Client address resolution for inbound requests.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;

const X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// Resolves the caller's address.
///
/// The TCP peer is authoritative. With `trust_forwarded_for` set, the first
/// `X-Forwarded-For` entry wins; only enable that behind a proxy that
/// overwrites the header, otherwise any caller can claim a gateway address.
pub fn client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_forwarded_for: bool,
) -> Option<String> {
    if trust_forwarded_for {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}
