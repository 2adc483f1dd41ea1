use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use std::net::SocketAddr;

/// Anonymous visitor identity used for likes, views and comments.
/// SHA-256 over `ip:user_agent:accept_language`, hex encoded.
pub fn fingerprint_hash(ip: &str, user_agent: &str, accept_language: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{ip}:{user_agent}:{accept_language}").as_bytes());
    hex::encode(hasher.finalize())
}

/// Client address: first hop of `X-Forwarded-For`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, connect_info) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(ConnectInfo(addr))) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}
