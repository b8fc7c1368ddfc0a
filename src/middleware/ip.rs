use axum::{
    extract::{connect_info::ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Extract the client IP. Proxy headers are only read when `trust_proxy` is set;
/// otherwise any client could pick its own address by sending them.
pub fn extract_ip_from_headers(headers: &HeaderMap, fallback: Option<IpAddr>, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(headers) {
            return ip;
        }
    }
    fallback.unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(h) = headers.get("x-forwarded-for").and_then(|hv| hv.to_str().ok()) {
        if let Some(first) = h.split(',').next() {
            if let Ok(ip) = first.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    headers.get("x-real-ip").and_then(|hv| hv.to_str().ok()).and_then(|h| h.trim().parse::<IpAddr>().ok())
}

/// Optional extractor for remote socket address. Unlike `ConnectInfo`, this never rejects
/// if the connection info extension is absent (e.g. in tests).
#[derive(Clone, Copy, Debug, Default)]
pub struct MaybeRemoteAddr(pub Option<SocketAddr>);

impl MaybeRemoteAddr {
    /// Client IP; proxy headers win over the socket address only when `trust_proxy` is set.
    pub fn client_ip(&self, headers: &HeaderMap, trust_proxy: bool) -> IpAddr {
        extract_ip_from_headers(headers, self.0.map(|addr| addr.ip()), trust_proxy)
    }
}

impl<S> FromRequestParts<S> for MaybeRemoteAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeRemoteAddr(parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|info| info.0)))
    }
}
