use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use crate::app::App;

const UNKNOWN: &str = "unknown";

/// Address of the caller, used as the per-IP rate limit identifier.
///
/// The socket peer by default. Forwarding headers are honored only when
/// `server.trust_forwarded_for` is set, i.e. when a proxy we control
/// overwrites them. Falls back to `"unknown"`, which makes all such callers
/// share one quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<App> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve(parts, app.config.server.trust_forwarded_for)))
    }
}

fn resolve(parts: &Parts, trust_forwarded_for: bool) -> String {
    let forwarded = trust_forwarded_for
        .then(|| from_headers(&parts.headers))
        .flatten();

    forwarded
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// First `X-Forwarded-For` entry, then `X-Real-IP`.
fn from_headers(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    header("x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(ToString::to_string)
}
