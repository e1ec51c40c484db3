//! Origin allow-list gate and CORS header shaping for the sign endpoints.
//!
//! Runs before any handler. A request is admitted when:
//! - its `Origin` header exactly matches an allowed origin, or
//! - it has no `Origin`, and its `Referer` resolves to an allowed origin, or
//! - it has no `Origin`, and it was addressed to `localhost` / `127.0.0.1` (local development).
//!
//! Everything else gets a bare 403 before business logic runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use url::Url;

use crate::errors::AppError;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";
const LOCAL_HOSTNAMES: &[&str] = &["localhost", "127.0.0.1"];

/// Why a request was let through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Caller identified as this allowed origin; it is echoed back.
    Origin(String),
    /// No origin information, but the request targeted a local development host.
    LocalDevelopment,
}

/// Decides whether a request may proceed. `hostname` is the host the request
/// was addressed to, without port.
pub fn admit(headers: &HeaderMap, hostname: Option<&str>, allowed: &[String]) -> Option<Admission> {
    let is_allowed = |candidate: &str| allowed.iter().any(|a| a == candidate);

    if let Some(origin) = header_str(headers, header::ORIGIN).filter(|o| !o.is_empty()) {
        return is_allowed(origin).then(|| Admission::Origin(origin.to_string()));
    }

    let referer_origin = header_str(headers, header::REFERER)
        .and_then(|referer| Url::parse(referer).ok())
        .map(|url| url.origin().ascii_serialization());
    if let Some(origin) = referer_origin.filter(|o| is_allowed(o.as_str())) {
        return Some(Admission::Origin(origin));
    }

    hostname
        .filter(|h| LOCAL_HOSTNAMES.contains(h))
        .map(|_| Admission::LocalDevelopment)
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Hostname the request was addressed to: URI authority first, then `Host`.
fn request_hostname(request: &Request) -> Option<String> {
    if let Some(host) = request.uri().host() {
        return Some(host.to_string());
    }
    let host = header_str(request.headers(), header::HOST)?;
    Url::parse(&format!("http://{host}"))
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

/// Middleware: rejects disallowed callers, decorates admitted responses with CORS headers.
pub async fn origin_guard(
    State(allowed): State<Arc<Vec<String>>>,
    request: Request,
    next: Next,
) -> Response {
    let hostname = request_hostname(&request);
    let Some(admission) = admit(request.headers(), hostname.as_deref(), &allowed) else {
        tracing::warn!(
            origin = ?request.headers().get(header::ORIGIN),
            host = ?hostname,
            "Rejected request from disallowed origin"
        );
        return AppError::Forbidden.into_response();
    };

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut(), &admission);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, admission: &Admission) {
    if let Admission::Origin(origin) = admission {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// OPTIONS on a sign endpoint: empty 200; headers come from `origin_guard`.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![
            "https://lucky.closeai.moe".to_string(),
            "http://localhost:8788".to_string(),
        ]
    }

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_admit_exact_origin_match() {
        let h = headers(&[(header::ORIGIN, "https://lucky.closeai.moe")]);
        assert_eq!(
            admit(&h, Some("api.example"), &allowed()),
            Some(Admission::Origin("https://lucky.closeai.moe".into()))
        );
    }

    #[test]
    fn test_admit_rejects_near_miss_origins() {
        for origin in [
            "https://lucky.closeai.moe.evil.com",
            "http://lucky.closeai.moe",
            "https://lucky.closeai.moe/",
            "http://localhost:5173",
        ] {
            let h = headers(&[(header::ORIGIN, origin)]);
            assert_eq!(admit(&h, None, &allowed()), None, "{origin}");
        }
    }

    #[test]
    fn test_present_but_disallowed_origin_ignores_localhost() {
        let h = headers(&[(header::ORIGIN, "https://evil.example")]);
        assert_eq!(admit(&h, Some("localhost"), &allowed()), None);
    }

    #[test]
    fn test_admit_via_referer_origin() {
        let h = headers(&[(header::REFERER, "https://lucky.closeai.moe/draw?x=1")]);
        assert_eq!(
            admit(&h, Some("api.example"), &allowed()),
            Some(Admission::Origin("https://lucky.closeai.moe".into()))
        );
    }

    #[test]
    fn test_invalid_referer_is_ignored() {
        let h = headers(&[(header::REFERER, "not a url")]);
        assert_eq!(admit(&h, Some("api.example"), &allowed()), None);
    }

    #[test]
    fn test_local_development_without_origin() {
        let h = HeaderMap::new();
        assert_eq!(
            admit(&h, Some("127.0.0.1"), &allowed()),
            Some(Admission::LocalDevelopment)
        );
        assert_eq!(
            admit(&h, Some("localhost"), &allowed()),
            Some(Admission::LocalDevelopment)
        );
        assert_eq!(admit(&h, Some("lucky.closeai.moe"), &allowed()), None);
        assert_eq!(admit(&h, None, &allowed()), None);
    }

    #[test]
    fn test_cors_headers_only_echo_admitted_origin() {
        let mut h = HeaderMap::new();
        apply_cors_headers(&mut h, &Admission::LocalDevelopment);
        assert!(h.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(h.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), ALLOW_METHODS);

        let mut h = HeaderMap::new();
        apply_cors_headers(&mut h, &Admission::Origin("http://localhost:8788".into()));
        assert_eq!(
            h.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:8788"
        );
        assert_eq!(h.get(header::VARY).unwrap(), "Origin");
    }
}
