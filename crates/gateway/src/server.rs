//! HTTP edge concerns: browser access rules and shutdown signalling.

use axum::http::{header, HeaderValue, Method};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};

use rd_domain::config::CorsConfig;

/// Methods served by [`crate::api::router`], plus the preflight.
const API_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// One entry of `server.cors.allowed_origins`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    /// `"*"`: every origin.
    Any,
    /// `scheme://host:*`: the host on any numeric port. Holds the text up
    /// to and including the colon.
    AnyPort(String),
    Exact(String),
}

impl OriginRule {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "*" {
            OriginRule::Any
        } else if let Some(prefix) = raw.strip_suffix('*').filter(|p| p.ends_with(':')) {
            OriginRule::AnyPort(prefix.to_owned())
        } else {
            OriginRule::Exact(raw.trim_end_matches('/').to_owned())
        }
    }

    fn matches(&self, origin: &str) -> bool {
        match self {
            OriginRule::Any => true,
            OriginRule::AnyPort(prefix) => origin
                .strip_prefix(prefix.as_str())
                .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())),
            OriginRule::Exact(exact) => exact == origin,
        }
    }
}

/// Build the CORS layer for the reply API.
///
/// Callers are unauthenticated, so no credentials or `Authorization`
/// header are allowed; only JSON bodies on the API's own methods.
pub fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let rules: Vec<OriginRule> = cors.allowed_origins.iter().map(|o| OriginRule::parse(o)).collect();

    let allow_origin = if rules.contains(&OriginRule::Any) {
        tracing::warn!("CORS configured with wildcard \"*\"; all origins allowed");
        AllowOrigin::any()
    } else if rules.iter().all(|r| matches!(r, OriginRule::Exact(_))) {
        let exact: Vec<HeaderValue> = rules
            .iter()
            .filter_map(|rule| match rule {
                OriginRule::Exact(o) => match o.parse::<HeaderValue>() {
                    Ok(hv) => Some(hv),
                    Err(_) => {
                        tracing::warn!(origin = %o, "invalid CORS origin, skipping");
                        None
                    }
                },
                _ => None,
            })
            .collect();
        AllowOrigin::list(exact)
    } else {
        AllowOrigin::predicate(move |origin, _| {
            origin
                .to_str()
                .is_ok_and(|origin| rules.iter().any(|r| r.matches(origin)))
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(API_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

/// Resolve on SIGINT or SIGTERM, then cancel `shutdown` so in-flight run
/// polls end before the listener drains.
pub async fn shutdown_signal(shutdown: CancellationToken) {
    let signal = wait_for_signal().await;
    tracing::info!(signal, "shutting down; abandoning in-flight runs");
    shutdown.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to register SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return "SIGINT";
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "SIGINT"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn origin_rules_parse() {
        assert_eq!(OriginRule::parse("*"), OriginRule::Any);
        assert_eq!(
            OriginRule::parse("http://localhost:*"),
            OriginRule::AnyPort("http://localhost:".into())
        );
        assert_eq!(
            OriginRule::parse("https://mail.example.com/"),
            OriginRule::Exact("https://mail.example.com".into())
        );
    }

    #[test]
    fn any_port_rule_requires_numeric_port() {
        let rule = OriginRule::parse("http://localhost:*");
        assert!(rule.matches("http://localhost:5173"));
        assert!(!rule.matches("http://localhost:"));
        assert!(!rule.matches("http://localhost:80.evil.com"));
        assert!(!rule.matches("http://localhost.evil.com:80"));
    }

    fn app(origins: &[&str]) -> Router {
        let cors = CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        };
        Router::new()
            .route("/", post(|| async { "ok" }))
            .layer(build_cors_layer(&cors))
    }

    async fn preflight(app: Router, origin: &str) -> axum::http::Response<Body> {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn preflight_allows_configured_origin_without_credentials() {
        let resp = preflight(app(&["http://localhost:*"]), "http://localhost:3001").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3001"
        );
        assert!(headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST") && !methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn preflight_from_unknown_origin_gets_no_allow_header() {
        let resp = preflight(app(&["https://mail.example.com"]), "https://evil.example").await;
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn wildcard_allows_any_origin() {
        let resp = preflight(app(&["*"]), "https://anywhere.example").await;
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
