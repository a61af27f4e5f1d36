pub mod health;
pub mod reply;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reply::reply))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, Response};
    use tower::ServiceExt;

    use crate::reply::testing::{generator, test_config, StubFetcher, StubPlatform};
    use crate::state::AppState;

    pub fn app_state(platform: Arc<StubPlatform>) -> AppState {
        AppState::new(
            Arc::new(test_config()),
            Arc::new(generator(platform, Arc::new(StubFetcher::new()))),
        )
    }

    pub async fn send(state: AppState, req: Request<Body>) -> (u16, serde_json::Value) {
        let resp: Response<Body> = super::router().with_state(state).oneshot(req).await.unwrap();
        let status = resp.status().as_u16();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub fn post_json(body: &str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }
}
