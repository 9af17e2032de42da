//! 应用层

pub mod simple;

use axum::{middleware, routing::get, Router};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::core::middleware::request_logging_middleware;
use simple::handler::{self, AppState};

/// 创建路由，路径沿用原控制器的命名
pub fn create_router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route(
            "/indirectlyCallMethodThatIsNotAdvised",
            get(handler::indirectly_call_method_that_is_not_advised),
        )
        .route(
            "/directlyCallMethodThatIsNotAdvised",
            get(handler::directly_call_method_that_is_not_advised),
        )
        .route("/beforeAndAfter", get(handler::before_and_after))
        .route("/around", get(handler::around))
        .route("/afterReturning", get(handler::after_returning))
        .route("/afterThrowing", get(handler::after_throwing))
        .route("/annotatedMethod", get(handler::annotated_method))
        .route("/secondAnnotatedMethod", get(handler::second_annotated_method))
        .route("/thirdAnnotatedMethod", get(handler::third_annotated_method))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aop::Journal;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let state = AppState::new(simple::advised_service(Journal::default()));
        create_router(state, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_known_route_is_ok() {
        let response = router()
            .oneshot(Request::builder().uri("/around").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
