//! 控制器：把 HTTP 请求转成对服务的调用

use axum::extract::{Query, State};
use serde::Deserialize;
use std::sync::Arc;

use super::service::SimpleApi;
use crate::core::error::ServiceError;

#[derive(Clone)]
pub struct AppState {
    pub simple_service: Arc<dyn SimpleApi>,
}

impl AppState {
    pub fn new(simple_service: impl SimpleApi + 'static) -> Self {
        Self {
            simple_service: Arc::new(simple_service),
        }
    }
}

/// `name` 缺省或为空时都使用 `User`
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

impl NameQuery {
    pub fn name_or_default(self) -> String {
        self.name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(default_name)
    }
}

fn default_name() -> String {
    "User".to_string()
}

type TextResult = Result<String, ServiceError>;

pub async fn indirectly_call_method_that_is_not_advised(State(state): State<AppState>) -> TextResult {
    state.simple_service.call_method_that_is_not_advised()
}

pub async fn directly_call_method_that_is_not_advised(State(state): State<AppState>) -> TextResult {
    state
        .simple_service
        .method_that_is_not_advised_if_called_from_within_the_service()
}

pub async fn before_and_after(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> TextResult {
    let name = query.name_or_default();
    state.simple_service.do_something(&name)
}

pub async fn around(State(state): State<AppState>) -> TextResult {
    state.simple_service.do_something_else()
}

pub async fn after_returning(State(state): State<AppState>) -> TextResult {
    state.simple_service.return_success()
}

pub async fn after_throwing(State(state): State<AppState>) -> TextResult {
    state.simple_service.throw_exception()
}

pub async fn annotated_method(State(state): State<AppState>) -> TextResult {
    state.simple_service.annotated_method()
}

pub async fn second_annotated_method(State(state): State<AppState>) -> TextResult {
    state.simple_service.second_annotated_method()
}

pub async fn third_annotated_method(State(state): State<AppState>) -> TextResult {
    state.simple_service.third_annotated_method()
}
