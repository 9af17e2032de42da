//! 可复用的命名切点与标记

use crate::aop::{ExecutionPattern, Marker, Pointcut};

pub const CUSTOM_ANNOTATION: Marker = Marker::new("CustomAnnotation");
pub const SECOND_CUSTOM_ANNOTATION: Marker = Marker::new("SecondCustomAnnotation");

/// 应用根作用域及其所有子作用域
pub const APPLICATION_SCOPE: &str = "aop_showcase::..";

/// 应用内任意方法
pub fn application_methods() -> Pointcut {
    ExecutionPattern::any().within(APPLICATION_SCOPE).into()
}

/// 应用内带有 `marker` 的方法
pub fn annotated_with(marker: Marker) -> Pointcut {
    Pointcut::annotated(marker) & application_methods()
}

/// 带 `@CustomAnnotation` 的方法，单独声明以便在多个切面中引用
pub fn log_annotated_methods() -> Pointcut {
    annotated_with(CUSTOM_ANNOTATION)
}
