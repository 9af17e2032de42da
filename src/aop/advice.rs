//! 通知（advice）与连接点

use super::descriptor::OperationDescriptor;
use super::pointcut::Pointcut;
use crate::core::error::ServiceError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// 一次调用的结果
pub type Outcome = Result<String, ServiceError>;

/// 通知的时机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Before,
    After,
    Around,
    AfterSuccess,
    AfterFailure,
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdviceKind::Before => "before",
            AdviceKind::After => "after",
            AdviceKind::Around => "around",
            AdviceKind::AfterSuccess => "after_success",
            AdviceKind::AfterFailure => "after_failure",
        };
        f.write_str(s)
    }
}

/// 调用上下文：被调用的操作和实际参数，每次调用新建
#[derive(Debug, Clone)]
pub struct JoinPoint<'a> {
    pub call_id: Uuid,
    pub descriptor: &'a OperationDescriptor,
    pub args: &'a [String],
}

impl<'a> JoinPoint<'a> {
    pub fn new(descriptor: &'a OperationDescriptor, args: &'a [String]) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            descriptor,
            args,
        }
    }

    pub fn signature(&self) -> String {
        self.descriptor.to_string()
    }
}

/// 交给 around 通知的续体，可调用零次、一次或多次
pub struct Proceed<'a> {
    next: &'a dyn Fn() -> Outcome,
}

impl<'a> Proceed<'a> {
    pub(crate) fn new(next: &'a dyn Fn() -> Outcome) -> Self {
        Self { next }
    }

    pub fn proceed(&self) -> Outcome {
        (self.next)()
    }
}

pub type BeforeHandler = dyn Fn(&JoinPoint<'_>) -> Result<(), ServiceError> + Send + Sync;
pub type AfterHandler = dyn Fn(&JoinPoint<'_>) + Send + Sync;
pub type AroundHandler = dyn Fn(&JoinPoint<'_>, Proceed<'_>) -> Outcome + Send + Sync;
pub type AfterSuccessHandler = dyn Fn(&JoinPoint<'_>, &str) + Send + Sync;
pub type AfterFailureHandler = dyn Fn(&JoinPoint<'_>, &ServiceError) + Send + Sync;

/// 通知处理器，变体即时机
///
/// 只有 around 能替换或阻止真实调用，其余时机只做观察。
#[derive(Clone)]
pub enum Advice {
    Before(Arc<BeforeHandler>),
    After(Arc<AfterHandler>),
    Around(Arc<AroundHandler>),
    AfterSuccess(Arc<AfterSuccessHandler>),
    AfterFailure(Arc<AfterFailureHandler>),
}

impl Advice {
    pub fn before<F>(f: F) -> Self
    where
        F: Fn(&JoinPoint<'_>) -> Result<(), ServiceError> + Send + Sync + 'static,
    {
        Advice::Before(Arc::new(f))
    }

    pub fn after<F>(f: F) -> Self
    where
        F: Fn(&JoinPoint<'_>) + Send + Sync + 'static,
    {
        Advice::After(Arc::new(f))
    }

    pub fn around<F>(f: F) -> Self
    where
        F: Fn(&JoinPoint<'_>, Proceed<'_>) -> Outcome + Send + Sync + 'static,
    {
        Advice::Around(Arc::new(f))
    }

    pub fn after_success<F>(f: F) -> Self
    where
        F: Fn(&JoinPoint<'_>, &str) + Send + Sync + 'static,
    {
        Advice::AfterSuccess(Arc::new(f))
    }

    pub fn after_failure<F>(f: F) -> Self
    where
        F: Fn(&JoinPoint<'_>, &ServiceError) + Send + Sync + 'static,
    {
        Advice::AfterFailure(Arc::new(f))
    }

    pub fn kind(&self) -> AdviceKind {
        match self {
            Advice::Before(_) => AdviceKind::Before,
            Advice::After(_) => AdviceKind::After,
            Advice::Around(_) => AdviceKind::Around,
            Advice::AfterSuccess(_) => AdviceKind::AfterSuccess,
            Advice::AfterFailure(_) => AdviceKind::AfterFailure,
        }
    }
}

impl fmt::Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Advice::{}", self.kind())
    }
}

/// 一条拦截规则：名称 + 切点 + 通知
#[derive(Debug, Clone)]
pub struct AdviceRule {
    name: String,
    pointcut: Pointcut,
    advice: Advice,
}

impl AdviceRule {
    pub fn new(name: impl Into<String>, pointcut: impl Into<Pointcut>, advice: Advice) -> Self {
        Self {
            name: name.into(),
            pointcut: pointcut.into(),
            advice,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AdviceKind {
        self.advice.kind()
    }

    pub fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    pub fn advice(&self) -> &Advice {
        &self.advice
    }
}
