//! 演示应用：一个服务、一个日志切面、一组控制器路由

pub mod aspect;
pub mod handler;
pub mod pointcuts;
pub mod service;

pub use aspect::LoggingAspect;
pub use service::{SimpleApi, SimpleService};

use crate::aop::{Journal, Proxy};

/// 组装被代理的服务：服务与切面共用同一份观察日志
pub fn advised_service(journal: Journal) -> Proxy<SimpleService> {
    let aspect = LoggingAspect::new(journal);
    let registry = aspect.registry();
    Proxy::new(SimpleService::new(aspect.journal().clone()), &registry)
}
