//! # 面向切面编程（AOP）拦截演示
//!
//! 在一个简单的服务和一组 HTTP 端点上演示方法拦截：
//! - before / after / around / after-success / after-failure 五种通知
//! - 按名称、作用域通配、标记（注解）以及 AND / OR / NOT 组合的切点
//! - 内部自调用绕过代理，不触发任何通知
//!
//! 分层：
//! - `aop`: 拦截核心（描述符、切点、注册表、代理）
//! - `app`: 演示服务、日志切面、控制器
//! - `core`: 错误类型与中间件
//! - `infrastructure`: 配置与日志

pub mod aop;
pub mod app;
pub mod core;
pub mod infrastructure;

pub use crate::core::error::ServiceError;
