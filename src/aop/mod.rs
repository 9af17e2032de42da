//! 面向切面的方法拦截
//!
//! - [`descriptor`]: 操作描述符与标记
//! - [`pointcut`]: 切点匹配与组合
//! - [`advice`]: 通知、连接点与续体
//! - [`registry`]: 有序的通知注册表
//! - [`proxy`]: 织入与拦截代理
//! - [`journal`]: 通知触发的观察日志

pub mod advice;
pub mod descriptor;
pub mod journal;
pub mod pointcut;
pub mod proxy;
pub mod registry;

pub use advice::{Advice, AdviceKind, AdviceRule, JoinPoint, Outcome, Proceed};
pub use descriptor::{Marker, OperationDescriptor};
pub use journal::{EntrySource, Journal, JournalEntry};
pub use pointcut::{ExecutionPattern, Pointcut, ScopePattern};
pub use proxy::{current_call_id, AdviceChain, Advised, Proxy};
pub use registry::AdviceRegistry;
