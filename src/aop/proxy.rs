//! 拦截代理
//!
//! `Proxy<T>` 在构造时把注册表织入目标的每个操作，得到各自的通知链。
//! 只有经过代理入口的调用才会触发通知；目标内部方法之间的直接调用不经过代理，
//! 因此不会触发任何通知。

use super::advice::{Advice, AdviceKind, AdviceRule, JoinPoint, Outcome, Proceed};
use super::descriptor::OperationDescriptor;
use super::registry::AdviceRegistry;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, debug_span, trace, warn};
use uuid::Uuid;

thread_local! {
    static CURRENT_CALL: Cell<Option<Uuid>> = const { Cell::new(None) };
}

/// 当前线程上正在经由代理执行的调用 id；不在代理调用内时为 `None`
pub fn current_call_id() -> Option<Uuid> {
    CURRENT_CALL.with(Cell::get)
}

/// 代理调用期间设置当前调用 id，离开时恢复外层的值
struct CallScope {
    previous: Option<Uuid>,
}

impl CallScope {
    fn enter(call_id: Uuid) -> Self {
        let previous = CURRENT_CALL.with(|current| current.replace(Some(call_id)));
        Self { previous }
    }
}

impl Drop for CallScope {
    fn drop(&mut self) {
        CURRENT_CALL.with(|current| current.set(self.previous));
    }
}

/// 可被代理的目标，提供静态的操作描述符表
pub trait Advised: Send + Sync + 'static {
    type Operation: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn operations() -> Vec<(Self::Operation, OperationDescriptor)>;
}

/// 单个操作的通知链，各时机内按注册顺序排列
#[derive(Debug, Default, Clone)]
pub struct AdviceChain {
    before: Vec<Arc<AdviceRule>>,
    around: Vec<Arc<AdviceRule>>,
    after_success: Vec<Arc<AdviceRule>>,
    after_failure: Vec<Arc<AdviceRule>>,
    after: Vec<Arc<AdviceRule>>,
}

impl AdviceChain {
    pub fn weave(registry: &AdviceRegistry, descriptor: &OperationDescriptor) -> Self {
        Self {
            before: registry.rules_for(descriptor, AdviceKind::Before),
            around: registry.rules_for(descriptor, AdviceKind::Around),
            after_success: registry.rules_for(descriptor, AdviceKind::AfterSuccess),
            after_failure: registry.rules_for(descriptor, AdviceKind::AfterFailure),
            after: registry.rules_for(descriptor, AdviceKind::After),
        }
    }

    pub fn len(&self) -> usize {
        self.before.len()
            + self.around.len()
            + self.after_success.len()
            + self.after_failure.len()
            + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 某时机下的规则名，按执行顺序
    pub fn rule_names(&self, kind: AdviceKind) -> Vec<&str> {
        let rules = match kind {
            AdviceKind::Before => &self.before,
            AdviceKind::Around => &self.around,
            AdviceKind::AfterSuccess => &self.after_success,
            AdviceKind::AfterFailure => &self.after_failure,
            AdviceKind::After => &self.after,
        };
        rules.iter().map(|rule| rule.name()).collect()
    }

    /// 围绕真实调用执行通知链
    ///
    /// before 失败时立即返回该错误，真实调用及后续通知都不再执行。
    pub fn dispatch(&self, join_point: &JoinPoint<'_>, real: &dyn Fn() -> Outcome) -> Outcome {
        for rule in &self.before {
            if let Advice::Before(handler) = rule.advice() {
                trace!(rule = rule.name(), "before");
                handler(join_point)?;
            }
        }

        let outcome = proceed_through(&self.around, join_point, real);

        match &outcome {
            Ok(value) => {
                for rule in &self.after_success {
                    if let Advice::AfterSuccess(handler) = rule.advice() {
                        trace!(rule = rule.name(), "after_success");
                        handler(join_point, value);
                    }
                }
            }
            Err(error) => {
                for rule in &self.after_failure {
                    if let Advice::AfterFailure(handler) = rule.advice() {
                        trace!(rule = rule.name(), "after_failure");
                        handler(join_point, error);
                    }
                }
            }
        }

        for rule in &self.after {
            if let Advice::After(handler) = rule.advice() {
                trace!(rule = rule.name(), "after");
                handler(join_point);
            }
        }

        outcome
    }
}

/// 先注册的 around 在最外层
fn proceed_through(
    arounds: &[Arc<AdviceRule>],
    join_point: &JoinPoint<'_>,
    real: &dyn Fn() -> Outcome,
) -> Outcome {
    let Some((rule, rest)) = arounds.split_first() else {
        return real();
    };
    let Advice::Around(handler) = rule.advice() else {
        return proceed_through(rest, join_point, real);
    };

    trace!(rule = rule.name(), "around");
    let next = || proceed_through(rest, join_point, real);
    handler(join_point, Proceed::new(&next))
}

#[derive(Debug)]
struct WovenOperation {
    descriptor: OperationDescriptor,
    chain: AdviceChain,
}

/// 包裹目标对象的拦截代理
pub struct Proxy<T: Advised> {
    target: Arc<T>,
    woven: Arc<HashMap<T::Operation, WovenOperation>>,
}

impl<T: Advised> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            woven: Arc::clone(&self.woven),
        }
    }
}

impl<T: Advised> Proxy<T> {
    /// 织入：为目标的每个操作计算通知链
    pub fn new(target: T, registry: &AdviceRegistry) -> Self {
        let woven: HashMap<_, _> = T::operations()
            .into_iter()
            .map(|(op, descriptor)| {
                let chain = AdviceChain::weave(registry, &descriptor);
                debug!(
                    operation = %descriptor,
                    advice = chain.len(),
                    "织入操作"
                );
                (op, WovenOperation { descriptor, chain })
            })
            .collect();

        Self {
            target: Arc::new(target),
            woven: Arc::new(woven),
        }
    }

    /// 未经代理的目标对象，对它的调用不会触发通知
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn descriptor(&self, op: T::Operation) -> Option<&OperationDescriptor> {
        self.woven.get(&op).map(|w| &w.descriptor)
    }

    pub fn chain(&self, op: T::Operation) -> Option<&AdviceChain> {
        self.woven.get(&op).map(|w| &w.chain)
    }

    /// 经由代理调用目标操作
    ///
    /// `call` 是真实操作；around 通知可能调用它零次或多次。
    pub fn invoke<F>(&self, op: T::Operation, args: Vec<String>, call: F) -> Outcome
    where
        F: Fn(&T) -> Outcome,
    {
        let target = self.target.as_ref();
        let real = || call(target);

        let Some(woven) = self.woven.get(&op) else {
            warn!(operation = ?op, "操作没有描述符，直接调用且不应用通知");
            return real();
        };

        let join_point = JoinPoint::new(&woven.descriptor, &args);
        let span = debug_span!(
            "advised_call",
            operation = woven.descriptor.name(),
            call_id = %join_point.call_id
        );
        let _guard = span.enter();
        let _scope = CallScope::enter(join_point.call_id);

        let outcome = woven.chain.dispatch(&join_point, &real);
        debug!(ok = outcome.is_ok(), "代理调用结束");
        outcome
    }
}
