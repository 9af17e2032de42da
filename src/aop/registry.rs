//! 通知注册表
//!
//! 启动时按顺序注册规则，之后只读。同一操作可被多条规则匹配，全部生效，不去重。

use super::advice::{AdviceKind, AdviceRule};
use super::descriptor::OperationDescriptor;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct AdviceRegistry {
    rules: Vec<Arc<AdviceRule>>,
}

impl AdviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: AdviceRule) -> &mut Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// 给定时机下匹配该描述符的规则，按注册顺序返回
    pub fn rules_for(
        &self,
        descriptor: &OperationDescriptor,
        kind: AdviceKind,
    ) -> Vec<Arc<AdviceRule>> {
        self.rules
            .iter()
            .filter(|rule| rule.kind() == kind && rule.pointcut().matches(descriptor))
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdviceRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
