//! 观察日志
//!
//! 记录哪些通知被触发、目标操作何时真正执行。容量有限，超出后丢弃最旧的记录。

use super::advice::{AdviceKind, JoinPoint};
use super::proxy::current_call_id;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub const DEFAULT_JOURNAL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntrySource {
    Advice { rule: String, kind: AdviceKind },
    Target,
}

#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub source: EntrySource,
    pub operation: String,
    pub detail: Option<String>,
    pub call_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn rule(&self) -> Option<&str> {
        match &self.source {
            EntrySource::Advice { rule, .. } => Some(rule),
            EntrySource::Target => None,
        }
    }

    pub fn is_target(&self) -> bool {
        self.source == EntrySource::Target
    }
}

#[derive(Debug, Clone)]
pub struct Journal {
    entries: Arc<Mutex<VecDeque<JournalEntry>>>,
    capacity: usize,
}

impl Default for Journal {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl Journal {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<JournalEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, entry: JournalEntry) {
        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// 记录一次通知触发
    pub fn record_advice(
        &self,
        rule: &str,
        kind: AdviceKind,
        join_point: &JoinPoint<'_>,
        detail: Option<String>,
    ) {
        self.push(JournalEntry {
            source: EntrySource::Advice {
                rule: rule.to_string(),
                kind,
            },
            operation: join_point.descriptor.name().to_string(),
            detail,
            call_id: Some(join_point.call_id),
            recorded_at: Utc::now(),
        });
    }

    /// 记录目标操作的真实执行
    ///
    /// 经由代理执行时带上该次调用的 id；绕过代理的调用没有 id。
    pub fn record_target(&self, operation: &str, detail: Option<String>) {
        self.push(JournalEntry {
            source: EntrySource::Target,
            operation: operation.to_string(),
            detail,
            call_id: current_call_id(),
            recorded_at: Utc::now(),
        });
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.lock().iter().cloned().collect()
    }

    /// 某条规则触发的次数
    pub fn fired(&self, rule: &str) -> usize {
        self.lock()
            .iter()
            .filter(|entry| entry.rule() == Some(rule))
            .count()
    }

    /// 取出并清空全部记录
    pub fn drain(&self) -> Vec<JournalEntry> {
        self.lock().drain(..).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aop::descriptor::OperationDescriptor;

    #[test]
    fn test_record_and_count() {
        let journal = Journal::default();
        let d = OperationDescriptor::new("demo", "run");
        let jp = JoinPoint::new(&d, &[]);

        journal.record_advice("log", AdviceKind::Before, &jp, None);
        journal.record_target("run", None);
        journal.record_advice("log", AdviceKind::Before, &jp, Some("again".into()));

        assert_eq!(journal.len(), 3);
        assert_eq!(journal.fired("log"), 2);
        assert_eq!(journal.fired("missing"), 0);

        let entries = journal.entries();
        assert!(entries[1].is_target());
        assert_eq!(entries[1].call_id, None);
        assert_eq!(entries[0].call_id, Some(jp.call_id));
        assert_eq!(entries[2].detail.as_deref(), Some("again"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let journal = Journal::new(2);
        journal.record_target("a", None);
        journal.record_target("b", None);
        journal.record_target("c", None);

        let ops: Vec<_> = journal.entries().into_iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec!["b", "c"]);
        assert_eq!(journal.capacity(), 2);
        assert_eq!(Journal::new(0).capacity(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let journal = Journal::default();
        let other = journal.clone();
        other.record_target("run", None);
        assert_eq!(journal.len(), 1);

        let drained = journal.drain();
        assert_eq!(drained.len(), 1);
        assert!(other.is_empty());
    }

    #[test]
    fn test_entry_serializes_with_source_tag() {
        let journal = Journal::default();
        let d = OperationDescriptor::new("demo", "run");
        let jp = JoinPoint::new(&d, &[]);
        journal.record_advice("log", AdviceKind::AfterSuccess, &jp, None);

        let value = serde_json::to_value(&journal.entries()[0]).unwrap();
        assert_eq!(value["source"]["type"], "advice");
        assert_eq!(value["source"]["kind"], "after_success");
        assert_eq!(value["operation"], "run");
    }
}
