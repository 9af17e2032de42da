//! 切点匹配
//!
//! 切点只看操作描述符的静态形状（作用域、名称、参数类型、标记），从不检查运行时参数值。
//!
//! 作用域模式按 `::` 分段：
//! - `..` 匹配任意多段（包括零段）
//! - 段内的 `*` 匹配任意字符序列
//!
//! 例如 `aop_showcase::..::*SimpleService` 匹配 `aop_showcase` 之下任意深度、
//! 最后一段以 `SimpleService` 结尾的作用域。

use super::descriptor::{Marker, OperationDescriptor, SCOPE_SEPARATOR};
use std::ops::{BitAnd, BitOr, Not};

/// 单段通配匹配，只支持 `*`
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|c| *c == '*')
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Glob(String),
    AnyDepth,
}

/// 作用域模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePattern {
    segments: Vec<Segment>,
}

impl ScopePattern {
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split(SCOPE_SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                ".." => Segment::AnyDepth,
                glob => Segment::Glob(glob.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// 匹配任意作用域
    pub fn any() -> Self {
        Self {
            segments: vec![Segment::AnyDepth],
        }
    }

    pub fn matches(&self, scope: &[&str]) -> bool {
        match_segments(&self.segments, scope)
    }
}

fn match_segments(pattern: &[Segment], scope: &[&str]) -> bool {
    match pattern.split_first() {
        None => scope.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=scope.len()).any(|skip| match_segments(rest, &scope[skip..]))
        }
        Some((Segment::Glob(glob), rest)) => scope
            .split_first()
            .is_some_and(|(head, tail)| glob_match(glob, head) && match_segments(rest, tail)),
    }
}

/// 参数列表模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamPattern {
    /// `(..)`
    Any,
    /// 参数类型逐个相等；空列表即 `()`
    Exact(Vec<String>),
}

impl ParamPattern {
    pub fn matches(&self, params: &[String]) -> bool {
        match self {
            ParamPattern::Any => true,
            ParamPattern::Exact(expected) => expected.as_slice() == params,
        }
    }
}

/// `execution(...)` 风格的方法执行模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPattern {
    scope: ScopePattern,
    name: String,
    params: ParamPattern,
}

impl ExecutionPattern {
    /// 任意作用域下名称匹配 `name`（可含 `*`）的方法，参数不限
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            scope: ScopePattern::any(),
            name: name.into(),
            params: ParamPattern::Any,
        }
    }

    /// 任意方法
    pub fn any() -> Self {
        Self::named("*")
    }

    pub fn within(mut self, scope: &str) -> Self {
        self.scope = ScopePattern::new(scope);
        self
    }

    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = ParamPattern::Exact(params.into_iter().map(Into::into).collect());
        self
    }

    pub fn no_params(mut self) -> Self {
        self.params = ParamPattern::Exact(Vec::new());
        self
    }

    pub fn matches(&self, descriptor: &OperationDescriptor) -> bool {
        glob_match(&self.name, descriptor.name())
            && self.params.matches(descriptor.params())
            && self.scope.matches(&descriptor.scope_segments())
    }
}

/// 切点表达式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pointcut {
    Execution(ExecutionPattern),
    Annotated(Marker),
    And(Box<Pointcut>, Box<Pointcut>),
    Or(Box<Pointcut>, Box<Pointcut>),
    Not(Box<Pointcut>),
}

impl Pointcut {
    pub fn execution(pattern: ExecutionPattern) -> Self {
        Pointcut::Execution(pattern)
    }

    pub fn annotated(marker: Marker) -> Self {
        Pointcut::Annotated(marker)
    }

    pub fn and(self, other: Pointcut) -> Self {
        Pointcut::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Pointcut) -> Self {
        Pointcut::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Pointcut::Not(Box::new(self))
    }

    pub fn matches(&self, descriptor: &OperationDescriptor) -> bool {
        match self {
            Pointcut::Execution(pattern) => pattern.matches(descriptor),
            Pointcut::Annotated(marker) => descriptor.has_marker(*marker),
            Pointcut::And(a, b) => a.matches(descriptor) && b.matches(descriptor),
            Pointcut::Or(a, b) => a.matches(descriptor) || b.matches(descriptor),
            Pointcut::Not(inner) => !inner.matches(descriptor),
        }
    }
}

impl From<ExecutionPattern> for Pointcut {
    fn from(pattern: ExecutionPattern) -> Self {
        Pointcut::Execution(pattern)
    }
}

impl BitAnd for Pointcut {
    type Output = Pointcut;

    fn bitand(self, rhs: Pointcut) -> Pointcut {
        self.and(rhs)
    }
}

impl BitOr for Pointcut {
    type Output = Pointcut;

    fn bitor(self, rhs: Pointcut) -> Pointcut {
        self.or(rhs)
    }
}

impl Not for Pointcut {
    type Output = Pointcut;

    fn not(self) -> Pointcut {
        self.negate()
    }
}
