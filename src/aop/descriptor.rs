//! 操作描述符
//!
//! 描述一个可被拦截的操作：声明作用域、方法名、参数类型、返回类型和标记集合。
//! 描述符在织入时静态建立，之后不再改变。

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// 作用域路径分隔符
pub const SCOPE_SEPARATOR: &str = "::";

/// 附加在操作上的静态标记（注解）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Marker(&'static str);

impl Marker {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    scope: String,
    name: String,
    params: Vec<String>,
    returns: String,
    markers: BTreeSet<Marker>,
}

impl OperationDescriptor {
    /// 创建描述符，默认无参数、返回 `String`、无标记
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            params: Vec::new(),
            returns: "String".to_string(),
            markers: BTreeSet::new(),
        }
    }

    pub fn param(mut self, ty: impl Into<String>) -> Self {
        self.params.push(ty.into());
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.returns = ty.into();
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.insert(marker);
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 作用域按 `::` 拆分后的各段，忽略空段
    pub fn scope_segments(&self) -> Vec<&str> {
        self.scope
            .split(SCOPE_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 带作用域的完整名称，例如 `app::Service::run`
    pub fn qualified_name(&self) -> String {
        if self.scope.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.scope, SCOPE_SEPARATOR, self.name)
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn markers(&self) -> &BTreeSet<Marker> {
        &self.markers
    }

    pub fn has_marker(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }
}

/// 渲染为签名：`String app::Service::run(&str)`
impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}({})",
            self.returns,
            self.qualified_name(),
            self.params.join(", ")
        )
    }
}
