//! 路径枚举策略
//!
//! 策略是一个封闭集合，在构建路由表时选定一次，之后不再按名字分派。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Path, ecmp, ksp};
use crate::error::{ConfigError, RouteError};
use crate::net::{Graph, NodeId};

/// 每对主机保留的候选路径上限的默认值
pub const DEFAULT_MAX_PATHS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathPolicy {
    /// k 条最短简单路径（Yen 算法）
    #[serde(rename = "kshort", alias = "ksp")]
    KShortest,
    /// 全部等价最短路径
    #[serde(rename = "ecmp")]
    Ecmp,
}

impl PathPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathPolicy::KShortest => "kshort",
            PathPolicy::Ecmp => "ecmp",
        }
    }

    /// 计算 `src` 到 `dst` 的至多 `k` 条路径。
    ///
    /// 两者不连通时返回 [`RouteError::NoPath`]，调用方应退化为泛洪。
    pub fn paths(&self, graph: &Graph, src: NodeId, dst: NodeId, k: usize) -> Result<Vec<Path>, RouteError> {
        if !graph.contains(src) || !graph.contains(dst) {
            return Err(RouteError::NoPath { src, dst });
        }
        match self {
            PathPolicy::KShortest => ksp::k_shortest_paths(graph, src, dst, k),
            PathPolicy::Ecmp => ecmp::ecmp_paths(graph, src, dst, k),
        }
    }
}

impl fmt::Display for PathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kshort" | "ksp" => Ok(PathPolicy::KShortest),
            "ecmp" => Ok(PathPolicy::Ecmp),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// 路由配置：策略 + 候选路径上限 K
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSpec {
    pub policy: PathPolicy,
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
}

fn default_max_paths() -> usize {
    DEFAULT_MAX_PATHS
}

impl Default for RoutingSpec {
    fn default() -> Self {
        Self {
            policy: PathPolicy::Ecmp,
            max_paths: DEFAULT_MAX_PATHS,
        }
    }
}

impl RoutingSpec {
    pub fn new(policy: PathPolicy, max_paths: usize) -> Self {
        Self { policy, max_paths }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_paths == 0 {
            return Err(ConfigError::ZeroMaxPaths);
        }
        Ok(())
    }

    /// 形如 `ecmp8` 的标签
    pub fn label(&self) -> String {
        format!("{}{}", self.policy, self.max_paths)
    }
}

impl FromStr for RoutingSpec {
    type Err = ConfigError;

    /// 接受 `kshort`、`ecmp`，以及带数字后缀覆盖 K 的 `ecmp64`、`kshort8`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        let (name, digits) = s.split_at(split);
        let policy: PathPolicy = name.parse().map_err(|_| ConfigError::UnknownPolicy(s.to_string()))?;
        let max_paths = if digits.is_empty() {
            DEFAULT_MAX_PATHS
        } else {
            digits.parse().map_err(|_| ConfigError::UnknownPolicy(s.to_string()))?
        };
        let spec = Self { policy, max_paths };
        spec.validate()?;
        Ok(spec)
    }
}
