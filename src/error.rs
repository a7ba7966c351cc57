//! 错误类型
//!
//! - [`ConfigError`]：配置非法，启动前即失败
//! - [`RouteError`]：单个流的转发决策失败，调用方回退为泛洪

use mac_address::MacAddress;
use std::path::PathBuf;

use crate::net::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid port split: r={r} must be < k={k}")]
    InvalidPorts { k: usize, r: usize },
    #[error("switch count must be positive")]
    NoSwitches,
    #[error("port count k={0} out of range")]
    PortCount(usize),
    #[error("fat-tree k={0} must be even and >= 2")]
    FatTreeArity(usize),
    #[error("{0} hosts exceed the 10.0.0.0/8 address space")]
    TooManyHosts(usize),
    #[error("max paths must be positive")]
    ZeroMaxPaths,
    #[error("unknown routing policy `{0}`")]
    UnknownPolicy(String),
    #[error("unknown topology `{0}`")]
    UnknownTopology(String),
    #[error("missing config key `{0}`")]
    MissingKey(&'static str),
    #[error("invalid value `{value}` for config key `{key}`")]
    InvalidValue { key: String, value: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no path from {src} to {dst}")]
    NoPath { src: NodeId, dst: NodeId },
    #[error("{node} is not adjacent to {neighbor}")]
    NotAdjacent { node: NodeId, neighbor: NodeId },
    #[error("no route installed for {src} -> {dst}")]
    NoRoute { src: NodeId, dst: NodeId },
    #[error("switch {switch} is not on the selected path for {src} -> {dst}: {path:?}")]
    SwitchNotOnPath {
        switch: NodeId,
        src: NodeId,
        dst: NodeId,
        path: Vec<NodeId>,
    },
    #[error("unknown host MAC {0}")]
    UnknownHost(MacAddress),
}

/// crate 级错误
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Route(#[from] RouteError),
}
