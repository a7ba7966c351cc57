//! 配置
//!
//! 支持两种格式：
//! - JSON：`{"topology": {"kind": "jellyfish", ...}, "routing": {...}, "hash_salt": 0}`
//! - 逐行 `key=value`：`n=`、`k=`、`r=`、`seed=`、`routing=`，可选 `topology=`、`max_paths=`

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::routing::RoutingSpec;
use crate::topo::Topology;
use crate::topo::dummy::build_dummy;
use crate::topo::fat_tree::{FatTreeOpts, build_fat_tree};
use crate::topo::jellyfish::{JellyfishOpts, build_jellyfish};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub topology: TopologySpec,
    #[serde(default)]
    pub routing: RoutingSpec,
    /// 选路哈希的盐
    #[serde(default)]
    pub hash_salt: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    Jellyfish {
        n: usize,
        k: usize,
        /// 缺省为 `k - 1`
        #[serde(default)]
        r: Option<usize>,
        #[serde(default)]
        seed: u64,
    },
    FatTree {
        k: usize,
    },
    Dummy {
        #[serde(default)]
        seed: u64,
    },
}

impl Default for Config {
    fn default() -> Self {
        let opts = JellyfishOpts::default();
        Self {
            topology: TopologySpec::Jellyfish {
                n: opts.n,
                k: opts.k,
                r: Some(opts.r),
                seed: opts.seed,
            },
            routing: RoutingSpec::default(),
            hash_salt: 0,
        }
    }
}

impl TopologySpec {
    pub fn jellyfish_opts(&self) -> Option<JellyfishOpts> {
        match *self {
            TopologySpec::Jellyfish { n, k, r, seed } => Some(jellyfish_opts(n, k, r, seed)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            TopologySpec::Jellyfish { n, k, r, seed } => jellyfish_opts(n, k, r, seed).validate(),
            TopologySpec::FatTree { k } => FatTreeOpts { k }.validate(),
            TopologySpec::Dummy { .. } => Ok(()),
        }
    }

    pub fn build(&self) -> Result<Topology, ConfigError> {
        match *self {
            TopologySpec::Jellyfish { n, k, r, seed } => build_jellyfish(&jellyfish_opts(n, k, r, seed)),
            TopologySpec::FatTree { k } => build_fat_tree(&FatTreeOpts { k }).map(|(topo, _)| topo),
            TopologySpec::Dummy { seed } => Ok(build_dummy(seed)),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.topology.validate()?;
        self.routing.validate()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read(path.as_ref())?)
    }

    /// 解析逐行 `key=value` 格式；空行与 `#` 开头的行被忽略
    pub fn from_kv_str(raw: &str) -> Result<Self, ConfigError> {
        let mut topology = None;
        let mut n = None;
        let mut k = None;
        let mut r = None;
        let mut seed = 0;
        let mut routing = None;
        let mut max_paths = None;
        let mut hash_salt = 0;

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::InvalidValue {
                    key: line.to_string(),
                    value: String::new(),
                });
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "topology" | "topo" => topology = Some(value.to_string()),
                "n" => n = Some(parse_num(key, value)?),
                "k" => k = Some(parse_num(key, value)?),
                "r" => r = Some(parse_num(key, value)?),
                "seed" => seed = parse_num(key, value)?,
                "routing" => routing = Some(value.parse::<RoutingSpec>()?),
                "max_paths" => max_paths = Some(parse_num(key, value)?),
                "hash_salt" => hash_salt = parse_num(key, value)?,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        let topology = match topology.as_deref().unwrap_or("jellyfish") {
            "jellyfish" | "jelly" => TopologySpec::Jellyfish {
                n: n.ok_or(ConfigError::MissingKey("n"))?,
                k: k.ok_or(ConfigError::MissingKey("k"))?,
                r,
                seed,
            },
            "fat_tree" | "ft" => TopologySpec::FatTree {
                k: k.ok_or(ConfigError::MissingKey("k"))?,
            },
            "dummy" => TopologySpec::Dummy { seed },
            other => return Err(ConfigError::UnknownTopology(other.to_string())),
        };
        let mut routing = routing.ok_or(ConfigError::MissingKey("routing"))?;
        if let Some(max_paths) = max_paths {
            routing.max_paths = max_paths;
        }

        let cfg = Config {
            topology,
            routing,
            hash_salt,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_kv_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_kv_str(&read(path.as_ref())?)
    }

    /// 按扩展名选择格式：`.json` 走 JSON，其余按 `key=value` 解析
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = read(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&raw)
        } else {
            Self::from_kv_str(&raw)
        }
    }
}

/// 命令行对配置文件的覆盖项；未给出的字段保持原值
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub topology: Option<String>,
    pub n: Option<usize>,
    pub k: Option<usize>,
    pub r: Option<usize>,
    pub seed: Option<u64>,
    pub routing: Option<RoutingSpec>,
    pub max_paths: Option<usize>,
    pub hash_salt: Option<u64>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut cfg: Config) -> Result<Config, ConfigError> {
        let defaults = JellyfishOpts::default();
        let (cur_n, cur_k, cur_r, cur_seed) = match cfg.topology {
            TopologySpec::Jellyfish { n, k, r, seed } => (n, k, r, seed),
            TopologySpec::FatTree { k } => (defaults.n, k, None, defaults.seed),
            TopologySpec::Dummy { seed } => (defaults.n, defaults.k, None, seed),
        };
        let kind = match self.topology.as_deref() {
            Some(name) => name.to_string(),
            None => match cfg.topology {
                TopologySpec::Jellyfish { .. } => "jellyfish".to_string(),
                TopologySpec::FatTree { .. } => "fat_tree".to_string(),
                TopologySpec::Dummy { .. } => "dummy".to_string(),
            },
        };
        let k = self.k.unwrap_or(cur_k);
        let seed = self.seed.unwrap_or(cur_seed);
        cfg.topology = match kind.as_str() {
            "jellyfish" | "jelly" => TopologySpec::Jellyfish {
                n: self.n.unwrap_or(cur_n),
                k,
                r: self.r.or(cur_r),
                seed,
            },
            "fat_tree" | "ft" => TopologySpec::FatTree { k },
            "dummy" => TopologySpec::Dummy { seed },
            other => return Err(ConfigError::UnknownTopology(other.to_string())),
        };
        if let Some(routing) = self.routing {
            cfg.routing = routing;
        }
        if let Some(max_paths) = self.max_paths {
            cfg.routing.max_paths = max_paths;
        }
        if let Some(hash_salt) = self.hash_salt {
            cfg.hash_salt = hash_salt;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn jellyfish_opts(n: usize, k: usize, r: Option<usize>, seed: u64) -> JellyfishOpts {
    JellyfishOpts {
        n,
        k,
        r: r.unwrap_or_else(|| k.saturating_sub(1)),
        seed,
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
