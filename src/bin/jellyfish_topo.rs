//! 构建拓扑与路由表
//!
//! 打印摘要，并可导出拓扑描述（供仿真侧搭建同一拓扑）和路由表 JSON。

use clap::Parser;
use jellyfish_rs::config::{Config, ConfigOverrides};
use jellyfish_rs::error::Error;
use jellyfish_rs::routing::{Router, RoutingSpec};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "jellyfish-topo", about = "构建 Jellyfish 拓扑与多路径路由表")]
struct Args {
    /// 配置文件（.json 或 key=value）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 拓扑种类：jellyfish / fat_tree / dummy
    #[arg(long)]
    topology: Option<String>,

    /// 交换机数
    #[arg(long)]
    n: Option<usize>,

    /// 每台交换机端口数
    #[arg(long)]
    k: Option<usize>,

    /// 每台交换机的互联端口数
    #[arg(long)]
    r: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// 路由策略：kshort / ecmp，可带 K 后缀（如 ecmp64）
    #[arg(long)]
    routing: Option<RoutingSpec>,

    /// 每对主机的候选路径上限
    #[arg(long)]
    max_paths: Option<usize>,

    #[arg(long)]
    hash_salt: Option<u64>,

    /// 输出拓扑描述 JSON
    #[arg(long)]
    topo_json: Option<PathBuf>,

    /// 输出路由表 JSON
    #[arg(long)]
    routes_json: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            topology: self.topology.clone(),
            n: self.n,
            k: self.k,
            r: self.r,
            seed: self.seed,
            routing: self.routing,
            max_paths: self.max_paths,
            hash_salt: self.hash_salt,
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => Config::load(path).map_err(Error::from)?,
        None => Config::default(),
    };
    let cfg = args.overrides().apply(base).map_err(Error::from)?;
    info!(config = ?cfg, "配置");

    let router = Router::from_config(&cfg)?;
    let topo = router.topology();
    let table = router.table();

    let reachable = table
        .pairs()
        .into_iter()
        .filter(|&(s, d)| !table.paths(s, d).is_empty())
        .count();
    let total_paths: usize = table
        .pairs()
        .into_iter()
        .map(|(s, d)| table.paths(s, d).len())
        .sum();

    println!(
        "topology kind={} switches={} hosts={} links={}",
        topo.kind,
        topo.switches.len(),
        topo.hosts.len(),
        topo.links.len()
    );
    println!(
        "routing policy={} max_paths={} pairs={} reachable_pairs={} total_paths={}",
        table.policy(),
        table.max_paths(),
        table.len(),
        reachable,
        total_paths
    );

    if let Some(path) = &args.topo_json {
        fs::write(path, serde_json::to_string_pretty(&router.describe())?)?;
        info!(path = %path.display(), "已写出拓扑描述");
    }
    if let Some(path) = &args.routes_json {
        fs::write(path, serde_json::to_string_pretty(&table.describe())?)?;
        info!(path = %path.display(), "已写出路由表");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "构建失败");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
