//! 逐跳追踪一条流
//!
//! 从源主机所接的交换机出发，每一跳只用 `resolve` 给出的出端口和链路表找到
//! 下一个节点，直到抵达目的主机。用来人工核对交换机视角的转发与路由表一致。

use clap::Parser;
use jellyfish_rs::config::{Config, ConfigOverrides};
use jellyfish_rs::routing::{FiveTuple, FlowKey, Router, RoutingSpec};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "trace-flow", about = "逐跳打印一条流在交换机上的出端口")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    n: Option<usize>,

    #[arg(long)]
    k: Option<usize>,

    #[arg(long)]
    r: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    routing: Option<RoutingSpec>,

    #[arg(long)]
    hash_salt: Option<u64>,

    /// 源主机名（缺省为第一台主机）
    #[arg(long)]
    src: Option<String>,

    /// 目的主机名（缺省为最后一台主机）
    #[arg(long)]
    dst: Option<String>,

    /// 传输层协议号；给出时与端口一起参与选路哈希
    #[arg(long)]
    proto: Option<u8>,

    #[arg(long, default_value_t = 0)]
    sport: u16,

    #[arg(long, default_value_t = 0)]
    dport: u16,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let cfg = ConfigOverrides {
        n: args.n,
        k: args.k,
        r: args.r,
        seed: args.seed,
        routing: args.routing,
        hash_salt: args.hash_salt,
        ..Default::default()
    }
    .apply(base)?;

    let router = Router::from_config(&cfg)?;
    let topo = router.topology();
    let graph = &topo.graph;

    let pick = |name: &Option<String>, fallback: Option<_>| match name {
        Some(name) => topo
            .node_by_name(name)
            .filter(|&id| graph.is_host(id))
            .ok_or_else(|| format!("unknown host: {}", name)),
        None => fallback.ok_or_else(|| "topology has no hosts".to_string()),
    };
    let src = pick(&args.src, topo.hosts.first().copied())?;
    let dst = pick(&args.dst, topo.hosts.last().copied())?;

    let mut key = FlowKey::new(src, dst);
    if let Some(proto) = args.proto {
        let ip = |id| graph.node(id).and_then(|n| n.ip());
        if let (Some(src_ip), Some(dst_ip)) = (ip(src), ip(dst)) {
            key = key.with_tuple(FiveTuple {
                proto,
                src_ip,
                dst_ip,
                src_port: args.sport,
                dst_port: args.dport,
            });
        }
    }

    let selector = router.selector();
    let path = selector.select_path(&key)?;
    let names: Vec<&str> = path
        .iter()
        .filter_map(|&id| graph.node(id).map(|n| n.name.as_str()))
        .collect();
    println!("path {}", names.join(" -> "));

    let mut current = topo.host_switch(src).ok_or("source host is detached")?;
    // 简单路径的跳数不超过节点数
    for hop in 0..graph.node_count() {
        let port = selector.resolve(&key, current)?;
        let next = topo
            .links
            .iter()
            .find(|l| l.port_at(current) == Some(port))
            .and_then(|l| l.other(current))
            .ok_or("port maps to no link")?;
        let name = |id| graph.node(id).map(|n| n.name.as_str()).unwrap_or("?");
        println!("hop {} {} port {} -> {}", hop, name(current), port, name(next));
        if next == dst {
            info!(hops = hop + 1, "抵达目的主机");
            return Ok(());
        }
        current = next;
    }
    Err("forwarding loop".into())
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
            error!(error = %e, "追踪失败");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
