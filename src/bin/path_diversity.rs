//! 路径多样性实验
//!
//! 在同一张 Jellyfish 拓扑、同一组随机置换流量下，比较各路由策略让每条
//! 交换机互联链路承载的候选路径数。输出 `{label} {rank} {count}`，可直接画图。

use clap::Parser;
use jellyfish_rs::routing::RoutingTable;
use jellyfish_rs::routing::RoutingSpec;
use jellyfish_rs::routing::diversity::{link_path_counts, random_permutation, ranked_counts};
use jellyfish_rs::topo::jellyfish::{JellyfishOpts, build_jellyfish};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "path-diversity", about = "比较 k 最短路与 ECMP 的链路路径数分布")]
struct Args {
    /// 交换机数
    #[arg(long, default_value_t = 686)]
    n: usize,

    /// 每台交换机端口数
    #[arg(long, default_value_t = 7)]
    k: usize,

    /// 互联端口数（缺省 k - 1）
    #[arg(long)]
    r: Option<usize>,

    /// 拓扑种子
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// 流量置换种子
    #[arg(long, default_value_t = 0)]
    traffic_seed: u64,

    /// 参与比较的路由配置，逗号分隔
    #[arg(long, value_delimiter = ',', default_value = "kshort8,ecmp8,ecmp64")]
    routing: Vec<RoutingSpec>,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let opts = JellyfishOpts {
        n: args.n,
        k: args.k,
        r: args.r.unwrap_or_else(|| args.k.saturating_sub(1)),
        seed: args.seed,
    };
    let topo = build_jellyfish(&opts)?;
    let ports = topo.port_map();

    let mut rng = StdRng::seed_from_u64(args.traffic_seed);
    let pairs: Vec<_> = random_permutation(&topo.hosts, &mut rng)
        .into_iter()
        .filter(|(src, dst)| src != dst)
        .collect();
    info!(flows = pairs.len(), "随机置换流量");

    for spec in &args.routing {
        spec.validate()?;
        let table = RoutingTable::build_for_pairs(&topo.graph, &ports, spec.policy, spec.max_paths, &pairs)?;
        let counts = link_path_counts(&topo, &table, &pairs);
        let ranked = ranked_counts(&counts);
        let label = spec.label();
        for (rank, count) in ranked.iter().enumerate() {
            println!("{} {} {}", label, rank, count);
        }
        let idle = ranked.iter().filter(|&&c| c == 0).count();
        let max = ranked.last().copied().unwrap_or(0);
        println!(
            "summary {} links={} idle_links={} max_paths_on_link={}",
            label,
            ranked.len(),
            idle,
            max
        );
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
            error!(error = %e, "实验失败");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
