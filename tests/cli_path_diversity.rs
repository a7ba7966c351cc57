use std::collections::BTreeMap;
use std::process::Command;

fn parse_ranked(stdout: &str) -> BTreeMap<String, Vec<(usize, usize)>> {
    let mut out: BTreeMap<String, Vec<(usize, usize)>> = BTreeMap::new();
    for line in stdout.lines().filter(|l| !l.starts_with("summary ")) {
        let cols: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(cols.len(), 3, "bad line: {line}");
        let rank = cols[1].parse().expect("rank");
        let count = cols[2].parse().expect("count");
        out.entry(cols[0].to_string()).or_default().push((rank, count));
    }
    out
}

#[test]
fn path_diversity_prints_ranked_counts_per_policy() {
    let output = Command::new(env!("CARGO_BIN_EXE_path_diversity"))
        .args(["--n", "20", "--k", "5", "--seed", "3", "--routing", "kshort4,ecmp4"])
        .output()
        .expect("run path_diversity");
    assert!(
        output.status.success(),
        "path_diversity failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let ranked = parse_ranked(&stdout);
    assert_eq!(ranked.keys().cloned().collect::<Vec<_>>(), vec!["ecmp4", "kshort4"]);

    // 同一拓扑，两种策略统计的链路集合相同（20 台交换机，每台至多 4 个互联端口）
    let links = ranked["ecmp4"].len();
    assert!(links > 0 && links <= 40);
    for rows in ranked.values() {
        assert_eq!(rows.len(), links);
        assert!(rows.iter().enumerate().all(|(i, &(rank, _))| rank == i));
        assert!(rows.windows(2).all(|w| w[0].1 <= w[1].1));
    }
    let total = |label: &str| ranked[label].iter().map(|r| r.1).sum::<usize>();
    assert!(total("kshort4") >= total("ecmp4"));

    let summaries = stdout.lines().filter(|l| l.starts_with("summary ")).count();
    assert_eq!(summaries, 2);
}

#[test]
fn path_diversity_is_deterministic() {
    let run = || {
        Command::new(env!("CARGO_BIN_EXE_path_diversity"))
            .args(["--n", "16", "--k", "4", "--traffic-seed", "9", "--routing", "ecmp8"])
            .output()
            .expect("run path_diversity")
    };
    let a = run();
    let b = run();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}
