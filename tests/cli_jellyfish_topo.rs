use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn run_topo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jellyfish_topo"))
        .args(args)
        .output()
        .expect("run jellyfish_topo")
}

fn line_with<'a>(stdout: &'a str, prefix: &str) -> &'a str {
    stdout
        .lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("missing `{prefix}` line in {stdout}"))
}

#[test]
fn jellyfish_topo_prints_summary_and_writes_json() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let topo_json = dir.path().join("topo.json");
    let routes_json = dir.path().join("routes.json");

    let output = run_topo(&[
        "--n",
        "4",
        "--k",
        "3",
        "--r",
        "2",
        "--seed",
        "0",
        "--routing",
        "ecmp8",
        "--topo-json",
        topo_json.to_str().unwrap(),
        "--routes-json",
        routes_json.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "jellyfish_topo failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        line_with(&stdout, "topology "),
        "topology kind=jellyfish switches=4 hosts=4 links=8"
    );
    let routing = line_with(&stdout, "routing ");
    assert!(routing.starts_with("routing policy=ecmp max_paths=8 pairs=12 reachable_pairs=12"));

    let raw = fs::read_to_string(&topo_json).expect("read topo.json");
    let v: Value = serde_json::from_str(&raw).expect("parse topo.json");
    assert_eq!(v["kind"], "jellyfish");
    let nodes = v["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes.len(), 8);
    let hosts: Vec<&Value> = nodes.iter().filter(|n| n["kind"] == "host").collect();
    assert_eq!(hosts.len(), 4);
    assert!(hosts.iter().all(|h| !h["mac"].is_null() && h["ip"].is_string()));
    assert_eq!(v["links"].as_array().map(Vec::len), Some(8));

    let raw = fs::read_to_string(&routes_json).expect("read routes.json");
    let v: Value = serde_json::from_str(&raw).expect("parse routes.json");
    assert_eq!(v["policy"], "ecmp");
    assert_eq!(v["max_paths"], 8);
    assert_eq!(v["routes"].as_array().map(Vec::len), Some(12));
}

#[test]
fn jellyfish_topo_is_deterministic() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    for out in [&a, &b] {
        let output = run_topo(&[
            "--n",
            "12",
            "--k",
            "5",
            "--seed",
            "7",
            "--topo-json",
            out.to_str().unwrap(),
        ]);
        assert!(output.status.success());
    }
    assert_eq!(
        fs::read_to_string(&a).expect("read a"),
        fs::read_to_string(&b).expect("read b")
    );
}

#[test]
fn jellyfish_topo_reads_key_value_config() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let cfg = write_file(dir.path(), "jf.conf", "n=6\nk=4\nr=3\nseed=1\nrouting=kshort2\n");

    let output = run_topo(&["--config", cfg.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(line_with(&stdout, "topology ").contains("switches=6 hosts=6"));
    assert!(line_with(&stdout, "routing ").contains("policy=kshort max_paths=2"));

    // 命令行覆盖配置文件
    let output = run_topo(&["--config", cfg.to_str().unwrap(), "--routing", "ecmp4"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(line_with(&stdout, "routing ").contains("policy=ecmp max_paths=4"));
}

#[test]
fn jellyfish_topo_exits_nonzero_on_bad_port_split() {
    let output = run_topo(&["--n", "4", "--k", "3", "--r", "3"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("r=3 must be < k=3"), "stderr={stderr}");
}

#[test]
fn jellyfish_topo_rejects_unknown_policy() {
    let output = run_topo(&["--routing", "spf"]);
    assert!(!output.status.success());
}
