//! Jellyfish 拓扑构建
//!
//! `n` 台交换机，每台 `k` 个端口：`k - r` 个接主机，`r` 个随机互联。
//!
//! 合成分三步：
//! 1. 在仍有空闲端口、且尚未相邻的交换机对中均匀随机地连边，直到无合法对；
//! 2. 修补：剩余空闲端口 >= 2 的交换机 `s` 拆掉一条与其不相邻的边 `(x, y)`，
//!    改连 `(s, x)`、`(s, y)`；
//! 3. 剩余只差一个端口的交换机两两配对，拆边 `(u, v)` 改连 `(x, u)`、`(y, v)`。
//! 4. 交换机子图若不连通，在两个分量间交换边：拆掉 `C1` 中不是桥的 `(a, b)` 与
//!    `C2` 中的 `(c, d)`，改连 `(a, c)`、`(b, d)`。度数不变，分量数每轮减一。
//!    `r <= 1` 时连通无法实现，只记录告警。
//!
//! 随机性只来自调用方传入的 RNG；相同 `(n, k, r, seed)` 得到逐字节相同的拓扑，
//! 控制面与仿真侧必须依赖这一点保持一致。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info, warn};

use super::{Topology, TopologyKind};
use crate::error::ConfigError;
use crate::net::{Graph, MAX_HOSTS, NodeId};

/// 拒绝采样的尝试次数，超过后改为枚举全部合法交换机对
const PAIR_SAMPLE_ATTEMPTS: usize = 64;

/// Jellyfish 拓扑配置选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfishOpts {
    /// 交换机数
    pub n: usize,
    /// 每台交换机端口数
    pub k: usize,
    /// 每台交换机用于互联的端口数
    pub r: usize,
    pub seed: u64,
}

impl Default for JellyfishOpts {
    fn default() -> Self {
        Self {
            n: 4,
            k: 3,
            r: 2,
            seed: 0,
        }
    }
}

impl JellyfishOpts {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 {
            return Err(ConfigError::NoSwitches);
        }
        if self.k == 0 || self.k > u16::MAX as usize {
            return Err(ConfigError::PortCount(self.k));
        }
        if self.r >= self.k {
            return Err(ConfigError::InvalidPorts {
                k: self.k,
                r: self.r,
            });
        }
        let hosts = self.n.checked_mul(self.hosts_per_switch()).unwrap_or(usize::MAX);
        if hosts > MAX_HOSTS {
            return Err(ConfigError::TooManyHosts(hosts));
        }
        Ok(())
    }

    /// 每台交换机挂接的主机数
    pub fn hosts_per_switch(&self) -> usize {
        self.k - self.r
    }
}

/// 用 `opts.seed` 播种的独立 RNG 构建拓扑
pub fn build_jellyfish(opts: &JellyfishOpts) -> Result<Topology, ConfigError> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    build_jellyfish_with_rng(opts, &mut rng)
}

/// 使用调用方提供的 RNG 构建拓扑（`opts.seed` 被忽略）
#[tracing::instrument(skip(rng), fields(n = opts.n, k = opts.k, r = opts.r))]
pub fn build_jellyfish_with_rng<R: Rng + ?Sized>(
    opts: &JellyfishOpts,
    rng: &mut R,
) -> Result<Topology, ConfigError> {
    opts.validate()?;

    let mut graph = Graph::new();
    let mut switches = Vec::with_capacity(opts.n);
    for i in 0..opts.n {
        let s = graph.add_switch(format!("s{}", i));
        for j in 0..opts.hosts_per_switch() {
            let h = graph.add_host(format!("h{}_{}", i, j));
            graph.add_edge(h, s);
        }
        switches.push(s);
    }

    let mut synth = Synth {
        graph,
        switches,
        budget: vec![opts.r; opts.n],
        stuck: BTreeSet::new(),
        r: opts.r,
    };
    synth.connect_random_pairs(rng);
    synth.repair_deficient(rng);
    synth.pair_leftovers(rng);
    synth.connect_components(rng);

    for (i, &s) in synth.switches.iter().enumerate() {
        if synth.budget[i] > 0 {
            warn!(
                switch = ?s,
                free_ports = synth.budget[i],
                "交换机端口未用满"
            );
        }
    }

    let topo = Topology::finalize(TopologyKind::Jellyfish, synth.graph);
    info!(
        switches = topo.switches.len(),
        hosts = topo.hosts.len(),
        links = topo.links.len(),
        "jellyfish 拓扑构建完成"
    );
    Ok(topo)
}

/// 合成过程中的可变状态；`budget[i]` 是 `switches[i]` 剩余的互联端口数
struct Synth {
    graph: Graph,
    switches: Vec<NodeId>,
    budget: Vec<usize>,
    /// 无法修补的交换机下标
    stuck: BTreeSet<usize>,
    r: usize,
}

impl Synth {
    fn connect(&mut self, i: usize, j: usize) {
        self.graph.add_edge(self.switches[i], self.switches[j]);
        self.budget[i] -= 1;
        self.budget[j] -= 1;
    }

    /// 步骤 1：均匀随机连接合法交换机对
    fn connect_random_pairs<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        loop {
            let avail: Vec<usize> = (0..self.switches.len())
                .filter(|&i| self.budget[i] > 0)
                .collect();
            if avail.len() < 2 {
                break;
            }
            let pick = self
                .sample_pair(&avail, rng)
                .or_else(|| self.enumerate_pair(&avail, rng));
            let Some((i, j)) = pick else {
                break;
            };
            self.connect(i, j);
        }
        debug!(links = self.graph.switch_edges().count(), "随机连边结束");
    }

    /// 拒绝采样：有序对在 `avail²` 上均匀，命中自身或已相邻则重采
    fn sample_pair<R: Rng + ?Sized>(&self, avail: &[usize], rng: &mut R) -> Option<(usize, usize)> {
        for _ in 0..PAIR_SAMPLE_ATTEMPTS {
            let i = avail[rng.gen_range(0..avail.len())];
            let j = avail[rng.gen_range(0..avail.len())];
            if i != j && !self.graph.has_edge(self.switches[i], self.switches[j]) {
                return Some((i.min(j), i.max(j)));
            }
        }
        None
    }

    /// 枚举全部合法对并均匀选取一个
    fn enumerate_pair<R: Rng + ?Sized>(&self, avail: &[usize], rng: &mut R) -> Option<(usize, usize)> {
        let mut pairs = Vec::new();
        for (idx, &i) in avail.iter().enumerate() {
            for &j in &avail[idx + 1..] {
                if !self.graph.has_edge(self.switches[i], self.switches[j]) {
                    pairs.push((i, j));
                }
            }
        }
        if pairs.is_empty() {
            return None;
        }
        Some(pairs[rng.gen_range(0..pairs.len())])
    }

    /// 步骤 2：消除剩余端口 >= 2 的交换机
    fn repair_deficient<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        loop {
            let Some(si) = (0..self.switches.len())
                .find(|&i| self.budget[i] >= 2 && !self.stuck.contains(&i))
            else {
                break;
            };
            let s = self.switches[si];
            let candidates: Vec<(NodeId, NodeId)> = self
                .graph
                .switch_edges()
                .filter(|&(x, y)| {
                    x != s
                        && y != s
                        && !self.graph.has_edge(s, x)
                        && !self.graph.has_edge(s, y)
                })
                .collect();
            if candidates.is_empty() {
                warn!(switch = ?s, free_ports = self.budget[si], "找不到可拆分的链路");
                self.stuck.insert(si);
                continue;
            }
            let (x, y) = candidates[rng.gen_range(0..candidates.len())];
            self.graph.remove_edge(x, y);
            self.graph.add_edge(s, x);
            self.graph.add_edge(s, y);
            self.budget[si] -= 2;
            debug!(switch = ?s, removed = ?(x, y), "拆边修补");
        }
    }

    /// 步骤 3：剩余 1 个端口的交换机两两配对修补
    fn pair_leftovers<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        loop {
            let left: Vec<usize> = (0..self.switches.len())
                .filter(|&i| self.budget[i] == 1 && !self.stuck.contains(&i))
                .collect();
            if left.len() < 2 {
                break;
            }
            let xi = left[0];
            let x = self.switches[xi];
            let mut spliced = false;
            for &yi in &left[1..] {
                let y = self.switches[yi];
                if !self.graph.has_edge(x, y) {
                    self.connect(xi, yi);
                    spliced = true;
                    break;
                }
                let candidates = self.splice_candidates(x, y);
                if candidates.is_empty() {
                    continue;
                }
                let (u, v) = candidates[rng.gen_range(0..candidates.len())];
                self.graph.remove_edge(u, v);
                self.graph.add_edge(x, u);
                self.graph.add_edge(y, v);
                self.budget[xi] -= 1;
                self.budget[yi] -= 1;
                debug!(pair = ?(x, y), removed = ?(u, v), "配对修补");
                spliced = true;
                break;
            }
            if !spliced {
                self.stuck.insert(xi);
            }
        }
    }

    /// 可拆分为 `(x, u)`、`(y, v)` 的有向边 `(u, v)`
    fn splice_candidates(&self, x: NodeId, y: NodeId) -> Vec<(NodeId, NodeId)> {
        let ok = |u: NodeId, v: NodeId| {
            u != x
                && u != y
                && v != x
                && v != y
                && !self.graph.has_edge(x, u)
                && !self.graph.has_edge(y, v)
        };
        let mut out = Vec::new();
        for (p, q) in self.graph.switch_edges() {
            if ok(p, q) {
                out.push((p, q));
            }
            if ok(q, p) {
                out.push((q, p));
            }
        }
        out
    }

    /// 步骤 4：跨分量交换边，直到交换机子图连通
    fn connect_components<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        loop {
            let comp_of = self.switch_components();
            let count = comp_of.iter().flatten().max().map_or(0, |&c| c + 1);
            if count <= 1 {
                return;
            }
            let edges_in = |c: usize| -> Vec<(NodeId, NodeId)> {
                self.graph
                    .switch_edges()
                    .filter(|&(x, _)| comp_of[x.0] == Some(c))
                    .collect()
            };

            let mut pick = None;
            for c1 in 0..count {
                let cyclic: Vec<_> = edges_in(c1)
                    .into_iter()
                    .filter(|&(a, b)| !self.is_bridge(a, b))
                    .collect();
                if cyclic.is_empty() {
                    continue;
                }
                let other = (0..count)
                    .filter(|&c| c != c1)
                    .map(&edges_in)
                    .find(|edges| !edges.is_empty());
                if let Some(other) = other {
                    pick = Some((cyclic, other));
                    break;
                }
            }
            let Some((cyclic, other)) = pick else {
                warn!(components = count, r = self.r, "交换机子图不连通，无法在保持度数的前提下修补");
                return;
            };

            let (a, b) = cyclic[rng.gen_range(0..cyclic.len())];
            let (mut c, mut d) = other[rng.gen_range(0..other.len())];
            if rng.gen_range(0..2) == 1 {
                std::mem::swap(&mut c, &mut d);
            }
            self.graph.remove_edge(a, b);
            self.graph.remove_edge(c, d);
            self.graph.add_edge(a, c);
            self.graph.add_edge(b, d);
            debug!(components = count, removed = ?((a, b), (c, d)), "跨分量交换边");
        }
    }

    /// 按节点 id 索引的交换机分量编号；主机为 `None`。分量按最小交换机 id 编号。
    fn switch_components(&self) -> Vec<Option<usize>> {
        let mut comp_of = vec![None; self.graph.node_count()];
        let mut next = 0;
        for &s in &self.switches {
            if comp_of[s.0].is_some() {
                continue;
            }
            comp_of[s.0] = Some(next);
            let mut q = VecDeque::from([s]);
            while let Some(v) = q.pop_front() {
                for nb in self.graph.neighbors(v) {
                    if self.graph.is_switch(nb) && comp_of[nb.0].is_none() {
                        comp_of[nb.0] = Some(next);
                        q.push_back(nb);
                    }
                }
            }
            next += 1;
        }
        comp_of
    }

    /// 去掉 `(a, b)` 后 `a` 是否无法到达 `b`
    fn is_bridge(&self, a: NodeId, b: NodeId) -> bool {
        let mut seen = BTreeSet::from([a]);
        let mut q = VecDeque::from([a]);
        while let Some(v) = q.pop_front() {
            for nb in self.graph.neighbors(v) {
                if (v, nb) == (a, b) || !self.graph.is_switch(nb) {
                    continue;
                }
                if nb == b {
                    return false;
                }
                if seen.insert(nb) {
                    q.push_back(nb);
                }
            }
        }
        true
    }
}
