// crates/pv_solver/src/quadrature.rs

//! Hankel 积分网格（C2）
//!
//! 径向被积函数含乘积 `J1(m·a)·J0(m·r)`，其零点在原点附近密集。
//! 将积分分段点锚定在这些零点上（分段点集
//! `{0} ∪ {j0_n/r_k} ∪ {j1_n/a}`），对光滑乘子可获得近谱收敛。
//!
//! 前两个分段再细分（步长分别为 `(b1-b0)/6 - ε` 与 `(b2-b1)/2 - ε`，
//! `ε = 1e-5`）以分辨近原点振荡；自 `b3` 起直接使用相邻分段点。
//! 每个子区间内放置固定的 4 点 Gauss-Legendre 节点。
//!
//! 观测偏移恰为 0 时以 1e-6 代替，避免切向应力核中的 1/r 奇异。

use pv_foundation::{PvError, PvResult};

use crate::bessel::{J0_ZEROS, J1_ZEROS};

/// 4 点 Gauss-Legendre 标准节点
pub const GAUSS_POINTS_4: [f64; 4] = [-0.86114, -0.33998, 0.33998, 0.86114];

/// 4 点 Gauss-Legendre 权重
pub const GAUSS_WEIGHTS_4: [f64; 4] = [0.34786, 0.65215, 0.65215, 0.34786];

/// 观测偏移下限（r = 0 的替代值）[m]
pub const OFFSET_FLOOR: f64 = 1.0e-6;

/// 细分步长的保护量
const SUBDIVISION_EPS: f64 = 1.0e-5;

/// 迭代预算下限
pub const MIN_ITERATION_BUDGET: usize = 25;

/// 迭代预算上限
pub const MAX_ITERATION_BUDGET: usize = 50;

/// 积分节点与权重，按 `m` 升序
#[derive(Debug, Clone)]
pub struct HankelGrid {
    /// 节点 `m_j`
    pub nodes: Vec<f64>,
    /// 权重 `w_j`
    pub weights: Vec<f64>,
}

impl HankelGrid {
    /// 节点数
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 构建积分网格
    ///
    /// - `contact_radius`: 荷载接触半径 a [m]
    /// - `offsets`: 全部径向观测偏移 [m]（0 以 1e-6 代替）
    /// - `budget`: 迭代预算 K（分段点数上限为 K + 3）
    pub fn build(contact_radius: f64, offsets: &[f64], budget: usize) -> PvResult<Self> {
        if contact_radius <= 0.0 {
            return Err(PvError::invalid_input("接触半径必须为正"));
        }

        // 分段点集：{0} ∪ {j0_n/r_k} ∪ {j1_n/a}
        let mut breaks: Vec<f64> = Vec::with_capacity(1 + offsets.len() * J0_ZEROS.len() + J1_ZEROS.len());
        breaks.push(0.0);
        for &r in offsets {
            let r = if r == 0.0 { OFFSET_FLOOR } else { r };
            for &z in J0_ZEROS.iter() {
                breaks.push(z / r);
            }
        }
        for &z in J1_ZEROS.iter() {
            breaks.push(z / contact_radius);
        }

        breaks.sort_by(f64::total_cmp);
        breaks.dedup();
        breaks.truncate(budget + 3);

        if breaks.len() < 3 {
            return Err(PvError::numerical("Hankel 分段点不足（< 3）"));
        }

        // 子区间端点序列：前两个分段细分，之后直接取分段点
        let d1 = (breaks[1] - breaks[0]) / 6.0 - SUBDIVISION_EPS;
        let d2 = (breaks[2] - breaks[1]) / 2.0 - SUBDIVISION_EPS;
        if d1 <= 0.0 || d2 <= 0.0 {
            return Err(PvError::numerical("Hankel 分段过窄，无法细分"));
        }

        let mut edges: Vec<f64> = Vec::new();
        let mut v = breaks[0];
        while v < breaks[1] {
            edges.push(v);
            v += d1;
        }
        let mut v = breaks[1] + d2;
        while v < breaks[2] {
            edges.push(v);
            v += d2;
        }
        edges.extend_from_slice(&breaks[3..]);

        // 每个相邻端点对内放置 4 个 Gauss-Legendre 节点
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity((edges.len() - 1) * 4);
        for win in edges.windows(2) {
            let half = (win[1] - win[0]) / 2.0;
            let mid = win[0] + half;
            for (gp, gw) in GAUSS_POINTS_4.iter().zip(GAUSS_WEIGHTS_4.iter()) {
                pairs.push((mid + gp * half, gw * half));
            }
        }

        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (nodes, weights) = pairs.into_iter().unzip();
        Ok(Self { nodes, weights })
    }
}
