// crates/pv_solver/src/system.rs

//! 边界条件方程组装配（C3）
//!
//! 对一个 Hankel 参数 `m`，装配确定各层系数的线性方程组。
//! 未知量：非基座层 i 的 `(A_i, B_i, C_i, D_i)`，基座层只有
//! `(A, B)`（无穷远辐射条件排除增长指数模态），共 `4N - 2` 个。
//!
//! 方程：
//! - 表面 (z=0) 2 个：变换域竖向正应力等于单位荷载、剪应力为零；
//! - 每个非基座界面 4 个连续性方程，界面状态决定组合：
//!   连续界面取 `σ_z, u_z, τ_rz, u_r` 全连续，
//!   滑动界面取 `σ_z, u_z` 连续且两侧 `τ_rz = 0`。
//!
//! 所有指数项使用绝对界面深度 `H_j`。`m·H_j > T_exp` 时，
//! 携带 `exp(+m·H_j)` 的元素直接置零：这些项本应比其余元素大
//! 10¹³ 个量级以上，双精度下产生灾难性相消，而其对最终被积函数的
//! 贡献按 `exp(-m·(2H-z))` 衰减，可忽略。

use crate::linalg::DenseMatrix;

/// 界面状态在装配中的解析形式
///
/// 半连续界面在进入装配前已展开为两种极端情形，此处只剩两态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBond {
    /// 全连续
    Bonded,
    /// 滑动
    Unbonded,
}

/// 一次求解运行的层体剖面（界面状态已解析）
#[derive(Debug, Clone)]
pub struct StackProfile {
    /// 各层泊松比
    pub nu: Vec<f64>,
    /// 各层模量 [MPa]
    pub young: Vec<f64>,
    /// 各层厚度 [m]（基座层为占位值）
    pub thickness: Vec<f64>,
    /// 界面绝对深度 [m]，长度 N-1（`depths[j]` 为第 j 个界面）
    pub depths: Vec<f64>,
    /// 解析后的界面状态，长度 N-1
    pub bonds: Vec<ResolvedBond>,
}

impl StackProfile {
    /// 层数
    pub fn layer_count(&self) -> usize {
        self.nu.len()
    }

    /// 方程组阶数 `4N - 2`
    pub fn system_size(&self) -> usize {
        4 * self.layer_count() - 2
    }

    /// 有限层总厚度 [m]
    pub fn finite_thickness(&self) -> f64 {
        self.depths.last().copied().unwrap_or(0.0)
    }
}

/// 一对界面指数：`exp(-m·h)` 与钳制后的 `exp(+m·h)`
#[inline]
fn exp_pair(m: f64, h: f64, t_exp: f64) -> (f64, f64) {
    let em = (-m * h).exp();
    let ep = if m * h > t_exp { 0.0 } else { (m * h).exp() };
    (em, ep)
}

/// 一侧界面块的 4 个连续性行（σ_z、u_z、τ_rz、u_r），列序 (A, B, C, D)
#[inline]
fn continuity_rows(m: f64, h: f64, nu: f64, e: f64, em: f64, ep: f64) -> [[f64; 4]; 4] {
    let mh = m * h;
    let phi = (1.0 + nu) / e;
    [
        // σ_z
        [
            m * m * em,
            m * (1.0 - 2.0 * nu + mh) * em,
            m * m * ep,
            -m * (1.0 - 2.0 * nu - mh) * ep,
        ],
        // u_z（含 (1+ν)/E 因子）
        [
            m * m * phi * em,
            m * (2.0 - 4.0 * nu + mh) * phi * em,
            -m * m * phi * ep,
            m * (2.0 - 4.0 * nu - mh) * phi * ep,
        ],
        // τ_rz
        [
            -m * m * em,
            m * (2.0 * nu - mh) * em,
            m * m * ep,
            m * (2.0 * nu + mh) * ep,
        ],
        // u_r（含 (1+ν)/E 因子）
        [
            m * m * phi * em,
            -m * (1.0 - mh) * phi * em,
            m * m * phi * ep,
            m * (1.0 + mh) * phi * ep,
        ],
    ]
}

const ZERO_ROW: [f64; 4] = [0.0; 4];

/// 装配 `(4N-2)²` 边界条件矩阵
pub fn assemble(profile: &StackProfile, m: f64, t_exp: f64) -> DenseMatrix {
    let n = profile.layer_count();
    let k = profile.system_size();
    let mut mat = DenseMatrix::zeros(k);

    // 表面条件（z = 0，指数全为 1）
    let nu0 = profile.nu[0];
    mat.set(0, 0, m * m);
    mat.set(0, 1, m * (1.0 - 2.0 * nu0));
    mat.set(0, 2, m * m);
    mat.set(0, 3, -m * (1.0 - 2.0 * nu0));
    mat.set(1, 0, -m * m);
    mat.set(1, 1, 2.0 * m * nu0);
    mat.set(1, 2, m * m);
    mat.set(1, 3, 2.0 * m * nu0);

    // 界面块
    for j in 0..n - 1 {
        let h = profile.depths[j];
        let (em, ep) = exp_pair(m, h, t_exp);
        let upper = continuity_rows(m, h, profile.nu[j], profile.young[j], em, ep);
        let lower = continuity_rows(m, h, profile.nu[j + 1], profile.young[j + 1], em, ep);

        // 连续界面：σ_z, u_z, τ, u_r；滑动界面：σ_z, u_z, τ_上=0, τ_下=0
        let (upper_rows, lower_rows) = match profile.bonds[j] {
            ResolvedBond::Bonded => (
                [upper[0], upper[1], upper[2], upper[3]],
                [lower[0], lower[1], lower[2], lower[3]],
            ),
            ResolvedBond::Unbonded => (
                [upper[0], upper[1], upper[2], ZERO_ROW],
                [lower[0], lower[1], ZERO_ROW, lower[2]],
            ),
        };

        let base_row = 2 + 4 * j;
        let upper_col = 4 * j;
        let lower_col = 4 * (j + 1);
        // 基座层只有 (A, B) 两列，即指数衰减列
        let lower_width = if j + 1 == n - 1 { 2 } else { 4 };

        for (r, (u_row, l_row)) in upper_rows.iter().zip(lower_rows.iter()).enumerate() {
            for (c, &v) in u_row.iter().enumerate() {
                mat.set(base_row + r, upper_col + c, v);
            }
            for (c, &v) in l_row.iter().take(lower_width).enumerate() {
                mat.set(base_row + r, lower_col + c, -v);
            }
        }
    }

    mat
}

/// 右端向量：除表面正应力行为 1 外全零
pub fn rhs(size: usize) -> Vec<f64> {
    let mut b = vec![0.0; size];
    b[0] = 1.0;
    b
}
