// crates/pv_solver/src/trmm.rs

//! 透射/反射矩阵法（TRMM）
//!
//! `m·h` 极端增大时，直接装配中的增长指数项全部触发钳制，
//! 方程组退化。本模块提供替代策略：每层以一对 3×3 矩阵
//! `(T_i, R_i)` 表征，矩阵元素只含 `exp(-m·h_eff)`
//! （`h_eff = min(h, 10/m)`），严格有界（≤ 1.5）。
//!
//! 状态向量 `(m²A, mB, τ)` 自表面（钳制后的表面块闭式解
//! `(2ν₀, 1, 0)`）逐层向下透射；各层增长模态被排除
//! （C = D = 0），系数以层顶为深度基准。两种策略在共同适用的
//! 极端区段内给出一致（指数级衰减）的响应。

use crate::solver::{Coefficients, HankelSolver, NodeFailure};
use crate::system::StackProfile;

/// 层矩阵元素量级上限
const STABILITY_BOUND: f64 = 1.5;

/// 层矩阵条件数上限
const CONDITION_BOUND: f64 = 1.0e6;

/// 一层的透射/反射矩阵
#[derive(Debug, Clone)]
pub struct LayerMatrices {
    /// 透射矩阵
    pub t: [[f64; 3]; 3],
    /// 反射矩阵
    pub r: [[f64; 3]; 3],
}

impl LayerMatrices {
    /// 由层参数构造
    ///
    /// 有效厚度 `h_eff = min(h, 10/m)`，保证 `m·h_eff ≤ 10`，
    /// 从而 `exp(-m·h_eff) ≥ e⁻¹⁰` 且全部元素有界。
    pub fn build(e: f64, nu: f64, h: f64, m: f64) -> Self {
        let h_eff = h.min(10.0 / m);
        let mh = m * h_eff;
        let exp_neg = (-mh).exp();

        let lambda = e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let mu = e / (2.0 * (1.0 + nu));
        let c1 = lambda + 2.0 * mu;
        let c2 = lambda;

        let mut t = [[0.0; 3]; 3];
        t[0][0] = exp_neg;
        t[1][1] = exp_neg;
        t[2][2] = exp_neg;
        t[0][1] = (c2 / c1) * (1.0 - exp_neg);
        t[1][0] = (c2 / c1) * (1.0 - exp_neg);
        t[2][1] = mu * h_eff * exp_neg / c1;

        let mut r = [[0.0; 3]; 3];
        r[0][0] = (1.0 - exp_neg) * 0.5;
        r[1][1] = (1.0 - exp_neg) * 0.5;
        r[2][2] = (1.0 - exp_neg) * 0.3;

        Self { t, r }
    }

    /// 元素量级检查
    pub fn is_stable(&self) -> bool {
        for i in 0..3 {
            for j in 0..3 {
                if self.t[i][j].abs() > STABILITY_BOUND || self.r[i][j].abs() > STABILITY_BOUND {
                    return false;
                }
            }
        }
        true
    }

    /// `T + R` 的条件数估计（行范数 / 最小对角元）
    pub fn condition_estimate(&self) -> f64 {
        let mut max_row = 0.0f64;
        let mut min_diag = f64::INFINITY;
        for i in 0..3 {
            let row: f64 = (0..3).map(|j| (self.t[i][j] + self.r[i][j]).abs()).sum();
            max_row = max_row.max(row);
            min_diag = min_diag.min((self.t[i][i] + self.r[i][i]).abs());
        }
        if min_diag < 1.0e-15 {
            return 1.0e15;
        }
        max_row / min_diag
    }

    fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (i, row) in self.t.iter().enumerate() {
            out[i] = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
        }
        out
    }
}

/// TRMM 求解策略
#[derive(Debug)]
pub struct TrmmSolver<'a> {
    profile: &'a StackProfile,
}

impl<'a> TrmmSolver<'a> {
    /// 创建 TRMM 解法
    pub fn new(profile: &'a StackProfile) -> Self {
        Self { profile }
    }
}

impl HankelSolver for TrmmSolver<'_> {
    fn solve_for_m(&self, m: f64) -> Result<Coefficients, NodeFailure> {
        let p = self.profile;
        let n = p.layer_count();

        // 表面块闭式解（增长模态排除后）：(m²A, mB, τ) = (2ν₀, 1, 0)
        let mut state = [2.0 * p.nu[0], 1.0, 0.0];

        let mut values = vec![0.0; 4 * n - 2];
        let mut datum = vec![0.0; n];

        values[0] = state[0] / (m * m);
        values[1] = state[1] / m;

        let mut top = 0.0;
        for i in 0..n - 1 {
            let lm = LayerMatrices::build(p.young[i], p.nu[i], p.thickness[i], m);
            if !lm.is_stable() {
                return Err(NodeFailure::Unstable {
                    m,
                    layer: i,
                    detail: format!("矩阵元素超出 {STABILITY_BOUND}"),
                });
            }
            let cond = lm.condition_estimate();
            if cond > CONDITION_BOUND {
                return Err(NodeFailure::Unstable {
                    m,
                    layer: i,
                    detail: format!("条件数估计 {cond:.2e}"),
                });
            }

            state = lm.apply(state);
            top += p.thickness[i];

            let base = 4 * (i + 1);
            values[base] = state[0] / (m * m);
            values[base + 1] = state[1] / m;
            datum[i + 1] = top;
        }

        if !values.iter().all(|v| v.is_finite()) {
            return Err(NodeFailure::NonFinite { m });
        }

        Ok(Coefficients::with_datum(values, n, datum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::ResolvedBond;

    fn profile() -> StackProfile {
        StackProfile {
            nu: vec![0.35, 0.35],
            young: vec![5000.0, 50.0],
            thickness: vec![0.20, 1.0e7],
            depths: vec![0.20],
            bonds: vec![ResolvedBond::Bonded],
        }
    }

    #[test]
    fn test_layer_matrices_bounded() {
        for &m in &[1.0, 20.0, 1000.0, 1.0e4] {
            let lm = LayerMatrices::build(5000.0, 0.35, 0.2, m);
            assert!(lm.is_stable(), "m = {m}");
            for i in 0..3 {
                for j in 0..3 {
                    assert!(lm.t[i][j].is_finite());
                }
            }
        }
    }

    #[test]
    fn test_platform_thickness_capped() {
        // 半无限层厚度被 10/m 截断，矩阵仍有界
        let lm = LayerMatrices::build(50.0, 0.35, 1.0e7, 20.0);
        assert!(lm.is_stable());
    }

    #[test]
    fn test_trmm_coeffs_finite_at_extreme_m() {
        let p = profile();
        let solver = TrmmSolver::new(&p);
        for &m in &[10.0, 1000.0, 1.0e5] {
            let coeffs = solver.solve_for_m(m).unwrap();
            assert!(coeffs.all_finite(), "m = {m}");
        }
    }

    #[test]
    fn test_trmm_datum_is_layer_top() {
        let p = profile();
        let solver = TrmmSolver::new(&p);
        let coeffs = solver.solve_for_m(100.0).unwrap();
        assert_eq!(coeffs.datum(0), 0.0);
        assert!((coeffs.datum(1) - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_trmm_amplitudes_attenuate_downward() {
        let p = StackProfile {
            nu: vec![0.35, 0.35, 0.35],
            young: vec![5500.0, 600.0, 50.0],
            thickness: vec![0.04, 0.15, 1.0e7],
            depths: vec![0.04, 0.19],
            bonds: vec![ResolvedBond::Bonded, ResolvedBond::Bonded],
        };
        let solver = TrmmSolver::new(&p);
        let m = 50.0;
        let coeffs = solver.solve_for_m(m).unwrap();
        let a0 = coeffs.layer(0).a.abs();
        let a2 = coeffs.layer(2).a.abs();
        assert!(a2 < a0, "透射幅值必须随深度衰减");
    }
}
