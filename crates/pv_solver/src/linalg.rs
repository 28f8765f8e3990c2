// crates/pv_solver/src/linalg.rs

//! 稠密线性代数
//!
//! 边界条件方程组的规模为 `(4N-2)²`（N ≤ 20 时至多 78×78），
//! 直接用行主序稠密存储与列主元 LU 分解。
//!
//! 矩阵元素同时含 `exp(-m·h)`（≤ 1）与被钳制的 `exp(+m·h)`，
//! 量级跨度极大。分解前做双侧 L∞ 均衡：
//! 先取行比例 `r_i = 1/max_j|A_ij|`，再对行均衡后的矩阵取列比例
//! `c_j = 1/max_i|A_ij|`，求解 `diag(r)·A·diag(c)·y = diag(r)·b`
//! 后以 `x = diag(c)·y` 还原。残差按未均衡的原系统校验。

use pv_foundation::{PvError, PvResult};

/// 行主序稠密方阵
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// n×n 零矩阵
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// 阶数
    #[inline]
    pub fn order(&self) -> usize {
        self.n
    }

    /// 读取元素
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// 写入元素
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    /// 矩阵-向量乘
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        for (i, out) in y.iter_mut().enumerate().take(self.n) {
            let row = &self.data[i * self.n..(i + 1) * self.n];
            *out = row.iter().zip(x.iter()).map(|(a, b)| a * b).sum();
        }
    }

    /// 所有元素是否有限
    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

/// 一次求解的结果
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// 解向量
    pub x: Vec<f64>,
    /// 对原系统的残差 `‖A·x − b‖∞`
    pub residual: f64,
    /// 由 LU 对角元得到的条件数估计 `max|u_ii|/min|u_ii|`
    pub condition_estimate: f64,
}

/// 双侧均衡 + 列主元 LU 求解 `A·x = b`
pub fn solve_equilibrated(a: &DenseMatrix, b: &[f64]) -> PvResult<SolveOutcome> {
    let n = a.order();
    PvError::check_size("rhs", n, b.len())?;

    // 行比例
    let mut row_scale = vec![1.0; n];
    for i in 0..n {
        let mut max = 0.0f64;
        for j in 0..n {
            max = max.max(a.get(i, j).abs());
        }
        if max == 0.0 {
            return Err(PvError::numerical(format!("第 {i} 行全零，矩阵奇异")));
        }
        row_scale[i] = 1.0 / max;
    }

    // 行均衡后的列比例
    let mut col_scale = vec![1.0; n];
    for j in 0..n {
        let mut max = 0.0f64;
        for i in 0..n {
            max = max.max((a.get(i, j) * row_scale[i]).abs());
        }
        if max == 0.0 {
            return Err(PvError::numerical(format!("第 {j} 列全零，矩阵奇异")));
        }
        col_scale[j] = 1.0 / max;
    }

    // 均衡矩阵与右端
    let mut lu = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            lu[i * n + j] = a.get(i, j) * row_scale[i] * col_scale[j];
        }
    }
    let mut y: Vec<f64> = b.iter().zip(row_scale.iter()).map(|(v, r)| v * r).collect();

    // 列主元 LU（就地），行置换作用于 y
    let mut diag_max = 0.0f64;
    let mut diag_min = f64::INFINITY;
    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_val = lu[k * n + k].abs();
        for i in (k + 1)..n {
            let v = lu[i * n + k].abs();
            if v > pivot_val {
                pivot_val = v;
                pivot_row = i;
            }
        }
        if pivot_val == 0.0 {
            return Err(PvError::numerical(format!("第 {k} 步主元为零，矩阵奇异")));
        }
        if pivot_row != k {
            for j in 0..n {
                lu.swap(k * n + j, pivot_row * n + j);
            }
            y.swap(k, pivot_row);
        }

        let pivot = lu[k * n + k];
        diag_max = diag_max.max(pivot.abs());
        diag_min = diag_min.min(pivot.abs());

        for i in (k + 1)..n {
            let factor = lu[i * n + k] / pivot;
            lu[i * n + k] = factor;
            for j in (k + 1)..n {
                lu[i * n + j] -= factor * lu[k * n + j];
            }
            y[i] -= factor * y[k];
        }
    }

    // 回代
    for k in (0..n).rev() {
        let mut sum = y[k];
        for j in (k + 1)..n {
            sum -= lu[k * n + j] * y[j];
        }
        y[k] = sum / lu[k * n + k];
    }

    // 还原列比例
    let x: Vec<f64> = y.iter().zip(col_scale.iter()).map(|(v, c)| v * c).collect();

    // 对原系统的残差
    let mut ax = vec![0.0; n];
    a.mul_vec(&x, &mut ax);
    let mut residual = 0.0f64;
    for i in 0..n {
        residual = residual.max((ax[i] - b[i]).abs());
    }

    let condition_estimate = if diag_min > 0.0 {
        diag_max / diag_min
    } else {
        f64::INFINITY
    };

    Ok(SolveOutcome {
        x,
        residual,
        condition_estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mat_from(rows: &[&[f64]]) -> DenseMatrix {
        let n = rows.len();
        let mut m = DenseMatrix::zeros(n);
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                m.set(i, j, v);
            }
        }
        m
    }

    #[test]
    fn test_solve_identity() {
        let a = mat_from(&[&[1.0, 0.0], &[0.0, 1.0]]);
        let out = solve_equilibrated(&a, &[3.0, -2.0]).unwrap();
        assert!((out.x[0] - 3.0).abs() < 1e-12);
        assert!((out.x[1] + 2.0).abs() < 1e-12);
        assert!(out.residual < 1e-12);
    }

    #[test]
    fn test_solve_known_3x3() {
        let a = mat_from(&[
            &[2.0, 1.0, -1.0],
            &[-3.0, -1.0, 2.0],
            &[-2.0, 1.0, 2.0],
        ]);
        // 解为 x = (2, 3, -1)
        let out = solve_equilibrated(&a, &[8.0, -11.0, -3.0]).unwrap();
        assert!((out.x[0] - 2.0).abs() < 1e-10);
        assert!((out.x[1] - 3.0).abs() < 1e-10);
        assert!((out.x[2] + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_equilibration_handles_extreme_scales() {
        // 行/列量级相差 1e12 的系统，均衡后仍可稳定求解
        let s = 1.0e12;
        let a = mat_from(&[&[s, 2.0], &[1.0, 1.0e-12]]);
        let b = [s + 4.0, 1.0 + 2.0e-12];
        // 精确解 x = (1, 2)
        let out = solve_equilibrated(&a, &b).unwrap();
        assert!((out.x[0] - 1.0).abs() < 1e-6);
        assert!((out.x[1] - 2.0).abs() < 1e-6);
        assert!(out.residual / s < 1e-9);
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let a = mat_from(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(solve_equilibrated(&a, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_zero_row_rejected() {
        let a = mat_from(&[&[0.0, 0.0], &[1.0, 1.0]]);
        assert!(solve_equilibrated(&a, &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_condition_estimate_grows() {
        let well = mat_from(&[&[2.0, 0.0], &[0.0, 1.0]]);
        let out = solve_equilibrated(&well, &[1.0, 1.0]).unwrap();
        assert!(out.condition_estimate < 10.0);
    }
}
