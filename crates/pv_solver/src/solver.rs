// crates/pv_solver/src/solver.rs

//! 求解策略接口
//!
//! 两种求解策略共享同一接口 `solve_for_m(m) → 层系数`：
//!
//! - [`DirectSolver`]：均衡 + 列主元 LU 直接解完整方程组（生产路径）
//! - [`crate::trmm::TrmmSolver`]：透射/反射矩阵法，元素仅含
//!   `exp(-m·h)`，用于 `m·h` 极端的场合
//!
//! 单个节点的失败不会中止整次计算：调用方记录警告并跳过该节点，
//! 其贡献按零处理（孤立高频节点的贡献在数值上可忽略）。

use crate::kernel::LayerCoeffs;
use crate::linalg::{solve_equilibrated, DenseMatrix};
use crate::system::{assemble, rhs, StackProfile};

/// 一个 Hankel 节点的层系数解
#[derive(Debug, Clone)]
pub struct Coefficients {
    values: Vec<f64>,
    layer_count: usize,
    /// 各层深度基准：核函数以 `z - datum[i]` 进入指数
    /// （直接解法基准为零，即绝对深度约定）
    datum: Vec<f64>,
}

impl Coefficients {
    /// 由完整解向量构造（绝对深度约定）
    pub fn from_values(values: Vec<f64>, layer_count: usize) -> Self {
        Self {
            values,
            layer_count,
            datum: vec![0.0; layer_count],
        }
    }

    /// 由解向量与各层深度基准构造
    pub fn with_datum(values: Vec<f64>, layer_count: usize, datum: Vec<f64>) -> Self {
        Self {
            values,
            layer_count,
            datum,
        }
    }

    /// 第 `i` 层的系数（基座层 C = D = 0）
    pub fn layer(&self, i: usize) -> LayerCoeffs {
        let base = 4 * i;
        if i + 1 == self.layer_count {
            LayerCoeffs {
                a: self.values[base],
                b: self.values[base + 1],
                c: 0.0,
                d: 0.0,
            }
        } else {
            LayerCoeffs {
                a: self.values[base],
                b: self.values[base + 1],
                c: self.values[base + 2],
                d: self.values[base + 3],
            }
        }
    }

    /// 第 `i` 层的深度基准
    #[inline]
    pub fn datum(&self, i: usize) -> f64 {
        self.datum[i]
    }

    /// 全部系数是否有限
    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// 单节点求解失败
#[derive(Debug, Clone, thiserror::Error)]
pub enum NodeFailure {
    /// 矩阵奇异
    #[error("m = {m:.4}: 矩阵奇异 ({detail})")]
    Singular {
        /// 节点值
        m: f64,
        /// 细节
        detail: String,
    },

    /// 残差超限
    #[error("m = {m:.4}: 残差 {residual:.3e} 超过容差 {tolerance:.1e}")]
    ResidualTooLarge {
        /// 节点值
        m: f64,
        /// 实际残差
        residual: f64,
        /// 容差
        tolerance: f64,
    },

    /// 解中出现非有限值
    #[error("m = {m:.4}: 解向量含非有限值")]
    NonFinite {
        /// 节点值
        m: f64,
    },

    /// 层矩阵稳定性检查失败（TRMM）
    #[error("m = {m:.4}: 第 {layer} 层矩阵稳定性检查失败 ({detail})")]
    Unstable {
        /// 节点值
        m: f64,
        /// 层序号
        layer: usize,
        /// 细节
        detail: String,
    },
}

/// 求解策略共享接口
pub trait HankelSolver: Sync {
    /// 求一个 Hankel 参数下的全部层系数
    fn solve_for_m(&self, m: f64) -> Result<Coefficients, NodeFailure>;
}

/// 直接解法：均衡 + 列主元 LU
#[derive(Debug)]
pub struct DirectSolver<'a> {
    profile: &'a StackProfile,
    t_exp: f64,
    residual_tolerance: f64,
    condition_warn: f64,
}

impl<'a> DirectSolver<'a> {
    /// 创建直接解法
    pub fn new(
        profile: &'a StackProfile,
        t_exp: f64,
        residual_tolerance: f64,
        condition_warn: f64,
    ) -> Self {
        Self {
            profile,
            t_exp,
            residual_tolerance,
            condition_warn,
        }
    }

    /// 本节点的装配矩阵（测试用）
    pub fn matrix(&self, m: f64) -> DenseMatrix {
        assemble(self.profile, m, self.t_exp)
    }
}

impl HankelSolver for DirectSolver<'_> {
    fn solve_for_m(&self, m: f64) -> Result<Coefficients, NodeFailure> {
        let mat = assemble(self.profile, m, self.t_exp);
        let b = rhs(self.profile.system_size());

        let outcome = solve_equilibrated(&mat, &b).map_err(|e| NodeFailure::Singular {
            m,
            detail: e.to_string(),
        })?;

        if outcome.residual > self.residual_tolerance {
            return Err(NodeFailure::ResidualTooLarge {
                m,
                residual: outcome.residual,
                tolerance: self.residual_tolerance,
            });
        }
        if !outcome.x.iter().all(|v| v.is_finite()) {
            return Err(NodeFailure::NonFinite { m });
        }
        if outcome.condition_estimate > self.condition_warn {
            tracing::warn!(
                m,
                condition = outcome.condition_estimate,
                "boundary system is poorly conditioned, results may lose accuracy"
            );
        }

        Ok(Coefficients::from_values(
            outcome.x,
            self.profile.layer_count(),
        ))
    }
}
