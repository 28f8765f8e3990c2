// crates/pv_solver/src/engine.rs

//! `Compute` 入口
//!
//! 一次计算的流程：
//!
//! 1. 准入校验（C1）——错误立即返回，警告记录日志并随结果返回；
//! 2. 构建观测方案与 Hankel 积分网格（C2）；
//! 3. 逐节点求解边界条件方程组（C3）并散布响应核（C4），
//!    节点间并行、归约按节点升序串行，结果与线程数无关；
//! 4. 合成轮载组合与界面表（C5），舍入后输出。
//!
//! 半连续界面时整条流水线执行两次（全部半连续界面分别置为连续
//! 与滑动的两个极端），逐点取算术平均。
//!
//! 单节点失败记警告并跳过；全部节点失败、或输出出现非有限值时
//! 整体以 `CalculationFailed` 失败，不产生部分输出。

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use pv_model::{InputError, InterfaceBond, LayerStack, PavementInput};

use crate::integrate::{finalize, node_contribution, ObservationPlan};
use crate::output::{ComputeOutput, DepthPoint, Diagnostics, InterfacePoint, Solicitation};
use crate::quadrature::{HankelGrid, MAX_ITERATION_BUDGET, MIN_ITERATION_BUDGET};
use crate::solver::{DirectSolver, HankelSolver};
use crate::system::{ResolvedBond, StackProfile};
use crate::trmm::TrmmSolver;

/// 求解策略选择
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStrategy {
    /// 均衡 + 列主元 LU 直接解（生产路径）
    #[default]
    Direct,
    /// 透射/反射矩阵法（元素有界的后备路径）
    Trmm,
    /// 按节点自动：`m·H` 超过阈值的节点走 TRMM
    Auto,
}

/// 求解器配置（全 f64，可 JSON 序列化）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Hankel 积分迭代预算 K（分段点上限 K+3）
    #[serde(default = "default_iteration_budget")]
    pub iteration_budget: usize,

    /// 增长指数钳制阈值 T_exp
    #[serde(default = "default_exp_clamp")]
    pub exp_clamp: f64,

    /// TRMM 切换阈值 T_stable（仅 `Auto` 策略使用）
    #[serde(default = "default_trmm_threshold")]
    pub trmm_threshold: f64,

    /// 残差容差 τ_res
    #[serde(default = "default_residual_tolerance")]
    pub residual_tolerance: f64,

    /// 条件数警告阈值 κ_warn
    #[serde(default = "default_condition_warn")]
    pub condition_warn: f64,

    /// 求解策略
    #[serde(default)]
    pub strategy: SolverStrategy,

    /// 是否并行处理积分节点
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_iteration_budget() -> usize {
    40
}
fn default_exp_clamp() -> f64 {
    30.0
}
fn default_trmm_threshold() -> f64 {
    700.0
}
fn default_residual_tolerance() -> f64 {
    1.0e-6
}
fn default_condition_warn() -> f64 {
    1.0e12
}
fn default_parallel() -> bool {
    true
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iteration_budget: default_iteration_budget(),
            exp_clamp: default_exp_clamp(),
            trmm_threshold: default_trmm_threshold(),
            residual_tolerance: default_residual_tolerance(),
            condition_warn: default_condition_warn(),
            strategy: SolverStrategy::default(),
            parallel: default_parallel(),
        }
    }
}

impl SolverConfig {
    /// 配置合法性检查
    pub fn validate(&self) -> Result<(), ComputeError> {
        if !(MIN_ITERATION_BUDGET..=MAX_ITERATION_BUDGET).contains(&self.iteration_budget) {
            return Err(ComputeError::BadConfig(format!(
                "迭代预算 {} 超出 [{MIN_ITERATION_BUDGET}, {MAX_ITERATION_BUDGET}]",
                self.iteration_budget
            )));
        }
        if self.exp_clamp <= 0.0 || !self.exp_clamp.is_finite() {
            return Err(ComputeError::BadConfig("钳制阈值必须为正".into()));
        }
        if self.residual_tolerance <= 0.0 || !self.residual_tolerance.is_finite() {
            return Err(ComputeError::BadConfig("残差容差必须为正".into()));
        }
        if self.trmm_threshold <= 0.0 || !self.trmm_threshold.is_finite() {
            return Err(ComputeError::BadConfig("TRMM 阈值必须为正".into()));
        }
        Ok(())
    }
}

/// `Compute` 的错误
#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    /// 输入准入失败
    #[error("输入校验失败: {0}")]
    InvalidInput(#[from] InputError),

    /// 配置非法
    #[error("配置非法: {0}")]
    BadConfig(String),

    /// 计算失败（奇异矩阵、全部节点失败、非有限输出）
    #[error("计算失败: {detail}")]
    CalculationFailed {
        /// 诊断上下文
        detail: String,
    },
}

/// 半连续界面的极端解析方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SemiResolution {
    /// 全部半连续界面按连续处理
    AsBonded,
    /// 全部半连续界面按滑动处理
    AsUnbonded,
}

fn resolved_profile(stack: &LayerStack, semi: SemiResolution) -> StackProfile {
    let bonds = stack
        .interfaces
        .iter()
        .map(|b| match b {
            InterfaceBond::Bonded => ResolvedBond::Bonded,
            InterfaceBond::Unbonded => ResolvedBond::Unbonded,
            InterfaceBond::SemiBonded => match semi {
                SemiResolution::AsBonded => ResolvedBond::Bonded,
                SemiResolution::AsUnbonded => ResolvedBond::Unbonded,
            },
        })
        .collect();

    let depths = stack.interface_depths();
    StackProfile {
        nu: stack.poisson.clone(),
        young: stack.young_mpa.clone(),
        thickness: stack.thickness_m.clone(),
        depths: depths[1..].to_vec(),
        bonds,
    }
}

struct RunOutcome {
    solicitations: Vec<Solicitation>,
    skipped: usize,
}

/// 多层弹性体系计算入口
///
/// 输入只读；输出一次产生、归调用方所有。同一输入的两次调用
/// 结果逐位一致（节点归约按固定顺序执行）。
pub fn compute(
    input: &PavementInput,
    config: &SolverConfig,
) -> Result<ComputeOutput, ComputeError> {
    let started = Instant::now();
    config.validate()?;

    let warnings = input.check()?;
    for w in &warnings {
        tracing::warn!("input warning: {w}");
    }

    let depths = &input.observations.depths_m;
    let plan = ObservationPlan::new(&input.structure, &input.load, depths);
    let grid = HankelGrid::build(
        input.load.contact_radius_m,
        &plan.offsets,
        config.iteration_budget,
    )
    .map_err(|e| ComputeError::CalculationFailed {
        detail: e.to_string(),
    })?;

    tracing::debug!(
        nodes = grid.len(),
        points = plan.points.len(),
        offsets = plan.offsets.len(),
        "hankel grid built"
    );

    let outcome = if input.structure.has_semi_bonded() {
        tracing::info!("semi-bonded interface present, blending bonded and unbonded runs");
        let bonded = run_resolved(input, config, &plan, &grid, SemiResolution::AsBonded)?;
        let unbonded = run_resolved(input, config, &plan, &grid, SemiResolution::AsUnbonded)?;
        let blended: Vec<Solicitation> = bonded
            .solicitations
            .iter()
            .zip(unbonded.solicitations.iter())
            .map(|(a, b)| Solicitation::blend(a, b))
            .collect();
        RunOutcome {
            solicitations: blended,
            skipped: bonded.skipped + unbonded.skipped,
        }
    } else {
        run_resolved(input, config, &plan, &grid, SemiResolution::AsBonded)?
    };

    for sol in &outcome.solicitations {
        if !sol.all_finite() {
            return Err(ComputeError::CalculationFailed {
                detail: "输出中出现非有限值".into(),
            });
        }
    }

    // 组装输出：前缀为界面表，其后与请求深度一一对应
    let rounded: Vec<Solicitation> = outcome.solicitations.iter().map(|s| s.rounded()).collect();

    let mut interfaces = Vec::with_capacity(plan.interface_count);
    for k in 0..plan.interface_count {
        let (layer, side) = plan.interface_key(k);
        interfaces.push(InterfacePoint {
            layer,
            side,
            depth_m: plan.points[k].z,
            values: rounded[k],
        });
    }

    let points = depths
        .iter()
        .enumerate()
        .map(|(i, &z)| DepthPoint {
            depth_m: z,
            layer: plan.points[plan.interface_count + i].layer,
            values: rounded[plan.interface_count + i],
        })
        .collect();

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(elapsed_ms, "computation finished");

    Ok(ComputeOutput {
        points,
        interfaces,
        diagnostics: Diagnostics {
            node_count: grid.len(),
            skipped_nodes: outcome.skipped,
            elapsed_ms,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        },
    })
}

fn run_resolved(
    input: &PavementInput,
    config: &SolverConfig,
    plan: &ObservationPlan,
    grid: &HankelGrid,
    semi: SemiResolution,
) -> Result<RunOutcome, ComputeError> {
    let profile = resolved_profile(&input.structure, semi);
    let h_total = profile.finite_thickness();
    let a = input.load.contact_radius_m;

    let direct = DirectSolver::new(
        &profile,
        config.exp_clamp,
        config.residual_tolerance,
        config.condition_warn,
    );
    let trmm = TrmmSolver::new(&profile);

    let node = |j: usize| {
        let m = grid.nodes[j];
        let solver: &dyn HankelSolver = match config.strategy {
            SolverStrategy::Direct => &direct,
            SolverStrategy::Trmm => &trmm,
            SolverStrategy::Auto => {
                if m * h_total > config.trmm_threshold {
                    &trmm
                } else {
                    &direct
                }
            }
        };
        node_contribution(solver, plan, &profile, m, grid.weights[j], a, config.exp_clamp)
    };

    let results: Vec<_> = if config.parallel {
        (0..grid.len()).into_par_iter().map(node).collect()
    } else {
        (0..grid.len()).map(node).collect()
    };

    // 归约按节点升序执行，结果与线程数无关
    let mut sums = vec![0.0; plan.slot_count()];
    let mut skipped = 0usize;
    for res in results {
        match res {
            Ok(contribution) => {
                for (s, v) in sums.iter_mut().zip(contribution.iter()) {
                    *s += v;
                }
            }
            Err(failure) => {
                tracing::warn!("skipping hankel node: {failure}");
                skipped += 1;
            }
        }
    }

    if skipped == grid.len() {
        return Err(ComputeError::CalculationFailed {
            detail: format!("全部 {} 个积分节点求解失败", grid.len()),
        });
    }

    Ok(RunOutcome {
        solicitations: finalize(plan, &profile, &input.load, &sums),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_model::{LoadConfig, ObservationSet, Pressure};

    fn scenario_a_input() -> PavementInput {
        PavementInput {
            structure: LayerStack {
                poisson: vec![0.35, 0.35, 0.35],
                young_mpa: vec![5500.0, 600.0, 50.0],
                thickness_m: vec![0.04, 0.15, 1.0e7],
                interfaces: vec![InterfaceBond::Bonded, InterfaceBond::Bonded],
            },
            load: LoadConfig::single(Pressure::KiloPascals(662.0), 0.1125),
            observations: ObservationSet::from_depths(vec![0.0, 0.19]),
        }
    }

    #[test]
    fn test_config_defaults_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_budget_bounds() {
        let cfg = SolverConfig {
            iteration_budget: 10,
            ..SolverConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ComputeError::BadConfig(_))));
        let cfg = SolverConfig {
            iteration_budget: 50,
            ..SolverConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_input_surfaces_immediately() {
        let mut input = scenario_a_input();
        input.structure.poisson[0] = 0.5;
        let err = compute(&input, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput(_)));
    }

    #[test]
    fn test_output_shape() {
        let input = scenario_a_input();
        let out = compute(&input, &SolverConfig::default()).unwrap();
        assert_eq!(out.points.len(), 2);
        assert_eq!(out.interfaces.len(), 5);
        assert_eq!(out.diagnostics.skipped_nodes, 0);
        assert!(out.diagnostics.node_count > 100);
    }

    #[test]
    fn test_serial_equals_parallel() {
        let input = scenario_a_input();
        let serial_cfg = SolverConfig {
            parallel: false,
            ..SolverConfig::default()
        };
        let par = compute(&input, &SolverConfig::default()).unwrap();
        let ser = compute(&input, &serial_cfg).unwrap();
        for (a, b) in par.interfaces.iter().zip(ser.interfaces.iter()) {
            assert_eq!(a.values.sigma_z_mpa.to_bits(), b.values.sigma_z_mpa.to_bits());
            assert_eq!(a.values.eps_z_micro.to_bits(), b.values.eps_z_micro.to_bits());
            assert_eq!(
                a.values.deflection_mm.to_bits(),
                b.values.deflection_mm.to_bits()
            );
        }
    }

    #[test]
    fn test_resolved_profile_expands_semi() {
        let mut stack = scenario_a_input().structure;
        stack.interfaces[1] = InterfaceBond::SemiBonded;
        let bonded = resolved_profile(&stack, SemiResolution::AsBonded);
        let unbonded = resolved_profile(&stack, SemiResolution::AsUnbonded);
        assert_eq!(bonded.bonds[1], ResolvedBond::Bonded);
        assert_eq!(unbonded.bonds[1], ResolvedBond::Unbonded);
        // 非半连续界面不受影响
        assert_eq!(bonded.bonds[0], ResolvedBond::Bonded);
        assert_eq!(unbonded.bonds[0], ResolvedBond::Bonded);
    }

    #[test]
    fn test_profile_depths_are_cumulative() {
        let stack = scenario_a_input().structure;
        let p = resolved_profile(&stack, SemiResolution::AsBonded);
        assert_eq!(p.depths.len(), 2);
        assert!((p.depths[0] - 0.04).abs() < 1e-12);
        assert!((p.depths[1] - 0.19).abs() < 1e-12);
    }
}
