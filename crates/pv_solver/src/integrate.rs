// crates/pv_solver/src/integrate.rs

//! 积分累加与荷载合成（C5）
//!
//! 每个 Hankel 节点求解一次层系数，随后把被积函数值散布到全部
//! 观测点与径向偏移的部分和中；节点间相互独立，可并行计算，
//! 归约按节点升序串行执行以保证逐位确定性。
//!
//! 物理量还原：
//!
//! - `σ_z(z,r) = p·a·Σ w_j·fσz·J0(m_j r)·J1(m_j a)`（表面用闭式）
//! - `σ_r = −p·a·(S_r1 − S_r2)`，`σ_θ = −p·a·(S_θ1 + S_θ2)`
//! - 层内弯沉 `−1000·p·a·(1+ν)/E·S_w`，表面 `2000·p·a·(1−ν²)/E·S_w` [mm]
//!
//! 双轮荷载在 `{0, d/2, d}` 三个偏移处求响应并取两种组合
//! （轮轴上 `S(0)+S(d)`、双轮间 `2·S(d/2)`）的临界值；
//! 弯沉报双轮间组合值。

use pv_model::{LayerStack, LoadConfig, WheelKind};

use crate::bessel::{j0, j1, j1_over_x};
use crate::kernel::integrands;
use crate::output::{InterfaceSide, Solicitation};
use crate::quadrature::OFFSET_FLOOR;
use crate::solver::{HankelSolver, NodeFailure};
use crate::system::StackProfile;

/// 每个 (观测点, 偏移) 槽位的部分和分量数
const COMPONENTS: usize = 7;

const S_Z: usize = 0;
const S_R1: usize = 1;
const S_R2: usize = 2;
const S_T1: usize = 3;
const S_T2: usize = 4;
const S_W: usize = 5;
const S_TAU: usize = 6;

/// 一个观测点（层归属 + 深度）
#[derive(Debug, Clone, Copy)]
pub struct EvalPoint {
    /// 所在层
    pub layer: usize,
    /// 深度 [m]
    pub z: f64,
    /// 是否路表点（z = 0，使用表面闭式）
    pub surface: bool,
}

/// 一次运行的观测方案
///
/// 点序：先界面表的 2N-1 个位置（层 0 顶、层 0 底、层 1 顶、…），
/// 再接请求深度。偏移序：轮载偏移在前，曲率参考偏移最后。
#[derive(Debug, Clone)]
pub struct ObservationPlan {
    /// 全部观测点
    pub points: Vec<EvalPoint>,
    /// 全部径向偏移 [m]
    pub offsets: Vec<f64>,
    /// 轮型
    pub wheel: WheelKind,
    /// 界面表长度（points 的前缀）
    pub interface_count: usize,
}

impl ObservationPlan {
    /// 构建观测方案
    pub fn new(stack: &LayerStack, load: &LoadConfig, depths: &[f64]) -> Self {
        let n = stack.layer_count();
        let interface_depths = stack.interface_depths();

        let mut points = Vec::with_capacity(2 * n - 1 + depths.len());
        for i in 0..n {
            let top = interface_depths[i];
            points.push(EvalPoint {
                layer: i,
                z: top,
                surface: i == 0,
            });
            if i < n - 1 {
                points.push(EvalPoint {
                    layer: i,
                    z: interface_depths[i + 1],
                    surface: false,
                });
            }
        }
        let interface_count = points.len();

        for &z in depths {
            points.push(EvalPoint {
                layer: stack.layer_at_depth(z),
                z,
                surface: z == 0.0,
            });
        }

        let a = load.contact_radius_m;
        let d = load.twin_spacing_m;
        let (mut offsets, companion) = match load.wheel {
            WheelKind::Single => (vec![OFFSET_FLOOR], 3.0 * a / 10.0),
            WheelKind::Twin => (
                vec![OFFSET_FLOOR, d / 2.0, d],
                ((d / 2.0) * (d / 2.0) + (a / 2.0) * (a / 2.0)).sqrt(),
            ),
        };
        offsets.push(companion);

        Self {
            points,
            offsets,
            wheel: load.wheel,
            interface_count,
        }
    }

    /// 界面表第 `k` 个位置的 (层, 侧)
    pub fn interface_key(&self, k: usize) -> (usize, InterfaceSide) {
        // 序列为 顶0, 底0, 顶1, 底1, …, 顶(N-1)
        if k % 2 == 0 {
            (k / 2, InterfaceSide::Top)
        } else {
            (k / 2, InterfaceSide::Bottom)
        }
    }

    /// 部分和槽位总数
    pub fn slot_count(&self) -> usize {
        self.points.len() * self.offsets.len() * COMPONENTS
    }

    #[inline]
    fn slot(&self, point: usize, offset: usize) -> usize {
        (point * self.offsets.len() + offset) * COMPONENTS
    }
}

/// 一个节点对全部部分和的贡献
pub(crate) fn node_contribution(
    solver: &dyn HankelSolver,
    plan: &ObservationPlan,
    profile: &StackProfile,
    m: f64,
    weight: f64,
    contact_radius: f64,
    t_exp: f64,
) -> Result<Vec<f64>, NodeFailure> {
    let coeffs = solver.solve_for_m(m)?;

    let j1a = j1(m * contact_radius);
    let twin = plan.wheel == WheelKind::Twin;

    // 偏移相关的 Bessel 因子对各观测点相同，提出循环
    let bessel: Vec<(f64, f64, f64)> = plan
        .offsets
        .iter()
        .map(|&r| {
            let mr = m * r;
            (j0(mr), j1_over_x(mr), j1(mr))
        })
        .collect();

    let mut out = vec![0.0; plan.slot_count()];
    for (pi, point) in plan.points.iter().enumerate() {
        let zeta = point.z - coeffs.datum(point.layer);
        let layer = coeffs.layer(point.layer);
        let k = integrands(&layer, m, zeta, profile.nu[point.layer], t_exp);
        let fw = if point.surface { k.w_surface } else { k.w_interior };

        for (oi, &(j0r, j1x, j1r)) in bessel.iter().enumerate() {
            let base = plan.slot(pi, oi);
            let j0j1 = j0r * j1a;
            out[base + S_Z] += weight * k.sigma_z * j0j1;
            out[base + S_R1] += weight * k.sigma_r1 * j0j1;
            out[base + S_R2] += weight * k.sigma_r2 * j1a * j1x;
            if twin {
                out[base + S_T1] += weight * k.sigma_theta1 * j0j1;
                out[base + S_T2] += weight * k.sigma_theta2 * j1a * j1x;
            }
            out[base + S_W] += weight * fw * j0j1 / m;
            out[base + S_TAU] += weight * k.tau * j1r * j1a;
        }
    }
    Ok(out)
}

/// 单偏移处由部分和还原的原始响应
#[derive(Debug, Clone, Copy, Default)]
struct OffsetResponse {
    sigma_z: f64,
    sigma_r: f64,
    sigma_theta: f64,
    tau: f64,
    w_mm: f64,
}

/// 由累积的部分和合成最终响应
pub(crate) fn finalize(
    plan: &ObservationPlan,
    profile: &StackProfile,
    load: &LoadConfig,
    sums: &[f64],
) -> Vec<Solicitation> {
    let p = load.pressure_mpa();
    let a = load.contact_radius_m;
    let pa = p * a;
    let n_off = plan.offsets.len();
    let companion_col = n_off - 1;

    let mut results = Vec::with_capacity(plan.points.len());
    for (pi, point) in plan.points.iter().enumerate() {
        let nu = profile.nu[point.layer];
        let e = profile.young[point.layer];

        // 各偏移处的原始响应
        let mut cols = vec![OffsetResponse::default(); n_off];
        for (oi, col) in cols.iter_mut().enumerate() {
            let base = plan.slot(pi, oi);
            let r = plan.offsets[oi];

            col.sigma_z = if point.surface {
                surface_sigma_z(p, a, r)
            } else {
                pa * sums[base + S_Z]
            };
            col.sigma_r = -pa * (sums[base + S_R1] - sums[base + S_R2]);
            col.sigma_theta = -pa * (sums[base + S_T1] + sums[base + S_T2]);
            col.tau = pa * sums[base + S_TAU];
            col.w_mm = if point.surface {
                2000.0 * pa * (1.0 - nu * nu) / e * sums[base + S_W]
            } else {
                -1000.0 * pa * (1.0 + nu) / e * sums[base + S_W]
            };
        }

        let sol = match plan.wheel {
            WheelKind::Single => compose_single(&cols, companion_col, nu, e),
            WheelKind::Twin => compose_twin(&cols, companion_col, nu, e),
        };
        results.push(sol);
    }
    results
}

/// 表面竖向应力闭式：荷载圆内为 p，圆周上为 p/2，圆外为 0
fn surface_sigma_z(p: f64, a: f64, r: f64) -> f64 {
    if r < a {
        p
    } else if r == a {
        p / 2.0
    } else {
        0.0
    }
}

fn compose_single(cols: &[OffsetResponse], companion: usize, nu: f64, e: f64) -> Solicitation {
    let axis = cols[0];
    // 轴线上 σ_θ = σ_r（轴对称）
    let sigma_r = axis.sigma_r;
    let sigma_z = axis.sigma_z;
    let eps_z = (sigma_z - 2.0 * nu * sigma_r) * 1.0e6 / e;
    let eps_t = (sigma_r - nu * (sigma_z + sigma_r)) * 1.0e6 / e;

    Solicitation {
        sigma_z_mpa: sigma_z,
        sigma_r_mpa: sigma_r,
        sigma_theta_mpa: sigma_r,
        sigma_t_mpa: sigma_r,
        tau_mpa: axis.tau,
        eps_z_micro: eps_z,
        eps_t_micro: eps_t,
        eps_r_micro: eps_t,
        deflection_mm: axis.w_mm,
        companion_deflection_mm: cols[companion].w_mm,
    }
}

fn compose_twin(cols: &[OffsetResponse], companion: usize, nu: f64, e: f64) -> Solicitation {
    // 组合 1+3：轮轴上，近轮 + 远轮；组合 2×2：双轮间
    let c13 = OffsetResponse {
        sigma_z: cols[0].sigma_z + cols[2].sigma_z,
        sigma_r: cols[0].sigma_r + cols[2].sigma_r,
        sigma_theta: cols[0].sigma_theta + cols[2].sigma_theta,
        tau: cols[0].tau + cols[2].tau,
        w_mm: cols[0].w_mm + cols[2].w_mm,
    };
    let c22 = OffsetResponse {
        sigma_z: 2.0 * cols[1].sigma_z,
        sigma_r: 2.0 * cols[1].sigma_r,
        sigma_theta: 2.0 * cols[1].sigma_theta,
        tau: 2.0 * cols[1].tau,
        w_mm: 2.0 * cols[1].w_mm,
    };

    let strain = |c: &OffsetResponse| {
        let eps_z = (c.sigma_z - nu * (c.sigma_r + c.sigma_theta)) * 1.0e6 / e;
        let eps_r = (c.sigma_r - nu * (c.sigma_z + c.sigma_theta)) * 1.0e6 / e;
        let eps_theta = (c.sigma_theta - nu * (c.sigma_z + c.sigma_r)) * 1.0e6 / e;
        (eps_z, eps_r, eps_theta)
    };
    let (ez13, er13, et13) = strain(&c13);
    let (ez22, er22, et22) = strain(&c22);

    let sigma_r = c13.sigma_r.min(c22.sigma_r);
    let sigma_theta = c13.sigma_theta.min(c22.sigma_theta);

    Solicitation {
        sigma_z_mpa: c13.sigma_z.max(c22.sigma_z),
        sigma_r_mpa: sigma_r,
        sigma_theta_mpa: sigma_theta,
        sigma_t_mpa: sigma_r.min(sigma_theta),
        tau_mpa: c13.tau,
        eps_z_micro: ez13.max(ez22),
        eps_t_micro: er13.min(er22).min(et13).min(et22),
        eps_r_micro: er13,
        deflection_mm: c22.w_mm,
        companion_deflection_mm: 2.0 * cols[companion].w_mm,
    }
}
