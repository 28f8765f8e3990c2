// crates/pv_solver/src/output.rs

//! 计算输出类型
//!
//! 每个观测点给出：竖向/径向/切向应力 [MPa]、双轮临界水平应力
//! `σ_t = min(σ_r, σ_θ)`、剪应力 [MPa]、竖向与临界水平应变 [µε]、
//! 竖向弯沉 [mm] 及曲率参考偏移处的伴随弯沉。
//!
//! 界面值额外以 `(层序号, 顶/底)` 为键给出。输出一经产生即不可变，
//! 归调用方所有。

use serde::Serialize;

use pv_foundation::round_to;

/// 一个观测点的全部响应分量
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Solicitation {
    /// 竖向正应力 [MPa]
    pub sigma_z_mpa: f64,
    /// 径向应力 [MPa]（双轮为两组合中的临界值）
    pub sigma_r_mpa: f64,
    /// 切向应力 [MPa]（双轮为两组合中的临界值）
    pub sigma_theta_mpa: f64,
    /// 临界水平应力 [MPa]：双轮取 min(σ_r, σ_θ)，单轮即 σ_r
    pub sigma_t_mpa: f64,
    /// 剪应力 [MPa]（轴线上恒为零）
    pub tau_mpa: f64,
    /// 竖向应变 [µε]
    pub eps_z_micro: f64,
    /// 临界水平应变 [µε]
    pub eps_t_micro: f64,
    /// 径向应变 [µε]
    pub eps_r_micro: f64,
    /// 竖向弯沉 [mm]
    pub deflection_mm: f64,
    /// 曲率参考偏移处的弯沉 [mm]
    pub companion_deflection_mm: f64,
}

impl Solicitation {
    /// 两次运行的逐分量算术平均（半连续界面的 50/50 合成）
    pub fn blend(a: &Self, b: &Self) -> Self {
        Self {
            sigma_z_mpa: (a.sigma_z_mpa + b.sigma_z_mpa) / 2.0,
            sigma_r_mpa: (a.sigma_r_mpa + b.sigma_r_mpa) / 2.0,
            sigma_theta_mpa: (a.sigma_theta_mpa + b.sigma_theta_mpa) / 2.0,
            sigma_t_mpa: (a.sigma_t_mpa + b.sigma_t_mpa) / 2.0,
            tau_mpa: (a.tau_mpa + b.tau_mpa) / 2.0,
            eps_z_micro: (a.eps_z_micro + b.eps_z_micro) / 2.0,
            eps_t_micro: (a.eps_t_micro + b.eps_t_micro) / 2.0,
            eps_r_micro: (a.eps_r_micro + b.eps_r_micro) / 2.0,
            deflection_mm: (a.deflection_mm + b.deflection_mm) / 2.0,
            companion_deflection_mm: (a.companion_deflection_mm + b.companion_deflection_mm)
                / 2.0,
        }
    }

    /// 输出舍入：应力 3 位小数，应变 1 位，弯沉 2 位
    pub fn rounded(&self) -> Self {
        Self {
            sigma_z_mpa: round_to(self.sigma_z_mpa, 3),
            sigma_r_mpa: round_to(self.sigma_r_mpa, 3),
            sigma_theta_mpa: round_to(self.sigma_theta_mpa, 3),
            sigma_t_mpa: round_to(self.sigma_t_mpa, 3),
            tau_mpa: round_to(self.tau_mpa, 3),
            eps_z_micro: round_to(self.eps_z_micro, 1),
            eps_t_micro: round_to(self.eps_t_micro, 1),
            eps_r_micro: round_to(self.eps_r_micro, 1),
            deflection_mm: round_to(self.deflection_mm, 2),
            companion_deflection_mm: round_to(self.companion_deflection_mm, 2),
        }
    }

    /// 全部分量是否有限
    pub fn all_finite(&self) -> bool {
        [
            self.sigma_z_mpa,
            self.sigma_r_mpa,
            self.sigma_theta_mpa,
            self.sigma_t_mpa,
            self.tau_mpa,
            self.eps_z_micro,
            self.eps_t_micro,
            self.eps_r_micro,
            self.deflection_mm,
            self.companion_deflection_mm,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// 界面侧别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceSide {
    /// 层顶
    Top,
    /// 层底
    Bottom,
}

/// 界面观测点结果
#[derive(Debug, Clone, Serialize)]
pub struct InterfacePoint {
    /// 层序号（自顶向下，0 起）
    pub layer: usize,
    /// 顶/底
    pub side: InterfaceSide,
    /// 深度 [m]
    pub depth_m: f64,
    /// 响应
    pub values: Solicitation,
}

/// 请求深度观测点结果
#[derive(Debug, Clone, Serialize)]
pub struct DepthPoint {
    /// 深度 [m]
    pub depth_m: f64,
    /// 所在层序号
    pub layer: usize,
    /// 响应
    pub values: Solicitation,
}

/// 计算诊断信息
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    /// 每次运行的积分节点数
    pub node_count: usize,
    /// 被跳过的失败节点总数
    pub skipped_nodes: usize,
    /// 耗时 [ms]
    pub elapsed_ms: f64,
    /// 输入警告（非阻断）
    pub warnings: Vec<String>,
}

/// `Compute` 的完整输出
#[derive(Debug, Clone, Serialize)]
pub struct ComputeOutput {
    /// 请求深度处的响应，与输入深度一一对应
    pub points: Vec<DepthPoint>,
    /// 界面响应表（2N-1 个位置）
    pub interfaces: Vec<InterfacePoint>,
    /// 诊断信息
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_is_midpoint() {
        let a = Solicitation {
            sigma_z_mpa: 1.0,
            eps_z_micro: 100.0,
            ..Default::default()
        };
        let b = Solicitation {
            sigma_z_mpa: 3.0,
            eps_z_micro: 300.0,
            ..Default::default()
        };
        let mix = Solicitation::blend(&a, &b);
        assert_eq!(mix.sigma_z_mpa, 2.0);
        assert_eq!(mix.eps_z_micro, 200.0);
    }

    #[test]
    fn test_rounding_precisions() {
        let raw = Solicitation {
            sigma_t_mpa: 0.61249,
            eps_z_micro: 711.46,
            deflection_mm: 2.6137,
            ..Default::default()
        };
        let r = raw.rounded();
        assert_eq!(r.sigma_t_mpa, 0.612);
        assert_eq!(r.eps_z_micro, 711.5);
        assert_eq!(r.deflection_mm, 2.61);
    }
}
