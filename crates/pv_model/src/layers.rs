// crates/pv_model/src/layers.rs

//! 层体结构
//!
//! 自顶（路表）向下（半无限地基，下称"基座层"）有序排列的弹性层序列。
//! 每层携带杨氏模量 [MPa]、泊松比、厚度 [m]；除基座层外的每个层底
//! 界面携带与下层的结合状态。基座层厚度仅为占位（半无限）。

use serde::{Deserialize, Serialize};

/// 层间结合状态
///
/// 半连续界面不构成独立的方程组：求解时按连续与滑动两种极端
/// 情形各算一次，结果取算术平均。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceBond {
    /// 连续（位移与应力全连续）
    Bonded,
    /// 半连续（连续/滑动两种极端情形的 50/50 平均）
    SemiBonded,
    /// 滑动（法向连续，界面两侧剪应力为零）
    Unbonded,
}

impl InterfaceBond {
    /// 从外部整数代码构造（0=连续 1=半连续 2=滑动）
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Bonded),
            1 => Some(Self::SemiBonded),
            2 => Some(Self::Unbonded),
            _ => None,
        }
    }

    /// 外部整数代码
    pub fn as_code(self) -> i32 {
        match self {
            Self::Bonded => 0,
            Self::SemiBonded => 1,
            Self::Unbonded => 2,
        }
    }
}

/// 层体结构（SoA 布局，与外部接口的数组形式一致）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerStack {
    /// 各层泊松比，长度 N
    pub poisson: Vec<f64>,
    /// 各层杨氏模量 [MPa]，长度 N
    pub young_mpa: Vec<f64>,
    /// 各层厚度 [m]，长度 N（基座层厚度为占位值）
    pub thickness_m: Vec<f64>,
    /// 层间结合状态，长度 N-1
    pub interfaces: Vec<InterfaceBond>,
}

impl LayerStack {
    /// 层数（含基座层）
    pub fn layer_count(&self) -> usize {
        self.young_mpa.len()
    }

    /// 基座层序号
    pub fn platform_index(&self) -> usize {
        self.layer_count() - 1
    }

    /// 有限层总厚度 [m]（不含基座层）
    pub fn finite_thickness(&self) -> f64 {
        let n = self.layer_count();
        self.thickness_m[..n - 1].iter().sum()
    }

    /// 界面深度序列 [m]
    pub fn interface_depths(&self) -> Vec<f64> {
        cumulative_depths(&self.thickness_m)
    }

    /// 模量对比度 max(E)/min(E)
    pub fn modulus_contrast(&self) -> f64 {
        let mut min = f64::INFINITY;
        let mut max = 0.0f64;
        for &e in &self.young_mpa {
            min = min.min(e);
            max = max.max(e);
        }
        if min > 0.0 {
            max / min
        } else {
            f64::INFINITY
        }
    }

    /// 是否含半连续界面
    pub fn has_semi_bonded(&self) -> bool {
        self.interfaces.contains(&InterfaceBond::SemiBonded)
    }

    /// 包含深度 `z` 的层序号
    ///
    /// 深度恰为界面时归属上层；超过最后一个界面归属基座层。
    pub fn layer_at_depth(&self, z: f64) -> usize {
        let depths = self.interface_depths();
        // depths = [0, H1, ..., H_{N-1}]
        for i in 1..depths.len() {
            if z <= depths[i] {
                return i - 1;
            }
        }
        self.platform_index()
    }
}

/// 界面深度的单调序列 `[0, h0, h0+h1, …, Σ h_i]`（不含基座层厚度）
pub fn cumulative_depths(thicknesses: &[f64]) -> Vec<f64> {
    let n = thicknesses.len();
    let mut depths = Vec::with_capacity(n);
    depths.push(0.0);
    let mut acc = 0.0;
    for &h in &thicknesses[..n.saturating_sub(1)] {
        acc += h;
        depths.push(acc);
    }
    depths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_layer() -> LayerStack {
        LayerStack {
            poisson: vec![0.35, 0.35, 0.35],
            young_mpa: vec![5500.0, 600.0, 50.0],
            thickness_m: vec![0.04, 0.15, 1.0e7],
            interfaces: vec![InterfaceBond::Bonded, InterfaceBond::Bonded],
        }
    }

    #[test]
    fn test_cumulative_depths() {
        let depths = cumulative_depths(&[0.04, 0.15, 1.0e7]);
        assert_eq!(depths, vec![0.0, 0.04, 0.19]);
    }

    #[test]
    fn test_finite_thickness_excludes_platform() {
        let stack = three_layer();
        assert!((stack.finite_thickness() - 0.19).abs() < 1e-12);
    }

    #[test]
    fn test_layer_at_depth() {
        let stack = three_layer();
        assert_eq!(stack.layer_at_depth(0.0), 0);
        assert_eq!(stack.layer_at_depth(0.04), 0); // 界面归属上层
        assert_eq!(stack.layer_at_depth(0.10), 1);
        assert_eq!(stack.layer_at_depth(0.19), 1);
        assert_eq!(stack.layer_at_depth(0.50), 2);
    }

    #[test]
    fn test_bond_codes_roundtrip() {
        for code in 0..3 {
            let bond = InterfaceBond::from_code(code).unwrap();
            assert_eq!(bond.as_code(), code);
        }
        assert!(InterfaceBond::from_code(3).is_none());
        assert!(InterfaceBond::from_code(-1).is_none());
    }

    #[test]
    fn test_modulus_contrast() {
        let stack = three_layer();
        assert!((stack.modulus_contrast() - 110.0).abs() < 1e-9);
    }
}
