// crates/pv_model/src/limits.rs

//! 准入范围常量
//!
//! 所有输入量的可接受区间与警告阈值。区间之外的输入被拒绝；
//! 警告阈值之外但仍可接受的输入产生非阻断警告。

/// 最小层数（含半无限地基层）
pub const MIN_LAYER_COUNT: usize = 2;

/// 最大层数（计算规模的工程上限）
pub const MAX_LAYER_COUNT: usize = 20;

/// 杨氏模量上限 [MPa]
pub const MAX_YOUNG_MODULUS: f64 = 100_000.0;

/// 软弱材料警告阈值 [MPa]
pub const SOFT_MODULUS_WARNING: f64 = 10.0;

/// 高刚度材料警告阈值 [MPa]
pub const STIFF_MODULUS_WARNING: f64 = 50_000.0;

/// 常见泊松比下限（低于此值给出警告）
pub const TYPICAL_MIN_POISSON: f64 = 0.15;

/// 常见泊松比上限（高于此值给出警告）
pub const TYPICAL_MAX_POISSON: f64 = 0.45;

/// 非地基层最小厚度 [m]（10 mm，更薄的层导致矩阵装配失稳）
pub const MIN_LAYER_THICKNESS: f64 = 0.01;

/// 非地基层最大厚度 [m]
pub const MAX_LAYER_THICKNESS: f64 = 10.0;

/// 轮胎压力上限 [MPa]
pub const MAX_TIRE_PRESSURE: f64 = 5.0;

/// 接触半径上限 [m]
pub const MAX_CONTACT_RADIUS: f64 = 1.0;

/// 双轮轮距上限 [m]
pub const MAX_WHEEL_SPACING: f64 = 2.0;

/// 模量对比度上限（条件数保护）
pub const MAX_MODULUS_CONTRAST: f64 = 1.0e4;
