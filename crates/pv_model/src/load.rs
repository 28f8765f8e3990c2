// crates/pv_model/src/load.rs

//! 轮载配置
//!
//! 单个圆形均布接触荷载，或轮距为 `d` 的一对相同荷载（标准双轮）。
//! 压力输入单位在字段上显式标注（kPa 或 MPa），内部统一换算为 MPa。

use serde::{Deserialize, Serialize};

/// 轮型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelKind {
    /// 单轮
    Single,
    /// 双轮（标准轮组）
    Twin,
}

impl WheelKind {
    /// 从外部整数代码构造（0=单轮 1=双轮）
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Single),
            1 => Some(Self::Twin),
            _ => None,
        }
    }

    /// 外部整数代码
    pub fn as_code(self) -> i32 {
        match self {
            Self::Single => 0,
            Self::Twin => 1,
        }
    }
}

/// 压力值，单位显式
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pressure {
    /// 千帕
    KiloPascals(f64),
    /// 兆帕
    MegaPascals(f64),
}

impl Pressure {
    /// 换算为 MPa
    pub fn as_mpa(self) -> f64 {
        match self {
            Self::KiloPascals(v) => v / 1000.0,
            Self::MegaPascals(v) => v,
        }
    }
}

/// 轮载配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// 轮型
    pub wheel: WheelKind,
    /// 接触压力
    pub pressure: Pressure,
    /// 接触圆半径 [m]
    pub contact_radius_m: f64,
    /// 双轮轮心距 [m]（单轮时忽略）
    #[serde(default)]
    pub twin_spacing_m: f64,
}

impl LoadConfig {
    /// 单轮荷载
    pub fn single(pressure: Pressure, contact_radius_m: f64) -> Self {
        Self {
            wheel: WheelKind::Single,
            pressure,
            contact_radius_m,
            twin_spacing_m: 0.0,
        }
    }

    /// 双轮荷载
    pub fn twin(pressure: Pressure, contact_radius_m: f64, twin_spacing_m: f64) -> Self {
        Self {
            wheel: WheelKind::Twin,
            pressure,
            contact_radius_m,
            twin_spacing_m,
        }
    }

    /// 压力 [MPa]
    pub fn pressure_mpa(&self) -> f64 {
        self.pressure.as_mpa()
    }
}
