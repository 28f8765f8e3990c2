// crates/pv_model/src/input.rs

//! 计算输入与准入校验
//!
//! [`PavementInput`] 聚合层体结构、轮载与观测深度。
//! [`PavementInput::validate`] 实施全部准入不变量：
//!
//! - 层数 ∈ [2, 20]，各向量长度一致
//! - 泊松比 ∈ (0, 0.5) 开区间（0.5 为不可压缩，不允许）
//! - 模量 ∈ (0, 100000] MPa，对比度 max(E)/min(E) ≤ 1e4
//! - 非基座层厚度 ∈ [0.01, 10] m
//! - 压力 ∈ (0, 5] MPa，半径 ∈ (0, 1] m，双轮轮距 ∈ (0, 2] m
//!
//! 校验在任何数值工作之前执行一次。观测深度按约定非负
//! （轴线下深度），由调用方保证。

use serde::{Deserialize, Serialize};

use pv_foundation::validation::ValidationReport;

use crate::error::{InputError, InputWarning};
use crate::layers::LayerStack;
use crate::limits;
use crate::load::{LoadConfig, WheelKind};

/// 观测深度集合
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationSet {
    /// 请求响应的深度 [m]（轴线下）
    pub depths_m: Vec<f64>,
}

impl ObservationSet {
    /// 由深度列表构造
    pub fn from_depths(depths_m: Vec<f64>) -> Self {
        Self { depths_m }
    }

    /// 观测点数量
    pub fn len(&self) -> usize {
        self.depths_m.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.depths_m.is_empty()
    }
}

/// 一次计算的完整输入
///
/// 输入被 `Compute` 消费且从不修改；所有权语义见求解器文档。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PavementInput {
    /// 层体结构
    pub structure: LayerStack,
    /// 轮载
    pub load: LoadConfig,
    /// 观测深度
    #[serde(default)]
    pub observations: ObservationSet,
}

impl PavementInput {
    /// 执行全部准入校验，返回错误与警告的完整报告
    pub fn validate(&self) -> ValidationReport<InputError, InputWarning> {
        let mut report = ValidationReport::new();
        let s = &self.structure;
        let n = s.layer_count();

        if !(limits::MIN_LAYER_COUNT..=limits::MAX_LAYER_COUNT).contains(&n) {
            report.add_error(InputError::BadLayerCount {
                count: n,
                min: limits::MIN_LAYER_COUNT,
                max: limits::MAX_LAYER_COUNT,
            });
            // 后续检查全部依赖层数，直接返回
            return report;
        }

        if s.poisson.len() != n {
            report.add_error(InputError::VectorLengthMismatch {
                name: "poisson",
                expected: n,
                actual: s.poisson.len(),
            });
        }
        if s.thickness_m.len() != n {
            report.add_error(InputError::VectorLengthMismatch {
                name: "thickness_m",
                expected: n,
                actual: s.thickness_m.len(),
            });
        }
        if s.interfaces.len() != n - 1 {
            report.add_error(InputError::VectorLengthMismatch {
                name: "interfaces",
                expected: n - 1,
                actual: s.interfaces.len(),
            });
        }
        if report.has_errors() {
            return report;
        }

        for (i, &nu) in s.poisson.iter().enumerate() {
            if !nu.is_finite() || nu <= 0.0 || nu >= 0.5 {
                report.add_error(InputError::PoissonOutOfRange { layer: i, value: nu });
            } else if !(limits::TYPICAL_MIN_POISSON..=limits::TYPICAL_MAX_POISSON).contains(&nu) {
                report.add_warning(InputWarning::UnusualPoisson { layer: i, value: nu });
            }
        }

        for (i, &e) in s.young_mpa.iter().enumerate() {
            if !e.is_finite() || e <= 0.0 || e > limits::MAX_YOUNG_MODULUS {
                report.add_error(InputError::ModulusOutOfRange { layer: i, value: e });
            } else if e < limits::SOFT_MODULUS_WARNING {
                report.add_warning(InputWarning::SoftModulus { layer: i, value: e });
            } else if e > limits::STIFF_MODULUS_WARNING {
                report.add_warning(InputWarning::StiffModulus { layer: i, value: e });
            }
        }

        // 基座层厚度为占位值，不检查；其余各层受上下限约束
        for (i, &h) in s.thickness_m[..n - 1].iter().enumerate() {
            if !h.is_finite() || h <= 0.0 || h > limits::MAX_LAYER_THICKNESS {
                report.add_error(InputError::ThicknessOutOfRange { layer: i, value: h });
            } else if h < limits::MIN_LAYER_THICKNESS {
                report.add_error(InputError::LayerTooThin {
                    layer: i,
                    value: h,
                    min: limits::MIN_LAYER_THICKNESS,
                });
            }
        }

        let contrast = s.modulus_contrast();
        if contrast > limits::MAX_MODULUS_CONTRAST {
            report.add_error(InputError::ModulusContrastExcessive {
                ratio: contrast,
                max: limits::MAX_MODULUS_CONTRAST,
            });
        }

        let p = self.load.pressure_mpa();
        if !p.is_finite() || p <= 0.0 || p > limits::MAX_TIRE_PRESSURE {
            report.add_error(InputError::PressureOutOfRange { value: p });
        }

        let a = self.load.contact_radius_m;
        if !a.is_finite() || a <= 0.0 || a > limits::MAX_CONTACT_RADIUS {
            report.add_error(InputError::ContactRadiusOutOfRange { value: a });
        }

        if self.load.wheel == WheelKind::Twin {
            let d = self.load.twin_spacing_m;
            if !d.is_finite() || d <= 0.0 || d > limits::MAX_WHEEL_SPACING {
                report.add_error(InputError::TwinSpacingOutOfRange { value: d });
            }
        }

        report
    }

    /// 校验并返回警告列表；首个错误直接返回 `Err`
    pub fn check(&self) -> Result<Vec<InputWarning>, InputError> {
        self.validate().into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::InterfaceBond;
    use crate::load::Pressure;

    fn valid_input() -> PavementInput {
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
    fn test_valid_input_passes() {
        let report = valid_input().validate();
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn test_single_layer_rejected() {
        let mut input = valid_input();
        input.structure.poisson = vec![0.35];
        input.structure.young_mpa = vec![50.0];
        input.structure.thickness_m = vec![1.0e7];
        input.structure.interfaces = vec![];
        let err = input.check().unwrap_err();
        assert_eq!(err.kind(), "bad_layer_count");
    }

    #[test]
    fn test_vector_length_mismatch() {
        let mut input = valid_input();
        input.structure.poisson.pop();
        let err = input.check().unwrap_err();
        assert_eq!(err.kind(), "vector_length_mismatch");
    }

    #[test]
    fn test_incompressible_poisson_rejected() {
        let mut input = valid_input();
        input.structure.poisson[1] = 0.5;
        let err = input.check().unwrap_err();
        assert_eq!(err.kind(), "poisson_out_of_range");
    }

    #[test]
    fn test_modulus_bounds() {
        let mut input = valid_input();
        input.structure.young_mpa[0] = 150_000.0;
        let err = input.check().unwrap_err();
        assert_eq!(err.kind(), "modulus_out_of_range");
    }

    #[test]
    fn test_modulus_contrast_guard() {
        let mut input = valid_input();
        input.structure.young_mpa = vec![90_000.0, 600.0, 5.0];
        let errors: Vec<_> = input
            .validate()
            .errors
            .iter()
            .map(|e| e.kind())
            .collect();
        assert!(errors.contains(&"modulus_contrast_excessive"));
    }

    #[test]
    fn test_thin_layer_rejected() {
        let mut input = valid_input();
        input.structure.thickness_m[0] = 0.005;
        let err = input.check().unwrap_err();
        assert_eq!(err.kind(), "layer_too_thin");
    }

    #[test]
    fn test_platform_thickness_unchecked() {
        let mut input = valid_input();
        input.structure.thickness_m[2] = f64::INFINITY;
        assert!(input.check().is_ok());
    }

    #[test]
    fn test_pressure_bounds() {
        let mut input = valid_input();
        input.load.pressure = Pressure::MegaPascals(6.0);
        let err = input.check().unwrap_err();
        assert_eq!(err.kind(), "pressure_out_of_range");
    }

    #[test]
    fn test_twin_spacing_checked_only_for_twin() {
        let mut input = valid_input();
        input.load.twin_spacing_m = -1.0; // 单轮时忽略
        assert!(input.check().is_ok());

        input.load.wheel = WheelKind::Twin;
        let err = input.check().unwrap_err();
        assert_eq!(err.kind(), "twin_spacing_out_of_range");
    }

    #[test]
    fn test_soft_modulus_warning() {
        let mut input = valid_input();
        input.structure.young_mpa[2] = 5.0;
        let warnings = input.check().unwrap();
        assert!(warnings
            .iter()
            .any(|w| matches!(w, InputWarning::SoftModulus { layer: 2, .. })));
    }
}
