// crates/pv_model/src/error.rs

//! 输入错误与警告
//!
//! [`InputError`] 的每个变体携带一个稳定的 kind 标签
//! （[`InputError::kind`]），供外语边界按字符串区分错误类别；
//! [`InputWarning`] 为非阻断提示，随成功结果一并返回。

/// 输入准入错误
#[derive(Debug, Clone, thiserror::Error)]
pub enum InputError {
    /// 层数超出 [2, 20]
    #[error("层数 {count} 超出允许范围 [{min}, {max}]")]
    BadLayerCount {
        /// 实际层数
        count: usize,
        /// 下限
        min: usize,
        /// 上限
        max: usize,
    },

    /// 各输入向量长度不一致
    #[error("向量 '{name}' 长度 {actual} 与层数不符（期望 {expected}）")]
    VectorLengthMismatch {
        /// 向量名称
        name: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 泊松比出界（开区间 (0, 0.5)）
    #[error("第 {layer} 层泊松比 {value} 超出开区间 (0, 0.5)")]
    PoissonOutOfRange {
        /// 层序号（自顶向下，0 起）
        layer: usize,
        /// 实际值
        value: f64,
    },

    /// 杨氏模量出界
    #[error("第 {layer} 层模量 {value} MPa 超出 (0, 100000]")]
    ModulusOutOfRange {
        /// 层序号
        layer: usize,
        /// 实际值 [MPa]
        value: f64,
    },

    /// 层厚出界
    #[error("第 {layer} 层厚度 {value} m 超出 (0, 10]")]
    ThicknessOutOfRange {
        /// 层序号
        layer: usize,
        /// 实际值 [m]
        value: f64,
    },

    /// 未知层间结合代码
    #[error("第 {index} 个层间结合代码 {code} 未知（0=连续 1=半连续 2=滑动）")]
    InterfaceCodeUnknown {
        /// 界面序号
        index: usize,
        /// 实际代码
        code: i32,
    },

    /// 未知轮型代码
    #[error("轮型代码 {code} 未知（0=单轮 1=双轮）")]
    WheelTypeUnknown {
        /// 实际代码
        code: i32,
    },

    /// 轮胎压力出界
    #[error("轮胎压力 {value} MPa 超出 (0, 5]")]
    PressureOutOfRange {
        /// 实际值 [MPa]
        value: f64,
    },

    /// 接触半径出界
    #[error("接触半径 {value} m 超出 (0, 1]")]
    ContactRadiusOutOfRange {
        /// 实际值 [m]
        value: f64,
    },

    /// 双轮轮距出界
    #[error("双轮轮距 {value} m 超出 (0, 2]")]
    TwinSpacingOutOfRange {
        /// 实际值 [m]
        value: f64,
    },

    /// 模量对比度过大（条件数保护）
    #[error("模量对比度 {ratio:.1} 超过上限 {max:.0}")]
    ModulusContrastExcessive {
        /// max(E)/min(E)
        ratio: f64,
        /// 上限
        max: f64,
    },

    /// 非地基层过薄（数值稳定性保护）
    #[error("第 {layer} 层厚度 {value} m 低于最小值 {min} m")]
    LayerTooThin {
        /// 层序号
        layer: usize,
        /// 实际值 [m]
        value: f64,
        /// 下限 [m]
        min: f64,
    },
}

impl InputError {
    /// 稳定的错误类别标签（外语边界按此区分）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadLayerCount { .. } => "bad_layer_count",
            Self::VectorLengthMismatch { .. } => "vector_length_mismatch",
            Self::PoissonOutOfRange { .. } => "poisson_out_of_range",
            Self::ModulusOutOfRange { .. } => "modulus_out_of_range",
            Self::ThicknessOutOfRange { .. } => "thickness_out_of_range",
            Self::InterfaceCodeUnknown { .. } => "interface_code_unknown",
            Self::WheelTypeUnknown { .. } => "wheel_type_unknown",
            Self::PressureOutOfRange { .. } => "pressure_out_of_range",
            Self::ContactRadiusOutOfRange { .. } => "contact_radius_out_of_range",
            Self::TwinSpacingOutOfRange { .. } => "twin_spacing_out_of_range",
            Self::ModulusContrastExcessive { .. } => "modulus_contrast_excessive",
            Self::LayerTooThin { .. } => "layer_too_thin",
        }
    }
}

/// 非阻断输入警告
///
/// 数据可接受但不常见，提示用户复核。
#[derive(Debug, Clone, thiserror::Error)]
pub enum InputWarning {
    /// 泊松比在常见范围之外
    #[error("第 {layer} 层泊松比 {value} 在常见范围 [0.15, 0.45] 之外")]
    UnusualPoisson {
        /// 层序号
        layer: usize,
        /// 实际值
        value: f64,
    },

    /// 模量极低（软弱土）
    #[error("第 {layer} 层模量 {value} MPa 低于 10 MPa，建议复核")]
    SoftModulus {
        /// 层序号
        layer: usize,
        /// 实际值 [MPa]
        value: f64,
    },

    /// 模量极高（高标号混凝土量级）
    #[error("第 {layer} 层模量 {value} MPa 高于 50000 MPa，建议复核")]
    StiffModulus {
        /// 层序号
        layer: usize,
        /// 实际值 [MPa]
        value: f64,
    },
}
