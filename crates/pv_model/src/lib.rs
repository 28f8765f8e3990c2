// crates/pv_model/src/lib.rs

//! PaviMech 领域模型
//!
//! 定义多层弹性体系计算的输入记录及其准入校验：
//!
//! - [`layers`]: 层体结构（模量、泊松比、厚度、层间结合状态）
//! - [`load`]: 轮载配置（单轮/双轮、压力单位、接触半径、轮距）
//! - [`input`]: 完整计算输入与 C1 准入校验
//! - [`error`]: 输入错误（稳定的 kind 标签）与非阻断警告
//!
//! # 设计原则
//!
//! 输入一经构造即不可变；校验在任何数值计算之前执行一次，
//! 错误阻止计算，警告随结果返回。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod input;
pub mod layers;
pub mod limits;
pub mod load;

// 重导出常用类型
pub use error::{InputError, InputWarning};
pub use input::{ObservationSet, PavementInput};
pub use layers::{cumulative_depths, InterfaceBond, LayerStack};
pub use load::{LoadConfig, Pressure, WheelKind};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{InputError, InputWarning};
    pub use crate::input::{ObservationSet, PavementInput};
    pub use crate::layers::{InterfaceBond, LayerStack};
    pub use crate::load::{LoadConfig, Pressure, WheelKind};
}
