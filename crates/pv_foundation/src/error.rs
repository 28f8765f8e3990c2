// crates/pv_foundation/src/error.rs

//! 基础错误类型
//!
//! 定义整个项目的基础错误类型，仅包含与基础设施相关的错误。
//! 禁止引入任何领域概念（层体、荷载、积分节点等属于高层 crate）。
//!
//! # 错误分层
//!
//! ```text
//! 高层错误 (pv_model::InputError, pv_solver::ComputeError)
//!        ↓ (转换)
//! 基础错误 ← 你在这里 (pv_foundation::PvError)
//! ```

use std::fmt;

/// 统一结果类型别名
///
/// 用于简化函数签名，等价于 `Result<T, PvError>`。
pub type PvResult<T> = Result<T, PvError>;

/// Foundation 层基础错误
///
/// 包含所有基础设施级别的错误，是错误体系的根基。
/// 高层错误必须通过转换为 [`PvError::Internal`] 来向下兼容。
#[derive(Debug)]
pub enum PvError {
    /// 输入数据验证失败
    ///
    /// 用于参数校验、前置条件检查等场景。
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组或集合大小不匹配
    ///
    /// 在需要严格大小一致性的操作中触发。
    SizeMismatch {
        /// 数据名称（用于调试）
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 数值计算失败
    ///
    /// 奇异矩阵、残差超限、非有限值等。
    Numerical {
        /// 失败上下文描述
        message: String,
    },

    /// 内部实现错误
    ///
    /// 当程序进入不应到达的状态时使用。
    /// 通常表示 bug 或不变量被破坏。
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ============================================================================
// 便捷构造方法
// ============================================================================

impl PvError {
    /// 创建无效输入错误
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建大小不匹配错误
    #[inline]
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 创建数值计算错误
    #[inline]
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    /// 创建内部错误
    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 验证数组大小是否匹配，不匹配则返回 [`PvError::SizeMismatch`]
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> PvResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查条件，不满足则返回错误
    #[inline]
    pub fn ensure(cond: bool, err: Self) -> Result<(), Self> {
        if cond {
            Ok(())
        } else {
            Err(err)
        }
    }
}

// ============================================================================
// 核心 Trait 实现
// ============================================================================

impl fmt::Display for PvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { message } => write!(f, "无效的输入数据: {}", message),
            Self::SizeMismatch {
                name,
                expected,
                actual,
            } => {
                write!(f, "数组大小不匹配: {} 期望{}, 实际{}", name, expected, actual)
            }
            Self::Numerical { message } => write!(f, "数值计算失败: {}", message),
            Self::Internal { message } => write!(f, "内部错误: {}", message),
        }
    }
}

impl std::error::Error for PvError {}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PvError::invalid_input("泊松比超出范围");
        assert!(err.to_string().contains("无效的输入数据"));
    }

    #[test]
    fn test_size_mismatch() {
        let err = PvError::size_mismatch("young_mpa", 4, 3);
        assert!(err.to_string().contains("young_mpa"));
        assert!(err.to_string().contains("4"));
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_check_size_success() {
        assert!(PvError::check_size("test", 10, 10).is_ok());
    }

    #[test]
    fn test_check_size_failure() {
        let result = PvError::check_size("test", 10, 5);
        assert!(matches!(result.unwrap_err(), PvError::SizeMismatch { .. }));
    }

    #[test]
    fn test_ensure() {
        assert!(PvError::ensure(true, PvError::internal("不应失败")).is_ok());
        let result = PvError::ensure(false, PvError::numerical("条件失败"));
        assert!(matches!(result.unwrap_err(), PvError::Numerical { .. }));
    }

    #[test]
    fn test_pv_result_type() {
        fn failure() -> PvResult<i32> {
            Err(PvError::numerical("残差超限"))
        }
        assert!(failure().is_err());
    }
}
