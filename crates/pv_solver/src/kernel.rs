// crates/pv_solver/src/kernel.rs

//! 响应核（C4）
//!
//! 由一层的系数 `(A, B, C, D)` 在一个 `(m, z)` 处求出变换域
//! 被积函数值。全部表达式为系数的一次多项式，系数为 `m`、`z`、
//! `ν` 与两个指数的有理组合。
//!
//! 径向/切向应力各拆为两个被积函数（`σ_r = σ_r1 − σ_r2`，
//! `σ_θ = σ_θ1 + σ_θ2`），以分离 `J0` 权与 `J1` 权的部分。
//!
//! `exp(+m·z)` 与装配同规则钳制：非基座层内 `z ≤ 2H − z`，
//! 被钳项的真实量级不超过 `exp(-T_exp)`。

/// 一层的四个待定系数（基座层 C = D = 0）
#[derive(Debug, Clone, Copy)]
pub struct LayerCoeffs {
    /// 衰减指数 `exp(-m·z)` 的系数 A
    pub a: f64,
    /// 衰减指数的线性深度项系数 B
    pub b: f64,
    /// 增长指数 `exp(+m·z)` 的系数 C
    pub c: f64,
    /// 增长指数的线性深度项系数 D
    pub d: f64,
}

/// 一个 `(m, z)` 处的全部被积函数值
#[derive(Debug, Clone, Copy)]
pub struct Integrands {
    /// 竖向正应力，`J0(mr)·J1(ma)` 权
    pub sigma_z: f64,
    /// 径向应力第一部分，`J0(mr)·J1(ma)` 权
    pub sigma_r1: f64,
    /// 径向应力第二部分，`J1(ma)·J1(mr)/(mr)` 权
    pub sigma_r2: f64,
    /// 切向应力第一部分，`J0(mr)·J1(ma)` 权
    pub sigma_theta1: f64,
    /// 切向应力第二部分，`J1(ma)·J1(mr)/(mr)` 权
    pub sigma_theta2: f64,
    /// 层内竖向位移，`J0(mr)·J1(ma)/m` 权
    pub w_interior: f64,
    /// 表面竖向位移闭式被积函数（仅 z = 0 使用）
    pub w_surface: f64,
    /// 剪应力，`J1(mr)·J1(ma)` 权
    pub tau: f64,
}

/// 在 `(m, z)` 处求被积函数
///
/// `t_exp` 为增长指数的钳制阈值（`m·z > t_exp` 时置零）。
pub fn integrands(c: &LayerCoeffs, m: f64, z: f64, nu: f64, t_exp: f64) -> Integrands {
    let mz = m * z;
    let em = (-mz).exp();
    let ep = if mz > t_exp { 0.0 } else { mz.exp() };

    let a_em = c.a * m * m * em;
    let c_ep = c.c * m * m * ep;

    let sigma_z = a_em + m * (1.0 - 2.0 * nu + mz) * c.b * em + c_ep
        - m * (1.0 - 2.0 * nu - mz) * c.d * ep;

    let sigma_r1 = a_em - m * (1.0 + 2.0 * nu - mz) * c.b * em + c_ep
        + m * (1.0 + 2.0 * nu + mz) * c.d * ep;

    let sigma_r2 =
        a_em - m * (1.0 - mz) * c.b * em + c_ep + m * (1.0 + mz) * c.d * ep;

    let sigma_theta1 = 2.0 * nu * m * (c.d * ep - c.b * em);

    let w_interior = -a_em - m * (2.0 - 4.0 * nu + mz) * c.b * em + c_ep
        - m * (2.0 - 4.0 * nu - mz) * c.d * ep;

    let w_surface = 1.0 - 2.0 * m * m * c.c + 2.0 * m * (1.0 - 2.0 * nu) * c.d;

    let tau = -a_em + m * (2.0 * nu - mz) * c.b * em + c_ep + m * (2.0 * nu + mz) * c.d * ep;

    Integrands {
        sigma_z,
        sigma_r1,
        sigma_r2,
        sigma_theta1,
        sigma_theta2: sigma_r2,
        w_interior,
        w_surface,
        tau,
    }
}
