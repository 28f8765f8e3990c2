// crates/pv_ffi/src/lib.rs

//! PaviMech C ABI
//!
//! 供 .NET P/Invoke 及其他 C 调用方使用的薄边界。核心不感知
//! 本层的存在；本层负责：
//!
//! 1. 把失败翻译为稳定的错误码表（见 [`codes`]）；
//! 2. 拥有并释放输出缓冲区（[`pavimech_free_output`] 幂等，
//!    对空指针/已释放结构为无操作）；
//! 3. 线程局部的最近错误字符串（[`pavimech_get_last_error`]）。
//!
//! # 结构布局
//!
//! 输入/输出结构为顺序布局的纯 C 类型；输出数组由本库分配，
//! 必须经 [`pavimech_free_output`] 释放。
//!
//! # 安全
//!
//! 所有入口对空指针返回 `PAVIMECH_ERROR_NULL_POINTER`；
//! 调用方必须保证数组指针与长度字段一致。内部 panic 被捕获并
//! 翻译为 `PAVIMECH_ERROR_UNKNOWN`，不会跨 ABI 展开。

#![warn(clippy::all)]

use std::cell::RefCell;
use std::ffi::CString;
use std::panic::{catch_unwind, AssertUnwindSafe};

use libc::{c_char, c_int};

use pv_model::{
    InterfaceBond, LayerStack, LoadConfig, ObservationSet, PavementInput, Pressure, WheelKind,
};
use pv_solver::{compute, ComputeError, SolverConfig, SolverStrategy};

/// 稳定错误码表（线协议的一部分，不得改动取值）
pub mod codes {
    use libc::c_int;

    /// 成功
    pub const PAVIMECH_SUCCESS: c_int = 0;
    /// 输入非法
    pub const PAVIMECH_ERROR_INVALID_INPUT: c_int = 1;
    /// 空指针
    pub const PAVIMECH_ERROR_NULL_POINTER: c_int = 2;
    /// 内存分配失败
    pub const PAVIMECH_ERROR_ALLOCATION: c_int = 3;
    /// 计算失败（奇异矩阵、溢出、残差超限）
    pub const PAVIMECH_ERROR_CALCULATION: c_int = 4;
    /// 未知错误
    pub const PAVIMECH_ERROR_UNKNOWN: c_int = 99;
}

use codes::*;

const VERSION: &[u8] = b"1.0.0\0";
const ERROR_MESSAGE_LEN: usize = 256;

thread_local! {
    static LAST_ERROR: RefCell<CString> =
        RefCell::new(CString::new("").expect("空串无内嵌 NUL"));
}

fn set_last_error(message: &str) {
    let sanitized = message.replace('\0', " ");
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

/// 计算输入（C 布局）
#[repr(C)]
pub struct PavementInputC {
    /// 层数（2 到 20）
    pub nlayer: c_int,
    /// 各层泊松比，nlayer 个元素
    pub poisson_ratio: *const f64,
    /// 各层杨氏模量 [MPa]，nlayer 个元素
    pub young_modulus: *const f64,
    /// 各层厚度 [m]，nlayer 个元素
    pub thickness: *const f64,
    /// 层间结合代码（0=连续 1=半连续 2=滑动），nlayer-1 个元素
    pub interface_bond: *const c_int,
    /// 轮型（0=单轮 1=双轮）
    pub wheel_type: c_int,
    /// 轮压 [kPa]
    pub pressure_kpa: f64,
    /// 接触半径 [m]
    pub wheel_radius_m: f64,
    /// 双轮轮距 [m]（单轮时忽略）
    pub wheel_spacing_m: f64,
    /// 观测点数量
    pub nz: c_int,
    /// 观测深度 [m]，nz 个元素
    pub z_coords: *const f64,
}

/// 计算输出（C 布局）
///
/// 数组由本库分配，大小均为 `nz`，必须经 [`pavimech_free_output`] 释放。
#[repr(C)]
pub struct PavementOutputC {
    /// 1 = 成功，0 = 失败
    pub success: c_int,
    /// 错误码（见 [`codes`]）
    pub error_code: c_int,
    /// 错误信息（UTF-8，NUL 结尾，可能截断）
    pub error_message: [c_char; ERROR_MESSAGE_LEN],
    /// 观测点数量（成功时与输入一致）
    pub nz: c_int,
    /// 计算耗时 [ms]
    pub calculation_time_ms: f64,
    /// 弯沉 [mm]
    pub deflection_mm: *mut f64,
    /// 竖向应力 [kPa]
    pub vertical_stress_kpa: *mut f64,
    /// 临界水平应变 [µε]
    pub horizontal_strain: *mut f64,
    /// 径向应变 [µε]
    pub radial_strain: *mut f64,
    /// 剪应力 [kPa]
    pub shear_stress_kpa: *mut f64,
}

impl PavementOutputC {
    fn clear(&mut self) {
        self.success = 0;
        self.error_code = PAVIMECH_SUCCESS;
        self.error_message = [0; ERROR_MESSAGE_LEN];
        self.nz = 0;
        self.calculation_time_ms = 0.0;
        self.deflection_mm = std::ptr::null_mut();
        self.vertical_stress_kpa = std::ptr::null_mut();
        self.horizontal_strain = std::ptr::null_mut();
        self.radial_strain = std::ptr::null_mut();
        self.shear_stress_kpa = std::ptr::null_mut();
    }

    fn fail(&mut self, code: c_int, message: &str) -> c_int {
        self.success = 0;
        self.error_code = code;
        write_message(&mut self.error_message, message);
        set_last_error(message);
        code
    }
}

fn write_message(buf: &mut [c_char; ERROR_MESSAGE_LEN], message: &str) {
    let bytes = message.as_bytes();
    let n = bytes.len().min(ERROR_MESSAGE_LEN - 1);
    for (dst, &src) in buf.iter_mut().zip(bytes[..n].iter()) {
        *dst = src as c_char;
    }
    buf[n] = 0;
}

fn leak_array(values: Vec<f64>) -> *mut f64 {
    Box::leak(values.into_boxed_slice()).as_mut_ptr()
}

/// # Safety
/// 调用方保证指针与长度字段一致。
unsafe fn convert_input(input: &PavementInputC) -> Result<PavementInput, String> {
    let n = input.nlayer;
    if n < 2 {
        return Err(format!("层数 {n} 非法（至少 2 层）"));
    }
    let n = n as usize;
    if input.poisson_ratio.is_null()
        || input.young_modulus.is_null()
        || input.thickness.is_null()
        || input.interface_bond.is_null()
    {
        return Err("层参数数组为空指针".into());
    }
    if input.nz < 0 || (input.nz > 0 && input.z_coords.is_null()) {
        return Err("观测深度数组为空指针".into());
    }

    let poisson = std::slice::from_raw_parts(input.poisson_ratio, n).to_vec();
    let young = std::slice::from_raw_parts(input.young_modulus, n).to_vec();
    let thickness = std::slice::from_raw_parts(input.thickness, n).to_vec();
    let bond_codes = std::slice::from_raw_parts(input.interface_bond, n - 1);

    let mut interfaces = Vec::with_capacity(n - 1);
    for (i, &code) in bond_codes.iter().enumerate() {
        let bond = InterfaceBond::from_code(code)
            .ok_or_else(|| format!("第 {i} 个层间结合代码 {code} 未知"))?;
        interfaces.push(bond);
    }

    let wheel = WheelKind::from_code(input.wheel_type)
        .ok_or_else(|| format!("轮型代码 {} 未知", input.wheel_type))?;

    let depths = if input.nz == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(input.z_coords, input.nz as usize).to_vec()
    };

    Ok(PavementInput {
        structure: LayerStack {
            poisson,
            young_mpa: young,
            thickness_m: thickness,
            interfaces,
        },
        load: LoadConfig {
            wheel,
            pressure: Pressure::KiloPascals(input.pressure_kpa),
            contact_radius_m: input.wheel_radius_m,
            twin_spacing_m: input.wheel_spacing_m,
        },
        observations: ObservationSet::from_depths(depths),
    })
}

fn run_calculation(
    input: &PavementInputC,
    output: &mut PavementOutputC,
    config: &SolverConfig,
) -> c_int {
    let domain_input = match unsafe { convert_input(input) } {
        Ok(v) => v,
        Err(msg) => return output.fail(PAVIMECH_ERROR_INVALID_INPUT, &msg),
    };

    match compute(&domain_input, config) {
        Ok(result) => {
            let nz = result.points.len();
            output.success = 1;
            output.error_code = PAVIMECH_SUCCESS;
            output.nz = nz as c_int;
            output.calculation_time_ms = result.diagnostics.elapsed_ms;

            let mut deflection = Vec::with_capacity(nz);
            let mut sigma_z = Vec::with_capacity(nz);
            let mut eps_t = Vec::with_capacity(nz);
            let mut eps_r = Vec::with_capacity(nz);
            let mut tau = Vec::with_capacity(nz);
            for p in &result.points {
                deflection.push(p.values.deflection_mm);
                sigma_z.push(p.values.sigma_z_mpa * 1000.0);
                eps_t.push(p.values.eps_t_micro);
                eps_r.push(p.values.eps_r_micro);
                tau.push(p.values.tau_mpa * 1000.0);
            }
            output.deflection_mm = leak_array(deflection);
            output.vertical_stress_kpa = leak_array(sigma_z);
            output.horizontal_strain = leak_array(eps_t);
            output.radial_strain = leak_array(eps_r);
            output.shear_stress_kpa = leak_array(tau);
            set_last_error("");
            PAVIMECH_SUCCESS
        }
        Err(ComputeError::InvalidInput(e)) => {
            output.fail(PAVIMECH_ERROR_INVALID_INPUT, &e.to_string())
        }
        Err(ComputeError::BadConfig(msg)) => output.fail(PAVIMECH_ERROR_INVALID_INPUT, &msg),
        Err(e @ ComputeError::CalculationFailed { .. }) => {
            output.fail(PAVIMECH_ERROR_CALCULATION, &e.to_string())
        }
    }
}

fn guarded_calculate(
    input: *const PavementInputC,
    output: *mut PavementOutputC,
    config: SolverConfig,
) -> c_int {
    if output.is_null() {
        set_last_error("输出结构为空指针");
        return PAVIMECH_ERROR_NULL_POINTER;
    }
    let output = unsafe { &mut *output };
    output.clear();

    if input.is_null() {
        return output.fail(PAVIMECH_ERROR_NULL_POINTER, "输入结构为空指针");
    }
    let input = unsafe { &*input };

    match catch_unwind(AssertUnwindSafe(|| {
        run_calculation(input, output, &config)
    })) {
        Ok(code) => code,
        Err(_) => output.fail(PAVIMECH_ERROR_UNKNOWN, "内部 panic，已捕获"),
    }
}

/// 主计算入口（直接解法）
///
/// # Safety
///
/// `input`/`output` 必须指向有效结构；`input` 内的数组指针必须
/// 与其长度字段一致。输出数组必须经 [`pavimech_free_output`] 释放。
#[no_mangle]
pub unsafe extern "C" fn pavimech_calculate(
    input: *const PavementInputC,
    output: *mut PavementOutputC,
) -> c_int {
    guarded_calculate(input, output, SolverConfig::default())
}

/// 数值稳定计算入口（TRMM 透射/反射矩阵法）
///
/// 适用于 `m·h` 极端（厚层、高刚度对比）的场合，矩阵元素仅含
/// 非正指数，全部有界。
///
/// # Safety
///
/// 同 [`pavimech_calculate`]。
#[no_mangle]
pub unsafe extern "C" fn pavimech_calculate_stable(
    input: *const PavementInputC,
    output: *mut PavementOutputC,
) -> c_int {
    let config = SolverConfig {
        strategy: SolverStrategy::Trmm,
        ..SolverConfig::default()
    };
    guarded_calculate(input, output, config)
}

/// 仅校验输入，不做计算
///
/// `error_message` 可为空；非空时写入首个错误的描述（UTF-8，
/// NUL 结尾，超长截断）。
///
/// # Safety
///
/// `input` 的数组指针必须与长度字段一致；`error_message` 非空时
/// 必须指向至少 `message_size` 字节的缓冲区。
#[no_mangle]
pub unsafe extern "C" fn pavimech_validate_input(
    input: *const PavementInputC,
    error_message: *mut c_char,
    message_size: c_int,
) -> c_int {
    let write = |msg: &str| {
        set_last_error(msg);
        if !error_message.is_null() && message_size > 0 {
            let bytes = msg.as_bytes();
            let n = bytes.len().min(message_size as usize - 1);
            for (i, &b) in bytes[..n].iter().enumerate() {
                *error_message.add(i) = b as c_char;
            }
            *error_message.add(n) = 0;
        }
    };

    if input.is_null() {
        write("输入结构为空指针");
        return PAVIMECH_ERROR_NULL_POINTER;
    }

    let domain_input = match convert_input(&*input) {
        Ok(v) => v,
        Err(msg) => {
            write(&msg);
            return PAVIMECH_ERROR_INVALID_INPUT;
        }
    };

    match domain_input.check() {
        Ok(_) => {
            write("");
            PAVIMECH_SUCCESS
        }
        Err(e) => {
            write(&e.to_string());
            PAVIMECH_ERROR_INVALID_INPUT
        }
    }
}

/// 释放输出结构中由本库分配的数组
///
/// 幂等：对空指针或已释放的结构为无操作。
///
/// # Safety
///
/// `output` 为空或指向 [`pavimech_calculate`] 填充过的结构；
/// 数组指针自填充以来未被调用方改写。
#[no_mangle]
pub unsafe extern "C" fn pavimech_free_output(output: *mut PavementOutputC) {
    if output.is_null() {
        return;
    }
    let output = &mut *output;
    let nz = output.nz as usize;

    for ptr in [
        &mut output.deflection_mm,
        &mut output.vertical_stress_kpa,
        &mut output.horizontal_strain,
        &mut output.radial_strain,
        &mut output.shear_stress_kpa,
    ] {
        if !ptr.is_null() {
            drop(Vec::from_raw_parts(*ptr, nz, nz));
            *ptr = std::ptr::null_mut();
        }
    }
    output.nz = 0;
}

/// 版本串 "MAJOR.MINOR.PATCH"（静态存储，勿释放）
#[no_mangle]
pub extern "C" fn pavimech_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

/// 本线程最近一次错误的描述（静态存储，勿释放；
/// 下次本线程调用任何入口时失效）
#[no_mangle]
pub extern "C" fn pavimech_get_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| slot.borrow().as_ptr())
}
