// crates/pv_solver/tests/validation_tableaux.rs

//! 学术参考算例验证
//!
//! 法国路面设计教材的参考表格算例（柔性结构与半刚性结构），
//! 以及双轮刚度对比与性能包络算例。验收容差随算例给出。

use std::time::Instant;

use pv_model::{
    InterfaceBond, LayerStack, LoadConfig, ObservationSet, PavementInput, Pressure,
};
use pv_solver::{compute, ComputeOutput, InterfaceSide, SolverConfig};

/// 标准轴载：662 kPa，半径 0.1125 m
fn reference_load() -> LoadConfig {
    LoadConfig::single(Pressure::KiloPascals(662.0), 0.1125)
}

fn interface_value(out: &ComputeOutput, layer: usize, side: InterfaceSide) -> &pv_solver::Solicitation {
    &out.interfaces
        .iter()
        .find(|p| p.layer == layer && p.side == side)
        .expect("界面位置存在")
        .values
}

// ============================================================
// 算例 A：柔性路面（Tableau I.1）
// ============================================================

#[test]
fn test_tableau_flexible_subgrade_strain() {
    // 验收标准：基座层顶竖向应变 ε_z ≈ 711.5 µε ± 4（< 0.6 %）
    let input = PavementInput {
        structure: LayerStack {
            poisson: vec![0.35, 0.35, 0.35],
            young_mpa: vec![5500.0, 600.0, 50.0],
            thickness_m: vec![0.04, 0.15, 1.0e7],
            interfaces: vec![InterfaceBond::Bonded, InterfaceBond::Bonded],
        },
        load: reference_load(),
        observations: ObservationSet::from_depths(vec![0.19]),
    };
    let out = compute(&input, &SolverConfig::default()).unwrap();

    let platform_top = interface_value(&out, 2, InterfaceSide::Top);
    let eps_z = platform_top.eps_z_micro;
    assert!(
        (eps_z - 711.5).abs() <= 4.0,
        "基座层顶 ε_z = {eps_z}，期望 711.5 ± 4"
    );
}

// ============================================================
// 算例 B：半刚性、半连续界面（Tableau I.5 半连续变体）
// ============================================================

fn semi_rigid_structure(interface1: InterfaceBond) -> PavementInput {
    PavementInput {
        structure: LayerStack {
            poisson: vec![0.35, 0.35, 0.35],
            young_mpa: vec![7000.0, 23_000.0, 120.0],
            thickness_m: vec![0.06, 0.15, 1.0e7],
            interfaces: vec![InterfaceBond::Bonded, interface1],
        },
        load: reference_load(),
        observations: ObservationSet::from_depths(vec![0.21]),
    }
}

#[test]
fn test_tableau_semi_rigid_semi_bonded() {
    // 验收标准：水硬性结合层底临界水平应力 σ_t ≈ 0.612 MPa ± 0.003
    let input = semi_rigid_structure(InterfaceBond::SemiBonded);
    let out = compute(&input, &SolverConfig::default()).unwrap();

    let base_of_bound = interface_value(&out, 1, InterfaceSide::Bottom);
    let sigma_t = base_of_bound.sigma_t_mpa;
    assert!(
        (sigma_t - 0.612).abs() <= 0.003,
        "结合层底 σ_t = {sigma_t}，期望 0.612 ± 0.003"
    );
}

// ============================================================
// 算例 C：半刚性、全连续界面
// ============================================================

#[test]
fn test_tableau_semi_rigid_bonded() {
    // 验收标准：σ_t ≈ 0.815 MPa ± 0.003
    let input = semi_rigid_structure(InterfaceBond::Bonded);
    let out = compute(&input, &SolverConfig::default()).unwrap();

    let base_of_bound = interface_value(&out, 1, InterfaceSide::Bottom);
    let sigma_t = base_of_bound.sigma_t_mpa;
    assert!(
        (sigma_t - 0.815).abs() <= 0.003,
        "结合层底 σ_t = {sigma_t}，期望 0.815 ± 0.003"
    );
}

#[test]
fn test_semi_bonded_sits_between_extremes() {
    // 半连续结果落在连续与滑动两个极端之间
    let bonded = compute(
        &semi_rigid_structure(InterfaceBond::Bonded),
        &SolverConfig::default(),
    )
    .unwrap();
    let unbonded = compute(
        &semi_rigid_structure(InterfaceBond::Unbonded),
        &SolverConfig::default(),
    )
    .unwrap();
    let semi = compute(
        &semi_rigid_structure(InterfaceBond::SemiBonded),
        &SolverConfig::default(),
    )
    .unwrap();

    let s_b = interface_value(&bonded, 1, InterfaceSide::Bottom).sigma_t_mpa;
    let s_u = interface_value(&unbonded, 1, InterfaceSide::Bottom).sigma_t_mpa;
    let s_m = interface_value(&semi, 1, InterfaceSide::Bottom).sigma_t_mpa;

    let lo = s_b.min(s_u) - 1.0e-3;
    let hi = s_b.max(s_u) + 1.0e-3;
    assert!(
        (lo..=hi).contains(&s_m),
        "半连续 σ_t = {s_m} 应落在 [{lo}, {hi}]"
    );
}

// ============================================================
// 算例 D：双轮刚度对比（钳制路径）
// ============================================================

#[test]
fn test_twin_wheel_stiffness_contrast() {
    // 积分尾部 m·h 远超 30，验证钳制路径下双轮间表面弯沉为正
    let input = PavementInput {
        structure: LayerStack {
            poisson: vec![0.35, 0.35],
            young_mpa: vec![5000.0, 50.0],
            thickness_m: vec![0.20, 1.0e7],
            interfaces: vec![InterfaceBond::Bonded],
        },
        load: LoadConfig::twin(Pressure::KiloPascals(662.0), 0.125, 0.375),
        observations: ObservationSet::from_depths(vec![0.0]),
    };
    let out = compute(&input, &SolverConfig::default()).unwrap();

    let w = out.points[0].values.deflection_mm;
    assert!(w > 0.0, "双轮间表面弯沉必须严格为正，得到 {w}");
    assert!(w.is_finite());
}

// ============================================================
// 算例 E：性能包络
// ============================================================

#[test]
fn test_five_layer_performance_envelope() {
    // 5 层、10 个观测点的调用在普通硬件上 < 2 s
    let input = PavementInput {
        structure: LayerStack {
            poisson: vec![0.35, 0.35, 0.25, 0.35, 0.35],
            young_mpa: vec![5400.0, 9300.0, 23_000.0, 120.0, 50.0],
            thickness_m: vec![0.06, 0.08, 0.20, 0.30, 1.0e7],
            interfaces: vec![
                InterfaceBond::Bonded,
                InterfaceBond::Bonded,
                InterfaceBond::SemiBonded,
                InterfaceBond::Bonded,
            ],
        },
        load: LoadConfig::twin(Pressure::KiloPascals(662.0), 0.125, 0.375),
        observations: ObservationSet::from_depths(vec![
            0.0, 0.06, 0.14, 0.34, 0.50, 0.64, 0.80, 1.00, 1.50, 2.00,
        ]),
    };

    let started = Instant::now();
    let out = compute(&input, &SolverConfig::default()).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(out.points.len(), 10);
    assert_eq!(out.interfaces.len(), 9);
    assert!(
        elapsed.as_secs_f64() < 2.0,
        "5 层 10 点调用耗时 {:?}，要求 < 2 s",
        elapsed
    );
}
