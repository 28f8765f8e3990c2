// crates/pv_solver/tests/smoke_test.rs

//! 两层结构冒烟测试
//!
//! 用最小的双层体系走通整条计算流水线：输出形状、有限性、
//! 表面闭式值与界面表键位。不检验数值精度，精度由
//! `validation_tableaux` 负责。

use pv_model::{
    InterfaceBond, LayerStack, LoadConfig, ObservationSet, PavementInput, Pressure,
};
use pv_solver::{compute, InterfaceSide, SolverConfig};

fn two_layer_input() -> PavementInput {
    PavementInput {
        structure: LayerStack {
            poisson: vec![0.35, 0.35],
            young_mpa: vec![5000.0, 50.0],
            thickness_m: vec![0.20, 1.0e7],
            interfaces: vec![InterfaceBond::Bonded],
        },
        load: LoadConfig::single(Pressure::KiloPascals(662.0), 0.125),
        observations: ObservationSet::from_depths(vec![0.0, 0.10, 0.20, 0.50]),
    }
}

#[test]
fn test_two_layer_compute_succeeds() {
    let out = compute(&two_layer_input(), &SolverConfig::default()).unwrap();

    // 2N-1 = 3 个界面位置，4 个请求深度
    assert_eq!(out.interfaces.len(), 3);
    assert_eq!(out.points.len(), 4);
    assert_eq!(out.diagnostics.skipped_nodes, 0);
}

#[test]
fn test_all_outputs_finite() {
    let out = compute(&two_layer_input(), &SolverConfig::default()).unwrap();
    for p in out.interfaces.iter().map(|p| &p.values).chain(out.points.iter().map(|p| &p.values)) {
        assert!(p.all_finite());
    }
}

#[test]
fn test_surface_deflection_positive() {
    let out = compute(&two_layer_input(), &SolverConfig::default()).unwrap();
    let surface = &out.interfaces[0];
    assert_eq!(surface.layer, 0);
    assert_eq!(surface.side, InterfaceSide::Top);
    assert!(
        surface.values.deflection_mm > 0.0,
        "表面弯沉必须为正，得到 {}",
        surface.values.deflection_mm
    );
}

#[test]
fn test_surface_sigma_z_equals_pressure() {
    // 荷载圆内路表竖向应力取闭式值 p
    let out = compute(&two_layer_input(), &SolverConfig::default()).unwrap();
    assert!((out.interfaces[0].values.sigma_z_mpa - 0.662).abs() < 1e-9);
    // 请求深度 z=0 与界面表表面点一致
    assert!((out.points[0].values.sigma_z_mpa - 0.662).abs() < 1e-9);
}

#[test]
fn test_interface_depth_keys() {
    let out = compute(&two_layer_input(), &SolverConfig::default()).unwrap();
    assert_eq!(out.interfaces[0].depth_m, 0.0);
    assert!((out.interfaces[1].depth_m - 0.20).abs() < 1e-12);
    assert!((out.interfaces[2].depth_m - 0.20).abs() < 1e-12);
    assert_eq!(out.interfaces[1].side, InterfaceSide::Bottom);
    assert_eq!(out.interfaces[1].layer, 0);
    assert_eq!(out.interfaces[2].side, InterfaceSide::Top);
    assert_eq!(out.interfaces[2].layer, 1);
}

#[test]
fn test_depth_points_follow_request_order() {
    let out = compute(&two_layer_input(), &SolverConfig::default()).unwrap();
    let depths: Vec<f64> = out.points.iter().map(|p| p.depth_m).collect();
    assert_eq!(depths, vec![0.0, 0.10, 0.20, 0.50]);
    // 0.50 m 落在基座层
    assert_eq!(out.points[3].layer, 1);
}

#[test]
fn test_twin_wheel_smoke() {
    let mut input = two_layer_input();
    input.load = LoadConfig::twin(Pressure::KiloPascals(662.0), 0.125, 0.375);
    let out = compute(&input, &SolverConfig::default()).unwrap();
    assert!(out.interfaces[0].values.deflection_mm > 0.0);
    for p in &out.interfaces {
        assert!(p.values.all_finite());
    }
}

#[test]
fn test_elapsed_time_reported() {
    let out = compute(&two_layer_input(), &SolverConfig::default()).unwrap();
    assert!(out.diagnostics.elapsed_ms > 0.0);
    assert!(out.diagnostics.node_count > 0);
}
