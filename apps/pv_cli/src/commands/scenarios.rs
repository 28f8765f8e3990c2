// apps/pv_cli/src/commands/scenarios.rs

//! `scenarios` 子命令：内置参考算例
//!
//! 法国路面设计教材表格算例的快速演示，打印计算值与期望值的偏差。

use clap::Args;

use pv_model::{
    InterfaceBond, LayerStack, LoadConfig, ObservationSet, PavementInput, Pressure,
};
use pv_solver::{compute, ComputeOutput, InterfaceSide, SolverConfig};

/// `scenarios` 参数
#[derive(Args)]
pub struct ScenarioArgs {
    /// 打印完整界面响应表
    #[arg(long)]
    pub full: bool,
}

struct Scenario {
    name: &'static str,
    input: PavementInput,
    /// (描述, 提取函数, 期望值, 容差)
    check: (&'static str, fn(&ComputeOutput) -> f64, f64, f64),
}

fn reference_load() -> LoadConfig {
    LoadConfig::single(Pressure::KiloPascals(662.0), 0.1125)
}

fn scenarios() -> Vec<Scenario> {
    let flexible = PavementInput {
        structure: LayerStack {
            poisson: vec![0.35, 0.35, 0.35],
            young_mpa: vec![5500.0, 600.0, 50.0],
            thickness_m: vec![0.04, 0.15, 1.0e7],
            interfaces: vec![InterfaceBond::Bonded, InterfaceBond::Bonded],
        },
        load: reference_load(),
        observations: ObservationSet::from_depths(vec![0.19]),
    };

    let semi_rigid = |bond| PavementInput {
        structure: LayerStack {
            poisson: vec![0.35, 0.35, 0.35],
            young_mpa: vec![7000.0, 23_000.0, 120.0],
            thickness_m: vec![0.06, 0.15, 1.0e7],
            interfaces: vec![InterfaceBond::Bonded, bond],
        },
        load: reference_load(),
        observations: ObservationSet::from_depths(vec![0.21]),
    };

    fn platform_top_eps_z(out: &ComputeOutput) -> f64 {
        out.interfaces
            .iter()
            .find(|p| p.layer == 2 && p.side == InterfaceSide::Top)
            .expect("界面存在")
            .values
            .eps_z_micro
    }

    fn bound_base_sigma_t(out: &ComputeOutput) -> f64 {
        out.interfaces
            .iter()
            .find(|p| p.layer == 1 && p.side == InterfaceSide::Bottom)
            .expect("界面存在")
            .values
            .sigma_t_mpa
    }

    vec![
        Scenario {
            name: "Tableau I.1 柔性路面",
            input: flexible,
            check: ("基座层顶 εz [µε]", platform_top_eps_z, 711.5, 4.0),
        },
        Scenario {
            name: "Tableau I.5 半刚性（半连续）",
            input: semi_rigid(InterfaceBond::SemiBonded),
            check: ("结合层底 σt [MPa]", bound_base_sigma_t, 0.612, 0.003),
        },
        Scenario {
            name: "Tableau I.5 半刚性（全连续）",
            input: semi_rigid(InterfaceBond::Bonded),
            check: ("结合层底 σt [MPa]", bound_base_sigma_t, 0.815, 0.003),
        },
    ]
}

/// 执行 `scenarios`
pub fn execute(args: ScenarioArgs) -> anyhow::Result<()> {
    let config = SolverConfig::default();
    let mut failures = 0usize;

    for scenario in scenarios() {
        println!("== {} ==", scenario.name);
        let output = compute(&scenario.input, &config)?;

        let (label, extract, expected, tolerance) = scenario.check;
        let got = extract(&output);
        let ok = (got - expected).abs() <= tolerance;
        if !ok {
            failures += 1;
        }
        println!(
            "  {label}: 计算 {got:.3}，期望 {expected:.3} ± {tolerance}  [{}]",
            if ok { "通过" } else { "偏差超限" }
        );

        if args.full {
            super::print_output(&output);
        }
        println!();
    }

    if failures > 0 {
        anyhow::bail!("{failures} 个算例偏差超限");
    }
    Ok(())
}
