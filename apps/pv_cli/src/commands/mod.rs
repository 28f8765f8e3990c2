// apps/pv_cli/src/commands/mod.rs

//! 子命令实现

pub mod run;
pub mod scenarios;
pub mod validate;

use pv_solver::ComputeOutput;

/// 以表格形式打印计算结果
pub fn print_output(output: &ComputeOutput) {
    println!();
    println!("界面响应表");
    println!(
        "{:>4} {:>6} {:>8}  {:>9} {:>9} {:>9}  {:>9} {:>9}  {:>8}",
        "层", "位置", "深度[m]", "σz[MPa]", "σt[MPa]", "τ[MPa]", "εz[µε]", "εt[µε]", "w[mm]"
    );
    for p in &output.interfaces {
        let side = match p.side {
            pv_solver::InterfaceSide::Top => "顶",
            pv_solver::InterfaceSide::Bottom => "底",
        };
        println!(
            "{:>4} {:>6} {:>8.3}  {:>9.3} {:>9.3} {:>9.3}  {:>9.1} {:>9.1}  {:>8.2}",
            p.layer,
            side,
            p.depth_m,
            p.values.sigma_z_mpa,
            p.values.sigma_t_mpa,
            p.values.tau_mpa,
            p.values.eps_z_micro,
            p.values.eps_t_micro,
            p.values.deflection_mm
        );
    }

    if !output.points.is_empty() {
        println!();
        println!("请求深度响应");
        println!(
            "{:>8} {:>4}  {:>9} {:>9}  {:>9} {:>9}  {:>8}",
            "深度[m]", "层", "σz[MPa]", "σt[MPa]", "εz[µε]", "εt[µε]", "w[mm]"
        );
        for p in &output.points {
            println!(
                "{:>8.3} {:>4}  {:>9.3} {:>9.3}  {:>9.1} {:>9.1}  {:>8.2}",
                p.depth_m,
                p.layer,
                p.values.sigma_z_mpa,
                p.values.sigma_t_mpa,
                p.values.eps_z_micro,
                p.values.eps_t_micro,
                p.values.deflection_mm
            );
        }
    }

    println!();
    println!(
        "节点 {}（跳过 {}），耗时 {:.1} ms",
        output.diagnostics.node_count,
        output.diagnostics.skipped_nodes,
        output.diagnostics.elapsed_ms
    );
}
