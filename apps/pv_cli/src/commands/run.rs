// apps/pv_cli/src/commands/run.rs

//! `run` 子命令：执行 JSON 作业文件

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};

use pv_model::PavementInput;
use pv_solver::{compute, SolverConfig};

/// 作业文件：计算输入 + 可选求解器配置
#[derive(Debug, Serialize, Deserialize)]
pub struct PavementJob {
    /// 计算输入
    pub input: PavementInput,
    /// 求解器配置（缺省用默认值）
    #[serde(default = "SolverConfig::default")]
    pub solver: SolverConfig,
}

/// `run` 参数
#[derive(Args)]
pub struct RunArgs {
    /// 作业文件路径（JSON）
    pub job: PathBuf,

    /// 以 JSON 输出完整结果（默认表格）
    #[arg(long)]
    pub json: bool,
}

/// 执行 `run`
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.job)
        .with_context(|| format!("读取作业文件 {} 失败", args.job.display()))?;
    let job: PavementJob = serde_json::from_str(&text)
        .with_context(|| format!("解析作业文件 {} 失败", args.job.display()))?;

    tracing::info!("running job {}", args.job.display());
    let output = compute(&job.input, &job.solver)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        super::print_output(&output);
    }
    Ok(())
}
