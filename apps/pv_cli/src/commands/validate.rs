// apps/pv_cli/src/commands/validate.rs

//! `validate` 子命令：只做准入校验

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use super::run::PavementJob;

/// `validate` 参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 作业文件路径（JSON）
    pub job: PathBuf,
}

/// 执行 `validate`
pub fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.job)
        .with_context(|| format!("读取作业文件 {} 失败", args.job.display()))?;
    let job: PavementJob = serde_json::from_str(&text)
        .with_context(|| format!("解析作业文件 {} 失败", args.job.display()))?;

    let report = job.input.validate();
    for w in &report.warnings {
        println!("警告: {w}");
    }
    if report.has_errors() {
        for e in &report.errors {
            println!("错误[{}]: {e}", e.kind());
        }
        bail!("输入校验未通过（{} 个错误）", report.error_count());
    }

    println!("输入校验通过（{} 个警告）", report.warning_count());
    Ok(())
}
