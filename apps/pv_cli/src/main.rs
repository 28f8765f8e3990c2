// apps/pv_cli/src/main.rs

//! PaviMech 命令行界面
//!
//! 多层弹性体系路面响应计算的命令行工具。
//!
//! 日志接收器在此安装；核心只发射 `tracing` 事件，
//! 不假定任何全局订阅者存在。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// PaviMech 多层弹性体系求解器命令行工具
#[derive(Parser)]
#[command(name = "pv_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "PaviMech multilayer elastic pavement solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 JSON 作业文件
    Run(commands::run::RunArgs),
    /// 运行内置参考算例
    Scenarios(commands::scenarios::ScenarioArgs),
    /// 校验作业文件的输入合法性
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Scenarios(args) => commands::scenarios::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
