use clap::Parser;
use log::LevelFilter;
use nyc_taxi_fetch::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    #[cfg(not(target_env = "msvc"))]
    use mimalloc::MiMalloc;

    #[cfg(not(target_env = "msvc"))]
    #[global_allocator]
    static GLOBAL: MiMalloc = MiMalloc;

    // 解析命令行参数
    let cli = cli::Cli::parse();

    let log_level = if cli.quiet {
        LevelFilter::Warn // quiet 模式：只显示 WARN 和 ERROR
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let logger_ctrl = cli::init_logger(log_level)
        .map_err(|e| {
            eprintln!("警告: 无法初始化日志系统: {}", e);
        })
        .ok();

    // 执行抓取任务
    if let Err(e) = cli::run(cli, logger_ctrl).await {
        eprintln!("错误: {:?}", e);
        std::process::exit(1);
    }
}
