use clap::Parser;
use std::path::PathBuf;

mod logger;
mod progress;
mod runner;

pub use logger::{LogController, init_logger};

use crate::config::DatasetDefaults;

/// CLI 错误类型
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// 抓取错误
    #[error(transparent)]
    Download(#[from] crate::DownloadError),

    /// HTTP 客户端构建失败
    #[error("创建 HTTP 客户端失败: {0}")]
    Client(#[from] reqwest::Error),
}

/// CLI 结果类型
pub type Result<T> = std::result::Result<T, CliError>;

/// NYC 出租车行程与参考数据下载器
#[derive(Parser, Debug)]
#[command(name = "nyc-taxi-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 数据根目录
    #[arg(short, long, value_name = "DIRECTORY", default_value = DatasetDefaults::DATA_ROOT)]
    pub output: PathBuf,

    /// 下载年份（逗号分隔）
    #[arg(short, long, value_delimiter = ',', default_values_t = DatasetDefaults::YEARS.to_vec())]
    pub years: Vec<u16>,

    /// HTTP 请求总体超时（秒），不指定则不限制
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// HTTP 连接超时（秒），不指定则不限制
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// 只打印任务表，不下载
    #[arg(long)]
    pub dry_run: bool,

    /// 静默模式（不显示进度条）
    #[arg(short, long)]
    pub quiet: bool,

    /// 详细模式（显示调试日志）
    #[arg(short, long)]
    pub verbose: bool,
}

/// 运行 CLI 程序
pub async fn run(cli: Cli, logger_ctrl: Option<LogController>) -> Result<()> {
    runner::execute(&cli, logger_ctrl).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let cli = Cli::try_parse_from(["nyc-taxi-fetch"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("../data/raw"));
        assert_eq!(cli.years, vec![2019, 2020]);
        assert_eq!(cli.timeout, None);
        assert!(!cli.dry_run);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_custom_args() {
        let cli = Cli::try_parse_from([
            "nyc-taxi-fetch",
            "-o",
            "/tmp/raw",
            "--years",
            "2021,2022",
            "--timeout",
            "120",
            "--dry-run",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.output, PathBuf::from("/tmp/raw"));
        assert_eq!(cli.years, vec![2021, 2022]);
        assert_eq!(cli.timeout, Some(120));
        assert!(cli.dry_run);
        assert!(cli.quiet);
    }

    #[test]
    fn test_invalid_year_rejected() {
        assert!(Cli::try_parse_from(["nyc-taxi-fetch", "--years", "twenty"]).is_err());
    }
}
