use log::info;
use std::time::Duration;

use super::progress::ProgressManager;
use super::{Cli, LogController, Result};
use crate::config::{FetchConfig, NetworkConfigBuilder};
use crate::{Fetcher, catalog};

/// 根据 CLI 参数构建抓取配置
pub(super) fn build_config(cli: &Cli) -> FetchConfig {
    let mut network = NetworkConfigBuilder::new();
    if let Some(secs) = cli.timeout {
        network = network.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = cli.connect_timeout {
        network = network.connect_timeout(Duration::from_secs(secs));
    }

    FetchConfig::builder()
        .data_root(&cli.output)
        .years(cli.years.clone())
        .network(network.build())
        .build()
}

/// 执行抓取任务
///
/// 根据 CLI 参数构建配置、生成任务表并顺序执行
pub async fn execute(cli: &Cli, logger_ctrl: Option<LogController>) -> Result<()> {
    let config = build_config(cli);
    let tasks = catalog::build_plan(&config);

    info!(
        "数据根目录: {:?}, 年份: {:?}, 共 {} 个任务",
        config.data_root(),
        config.years(),
        tasks.len()
    );

    if cli.dry_run {
        for task in &tasks {
            match task.extract_to {
                Some(ref dir) => println!("{} -> {:?} (解压到 {:?})", task.url, task.save_path, dir),
                None => println!("{} -> {:?}", task.url, task.save_path),
            }
        }
        return Ok(());
    }

    let client = config.network().build_client()?;
    let fetcher = Fetcher::new(client);

    if cli.quiet {
        // 静默模式：只等待完成
        let summary = fetcher.run(&tasks).await?;
        println!(
            "完成: 下载 {} 个, 跳过 {} 个, 解压 {} 个",
            summary.downloaded, summary.skipped, summary.extracted
        );
        return Ok(());
    }

    // 进度条模式
    let mut progress_manager = ProgressManager::new(logger_ctrl);
    let result = fetcher
        .run_with_progress(&tasks, |progress| progress_manager.handle_progress(progress))
        .await;

    if let Err(ref e) = result {
        progress_manager.abandon(format!("错误: {}", e));
    }
    result?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_build_config_from_args() {
        let cli = Cli::try_parse_from([
            "nyc-taxi-fetch",
            "-o",
            "/tmp/raw",
            "-y",
            "2020",
            "--connect-timeout",
            "5",
        ])
        .unwrap();
        let config = build_config(&cli);

        assert_eq!(config.data_root(), Path::new("/tmp/raw"));
        assert_eq!(config.years(), &[2020]);
        assert_eq!(config.months().len(), 12);
        assert_eq!(config.network().timeout(), None);
        assert_eq!(
            config.network().connect_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("raw");
        let cli = Cli::try_parse_from([
            "nyc-taxi-fetch",
            "--dry-run",
            "-o",
            root.to_str().unwrap(),
        ])
        .unwrap();

        execute(&cli, None).await.unwrap();
        assert!(!root.exists());
    }
}
