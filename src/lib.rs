//! # nyc-taxi-fetch: NYC 出租车数据抓取工具
//!
//! 将 NYC 黄色出租车行程数据（按月的 parquet 文件）与参考数据集
//! （人口、出租车分区、人口普查边界、房产销售表）下载到本地目录树，并解压其中的 zip 压缩包
//!
//! ## 特性
//!
//! - 由配置生成固定顺序的任务表
//! - 幂等：目标文件已存在时跳过下载
//! - 先写入 `.part` 临时文件，完成后再重命名，失败不会留下截断文件
//! - 压缩包解压后删除，并留下解压标记，重复运行不再下载
//! - 使用 `log` crate 进行日志记录
//!
//! ## 示例
//!
//! ```no_run
//! use nyc_taxi_fetch::FetchConfig;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = FetchConfig::builder()
//!         .data_root("data/raw")
//!         .years(vec![2020])
//!         .build();
//!
//!     let summary = nyc_taxi_fetch::fetch_all(&config).await?;
//!     println!("下载 {} 个文件, 跳过 {} 个", summary.downloaded, summary.skipped);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
mod download;
mod task;
pub mod tools {
    pub mod extract;
    pub mod fetch;
    pub mod io_traits;
}

// 重新导出核心类型和函数
pub use config::{FetchConfig, FetchConfigBuilder, NetworkConfig, NetworkConfigBuilder};
pub use download::{DownloadError, DownloadProgress, Fetcher, RunSummary};
pub use task::DownloadTask;

/// 按配置生成任务表并顺序执行
///
/// 使用配置中的网络设置创建 reqwest 客户端
pub async fn fetch_all(config: &FetchConfig) -> anyhow::Result<RunSummary> {
    let client = config.network().build_client()?;
    let tasks = catalog::build_plan(config);
    let summary = Fetcher::new(client).run(&tasks).await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_create_download_task() {
        let task = DownloadTask::file("https://example.com/test.csv", "test.csv");

        assert_eq!(task.url, "https://example.com/test.csv");
        assert_eq!(task.save_path, PathBuf::from("test.csv"));
        assert!(!task.is_archive());
    }
}
