//! 顺序抓取执行器
//!
//! 按声明顺序逐个处理任务：先完成所有下载，再依次解压压缩包。
//! 文件系统是唯一的持久状态，`save_path` 上存在普通文件即视为已下载

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::task::DownloadTask;
use crate::tools::extract::{self, ExtractError};
use crate::tools::fetch::{self, FetchError};
use crate::tools::io_traits::HttpClient;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum DownloadError {
    /// 创建目录失败
    #[error("创建目录 {path:?} 失败: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 下载失败
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// 解压失败
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// 其他 IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DownloadError>;

/// 抓取进度更新信息
#[derive(Debug, Clone)]
pub enum DownloadProgress {
    /// 开始处理某个任务
    TaskStarted {
        /// 任务序号（从 1 开始）
        index: usize,
        /// 任务总数
        total: usize,
        /// 任务名称
        name: String,
    },
    /// 目标文件已存在，跳过下载
    Skipped { name: String, path: PathBuf },
    /// 压缩包已在之前的运行中解压，跳过
    AlreadyExtracted { name: String },
    /// 已接收的字节数
    Bytes {
        downloaded: u64,
        /// 响应体总大小（未知时为 None）
        total: Option<u64>,
    },
    /// 任务下载完成
    Downloaded { name: String, bytes: u64 },
    /// 压缩包解压完成
    Extracted {
        name: String,
        target: PathBuf,
        /// 解压出的文件数
        files: usize,
    },
    /// 全部任务完成
    Completed(RunSummary),
}

/// 一次运行的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 实际下载的任务数
    pub downloaded: usize,
    /// 因已存在而跳过的任务数（含已解压的压缩包）
    pub skipped: usize,
    /// 解压的压缩包数
    pub extracted: usize,
    /// 下载的总字节数
    pub bytes: u64,
}

/// 顺序抓取执行器
///
/// 单线程顺序执行，不做重试；任何错误都会终止本次运行，
/// 已完成的文件保留在磁盘上，下次运行时会被跳过
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// 执行任务表
    pub async fn run(&self, tasks: &[DownloadTask]) -> Result<RunSummary> {
        self.run_with_progress(tasks, |_| {}).await
    }

    /// 执行任务表，并在每次进度更新时调用回调
    pub async fn run_with_progress<F>(
        &self,
        tasks: &[DownloadTask],
        mut callback: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(DownloadProgress),
    {
        debug_assert!(
            has_unique_paths(tasks),
            "save_path must be unique within a run"
        );

        let mut summary = RunSummary::default();
        let mut pending_archives: Vec<&DownloadTask> = Vec::new();
        let total = tasks.len();

        for (i, task) in tasks.iter().enumerate() {
            let name = task.name();
            callback(DownloadProgress::TaskStarted {
                index: i + 1,
                total,
                name: name.clone(),
            });
            info!("开始 {}", name);

            ensure_parent_dir(&task.save_path).await?;

            if is_regular_file(&task.save_path).await {
                info!("{} 已下载，跳过", name);
                summary.skipped += 1;
                callback(DownloadProgress::Skipped {
                    name: name.clone(),
                    path: task.save_path.clone(),
                });
            } else if let Some(marker) = task.extracted_marker()
                && is_regular_file(&marker).await
            {
                info!("{} 已解压，跳过", name);
                summary.skipped += 1;
                callback(DownloadProgress::AlreadyExtracted { name: name.clone() });
                info!("完成 {}", name);
                continue;
            } else {
                let bytes = fetch::fetch_file(&self.client, task, |downloaded, size| {
                    callback(DownloadProgress::Bytes {
                        downloaded,
                        total: size,
                    })
                })
                .await?;
                summary.downloaded += 1;
                summary.bytes += bytes;
                callback(DownloadProgress::Downloaded {
                    name: name.clone(),
                    bytes,
                });
            }

            if task.is_archive() {
                pending_archives.push(task);
            }
            info!("完成 {}", name);
        }

        for task in pending_archives {
            let files = self.extract_archive(task).await?;
            summary.extracted += 1;
            callback(DownloadProgress::Extracted {
                name: task.name(),
                target: task.extract_to.clone().unwrap_or_default(),
                files,
            });
        }

        info!(
            "全部完成: 下载 {} 个, 跳过 {} 个, 解压 {} 个",
            summary.downloaded, summary.skipped, summary.extracted
        );
        callback(DownloadProgress::Completed(summary));

        Ok(summary)
    }

    /// 解压压缩包任务，成功后写入解压标记并删除压缩包
    ///
    /// 压缩包损坏或含有不安全条目时删除该文件，使下次运行重新下载
    async fn extract_archive(&self, task: &DownloadTask) -> Result<usize> {
        let Some(target) = task.extract_to.as_deref() else {
            return Ok(0);
        };

        let files = match extract::extract_zip(&task.save_path, target).await {
            Ok(files) => files,
            Err(e @ (ExtractError::InvalidArchive { .. } | ExtractError::UnsafeEntry(_))) => {
                warn!("压缩包损坏，删除以便重新下载: {:?}", task.save_path);
                if let Err(remove_err) = fs::remove_file(&task.save_path).await {
                    warn!("删除损坏的压缩包失败: {}", remove_err);
                }
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(marker) = task.extracted_marker() {
            fs::write(&marker, task.url.as_bytes()).await?;
            debug!("写入解压标记: {:?}", marker);
        }
        fs::remove_file(&task.save_path).await?;

        info!("解压完成 {:?} -> {:?} ({} 个文件)", task.save_path, target, files);
        Ok(files)
    }
}

/// 确保父目录存在（已存在时不报错）
async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| DownloadError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}

async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

fn has_unique_paths(tasks: &[DownloadTask]) -> bool {
    let mut seen = std::collections::HashSet::new();
    tasks.iter().all(|t| seen.insert(&t.save_path))
}
