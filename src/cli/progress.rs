use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressStyle};
use std::time::Instant;

use super::LogController;
use crate::DownloadProgress;

const BAR_TEMPLATE: &str =
    "{prefix:.bold} {spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {msg}";
const SPINNER_TEMPLATE: &str = "{prefix:.bold} {spinner:.green} [{elapsed_precise}] {bytes} {msg}";

/// 进度条管理器
///
/// 每个任务一条进度条，任务结束后保留最终状态
pub struct ProgressManager {
    /// 当前任务的进度条
    current: Option<ProgressBar>,
    /// 当前进度条是否已设置总大小
    sized: bool,
    /// 日志控制器，用于让日志经由进度条输出
    logger: Option<LogController>,
    started_at: Instant,
}

impl ProgressManager {
    pub fn new(logger: Option<LogController>) -> Self {
        Self {
            current: None,
            sized: false,
            logger,
            started_at: Instant::now(),
        }
    }

    /// 处理抓取进度更新
    pub fn handle_progress(&mut self, progress: DownloadProgress) {
        match progress {
            DownloadProgress::TaskStarted { index, total, name } => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(style(SPINNER_TEMPLATE));
                bar.set_prefix(format!("[{}/{}]", index, total));
                bar.set_message(name);
                self.sized = false;
                if let Some(ref logger) = self.logger {
                    logger.set_progress_bar(bar.clone());
                }
                self.current = Some(bar);
            }

            DownloadProgress::Bytes { downloaded, total } => {
                if let Some(ref bar) = self.current {
                    if !self.sized
                        && let Some(total) = total
                    {
                        bar.set_style(style(BAR_TEMPLATE));
                        bar.set_length(total);
                        self.sized = true;
                    }
                    bar.set_position(downloaded);
                }
            }

            DownloadProgress::Skipped { name, .. } => {
                self.finish_current(format!("{} 已下载，跳过", name));
            }

            DownloadProgress::AlreadyExtracted { name } => {
                self.finish_current(format!("{} 已解压，跳过", name));
            }

            DownloadProgress::Downloaded { name, bytes } => {
                self.finish_current(format!("{} 完成 ({})", name, HumanBytes(bytes)));
            }

            DownloadProgress::Extracted {
                name,
                target,
                files,
            } => {
                self.finish_current(String::new());
                println!("已解压 {} -> {:?} ({} 个文件)", name, target, files);
            }

            DownloadProgress::Completed(summary) => {
                self.finish_current(String::new());
                println!(
                    "完成！下载 {} 个 ({}), 跳过 {} 个, 解压 {} 个, 耗时 {}",
                    summary.downloaded,
                    HumanBytes(summary.bytes),
                    summary.skipped,
                    summary.extracted,
                    HumanDuration(self.started_at.elapsed())
                );
            }
        }
    }

    /// 放弃当前进度条（出错时调用）
    pub fn abandon(&mut self, message: String) {
        if let Some(bar) = self.current.take() {
            bar.abandon_with_message(message);
        }
        self.detach_logger();
    }

    fn finish_current(&mut self, message: String) {
        if let Some(bar) = self.current.take() {
            if message.is_empty() {
                bar.finish();
            } else {
                bar.finish_with_message(message);
            }
        }
        self.detach_logger();
    }

    fn detach_logger(&self) {
        if let Some(ref logger) = self.logger {
            logger.clear_progress_bar();
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunSummary;
    use std::path::PathBuf;

    #[test]
    fn test_task_lifecycle() {
        let mut manager = ProgressManager::new(Some(LogController::default()));

        manager.handle_progress(DownloadProgress::TaskStarted {
            index: 1,
            total: 2,
            name: "a.csv".to_string(),
        });
        let bar = manager.current.clone().unwrap();

        manager.handle_progress(DownloadProgress::Bytes {
            downloaded: 50,
            total: Some(100),
        });
        assert_eq!(bar.length(), Some(100));
        assert_eq!(bar.position(), 50);

        manager.handle_progress(DownloadProgress::Downloaded {
            name: "a.csv".to_string(),
            bytes: 100,
        });
        assert!(bar.is_finished());
        assert!(manager.current.is_none());
    }

    #[test]
    fn test_skip_finishes_bar() {
        let mut manager = ProgressManager::new(None);
        manager.handle_progress(DownloadProgress::TaskStarted {
            index: 1,
            total: 1,
            name: "a.csv".to_string(),
        });
        let bar = manager.current.clone().unwrap();

        manager.handle_progress(DownloadProgress::Skipped {
            name: "a.csv".to_string(),
            path: PathBuf::from("a.csv"),
        });
        assert!(bar.is_finished());

        manager.handle_progress(DownloadProgress::Completed(RunSummary::default()));
        assert!(manager.current.is_none());
    }
}
