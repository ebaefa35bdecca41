//! 压缩包解压
//!
//! 使用 `zip` crate 在阻塞线程中解压，调用方在异步上下文中等待结果

use log::debug;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 解压错误类型
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 文件不是有效的 zip 压缩包
    #[error("无效的 zip 压缩包 {path:?}: {source}")]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// 条目路径越出目标目录
    #[error("压缩包条目路径不安全: {0}")]
    UnsafeEntry(String),

    /// IO 错误
    #[error(transparent)]
    Io(#[from] io::Error),

    /// 阻塞任务异常退出
    #[error("解压任务 panic: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

/// 将 zip 压缩包的所有条目解压到目标目录（目录不存在时自动创建）
///
/// # Returns
///
/// 返回解压出的文件数（不含目录条目）
pub async fn extract_zip(archive_path: &Path, target_dir: &Path) -> Result<usize> {
    let archive_path = archive_path.to_path_buf();
    let target_dir = target_dir.to_path_buf();
    tokio::task::spawn_blocking(move || extract_zip_blocking(&archive_path, &target_dir)).await?
}

/// 同步版本的 [`extract_zip`]
pub fn extract_zip_blocking(archive_path: &Path, target_dir: &Path) -> Result<usize> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|source| ExtractError::InvalidArchive {
            path: archive_path.to_path_buf(),
            source,
        })?;

    fs::create_dir_all(target_dir)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|source| ExtractError::InvalidArchive {
                path: archive_path.to_path_buf(),
                source,
            })?;

        let relative = entry
            .enclosed_name()
            .map(Path::to_path_buf)
            .ok_or_else(|| ExtractError::UnsafeEntry(entry.name().to_string()))?;
        let dest = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&dest)?;
        if let Err(e) = copy_entry(&mut entry, &mut outfile, archive_path) {
            drop(outfile);
            let _ = fs::remove_file(&dest);
            return Err(e);
        }
        extracted += 1;
        debug!("解压: {:?}", dest);
    }

    Ok(extracted)
}

/// 复制单个条目
///
/// 读取侧的错误（数据损坏、校验和不匹配）归为 `InvalidArchive`，写入侧的错误保持为 `Io`
fn copy_entry<R: Read, W: Write>(entry: &mut R, out: &mut W, archive_path: &Path) -> Result<u64> {
    const CHUNK_SIZE: usize = 32 * 1024;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        let read = match entry.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ExtractError::InvalidArchive {
                    path: archive_path.to_path_buf(),
                    source: zip::result::ZipError::Io(e),
                });
            }
        };
        out.write_all(&buffer[..read])?;
        copied += read as u64;
    }
    out.flush()?;
    Ok(copied)
}
