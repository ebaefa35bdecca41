use futures::StreamExt;
use log::{debug, info};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::task::DownloadTask;
use crate::tools::io_traits::{HttpClient, HttpResponse};

/// Fetch 操作错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求未能发出或未收到响应
    #[error("请求 {url} 失败: {source}")]
    Request {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// HTTP 请求失败
    #[error("HTTP 请求失败，状态码: {status} ({url})")]
    HttpStatus { url: String, status: u16 },

    /// 传输过程中断开
    #[error("读取响应体失败 ({url}): {source}")]
    Stream {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// 响应体为空
    #[error("响应体为空: {0}")]
    EmptyBody(String),

    /// IO 错误
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// 获取并保存完整文件
///
/// 响应体先写入 `<save_path>.part`，全部写完后再重命名为 `save_path`；
/// 任何失败都会删除临时文件，不会在 `save_path` 留下截断的文件
///
/// # Arguments
/// * `client` - HTTP 客户端
/// * `task` - 下载任务
/// * `on_chunk` - 每写入一个数据块后调用，参数为（已下载字节数, 总大小）
///
/// # Returns
///
/// 返回写入的字节数
pub async fn fetch_file<C, F>(client: &C, task: &DownloadTask, mut on_chunk: F) -> Result<u64>
where
    C: HttpClient,
    F: FnMut(u64, Option<u64>),
{
    info!("开始下载: {} -> {:?}", task.url, task.save_path);

    let partial = task.partial_path();
    let result = fetch_to_partial(client, task, &mut on_chunk).await;

    match result {
        Ok(downloaded) => {
            fs::rename(&partial, &task.save_path).await?;
            info!(
                "下载完成: {} ({} bytes) -> {:?}",
                task.url, downloaded, task.save_path
            );
            Ok(downloaded)
        }
        Err(e) => {
            if fs::remove_file(&partial).await.is_ok() {
                debug!("已删除未完成的临时文件: {:?}", partial);
            }
            Err(e)
        }
    }
}

async fn fetch_to_partial<C, F>(client: &C, task: &DownloadTask, on_chunk: &mut F) -> Result<u64>
where
    C: HttpClient,
    F: FnMut(u64, Option<u64>),
{
    let response = client
        .get(&task.url)
        .await
        .map_err(|source| FetchError::Request {
            url: task.url.clone(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus {
            url: task.url.clone(),
            status: response.status().as_u16(),
        });
    }

    let total = response.content_length();
    debug!("响应大小: {:?} bytes ({})", total, task.url);

    let mut file = fs::File::create(task.partial_path()).await?;

    // 流式下载
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| FetchError::Stream {
            url: task.url.clone(),
            source,
        })?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        on_chunk(downloaded, total);
    }

    file.flush().await?;
    file.sync_all().await?;

    if downloaded == 0 {
        return Err(FetchError::EmptyBody(task.url.clone()));
    }

    Ok(downloaded)
}
