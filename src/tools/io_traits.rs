//! IO抽象层：HTTP客户端trait
//!
//! 为HTTP客户端操作提供trait抽象，便于测试

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::StatusCode;
use std::pin::Pin;

/// HTTP客户端trait
///
/// 抽象HTTP客户端的核心操作
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// HTTP响应类型
    type Response: HttpResponse;

    /// 发送GET请求
    async fn get(&self, url: &str) -> Result<Self::Response>;
}

/// HTTP响应trait
///
/// 抽象HTTP响应的核心操作
pub trait HttpResponse: Send {
    /// 字节流类型
    type BytesStream: Stream<Item = Result<Bytes>> + Send + Unpin;

    /// 获取HTTP状态码
    fn status(&self) -> StatusCode;

    /// 响应体长度（来自 Content-Length，未知时为 None）
    fn content_length(&self) -> Option<u64>;

    /// 获取字节流
    fn bytes_stream(self) -> Self::BytesStream;
}

// ============================================================================
// 为真实类型实现trait
// ============================================================================

/// reqwest::Response的字节流包装器
pub struct ReqwestBytesStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
}

impl Stream for ReqwestBytesStream {
    type Item = Result<Bytes>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner)
            .poll_next(cx)
            .map(|opt| opt.map(|res| res.map_err(|e| anyhow::anyhow!(e))))
    }
}

/// 为reqwest::Client实现HttpClient
#[async_trait]
impl HttpClient for reqwest::Client {
    type Response = reqwest::Response;

    async fn get(&self, url: &str) -> Result<Self::Response> {
        reqwest::Client::get(self, url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP GET请求失败: {}", e))
    }
}

/// 为reqwest::Response实现HttpResponse
impl HttpResponse for reqwest::Response {
    type BytesStream = ReqwestBytesStream;

    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }

    fn content_length(&self) -> Option<u64> {
        reqwest::Response::content_length(self)
    }

    fn bytes_stream(self) -> Self::BytesStream {
        ReqwestBytesStream {
            inner: Box::pin(reqwest::Response::bytes_stream(self)),
        }
    }
}

// ============================================================================
// 测试用的 Mock 实现
// ============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use futures::stream;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock HTTP 响应
    pub struct MockHttpResponse {
        pub status: StatusCode,
        pub body: Bytes,
        /// 在流的末尾注入一个错误，模拟传输中断
        pub fail_mid_stream: bool,
    }

    impl HttpResponse for MockHttpResponse {
        type BytesStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

        fn status(&self) -> StatusCode {
            self.status
        }

        fn content_length(&self) -> Option<u64> {
            Some(self.body.len() as u64)
        }

        fn bytes_stream(self) -> Self::BytesStream {
            // 将 body 按块分割，模拟真实的流式传输
            let chunk_size = 8192;
            let bytes = self.body;
            let mut chunks: Vec<Result<Bytes>> = (0..bytes.len())
                .step_by(chunk_size)
                .map(|i| Ok(bytes.slice(i..(i + chunk_size).min(bytes.len()))))
                .collect();

            if self.fail_mid_stream {
                chunks.push(Err(anyhow::anyhow!("connection reset")));
            }

            Box::pin(stream::iter(chunks))
        }
    }

    /// Mock HTTP 客户端
    ///
    /// 支持预设响应和请求记录；同一 URL 的响应可以被多次请求
    #[derive(Clone, Default)]
    pub struct MockHttpClient {
        /// GET 请求的响应：URL -> (状态码, 响应体, 是否中途失败)
        responses: Arc<Mutex<HashMap<String, (StatusCode, Bytes, bool)>>>,
        /// 记录所有请求
        request_log: Arc<Mutex<Vec<String>>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// 设置 GET 请求的响应
        pub fn set_response(&self, url: impl Into<String>, status: StatusCode, body: Bytes) {
            self.responses
                .lock()
                .unwrap()
                .insert(url.into(), (status, body, false));
        }

        /// 设置一个传输中途断开的响应
        pub fn set_broken_response(&self, url: impl Into<String>, body: Bytes) {
            self.responses
                .lock()
                .unwrap()
                .insert(url.into(), (StatusCode::OK, body, true));
        }

        /// 获取请求日志
        pub fn get_request_log(&self) -> Vec<String> {
            self.request_log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        type Response = MockHttpResponse;

        async fn get(&self, url: &str) -> Result<Self::Response> {
            self.request_log.lock().unwrap().push(format!("GET {}", url));

            let (status, body, fail_mid_stream) = self
                .responses
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("未找到预设 GET 响应: {}", url))?;

            Ok(MockHttpResponse {
                status,
                body,
                fail_mid_stream,
            })
        }
    }
}
