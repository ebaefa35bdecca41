//! 网络配置模块

use std::time::Duration;

// ==================== 常量 ====================

/// 网络配置常量
pub struct Defaults;

impl Defaults {
    /// 默认 User-Agent
    pub const USER_AGENT: &'static str = concat!("nyc-taxi-fetch/", env!("CARGO_PKG_VERSION"));
}

// ==================== 配置结构体 ====================

/// 网络配置
///
/// 控制 HTTP 请求的超时设置。默认不设置任何超时，
/// 请求会一直阻塞直到服务端响应或连接断开
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// HTTP 请求总体超时时间（None 表示不限制）
    pub timeout: Option<Duration>,
    /// HTTP 连接超时时间（None 表示不限制）
    pub connect_timeout: Option<Duration>,
    /// 请求携带的 User-Agent
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfigBuilder::new().build()
    }
}

impl NetworkConfig {
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[inline]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    #[inline]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// 根据配置构建 reqwest 客户端
    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder.build()
    }
}

// ==================== 构建器 ====================

/// 网络配置构建器
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    pub(crate) timeout: Option<Duration>,
    pub(crate) connect_timeout: Option<Duration>,
    pub(crate) user_agent: String,
}

impl NetworkConfigBuilder {
    /// 创建新的网络配置构建器（使用默认值）
    pub fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: Defaults::USER_AGENT.to_string(),
        }
    }

    /// 设置 HTTP 请求总体超时时间
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 设置 HTTP 连接超时时间
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// 设置 User-Agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// 构建网络配置
    pub fn build(self) -> NetworkConfig {
        NetworkConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent,
        }
    }
}

impl Default for NetworkConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== 测试 ====================
