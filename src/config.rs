//! 抓取配置模块
//!
//! 描述数据根目录、年份、月份、行政区以及网络设置，按功能域分类组织

pub mod network;

pub use network::{NetworkConfig, NetworkConfigBuilder};

use std::path::{Path, PathBuf};

// ==================== 常量结构体 ====================

/// 数据集配置常量
pub struct DatasetDefaults;

impl DatasetDefaults {
    /// 数据根目录（相对于脚本所在目录的上一级）
    pub const DATA_ROOT: &'static str = "../data/raw";
    /// 下载年份：2019、2020
    pub const YEARS: &'static [u16] = &[2019, 2020];
    /// 下载月份：1 ~ 12
    pub const MONTHS: &'static [u32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
    /// 房产销售数据覆盖的行政区
    pub const BOROUGHS: &'static [&'static str] =
        &["manhattan", "bronx", "queens", "statenisland", "brooklyn"];
}

// ==================== 主配置结构体 ====================

/// 抓取配置
///
/// 决定 [`crate::catalog::build_plan`] 生成哪些任务，以及客户端如何发起请求
#[derive(Debug, Clone)]
pub struct FetchConfig {
    data_root: PathBuf,
    years: Vec<u16>,
    months: Vec<u32>,
    boroughs: Vec<String>,
    network: NetworkConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfigBuilder::new().build()
    }
}

impl FetchConfig {
    /// 创建配置构建器
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::new()
    }

    #[inline]
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    #[inline]
    pub fn years(&self) -> &[u16] {
        &self.years
    }

    #[inline]
    pub fn months(&self) -> &[u32] {
        &self.months
    }

    #[inline]
    pub fn boroughs(&self) -> &[String] {
        &self.boroughs
    }

    #[inline]
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

// ==================== 构建器 ====================

/// 抓取配置构建器
#[derive(Debug, Clone)]
pub struct FetchConfigBuilder {
    data_root: PathBuf,
    years: Vec<u16>,
    months: Vec<u32>,
    boroughs: Vec<String>,
    network: NetworkConfig,
}

impl FetchConfigBuilder {
    /// 创建新的配置构建器（使用默认值）
    pub fn new() -> Self {
        Self {
            data_root: PathBuf::from(DatasetDefaults::DATA_ROOT),
            years: DatasetDefaults::YEARS.to_vec(),
            months: DatasetDefaults::MONTHS.to_vec(),
            boroughs: DatasetDefaults::BOROUGHS
                .iter()
                .map(|b| b.to_string())
                .collect(),
            network: NetworkConfig::default(),
        }
    }

    /// 设置数据根目录
    pub fn data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_root = root.into();
        self
    }

    /// 设置年份列表（空列表时保留默认值）
    pub fn years(mut self, years: Vec<u16>) -> Self {
        if !years.is_empty() {
            self.years = years;
        }
        self
    }

    /// 设置月份列表
    ///
    /// 超出 1..=12 的值会被丢弃，空列表时保留默认值
    pub fn months(mut self, months: Vec<u32>) -> Self {
        let months: Vec<u32> = months
            .into_iter()
            .filter(|m| (1..=12).contains(m))
            .collect();
        if !months.is_empty() {
            self.months = months;
        }
        self
    }

    /// 设置行政区列表（空列表时保留默认值）
    pub fn boroughs(mut self, boroughs: Vec<String>) -> Self {
        if !boroughs.is_empty() {
            self.boroughs = boroughs;
        }
        self
    }

    /// 设置网络配置
    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// 构建抓取配置
    pub fn build(self) -> FetchConfig {
        FetchConfig {
            data_root: self.data_root,
            years: self.years,
            months: self.months,
            boroughs: self.boroughs,
            network: self.network,
        }
    }
}

impl Default for FetchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== 测试 ====================
