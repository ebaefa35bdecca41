//! 数据目录：根据配置生成有序的下载任务表
//!
//! 顺序固定为：按年、月排列的出租车行程文件，其后是外部参考数据集，
//! 压缩包的解压在所有下载完成之后进行

use std::path::Path;

use crate::config::FetchConfig;
use crate::task::DownloadTask;

/// TLC 行程数据 URL 前缀，后接 `<YEAR>-<MM>.parquet`
pub const TLC_URL_TEMPLATE: &str = "https://d37ci6vzurychx.cloudfront.net/trip-data/yellow_tripdata_";

/// 房产年度销售数据 URL 前缀，后接 `/<YEAR>/<YEAR>_<borough>.xlsx`
pub const PROPERTY_SALES_URL_TEMPLATE: &str =
    "https://www1.nyc.gov/assets/finance/downloads/pdf/rolling_sales/annualized-sales";

/// 行程数据目录前缀，后接年份
pub const TRIP_DIR_PREFIX: &str = "yellow_taxi_data_";

/// 外部数据与出租车分区目录
pub const EXTERNAL_DIR: &str = "external_data_and_taxi_zones";

/// 外部数据集的解压方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unpack {
    /// 普通文件，不解压
    None,
    /// 解压到外部数据目录本身
    IntoExternalDir,
    /// 解压到外部数据目录下的同名子目录
    IntoSubdir(&'static str),
}

/// 固定的外部数据集：(文件名, URL, 解压方式)
const EXTERNAL_DATASETS: &[(&str, &str, Unpack)] = &[
    (
        "nyc_population_by_neighborhood.csv",
        "https://data.cityofnewyork.us/api/views/swpk-hqdp/rows.csv?accessType=DOWNLOAD",
        Unpack::None,
    ),
    (
        "taxi_zone_lookup.csv",
        "https://s3.amazonaws.com/nyc-tlc/misc/taxi+_zone_lookup.csv",
        Unpack::None,
    ),
    (
        "nyc_2010_census.zip",
        "https://www1.nyc.gov/assets/planning/download/zip/data-maps/open-data/nynta2010_22b.zip",
        Unpack::IntoExternalDir,
    ),
    (
        "taxi_zones.zip",
        "https://d37ci6vzurychx.cloudfront.net/misc/taxi_zones.zip",
        Unpack::IntoSubdir("taxi_zones"),
    ),
];

/// 将月份格式化为两位数字（左侧补零）
///
/// # Example
/// ```
/// # use nyc_taxi_fetch::catalog::format_month;
/// assert_eq!(format_month(1), "01");
/// assert_eq!(format_month(12), "12");
/// ```
pub fn format_month(month: u32) -> String {
    format!("{:02}", month)
}

/// 指定年月的行程数据 URL
pub fn taxi_trip_url(year: u16, month: u32) -> String {
    format!("{}{}-{}.parquet", TLC_URL_TEMPLATE, year, format_month(month))
}

/// 房产销售数据 URL 中的行政区文件名片段
///
/// Staten Island 在 2020 年的文件名改为 `staten_island`，其余组合与行政区名相同
pub fn borough_file_segment<'a>(borough: &'a str, year: &str) -> &'a str {
    if borough == "statenisland" && year == "2020" {
        "staten_island"
    } else {
        borough
    }
}

/// 指定行政区与年份的房产销售数据 URL
pub fn property_sales_url(borough: &str, year: u16) -> String {
    let year = year.to_string();
    format!(
        "{}/{}/{}_{}.xlsx",
        PROPERTY_SALES_URL_TEMPLATE,
        year,
        year,
        borough_file_segment(borough, &year)
    )
}

/// 生成完整的下载任务表
pub fn build_plan(config: &FetchConfig) -> Vec<DownloadTask> {
    let mut tasks = trip_tasks(config);
    tasks.extend(external_tasks(config));
    tasks
}

/// 行程数据任务：按年份、月份排列
pub fn trip_tasks(config: &FetchConfig) -> Vec<DownloadTask> {
    let root = config.data_root();
    config
        .years()
        .iter()
        .flat_map(|&year| {
            let dir = root.join(format!("{}{}", TRIP_DIR_PREFIX, year));
            config.months().iter().map(move |&month| {
                DownloadTask::file(
                    taxi_trip_url(year, month),
                    dir.join(format!("{}-{}.parquet", year, format_month(month))),
                )
            })
        })
        .collect()
}

/// 外部数据集任务：固定数据集在前，房产销售数据按行政区、年份排列在后
pub fn external_tasks(config: &FetchConfig) -> Vec<DownloadTask> {
    let external_dir = config.data_root().join(EXTERNAL_DIR);

    let mut tasks: Vec<DownloadTask> = EXTERNAL_DATASETS
        .iter()
        .map(|&(name, url, unpack)| dataset_task(&external_dir, name, url, unpack))
        .collect();

    for borough in config.boroughs() {
        for &year in config.years() {
            tasks.push(DownloadTask::file(
                property_sales_url(borough, year),
                external_dir.join(format!("{}_{}.xlsx", year, borough)),
            ));
        }
    }

    tasks
}

fn dataset_task(external_dir: &Path, name: &str, url: &str, unpack: Unpack) -> DownloadTask {
    let save_path = external_dir.join(name);
    match unpack {
        Unpack::None => DownloadTask::file(url, save_path),
        Unpack::IntoExternalDir => DownloadTask::archive(url, save_path, external_dir),
        Unpack::IntoSubdir(dir) => DownloadTask::archive(url, save_path, external_dir.join(dir)),
    }
}
