use std::path::{Path, PathBuf};

/// 单个文件下载任务
///
/// 以 `save_path` 作为任务标识；`extract_to` 不为空时表示这是一个压缩包任务，
/// 下载完成后需要解压到该目录并删除压缩包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub save_path: PathBuf,
    pub extract_to: Option<PathBuf>,
}

impl DownloadTask {
    /// 创建普通文件任务
    pub fn file(url: impl Into<String>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            save_path: save_path.into(),
            extract_to: None,
        }
    }

    /// 创建压缩包任务
    pub fn archive(
        url: impl Into<String>,
        save_path: impl Into<PathBuf>,
        extract_to: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            save_path: save_path.into(),
            extract_to: Some(extract_to.into()),
        }
    }

    #[inline]
    pub fn is_archive(&self) -> bool {
        self.extract_to.is_some()
    }

    /// 任务显示名称（保存文件名）
    pub fn name(&self) -> String {
        self.save_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.save_path.display().to_string())
    }

    /// 下载过程中使用的临时文件路径：`<save_path>.part`
    pub fn partial_path(&self) -> PathBuf {
        let mut name = self.save_path.as_os_str().to_owned();
        name.push(".part");
        PathBuf::from(name)
    }

    /// 压缩包已解压的标记文件路径：与压缩包同目录的 `.<文件名>.extracted`
    ///
    /// 普通文件任务返回 `None`
    pub fn extracted_marker(&self) -> Option<PathBuf> {
        self.extract_to.as_ref()?;
        let parent = self.save_path.parent().unwrap_or(Path::new(""));
        Some(parent.join(format!(".{}.extracted", self.name())))
    }
}
