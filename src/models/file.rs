//! 待提交文件模型
//!
//! `CandidateFile` 是用户选择的原始文件，`StagedFile` 是通过校验后排队等待提交的文件。
//! 两者都只携带元数据和内容来源，内容在构建请求时才读取。

use crate::error::FileError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// PDF 的媒体类型
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// 无法识别扩展名时的媒体类型
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// 文件内容来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// 磁盘上的文件
    Path(PathBuf),
    /// 内存中的数据
    Memory(Arc<[u8]>),
}

/// 用户选择的候选文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// 原始文件名
    pub name: String,
    /// 文件大小（字节）
    pub size: u64,
    /// 声明的媒体类型
    pub media_type: String,
    /// 内容来源
    pub source: FileSource,
}

impl CandidateFile {
    /// 从磁盘路径创建候选文件
    ///
    /// 只读取元数据，媒体类型按扩展名推断，与浏览器文件选择器的行为一致
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| FileError::from_io(path.display().to_string(), e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            media_type: media_type_for(path).to_string(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// 从内存数据创建候选文件
    pub fn in_memory(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Arc<[u8]>>,
    ) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            media_type: media_type.into(),
            source: FileSource::Memory(content),
        }
    }
}

/// 按扩展名推断媒体类型
pub fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// 通过校验的待提交文件
///
/// 只能由 `FileIntake` 创建，保证媒体类型和大小满足要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    candidate: CandidateFile,
}

impl StagedFile {
    pub(crate) fn new(candidate: CandidateFile) -> Self {
        Self { candidate }
    }

    pub fn name(&self) -> &str {
        &self.candidate.name
    }

    pub fn size(&self) -> u64 {
        self.candidate.size
    }

    pub fn media_type(&self) -> &str {
        &self.candidate.media_type
    }

    pub fn source(&self) -> &FileSource {
        &self.candidate.source
    }

    /// 读取文件内容
    pub async fn read_content(&self) -> Result<Vec<u8>, FileError> {
        match &self.candidate.source {
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| FileError::from_io(path.display().to_string(), e)),
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}
