//! 结果文件服务 - 业务能力层
//!
//! 把服务返回的结果包装成可下载的对象，并在用户要求时保存到输出目录。
//! 同一时间只保留一个结果，新结果会让旧的下载句柄失效。

use crate::error::ArtifactError;
use crate::models::Payload;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 下载时使用的固定文件名
pub const ARTIFACT_FILE_NAME: &str = "Updated_OTDR_Results.xlsx";

/// 下载句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHandle {
    id: u64,
    len: usize,
}

impl DownloadHandle {
    pub fn file_name(&self) -> &'static str {
        ARTIFACT_FILE_NAME
    }

    /// 结果大小（字节）
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
struct Artifact {
    id: u64,
    payload: Payload,
}

/// 结果文件服务
#[derive(Debug)]
pub struct ArtifactHandler {
    output_dir: PathBuf,
    current: Option<Artifact>,
    next_id: u64,
}

impl ArtifactHandler {
    /// 创建新的结果文件服务
    ///
    /// # 参数
    /// - `output_dir`: 保存结果的目录
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            current: None,
            next_id: 1,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 包装结果，不写入磁盘
    ///
    /// 之前的结果会被释放
    pub fn present(&mut self, payload: Payload) -> DownloadHandle {
        self.release();

        let id = self.next_id;
        self.next_id += 1;

        let handle = DownloadHandle {
            id,
            len: payload.len(),
        };
        debug!("结果已就绪: #{} ({} 字节)", id, payload.len());
        self.current = Some(Artifact { id, payload });
        handle
    }

    /// 句柄是否仍然有效
    pub fn is_live(&self, handle: &DownloadHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// 获取句柄对应的结果内容
    pub fn payload(&self, handle: &DownloadHandle) -> Result<&[u8], ArtifactError> {
        self.resolve(handle).map(|artifact| &*artifact.payload)
    }

    /// 释放当前结果
    ///
    /// # 返回
    /// 返回是否真的释放了结果
    pub fn release(&mut self) -> bool {
        match self.current.take() {
            Some(artifact) => {
                debug!("释放结果 #{}", artifact.id);
                true
            }
            None => false,
        }
    }

    /// 保存结果到输出目录
    ///
    /// 先写入临时文件再重命名为 `Updated_OTDR_Results.xlsx`，失败时删除临时文件
    ///
    /// # 返回
    /// 返回保存后的文件路径
    pub async fn save(&self, handle: &DownloadHandle) -> Result<PathBuf, ArtifactError> {
        let artifact = self.resolve(handle)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ArtifactError::WriteFailed {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        let target = self.output_dir.join(ARTIFACT_FILE_NAME);
        let partial = self.output_dir.join(format!(".{}.partial", ARTIFACT_FILE_NAME));

        let written = match tokio::fs::write(&partial, &artifact.payload[..]).await {
            Ok(()) => tokio::fs::rename(&partial, &target).await,
            Err(e) => Err(e),
        };

        if let Err(source) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(ArtifactError::WriteFailed {
                path: target.display().to_string(),
                source,
            });
        }

        info!("💾 结果已保存至: {}", target.display());
        Ok(target)
    }

    fn resolve(&self, handle: &DownloadHandle) -> Result<&Artifact, ArtifactError> {
        match &self.current {
            Some(artifact) if artifact.id == handle.id => Ok(artifact),
            _ => Err(ArtifactError::Revoked),
        }
    }
}
