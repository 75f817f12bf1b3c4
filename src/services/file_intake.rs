//! 文件接收服务 - 业务能力层
//!
//! 只负责"校验并暂存用户选择的文件"能力，不读取文件内容

use crate::error::ValidationError;
use crate::models::file::PDF_MEDIA_TYPE;
use crate::models::{CandidateFile, StagedFile};
use tracing::{debug, warn};

/// 单个文件的大小上限（10 MiB）
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// 一次文件选择的结果
#[derive(Debug, Clone, Default)]
pub struct IntakeReport {
    /// 通过校验的文件（保持原始顺序）
    pub accepted: Vec<StagedFile>,
    /// 被拒绝的文件（保持原始顺序）
    pub rejected: Vec<CandidateFile>,
}

impl IntakeReport {
    /// 本次选择产生的校验错误
    ///
    /// 只给出汇总提示，不列出具体文件名
    pub fn validation_error(&self) -> Option<ValidationError> {
        if self.rejected.is_empty() {
            None
        } else {
            Some(ValidationError::RejectedFiles {
                count: self.rejected.len(),
            })
        }
    }
}

/// 文件接收服务
///
/// 职责：
/// - 按媒体类型和大小校验候选文件
/// - 保存当前的待提交文件列表
/// - 每次选择都整体替换之前的列表
#[derive(Debug, Default)]
pub struct FileIntake {
    staged: Vec<StagedFile>,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验并暂存一批文件
    ///
    /// # 参数
    /// - `candidates`: 用户选择的文件，顺序即选择顺序
    ///
    /// # 返回
    /// 返回接受和拒绝的文件
    pub fn select(&mut self, candidates: Vec<CandidateFile>) -> IntakeReport {
        let total = candidates.len();
        let report = partition(candidates);

        if !report.rejected.is_empty() {
            warn!(
                "⚠️ {} 个文件未通过校验 (共 {} 个)",
                report.rejected.len(),
                total
            );
            for file in &report.rejected {
                debug!(
                    "拒绝文件: {} | 类型: {} | 大小: {} 字节",
                    file.name, file.media_type, file.size
                );
            }
        }

        self.staged = report.accepted.clone();
        report
    }

    /// 当前待提交的文件
    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }
}

/// 判断候选文件是否可以提交
pub fn is_acceptable(file: &CandidateFile) -> bool {
    file.media_type == PDF_MEDIA_TYPE && file.size <= MAX_FILE_SIZE
}

/// 将候选文件分为接受和拒绝两组，组内保持原始顺序
pub fn partition(candidates: Vec<CandidateFile>) -> IntakeReport {
    let mut report = IntakeReport::default();
    for candidate in candidates {
        if is_acceptable(&candidate) {
            report.accepted.push(StagedFile::new(candidate));
        } else {
            report.rejected.push(candidate);
        }
    }
    report
}
