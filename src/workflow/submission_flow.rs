//! 提交流程 - 流程层
//!
//! 核心职责：管理一次提交的完整生命周期
//!
//! 流程顺序：
//! 1. 选择文件 / 选择波长（独立输入）
//! 2. 提交 → 调用提取服务（同一时间最多一个请求）
//! 3. 成功 → 交给 ArtifactHandler；失败 → 记录错误信息

use tracing::{debug, error, info, warn};

use crate::clients::{ExtractionService, ProcessRequest, UploadPart};
use crate::error::{ArtifactError, ServiceFailure, ValidationError};
use crate::models::{CandidateFile, Payload, StagedFile, WavelengthProfile};
use crate::services::{
    ArtifactHandler, DownloadHandle, FileIntake, IntakeReport, WavelengthSelector,
};
use crate::workflow::submission_state::{Effect, SubmissionEvent, SubmissionState};
use std::path::PathBuf;

/// 提交被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// 没有待提交文件
    NoFiles,
    /// 已有请求进行中
    InFlight,
    /// 状态机没有给出可执行的动作
    InvalidTransition,
}

/// 进行中的请求
///
/// 由 `begin_submit` 创建，必须交回 `complete` 才能结束本次提交
#[derive(Debug)]
pub struct InFlight {
    id: u64,
    wavelength: WavelengthProfile,
    files: Vec<StagedFile>,
}

impl InFlight {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn wavelength(&self) -> WavelengthProfile {
        self.wavelength
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// 读取文件内容，构建提交请求
    pub async fn build_request(&self) -> Result<ProcessRequest, ServiceFailure> {
        let mut parts = Vec::with_capacity(self.files.len());
        for file in &self.files {
            parts.push(UploadPart {
                file_name: file.name().to_string(),
                content: file.read_content().await?,
            });
        }

        Ok(ProcessRequest {
            wavelength: self.wavelength,
            files: parts,
        })
    }
}

/// 提交流程
///
/// - 持有两个独立输入（待提交文件、波长选择）和一个提交状态
/// - 状态只通过 `SubmissionState::on` 转换
/// - 进行中时拒绝新的提交，不依赖界面禁用按钮
pub struct SubmissionFlow<S> {
    service: S,
    intake: FileIntake,
    selector: WavelengthSelector,
    artifacts: ArtifactHandler,
    state: SubmissionState,
    validation_error: Option<ValidationError>,
    /// 重新选择文件后不再展示上一次的失败信息
    failure_dismissed: bool,
    download: Option<DownloadHandle>,
    next_request_id: u64,
    current_request: Option<u64>,
}

/// 提交过程中的取消保护
///
/// `submit` 的 future 在请求结束前被丢弃时，把本次提交记为失败，避免流程停在进行中
struct CancelGuard<'a, S: ExtractionService> {
    flow: &'a mut SubmissionFlow<S>,
    request_id: u64,
}

impl<S: ExtractionService> Drop for CancelGuard<'_, S> {
    fn drop(&mut self) {
        if self.flow.current_request == Some(self.request_id) {
            warn!("⚠️ 提交 #{} 在完成前被取消", self.request_id);
            self.flow.finish(self.request_id, Err(ServiceFailure::Cancelled));
        }
    }
}

impl<S: ExtractionService> SubmissionFlow<S> {
    /// 创建新的提交流程
    pub fn new(service: S, artifacts: ArtifactHandler) -> Self {
        Self {
            service,
            intake: FileIntake::new(),
            selector: WavelengthSelector::default(),
            artifacts,
            state: SubmissionState::Idle,
            validation_error: None,
            failure_dismissed: false,
            download: None,
            next_request_id: 1,
            current_request: None,
        }
    }

    /// 选择文件
    ///
    /// 整体替换待提交文件，更新校验错误，并隐藏上一次提交的失败信息
    pub fn select_files(&mut self, candidates: Vec<CandidateFile>) -> IntakeReport {
        let report = self.intake.select(candidates);
        self.validation_error = report.validation_error();
        self.failure_dismissed = true;
        report
    }

    /// 选择波长组合，不影响任何错误信息
    pub fn select_wavelength(&mut self, profile: WavelengthProfile) {
        self.selector.select(profile);
    }

    /// 开始一次提交
    ///
    /// 成功时清除之前的错误和结果，并返回本次请求的快照
    pub fn begin_submit(&mut self) -> Result<InFlight, SubmitRejected> {
        let staged = self.intake.staged().len();
        let (next, effect) =
            std::mem::take(&mut self.state).on(SubmissionEvent::SubmitRequested { staged });
        self.state = next;

        match effect {
            Effect::IssueRequest => {
                self.validation_error = None;
                self.failure_dismissed = false;
                self.download = None;
                self.artifacts.release();

                let id = self.next_request_id;
                self.next_request_id += 1;
                self.current_request = Some(id);

                info!(
                    "🚀 开始提交 #{}: {} 个文件 | 波长: {}",
                    id,
                    staged,
                    self.selector.selected()
                );

                Ok(InFlight {
                    id,
                    wavelength: self.selector.selected(),
                    files: self.intake.staged().to_vec(),
                })
            }
            Effect::RejectNoFiles => {
                warn!("⚠️ 没有待提交的文件");
                self.validation_error = Some(ValidationError::NoFiles);
                Err(SubmitRejected::NoFiles)
            }
            Effect::RejectInFlight => {
                debug!("已有请求进行中，忽略本次提交");
                Err(SubmitRejected::InFlight)
            }
            Effect::None => {
                error!("❌ 提交请求没有产生动作，当前状态: {:?}", self.state);
                Err(SubmitRejected::InvalidTransition)
            }
        }
    }

    /// 结束一次提交
    ///
    /// 成功时把结果交给 ArtifactHandler，失败时记录展示给用户的信息
    pub fn complete(&mut self, in_flight: InFlight, outcome: Result<Vec<u8>, ServiceFailure>) {
        self.finish(in_flight.id, outcome);
    }

    fn finish(&mut self, id: u64, outcome: Result<Vec<u8>, ServiceFailure>) {
        if self.current_request != Some(id) {
            warn!("忽略过期的请求结果 #{}", id);
            return;
        }
        self.current_request = None;

        let event = match outcome {
            Ok(bytes) => {
                info!("✅ 提交 #{} 成功，收到 {} 字节", id, bytes.len());
                SubmissionEvent::Completed(Ok(Payload::from(bytes)))
            }
            Err(failure) => {
                error!("❌ 提交 #{} 失败: {}", id, failure);
                SubmissionEvent::Completed(Err(failure.user_message()))
            }
        };

        let (next, _) = std::mem::take(&mut self.state).on(event);
        self.state = next;
        self.failure_dismissed = false;

        if let Some(payload) = self.state.payload() {
            self.download = Some(self.artifacts.present(payload.clone()));
        }
    }

    /// 提交并等待结果
    ///
    /// 每次调用最多发出一个请求，不重试。
    /// future 在完成前被丢弃时，本次提交记为失败并显示通用提示。
    pub async fn submit(&mut self) -> Result<&SubmissionState, SubmitRejected> {
        let in_flight = self.begin_submit()?;

        {
            let mut guard = CancelGuard {
                request_id: in_flight.id,
                flow: self,
            };
            let outcome = match in_flight.build_request().await {
                Ok(request) => guard.flow.service.process(request).await,
                Err(failure) => Err(failure),
            };
            guard.flow.complete(in_flight, outcome);
        }

        Ok(&self.state)
    }

    /// 保存最近一次成功的结果
    pub async fn download(&self) -> Result<PathBuf, ArtifactError> {
        match &self.download {
            Some(handle) => self.artifacts.save(handle).await,
            None => Err(ArtifactError::NothingToSave),
        }
    }

    /// 当前展示给用户的错误信息
    ///
    /// 校验错误优先；失败信息在重新选择文件后不再展示
    pub fn error(&self) -> Option<String> {
        if let Some(e) = self.validation_error {
            return Some(e.to_string());
        }
        if self.failure_dismissed {
            return None;
        }
        self.state.failure_message().map(str::to_string)
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        self.intake.staged()
    }

    pub fn wavelength(&self) -> WavelengthProfile {
        self.selector.selected()
    }

    pub fn validation_error(&self) -> Option<ValidationError> {
        self.validation_error
    }

    pub fn download_handle(&self) -> Option<&DownloadHandle> {
        self.download.as_ref()
    }

    pub fn artifacts(&self) -> &ArtifactHandler {
        &self.artifacts
    }
}
