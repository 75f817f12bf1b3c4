//! 提交状态机
//!
//! 状态转换是纯函数：给定当前状态和事件，返回下一个状态以及调用方需要执行的动作。
//! 提交流程只负责执行动作，不自己修改状态。

use crate::models::Payload;

/// 提交状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// 还没有提交过
    #[default]
    Idle,
    /// 请求进行中
    Submitting,
    /// 服务返回了结果
    Succeeded(Payload),
    /// 提交失败，携带展示给用户的信息
    Failed(String),
}

/// 状态机事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// 用户点击提交
    SubmitRequested {
        /// 当前待提交文件数量
        staged: usize,
    },
    /// 请求结束
    Completed(Result<Payload, String>),
}

/// 转换后需要执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// 无需动作
    None,
    /// 发出一次请求
    IssueRequest,
    /// 没有文件，拒绝提交
    RejectNoFiles,
    /// 已有请求进行中，忽略本次提交
    RejectInFlight,
}

impl SubmissionState {
    /// 状态转换
    ///
    /// - 进行中时再次提交会被忽略
    /// - 没有文件时保持原状态
    /// - `Succeeded` / `Failed` 都可以再次提交
    /// - 非进行中收到的 `Completed` 被丢弃
    pub fn on(self, event: SubmissionEvent) -> (SubmissionState, Effect) {
        use SubmissionEvent::*;
        use SubmissionState::*;

        match (self, event) {
            (Submitting, SubmitRequested { .. }) => (Submitting, Effect::RejectInFlight),
            (state, SubmitRequested { staged: 0 }) => (state, Effect::RejectNoFiles),
            (_, SubmitRequested { .. }) => (Submitting, Effect::IssueRequest),
            (Submitting, Completed(Ok(payload))) => (Succeeded(payload), Effect::None),
            (Submitting, Completed(Err(message))) => (Failed(message), Effect::None),
            (state, Completed(_)) => (state, Effect::None),
        }
    }

    /// 是否有请求进行中
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// 成功时的结果
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            SubmissionState::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    /// 失败时的信息
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
