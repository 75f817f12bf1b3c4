//! # OTDR Submit
//!
//! 上传按顺序排列的 OTDR PDF 报告，连同波长组合提交给远程提取服务，并保存返回的 Excel 结果
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 纯数据：`WavelengthProfile`、`CandidateFile`、`StagedFile`
//!
//! ### ② 业务能力层（Services / Clients）
//! - `FileIntake` - 按类型和大小校验文件，暂存待提交列表
//! - `WavelengthSelector` - 持有当前波长组合
//! - `ArtifactHandler` - 持有结果并保存为 `Updated_OTDR_Results.xlsx`
//! - `HttpExtractionClient` - 唯一的 HTTP 边界（`POST /process`、`GET /health`）
//!
//! ### ③ 流程层（Workflow）
//! - `SubmissionState` - 提交状态机（Idle → Submitting → Succeeded | Failed），纯函数转换
//! - `SubmissionFlow` - 流程编排，保证同一时间最多一个请求
//!
//! ### ④ 编排层（App）
//! - `app` - 一次命令行调用：读取文件 → 提交 → 保存结果
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{ExtractionService, HttpExtractionClient, ProcessRequest, UploadPart};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CandidateFile, Payload, StagedFile, WavelengthProfile};
pub use services::{ArtifactHandler, DownloadHandle, FileIntake, IntakeReport, WavelengthSelector};
pub use workflow::{SubmissionFlow, SubmissionState, SubmitRejected};
