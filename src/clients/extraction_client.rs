/// 提取服务 API 客户端
///
/// 封装所有与远程 OTDR 提取服务相关的调用逻辑
use crate::config::Config;
use crate::error::{AppError, AppResult, ServiceFailure};
use crate::models::WavelengthProfile;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, warn};

/// 一个待上传的 PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    /// 原始文件名
    pub file_name: String,
    /// 文件内容
    pub content: Vec<u8>,
}

/// 一次提交请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    /// 选择的波长组合
    pub wavelength: WavelengthProfile,
    /// 按暂存顺序排列的文件
    pub files: Vec<UploadPart>,
}

/// 提取服务
///
/// 提交流程只依赖这个能力，不关心具体传输方式
pub trait ExtractionService {
    /// 提交文件，成功时返回结果文件的原始字节
    fn process(
        &self,
        request: ProcessRequest,
    ) -> impl Future<Output = Result<Vec<u8>, ServiceFailure>> + Send;
}

/// 错误响应体
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// 健康检查响应体
#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// 提取服务 HTTP 客户端
#[derive(Debug, Clone)]
pub struct HttpExtractionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExtractionClient {
    /// 创建新的提取服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(config.service_base_url.clone())
    }

    /// 使用指定服务地址创建客户端
    pub fn with_base_url(base_url: impl Into<String>) -> AppResult<Self> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Service(ServiceFailure::transport(base_url.clone(), e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 检查服务是否可用
    ///
    /// # 返回
    /// 服务返回 `{"status": "healthy"}` 时成功
    pub async fn health(&self) -> Result<(), ServiceFailure> {
        let endpoint = self.endpoint("health");
        debug!("健康检查: {}", endpoint);

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ServiceFailure::transport(endpoint.clone(), e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceFailure::transport(endpoint.clone(), e))?;

        if !status.is_success() {
            return Err(failure_from_response(status.as_u16(), &body));
        }

        match serde_json::from_slice::<HealthBody>(&body) {
            Ok(health) if health.status == "healthy" => Ok(()),
            Ok(health) => {
                warn!("服务状态异常: {}", health.status);
                Err(ServiceFailure::Status {
                    status: status.as_u16(),
                })
            }
            Err(e) => Err(ServiceFailure::transport(endpoint, e)),
        }
    }

    /// 构建 API 地址
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl ExtractionService for HttpExtractionClient {
    async fn process(&self, request: ProcessRequest) -> Result<Vec<u8>, ServiceFailure> {
        let endpoint = self.endpoint("process");
        debug!(
            "提交 {} 个文件到 {} (波长: {})",
            request.files.len(),
            endpoint,
            request.wavelength
        );

        let form =
            build_form(request).map_err(|e| ServiceFailure::transport(endpoint.clone(), e))?;

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceFailure::transport(endpoint.clone(), e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceFailure::transport(endpoint.clone(), e))?;

        if status.is_success() {
            debug!("服务返回 {} 字节", body.len());
            Ok(body.to_vec())
        } else {
            Err(failure_from_response(status.as_u16(), &body))
        }
    }
}

/// 构建 multipart 表单
///
/// `wavelengths` 在前，随后每个文件一个 `pdfs` 字段，顺序与暂存顺序一致
fn build_form(request: ProcessRequest) -> Result<Form, reqwest::Error> {
    let mut form = Form::new().text("wavelengths", request.wavelength.label());

    for file in request.files {
        let part = Part::bytes(file.content)
            .file_name(file.file_name)
            .mime_str(crate::models::file::PDF_MEDIA_TYPE)?;
        form = form.part("pdfs", part);
    }

    Ok(form)
}

/// 把非 2xx 响应转换为失败原因
///
/// 响应体是带非空字符串 `detail` 的 JSON 对象时保留原文，否则只记录状态码
pub fn failure_from_response(status: u16, body: &[u8]) -> ServiceFailure {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(error) if !error.detail.is_empty() => ServiceFailure::Service {
            status,
            detail: error.detail,
        },
        _ => {
            debug!("无法解析错误响应 (HTTP {}), {} 字节", status, body.len());
            ServiceFailure::Status { status }
        }
    }
}
