use crate::clients::HttpExtractionClient;
use crate::config::Config;
use crate::error::GENERIC_FAILURE_MESSAGE;
use crate::models::{CandidateFile, WavelengthProfile};
use crate::services::ArtifactHandler;
use crate::utils::logging::{log_intake, log_startup, print_final_result};
use crate::workflow::SubmissionFlow;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// 应用主结构
///
/// 一次命令行调用对应一次完整的"选择文件 → 提交 → 保存结果"
pub struct App {
    config: Config,
    client: HttpExtractionClient,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let client =
            HttpExtractionClient::new(&config).context("无法创建提取服务客户端")?;
        log_startup(&config);
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 提交文件并保存结果
    ///
    /// # 参数
    /// - `files`: PDF 文件路径，顺序即提交顺序
    /// - `wavelength`: 波长组合，未指定时使用配置中的默认值
    ///
    /// # 返回
    /// 返回结果文件的保存路径
    pub async fn submit(
        &self,
        files: &[PathBuf],
        wavelength: Option<WavelengthProfile>,
    ) -> Result<PathBuf> {
        let candidates = load_candidates(files).await?;

        let mut flow = SubmissionFlow::new(
            self.client.clone(),
            ArtifactHandler::new(&self.config.output_dir),
        );

        let report = flow.select_files(candidates);
        log_intake(&report);
        if let Some(error) = flow.validation_error() {
            warn!("⚠️ {}", error);
        }

        flow.select_wavelength(wavelength.unwrap_or(self.config.default_wavelength));

        let submitted = flow.submit().await.map(|_| ());
        if let Err(rejected) = submitted {
            let message = flow
                .error()
                .unwrap_or_else(|| format!("提交被拒绝: {:?}", rejected));
            print_final_result(None, Some(&message));
            return Err(anyhow!(message));
        }

        if flow.state().payload().is_none() {
            let message = flow
                .error()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            print_final_result(None, Some(&message));
            return Err(anyhow!(message));
        }

        let saved = flow.download().await.context("保存结果失败")?;
        print_final_result(Some(&saved), None);
        Ok(saved)
    }

    /// 检查提取服务是否可用
    pub async fn health(&self) -> Result<()> {
        self.client
            .health()
            .await
            .with_context(|| format!("服务不可用: {}", self.client.base_url()))?;
        info!("✅ 服务正常: {}", self.client.base_url());
        Ok(())
    }
}

/// 读取候选文件元数据，保持参数顺序
async fn load_candidates(files: &[PathBuf]) -> Result<Vec<CandidateFile>> {
    let mut candidates = Vec::with_capacity(files.len());
    for path in files {
        let candidate = CandidateFile::from_path(path)
            .await
            .with_context(|| format!("无法读取文件: {}", path.display()))?;
        candidates.push(candidate);
    }
    Ok(candidates)
}

/// 列出所有波长组合，标出当前默认值
pub fn wavelength_lines(default: WavelengthProfile) -> Vec<String> {
    WavelengthProfile::ALL
        .iter()
        .map(|&profile| {
            let marker = if profile == default { " (默认)" } else { "" };
            format!("{}{}", profile.label(), marker)
        })
        .collect()
}
