use thiserror::Error;

/// 服务失败时展示给用户的通用提示
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred during processing.";

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 提取服务调用错误
    #[error("服务错误: {0}")]
    Service(#[from] ServiceFailure),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 结果文件错误
    #[error("结果文件错误: {0}")]
    Artifact(#[from] ArtifactError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入校验错误
///
/// Display 的文本就是直接展示给用户的提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 部分文件类型或大小不符合要求
    #[error("Some files were rejected. Please upload valid PDF files under 10MB.")]
    RejectedFiles {
        /// 被拒绝的文件数量（只用于日志）
        count: usize,
    },
    /// 提交时没有任何待提交文件
    #[error("Please upload at least one PDF file.")]
    NoFiles,
}

/// 提取服务调用失败
#[derive(Debug, Error)]
pub enum ServiceFailure {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务返回了带 detail 的错误响应
    #[error("服务返回错误 (HTTP {status}): {detail}")]
    Service { status: u16, detail: String },
    /// 服务返回了无法解析的错误响应
    #[error("服务返回错误 (HTTP {status})")]
    Status { status: u16 },
    /// 读取待提交文件失败
    #[error("读取文件失败: {0}")]
    Content(#[from] FileError),
    /// 请求在完成前被取消
    #[error("请求已取消")]
    Cancelled,
}

impl ServiceFailure {
    /// 创建网络请求失败错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ServiceFailure::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 展示给用户的错误信息
    ///
    /// 服务给出了非空 detail 时原样返回，否则返回通用提示
    pub fn user_message(&self) -> String {
        match self {
            ServiceFailure::Service { detail, .. } if !detail.is_empty() => detail.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 结果文件错误
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// 下载句柄已经失效（被新结果替换或已释放）
    #[error("下载句柄已失效")]
    Revoked,
    /// 当前没有可下载的结果
    #[error("没有可下载的结果")]
    NothingToSave,
    /// 写入结果文件失败
    #[error("写入结果文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未知的波长组合
    #[error("未知的波长组合: '{label}'")]
    UnknownWavelength { label: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("无法读取配置文件 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl FileError {
    /// 根据 io 错误类型创建文件错误
    pub fn from_io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            FileError::NotFound { path }
        } else {
            FileError::ReadFailed { path, source }
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
