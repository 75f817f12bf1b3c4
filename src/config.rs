use crate::error::{AppResult, ConfigError};
use crate::models::WavelengthProfile;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 程序配置
///
/// 优先级：命令行参数 > 环境变量 > 配置文件 > 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 提取服务地址
    pub service_base_url: String,
    /// 结果文件保存目录
    pub output_dir: PathBuf,
    /// 默认波长组合
    pub default_wavelength: WavelengthProfile,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_base_url: "http://localhost:8000".to_string(),
            output_dir: PathBuf::from("."),
            default_wavelength: WavelengthProfile::default(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置
    ///
    /// # 参数
    /// - `path`: 可选的 TOML 配置文件，缺失字段使用默认值
    ///
    /// # 返回
    /// 返回叠加了环境变量后的配置
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.apply_env()
    }

    /// 只从环境变量加载
    pub fn from_env() -> AppResult<Self> {
        Self::default().apply_env()
    }

    /// 从 TOML 文件加载
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }

    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: String::new(),
            source,
        })
    }

    /// 用环境变量覆盖配置
    fn apply_env(self) -> AppResult<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        if let Some(url) = var("OTDR_SERVICE_URL") {
            self.service_base_url = url;
        }
        if let Some(dir) = var("OTDR_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(label) = var("OTDR_WAVELENGTH") {
            self.default_wavelength = label.parse()?;
        }
        if let Some(value) = var("VERBOSE_LOGGING") {
            self.verbose_logging = value.parse().map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: "VERBOSE_LOGGING".to_string(),
                value,
                expected_type: "bool".to_string(),
            })?;
        }
        Ok(self)
    }
}
