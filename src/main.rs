use anyhow::Result;
use clap::{Parser, Subcommand};
use otdr_submit::app::{wavelength_lines, App};
use otdr_submit::config::Config;
use otdr_submit::utils::logging;
use otdr_submit::WavelengthProfile;
use std::path::PathBuf;

/// 提交 OTDR PDF 报告，下载提取出的 Excel 结果
#[derive(Debug, Parser)]
#[command(name = "otdr-submit", version)]
struct Cli {
    /// TOML 配置文件
    #[arg(long, env = "OTDR_CONFIG")]
    config: Option<PathBuf>,

    /// 提取服务地址（覆盖配置）
    #[arg(long)]
    service_url: Option<String>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 按顺序提交 PDF 并保存结果
    Submit {
        /// 波长组合，例如 "1310nm & 1550nm"
        #[arg(short, long)]
        wavelength: Option<WavelengthProfile>,

        /// 结果保存目录（覆盖配置）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PDF 文件，顺序即提交顺序
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// 列出可选的波长组合
    Wavelengths,
    /// 检查提取服务是否可用
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.service_url {
        config.service_base_url = url;
    }
    if cli.verbose {
        config.verbose_logging = true;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command {
        Command::Wavelengths => {
            for line in wavelength_lines(config.default_wavelength) {
                println!("{}", line);
            }
        }
        Command::Health => {
            App::initialize(config)?.health().await?;
        }
        Command::Submit {
            wavelength,
            output,
            files,
        } => {
            if let Some(output) = output {
                config.output_dir = output;
            }
            let saved = App::initialize(config)?.submit(&files, wavelength).await?;
            println!("{}", saved.display());
        }
    }

    Ok(())
}
