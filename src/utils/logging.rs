/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use crate::services::IntakeReport;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时默认 info，详细模式下 debug。重复调用是安全的
///
/// # 参数
/// - `verbose`: 是否显示详细日志
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 OTDR 结果提取 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 服务地址: {}", config.service_base_url);
    info!("📁 输出目录: {}", config.output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录文件校验结果
///
/// # 参数
/// - `report`: 文件选择结果
pub fn log_intake(report: &IntakeReport) {
    info!(
        "📄 已接受 {} 个文件，拒绝 {} 个",
        report.accepted.len(),
        report.rejected.len()
    );
    for (index, file) in report.accepted.iter().enumerate() {
        info!("  {}. {} ({} KB)", index + 1, file.name(), file.size() / 1024);
    }
    for file in &report.rejected {
        warn!("  ✗ {} ({}, {} 字节)", file.name, file.media_type, file.size);
    }
}

/// 打印最终结果
///
/// # 参数
/// - `saved_to`: 成功时的保存路径
/// - `error`: 失败时展示给用户的信息
pub fn print_final_result(saved_to: Option<&std::path::Path>, error: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    match (saved_to, error) {
        (Some(path), _) => info!("✅ 处理完成，结果已保存至: {}", path.display()),
        (None, Some(message)) => info!("❌ 处理失败: {}", truncate_text(message, 200)),
        (None, None) => info!("⚠️ 没有生成结果"),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
