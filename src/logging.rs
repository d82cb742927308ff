//! 日志初始化
//!
//! 库本身从不自动安装日志器，调用者按需调用 [`init_logging`]

use crate::config::{LogLevel, LoggingConfig};
use crate::error::OdmResult;
use rat_logger::{LevelFilter, LoggerBuilder, handler::term::TermConfig};

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// 按日志配置安装终端日志器
///
/// `console` 为 false 时不安装任何处理器。
/// 同一进程内重复初始化会返回配置错误。
pub fn init_logging(config: &LoggingConfig) -> OdmResult<()> {
    if !config.console {
        return Ok(());
    }

    LoggerBuilder::new()
        .with_level(LevelFilter::from(config.level))
        .add_terminal_with_config(TermConfig::default())
        .init()
        .map_err(|e| crate::odm_error!(config, format!("初始化日志系统失败: {:?}", e)))?;

    Ok(())
}
