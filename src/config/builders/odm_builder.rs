//! # ODM配置构建器模块

use crate::config::core::{DatabaseConfig, LoggingConfig, OdmConfig};
use crate::error::OdmError;
use rat_logger::info;

/// ODM整体配置构建器
#[derive(Debug, Default)]
pub struct OdmConfigBuilder {
    database: Option<DatabaseConfig>,
    logging: Option<LoggingConfig>,
}

impl OdmConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            database: None,
            logging: None,
        }
    }

    /// 设置数据库配置
    pub fn database(mut self, database: DatabaseConfig) -> Self {
        self.database = Some(database);
        self
    }

    /// 设置日志配置
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// 构建ODM配置
    pub fn build(self) -> Result<OdmConfig, OdmError> {
        let database = self
            .database
            .ok_or_else(|| crate::odm_error!(config, "数据库配置必须设置"))?;
        let logging = self
            .logging
            .ok_or_else(|| crate::odm_error!(config, "日志配置必须设置"))?;

        info!("创建ODM配置: 后端={:?}, 日志级别={:?}", database.backend, logging.level);
        Ok(OdmConfig { database, logging })
    }
}
