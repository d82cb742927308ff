//! # 配置管理模块 - 核心配置类型
//!
//! 所有配置项必须显式设置，构建器不提供默认值

use crate::adapter::Database;
use crate::error::{OdmError, OdmResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use rat_logger::info;

/// ODM整体配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdmConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 数据库配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 存储后端
    pub backend: DatabaseBackend,
}

/// 存储后端
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DatabaseBackend {
    /// 进程内存储
    Memory,
    /// MongoDB
    MongoDB {
        /// 连接串
        uri: String,
        /// 数据库名
        database: String,
    },
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 是否输出到控制台
    pub console: bool,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 错误级别
    Error,
    /// 警告级别
    Warn,
    /// 信息级别
    Info,
    /// 调试级别
    Debug,
    /// 跟踪级别
    Trace,
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

impl OdmConfig {
    /// 创建配置构建器
    pub fn builder() -> super::builders::OdmConfigBuilder {
        super::builders::OdmConfigBuilder::new()
    }

    /// 从配置文件加载配置，`.toml` 按 TOML 解析，其余按 JSON 解析
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> OdmResult<Self> {
        let path = config_path.as_ref();
        let content = std::fs::read_to_string(path).map_err(OdmError::IoError)?;

        let config: OdmConfig = if is_toml(path) {
            toml::from_str(&content)
                .map_err(|e| crate::odm_error!(config, format!("解析TOML配置文件失败: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| crate::odm_error!(config, format!("解析JSON配置文件失败: {}", e)))?
        };
        config.database.validate()?;

        info!("从文件加载配置: {:?}", path);
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, config_path: P) -> OdmResult<()> {
        let path = config_path.as_ref();
        let content = if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| crate::odm_error!(config, format!("序列化TOML配置失败: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| crate::odm_error!(config, format!("序列化JSON配置失败: {}", e)))?
        };

        std::fs::write(path, content).map_err(OdmError::IoError)?;

        info!("保存配置到文件: {:?}", path);
        Ok(())
    }
}

impl DatabaseConfig {
    /// 创建数据库配置构建器
    pub fn builder() -> super::builders::DatabaseConfigBuilder {
        super::builders::DatabaseConfigBuilder::new()
    }

    /// 校验后端参数
    pub fn validate(&self) -> OdmResult<()> {
        if let DatabaseBackend::MongoDB { uri, database } = &self.backend {
            if uri.trim().is_empty() {
                return Err(crate::odm_error!(config, "MongoDB连接串不能为空"));
            }
            if database.trim().is_empty() {
                return Err(crate::odm_error!(config, "MongoDB数据库名不能为空"));
            }
        }
        Ok(())
    }

    /// 按配置连接存储后端
    pub async fn connect(&self) -> OdmResult<Arc<dyn Database>> {
        self.validate()?;
        match &self.backend {
            DatabaseBackend::Memory => {
                info!("使用内存存储后端");
                Ok(Arc::new(crate::adapter::MemoryDatabase::new()))
            }
            #[cfg(feature = "mongodb-support")]
            DatabaseBackend::MongoDB { uri, database } => {
                let db = crate::adapter::MongoDatabase::connect(uri, database).await?;
                Ok(Arc::new(db))
            }
            #[cfg(not(feature = "mongodb-support"))]
            DatabaseBackend::MongoDB { .. } => Err(crate::odm_error!(
                config,
                "MongoDB后端需要启用 mongodb-support 特性"
            )),
        }
    }
}

impl LoggingConfig {
    /// 创建日志配置构建器
    pub fn builder() -> super::builders::LoggingConfigBuilder {
        super::builders::LoggingConfigBuilder::new()
    }
}
