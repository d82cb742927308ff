//! # 数据库配置构建器模块
//!
//! 提供数据库配置的构建器实现，支持链式调用和严格验证

use crate::config::core::{DatabaseBackend, DatabaseConfig};
use crate::error::OdmError;
use rat_logger::info;

/// 数据库配置构建器
///
/// 严格要求所有配置项必须显式设置，严禁使用默认值
#[derive(Debug, Default)]
pub struct DatabaseConfigBuilder {
    backend: Option<DatabaseBackend>,
}

impl DatabaseConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self { backend: None }
    }

    /// 设置存储后端
    ///
    /// # 参数
    ///
    /// * `backend` - 存储后端
    pub fn backend(mut self, backend: DatabaseBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// 构建数据库配置
    ///
    /// # 错误
    ///
    /// 后端未设置，或MongoDB连接参数为空时返回错误
    pub fn build(self) -> Result<DatabaseConfig, OdmError> {
        let backend = self
            .backend
            .ok_or_else(|| crate::odm_error!(config, "存储后端必须设置"))?;
        let config = DatabaseConfig { backend };
        config.validate()?;

        info!("创建数据库配置: {:?}", config.backend);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_required() {
        let err = DatabaseConfigBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("存储后端必须设置"));
    }

    #[test]
    fn test_mongodb_requires_database_name() {
        let result = DatabaseConfig::builder()
            .backend(DatabaseBackend::MongoDB {
                uri: "mongodb://localhost:27017".into(),
                database: String::new(),
            })
            .build();
        assert!(result.is_err());
    }
}
