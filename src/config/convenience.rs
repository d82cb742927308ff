//! # 便利配置函数模块
//!
//! 常用数据库配置的便利函数，内部仍走构建器校验

use crate::config::core::{DatabaseBackend, DatabaseConfig};
use crate::error::OdmResult;

/// 创建内存存储配置
pub fn memory_config() -> OdmResult<DatabaseConfig> {
    DatabaseConfig::builder().backend(DatabaseBackend::Memory).build()
}

/// 创建MongoDB配置
///
/// # 参数
///
/// * `uri` - 连接串，例如 `mongodb://localhost:27017`
/// * `database` - 数据库名
pub fn mongodb_config<U: Into<String>, D: Into<String>>(uri: U, database: D) -> OdmResult<DatabaseConfig> {
    DatabaseConfig::builder()
        .backend(DatabaseBackend::MongoDB {
            uri: uri.into(),
            database: database.into(),
        })
        .build()
}
