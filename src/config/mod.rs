//! # 配置管理模块
//!
//! 提供统一的配置管理系统，支持构建器模式和链式配置
//! 所有配置项必须显式设置，严禁使用默认值

pub mod builders;
pub mod convenience;
pub mod core;

pub use builders::{DatabaseConfigBuilder, LoggingConfigBuilder, OdmConfigBuilder};
pub use convenience::{memory_config, mongodb_config};
pub use self::core::{DatabaseBackend, DatabaseConfig, LogLevel, LoggingConfig, OdmConfig};
