//! rat_cms_odm - 内容管理后端的模式驱动ODM引擎
//!
//! 提供可扩展的字段类型系统、按字段校验、唯一性约束与索引管理，
//! 存储后端通过 [`adapter::Database`] 特征接入，内置内存后端和可选的MongoDB后端

// 导出所有公共模块
pub mod error;
pub mod types;
pub mod field;
pub mod schema;
pub mod model;
pub mod adapter;
pub mod content;
pub mod config;
pub mod logging;

// 重新导出常用类型和函数
pub use error::{OdmError, OdmErrorKind, OdmResult};
pub use types::*;
pub use field::{
    BooleanField, DateField, Field, FieldBuilder, FieldKind, FieldOptions, JsonField, NumberField,
    ReferenceField, TextArrayField, TextField, boolean_field, bounded_text_field, date_field,
    json_field, number_field, reference_field, text_array_field, text_field, timestamp_field,
};
pub use schema::Schema;
pub use model::{Model, ModelInstance, ModelRegistry};
pub use adapter::{Collection, Database, IndexDefinition, MemoryDatabase};
#[cfg(feature = "mongodb-support")]
pub use adapter::MongoDatabase;
pub use config::{
    DatabaseBackend, DatabaseConfig, DatabaseConfigBuilder, LogLevel, LoggingConfig,
    LoggingConfigBuilder, OdmConfig, OdmConfigBuilder, memory_config, mongodb_config,
};
pub use logging::init_logging;

// 日志系统导入
use rat_logger::info;

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 按配置初始化库：安装日志（若启用）并连接存储后端
///
/// 注意：只需要连接存储时可以直接调用 [`DatabaseConfig::connect`]，
/// 日志系统也可以由调用者自行初始化
pub async fn init(config: &OdmConfig) -> OdmResult<std::sync::Arc<dyn Database>> {
    init_logging(&config.logging)?;
    let db = config.database.connect().await?;
    info!("{} 初始化完成，存储后端: {}", get_info(), db.backend());
    Ok(db)
}

/// 生成ObjectId字符串
///
/// 生成类似MongoDB ObjectId的24位十六进制字符串
/// 格式：时间戳(4字节) + 机器ID(3字节) + 进程ID(2字节) + 计数器(3字节)
///
/// # 返回值
/// 返回24位十六进制字符串
pub fn generate_object_id() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    // 获取当前时间戳（秒），截断到4字节
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as u32;

    let counter = COUNTER.fetch_add(1, Ordering::SeqCst) & 0xFF_FFFF;

    // 简单的机器ID（基于进程ID）
    let pid = std::process::id();
    let machine_id = pid.wrapping_mul(2_654_435_761) & 0xFF_FFFF;

    format!(
        "{:08x}{:06x}{:04x}{:06x}",
        timestamp,
        machine_id,
        pid & 0xFFFF,
        counter
    )
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
