//! 错误处理模块
//!
//! 定义ODM层统一的错误类型。每个模型操作只返回一个结果：
//! 成功值或者下面的某一种错误，内部不做任何重试或恢复。

use thiserror::Error;

/// ODM错误类型
#[derive(Error, Debug)]
pub enum OdmError {
    /// 字段校验失败，消息由字段自身给出并且包含字段名
    #[error("{message}")]
    ValidationError { field: String, message: String },

    /// 唯一字段冲突
    #[error("'{}' must be unique", .fields.join(", "))]
    UniquenessError { fields: Vec<String> },

    /// 模型尚未完成初始化
    #[error("model '{collection}' is not initialized")]
    NotInitialized { collection: String },

    /// 按选择器找不到文档
    #[error("could not find any {collection} matching the given selector: {selector}")]
    NotFound { collection: String, selector: String },

    /// 存储驱动错误，原样透传
    #[error("{message}")]
    StorageError { message: String },

    /// 存储层唯一索引拒绝写入
    #[error("duplicate key: {message}")]
    DuplicateKey { message: String },

    /// 序列化/反序列化错误
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// 配置错误
    #[error("configuration error: {message}")]
    ConfigError { message: String },

    /// IO错误
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON错误
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 错误大类，供上层按分类分支处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdmErrorKind {
    Validation,
    Uniqueness,
    NotInitialized,
    NotFound,
    Storage,
    Serialization,
    Config,
}

impl OdmError {
    /// 获取错误大类
    pub fn kind(&self) -> OdmErrorKind {
        match self {
            OdmError::ValidationError { .. } => OdmErrorKind::Validation,
            OdmError::UniquenessError { .. } => OdmErrorKind::Uniqueness,
            OdmError::NotInitialized { .. } => OdmErrorKind::NotInitialized,
            OdmError::NotFound { .. } => OdmErrorKind::NotFound,
            OdmError::StorageError { .. } | OdmError::DuplicateKey { .. } | OdmError::IoError(_) => {
                OdmErrorKind::Storage
            }
            OdmError::SerializationError { .. } | OdmError::JsonError(_) => OdmErrorKind::Serialization,
            OdmError::ConfigError { .. } => OdmErrorKind::Config,
        }
    }

    /// 是否为唯一性冲突（包括存储层唯一索引兜底）
    pub fn is_uniqueness(&self) -> bool {
        matches!(self, OdmError::UniquenessError { .. } | OdmError::DuplicateKey { .. })
    }
}

/// ODM结果类型
pub type OdmResult<T> = Result<T, OdmError>;

/// 快速构造错误的便捷宏
#[macro_export]
macro_rules! odm_error {
    (validation, $field:expr, $msg:expr) => {
        $crate::error::OdmError::ValidationError {
            field: $field.to_string(),
            message: $msg.to_string(),
        }
    };
    (storage, $msg:expr) => {
        $crate::error::OdmError::StorageError {
            message: $msg.to_string(),
        }
    };
    (duplicate_key, $msg:expr) => {
        $crate::error::OdmError::DuplicateKey {
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::OdmError::SerializationError {
            message: $msg.to_string(),
        }
    };
    (config, $msg:expr) => {
        $crate::error::OdmError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (not_initialized, $collection:expr) => {
        $crate::error::OdmError::NotInitialized {
            collection: $collection.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniqueness_message_joins_fields() {
        let err = OdmError::UniquenessError {
            fields: vec!["slug".to_string(), "name".to_string()],
        };
        assert_eq!(err.to_string(), "'slug, name' must be unique");

        let err = OdmError::UniquenessError { fields: vec!["slug".to_string()] };
        assert_eq!(err.to_string(), "'slug' must be unique");
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = odm_error!(validation, "title", "title cannot be empty");
        assert_eq!(err.to_string(), "title cannot be empty");
        assert_eq!(err.kind(), OdmErrorKind::Validation);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(odm_error!(not_initialized, "posts").kind(), OdmErrorKind::NotInitialized);
        assert_eq!(odm_error!(duplicate_key, "E11000").kind(), OdmErrorKind::Storage);
        assert!(odm_error!(duplicate_key, "E11000").is_uniqueness());
        assert!(!odm_error!(storage, "boom").is_uniqueness());
    }

    #[test]
    fn test_storage_message_passes_through() {
        let err = odm_error!(storage, "connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
