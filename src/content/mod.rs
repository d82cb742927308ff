//! 内容模型定义
//!
//! 内容管理后端使用的集合模式：文章、分类、用户、文件和存储卷。
//! 这些模式只使用公开的字段与模式接口构建，和第三方模型没有区别。

pub mod categories;
pub mod files;
pub mod posts;
pub mod users;
pub mod volumes;

use crate::error::OdmResult;
use crate::model::{Model, ModelRegistry};
use std::sync::Arc;

/// 创建全部内容模型并注册到给定注册表
///
/// 返回注册后的模型，顺序为 posts、categories、users、files、volumes
pub fn register_all(registry: &ModelRegistry) -> OdmResult<Vec<Arc<Model>>> {
    Ok(vec![
        registry.register(posts::model()?)?,
        registry.register(categories::model()?)?,
        registry.register(users::model()?)?,
        registry.register(files::model()?)?,
        registry.register(volumes::model()?)?,
    ])
}
