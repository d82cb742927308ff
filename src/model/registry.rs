//! 模型注册表
//!
//! 显式构造、显式传递的模型容器，取代进程级全局单例。

use super::core::Model;
use crate::adapter::Database;
use crate::error::OdmResult;
use dashmap::DashMap;
use rat_logger::info;
use std::sync::Arc;

/// 按集合名称保存模型
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: DashMap<String, Arc<Model>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册模型，同名集合重复注册返回配置错误
    pub fn register(&self, model: Model) -> OdmResult<Arc<Model>> {
        let name = model.collection_name().to_string();
        match self.models.entry(name) {
            dashmap::mapref::entry::Entry::Occupied(entry) => Err(crate::odm_error!(
                config,
                format!("模型已注册: {}", entry.key())
            )),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let model = Arc::new(model);
                entry.insert(model.clone());
                Ok(model)
            }
        }
    }

    /// 按集合名称获取模型
    pub fn get(&self, collection_name: &str) -> Option<Arc<Model>> {
        self.models.get(collection_name).map(|m| m.value().clone())
    }

    /// 已注册的集合名称（排序后）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.iter().map(|m| m.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// 依次初始化全部模型，遇到第一个失败即返回
    pub async fn initialize_all(&self, db: &dyn Database) -> OdmResult<()> {
        // 先收集句柄，避免跨 await 持有分片锁
        let mut models: Vec<Arc<Model>> = self.models.iter().map(|m| m.value().clone()).collect();
        models.sort_by(|a, b| a.collection_name().cmp(b.collection_name()));
        for model in &models {
            model.initialize(db).await?;
        }
        info!("已初始化 {} 个模型", models.len());
        Ok(())
    }
}
