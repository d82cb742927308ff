//! 内存数据库

use super::collection::MemoryCollection;
use crate::adapter::{Collection, Database};
use crate::error::OdmResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use rat_logger::info;
use std::collections::HashMap;
use std::sync::Arc;

/// 进程内数据库，测试套件使用的参考后端
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    collections: RwLock<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取具体类型的集合句柄，同名句柄共享状态
    pub fn memory_collection(&self, name: &str) -> Arc<MemoryCollection> {
        if let Some(collection) = self.collections.read().get(name) {
            return collection.clone();
        }
        self.collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::new(name)))
            .clone()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn collection_exists(&self, name: &str) -> OdmResult<bool> {
        Ok(self
            .collections
            .read()
            .get(name)
            .is_some_and(|c| c.state.read().exists))
    }

    async fn create_collection(&self, name: &str) -> OdmResult<()> {
        let collection = self.memory_collection(name);
        let mut state = collection.state.write();
        if state.exists {
            return Err(crate::odm_error!(storage, format!("集合 {} 已存在", name)));
        }
        state.exists = true;
        info!("内存数据库创建集合: {}", name);
        Ok(())
    }

    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        self.memory_collection(name)
    }

    async fn list_collections(&self) -> OdmResult<Vec<String>> {
        let mut names: Vec<String> = self
            .collections
            .read()
            .iter()
            .filter(|(_, c)| c.state.read().exists)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}
