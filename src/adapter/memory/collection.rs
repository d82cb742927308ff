//! 内存集合

use super::matcher::{compare_documents, lookup, matches};
use crate::adapter::{Collection, IndexDefinition};
use crate::error::OdmResult;
use crate::types::{DataValue, Document, ID_FIELD, QueryConditionGroup, QueryOptions};
use async_trait::async_trait;
use parking_lot::RwLock;
use rat_logger::{debug, warn};

/// 集合内部状态
#[derive(Debug, Default)]
pub(crate) struct CollectionState {
    /// 是否已创建（显式创建或首次写入）
    pub(crate) exists: bool,
    /// 按插入顺序保存的文档
    documents: Vec<Document>,
    /// 二级索引
    indexes: Vec<IndexDefinition>,
}

/// 内存集合
///
/// 同一名称的所有句柄共享一份状态。每个操作在一次加锁内完成，
/// 因此批量插入和更新对其他调用者是原子的。
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    pub(crate) state: RwLock<CollectionState>,
}

impl MemoryCollection {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: RwLock::new(CollectionState::default()),
        }
    }

    /// 当前文档数量
    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 唯一索引的键，任一字段缺失、为 `Null`、空串或空数组时不参与唯一约束
fn index_key(index: &IndexDefinition, doc: &Document) -> Option<Vec<DataValue>> {
    index
        .fields
        .iter()
        .map(|field| match lookup(doc, field) {
            None | Some(DataValue::Null) => None,
            Some(DataValue::String(s)) if s.is_empty() => None,
            Some(DataValue::Array(items)) if items.is_empty() => None,
            Some(value) => Some(value.clone()),
        })
        .collect()
}

fn keys_equal(a: &[DataValue], b: &[DataValue]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
}

/// 检查候选文档与已有文档（跳过 `skip` 下标）之间的唯一约束
fn find_conflict(
    indexes: &[IndexDefinition],
    existing: &[Document],
    candidate: &Document,
    skip: Option<usize>,
) -> Option<String> {
    let candidate_id = candidate.get(ID_FIELD);
    for (position, doc) in existing.iter().enumerate() {
        if Some(position) == skip {
            continue;
        }
        if let Some(id) = candidate_id {
            if doc.get(ID_FIELD) == Some(id) {
                return Some(format!("_id_ dup key: {}", id));
            }
        }
    }
    for index in indexes.iter().filter(|i| i.unique) {
        let Some(key) = index_key(index, candidate) else {
            continue;
        };
        for (position, doc) in existing.iter().enumerate() {
            if Some(position) == skip {
                continue;
            }
            if let Some(other) = index_key(index, doc) {
                if keys_equal(&key, &other) {
                    return Some(format!("{} dup key: {:?}", index.name, key));
                }
            }
        }
    }
    None
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, selector: &QueryConditionGroup, options: &QueryOptions) -> OdmResult<Vec<Document>> {
        let state = self.state.read();
        let mut found = Vec::new();
        for doc in &state.documents {
            if matches(doc, selector)? {
                found.push(doc.clone());
            }
        }
        drop(state);

        if !options.sort.is_empty() {
            found.sort_by(|a, b| compare_documents(a, b, &options.sort));
        }

        if let Some(pagination) = &options.pagination {
            let skip = usize::try_from(pagination.skip).unwrap_or(usize::MAX);
            let limit = pagination
                .effective_limit()
                .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
            found = found.into_iter().skip(skip).take(limit).collect();
        }

        if !options.fields.is_empty() {
            for doc in found.iter_mut() {
                doc.retain(|key, _| key == ID_FIELD || options.fields.iter().any(|f| f == key));
            }
        }

        crate::debug_log!("内存集合 {} 查询 [{}] 返回 {} 条", self.name, selector, found.len());
        Ok(found)
    }

    async fn count(&self, selector: &QueryConditionGroup) -> OdmResult<u64> {
        let state = self.state.read();
        let mut count = 0u64;
        for doc in &state.documents {
            if matches(doc, selector)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert_many(&self, documents: Vec<Document>) -> OdmResult<Vec<String>> {
        let mut state = self.state.write();
        let mut staged: Vec<Document> = Vec::with_capacity(documents.len());
        let mut ids = Vec::with_capacity(documents.len());

        for mut doc in documents {
            let id = match doc.get(ID_FIELD) {
                Some(DataValue::String(id)) => id.clone(),
                _ => {
                    let id = crate::generate_object_id();
                    doc.insert(ID_FIELD.to_string(), DataValue::String(id.clone()));
                    id
                }
            };
            let conflict = find_conflict(&state.indexes, &state.documents, &doc, None)
                .or_else(|| find_conflict(&state.indexes, &staged, &doc, None));
            if let Some(message) = conflict {
                warn!("内存集合 {} 拒绝批量插入: {}", self.name, message);
                return Err(crate::odm_error!(duplicate_key, message));
            }
            staged.push(doc);
            ids.push(id);
        }

        state.exists = true;
        state.documents.extend(staged);
        debug!("内存集合 {} 插入 {} 条文档", self.name, ids.len());
        Ok(ids)
    }

    async fn update_one(&self, selector: &QueryConditionGroup, set: &Document) -> OdmResult<u64> {
        let mut state = self.state.write();
        let mut target = None;
        for (position, doc) in state.documents.iter().enumerate() {
            if matches(doc, selector)? {
                target = Some(position);
                break;
            }
        }
        let Some(position) = target else {
            return Ok(0);
        };

        let mut updated = state.documents[position].clone();
        for (key, value) in set {
            if key != ID_FIELD {
                updated.insert(key.clone(), value.clone());
            }
        }
        if let Some(message) = find_conflict(&state.indexes, &state.documents, &updated, Some(position)) {
            warn!("内存集合 {} 拒绝更新: {}", self.name, message);
            return Err(crate::odm_error!(duplicate_key, message));
        }
        state.documents[position] = updated;
        Ok(1)
    }

    async fn delete_many(&self, selector: &QueryConditionGroup) -> OdmResult<u64> {
        let mut state = self.state.write();
        // 先求值再删除，求值失败时集合保持不变
        let mut doomed = Vec::with_capacity(state.documents.len());
        for doc in &state.documents {
            doomed.push(matches(doc, selector)?);
        }
        let removed = doomed.iter().filter(|d| **d).count() as u64;
        let mut flags = doomed.into_iter();
        state.documents.retain(|_| !flags.next().unwrap_or(false));
        debug!("内存集合 {} 删除 {} 条文档", self.name, removed);
        Ok(removed)
    }

    async fn create_index(&self, index: &IndexDefinition) -> OdmResult<()> {
        let mut state = self.state.write();
        if let Some(existing) = state.indexes.iter().find(|i| i.name == index.name) {
            if existing == index {
                return Ok(());
            }
            return Err(crate::odm_error!(
                storage,
                format!("索引 {} 已存在且定义不同", index.name)
            ));
        }
        if index.unique {
            let single = [index.clone()];
            for (position, doc) in state.documents.iter().enumerate() {
                if let Some(message) = find_conflict(&single, &state.documents[..position], doc, None) {
                    return Err(crate::odm_error!(duplicate_key, message));
                }
            }
        }
        state.exists = true;
        state.indexes.push(index.clone());
        Ok(())
    }

    async fn drop_indexes(&self) -> OdmResult<()> {
        let mut state = self.state.write();
        state.indexes.clear();
        Ok(())
    }

    async fn list_indexes(&self) -> OdmResult<Vec<IndexDefinition>> {
        Ok(self.state.read().indexes.clone())
    }
}
