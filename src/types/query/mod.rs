use crate::types::data_value::DataValue;
use serde::{Deserialize, Serialize};

/// 文档标识字段名
pub const ID_FIELD: &str = "_id";

/// 查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCondition {
    /// 字段名
    pub field: String,
    /// 操作符
    pub operator: QueryOperator,
    /// 值
    pub value: DataValue,
    /// 是否大小写不敏感（仅对字符串操作符有效）
    #[serde(default)]
    pub case_insensitive: bool,
}

impl QueryCondition {
    /// 创建新的查询条件
    pub fn new(field: impl Into<String>, operator: QueryOperator, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            case_insensitive: false,
        }
    }

    /// 等值条件
    pub fn equals(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Eq, value)
    }

    /// 不等条件
    pub fn not_equals(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Ne, value)
    }

    /// 设置大小写不敏感
    pub fn ignore_case(mut self) -> Self {
        self.case_insensitive = true;
        self
    }
}

/// 逻辑操作符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicalOperator {
    /// AND 逻辑
    And,
    /// OR 逻辑
    Or,
}

/// 查询条件组合，即文档选择器
///
/// 空的 AND 组合匹配所有文档，空的 OR 组合不匹配任何文档。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryConditionGroup {
    /// 单个条件
    Single(QueryCondition),
    /// 条件组合
    Group {
        /// 逻辑操作符
        operator: LogicalOperator,
        /// 子条件列表
        conditions: Vec<QueryConditionGroup>,
    },
}

impl QueryConditionGroup {
    /// 匹配所有文档的选择器
    pub fn all() -> Self {
        QueryConditionGroup::Group {
            operator: LogicalOperator::And,
            conditions: Vec::new(),
        }
    }

    /// 按标识选择单个文档
    pub fn by_id(id: impl Into<String>) -> Self {
        let id: String = id.into();
        QueryConditionGroup::Single(QueryCondition::equals(ID_FIELD, id))
    }

    /// 单字段等值选择器
    pub fn equals(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        QueryConditionGroup::Single(QueryCondition::equals(field, value))
    }

    /// AND 组合
    pub fn and(conditions: Vec<QueryConditionGroup>) -> Self {
        QueryConditionGroup::Group {
            operator: LogicalOperator::And,
            conditions,
        }
    }

    /// OR 组合
    pub fn or(conditions: Vec<QueryConditionGroup>) -> Self {
        QueryConditionGroup::Group {
            operator: LogicalOperator::Or,
            conditions,
        }
    }
}

impl From<QueryCondition> for QueryConditionGroup {
    fn from(condition: QueryCondition) -> Self {
        QueryConditionGroup::Single(condition)
    }
}

impl std::fmt::Display for QueryConditionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryConditionGroup::Single(c) => write!(f, "{} {:?} {}", c.field, c.operator, c.value),
            QueryConditionGroup::Group { operator, conditions } => {
                let parts: Vec<String> = conditions.iter().map(|c| format!("({})", c)).collect();
                let joiner = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };
                if parts.is_empty() {
                    write!(f, "*")
                } else {
                    write!(f, "{}", parts.join(joiner))
                }
            }
        }
    }
}

/// 查询操作符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOperator {
    /// 等于
    Eq,
    /// 不等于
    Ne,
    /// 大于
    Gt,
    /// 大于等于
    Gte,
    /// 小于
    Lt,
    /// 小于等于
    Lte,
    /// 包含（字符串子串，或数组包含元素）
    Contains,
    /// 开始于（字符串）
    StartsWith,
    /// 结束于（字符串）
    EndsWith,
    /// 在列表中
    In,
    /// 不在列表中
    NotIn,
    /// 正则表达式匹配
    Regex,
    /// 存在（字段存在）
    Exists,
    /// 为空
    IsNull,
    /// 不为空
    IsNotNull,
}

/// 排序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// 字段名
    pub field: String,
    /// 排序方向
    pub direction: SortDirection,
}

impl SortConfig {
    /// 升序
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    /// 降序
    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }
}

/// 排序方向
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortDirection {
    /// 升序
    Asc,
    /// 降序
    Desc,
}

/// 分页配置
///
/// `limit` 为 0 表示不限制返回数量，与MongoDB驱动的约定一致，所有后端都按此处理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// 跳过的记录数（起始下标）
    pub skip: u64,
    /// 限制返回的记录数，0 表示不限制
    pub limit: u64,
}

impl PaginationConfig {
    /// 实际生效的返回上限，`None` 表示不限制
    pub fn effective_limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }
}

/// 查询选项：排序、分页与投影
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOptions {
    /// 排序配置
    pub sort: Vec<SortConfig>,
    /// 分页配置
    pub pagination: Option<PaginationConfig>,
    /// 选择的字段（空表示选择所有字段）
    pub fields: Vec<String>,
}

impl QueryOptions {
    /// 创建新的查询选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置排序
    pub fn with_sort(mut self, sort: Vec<SortConfig>) -> Self {
        self.sort = sort;
        self
    }

    /// 设置分页
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// 按起始下标和数量设置分页
    pub fn with_range(self, start_index: u64, limit: u64) -> Self {
        self.with_pagination(PaginationConfig { skip: start_index, limit })
    }

    /// 设置字段选择
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_display() {
        let selector = QueryConditionGroup::or(vec![
            QueryConditionGroup::equals("slug", "abc"),
            QueryConditionGroup::equals("name", "x"),
        ]);
        assert_eq!(selector.to_string(), "(slug Eq abc) OR (name Eq x)");
        assert_eq!(QueryConditionGroup::all().to_string(), "*");
    }

    #[test]
    fn test_with_range() {
        let options = QueryOptions::new().with_range(10, 5);
        let pagination = options.pagination.unwrap();
        assert_eq!(pagination.skip, 10);
        assert_eq!(pagination.limit, 5);
    }
}
