//! MongoDB查询构建器模块
//!
//! 把选择器转换为 MongoDB 过滤文档

use super::utils::{data_value_to_bson, id_to_bson};
use crate::types::{
    DataValue, ID_FIELD, LogicalOperator, QueryCondition, QueryConditionGroup, QueryOperator,
    QueryOptions, SortDirection,
};
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::FindOptions;
use rat_logger::debug;

/// 构建过滤文档
pub(crate) fn build_filter(selector: &QueryConditionGroup) -> Document {
    let filter = build_group(selector);
    debug!("[MongoDB] 选择器 [{}] 构建为: {:?}", selector, filter);
    filter
}

fn build_group(group: &QueryConditionGroup) -> Document {
    match group {
        QueryConditionGroup::Single(condition) => build_condition(condition),
        QueryConditionGroup::Group { operator, conditions } => {
            let children: Vec<Document> = conditions.iter().map(build_group).collect();
            match operator {
                LogicalOperator::And => {
                    let children: Vec<Document> = children.into_iter().filter(|d| !d.is_empty()).collect();
                    match children.len() {
                        0 => Document::new(),
                        1 => children.into_iter().next().unwrap_or_default(),
                        _ => doc! { "$and": children },
                    }
                }
                LogicalOperator::Or => {
                    if children.is_empty() {
                        // 空的 OR 不匹配任何文档
                        return doc! { ID_FIELD: { "$exists": false } };
                    }
                    if children.iter().any(|d| d.is_empty()) {
                        return Document::new();
                    }
                    if children.len() == 1 {
                        return children.into_iter().next().unwrap_or_default();
                    }
                    doc! { "$or": children }
                }
            }
        }
    }
}

fn value_to_bson(field: &str, value: &DataValue) -> Bson {
    if field == ID_FIELD { id_to_bson(value) } else { data_value_to_bson(value) }
}

fn regex_doc(pattern: String, case_insensitive: bool) -> Document {
    if case_insensitive {
        doc! { "$regex": pattern, "$options": "i" }
    } else {
        doc! { "$regex": pattern }
    }
}

fn build_condition(condition: &QueryCondition) -> Document {
    let field = condition.field.as_str();
    let ci = condition.case_insensitive;
    let value = value_to_bson(field, &condition.value);
    let text = condition.value.as_str();

    match condition.operator {
        QueryOperator::Eq => match text {
            Some(s) if ci => doc! { field: regex_doc(format!("^{}$", regex::escape(s)), true) },
            _ => doc! { field: value },
        },
        QueryOperator::Ne => match text {
            Some(s) if ci => doc! { field: { "$not": regex_doc(format!("^{}$", regex::escape(s)), true) } },
            _ => doc! { field: { "$ne": value } },
        },
        QueryOperator::Gt => doc! { field: { "$gt": value } },
        QueryOperator::Gte => doc! { field: { "$gte": value } },
        QueryOperator::Lt => doc! { field: { "$lt": value } },
        QueryOperator::Lte => doc! { field: { "$lte": value } },
        QueryOperator::Contains => match text {
            Some(s) => doc! { field: regex_doc(regex::escape(s), ci) },
            None => doc! { field: value },
        },
        QueryOperator::StartsWith => match text {
            Some(s) => doc! { field: regex_doc(format!("^{}", regex::escape(s)), ci) },
            None => doc! { field: { "$in": [] } },
        },
        QueryOperator::EndsWith => match text {
            Some(s) => doc! { field: regex_doc(format!("{}$", regex::escape(s)), ci) },
            None => doc! { field: { "$in": [] } },
        },
        QueryOperator::In => doc! { field: { "$in": as_array(value) } },
        QueryOperator::NotIn => doc! { field: { "$nin": as_array(value) } },
        QueryOperator::Regex => match text {
            Some(s) => doc! { field: regex_doc(s.to_string(), ci) },
            None => doc! { field: { "$in": [] } },
        },
        QueryOperator::Exists => {
            doc! { field: { "$exists": condition.value.as_bool().unwrap_or(true) } }
        }
        QueryOperator::IsNull => doc! { field: Bson::Null },
        QueryOperator::IsNotNull => doc! { field: { "$ne": Bson::Null } },
    }
}

fn as_array(value: Bson) -> Bson {
    match value {
        Bson::Array(items) => Bson::Array(items),
        other => Bson::Array(vec![other]),
    }
}

/// 构建查询选项：排序、分页与投影
pub(crate) fn build_find_options(options: &QueryOptions) -> FindOptions {
    let mut find_options = FindOptions::default();
    if !options.sort.is_empty() {
        let mut sort = Document::new();
        for config in &options.sort {
            let direction = match config.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            };
            sort.insert(config.field.clone(), direction);
        }
        find_options.sort = Some(sort);
    }
    if let Some(pagination) = &options.pagination {
        find_options.skip = Some(pagination.skip);
        find_options.limit = pagination
            .effective_limit()
            .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));
    }
    if !options.fields.is_empty() {
        let mut projection = Document::new();
        for field in &options.fields {
            projection.insert(field.clone(), 1);
        }
        find_options.projection = Some(projection);
    }
    find_options
}
