//! 内存后端的选择器求值
//!
//! 语义尽量贴近 MongoDB：缺失字段与 `Null` 等值匹配，数组字段的等值
//! 匹配其中任意元素，范围比较只在同类值之间成立。

use crate::error::OdmResult;
use crate::types::{
    DataValue, Document, LogicalOperator, QueryCondition, QueryConditionGroup, QueryOperator,
    SortConfig, SortDirection,
};
use regex::RegexBuilder;
use std::cmp::Ordering;

/// 读取字段值，支持以 `.` 分隔的嵌套路径
pub(crate) fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a DataValue> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = doc.get(first)?;
    for part in parts {
        current = match current {
            DataValue::Object(obj) => obj.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// 判断文档是否匹配选择器
pub(crate) fn matches(doc: &Document, selector: &QueryConditionGroup) -> OdmResult<bool> {
    match selector {
        QueryConditionGroup::Single(condition) => matches_condition(doc, condition),
        QueryConditionGroup::Group { operator: LogicalOperator::And, conditions } => {
            for condition in conditions {
                if !matches(doc, condition)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        QueryConditionGroup::Group { operator: LogicalOperator::Or, conditions } => {
            for condition in conditions {
                if matches(doc, condition)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn matches_condition(doc: &Document, condition: &QueryCondition) -> OdmResult<bool> {
    let actual = lookup(doc, &condition.field);
    let expected = &condition.value;
    let ci = condition.case_insensitive;

    let result = match condition.operator {
        QueryOperator::Eq => equals_any(actual, expected, ci),
        QueryOperator::Ne => !equals_any(actual, expected, ci),
        QueryOperator::Gt => compare(actual, expected, |o| o == Ordering::Greater),
        QueryOperator::Gte => compare(actual, expected, |o| o != Ordering::Less),
        QueryOperator::Lt => compare(actual, expected, |o| o == Ordering::Less),
        QueryOperator::Lte => compare(actual, expected, |o| o != Ordering::Greater),
        QueryOperator::Contains => match (actual, expected) {
            (Some(DataValue::String(s)), DataValue::String(needle)) => {
                string_test(s, needle, ci, |a, b| a.contains(b))
            }
            (Some(DataValue::Array(items)), value) => items.iter().any(|item| scalar_equals(item, value, ci)),
            _ => false,
        },
        QueryOperator::StartsWith => match (actual, expected) {
            (Some(DataValue::String(s)), DataValue::String(prefix)) => {
                string_test(s, prefix, ci, |a, b| a.starts_with(b))
            }
            _ => false,
        },
        QueryOperator::EndsWith => match (actual, expected) {
            (Some(DataValue::String(s)), DataValue::String(suffix)) => {
                string_test(s, suffix, ci, |a, b| a.ends_with(b))
            }
            _ => false,
        },
        QueryOperator::In => in_list(actual, expected, ci),
        QueryOperator::NotIn => !in_list(actual, expected, ci),
        QueryOperator::Regex => match (actual, expected) {
            (Some(DataValue::String(s)), DataValue::String(pattern)) => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(ci)
                    .build()
                    .map_err(|e| crate::odm_error!(storage, format!("无效的正则表达式 {}: {}", pattern, e)))?;
                regex.is_match(s)
            }
            _ => false,
        },
        QueryOperator::Exists => {
            let wanted = expected.as_bool().unwrap_or(true);
            actual.is_some() == wanted
        }
        QueryOperator::IsNull => actual.map_or(true, DataValue::is_null),
        QueryOperator::IsNotNull => actual.is_some_and(|v| !v.is_null()),
    };
    Ok(result)
}

fn string_test(actual: &str, expected: &str, ci: bool, test: impl Fn(&str, &str) -> bool) -> bool {
    if ci {
        test(&actual.to_lowercase(), &expected.to_lowercase())
    } else {
        test(actual, expected)
    }
}

fn scalar_equals(actual: &DataValue, expected: &DataValue, ci: bool) -> bool {
    match (actual, expected) {
        (DataValue::String(a), DataValue::String(b)) if ci => a.to_lowercase() == b.to_lowercase(),
        (a, b) => a.loosely_equals(b),
    }
}

/// 等值匹配：缺失等同于 `Null`，数组字段匹配任一元素或整体相等
fn equals_any(actual: Option<&DataValue>, expected: &DataValue, ci: bool) -> bool {
    match actual {
        None => expected.is_null(),
        Some(DataValue::Array(items)) if !matches!(expected, DataValue::Array(_)) => {
            items.iter().any(|item| scalar_equals(item, expected, ci))
        }
        Some(value) => scalar_equals(value, expected, ci),
    }
}

fn in_list(actual: Option<&DataValue>, expected: &DataValue, ci: bool) -> bool {
    match expected {
        DataValue::Array(candidates) => candidates.iter().any(|c| equals_any(actual, c, ci)),
        other => equals_any(actual, other, ci),
    }
}

fn same_bracket(a: &DataValue, b: &DataValue) -> bool {
    let numeric = |v: &DataValue| matches!(v, DataValue::Int(_) | DataValue::Float(_));
    (numeric(a) && numeric(b)) || std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn compare(actual: Option<&DataValue>, expected: &DataValue, accept: impl Fn(Ordering) -> bool) -> bool {
    match actual {
        Some(DataValue::Array(items)) => items
            .iter()
            .any(|item| same_bracket(item, expected) && accept(item.total_cmp(expected))),
        Some(value) => same_bracket(value, expected) && accept(value.total_cmp(expected)),
        None => false,
    }
}

/// 按排序配置比较两个文档，缺失字段视为 `Null`
pub(crate) fn compare_documents(a: &Document, b: &Document, sort: &[SortConfig]) -> Ordering {
    for config in sort {
        let left = lookup(a, &config.field).unwrap_or(&DataValue::Null);
        let right = lookup(b, &config.field).unwrap_or(&DataValue::Null);
        let ordering = match config.direction {
            SortDirection::Asc => left.total_cmp(right),
            SortDirection::Desc => right.total_cmp(left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
