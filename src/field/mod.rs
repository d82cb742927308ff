//! 字段类型系统模块
//!
//! 每个字段是一个自包含的模式属性：持有当前值、默认值和约束，
//! 并负责自身的校验、克隆和（反）序列化。
//!
//! 内置变体：文本、文本数组、布尔、数值、日期、标识引用和自由 JSON。
//! 第三方类型只需实现 [`Field`] 并派生 `Clone` 即可加入 [`crate::schema::Schema`]。

pub mod boolean;
pub mod convenience;
pub mod date;
pub mod json;
pub mod number;
pub mod reference;
pub mod text;
pub mod text_array;

pub use boolean::BooleanField;
pub use convenience::*;
pub use date::DateField;
pub use json::JsonField;
pub use number::NumberField;
pub use reference::{ReferenceField, is_object_id};
pub use text::TextField;
pub use text_array::TextArrayField;

use crate::error::OdmResult;
use crate::types::DataValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 字段约束与标记
///
/// `unique` 和 `indexable` 描述的是模式本身而不是实例状态，
/// 模板模式交给模型之后就不再能被修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// 是否必填
    pub required: bool,
    /// 是否唯一
    pub unique: bool,
    /// 是否建立索引
    pub indexable: bool,
    /// 是否敏感（非详细输出时隐藏）
    pub sensitive: bool,
    /// 最小长度（文本为字符数，数组为元素个数）
    pub min_length: Option<usize>,
    /// 最大长度
    pub max_length: Option<usize>,
    /// 克隆时是否重置为默认值
    pub reset_on_clone: bool,
}

impl FieldOptions {
    /// 设置必填
    pub fn required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    /// 设置唯一
    pub fn unique(&mut self, unique: bool) -> &mut Self {
        self.unique = unique;
        self
    }

    /// 设置索引
    pub fn indexable(&mut self, indexable: bool) -> &mut Self {
        self.indexable = indexable;
        self
    }

    /// 设置敏感
    pub fn sensitive(&mut self, sensitive: bool) -> &mut Self {
        self.sensitive = sensitive;
        self
    }

    /// 设置最小长度
    pub fn min_length(&mut self, min_length: usize) -> &mut Self {
        self.min_length = Some(min_length);
        self
    }

    /// 设置最大长度
    pub fn max_length(&mut self, max_length: usize) -> &mut Self {
        self.max_length = Some(max_length);
        self
    }

    /// 设置克隆时重置
    pub fn reset_on_clone(&mut self, reset: bool) -> &mut Self {
        self.reset_on_clone = reset;
        self
    }
}

/// 字段变体标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArray,
    Boolean,
    Number,
    Date,
    Reference,
    Json,
    /// 第三方扩展类型
    Custom(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::TextArray => write!(f, "text-array"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Reference => write!(f, "reference"),
            FieldKind::Json => write!(f, "json"),
            FieldKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// 装箱克隆支持，任何 `Field + Clone` 类型自动获得
pub trait FieldClone {
    fn clone_box(&self) -> Box<dyn Field>;
}

impl<T> FieldClone for T
where
    T: 'static + Field + Clone,
{
    fn clone_box(&self) -> Box<dyn Field> {
        Box::new(self.clone())
    }
}

/// 字段特征
///
/// 运行时值始终符合变体声明的基本类型：类型不匹配的赋值不会写入值，
/// 而是被记录下来，在下一次 `validate()` 时报告。
pub trait Field: FieldClone + fmt::Debug + Send + Sync {
    /// 字段名，在一个模式内唯一
    fn name(&self) -> &str;

    /// 字段变体
    fn kind(&self) -> FieldKind;

    /// 字段约束
    fn options(&self) -> &FieldOptions;

    /// 可变字段约束
    fn options_mut(&mut self) -> &mut FieldOptions;

    /// 读取当前值
    fn get(&self) -> DataValue;

    /// 写入值，`Null` 表示重置为默认值
    fn set(&mut self, value: DataValue);

    /// 重置为默认值
    fn reset(&mut self);

    /// 校验当前值，失败时返回包含字段名的消息（每次只报告第一个失败）
    fn validate(&self) -> Result<(), String>;

    /// 生成可持久化的值
    fn serialize(&self) -> DataValue {
        self.get()
    }

    /// 从持久化的值恢复
    fn deserialize(&mut self, raw: DataValue) -> OdmResult<()>;

    /// 深拷贝，保留约束；配置了 `reset_on_clone` 时重置为默认值
    fn clone_field(&self) -> Box<dyn Field> {
        let mut field = self.clone_box();
        if field.options().reset_on_clone {
            field.reset();
        }
        field
    }

    fn is_required(&self) -> bool {
        self.options().required
    }

    fn is_unique(&self) -> bool {
        self.options().unique
    }

    fn is_indexable(&self) -> bool {
        self.options().indexable
    }

    fn is_sensitive(&self) -> bool {
        self.options().sensitive
    }
}

impl Clone for Box<dyn Field> {
    fn clone(&self) -> Self {
        self.clone_field()
    }
}

/// 按值构建字段约束的链式方法，所有字段类型自动获得
pub trait FieldBuilder: Field + Sized {
    /// 设置为必填字段
    fn required(mut self) -> Self {
        self.options_mut().required = true;
        self
    }

    /// 设置为唯一字段
    fn unique(mut self) -> Self {
        self.options_mut().unique = true;
        self
    }

    /// 设置为索引字段
    fn indexable(mut self) -> Self {
        self.options_mut().indexable = true;
        self
    }

    /// 设置为敏感字段
    fn sensitive(mut self) -> Self {
        self.options_mut().sensitive = true;
        self
    }

    /// 设置最小长度
    fn min_length(mut self, min_length: usize) -> Self {
        self.options_mut().min_length = Some(min_length);
        self
    }

    /// 设置最大长度
    fn max_length(mut self, max_length: usize) -> Self {
        self.options_mut().max_length = Some(max_length);
        self
    }
}

impl<T: Field + Sized> FieldBuilder for T {}

/// 类型不匹配时的统一消息
pub(crate) fn type_mismatch(name: &str, expected: &str) -> String {
    format!("{} must be {}", name, expected)
}

/// 反序列化时的类型不匹配错误
pub(crate) fn deserialize_mismatch(name: &str, kind: FieldKind, raw: &DataValue) -> crate::error::OdmError {
    crate::odm_error!(
        serialization,
        format!("字段 {} ({}) 无法从 {} 类型的值恢复: {}", name, kind, raw.type_name(), raw)
    )
}

/// 校验长度约束，供文本与数组类变体共用
pub(crate) fn check_length(
    name: &str,
    len: usize,
    options: &FieldOptions,
    unit: &str,
) -> Result<(), String> {
    if let Some(min) = options.min_length {
        if len < min {
            return Err(match unit {
                "items" => format!("{} must contain at least {} items", name, min),
                _ => format!("{} must be at least {} characters", name, min),
            });
        }
    }
    if let Some(max) = options.max_length {
        if len > max {
            return Err(match unit {
                "items" => format!("{} cannot contain more than {} items", name, max),
                _ => format!("{} cannot be more than {} characters", name, max),
            });
        }
    }
    Ok(())
}
