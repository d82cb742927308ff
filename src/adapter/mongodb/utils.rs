//! MongoDB工具函数模块
//!
//! 包含 `DataValue` 与 BSON 之间的转换

use crate::error::OdmError;
use crate::types::{DataValue, Document, ID_FIELD};
use chrono::{TimeZone, Utc};
use mongodb::bson::{self, Bson, oid::ObjectId};
use rat_logger::error;

/// 将DataValue转换为BSON值
pub(crate) fn data_value_to_bson(value: &DataValue) -> Bson {
    match value {
        DataValue::Null => Bson::Null,
        DataValue::Bool(b) => Bson::Boolean(*b),
        DataValue::Int(i) => Bson::Int64(*i),
        DataValue::Float(f) => Bson::Double(*f),
        DataValue::String(s) => Bson::String(s.clone()),
        DataValue::DateTime(dt) => Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis())),
        DataValue::Json(json) => data_value_to_bson(&DataValue::from_json(json.clone())),
        DataValue::Array(arr) => Bson::Array(arr.iter().map(data_value_to_bson).collect()),
        DataValue::Object(obj) => {
            let mut doc = bson::Document::new();
            for (key, value) in obj {
                doc.insert(key, data_value_to_bson(value));
            }
            Bson::Document(doc)
        }
    }
}

/// `_id` 字段的值：合法的十六进制串转换为 ObjectId
pub(crate) fn id_to_bson(value: &DataValue) -> Bson {
    match value {
        DataValue::String(s) => match ObjectId::parse_str(s) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(s.clone()),
        },
        DataValue::Array(items) => Bson::Array(items.iter().map(id_to_bson).collect()),
        other => data_value_to_bson(other),
    }
}

/// 将BSON转换为DataValue
pub(crate) fn bson_to_data_value(value: &Bson) -> DataValue {
    match value {
        Bson::Null | Bson::Undefined => DataValue::Null,
        Bson::Boolean(b) => DataValue::Bool(*b),
        Bson::Int32(i) => DataValue::Int(*i as i64),
        Bson::Int64(i) => DataValue::Int(*i),
        Bson::Double(d) => DataValue::Float(*d),
        Bson::String(s) => DataValue::String(s.clone()),
        Bson::ObjectId(oid) => DataValue::String(oid.to_hex()),
        Bson::DateTime(dt) => Utc
            .timestamp_millis_opt(dt.timestamp_millis())
            .single()
            .map(DataValue::DateTime)
            .unwrap_or(DataValue::Null),
        Bson::Array(arr) => DataValue::Array(arr.iter().map(bson_to_data_value).collect()),
        Bson::Document(doc) => DataValue::Object(
            doc.iter().map(|(k, v)| (k.clone(), bson_to_data_value(v))).collect(),
        ),
        Bson::Decimal128(d) => DataValue::String(d.to_string()),
        other => DataValue::String(other.to_string()),
    }
}

/// ODM文档转换为BSON文档，`_id` 转换为 ObjectId
pub(crate) fn to_bson_document(doc: &Document) -> bson::Document {
    let mut result = bson::Document::new();
    for (key, value) in doc {
        let bson_value = if key == ID_FIELD { id_to_bson(value) } else { data_value_to_bson(value) };
        result.insert(key, bson_value);
    }
    result
}

/// BSON文档转换为ODM文档
pub(crate) fn from_bson_document(doc: &bson::Document) -> Document {
    doc.iter().map(|(k, v)| (k.clone(), bson_to_data_value(v))).collect()
}

/// 驱动错误映射：上下文只写日志，驱动消息原样透传
pub(crate) fn map_driver_error(context: &str, err: mongodb::error::Error) -> OdmError {
    let message = err.to_string();
    error!("{}: {}", context, message);
    classify_driver_message(message)
}

/// 唯一索引冲突（E11000）映射为 `DuplicateKey`，其余为 `StorageError`
fn classify_driver_message(message: String) -> OdmError {
    if message.contains("E11000") {
        crate::odm_error!(duplicate_key, message)
    } else {
        crate::odm_error!(storage, message)
    }
}
