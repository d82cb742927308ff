//! MongoDB适配器模块
//!
//! - database.rs: `Database` / `Collection` 特征实现
//! - utils.rs: BSON数据转换工具函数
//! - query_builder.rs: 选择器到过滤文档的转换

mod database;
mod query_builder;
mod utils;

pub use database::{MongoCollection, MongoDatabase};
