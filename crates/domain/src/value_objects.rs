//! # 値オブジェクト
//!
//! 削除対象の行を識別する 2 種類の ID。
//!
//! - [`ExternalId`]: 上流システムが発行した ID（`mongo_id` カラム）
//! - [`InternalId`]: レポーティング DB の主キー（`id` カラム）
//!
//! 依存行は内部 ID の外部キーで親を参照するため、カスケード削除では
//! まず外部 ID から内部 ID を解決する。

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 外部 ID（上流システムが発行した不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 内部 ID（レポーティング DB の主キー）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display)]
#[display("{_0}")]
pub struct InternalId(i64);

impl InternalId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// 内部の値を取得する
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}
