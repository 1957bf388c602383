//! # 削除要求
//!
//! キュー経由または直接呼び出しで届く削除要求と、その検証。
//!
//! ```json
//! { "collection": "people", "resource_id": "5f1a2b3c4d" }
//! ```
//!
//! 検証を通過した要求だけが [`ResourceRef`] になる。後段（戦略選択・DB 操作）は
//! `ResourceRef` しか受け取らないため、未検証の要求で DB に触れることはない。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ValidationError, collection::Collection, value_objects::ExternalId};

/// 削除要求（未検証）
///
/// どちらのフィールドも欠落しうるため `Option` で受ける。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRequest {
    pub collection:  Option<String>,
    pub resource_id: Option<String>,
}

/// 検証済みのリソース参照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub collection:  Collection,
    pub external_id: ExternalId,
}

impl DeletionRequest {
    pub fn new(collection: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            collection:  Some(collection.into()),
            resource_id: Some(resource_id.into()),
        }
    }

    /// 削除要求を検証する
    ///
    /// 1. `collection` が未指定・空 → [`ValidationError::MissingCollection`]
    /// 2. `resource_id` が未指定・空 → [`ValidationError::MissingResourceId`]
    /// 3. `collection` が対応表にない → [`ValidationError::InvalidCollection`]
    ///
    /// 空白のみの値は空とみなす。
    pub fn validate(&self) -> Result<ResourceRef, ValidationError> {
        let collection = non_blank(self.collection.as_deref())
            .ok_or(ValidationError::MissingCollection)?;
        let resource_id = non_blank(self.resource_id.as_deref())
            .ok_or(ValidationError::MissingResourceId)?;

        let collection = Collection::from_str(collection)
            .map_err(|_| ValidationError::InvalidCollection(collection.to_string()))?;

        Ok(ResourceRef {
            collection,
            external_id: ExternalId::new(resource_id),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
