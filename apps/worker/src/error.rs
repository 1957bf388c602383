//! # ワーカーのエラー定義
//!
//! 削除要求 1 件の処理で発生するエラー。
//! [`kind_name`](ProcessError::kind_name) がレスポンス本文の `type` になる。

use purgeflow_domain::{ValidationError, collection::Collection, value_objects::ExternalId};
use purgeflow_infra::InfraError;
use thiserror::Error;

/// 削除要求の処理エラー
#[derive(Debug, Error)]
pub enum ProcessError {
    /// 要求の検証に失敗した（DB には触れていない）
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 削除の実行に失敗した（トランザクションはロールバック済み）
    #[error("削除に失敗しました（{collection}/{resource_id}）: {source}")]
    Execution {
        collection:  Collection,
        resource_id: ExternalId,
        #[source]
        source:      InfraError,
    },
}

impl ProcessError {
    /// エラー種別名を返す
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.kind_name(),
            Self::Execution { .. } => "ExecutionError",
        }
    }
}
