//! # 単純削除
//!
//! 依存行を持たないテーブルから、外部 ID で 1 文だけ削除する。
//!
//! 削除件数 0 は「対象なし」として警告ログを出すが、エラーにはしない。
//! トランザクションは何もせずにコミットされる。

use purgeflow_domain::{
    collection::Table,
    outcome::{DeletionCounts, DeletionOutcome},
    value_objects::ExternalId,
};

use super::DeletionStore;
use crate::error::InfraError;

/// 外部 ID で 1 テーブルから削除する
#[tracing::instrument(skip_all, fields(%table, %external_id))]
pub async fn execute<S>(
    store: &mut S,
    table: Table,
    external_id: &ExternalId,
) -> Result<DeletionOutcome, InfraError>
where
    S: DeletionStore + ?Sized,
{
    let deleted = store.delete_by_external_id(table, external_id).await?;
    tracing::info!(deleted_count = deleted, "{table} から削除しました");

    if deleted == 0 {
        tracing::warn!("削除対象のレコードが見つかりません");
        return Ok(DeletionOutcome::NotFound { table });
    }

    let mut counts = DeletionCounts::new();
    counts.record(table, deleted);
    Ok(DeletionOutcome::Deleted(counts))
}
