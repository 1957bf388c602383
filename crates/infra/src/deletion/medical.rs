//! # 健診カスケード削除
//!
//! 健診（`fact_medical`）と、それを外部キーで参照する行を削除する。
//!
//! 1. 外部 ID から健診の内部 ID を解決する（見つからなければ何もしない）
//! 2. `fact_health_category_report` を `fact_medical_fk` で削除
//! 3. `fact_observation` を `fact_medical_fk` で削除
//! 4. `fact_medical` を `id` で削除
//!
//! `medicals` の削除要求から直接呼ばれる場合も、人物カスケードの途中で
//! 呼ばれる場合も同じ動作をする。どちらの場合も呼び出し元のトランザクションに参加し、
//! 自分ではトランザクションを開かない。

use purgeflow_domain::{
    collection::Table,
    outcome::{DeletionCounts, DeletionOutcome},
    schema::{MEDICAL_HEALTH_CATEGORY_REPORTS, MEDICAL_OBSERVATIONS},
    value_objects::ExternalId,
};

use super::{DeletionStore, resolve_internal_id};
use crate::error::InfraError;

/// 健診を依存行ごと削除する
#[tracing::instrument(skip_all, fields(medical = %external_id))]
pub async fn execute<S>(
    store: &mut S,
    external_id: &ExternalId,
) -> Result<DeletionOutcome, InfraError>
where
    S: DeletionStore + ?Sized,
{
    let Some(medical_id) = resolve_internal_id(store, Table::FactMedical, external_id).await?
    else {
        tracing::warn!("健診が見つかりません（mongo_id: {external_id}）");
        return Ok(DeletionOutcome::NotFound {
            table: Table::FactMedical,
        });
    };
    tracing::info!(%medical_id, "健診を特定しました");

    let mut counts = DeletionCounts::new();

    // 外部キー制約に従い子テーブルから順に削除
    let reports = store
        .delete_by_foreign_key(MEDICAL_HEALTH_CATEGORY_REPORTS, medical_id)
        .await?;
    tracing::info!(deleted_count = reports, "健康カテゴリレポートを削除しました");
    counts.record(Table::FactHealthCategoryReport, reports);

    let observations = store
        .delete_by_foreign_key(MEDICAL_OBSERVATIONS, medical_id)
        .await?;
    tracing::info!(deleted_count = observations, "所見を削除しました");
    counts.record(Table::FactObservation, observations);

    let medicals = store.delete_by_id(Table::FactMedical, medical_id).await?;
    tracing::info!(deleted_count = medicals, "健診を削除しました");
    counts.record(Table::FactMedical, medicals);

    Ok(DeletionOutcome::Deleted(counts))
}
