//! # 削除ユースケース
//!
//! 削除要求 1 件を処理する。
//!
//! 1. 要求を検証する（失敗したら DB に触れずに終了）
//! 2. コレクションから削除戦略を選ぶ
//! 3. トランザクションを開始し、戦略を実行する
//! 4. 成功ならコミット、失敗ならロールバック
//!
//! カスケード削除は入れ子の健診カスケードも含めて 1 トランザクションで実行され、
//! 途中で失敗した場合は何も削除されない。再試行はしない。

use purgeflow_domain::{
    collection::Collection,
    outcome::DeletionOutcome,
    request::{DeletionRequest, ResourceRef},
    strategy::DeletionStrategy,
    value_objects::ExternalId,
};
use purgeflow_infra::{InfraError, db::TransactionManager, deletion};

use crate::error::ProcessError;

/// 削除要求 1 件の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOutcome {
    pub collection:  Collection,
    pub resource_id: ExternalId,
    pub outcome:     DeletionOutcome,
}

/// 削除ユースケース
pub struct DeletionUseCaseImpl<T> {
    tx_manager: T,
}

impl<T: TransactionManager> DeletionUseCaseImpl<T> {
    pub fn new(tx_manager: T) -> Self {
        Self { tx_manager }
    }

    /// 削除要求を処理する
    #[tracing::instrument(
        skip_all,
        fields(
            collection = request.collection.as_deref().unwrap_or_default(),
            resource_id = request.resource_id.as_deref().unwrap_or_default(),
        )
    )]
    pub async fn process(
        &self,
        request: &DeletionRequest,
    ) -> Result<ProcessingOutcome, ProcessError> {
        let resource = request.validate().inspect_err(|e| {
            tracing::warn!(kind = e.kind_name(), "削除要求が不正です: {e}");
        })?;
        let strategy = DeletionStrategy::select(resource.collection);
        tracing::info!(?strategy, table = %strategy.target_table(), "削除を開始します");

        let outcome = self
            .execute_in_transaction(strategy, &resource.external_id)
            .await
            .map_err(|source| execution_error(&resource, source))?;

        tracing::info!(
            status = %outcome.status(),
            total_deleted = outcome.total_deleted(),
            "削除要求を処理しました"
        );
        Ok(ProcessingOutcome {
            collection: resource.collection,
            resource_id: resource.external_id,
            outcome,
        })
    }

    /// 接続を解放する
    ///
    /// ワーカー終了時に必ず呼び出す。
    pub async fn shutdown(&self) {
        self.tx_manager.close().await;
    }

    async fn execute_in_transaction(
        &self,
        strategy: DeletionStrategy,
        external_id: &ExternalId,
    ) -> Result<DeletionOutcome, InfraError> {
        let mut tx = self.tx_manager.begin().await?;

        match deletion::execute(strategy, &mut tx, external_id).await {
            Ok(outcome) => {
                self.tx_manager.commit(tx).await?;
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("削除に失敗したためロールバックします: {e}");
                if let Err(rollback_err) = self.tx_manager.rollback(tx).await {
                    tracing::error!("ロールバックに失敗しました: {rollback_err}");
                }
                Err(e)
            }
        }
    }
}

fn execution_error(resource: &ResourceRef, source: InfraError) -> ProcessError {
    ProcessError::Execution {
        collection: resource.collection,
        resource_id: resource.external_id.clone(),
        source,
    }
}
