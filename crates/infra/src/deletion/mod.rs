//! # カスケード削除エンジン
//!
//! 上流で削除されたリソースを、依存行ごとレポーティング DB から削除する。
//!
//! ## 概要
//!
//! スキーマに `ON DELETE CASCADE` がないため、依存行は外部キーの向きに従って
//! 子から順に明示的に削除する。依存関係は [`purgeflow_domain::schema`] に
//! 静的に定義されたものだけを扱う。
//!
//! | 戦略 | 削除順 |
//! |------|--------|
//! | [`standard`] | 対象テーブル（1 文） |
//! | [`medical`] | 健康カテゴリレポート → 所見 → 健診 |
//! | [`person`] | 受講登録 → 健診ごとの [`medical`] カスケード → 人物 |
//!
//! ## トランザクション
//!
//! 戦略は [`DeletionStore`]（開始済みトランザクション）を受け取る関数であり、
//! 自分でトランザクションを開かない。人物カスケード内の健診カスケードも
//! 同じストアを使うため、全体が 1 つの原子的な単位になる。

pub mod medical;
pub mod person;
mod postgres;
pub mod standard;

use async_trait::async_trait;
use purgeflow_domain::{
    collection::Table,
    outcome::DeletionOutcome,
    schema::DependencyEdge,
    strategy::DeletionStrategy,
    value_objects::{ExternalId, InternalId},
};

use crate::error::InfraError;

/// 削除ステートメントの発行先
///
/// 開始済みトランザクションの中で、パラメータ化されたステートメントを発行する。
/// テーブル名・カラム名は列挙型から生成し、外部入力はすべてバインドパラメータで渡す。
#[async_trait]
pub trait DeletionStore: Send {
    /// `SELECT id FROM <table> WHERE mongo_id = $1`（最大 2 件）
    ///
    /// 一意性の検査に使うため、2 件目までを返す。
    async fn find_ids_by_external_id(
        &mut self,
        table: Table,
        external_id: &ExternalId,
    ) -> Result<Vec<InternalId>, InfraError>;

    /// `DELETE FROM <table> WHERE mongo_id = $1`
    async fn delete_by_external_id(
        &mut self,
        table: Table,
        external_id: &ExternalId,
    ) -> Result<u64, InfraError>;

    /// `DELETE FROM <table> WHERE id = $1`
    async fn delete_by_id(&mut self, table: Table, id: InternalId) -> Result<u64, InfraError>;

    /// `DELETE FROM <child> WHERE <foreign_key> = $1`
    async fn delete_by_foreign_key(
        &mut self,
        edge: DependencyEdge,
        parent_id: InternalId,
    ) -> Result<u64, InfraError>;

    /// `SELECT mongo_id FROM <child> WHERE <foreign_key> = $1`
    async fn find_external_ids_by_foreign_key(
        &mut self,
        edge: DependencyEdge,
        parent_id: InternalId,
    ) -> Result<Vec<ExternalId>, InfraError>;
}

/// 選択済みの戦略で削除を実行する
pub async fn execute<S>(
    strategy: DeletionStrategy,
    store: &mut S,
    external_id: &ExternalId,
) -> Result<DeletionOutcome, InfraError>
where
    S: DeletionStore + ?Sized,
{
    match strategy {
        DeletionStrategy::PersonCascade => person::execute(store, external_id).await,
        DeletionStrategy::MedicalCascade => medical::execute(store, external_id).await,
        DeletionStrategy::Standard(table) => standard::execute(store, table, external_id).await,
    }
}

/// 外部 ID から内部 ID を解決する
///
/// - 0 件: `None`
/// - 1 件: `Some(id)`
/// - 2 件以上: どの行を起点にすべきか決められないため
///   [`InfraErrorKind::DataIntegrity`](crate::error::InfraErrorKind::DataIntegrity)
pub(crate) async fn resolve_internal_id<S>(
    store: &mut S,
    table: Table,
    external_id: &ExternalId,
) -> Result<Option<InternalId>, InfraError>
where
    S: DeletionStore + ?Sized,
{
    let ids = store.find_ids_by_external_id(table, external_id).await?;
    match ids.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(*id)),
        _ => Err(InfraError::data_integrity(table, external_id, ids.len())),
    }
}

#[cfg(test)]
mod tests {
    use purgeflow_domain::{collection::Collection, outcome::DeletionStatus};
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{
        db::TransactionManager,
        error::InfraErrorKind,
        mock::InMemoryDatabase,
    };

    #[tokio::test]
    async fn test_resolve_internal_idは一致なしでnoneを返す() {
        let db = InMemoryDatabase::new();
        let mut tx = db.transaction_manager().begin().await.unwrap();

        let id = resolve_internal_id(&mut tx, Table::DimPerson, &ExternalId::new("p1"))
            .await
            .unwrap();

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_resolve_internal_idは1件一致で内部idを返す() {
        let db = InMemoryDatabase::new();
        let person_id = db.insert(Table::DimPerson, "p1");
        let mut tx = db.transaction_manager().begin().await.unwrap();

        let id = resolve_internal_id(&mut tx, Table::DimPerson, &ExternalId::new("p1"))
            .await
            .unwrap();

        assert_eq!(id, Some(person_id));
    }

    #[tokio::test]
    async fn test_resolve_internal_idは重複でデータ整合性エラー() {
        let db = InMemoryDatabase::new();
        db.insert(Table::FactMedical, "m1");
        db.insert(Table::FactMedical, "m1");
        let mut tx = db.transaction_manager().begin().await.unwrap();

        let err = resolve_internal_id(&mut tx, Table::FactMedical, &ExternalId::new("m1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind(),
            InfraErrorKind::DataIntegrity { table: Table::FactMedical, matches: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_全コレクションの存在しないidはnot_foundになる() {
        for collection in Collection::iter() {
            let db = InMemoryDatabase::new();
            let mut tx = db.transaction_manager().begin().await.unwrap();

            let outcome = execute(
                DeletionStrategy::select(collection),
                &mut tx,
                &ExternalId::new("missing"),
            )
            .await
            .unwrap();

            assert_eq!(outcome.status(), DeletionStatus::NotFound, "{collection}");
            assert_eq!(outcome.total_deleted(), 0, "{collection}");
        }
    }
}
