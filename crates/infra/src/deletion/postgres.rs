//! # PostgreSQL の DeletionStore 実装
//!
//! [`TxContext`] のトランザクション上で削除系ステートメントを発行する。
//!
//! テーブル名・カラム名は `Table` / `ForeignKeyColumn` から生成した静的な識別子で、
//! 外部 ID や内部 ID はすべてバインドパラメータで渡す。
//! 識別子が動的に変わるため `sqlx::query!` のコンパイル時検証は使わない。

use async_trait::async_trait;
use purgeflow_domain::{
    collection::Table,
    schema::{DependencyEdge, EXTERNAL_ID_COLUMN, ID_COLUMN},
    value_objects::{ExternalId, InternalId},
};

use super::DeletionStore;
use crate::{db::TxContext, error::InfraError};

#[async_trait]
impl DeletionStore for TxContext {
    #[tracing::instrument(skip_all, level = "debug", fields(%table, %external_id))]
    async fn find_ids_by_external_id(
        &mut self,
        table: Table,
        external_id: &ExternalId,
    ) -> Result<Vec<InternalId>, InfraError> {
        // int4 / int8 どちらの主キーでも i64 で受ける
        let sql = format!(
            "SELECT {ID_COLUMN}::bigint FROM {table} WHERE {EXTERNAL_ID_COLUMN} = $1 LIMIT 2"
        );
        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(external_id.as_str())
            .fetch_all(self.conn())
            .await?;

        Ok(ids.into_iter().map(InternalId::new).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%table, %external_id))]
    async fn delete_by_external_id(
        &mut self,
        table: Table,
        external_id: &ExternalId,
    ) -> Result<u64, InfraError> {
        let sql = format!("DELETE FROM {table} WHERE {EXTERNAL_ID_COLUMN} = $1");
        let result = sqlx::query(&sql)
            .bind(external_id.as_str())
            .execute(self.conn())
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%table, %id))]
    async fn delete_by_id(&mut self, table: Table, id: InternalId) -> Result<u64, InfraError> {
        let sql = format!("DELETE FROM {table} WHERE {ID_COLUMN} = $1");
        let result = sqlx::query(&sql)
            .bind(id.as_i64())
            .execute(self.conn())
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(table = %edge.child, foreign_key = %edge.foreign_key, %parent_id)
    )]
    async fn delete_by_foreign_key(
        &mut self,
        edge: DependencyEdge,
        parent_id: InternalId,
    ) -> Result<u64, InfraError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            edge.child, edge.foreign_key
        );
        let result = sqlx::query(&sql)
            .bind(parent_id.as_i64())
            .execute(self.conn())
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(table = %edge.child, foreign_key = %edge.foreign_key, %parent_id)
    )]
    async fn find_external_ids_by_foreign_key(
        &mut self,
        edge: DependencyEdge,
        parent_id: InternalId,
    ) -> Result<Vec<ExternalId>, InfraError> {
        let sql = format!(
            "SELECT {EXTERNAL_ID_COLUMN} FROM {} WHERE {} = $1 ORDER BY {ID_COLUMN}",
            edge.child, edge.foreign_key
        );
        let external_ids: Vec<String> = sqlx::query_scalar(&sql)
            .bind(parent_id.as_i64())
            .fetch_all(self.conn())
            .await?;

        Ok(external_ids.into_iter().map(ExternalId::new).collect())
    }
}
