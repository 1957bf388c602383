//! # 人物カスケード削除
//!
//! 人物（`dim_person`）と、その人物に依存する行をすべて削除する。
//!
//! 1. 外部 ID から人物の内部 ID を解決する（見つからなければ何もしない）
//! 2. `fact_people_enrollment` を `dim_person_fk` で削除
//! 3. 人物が持つ健診の外部 ID を `dim_person_fk` で列挙
//! 4. 健診ごとに [`medical`](super::medical) カスケードを同じトランザクションで実行
//! 5. `dim_person` を `id` で削除
//!
//! 健診を 1 件も持たない人物では 3・4 が空振りするだけで、エラーにはならない。

use purgeflow_domain::{
    collection::Table,
    outcome::{DeletionCounts, DeletionOutcome},
    schema::{PERSON_ENROLLMENTS, PERSON_MEDICALS},
    value_objects::ExternalId,
};

use super::{DeletionStore, medical, resolve_internal_id};
use crate::error::InfraError;

/// 人物を依存行ごと削除する
#[tracing::instrument(skip_all, fields(person = %external_id))]
pub async fn execute<S>(
    store: &mut S,
    external_id: &ExternalId,
) -> Result<DeletionOutcome, InfraError>
where
    S: DeletionStore + ?Sized,
{
    let Some(person_id) = resolve_internal_id(store, Table::DimPerson, external_id).await? else {
        tracing::warn!("人物が見つかりません（mongo_id: {external_id}）");
        return Ok(DeletionOutcome::NotFound {
            table: Table::DimPerson,
        });
    };
    tracing::info!(%person_id, "人物を特定しました");

    let mut counts = DeletionCounts::new();

    let enrollments = store
        .delete_by_foreign_key(PERSON_ENROLLMENTS, person_id)
        .await?;
    tracing::info!(deleted_count = enrollments, "受講登録を削除しました");
    counts.record(Table::FactPeopleEnrollment, enrollments);

    let medical_ids = store
        .find_external_ids_by_foreign_key(PERSON_MEDICALS, person_id)
        .await?;
    for medical_id in &medical_ids {
        tracing::info!(%medical_id, "関連する健診を削除します");
        // 同じストアを渡し、健診カスケードも 1 つのトランザクションに含める
        match medical::execute(store, medical_id).await? {
            DeletionOutcome::Deleted(medical_counts) => counts.merge(&medical_counts),
            DeletionOutcome::NotFound { .. } => {
                tracing::warn!(%medical_id, "健診が見つからないためスキップします");
            }
        }
    }

    let persons = store.delete_by_id(Table::DimPerson, person_id).await?;
    tracing::info!(deleted_count = persons, "人物を削除しました");
    counts.record(Table::DimPerson, persons);

    Ok(DeletionOutcome::Deleted(counts))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use purgeflow_domain::{schema::ForeignKeyColumn, value_objects::InternalId};

    use super::*;
    use crate::{db::TransactionManager, mock::InMemoryDatabase};

    /// 健診 1 件を登録し、その内部 ID を返す
    fn seed_medical(
        db: &InMemoryDatabase,
        person_id: InternalId,
        external_id: &str,
        observations: usize,
    ) -> InternalId {
        let medical_id = db.insert_child(
            Table::FactMedical,
            external_id,
            ForeignKeyColumn::DimPersonFk,
            person_id,
        );
        db.insert_child(
            Table::FactHealthCategoryReport,
            &format!("{external_id}_hc"),
            ForeignKeyColumn::FactMedicalFk,
            medical_id,
        );
        for n in 0..observations {
            db.insert_child(
                Table::FactObservation,
                &format!("{external_id}_obs_{n}"),
                ForeignKeyColumn::FactMedicalFk,
                medical_id,
            );
        }
        medical_id
    }

    #[tokio::test]
    async fn test_人物と受講登録と健診をまとめて削除する() {
        let db = InMemoryDatabase::new();
        let person_id = db.insert(Table::DimPerson, "p1");
        db.insert_child(
            Table::FactPeopleEnrollment,
            "enr_001",
            ForeignKeyColumn::DimPersonFk,
            person_id,
        );
        seed_medical(&db, person_id, "m1", 2);
        let tx_manager = db.transaction_manager();
        let mut tx = tx_manager.begin().await.unwrap();

        let outcome = execute(&mut tx, &ExternalId::new("p1")).await.unwrap();
        tx_manager.commit(tx).await.unwrap();

        assert_eq!(outcome.deleted_count(Table::FactPeopleEnrollment), 1);
        assert_eq!(outcome.deleted_count(Table::FactHealthCategoryReport), 1);
        assert_eq!(outcome.deleted_count(Table::FactObservation), 2);
        assert_eq!(outcome.deleted_count(Table::FactMedical), 1);
        assert_eq!(outcome.deleted_count(Table::DimPerson), 1);
        assert_eq!(outcome.total_deleted(), 6);
        for table in [
            Table::DimPerson,
            Table::FactPeopleEnrollment,
            Table::FactMedical,
            Table::FactHealthCategoryReport,
            Table::FactObservation,
        ] {
            assert_eq!(db.count(table), 0, "{table}");
        }
    }

    #[tokio::test]
    async fn test_複数の健診をそれぞれカスケードし件数を合算する() {
        let db = InMemoryDatabase::new();
        let person_id = db.insert(Table::DimPerson, "p1");
        seed_medical(&db, person_id, "m1", 2);
        seed_medical(&db, person_id, "m2", 3);
        seed_medical(&db, person_id, "m3", 0);
        let mut tx = db.transaction_manager().begin().await.unwrap();

        let outcome = execute(&mut tx, &ExternalId::new("p1")).await.unwrap();

        assert_eq!(outcome.deleted_count(Table::FactMedical), 3);
        assert_eq!(outcome.deleted_count(Table::FactHealthCategoryReport), 3);
        assert_eq!(outcome.deleted_count(Table::FactObservation), 5);
        assert_eq!(outcome.deleted_count(Table::DimPerson), 1);
    }

    #[tokio::test]
    async fn test_健診を持たない人物も削除できる() {
        let db = InMemoryDatabase::new();
        db.insert(Table::DimPerson, "p2");
        let mut tx = db.transaction_manager().begin().await.unwrap();

        let outcome = execute(&mut tx, &ExternalId::new("p2")).await.unwrap();

        assert_eq!(outcome.deleted_count(Table::DimPerson), 1);
        assert_eq!(outcome.deleted_count(Table::FactPeopleEnrollment), 0);
        assert_eq!(outcome.deleted_count(Table::FactMedical), 0);
    }

    #[tokio::test]
    async fn test_他の人物の行は削除しない() {
        let db = InMemoryDatabase::new();
        let p1 = db.insert(Table::DimPerson, "p1");
        let p2 = db.insert(Table::DimPerson, "p2");
        seed_medical(&db, p1, "m1", 1);
        seed_medical(&db, p2, "m2", 1);
        db.insert_child(
            Table::FactPeopleEnrollment,
            "enr_p2",
            ForeignKeyColumn::DimPersonFk,
            p2,
        );
        let tx_manager = db.transaction_manager();
        let mut tx = tx_manager.begin().await.unwrap();

        execute(&mut tx, &ExternalId::new("p1")).await.unwrap();
        tx_manager.commit(tx).await.unwrap();

        assert!(db.contains(Table::DimPerson, "p2"));
        assert!(db.contains(Table::FactMedical, "m2"));
        assert!(db.contains(Table::FactPeopleEnrollment, "enr_p2"));
        assert_eq!(db.count(Table::FactObservation), 1);
    }

    #[tokio::test]
    async fn test_健診の依存行と健診を人物より先に削除する() {
        let db = InMemoryDatabase::new();
        let person_id = db.insert(Table::DimPerson, "p1");
        db.insert_child(
            Table::FactPeopleEnrollment,
            "enr_001",
            ForeignKeyColumn::DimPersonFk,
            person_id,
        );
        seed_medical(&db, person_id, "m1", 1);
        let mut tx = db.transaction_manager().begin().await.unwrap();

        execute(&mut tx, &ExternalId::new("p1")).await.unwrap();

        assert_eq!(
            db.statements(),
            vec![
                "SELECT dim_person BY mongo_id",
                "DELETE fact_people_enrollment BY dim_person_fk",
                "SELECT fact_medical BY dim_person_fk",
                "SELECT fact_medical BY mongo_id",
                "DELETE fact_health_category_report BY fact_medical_fk",
                "DELETE fact_observation BY fact_medical_fk",
                "DELETE fact_medical BY id",
                "DELETE dim_person BY id",
            ]
        );
    }

    #[tokio::test]
    async fn test_存在しない人物はnot_foundで何も削除しない() {
        let db = InMemoryDatabase::new();
        let mut tx = db.transaction_manager().begin().await.unwrap();

        let outcome = execute(&mut tx, &ExternalId::new("p404")).await.unwrap();

        assert_eq!(
            outcome,
            DeletionOutcome::NotFound {
                table: Table::DimPerson,
            }
        );
        assert_eq!(db.statements(), vec!["SELECT dim_person BY mongo_id"]);
    }

    #[tokio::test]
    async fn test_直接削除と人物経由の削除で健診の削除対象が一致する() {
        // 直接 medicals として削除
        let direct_db = InMemoryDatabase::new();
        let person_id = direct_db.insert(Table::DimPerson, "p1");
        seed_medical(&direct_db, person_id, "m1", 2);
        let mut tx = direct_db.transaction_manager().begin().await.unwrap();
        let direct = medical::execute(&mut tx, &ExternalId::new("m1"))
            .await
            .unwrap();

        // 人物カスケードの一部として削除
        let cascade_db = InMemoryDatabase::new();
        let person_id = cascade_db.insert(Table::DimPerson, "p1");
        seed_medical(&cascade_db, person_id, "m1", 2);
        let mut tx = cascade_db.transaction_manager().begin().await.unwrap();
        let cascade = execute(&mut tx, &ExternalId::new("p1")).await.unwrap();

        for table in [
            Table::FactHealthCategoryReport,
            Table::FactObservation,
            Table::FactMedical,
        ] {
            assert_eq!(
                direct.deleted_count(table),
                cascade.deleted_count(table),
                "{table}"
            );
        }
    }
}
