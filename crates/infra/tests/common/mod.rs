//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用する行の登録・件数確認ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use purgeflow_domain::{collection::Table, schema::ForeignKeyColumn};
use sqlx::PgPool;

/// 親を持たない行を登録し、内部 ID を返す
pub async fn insert_row(pool: &PgPool, table: Table, mongo_id: &str) -> i64 {
    sqlx::query_scalar(&format!(
        "INSERT INTO {table} (mongo_id) VALUES ($1) RETURNING id"
    ))
    .bind(mongo_id)
    .fetch_one(pool)
    .await
    .expect("行の登録に失敗")
}

/// 内部 ID を指定して人物を登録する
pub async fn insert_person_with_id(pool: &PgPool, id: i64, mongo_id: &str) {
    sqlx::query("INSERT INTO dim_person (id, mongo_id, first_name, last_name) VALUES ($1, $2, 'John', 'Doe')")
        .bind(id)
        .bind(mongo_id)
        .execute(pool)
        .await
        .expect("人物の登録に失敗");
}

/// 内部 ID を指定して健診を登録する
pub async fn insert_medical_with_id(pool: &PgPool, id: i64, mongo_id: &str, person_id: i64) {
    sqlx::query(
        "INSERT INTO fact_medical (id, mongo_id, dim_person_fk, status) VALUES ($1, $2, $3, 'dispatched')",
    )
    .bind(id)
    .bind(mongo_id)
    .bind(person_id)
    .execute(pool)
    .await
    .expect("健診の登録に失敗");
}

/// 外部キーで親を参照する行を登録し、内部 ID を返す
pub async fn insert_child(
    pool: &PgPool,
    table: Table,
    mongo_id: &str,
    foreign_key: ForeignKeyColumn,
    parent_id: i64,
) -> i64 {
    sqlx::query_scalar(&format!(
        "INSERT INTO {table} (mongo_id, {foreign_key}) VALUES ($1, $2) RETURNING id"
    ))
    .bind(mongo_id)
    .bind(parent_id)
    .fetch_one(pool)
    .await
    .expect("子行の登録に失敗")
}

/// 人物に健診を 1 件登録し、レポートと所見を付ける。健診の内部 ID を返す
pub async fn insert_medical_tree(
    pool: &PgPool,
    person_id: i64,
    mongo_id: &str,
    reports: usize,
    observations: usize,
) -> i64 {
    let medical_id = insert_child(
        pool,
        Table::FactMedical,
        mongo_id,
        ForeignKeyColumn::DimPersonFk,
        person_id,
    )
    .await;
    for n in 0..reports {
        insert_child(
            pool,
            Table::FactHealthCategoryReport,
            &format!("{mongo_id}_hc_{n}"),
            ForeignKeyColumn::FactMedicalFk,
            medical_id,
        )
        .await;
    }
    for n in 0..observations {
        insert_child(
            pool,
            Table::FactObservation,
            &format!("{mongo_id}_obs_{n}"),
            ForeignKeyColumn::FactMedicalFk,
            medical_id,
        )
        .await;
    }
    medical_id
}

/// 外部 ID に一致する行数
pub async fn count_by_mongo_id(pool: &PgPool, table: Table, mongo_id: &str) -> i64 {
    sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {table} WHERE mongo_id = $1"
    ))
    .bind(mongo_id)
    .fetch_one(pool)
    .await
    .expect("件数取得に失敗")
}

/// 内部 ID（主キー）に一致する行数
pub async fn count_by_id(pool: &PgPool, table: Table, id: i64) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("件数取得に失敗")
}

/// 外部キーが親を参照している行数
pub async fn count_by_foreign_key(
    pool: &PgPool,
    table: Table,
    foreign_key: ForeignKeyColumn,
    parent_id: i64,
) -> i64 {
    sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {table} WHERE {foreign_key} = $1"
    ))
    .bind(parent_id)
    .fetch_one(pool)
    .await
    .expect("件数取得に失敗")
}

/// テーブル全体の行数
pub async fn count_all(pool: &PgPool, table: Table) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("件数取得に失敗")
}
