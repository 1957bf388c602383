//! # テスト用インメモリストア
//!
//! 削除戦略・ユースケースのテストで使用するインメモリのレポーティング DB。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! purgeflow-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! ## 再現する DB の振る舞い
//!
//! - **トランザクション**: `begin()` 時点のスナップショットに対して操作し、
//!   `commit()` で書き戻す。`rollback()` またはドロップで破棄する
//! - **外部キー制約**: 子行から参照されている行を削除するとエラーになる。
//!   削除順序を誤った戦略はテストで失敗する
//! - **障害注入**: [`InMemoryDatabase::fail_on`] で指定テーブルへの DELETE を失敗させる
//! - **記録**: 発行したステートメントと begin / commit / rollback / close の回数

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use purgeflow_domain::{
    collection::Table,
    schema::{ALL_EDGES, DependencyEdge, ForeignKeyColumn},
    value_objects::{ExternalId, InternalId},
};

use crate::{db::TransactionManager, deletion::DeletionStore, error::InfraError};

#[derive(Debug, Clone)]
struct MockRow {
    id:          InternalId,
    external_id: ExternalId,
    references:  Vec<(ForeignKeyColumn, InternalId)>,
}

impl MockRow {
    fn references(&self, foreign_key: ForeignKeyColumn, parent_id: InternalId) -> bool {
        self.references.contains(&(foreign_key, parent_id))
    }
}

#[derive(Debug, Clone, Default)]
struct Tables(HashMap<Table, Vec<MockRow>>);

impl Tables {
    fn rows(&self, table: Table) -> &[MockRow] {
        self.0.get(&table).map(Vec::as_slice).unwrap_or_default()
    }

    /// 条件に一致する行を削除する（外部キー制約を検査する）
    fn delete_where(
        &mut self,
        table: Table,
        predicate: impl Fn(&MockRow) -> bool,
    ) -> Result<u64, InfraError> {
        let targets: Vec<InternalId> = self
            .rows(table)
            .iter()
            .filter(|row| predicate(row))
            .map(|row| row.id)
            .collect();

        for edge in ALL_EDGES.iter().filter(|edge| edge.parent() == table) {
            let violation = self.rows(edge.child).iter().find_map(|row| {
                targets
                    .iter()
                    .find(|&&parent_id| row.references(edge.foreign_key, parent_id))
            });
            if let Some(parent_id) = violation {
                return Err(InfraError::unexpected(format!(
                    "外部キー制約違反: {}.{}={parent_id} が {table} を参照しています",
                    edge.child, edge.foreign_key
                )));
            }
        }

        if let Some(rows) = self.0.get_mut(&table) {
            rows.retain(|row| !targets.contains(&row.id));
        }
        Ok(targets.len() as u64)
    }
}

#[derive(Debug, Default)]
struct MockState {
    tables:         Tables,
    next_id:        i64,
    failing_tables: HashSet<Table>,
    statements:     Vec<String>,
    begin_count:    usize,
    commit_count:   usize,
    rollback_count: usize,
    closed:         bool,
}

/// インメモリのレポーティング DB
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<Mutex<MockState>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// この DB を操作する TransactionManager を返す
    pub fn transaction_manager(&self) -> MockTransactionManager {
        MockTransactionManager { db: self.clone() }
    }

    /// 親を持たない行を登録する
    pub fn insert(&self, table: Table, external_id: &str) -> InternalId {
        self.insert_row(table, external_id, Vec::new())
    }

    /// 外部キーで親を参照する行を登録する
    pub fn insert_child(
        &self,
        table: Table,
        external_id: &str,
        foreign_key: ForeignKeyColumn,
        parent_id: InternalId,
    ) -> InternalId {
        self.insert_row(table, external_id, vec![(foreign_key, parent_id)])
    }

    fn insert_row(
        &self,
        table: Table,
        external_id: &str,
        references: Vec<(ForeignKeyColumn, InternalId)>,
    ) -> InternalId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = InternalId::new(state.next_id);
        state.tables.0.entry(table).or_default().push(MockRow {
            id,
            external_id: ExternalId::new(external_id),
            references,
        });
        id
    }

    /// テーブルの行数（コミット済み）
    pub fn count(&self, table: Table) -> usize {
        self.state.lock().unwrap().tables.rows(table).len()
    }

    /// 親を参照する子行の数（コミット済み）
    pub fn count_children(&self, edge: DependencyEdge, parent_id: InternalId) -> usize {
        self.state
            .lock()
            .unwrap()
            .tables
            .rows(edge.child)
            .iter()
            .filter(|row| row.references(edge.foreign_key, parent_id))
            .count()
    }

    /// 外部 ID の行が存在するか（コミット済み）
    pub fn contains(&self, table: Table, external_id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .tables
            .rows(table)
            .iter()
            .any(|row| row.external_id.as_str() == external_id)
    }

    /// 指定テーブルへの DELETE を失敗させる
    pub fn fail_on(&self, table: Table) {
        self.state.lock().unwrap().failing_tables.insert(table);
    }

    /// 発行されたステートメント（ロールバック分も含む）
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().statements.clone()
    }

    pub fn begin_count(&self) -> usize {
        self.state.lock().unwrap().begin_count
    }

    pub fn commit_count(&self) -> usize {
        self.state.lock().unwrap().commit_count
    }

    pub fn rollback_count(&self) -> usize {
        self.state.lock().unwrap().rollback_count
    }

    /// 接続が解放されたか
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn record(&self, statement: String) {
        self.state.lock().unwrap().statements.push(statement);
    }

    fn check_failure(&self, table: Table) -> Result<(), InfraError> {
        if self.state.lock().unwrap().failing_tables.contains(&table) {
            return Err(InfraError::unexpected(format!(
                "{table}: テスト用エラー"
            )));
        }
        Ok(())
    }
}

// ===== MockTransactionManager =====

/// インメモリ DB 用の TransactionManager
#[derive(Clone)]
pub struct MockTransactionManager {
    db: InMemoryDatabase,
}

/// スナップショットに対して操作するトランザクション
pub struct MockTx {
    db:     InMemoryDatabase,
    tables: Tables,
}

#[async_trait]
impl TransactionManager for MockTransactionManager {
    type Tx = MockTx;

    async fn begin(&self) -> Result<MockTx, InfraError> {
        let mut state = self.db.state.lock().unwrap();
        if state.closed {
            return Err(InfraError::unexpected("接続は解放済みです"));
        }
        state.begin_count += 1;
        Ok(MockTx {
            db:     self.db.clone(),
            tables: state.tables.clone(),
        })
    }

    async fn commit(&self, tx: MockTx) -> Result<(), InfraError> {
        let mut state = self.db.state.lock().unwrap();
        state.tables = tx.tables;
        state.commit_count += 1;
        Ok(())
    }

    async fn rollback(&self, _tx: MockTx) -> Result<(), InfraError> {
        self.db.state.lock().unwrap().rollback_count += 1;
        Ok(())
    }

    async fn close(&self) {
        self.db.state.lock().unwrap().closed = true;
    }
}

#[async_trait]
impl DeletionStore for MockTx {
    async fn find_ids_by_external_id(
        &mut self,
        table: Table,
        external_id: &ExternalId,
    ) -> Result<Vec<InternalId>, InfraError> {
        self.db.record(format!("SELECT {table} BY mongo_id"));
        Ok(self
            .tables
            .rows(table)
            .iter()
            .filter(|row| &row.external_id == external_id)
            .map(|row| row.id)
            .take(2)
            .collect())
    }

    async fn delete_by_external_id(
        &mut self,
        table: Table,
        external_id: &ExternalId,
    ) -> Result<u64, InfraError> {
        self.db.record(format!("DELETE {table} BY mongo_id"));
        self.db.check_failure(table)?;
        self.tables
            .delete_where(table, |row| &row.external_id == external_id)
    }

    async fn delete_by_id(&mut self, table: Table, id: InternalId) -> Result<u64, InfraError> {
        self.db.record(format!("DELETE {table} BY id"));
        self.db.check_failure(table)?;
        self.tables.delete_where(table, |row| row.id == id)
    }

    async fn delete_by_foreign_key(
        &mut self,
        edge: DependencyEdge,
        parent_id: InternalId,
    ) -> Result<u64, InfraError> {
        self.db
            .record(format!("DELETE {} BY {}", edge.child, edge.foreign_key));
        self.db.check_failure(edge.child)?;
        self.tables.delete_where(edge.child, |row| {
            row.references(edge.foreign_key, parent_id)
        })
    }

    async fn find_external_ids_by_foreign_key(
        &mut self,
        edge: DependencyEdge,
        parent_id: InternalId,
    ) -> Result<Vec<ExternalId>, InfraError> {
        self.db
            .record(format!("SELECT {} BY {}", edge.child, edge.foreign_key));
        Ok(self
            .tables
            .rows(edge.child)
            .iter()
            .filter(|row| row.references(edge.foreign_key, parent_id))
            .map(|row| row.external_id.clone())
            .collect())
    }
}
