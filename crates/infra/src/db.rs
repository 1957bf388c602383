//! # PostgreSQL 接続・トランザクション管理
//!
//! レポーティング DB への接続と、削除処理を包むトランザクションを管理する。
//!
//! ## 設計方針
//!
//! - **遅延接続**: ワーカー起動時には接続せず、最初の削除要求で接続する
//! - **単一接続の再利用**: プールの上限を 1 にし、同じワーカーの呼び出し間で接続を使い回す
//! - **明示的な解放**: ワーカー終了時に [`TransactionManager::close`] で接続を閉じる
//! - **1 要求 = 1 トランザクション**: カスケード削除は入れ子の戦略も含めて
//!   同じ [`TxContext`] の中で実行する
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use purgeflow_infra::db::{self, DatabaseConfig, PgTransactionManager, TransactionManager};
//!
//! async fn example(config: &DatabaseConfig) -> Result<(), purgeflow_infra::InfraError> {
//!     let tx_manager = PgTransactionManager::new(db::create_lazy_pool(config));
//!
//!     // ここで初めて接続が確立される
//!     let tx = tx_manager.begin().await?;
//!     tx_manager.commit(tx).await?;
//!
//!     tx_manager.close().await;
//!     Ok(())
//! }
//! ```

use std::{fmt, time::Duration};

use async_trait::async_trait;
use sqlx::{
    PgConnection,
    PgPool,
    Postgres,
    Transaction,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{deletion::DeletionStore, error::InfraError};

/// PostgreSQL の既定ポート
pub const DEFAULT_PORT: u16 = 5432;

/// 接続時に名乗るアプリケーション名
const APPLICATION_NAME: &str = "purgeflow-worker";

/// レポーティング DB の接続設定
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host:              String,
    pub port:              u16,
    pub name:              String,
    pub user:              String,
    pub password:          String,
    /// セッションの `statement_timeout`（未設定ならサーバー既定値）
    pub statement_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// sqlx の接続オプションに変換する
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .application_name(APPLICATION_NAME);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        if let Some(timeout) = self.statement_timeout {
            options = options.options([("statement_timeout", timeout.as_millis().to_string())]);
        }

        options
    }
}

// パスワードをログに出さない
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

/// 遅延接続のプールを作成する
///
/// この時点ではまだ接続しない。最初の [`TransactionManager::begin`] で
/// 接続が確立され、以降の呼び出しでは同じ接続を再利用する。
///
/// # 設定値
///
/// - `max_connections(1)`: ワーカーは 1 要求ずつ順に処理するため 1 本で足りる
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト。超過時はエラー
pub fn create_lazy_pool(config: &DatabaseConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .min_connections(0)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(config.connect_options())
}

// =============================================================================
// TxContext
// =============================================================================

/// トランザクションコンテキスト
///
/// 削除戦略はこのコンテキストを `&mut` で受け取り、すべてのステートメントを
/// 同じトランザクション内で発行する。人物カスケードから呼ばれる健診カスケードも
/// 新しいトランザクションを開かず、呼び出し元のコンテキストをそのまま使う。
///
/// # ライフサイクル
///
/// 1. `TransactionManager::begin()` で作成
/// 2. 削除戦略に `&mut TxContext` として渡す
/// 3. `commit()` でコミット、`rollback()` またはドロップでロールバック
pub struct TxContext(Transaction<'static, Postgres>);

impl TxContext {
    /// Postgres トランザクションを開始する
    pub(crate) async fn begin(pool: &PgPool) -> Result<Self, InfraError> {
        Ok(Self(pool.begin().await?))
    }

    /// トランザクションをコミットする
    pub async fn commit(self) -> Result<(), InfraError> {
        self.0.commit().await?;
        Ok(())
    }

    /// トランザクションをロールバックする
    ///
    /// 呼ばずにドロップしても sqlx が自動的にロールバックする。
    pub async fn rollback(self) -> Result<(), InfraError> {
        self.0.rollback().await?;
        Ok(())
    }

    /// トランザクション内の DB コネクションを取得する
    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

// =============================================================================
// TransactionManager
// =============================================================================

/// トランザクション管理 trait
///
/// ユースケース層が削除処理のトランザクションを開始・確定するための抽象化。
/// ユースケース層は PgPool に直接依存せず、この trait 経由で操作する。
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// トランザクション中に削除ステートメントを発行するハンドル
    type Tx: DeletionStore + Send + 'static;

    /// トランザクションを開始する（未接続なら接続する）
    async fn begin(&self) -> Result<Self::Tx, InfraError>;

    /// トランザクションをコミットする
    async fn commit(&self, tx: Self::Tx) -> Result<(), InfraError>;

    /// トランザクションをロールバックする
    async fn rollback(&self, tx: Self::Tx) -> Result<(), InfraError>;

    /// 接続を解放する
    ///
    /// ワーカー終了時に必ず呼ぶ。呼び出し後の `begin()` はエラーになる。
    async fn close(&self);
}

/// Postgres 用 TransactionManager 実装
pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    type Tx = TxContext;

    async fn begin(&self) -> Result<TxContext, InfraError> {
        TxContext::begin(&self.pool).await
    }

    async fn commit(&self, tx: TxContext) -> Result<(), InfraError> {
        tx.commit().await
    }

    async fn rollback(&self, tx: TxContext) -> Result<(), InfraError> {
        tx.rollback().await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("データベース接続を解放しました");
    }
}
