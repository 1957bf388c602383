//! # PurgeFlow インフラ層
//!
//! レポーティング DB（PostgreSQL）への接続と、カスケード削除エンジンを提供する。
//!
//! ## 責務
//!
//! - **データベース接続**: 遅延接続・単一接続の管理と明示的な解放
//! - **トランザクション**: 1 削除要求 = 1 トランザクションの境界
//! - **削除戦略**: 単純削除・人物カスケード・健診カスケード
//!
//! ## 依存関係
//!
//! ```text
//! worker → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続設定・遅延接続プール・トランザクション管理
//! - [`deletion`] - カスケード削除エンジン
//! - [`error`] - インフラ層エラー定義
//! - `mock` - テスト用インメモリストア（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use purgeflow_domain::{request::DeletionRequest, strategy::DeletionStrategy};
//! use purgeflow_infra::{db::{self, PgTransactionManager, TransactionManager}, deletion};
//!
//! async fn run(config: &db::DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let tx_manager = PgTransactionManager::new(db::create_lazy_pool(config));
//!     let resource = DeletionRequest::new("people", "p1").validate()?;
//!
//!     let mut tx = tx_manager.begin().await?;
//!     let outcome = deletion::execute(
//!         DeletionStrategy::select(resource.collection),
//!         &mut tx,
//!         &resource.external_id,
//!     )
//!     .await?;
//!     tx_manager.commit(tx).await?;
//!
//!     tx_manager.close().await;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod deletion;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
