//! # PurgeFlow ドメイン層
//!
//! レポーティング DB から上流で削除されたリソースを取り除くための
//! ドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋性**: DB や外部サービスには一切依存しない
//! - **閉じた集合**: コレクション・テーブル・依存関係はすべて列挙型と定数で静的に定義する
//! - **検証済みの型**: 検証を通過した削除要求は [`request::ResourceRef`] としてのみ後段に渡る
//!
//! ## 依存関係の方向
//!
//! ```text
//! worker → infra → domain
//!    ↘                ↑
//!      ───────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`collection`] - コレクション名 → テーブル名のレジストリ
//! - [`request`] - 削除要求と検証
//! - [`strategy`] - 削除戦略の選択
//! - [`schema`] - 外部キーによる依存関係（静的定義）
//! - [`outcome`] - 削除結果
//! - [`value_objects`] - 外部 ID / 内部 ID
//! - [`error`] - 検証エラー
//!
//! ## 使用例
//!
//! ```rust
//! use purgeflow_domain::{
//!     collection::Table,
//!     request::DeletionRequest,
//!     strategy::DeletionStrategy,
//! };
//!
//! let request = DeletionRequest::new("groups", "grp_001");
//! let resource = request.validate().unwrap();
//!
//! let strategy = DeletionStrategy::select(resource.collection);
//! assert_eq!(strategy, DeletionStrategy::Standard(Table::DimGroup));
//! ```

pub mod collection;
pub mod error;
pub mod outcome;
pub mod request;
pub mod schema;
pub mod strategy;
pub mod value_objects;

pub use error::ValidationError;
