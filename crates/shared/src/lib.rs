//! # PurgeFlow 共有ユーティリティ
//!
//! ワーカーとインフラ層で共通利用する、ビジネスロジックを含まないユーティリティ。
//!
//! - [`invocation_response`] - 1 イベントの処理結果を返すレスポンス封筒
//! - [`observability`] - トレーシング初期化とログ出力形式

pub mod invocation_response;
pub mod observability;

pub use invocation_response::{ErrorBody, InvocationResponse};
