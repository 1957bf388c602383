//! # PurgeFlow ワーカー
//!
//! 上流システムで削除されたリソースを、レポーティング DB から
//! 依存行ごと削除するキュートリガー型ワーカー。
//!
//! ```text
//! stdin (1 行 1 イベント)
//!   → handler::parse_event   SQS / SNS / 直接形式を削除要求に正規化
//!   → usecase::process       検証 → 戦略選択 → 1 トランザクションで削除
//!   → InvocationResponse     stdout に 1 行で出力
//! ```
//!
//! ログは stderr に出力する。

pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
pub mod worker;
