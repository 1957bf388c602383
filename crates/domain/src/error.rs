//! # ドメイン層エラー定義
//!
//! 削除要求の検証で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **検証順序**: `collection` 欠落 → `resource_id` 欠落 → 未知のコレクション の順に判定する
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//! - **種別名**: `strum::IntoStaticStr` によりバリアント名をレスポンスの `type` に使う
//!
//! 検証エラーは呼び出し元の誤りであり、DB には一切アクセスせずに返す。
//! リトライもしない。

use strum::IntoStaticStr;
use thiserror::Error;

/// 削除要求の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
pub enum ValidationError {
    /// `collection` が未指定または空
    #[error("collection が指定されていません")]
    MissingCollection,

    /// `resource_id` が未指定または空
    #[error("resource_id が指定されていません")]
    MissingResourceId,

    /// 対応表に存在しないコレクション
    #[error("不正なコレクションです: {0}")]
    InvalidCollection(String),
}

impl ValidationError {
    /// エラー種別名を返す（例: `"InvalidCollection"`）
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }
}
