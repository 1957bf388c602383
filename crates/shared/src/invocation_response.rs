//! # 呼び出しレスポンス
//!
//! 1 イベントの処理結果を返す `{ "statusCode": u16, "body": "<JSON 文字列>" }` 形式の封筒。
//!
//! `body` はオブジェクトではなく JSON 文字列として埋め込む。
//! キューのトリガー元は `body` をそのまま転送するため。

use serde::{Deserialize, Serialize};

/// 成功時のステータスコード
pub const STATUS_OK: u16 = 200;
/// 失敗時のステータスコード
pub const STATUS_ERROR: u16 = 500;

/// 処理結果の封筒
///
/// ```
/// use purgeflow_shared::InvocationResponse;
///
/// let response = InvocationResponse::ok(&serde_json::json!({ "message": "done" }));
/// assert_eq!(response.status_code, 200);
/// assert_eq!(response.body, r#"{"message":"done"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body:        String,
}

impl InvocationResponse {
    /// 本文をシリアライズして封筒を作成する
    ///
    /// シリアライズに失敗した場合は固定文言の 500 を返す。
    pub fn new<T: Serialize>(status_code: u16, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self { status_code, body },
            Err(e) => Self::serialization_failure(&e),
        }
    }

    /// 200 OK
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::new(STATUS_OK, body)
    }

    /// 500 エラー
    pub fn error(error: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self::new(STATUS_ERROR, &ErrorBody::new(error, error_type))
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    fn serialization_failure(e: &serde_json::Error) -> Self {
        let body = serde_json::json!({
            "error": format!("レスポンスのシリアライズに失敗しました: {e}"),
            "type": "SerializationError",
        });
        Self {
            status_code: STATUS_ERROR,
            body:        body.to_string(),
        }
    }
}

/// エラー時の本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error:      String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error:      error.into(),
            error_type: error_type.into(),
        }
    }
}
