//! # イベントハンドラ
//!
//! 受信イベントを削除要求に正規化し、処理結果を [`InvocationResponse`] に変換する。
//!
//! ## 受け付ける形式
//!
//! ```json
//! // 直接呼び出し
//! { "collection": "people", "resource_id": "p1" }
//!
//! // SQS: 先頭レコードの body に要求の JSON 文字列
//! { "Records": [{ "body": "{\"collection\":\"people\",\"resource_id\":\"p1\"}" }] }
//!
//! // SNS: 先頭レコードの Sns.Message に要求の JSON 文字列
//! { "Records": [{ "Sns": { "Message": "{\"collection\":\"people\",\"resource_id\":\"p1\"}" } }] }
//! ```
//!
//! 1 回の呼び出しで処理するのは 1 リソースだけ。2 件目以降のレコードは警告を出して無視する。

use purgeflow_domain::{
    collection::Collection,
    outcome::{DeletionCounts, DeletionStatus},
    request::DeletionRequest,
    value_objects::ExternalId,
};
use purgeflow_infra::db::TransactionManager;
use purgeflow_shared::InvocationResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::ProcessError,
    usecase::{DeletionUseCaseImpl, ProcessingOutcome},
};

/// 成功時の固定メッセージ
pub const SUCCESS_MESSAGE: &str = "Successfully processed deletion";

/// イベントの解釈エラー
#[derive(Debug, Error)]
pub enum EventError {
    #[error("イベントを解釈できません: {0}")]
    MalformedEvent(String),
}

impl EventError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MalformedEvent(_) => "MalformedEvent",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InboundEvent {
    Queue {
        #[serde(rename = "Records")]
        records: Vec<QueueRecord>,
    },
    Direct(DeletionRequest),
}

#[derive(Deserialize)]
struct QueueRecord {
    body: Option<String>,
    #[serde(rename = "Sns")]
    sns:  Option<SnsNotification>,
}

#[derive(Deserialize)]
struct SnsNotification {
    #[serde(rename = "Message")]
    message: String,
}

/// 受信イベントを削除要求に正規化する
pub fn parse_event(raw: &str) -> Result<DeletionRequest, EventError> {
    let event: InboundEvent =
        serde_json::from_str(raw).map_err(|e| EventError::MalformedEvent(e.to_string()))?;

    let records = match event {
        InboundEvent::Direct(request) => return Ok(request),
        InboundEvent::Queue { records } => records,
    };

    if records.len() > 1 {
        tracing::warn!(
            records = records.len(),
            "複数のレコードを受信しました。先頭のレコードのみ処理します"
        );
    }
    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| EventError::MalformedEvent("Records が空です".to_string()))?;

    let payload = match record {
        QueueRecord {
            body: Some(body), ..
        } => body,
        QueueRecord {
            sns: Some(sns), ..
        } => sns.message,
        _ => {
            return Err(EventError::MalformedEvent(
                "レコードに body も Sns.Message もありません".to_string(),
            ));
        }
    };

    serde_json::from_str(&payload).map_err(|e| EventError::MalformedEvent(e.to_string()))
}

/// 成功時の本文
#[derive(Debug, Serialize)]
struct SuccessBody<'a> {
    message:     &'static str,
    collection:  Collection,
    resource_id: &'a ExternalId,
    status:      DeletionStatus,
    deleted:     DeletionCounts,
}

impl<'a> From<&'a ProcessingOutcome> for SuccessBody<'a> {
    fn from(processed: &'a ProcessingOutcome) -> Self {
        Self {
            message:     SUCCESS_MESSAGE,
            collection:  processed.collection,
            resource_id: &processed.resource_id,
            status:      processed.outcome.status(),
            deleted:     processed.outcome.counts(),
        }
    }
}

/// 解釈できなかったイベントを 500 のレスポンスに変換する
pub fn reject_event(e: &EventError) -> InvocationResponse {
    tracing::error!(kind = e.kind_name(), "イベントの処理に失敗しました: {e}");
    InvocationResponse::error(e.to_string(), e.kind_name())
}

/// 1 イベントを処理してレスポンスを返す
///
/// 失敗はすべてステータス 500 のレスポンスに変換し、呼び出し元には返さない。
pub async fn handle_event<T: TransactionManager>(
    usecase: &DeletionUseCaseImpl<T>,
    raw: &str,
) -> InvocationResponse {
    let request = match parse_event(raw) {
        Ok(request) => request,
        Err(e) => return reject_event(&e),
    };

    match usecase.process(&request).await {
        Ok(processed) => InvocationResponse::ok(&SuccessBody::from(&processed)),
        Err(e) => {
            if let ProcessError::Execution { source, .. } = &e {
                tracing::error!(
                    kind = e.kind_name(),
                    "削除要求の処理に失敗しました: {e}\n{}",
                    source.span_trace()
                );
            } else {
                tracing::error!(kind = e.kind_name(), "削除要求の処理に失敗しました: {e}");
            }
            InvocationResponse::error(e.to_string(), e.kind_name())
        }
    }
}
