//! # ワーカーループ
//!
//! 1 行 1 イベントの入力を順に処理し、レスポンスを 1 行ずつ出力する。
//!
//! - 空行は無視する
//! - UTF-8 として不正な行は `MalformedEvent` のレスポンスを返し、次の行に進む
//! - 入力の終端、またはシャットダウンシグナルで終了する
//! - シグナルは行の読み込み待ちの間だけ受け付ける。処理中のイベントは最後まで実行する
//!
//! 接続の解放は呼び出し元（[`DeletionUseCaseImpl::shutdown`]）が行う。

use std::{future::Future, io};

use purgeflow_infra::db::TransactionManager;
use purgeflow_shared::InvocationResponse;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    handler::{self, EventError},
    usecase::DeletionUseCaseImpl,
};

/// ワーカーの処理件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed:    usize,
}

impl RunSummary {
    fn record(&mut self, response: &InvocationResponse) {
        self.processed += 1;
        if response.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// 入力が尽きるかシャットダウンされるまでイベントを処理する
pub async fn run<T, R, W, F>(
    usecase: &DeletionUseCaseImpl<T>,
    input: R,
    mut output: W,
    shutdown: F,
) -> io::Result<RunSummary>
where
    T: TransactionManager,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut segments = input.split(b'\n');
    let mut summary = RunSummary::default();
    tokio::pin!(shutdown);

    loop {
        let segment = tokio::select! {
            () = &mut shutdown => {
                tracing::info!("シャットダウンシグナルを受信しました");
                break;
            }
            segment = segments.next_segment() => segment?,
        };
        let Some(mut segment) = segment else {
            tracing::info!("入力が終了しました");
            break;
        };
        if segment.last() == Some(&b'\r') {
            segment.pop();
        }

        let response = match String::from_utf8(segment) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handler::handle_event(usecase, &line).await,
            // 1 行の不正なバイト列で後続のイベントを止めない
            Err(e) => handler::reject_event(&EventError::MalformedEvent(format!(
                "UTF-8 として不正な入力です: {e}"
            ))),
        };
        summary.record(&response);

        let mut encoded = serde_json::to_string(&response).map_err(io::Error::other)?;
        encoded.push('\n');
        output.write_all(encoded.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(summary)
}
