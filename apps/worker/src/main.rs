//! # PurgeFlow ワーカー
//!
//! 上流システムで削除されたリソースを、レポーティング DB から依存行ごと削除する。
//!
//! ## 入出力
//!
//! - stdin: 1 行 1 イベント（直接形式 / SQS / SNS）
//! - stdout: 1 イベントにつき 1 行の `{"statusCode", "body"}`
//! - stderr: ログ
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DB_HOST` | **Yes** | レポーティング DB のホスト |
//! | `DB_PORT` | No | ポート番号（デフォルト: `5432`） |
//! | `DB_NAME` | **Yes** | データベース名 |
//! | `DB_USER` | **Yes** | ユーザー名 |
//! | `DB_PASSWORD` | No | パスワード（デフォルト: 空） |
//! | `DB_STATEMENT_TIMEOUT_MS` | No | ステートメントタイムアウト（ミリ秒） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,purgeflow=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! echo '{"collection":"people","resource_id":"p1"}' \
//!   | DB_HOST=localhost DB_NAME=reporting DB_USER=worker cargo run -p purgeflow-worker
//! ```

use anyhow::Context as _;
use purgeflow_infra::db::{self, PgTransactionManager};
use purgeflow_shared::observability::{self, TracingConfig};
use purgeflow_worker::{config::WorkerConfig, usecase::DeletionUseCaseImpl, worker};
use tokio::io::BufReader;

const SERVICE_NAME: &str = "purgeflow-worker";

/// ワーカーのエントリーポイント
///
/// DB 接続は最初のイベントを処理するときに確立し、終了時に必ず解放する。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    observability::init_tracing(&TracingConfig::from_env(SERVICE_NAME));

    let config = WorkerConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        "ワーカーを起動します"
    );

    let usecase = DeletionUseCaseImpl::new(PgTransactionManager::new(db::create_lazy_pool(
        &config.database,
    )));

    let result = worker::run(
        &usecase,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        shutdown_signal(),
    )
    .await;

    usecase.shutdown().await;

    let summary = result.context("イベントの入出力に失敗しました")?;
    tracing::info!(
        processed = summary.processed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "ワーカーを終了します"
    );
    Ok(())
}

/// Ctrl-C を待つ
///
/// シグナルハンドラを登録できない場合はシグナルによる終了を諦め、入力の終端を待つ。
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("シグナルハンドラの登録に失敗しました: {e}");
        std::future::pending::<()>().await;
    }
}
