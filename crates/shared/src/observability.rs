//! # ログ出力の初期化
//!
//! ワーカーの stdout はレスポンス専用のため、ログは stderr にだけ書き出す。
//! 設定は起動時に一度だけ `LOG_FORMAT` と `RUST_LOG` から読む。
//! どちらも不正な値で起動を止めることはなく、既定値で出力したうえで警告を残す。

/// `RUST_LOG` が未設定のときのフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,purgeflow=debug";

/// stderr に書き出すログの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON
    Json,
    /// 端末で読む形式
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 未設定・空なら [`Pretty`](LogFormat::Pretty)。大文字小文字は区別し、
    /// 未知の値はそのまま `Err` で返す。
    pub fn from_value(value: Option<&str>) -> Result<Self, String> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some("json") => Ok(Self::Json),
            Some("pretty") => Ok(Self::Pretty),
            Some(other) => Err(other.to_string()),
        }
    }
}

/// ログ出力の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// 初期化ログに付けるサービス名
    pub service_name:        String,
    pub log_format:          LogFormat,
    /// `EnvFilter` のディレクティブ
    pub filter:              String,
    /// 解釈できなかった `LOG_FORMAT` の値（購読者の登録後に警告する）
    pub rejected_log_format: Option<String>,
}

impl TracingConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |name| std::env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let (log_format, rejected_log_format) =
            match LogFormat::from_value(lookup("LOG_FORMAT").as_deref()) {
                Ok(format) => (format, None),
                Err(value) => (LogFormat::default(), Some(value)),
            };
        let filter = lookup("RUST_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            service_name: service_name.into(),
            log_format,
            filter,
            rejected_log_format,
        }
    }
}

/// グローバルな購読者を登録する
///
/// `ErrorLayer` も登録するので、`InfraError` の `SpanTrace` に
/// 削除対象のコレクションと外部 ID のスパンが残る。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{
        EnvFilter,
        Layer as _,
        layer::SubscriberExt,
        util::SubscriberInitExt,
    };

    let (env_filter, filter_error) = match EnvFilter::try_new(&config.filter) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(e)),
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    if let Some(value) = &config.rejected_log_format {
        tracing::warn!(value = %value, "LOG_FORMAT を解釈できないため pretty で出力します");
    }
    if let Some(e) = filter_error {
        tracing::warn!(
            filter = %config.filter,
            "RUST_LOG を解釈できないため既定のフィルタを使います: {e}"
        );
    }
    tracing::debug!(
        service = %config.service_name,
        format = ?config.log_format,
        "ログ出力を初期化しました"
    );
}
