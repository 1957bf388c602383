//! # ワーカー設定
//!
//! 環境変数からレポーティング DB の接続設定を読み込む。
//! 起動時に 1 度だけ読み込み、不足・不正があれば起動を中止する。

use std::{env, time::Duration};

use purgeflow_infra::db::{DEFAULT_PORT, DatabaseConfig};
use thiserror::Error;

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定または空
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("{name} の値が不正です: {value:?}（{expected}）")]
    Invalid {
        name:     &'static str,
        value:    String,
        expected: &'static str,
    },
}

/// ワーカーの設定
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database: DatabaseConfig,
}

impl WorkerConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む
    ///
    /// | 変数 | 必須 | 既定値 |
    /// |------|------|--------|
    /// | `DB_HOST` | Yes | |
    /// | `DB_PORT` | No | `5432` |
    /// | `DB_NAME` | Yes | |
    /// | `DB_USER` | Yes | |
    /// | `DB_PASSWORD` | No | 空 |
    /// | `DB_STATEMENT_TIMEOUT_MS` | No | 未設定 |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("DB_PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "DB_PORT",
                value,
                expected: "1〜65535 のポート番号",
            })?,
            None => DEFAULT_PORT,
        };

        let statement_timeout = lookup("DB_STATEMENT_TIMEOUT_MS")
            .map(|value| match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
                _ => Err(ConfigError::Invalid {
                    name: "DB_STATEMENT_TIMEOUT_MS",
                    value,
                    expected: "正のミリ秒",
                }),
            })
            .transpose()?;

        Ok(Self {
            database: DatabaseConfig {
                host: required("DB_HOST")?,
                port,
                name: required("DB_NAME")?,
                user: required("DB_USER")?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                statement_timeout,
            },
        })
    }
}
