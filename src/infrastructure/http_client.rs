// HTTPクライアント構築
//
// HealthLake FHIR APIへのリクエストに使う既定のHTTPトランスポート。
// 一時的なエラーは指数バックオフで再試行する。

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use thiserror::Error;

/// 最大再試行回数
const MAX_RETRIES: u32 = 3;

/// リクエストタイムアウト（秒）
///
/// Lambdaの関数タイムアウト（30秒）より短くする。
const REQUEST_TIMEOUT_SECS: u64 = 8;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 3;

/// Lambda関数のタイムアウト（秒）
pub const FUNCTION_TIMEOUT_SECS: u64 = 30;

/// HTTPクライアント型
pub type HttpClient = ClientWithMiddleware;

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("HTTPクライアントの構築に失敗: {0}")]
    Build(#[from] reqwest::Error),
}

/// 再試行ミドルウェア付きのHTTPクライアントを作成
pub fn new_http_client() -> Result<HttpClient, HttpClientError> {
    new_http_client_with_retries(MAX_RETRIES)
}

/// 最大再試行回数を指定してHTTPクライアントを作成
pub fn new_http_client_with_retries(max_retries: u32) -> Result<HttpClient, HttpClientError> {
    let base_client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_http_client() {
        assert!(new_http_client().is_ok());
    }

    #[test]
    fn test_timeouts_fit_in_function_timeout() {
        assert!(REQUEST_TIMEOUT_SECS < FUNCTION_TIMEOUT_SECS);
        assert!(CONNECT_TIMEOUT_SECS < REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_new_http_client_without_retries() {
        assert!(new_http_client_with_retries(0).is_ok());
    }

    #[test]
    fn test_max_retries() {
        assert_eq!(MAX_RETRIES, 3);
    }
}
