// HealthLakeエンティティバリデーター設定
//
// リージョン・データストアIDを環境変数から読み込む。
// 認証情報は空のプレースホルダーを既定とし、実際の署名にはAWSの
// デフォルトプロバイダーチェーンから取得した認証情報を使う。

use std::env::VarError;

use aws_credential_types::provider::SharedCredentialsProvider;
use thiserror::Error;

/// 既定のリージョン
pub const DEFAULT_REGION: &str = "us-west-2";

/// 設定エラー
#[derive(Debug, Error)]
pub enum ValidatorConfigError {
    /// リージョンが空文字列
    #[error("HEALTHLAKE_REGIONが空です")]
    EmptyRegion,
    /// 環境変数の値がUTF-8ではない
    #[error("環境変数の値がUTF-8ではありません: {0}")]
    NotUnicode(String),
}

/// HealthLakeEntityValidatorの構築パラメータ
///
/// # フィールド
/// - `access_key` / `secret_key`: 静的な認証情報（既定は空文字列）
/// - `region`: HealthLakeのリージョン（既定は"us-west-2"）
/// - `datastore_id`: エンティティ実在確認に使うデータストアID（任意）
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    access_key: String,
    secret_key: String,
    region: String,
    datastore_id: Option<String>,
}

impl std::fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("region", &self.region)
            .field("datastore_id", &self.datastore_id)
            .finish_non_exhaustive()
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            datastore_id: None,
        }
    }
}

impl ValidatorConfig {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            datastore_id: None,
        }
    }

    pub fn with_datastore_id(mut self, datastore_id: impl Into<String>) -> Self {
        self.datastore_id = Some(datastore_id.into());
        self
    }

    /// 環境変数から設定を読み込み
    ///
    /// 認証情報は常に空のプレースホルダーとなる。
    ///
    /// # 環境変数
    /// - `HEALTHLAKE_REGION`: リージョン（任意、既定は"us-west-2"、空文字列はエラー）
    /// - `HEALTHLAKE_DATASTORE_ID`: データストアID（任意、空文字列は未設定扱い）
    pub fn from_env() -> Result<Self, ValidatorConfigError> {
        let defaults = Self::default();

        let region = optional_env("HEALTHLAKE_REGION")?.unwrap_or(defaults.region);
        if region.trim().is_empty() {
            return Err(ValidatorConfigError::EmptyRegion);
        }
        let datastore_id = optional_env("HEALTHLAKE_DATASTORE_ID")?.filter(|id| !id.is_empty());

        Ok(Self {
            region,
            datastore_id,
            ..defaults
        })
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn datastore_id(&self) -> Option<&str> {
        self.datastore_id.as_deref()
    }
}

/// 任意の環境変数を読み込む（未設定は`None`、非UTF-8はエラー）
fn optional_env(name: &str) -> Result<Option<String>, ValidatorConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ValidatorConfigError::NotUnicode(name.to_string())),
    }
}

/// AWSのデフォルトプロバイダーチェーンから認証情報プロバイダーを取得
///
/// Lambda環境では実行ロールの認証情報が使われる。
pub async fn default_credentials_provider() -> Option<SharedCredentialsProvider> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    aws_config.credentials_provider()
}
